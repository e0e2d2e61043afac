pub mod aggregate;
pub mod session;

pub use session::Dlpth1c;
