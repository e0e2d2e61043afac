pub mod port;

pub use port::SerialLink;
