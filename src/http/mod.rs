pub mod executor;
pub mod send;
pub mod transport;
