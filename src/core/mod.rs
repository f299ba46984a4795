// Core module - probe trait shared by the pool and the sockets
pub mod prober;

pub use prober::{PortProber, ProberFactory};
