pub mod config;
pub mod error;
pub mod logging;

pub mod extract;
pub mod filename;
pub mod input;
pub mod pipeline;
pub mod transport;
