pub mod candidate;
pub mod config;
pub mod errors;

pub use candidate::*;
pub use config::*;
pub use errors::*;
