pub mod config;
pub mod environment;
pub mod error;
pub mod state;

pub use config::*;
pub use environment::*;
pub use error::*;
pub use state::*;
