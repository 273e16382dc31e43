//! Engine core: configuration, error taxonomy, assembly

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{EngineError, EngineResult, Entity, ErrorKind};
pub use state::Engine;
