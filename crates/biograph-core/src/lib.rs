pub mod config;
pub mod error;
pub mod filename;
pub mod types;

pub use config::BiographConfig;
pub use error::{BiographError, Result};
pub use filename::generate_filename;
pub use types::*;
