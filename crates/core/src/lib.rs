pub mod config;
pub mod document;
pub mod error;
pub mod stage;

pub use config::Config;
pub use document::*;
pub use error::*;
pub use stage::*;
