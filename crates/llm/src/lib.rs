pub mod oracle;
pub mod provider;
pub mod providers;

pub use oracle::{LlmOracle, OracleError, SegmentationOracle};
pub use provider::{CompletionRequest, LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
