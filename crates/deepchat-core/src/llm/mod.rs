mod traits;
mod azure;
pub mod retry;
pub mod stream;

pub use traits::*;
pub use azure::{parse_sse_line, AzureInferenceClient};
pub use retry::RetryPolicy;
pub use stream::{collect_stream, CompletedStream};
