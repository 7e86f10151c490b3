mod traits;
mod claude;
mod openai;
mod client;
pub mod provider;

pub use traits::*;
pub use claude::ClaudeTransport;
pub use openai::OpenAITransport;
pub use client::{Delay, GenerationClient, RetryPolicy, TokioDelay};
pub use provider::ProviderId;
