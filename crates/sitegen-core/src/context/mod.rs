mod history;
mod builder;
mod budget;

pub use history::ConversationStore;
pub use builder::{BuiltPrompt, OutputMode, PromptBuilder, DEFAULT_REQUIREMENTS};
pub use budget::TokenBudgeter;
