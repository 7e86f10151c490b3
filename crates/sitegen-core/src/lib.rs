pub mod artifact;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod images;
pub mod llm;
pub mod pipeline;
pub mod session;

// Re-export key types
pub use error::{Result, SitegenError};
pub use artifact::{ArtifactExtractor, ExtractionStatus, WebsiteArtifact};
pub use config::Settings;
pub use context::{ConversationStore, OutputMode, PromptBuilder, TokenBudgeter};
pub use images::{ImageCandidate, ImageReconciler, ImageSearch, ReachabilityProbe};
pub use llm::{
    ConversationTurn, Delay, FailureKind, GenerationClient, GenerationRequest, GenerationResult,
    GenerationTransport, ProviderId, RetryPolicy, Role,
};
pub use pipeline::WebsiteGenerator;
pub use session::{CompanyProfile, Session};
