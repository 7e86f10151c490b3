/// sitegen: centralized constants.
/// Model tables, endpoints, wire markers and limits live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_CLAUDE_MODEL: &str = "claude-2.1";
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

    /// Context windows (input + output tokens) for the models we know about.
    /// Matched by exact id first, then by longest prefix.
    pub const CONTEXT_WINDOWS: &[(&str, usize)] = &[
        ("claude-2.1", 200_000),
        ("claude-2.0", 100_000),
        ("claude-2", 100_000),
        ("claude-instant-1", 100_000),
        ("claude-3", 200_000),
        ("claude-sonnet", 200_000),
        ("claude-opus", 200_000),
        ("claude-haiku", 200_000),
        ("gpt-4o", 128_000),
        ("gpt-4-turbo", 128_000),
        ("gpt-4-32k", 32_768),
        ("gpt-4", 8_192),
        ("gpt-3.5-turbo-16k", 16_384),
        ("gpt-3.5-turbo", 4_096),
    ];

    /// Used for unknown models: the smallest window in the table.
    pub const FALLBACK_CONTEXT_WINDOW: usize = 4_096;
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const CLAUDE_BASE_URL: &str = "https://api.anthropic.com";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
    pub const ANTHROPIC_VERSION: &str = "2023-06-01";
    pub const IMAGE_SEARCH_BASE_URL: &str = "https://api.pexels.com";
    pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/800x600";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const MAX_OUTPUT_TOKENS: u32 = 2000;
    pub const HISTORY_TOKEN_LIMIT: usize = 3000;
    pub const RETRY_MAX_ATTEMPTS: u32 = 3;
    pub const RETRY_BASE_DELAY_MS: u64 = 1000;
    pub const PROBE_TIMEOUT_SECS: u64 = 5;
    pub const IMAGE_RESULT_COUNT: usize = 10;
    pub const SEARCH_TIMEOUT_SECS: u64 = 15;
    pub const USER_AGENT: &str = "sitegen/0.1";
}

// ─── Prompt / Artifact ────────────────────────────────────────────────────────

pub mod artifact {
    pub const OPEN_MARKER: &str = "<artifact";
    pub const CLOSE_MARKER: &str = "</artifact>";
    pub const DEFAULT_IDENTIFIER: &str = "company-website";
    pub const CONTENT_TYPE: &str = "text/html";
    pub const DOCTYPE: &str = "<!DOCTYPE html>";
    pub const ROOT_CLOSE: &str = "</html>";
    pub const PLACEHOLDER: &str = "<!-- website code could not be generated -->";

    /// Tokens that must stay free for the model's answer, at minimum.
    pub const SAFETY_MARGIN_TOKENS: usize = 100;
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "sitegen";
    pub const CONFIG_FILE: &str = "config.toml";
}
