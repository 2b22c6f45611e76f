//! Cricket Diner - AI-generated cricket podcast content
//!
//! Builds prompts for match recaps, episode scripts, topic ideas and
//! summaries, sends them to Gemini with model fallback, and parses the
//! replies into typed records.

pub mod config;
pub mod error;
pub mod llm;
pub mod podcast;
pub mod types;

// Re-export commonly used types
pub use config::GeminiConfig;
pub use error::{DinerError, Result};
pub use types::{MatchData, PodcastConfig, Speaker, TranscriptMessage};

// Re-export main functionality
pub use llm::{Schema, TextModel};
pub use podcast::{ContentGenerator, DEFAULT_MATCH_COUNT, DEFAULT_TOPIC_COUNT};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
