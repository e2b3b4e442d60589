pub mod common;
pub mod config;
pub mod gemini;
pub mod prompts;

pub use config::AiConfig;
pub use gemini::{generate, GenerateError};
pub use prompts::build_prompt;
