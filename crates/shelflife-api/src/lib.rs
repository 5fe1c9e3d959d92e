// HTTP client for the text-generation service behind product advice
pub mod gemini;

// Re-export common types
pub use gemini::{GeminiClient, GeminiError, GenerateResponse, DEFAULT_MODEL, GEMINI_API_BASE};
