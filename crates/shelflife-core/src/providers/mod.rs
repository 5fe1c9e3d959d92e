// Provider implementations for the advice service
pub mod gemini;

pub use gemini::GeminiProvider;
