pub mod prompt;
pub mod traits;

// Model provider implementations
pub mod gemini;
