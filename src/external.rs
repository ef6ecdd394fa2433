//! Integrações com serviços externos

pub mod gemini;

pub use gemini::GeminiClient;
