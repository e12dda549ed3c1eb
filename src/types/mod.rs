pub mod gemini;
pub mod stripe;
