pub mod gemini_api;
pub mod stripe_api;

pub use gemini_api::GeminiApi;
pub use stripe_api::{CheckoutSessionParams, StripeApi};
