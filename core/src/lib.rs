// Core route pooling functionality:
// - Route query / advice data structures
// - Prompt template and model output schema
// - The advisor itself
// - Gemini API client (the text-generation collaborator)
// - Configuration loading
// - Shared error types

// Export client module - API client for Gemini
pub mod client;
pub use client::{GeminiClient, TextGenerator};

// Export types module - Gemini request/response data structures
pub mod types;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Route query and advice
pub mod route;
pub use route::{RouteAdvice, RouteQuery};

// Prompt template and output schema
pub mod prompt;

// The advisor
pub mod advisor;
pub use advisor::RoutePoolingAdvisor;

// "Offer a ride" form
pub mod offer;
pub use offer::{FieldError, OfferForm, TransportMode};
