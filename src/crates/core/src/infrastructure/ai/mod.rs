//! AI provider module
//!
//! One adapter per backend, all normalized into the same canonical
//! `ProviderResponse`. Request/response wire shapes are fully owned by this
//! layer; nothing provider-specific leaks upward.

pub mod client;
pub mod providers;
pub mod types;

pub use client::AIClient;
pub use providers::ProviderAdapter;
pub use types::unified::ProviderResponse;
