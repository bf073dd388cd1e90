//! Common types and traits shared across Content Alchemy crates.
//!
//! This crate provides the foundational abstractions that the generators,
//! the routing core and the driving application use to talk to each other.

pub mod envelope;
pub mod error;
pub mod intent;
pub mod traits;

pub use envelope::ResultEnvelope;
pub use error::{AlchemyError, Result};
pub use intent::IntentLabel;
pub use traits::{AgentConfig, ContentHandler};
