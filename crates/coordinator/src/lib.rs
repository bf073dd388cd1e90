//! Query routing and workflow orchestration for Content Alchemy.
//!
//! The coordinator takes one free-text request and:
//! 1. Matches it against keyword capabilities to get candidate labels
//! 2. Asks the LLM to break ties when more than one label matched
//! 3. Dispatches to the handler registered for the chosen label
//! 4. Returns a [`WorkflowState`] whose `error` field signals failure
//!
//! # Architecture
//!
//! ```text
//! User Request
//!      │
//!      ▼
//! ┌─────────────────┐     ┌──────────────┐
//! │  CapabilitySet  │────▶│  TieBreaker  │  (only on >1 candidate)
//! └────────┬────────┘     └──────┬───────┘
//!          └──────────┬──────────┘
//!                     ▼
//!              ┌─────────────┐
//!              │   Router    │ ──▶ HandlerRegistry
//!              └──────┬──────┘
//!    ┌─────────┬──────┴───┬─────────┬─────────┐
//!    ▼         ▼          ▼         ▼         ▼
//! research  article  social_post  image    format
//! ```

pub mod capabilities;
pub mod config;
pub mod registry;
pub mod router;
pub mod routing;
pub mod tiebreak;
pub mod triage;
pub mod workflow;

pub use capabilities::CapabilitySet;
pub use config::{CoordinatorConfig, RoutingConfig};
pub use registry::HandlerRegistry;
pub use router::{DispatchError, Router};
pub use routing::{DEFAULT_CONFIDENCE, RouteDecision};
pub use tiebreak::{ClassificationDegraded, TieBreakOutcome, TieBreaker};
pub use triage::{Classification, Triage};
pub use workflow::{Coordinator, WorkflowState, WorkflowStatus};
