//! # BoardKit Core
//!
//! Core types, errors, and event plumbing for BoardKit.
//! Provides the geometry primitives, the error taxonomy, typed event
//! channels and the shared-ownership aliases used by the editor crates.

pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod types;

pub use error::{EditorError, Error, Result};

// Re-export event channels for convenience
pub use event_bus::{EventChannel, Subscription, SubscriptionGroup, SubscriptionId};

pub use geometry::{Bounds, Position, Rgba, ViewportBounds};

// Re-export type aliases for convenience
pub use types::{shared, Callback, DataCallback, Shared};
