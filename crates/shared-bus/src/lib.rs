//! # Shared Bus - Name-Service Event Bus
//!
//! Off-chain watchers, indexers and the reconciliation watcher learn about
//! ownership changes and cross-chain outcomes through this bus. Components
//! publish; nothing on the bus is authoritative state.
//!
//! ```text
//! ┌──────────────┐   publish()    ┌──────────────┐   subscribe()   ┌──────────────┐
//! │ Registry /   │ ─────────────→ │  Event Bus   │ ──────────────→ │  Watcher /   │
//! │ Transfer /   │                │              │                 │  Indexer     │
//! │ Marketplace  │                └──────────────┘                 └──────────────┘
//! └──────────────┘
//! ```
//!
//! Consistency faults are published on the dead-letter topic.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventTopic, ListingCloseReason, NameServiceEvent};
pub use publisher::{EventPublisher, InMemoryEventBus, NoopPublisher};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
