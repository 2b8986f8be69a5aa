//! tourbase: a TTL-cached, subscription-managed data-access layer for a
//! vehicle-rental and tour-booking platform.
//!
//! The layer sits between typed domain services and a remote document
//! store, adding three things the store does not provide by itself:
//!
//! - cache-aside reads with per-entry TTL ([`reader::ResourceReader`] over
//!   [`cache::MemoryCache`]),
//! - deduplicated live subscriptions with clean teardown
//!   ([`subscriptions::SubscriptionRegistry`]),
//! - atomic multi-document writes with scoped cache invalidation
//!   ([`batch::BatchMutator`]).
//!
//! Everything is wired together by [`hub::DataHub`]; consumers hold a hub
//! and talk to its typed services. The remote store is always the source
//! of truth; nothing in this layer survives a restart or needs to.

pub mod batch;
pub mod cache;
pub mod config;
pub mod hub;
pub mod reader;
pub mod services;
pub mod store;
pub mod subscriptions;

pub use tourbase_core as core;
