//! Core types for the tourbase data-access layer.
//!
//! This crate holds the pure building blocks shared by every backend:
//! the [`store`] abstraction over a remote document database, the [`cache`]
//! traits and key scheme, and the typed [`catalog`] records for the
//! rental/tour domain. It performs no I/O of its own.

pub mod cache;
pub mod catalog;
pub mod store;
