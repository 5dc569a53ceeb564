//! Titantrack: an offline-first workout tracker.
//!
//! Devices keep every record in a [`store::LocalStore`] and converge through
//! full-collection round-trips against the reconciliation [`server`].

pub mod api;
pub mod config;
pub mod models;
pub mod server;
pub mod store;
pub mod sync;
