//! newsharvest: incremental news-article collection for sentiment research.
//!
//! The crate is organized around a single sequential pipeline:
//! - [`profiles`] knows how to recognize article links and body containers
//!   per outlet;
//! - [`discover`] turns a seed page into candidate article URLs (feed first,
//!   HTML patterns second, section pages last);
//! - [`extract`] turns a fetched page into title, body text, and word count;
//! - [`store`] owns the SQLite schema, idempotent inserts, batch transaction
//!   boundaries, and point-in-time backups;
//! - [`crawl`] drives the whole thing per source with dedup checks, quality
//!   gates, and politeness delays.

pub mod commands;
pub mod config;
pub mod crawl;
pub mod discover;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod profiles;
pub mod store;
