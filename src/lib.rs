//! Linktally - click/view analytics engine for a link-in-bio backend
//!
//! Turns a stream of raw redirect-interaction events (one row per click,
//! carrying client IP and User-Agent) into day-bucketed, incrementally
//! refreshed summary rows, and fronts those summaries with a short-TTL
//! response cache. Recomputation is pull-driven: rows are materialized
//! and refreshed lazily when read, never by a background scheduler.
//!
//! # Architecture
//! - `analytics`: the aggregation core (per-day get-or-refresh, range and
//!   summary drivers, interaction recorder, response DTOs)
//! - `storage`: SeaORM storage backend and the repository seam over the
//!   two link families (social-media links, custom short links)
//! - `cache`: cache-aside response layer (memory / Redis)
//! - `device`: User-Agent device classification
//! - `config`: configuration management
//! - `errors`: crate-wide error type
//!
//! Authentication, link CRUD, HTTP routing and file upload live in
//! out-of-scope collaborators: this crate receives already-resolved
//! caller identities and raw bearer tokens for cache keying only.

pub mod analytics;
pub mod cache;
pub mod config;
pub mod device;
pub mod errors;
pub mod logging;
pub mod storage;
