//! Domain types and business logic for The Verse publishing backend.
//!
//! Everything in this crate is independent of the HTTP layer: the embedded
//! comment/reply tree, the rating aggregate, testimonial and site-config
//! models, and JWT credential verification. The `api` crate owns routing,
//! extraction, and SQL.

pub mod auth;
pub mod site_config;
pub mod story;
pub mod testimonial;
pub mod user;
