//! Core library for the drydock deployment pipeline tooling.
//!
//! Resolves git hosting services to their API dialect ("git kind"), keeps
//! durable host-to-kind records consistent, and derives default promotion
//! workflows from the environments flagged for automatic promotion.

pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod names;
pub mod services;
pub mod ui;
