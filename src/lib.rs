//! todod - Personal Todo-Tracking Library
//!
//! This library provides the core functionality for the todod service: a
//! per-owner todo store with a composable query and aggregation engine,
//! exposed over a small HTTP API.
//!
//! # Core Concepts
//!
//! - **Ownership**: every stored record belongs to exactly one owner, and
//!   every operation is scoped to the caller's records
//! - **Query Engine**: listing requests compile to a conjunction of filter
//!   clauses evaluated against the owner's todos
//! - **Pagination**: filtered results are served in fixed-size pages with a
//!   total-count envelope
//! - **Statistics**: per-owner completion and priority tallies, computed over
//!   the full collection independent of any listing filter
//!
//! # Module Organization
//!
//! - `api`: HTTP routes and request handling using axum
//! - `attachments`: attachment sink contract and local-disk implementation
//! - `config`: Configuration loading from `todod.toml`
//! - `error`: Error types and result aliases
//! - `identity`: bearer-token to owner resolution
//! - `lock`: File locking and atomic operations for concurrency safety
//! - `model`: Todo and category records and their wire forms
//! - `query`: filter clause compilation, matching, and pagination
//! - `stats`: per-owner aggregate statistics
//! - `store`: JSON-file-backed collections with per-document atomicity

pub mod api;
pub mod attachments;
pub mod config;
pub mod error;
pub mod identity;
pub mod lock;
pub mod model;
pub mod query;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
