//! discus - sync GitHub Discussions into a local JSON content tree
//!
//! This crate provides the core functionality for the `discus` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Client and source configuration
//! - [`client`] - GitHub GraphQL API client
//! - [`normalize`] - Slug generation, checksums, record mapping
//! - [`model`] - Data types (Record, SyncState)
//! - [`storage`] - File-per-record content store and sync ledger
//! - [`sync`] - Diff/sync engine and per-source runner
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod storage;
pub mod sync;

pub use error::{Error, Result};
