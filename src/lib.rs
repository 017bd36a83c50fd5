//! toolbelt - Everyday Utilities Library
//!
//! This library provides the core functionality for the toolbelt CLI:
//! five small utilities sharing one data directory.
//!
//! # Core Concepts
//!
//! - **Calculator**: Arithmetic evaluator plus a key-driven display state
//! - **Rock-paper-scissors**: Round resolution, session scores, high score
//! - **Contacts**: Name/phone/email/address records with search
//! - **Passwords**: Class-constrained generation and strength scoring
//! - **To-do**: Positional task list with filter and status
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `toolbelt.toml`
//! - `error`: Error types and result aliases
//! - `output`: JSON envelope and human rendering
//! - `storage`: Data directory and flat-file persistence
//! - `lock`: File locking and atomic writes for concurrency safety

pub mod calc;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod lock;
pub mod output;
pub mod password;
pub mod rps;
pub mod storage;
pub mod todo;

pub use error::{Error, Result};
