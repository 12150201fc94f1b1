//! Research paper and semantic memory services over MCP.
//!
//! Two services share one SQLite database:
//!
//! - **Papers**: a title-keyed store. Lookups that miss an exact title fall back
//!   to the closest stored title within a small, case-insensitive Levenshtein
//!   distance ([`papers::resolver`]).
//! - **Memory**: id-keyed text embedded into a sqlite-vec index and recalled by
//!   cosine similarity ([`memory`]).
//!
//! # Modules
//!
//! - [`config`]: TOML config file plus environment overrides
//! - [`db`]: SQLite initialization, schema, migrations, and health checks
//! - [`embedding`]: text-to-vector providers (ONNX MiniLM, FNV hashing)
//! - [`papers`]: key-value store abstraction, edit distance, title resolution
//! - [`memory`]: vector index abstraction and memory operations

pub mod config;
pub mod db;
pub mod embedding;
pub mod memory;
pub mod papers;
