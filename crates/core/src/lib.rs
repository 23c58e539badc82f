//! # d2j
//!
//! Host-testable core of the d2j web shell: the route table, the database key
//! accessor over an injectable key-value store, build-time configuration and
//! the request/response contract of the backend's `/api/database` surface.
//!
//! Nothing in here touches the browser. The wasm-only pieces (localStorage,
//! `fetch`, Leptos views) live in the `d2j_web` crate and plug into the traits
//! and types defined here.
//!
//! ## Modules
//!
//! - [`routes`]: Static route table and path resolution
//! - [`storage`]: `databaseKey` accessor and the [`storage::KeyValueStore`] seam
//! - [`config`]: API URL, router base path, route set
//! - [`api`]: Backend endpoints, bodies, response classification

pub mod api;
pub mod config;
pub mod error;
pub mod routes;
pub mod storage;

pub use config::AppConfig;
pub use error::{ApiError, ConfigError, StorageError};
pub use routes::{RouteEntry, RouteSet, RouteTable, ViewKind};
pub use storage::{KeyStorage, KeyValueStore, MemoryStore, DATABASE_KEY};
