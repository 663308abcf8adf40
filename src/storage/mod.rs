//! # Store Trait
//!
//! This is THE contract between the resolution engine and any triple store.
//! The core only ever reads binding sets and submits writes; connection
//! handling, retries of reads and endpoint selection belong to the backend.
//!
//! ## Implementations
//!
//! | Backend | Module | Description |
//! |---------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory triple set for testing/embedding |
//! | `HttpStore` | `http` | GraphDB / SPARQL 1.1 protocol over HTTP |

pub mod request;
pub mod sparql;
pub mod memory;
#[cfg(feature = "http")]
pub mod http;

use async_trait::async_trait;
use serde::Deserialize;

use crate::model::Binding;
use crate::Result;

pub use memory::MemoryStore;
pub use request::{Query, Update};
#[cfg(feature = "http")]
pub use http::HttpStore;

// ============================================================================
// Store Configuration
// ============================================================================

/// Configuration for connecting to a store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-memory (no persistence)
    Memory,

    /// GraphDB repository over HTTP
    #[cfg(feature = "http")]
    Http {
        url: String,
        repository: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

#[cfg(feature = "http")]
fn default_timeout_secs() -> u64 { 30 }

impl StoreConfig {
    /// `GRAPHDB_URL`, `GRAPHDB_REPOSITORY` and `GRAPHDB_TIMEOUT_SECS`.
    ///
    /// Without the `http` feature this is always [`StoreConfig::Memory`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`StoreConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        #[cfg(feature = "http")]
        {
            let url = lookup("GRAPHDB_URL").unwrap_or_else(|| "http://localhost:7200".to_string());
            let repository = lookup("GRAPHDB_REPOSITORY").unwrap_or_else(|| "archigraph-v4".to_string());
            let timeout_secs = match lookup("GRAPHDB_TIMEOUT_SECS") {
                Some(raw) => raw.parse().map_err(|_| {
                    crate::Error::Config(format!("GRAPHDB_TIMEOUT_SECS is not a number: {raw:?}"))
                })?,
                None => default_timeout_secs(),
            };
            Ok(StoreConfig::Http { url: url.trim_end_matches('/').to_string(), repository, timeout_secs })
        }
        #[cfg(not(feature = "http"))]
        {
            let _ = lookup;
            Ok(StoreConfig::Memory)
        }
    }
}

// ============================================================================
// Store capabilities
// ============================================================================

/// What a store can do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// `Update::Replace` is applied as one atomic request.
    pub atomic_update: bool,
}

// ============================================================================
// SparqlStore Trait
// ============================================================================

/// The store contract.
///
/// Failures are transport/store errors and surface to the caller unchanged;
/// nothing here retries.
#[async_trait]
pub trait SparqlStore: Send + Sync + 'static {
    /// Run a read request and return its solution rows.
    async fn select(&self, query: &Query) -> Result<Vec<Binding>>;

    /// Apply a write request.
    async fn update(&self, update: &Update) -> Result<()>;

    /// Report what this store can do.
    ///
    /// Default: no atomic multi-operation updates.
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::default()
    }
}

#[async_trait]
impl<S: SparqlStore> SparqlStore for std::sync::Arc<S> {
    async fn select(&self, query: &Query) -> Result<Vec<Binding>> {
        (**self).select(query).await
    }

    async fn update(&self, update: &Update) -> Result<()> {
        (**self).update(update).await
    }

    fn capabilities(&self) -> StoreCapabilities {
        (**self).capabilities()
    }
}
