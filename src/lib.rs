//! # shacl-ui: Shape-Driven Entity Workbench
//!
//! Renders and edits typed RDF entities from SHACL shapes fetched at
//! runtime instead of hand-written per-type forms.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `SparqlStore` is the contract between the engine and the triple store
//! 2. **Clean DTOs**: `ShapeProperty`, `EntityValues`, `EntityTypeNode` cross all boundaries
//! 3. **Pure resolution**: hierarchy building and widget resolution do no I/O
//! 4. **Explicit depth**: nested rendering is bounded by a parameter, not the call stack
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shacl_ui::{EntityValues, RawValue, Workbench};
//!
//! # async fn example() -> shacl_ui::Result<()> {
//! let bench = Workbench::open_memory().await?;
//!
//! let values = EntityValues::new()
//!     .with("https://purl.org/archimate#Name", RawValue::literal("Alpha"));
//! let id = bench.create("https://purl.org/archimate#BusinessActor", &values).await?;
//!
//! let view = bench.render_entity(id.as_str(), "https://purl.org/archimate#BusinessActor").await?;
//! println!("{}", shacl_ui::present::render_text(&view));
//! # Ok(())
//! # }
//! ```
//!
//! ## Stores
//!
//! | Store | Feature | Description |
//! |-------|---------|-------------|
//! | Memory | (default) | In-memory triple set for testing/embedding |
//! | Http | `http` | GraphDB repository over the SPARQL 1.1 protocol |

// ============================================================================
// Modules
// ============================================================================

pub mod vocab;
pub mod model;
pub mod storage;
pub mod hierarchy;
pub mod widget;
pub mod codec;
pub mod catalog;
pub mod entity;
pub mod render;
pub mod form;
pub mod present;
pub mod slot;
pub mod config;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Term, Triple, Binding, ShapeProperty, EntityId, EntityValues, RawValue,
    ValueKind, EntityTypeNode, TypeSummary,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{SparqlStore, StoreConfig, StoreCapabilities, MemoryStore, Query, Update};
#[cfg(feature = "http")]
pub use storage::HttpStore;

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use catalog::Catalog;
pub use config::WorkbenchConfig;
pub use entity::EntityWriter;
pub use form::{FormField, FormResolver, FormView};
pub use hierarchy::{build_hierarchy, HierarchyFacts, SubclassEdge};
pub use render::{EntityView, Fallback, FieldView, Renderer, TableView, ViewValue};
pub use slot::{Slot, Ticket};
pub use widget::{EditorKind, ViewerKind};

// ============================================================================
// Top-level Workbench handle
// ============================================================================

/// The primary entry point. A `Workbench` wraps a store and exposes the
/// in-process operations of the engine.
pub struct Workbench<S: SparqlStore> {
    store: S,
    config: WorkbenchConfig,
}

impl<S: SparqlStore> Workbench<S> {
    /// Create a workbench over `store` with default settings.
    pub fn with_store(store: S) -> Self {
        Self { store, config: WorkbenchConfig::default() }
    }

    pub fn with_config(store: S, config: WorkbenchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    /// Access the underlying store (for advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> Catalog<'_, S> {
        Catalog::new(&self.store).with_page_size(self.config.picker_page_size)
    }

    pub fn renderer(&self) -> Renderer<'_, S> {
        Renderer::new(self.catalog())
            .with_max_depth(self.config.max_depth)
            .with_row_fan_out(self.config.row_fan_out)
    }

    pub fn forms(&self) -> FormResolver<'_, S> {
        FormResolver::new(self.catalog()).with_max_depth(self.config.max_depth)
    }

    pub fn writer(&self) -> EntityWriter<'_, S> {
        EntityWriter::new(&self.store, &self.config)
    }

    // --- read side ---

    pub async fn list_types(&self) -> Result<Vec<TypeSummary>> {
        self.catalog().list_types().await
    }

    pub async fn list_properties(&self, class: &str) -> Result<Vec<ShapeProperty>> {
        self.catalog().list_properties(class).await
    }

    pub async fn get_values(&self, entity: &str, class: &str) -> Result<EntityValues> {
        self.catalog().get_values(entity, class).await
    }

    pub async fn list_entities(&self, class: &str) -> Result<Vec<TypeSummary>> {
        self.catalog().list_entities(class).await
    }

    pub async fn type_tree(&self) -> Result<Vec<EntityTypeNode>> {
        self.catalog().type_tree().await
    }

    pub async fn class_ancestors(&self, class: &str) -> Result<Vec<TypeSummary>> {
        self.catalog().class_ancestors(class).await
    }

    // --- write side ---

    pub async fn create(&self, class: &str, values: &EntityValues) -> Result<EntityId> {
        self.writer().create(class, values).await
    }

    pub async fn update(&self, entity: &EntityId, class: &str, values: &EntityValues) -> Result<()> {
        self.writer().update(entity, class, values).await
    }

    pub async fn delete(&self, entity: &EntityId) -> Result<()> {
        self.writer().delete(entity).await
    }

    // --- views ---

    pub async fn render_entity(&self, entity: &str, class: &str) -> Result<EntityView> {
        self.renderer().render_entity(entity, class).await
    }

    pub async fn resolve_form(&self, class: &str) -> Result<FormView> {
        self.forms().resolve_form(class).await
    }
}

/// In-memory workbench for testing and embedding.
impl Workbench<MemoryStore> {
    pub async fn open_memory() -> Result<Self> {
        Ok(Self::with_store(MemoryStore::new()))
    }
}

#[cfg(feature = "http")]
impl Workbench<HttpStore> {
    /// Connect to the repository named by `config`.
    pub async fn connect(config: &StoreConfig, workbench: WorkbenchConfig) -> Result<Self> {
        let store = HttpStore::from_config(config)?;
        Self::with_config(store, workbench)
    }

    /// Statement count of the repository.
    pub async fn health(&self) -> Result<u64> {
        self.store.health().await
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Update of {entity} removed its values but could not write the new ones")]
    PartialUpdate {
        entity: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Short message for the person using the form.
    pub fn user_message(&self) -> String {
        match self {
            Error::Transport(_) => "Failed to reach the data store".to_string(),
            Error::Decode(_) | Error::Json(_) => "Failed to load data: unexpected store response".to_string(),
            Error::InvalidShape(_) => "Failed to load properties: invalid shape definition".to_string(),
            Error::NotFound(what) => format!("Not found: {what}"),
            Error::PartialUpdate { .. } => {
                "Failed to save: the entity's old values were removed but the new ones were not written. Please retry."
                    .to_string()
            }
            Error::Config(msg) => format!("Invalid configuration: {msg}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
