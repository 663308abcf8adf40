//! # Nested Entity Renderer
//!
//! Resolves an entity into a [`EntityView`] tree: one [`FieldView`] per
//! property rule, each with its viewer and its displayed values. Reference
//! values shown with a nested viewer recurse:
//!
//! - `Details`: the referenced entity inline, as another [`EntityView`];
//! - `ValueTable`: all referenced entities as one [`TableView`] whose
//!   columns are the target type's properties.
//!
//! Depth is explicit. The top entity is depth 0, what it references is
//! depth 1, and so on. A nested view at `max_depth` or deeper, a reference
//! without a target type, a target type without properties, a referenced
//! entity without values, or a failed read degrades to a
//! [`ViewValue::Label`]. Only the top-level reads can fail a render.
//!
//! Table rows are fetched concurrently, at most `row_fan_out` at a time.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::catalog::Catalog;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::model::{EntityValues, RawValue, ShapeProperty};
use crate::storage::SparqlStore;
use crate::vocab;
use crate::widget::{resolve_viewer, ViewerKind};
use crate::Result;

/// Why a reference is shown as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fallback {
    DepthExceeded,
    NoTargetType,
    MissingShape,
    NoValues,
    /// The store failed while resolving the reference.
    Unavailable,
}

/// One displayed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewValue {
    Literal { text: String, value: RawValue },
    Nested(Box<EntityView>),
    Table(TableView),
    Label { target: String, label: String, reason: Fallback },
}

impl ViewValue {
    fn label(target: &str, reason: Fallback) -> Self {
        ViewValue::Label {
            target: target.to_string(),
            label: vocab::local_name(target).to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub property: ShapeProperty,
    pub viewer: ViewerKind,
    pub values: Vec<ViewValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub entity: String,
    pub class: String,
    pub depth: usize,
    pub fields: Vec<FieldView>,
}

impl EntityView {
    pub fn field(&self, path: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.property.path == path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub entity: String,
    /// One cell per column, in column order. Empty when `fallback` is set.
    pub cells: Vec<FieldView>,
    pub fallback: Option<Fallback>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub class: String,
    pub depth: usize,
    pub columns: Vec<ShapeProperty>,
    pub rows: Vec<TableRow>,
}

/// View resolution over one catalog.
pub struct Renderer<'s, S: SparqlStore> {
    catalog: Catalog<'s, S>,
    max_depth: usize,
    row_fan_out: usize,
}

impl<'s, S: SparqlStore> Renderer<'s, S> {
    pub fn new(catalog: Catalog<'s, S>) -> Self {
        Self { catalog, max_depth: DEFAULT_MAX_DEPTH, row_fan_out: 8 }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_row_fan_out(mut self, row_fan_out: usize) -> Self {
        self.row_fan_out = row_fan_out.max(1);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Full view of `entity` as an instance of `class`.
    #[instrument(skip(self), level = "debug")]
    pub async fn render_entity(&self, entity: &str, class: &str) -> Result<EntityView> {
        let properties = self.catalog.list_properties(class).await?;
        let values = self.catalog.get_values(entity, class).await?;
        let fields = self.render_fields(&properties, &values, 0).await;
        Ok(EntityView { entity: entity.to_string(), class: class.to_string(), depth: 0, fields })
    }

    /// One referenced entity at `depth`. Never fails.
    pub fn render_nested<'a>(
        &'a self,
        target: &'a str,
        class: Option<&'a str>,
        depth: usize,
    ) -> BoxFuture<'a, ViewValue> {
        async move {
            if depth >= self.max_depth {
                return ViewValue::label(target, Fallback::DepthExceeded);
            }
            let Some(class) = class else {
                return ViewValue::label(target, Fallback::NoTargetType);
            };
            let properties = match self.catalog.list_properties(class).await {
                Ok(p) if p.is_empty() => return ViewValue::label(target, Fallback::MissingShape),
                Ok(p) => p,
                Err(e) => {
                    warn!(entity = target, class, error = %e, "nested shape unavailable");
                    return ViewValue::label(target, Fallback::Unavailable);
                }
            };
            let values = match self.catalog.get_values(target, class).await {
                Ok(v) if v.is_empty() => return ViewValue::label(target, Fallback::NoValues),
                Ok(v) => v,
                Err(e) => {
                    warn!(entity = target, class, error = %e, "nested values unavailable");
                    return ViewValue::label(target, Fallback::Unavailable);
                }
            };
            let fields = self.render_fields(&properties, &values, depth).await;
            ViewValue::Nested(Box::new(EntityView {
                entity: target.to_string(),
                class: class.to_string(),
                depth,
                fields,
            }))
        }
        .boxed()
    }

    /// Referenced entities as table rows at `depth`. Degrades to one label
    /// per target when the table itself cannot be resolved.
    pub fn render_table<'a>(
        &'a self,
        targets: &'a [&'a str],
        class: Option<&'a str>,
        depth: usize,
    ) -> BoxFuture<'a, Vec<ViewValue>> {
        async move {
            let labels = |reason: Fallback| -> Vec<ViewValue> {
                targets.iter().map(|t| ViewValue::label(t, reason)).collect()
            };
            if targets.is_empty() {
                return Vec::new();
            }
            if depth >= self.max_depth {
                return labels(Fallback::DepthExceeded);
            }
            let Some(class) = class else {
                return labels(Fallback::NoTargetType);
            };
            let columns = match self.catalog.list_properties(class).await {
                Ok(c) if c.is_empty() => return labels(Fallback::MissingShape),
                Ok(c) => c,
                Err(e) => {
                    warn!(class, error = %e, "table shape unavailable");
                    return labels(Fallback::Unavailable);
                }
            };

            let pending: Vec<BoxFuture<'_, TableRow>> = targets
                .iter()
                .map(|entity| self.render_row(entity, class, &columns, depth).boxed())
                .collect();
            let rows: Vec<TableRow> = stream::iter(pending).buffered(self.row_fan_out).collect().await;
            debug!(class, rows = rows.len(), depth, "resolved table");
            vec![ViewValue::Table(TableView { class: class.to_string(), depth, columns, rows })]
        }
        .boxed()
    }

    async fn render_row(&self, entity: &str, class: &str, columns: &[ShapeProperty], depth: usize) -> TableRow {
        let fallback = |reason: Fallback| TableRow {
            entity: entity.to_string(),
            cells: Vec::new(),
            fallback: Some(reason),
        };
        match self.catalog.get_values(entity, class).await {
            Ok(values) if values.is_empty() => fallback(Fallback::NoValues),
            Ok(values) => TableRow {
                entity: entity.to_string(),
                cells: self.render_fields(columns, &values, depth).await,
                fallback: None,
            },
            Err(e) => {
                warn!(entity, class, error = %e, "row values unavailable");
                fallback(Fallback::Unavailable)
            }
        }
    }

    /// Fields of an entity shown at `depth`; its references resolve at `depth + 1`.
    async fn render_fields(&self, properties: &[ShapeProperty], values: &EntityValues, depth: usize) -> Vec<FieldView> {
        let mut fields = Vec::with_capacity(properties.len());
        for property in properties {
            let viewer = resolve_viewer(property);
            let raw = values.get(&property.path);
            let values = match viewer {
                ViewerKind::Details => {
                    let mut out = Vec::with_capacity(raw.len());
                    for value in raw {
                        out.push(if value.is_reference() {
                            self.render_nested(&value.value, property.target_type(), depth + 1).await
                        } else {
                            literal(viewer, value)
                        });
                    }
                    out
                }
                ViewerKind::ValueTable => {
                    let targets: Vec<&str> =
                        raw.iter().filter(|v| v.is_reference()).map(|v| v.value.as_str()).collect();
                    let mut out = self.render_table(&targets, property.target_type(), depth + 1).await;
                    out.extend(raw.iter().filter(|v| !v.is_reference()).map(|v| literal(viewer, v)));
                    out
                }
                _ => raw.iter().map(|v| literal(viewer, v)).collect(),
            };
            fields.push(FieldView { property: property.clone(), viewer, values });
        }
        fields
    }
}

fn literal(viewer: ViewerKind, value: &RawValue) -> ViewValue {
    ViewValue::Literal { text: viewer.display(value), value: value.clone() }
}
