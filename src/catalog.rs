//! # Shape Catalog
//!
//! Read side of the engine: types, their property rules, hierarchy facts
//! and entity values. Every call is one or more store reads; nothing here
//! caches. A class without any shape yields an empty property list.

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::codec;
use crate::hierarchy::{self, HierarchyFacts, SubclassEdge};
use crate::model::shape::normalize;
use crate::model::{Binding, EntityTypeNode, EntityValues, ShapeProperty, Term, TypeSummary, DEFAULT_ORDER};
use crate::slot::Slot;
use crate::storage::{Query, SparqlStore};
use crate::vocab;
use crate::widget::PICKER_PAGE_SIZE;
use crate::{Error, Result};

/// Read access to shapes and entities of one store.
pub struct Catalog<'s, S: SparqlStore> {
    store: &'s S,
    page_size: usize,
}

impl<S: SparqlStore> Clone for Catalog<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: SparqlStore> Copy for Catalog<'_, S> {}

impl<'s, S: SparqlStore> Catalog<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store, page_size: PICKER_PAGE_SIZE }
    }

    /// Candidate limit of [`Catalog::list_instances`].
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Every shape-bearing class, ordered by label.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_types(&self) -> Result<Vec<TypeSummary>> {
        let rows = self.store.select(&Query::EntityTypes).await?;
        let mut types = Vec::with_capacity(rows.len());
        for row in &rows {
            types.push(summary(row, "class")?);
        }
        types.sort_by(|a, b| hierarchy::label_order(&a.label, &a.uri, &b.label, &b.uri));
        let mut seen = hashbrown::HashSet::new();
        types.retain(|t| seen.insert(t.uri.clone()));
        debug!(count = types.len(), "loaded entity types");
        Ok(types)
    }

    pub async fn hierarchy_facts(&self) -> Result<HierarchyFacts> {
        let rows = self.store.select(&Query::HierarchyFacts).await?;
        HierarchyFacts::from_rows(&rows)
    }

    /// The type browser forest.
    #[instrument(skip(self), level = "debug")]
    pub async fn type_tree(&self) -> Result<Vec<EntityTypeNode>> {
        Ok(hierarchy::build_hierarchy(&self.hierarchy_facts().await?))
    }

    /// Ancestors of `class`, root first, excluding `class` itself.
    #[instrument(skip(self), level = "debug")]
    pub async fn class_ancestors(&self, class: &str) -> Result<Vec<TypeSummary>> {
        let rows = self.store.select(&Query::SubclassEdges).await?;
        let mut facts = HierarchyFacts::new();
        for row in &rows {
            let child = row.require_iri("child")?;
            let parent = row.require_iri("parent")?;
            if let Some(label) = row.str("parentLabel") {
                facts.labels.entry(parent.to_string()).or_insert_with(|| label.to_string());
            }
            facts.edges.push(SubclassEdge::new(child, parent));
        }
        Ok(hierarchy::ancestor_chain(&facts, class))
    }

    /// Property rules of `class` in display order, enumerations resolved.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_properties(&self, class: &str) -> Result<Vec<ShapeProperty>> {
        let rows = self.store.select(&Query::ShapeProperties { class: class.to_string() }).await?;
        let mut props = Vec::with_capacity(rows.len());
        for row in &rows {
            props.push(property_from_row(row)?);
        }
        let props = normalize(props);

        let enums = try_join_all(props.iter().map(|p| self.enum_values(class, &p.path))).await?;
        let props: Vec<ShapeProperty> = props
            .into_iter()
            .zip(enums)
            .map(|(mut p, values)| {
                if !values.is_empty() {
                    p.enum_values = Some(values);
                }
                p
            })
            .collect();
        debug!(class, count = props.len(), "loaded shape properties");
        Ok(props)
    }

    /// `sh:in` members declared for `path`, in list order.
    pub async fn enum_values(&self, class: &str, path: &str) -> Result<Vec<Term>> {
        let query = Query::EnumValues { class: class.to_string(), path: path.to_string() };
        let rows = self.store.select(&query).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let val = row.require("val")?;
            if !values.contains(val) {
                values.push(val.clone());
            }
        }
        Ok(values)
    }

    /// Every path any rule of `class` declares.
    pub async fn shape_paths(&self, class: &str) -> Result<Vec<String>> {
        let rows = self.store.select(&Query::ShapePaths { class: class.to_string() }).await?;
        let mut paths = Vec::with_capacity(rows.len());
        for row in &rows {
            paths.push(row.require_iri("path")?.to_string());
        }
        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    /// Current values of `entity` at the shape paths of `class`.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_values(&self, entity: &str, class: &str) -> Result<EntityValues> {
        let query = Query::EntityValues { entity: entity.to_string(), class: class.to_string() };
        let rows = self.store.select(&query).await?;
        codec::values_from_rows(&rows)
    }

    /// Every instance of `class` with its display label.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_entities(&self, class: &str) -> Result<Vec<TypeSummary>> {
        self.instances(class, None).await
    }

    /// Picker candidates: the first page of [`Catalog::list_entities`].
    pub async fn list_instances(&self, class: &str) -> Result<Vec<TypeSummary>> {
        self.instances(class, Some(self.page_size)).await
    }

    async fn instances(&self, class: &str, limit: Option<usize>) -> Result<Vec<TypeSummary>> {
        let rows = self.store.select(&Query::Instances { class: class.to_string(), limit }).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let uri = row.require_iri("uri")?;
            let label = row.str("label").unwrap_or(uri);
            out.push(TypeSummary::new(uri, label));
        }
        Ok(out)
    }

    /// Load the properties of `class` into `slot`.
    ///
    /// Returns `Ok(false)` when a newer request took the slot meanwhile; the
    /// result (or failure) of this one is then dropped.
    pub async fn load_properties_into(
        &self,
        slot: &Slot<String, Vec<ShapeProperty>>,
        class: &str,
    ) -> Result<bool> {
        let ticket = slot.begin(class.to_string());
        match self.list_properties(class).await {
            Ok(props) => Ok(slot.complete(&ticket, props)),
            Err(_) if !slot.is_current(&ticket) => {
                debug!(class, "dropping failure of superseded request");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn summary(row: &Binding, var: &str) -> Result<TypeSummary> {
    let uri = row.require_iri(var)?;
    let label = row.str("label").unwrap_or_else(|| vocab::local_name(uri));
    Ok(TypeSummary::new(uri, label))
}

fn count(row: &Binding, var: &str) -> Result<Option<u32>> {
    match row.int(var)? {
        None => Ok(None),
        Some(n) => u32::try_from(n)
            .map(Some)
            .map_err(|_| Error::InvalidShape(format!("?{var} out of range: {n}"))),
    }
}

fn iri_of(row: &Binding, var: &str) -> Option<String> {
    row.get(var).and_then(Term::as_iri).map(str::to_string)
}

/// One row of `Query::ShapeProperties`.
pub fn property_from_row(row: &Binding) -> Result<ShapeProperty> {
    let mut p = ShapeProperty::new(row.require_iri("path")?);
    if let Some(name) = row.str("name").filter(|n| !n.trim().is_empty()) {
        p.name = name.to_string();
    }
    p.description = row.str("description").map(str::to_string);
    p.datatype = iri_of(row, "datatype");
    p.referenced_class = iri_of(row, "class");
    p.referenced_shape = iri_of(row, "node");
    p.editor_hint = iri_of(row, "editor");
    p.viewer_hint = iri_of(row, "viewer");
    p.min_count = count(row, "minCount")?;
    p.max_count = count(row, "maxCount")?;
    p.order = row.int("order")?.unwrap_or(DEFAULT_ORDER);
    p.role = row.str("propertyRole").map(str::to_string);
    Ok(p)
}
