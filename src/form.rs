//! Edit side of the renderer: which editor each property gets, what kind
//! of value it produces, and how raw form input becomes entity values.
//!
//! `sh:node` properties carry an inline form of the referenced shape,
//! subject to the same depth bound as nested views.

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::DEFAULT_MAX_DEPTH;
use crate::model::{EntityValues, ShapeProperty, TypeSummary, ValueKind};
use crate::storage::SparqlStore;
use crate::widget::{resolve_editor, Choice, EditorKind};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub property: ShapeProperty,
    pub editor: EditorKind,
    pub required: bool,
    /// Kind of value the field writes.
    pub value_kind: ValueKind,
    /// Fixed options of select editors.
    pub options: Vec<Choice>,
    pub placeholder: Option<String>,
    pub nested: Option<FormView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub class: String,
    pub depth: usize,
    pub fields: Vec<FormField>,
}

impl FormView {
    pub fn field(&self, path: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.property.path == path)
    }

    /// Turn `(path, input)` pairs into values through each field's editor.
    /// Blank input and unknown paths are skipped; a path may repeat for
    /// multi-valued fields.
    pub fn collect<'i>(&self, inputs: impl IntoIterator<Item = (&'i str, &'i str)>) -> EntityValues {
        let mut values = EntityValues::new();
        for (path, input) in inputs {
            let Some(field) = self.field(path) else { continue };
            if let Some(value) = field.editor.pending_value(&field.property, input) {
                values.push(path, value);
            }
        }
        values
    }

    /// Required fields without a value in `values`.
    pub fn missing_required<'f>(&'f self, values: &EntityValues) -> Vec<&'f str> {
        self.fields
            .iter()
            .filter(|f| f.required && values.get(&f.property.path).is_empty())
            .map(|f| f.property.path.as_str())
            .collect()
    }
}

/// Form resolution over one catalog.
pub struct FormResolver<'s, S: SparqlStore> {
    catalog: Catalog<'s, S>,
    max_depth: usize,
}

impl<'s, S: SparqlStore> FormResolver<'s, S> {
    pub fn new(catalog: Catalog<'s, S>) -> Self {
        Self { catalog, max_depth: DEFAULT_MAX_DEPTH }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub async fn resolve_form(&self, class: &str) -> Result<FormView> {
        self.resolve_at(class, 0).await
    }

    fn resolve_at<'a>(&'a self, class: &'a str, depth: usize) -> BoxFuture<'a, Result<FormView>> {
        async move {
            let properties = self.catalog.list_properties(class).await?;
            let mut fields = Vec::with_capacity(properties.len());
            for property in properties {
                let nested = match property.referenced_shape.as_deref() {
                    Some(shape) if depth + 1 < self.max_depth => self.inline_form(shape, depth + 1).await,
                    _ => None,
                };
                let editor = resolve_editor(&property);
                fields.push(FormField {
                    required: property.is_required(),
                    value_kind: value_kind(&property),
                    options: editor.options(&property),
                    placeholder: editor.placeholder(&property).map(str::to_string),
                    editor,
                    nested,
                    property,
                });
            }
            Ok(FormView { class: class.to_string(), depth, fields })
        }
        .boxed()
    }

    async fn inline_form(&self, shape: &str, depth: usize) -> Option<FormView> {
        match self.resolve_at(shape, depth).await {
            Ok(form) if form.fields.is_empty() => None,
            Ok(form) => Some(form),
            Err(e) => {
                warn!(shape, error = %e, "inline form unavailable");
                None
            }
        }
    }

    /// Picker candidates for a reference property.
    pub async fn candidates(&self, property: &ShapeProperty) -> Result<Vec<TypeSummary>> {
        match property.target_type() {
            Some(class) => self.catalog.list_instances(class).await,
            None => Ok(Vec::new()),
        }
    }
}

fn value_kind(property: &ShapeProperty) -> ValueKind {
    if property.is_reference() {
        ValueKind::Reference
    } else {
        ValueKind::Literal { datatype: property.datatype.clone(), lang: None }
    }
}
