//! # Shape & Entity Model
//!
//! DTOs shared by the catalog, the widget resolvers, the codec and the
//! renderer.
//!
//! Design rule: NO store handles, NO query text here.
//! This module is pure data with no I/O.

pub mod term;
pub mod shape;
pub mod entity;
pub mod type_node;

pub use term::{Term, Triple, Binding};
pub use shape::{ShapeProperty, DEFAULT_ORDER};
pub use entity::{EntityId, EntityValues, RawValue, ValueKind, Values};
pub use type_node::{EntityTypeNode, TypeSummary};
