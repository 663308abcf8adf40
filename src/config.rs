//! Engine settings.

use serde::Deserialize;

use crate::widget::PICKER_PAGE_SIZE;
use crate::{Error, Result};

pub const DEFAULT_NAMESPACE: &str = "http://archigraph.org/data";
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Settings shared by every operation of a [`crate::Workbench`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Namespace new entity identifiers are minted under.
    pub namespace: String,
    /// Nested views at this depth or deeper fall back to a label.
    pub max_depth: usize,
    /// Candidates loaded by a reference picker.
    pub picker_page_size: usize,
    /// Concurrent row fetches of one table view.
    pub row_fan_out: usize,
    /// Extra insert attempts after the delete phase of a non-atomic update.
    pub update_retries: usize,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            picker_page_size: PICKER_PAGE_SIZE,
            row_fan_out: 8,
            update_retries: 1,
        }
    }
}

impl WorkbenchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(Error::Config("namespace must not be empty".into()));
        }
        if self.row_fan_out == 0 {
            return Err(Error::Config("row_fan_out must be at least 1".into()));
        }
        if self.picker_page_size == 0 {
            return Err(Error::Config("picker_page_size must be at least 1".into()));
        }
        Ok(())
    }
}
