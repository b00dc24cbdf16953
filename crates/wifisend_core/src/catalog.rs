use std::path::PathBuf;

use thiserror::Error;

use crate::{FailedItem, Job};

pub type ItemId = u64;

/// Format every transferred item must be available in.
pub const TRANSFER_FORMAT: &str = "EPUB";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CatalogError(pub String);

/// Library the user selects items from.
pub trait Catalog {
    /// Identifiers of the currently selected entries, in display order.
    fn selected_ids(&self) -> Vec<ItemId>;
    fn title(&self, id: ItemId) -> Result<Option<String>, CatalogError>;
    /// Absolute path of the file holding `id` in `format`, or `None` if the
    /// entry has no such format.
    fn format_path(&self, id: ItemId, format: &str) -> Result<Option<PathBuf>, CatalogError>;
}

/// Outcome of pre-flight resolution: the jobs worth handing to the worker and
/// the entries already known to fail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub selected: usize,
    pub jobs: Vec<Job>,
    pub preflight_failures: Vec<FailedItem>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.selected == 0
    }
}

pub fn resolve_selection(catalog: &dyn Catalog, format: &str) -> Selection {
    let ids = catalog.selected_ids();
    let mut selection = Selection {
        selected: ids.len(),
        ..Selection::default()
    };

    for id in ids {
        let title = match catalog.title(id) {
            Ok(Some(title)) if !title.trim().is_empty() => title,
            Ok(_) => fallback_title(id),
            Err(err) => {
                selection.preflight_failures.push(FailedItem::new(
                    fallback_title(id),
                    format!("catalog lookup failed: {err}"),
                ));
                continue;
            }
        };

        match catalog.format_path(id, format) {
            Ok(Some(source_path)) => selection.jobs.push(Job { title, source_path }),
            Ok(None) => selection
                .preflight_failures
                .push(FailedItem::new(title, format!("no {format} format"))),
            Err(err) => selection
                .preflight_failures
                .push(FailedItem::new(title, format!("catalog lookup failed: {err}"))),
        }
    }

    selection
}

fn fallback_title(id: ItemId) -> String {
    format!("Item #{id}")
}
