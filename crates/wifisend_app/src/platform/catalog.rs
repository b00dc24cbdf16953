use std::path::PathBuf;

use wifisend_core::{Catalog, CatalogError, ItemId};

/// Catalog over the files named on a `send` line. Entry ids are 1-based
/// positions; the title is the file stem and the only format an entry has is
/// its own extension.
#[derive(Debug, Clone)]
pub(crate) struct FileCatalog {
    paths: Vec<PathBuf>,
}

impl FileCatalog {
    pub(crate) fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn entry(&self, id: ItemId) -> Result<&PathBuf, CatalogError> {
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.paths.get(index))
            .ok_or_else(|| CatalogError(format!("no entry with id {id}")))
    }
}

impl Catalog for FileCatalog {
    fn selected_ids(&self) -> Vec<ItemId> {
        (1..=self.paths.len() as ItemId).collect()
    }

    fn title(&self, id: ItemId) -> Result<Option<String>, CatalogError> {
        let path = self.entry(id)?;
        Ok(path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(ToOwned::to_owned))
    }

    fn format_path(&self, id: ItemId, format: &str) -> Result<Option<PathBuf>, CatalogError> {
        let path = self.entry(id)?;
        if !path.exists() {
            return Err(CatalogError("file not found".to_string()));
        }
        let has_format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(format));
        if !has_format || !path.is_file() {
            return Ok(None);
        }
        path.canonicalize()
            .map(Some)
            .map_err(|err| CatalogError(format!("{}: {err}", path.display())))
    }
}
