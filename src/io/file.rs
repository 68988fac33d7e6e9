use std::path::Path;

use crate::error::StoreError;
use crate::model::ProjectStore;

/// Save a roadmap to a JSON file.
pub fn save_store(store: &ProjectStore, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(store)?;
    std::fs::write(path, json).map_err(|e| StoreError::io(path, e))?;
    tracing::info!(path = %path.display(), projects = store.projects().len(), "roadmap saved");
    Ok(())
}

/// Load a roadmap from a JSON file.
pub fn load_store(path: &Path) -> Result<ProjectStore, StoreError> {
    let json = std::fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let mut store: ProjectStore = serde_json::from_str(&json)?;
    // Fresh revision so cached layouts from the previous store are invalidated.
    store.touch();
    tracing::info!(path = %path.display(), projects = store.projects().len(), "roadmap loaded");
    Ok(store)
}
