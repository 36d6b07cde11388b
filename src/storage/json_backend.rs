use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::StorageBackend;
use crate::{
    errors::Result,
    ledger::BudgetState,
    utils::paths::{self, ensure_dir, write_atomic},
};

/// Stores the budget document as pretty-printed JSON in the application data directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Uses `root`, or the resolved application data directory when `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(paths::app_data_dir);
        ensure_dir(&root)?;
        Ok(Self {
            path: paths::data_file_in(&root),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Option<BudgetState>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved budget document");
            return Ok(None);
        }
        load_state_from_path(&self.path).map(Some)
    }

    fn save(&self, state: &BudgetState) -> Result<()> {
        save_state_to_path(state, &self.path)?;
        info!(
            path = %self.path.display(),
            incomes = state.incomes.len(),
            expenses = state.expenses.len(),
            "budget document saved"
        );
        Ok(())
    }
}

/// Writes the document to `path` atomically by staging to a temporary file.
pub fn save_state_to_path(state: &BudgetState, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_state_from_path(path: &Path) -> Result<BudgetState> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
