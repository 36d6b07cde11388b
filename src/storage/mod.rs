pub mod backup;
pub mod json_backend;

use crate::{errors::Result, ledger::BudgetState};

/// Abstraction over persistence backends able to hold the budget document.
pub trait StorageBackend: Send + Sync {
    /// Loads the stored document, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<BudgetState>>;
    fn save(&self, state: &BudgetState) -> Result<()>;
}

pub use backup::{
    backup_file_name, csv_file_name, export_backup, export_csv, import_backup,
};
pub use json_backend::JsonStorage;
