use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name used when an expense points at a category that no longer exists.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// Groups expenses for reporting, with an optional per-period spending ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

impl Category {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, icon, color)
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            budget: None,
        }
    }
}

/// Categories seeded into a fresh budget document.
pub fn default_categories() -> Vec<Category> {
    [
        ("housing", "Housing", "H", "#264653"),
        ("food", "Food & Dining", "F", "#2a9d8f"),
        ("transport", "Transportation", "T", "#457b9d"),
        ("utilities", "Utilities", "U", "#e9c46a"),
        ("entertainment", "Entertainment", "E", "#f4a261"),
        ("shopping", "Shopping", "S", "#e76f51"),
        ("health", "Health", "He", "#84a98c"),
        ("education", "Education", "Ed", "#577590"),
        ("personal", "Personal Care", "P", "#bc6c25"),
        ("subscriptions", "Subscriptions", "Su", "#6d597a"),
        ("savings", "Savings", "Sa", "#2d6a4f"),
        ("other", "Other", "O", "#6c757d"),
    ]
    .into_iter()
    .map(|(id, name, icon, color)| Category::with_id(id, name, icon, color))
    .collect()
}
