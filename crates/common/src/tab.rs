use serde::{Deserialize, Serialize};

/// Gallery tab selected in the UI. Persisted so a reload reopens it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Image,
    Text,
}
