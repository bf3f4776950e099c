use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Table", inline)]
#[serde(default)]
/// Results table sizing and display.
pub struct TableOptions {
    /// Rows shown right after the dataset loads, before any search.
    #[schemars(title = "Initial Rows", range(min = 1))]
    pub initial_rows: usize,
    /// Upper bound on rows shown for a search result.
    #[schemars(title = "Display Cap", range(min = 1))]
    pub display_cap: usize,
    /// Text shown in place of a numeric value that cannot be displayed.
    #[schemars(title = "Missing Value Indicator")]
    pub missing_indicator: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            initial_rows: 200,
            display_cap: 500,
            missing_indicator: "n/a".to_owned(),
        }
    }
}
