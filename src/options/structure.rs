use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which structure text format to expect.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum FormatPreference {
    /// Decide per file from its extension, then its content.
    #[default]
    Auto,
    /// Always parse legacy fixed-column PDB.
    Pdb,
    /// Always parse mmCIF.
    Mmcif,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[schemars(title = "Structure", inline)]
#[serde(default)]
/// Where structure files live and how to read them.
pub struct StructureOptions {
    /// Prefix joined in front of each record's structure reference. Empty
    /// means references are used as-is.
    #[schemars(title = "Base Path")]
    pub base_path: String,
    /// Structure text format.
    #[schemars(title = "Format")]
    pub format: FormatPreference,
}

impl StructureOptions {
    /// Resolve a record's structure reference against [`Self::base_path`].
    #[must_use]
    pub fn resolve(&self, reference: &str) -> String {
        if self.base_path.is_empty()
            || reference.contains("://")
            || reference.starts_with('/')
        {
            return reference.to_owned();
        }
        format!("{}/{}", self.base_path.trim_end_matches('/'), reference)
    }
}
