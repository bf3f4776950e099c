//! Centralized explorer options with TOML preset support.
//!
//! Every tweakable setting (dataset location and field mapping, table caps,
//! structure format, base style, highlight radii, camera fit) lives here.
//! Options serialize to/from TOML so a deployment can ship one file per
//! dataset variant.

mod camera;
mod data;
mod structure;
mod style;
mod table;

use std::path::Path;

pub use camera::CameraOptions;
pub use data::{DataOptions, FieldMapping, MetricSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use structure::{FormatPreference, StructureOptions};
pub use style::StyleOptions;
pub use table::TableOptions;

use crate::error::ExplorerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[table]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Dataset source and field mapping.
    pub data: DataOptions,
    /// Results table caps.
    pub table: TableOptions,
    /// Structure file location and format.
    pub structure: StructureOptions,
    /// Base style and neighborhood highlight parameters.
    pub style: StyleOptions,
    /// Camera fit parameters.
    pub camera: CameraOptions,
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ExplorerError> {
        toml::from_str(content)
            .map_err(|e| ExplorerError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ExplorerError> {
        let content = std::fs::read_to_string(path).map_err(ExplorerError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ExplorerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ExplorerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ExplorerError::Io)?;
        }
        std::fs::write(path, content).map_err(ExplorerError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[table]
display_cap = 50
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.table.display_cap, 50);
        // Everything else should be default
        assert_eq!(opts.table.initial_rows, 200);
        assert_eq!(opts.style.neighbor_cutoff, 5.0);
        assert_eq!(opts.data.mapping, FieldMapping::affinity_confidence());
    }

    #[test]
    fn explicit_mapping_from_toml() {
        let toml_str = r#"
[data]
source = "data/predictions.json"

[data.mapping]
receptor = "gpcr"
ligand = "ligand"
structure = "structure"
table_metrics = ["pKi", "score"]

[[data.mapping.metrics]]
key = "pKi"
label = "pKi"
precision = 2

[[data.mapping.metrics]]
key = "score"
label = "Score"
precision = 3
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.data.source, "data/predictions.json");
        assert_eq!(opts.data.mapping, FieldMapping::pki_score());
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = Options::from_toml("[table\ndisplay_cap = ").unwrap_err();
        assert!(matches!(err, ExplorerError::OptionsParse(_)));
    }

    #[test]
    fn structure_reference_resolution() {
        let mut opts = StructureOptions::default();
        assert_eq!(opts.resolve("a.pdb"), "a.pdb");
        opts.base_path = "structures/".to_owned();
        assert_eq!(opts.resolve("a.pdb"), "structures/a.pdb");
        assert_eq!(
            opts.resolve("https://example.org/b.cif"),
            "https://example.org/b.cif"
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("data"));
        assert!(props.contains_key("table"));
        assert!(props.contains_key("structure"));
        assert!(props.contains_key("style"));
        assert!(props.contains_key("camera"));

        // Skipped style fields should be absent
        let style = &props["style"]["properties"];
        assert!(style.get("neighbor_cutoff").is_some());
        assert!(style.get("gradient").is_none());
        assert!(style.get("solvent_residues").is_none());
    }
}
