use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One numeric column of the dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct MetricSpec {
    /// JSON field name in the dataset.
    pub key: String,
    /// Column header shown to the user.
    pub label: String,
    /// Fixed number of decimal places used everywhere this metric is shown.
    pub precision: usize,
}

impl MetricSpec {
    /// Metric with the given key, label and precision.
    #[must_use]
    pub fn new(key: &str, label: &str, precision: usize) -> Self {
        Self {
            key: key.to_owned(),
            label: label.to_owned(),
            precision,
        }
    }
}

/// Maps a dataset variant's JSON field names onto the canonical record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct FieldMapping {
    /// Field holding the receptor identifier.
    pub receptor: String,
    /// Field holding the ligand identifier.
    pub ligand: String,
    /// Field holding the structure file reference.
    pub structure: String,
    /// Every numeric field, in display order.
    pub metrics: Vec<MetricSpec>,
    /// Keys of the metrics shown as results-table columns. The scores table
    /// always shows all of [`Self::metrics`].
    pub table_metrics: Vec<String>,
}

impl FieldMapping {
    /// `{gpcr, ligand, pKi, score, structure}` datasets.
    #[must_use]
    pub fn pki_score() -> Self {
        Self {
            receptor: "gpcr".to_owned(),
            ligand: "ligand".to_owned(),
            structure: "structure".to_owned(),
            metrics: vec![
                MetricSpec::new("pKi", "pKi", 2),
                MetricSpec::new("score", "Score", 3),
            ],
            table_metrics: vec!["pKi".to_owned(), "score".to_owned()],
        }
    }

    /// `{gpcr, ligand, affinity_mean, confidence_score, structure, ...}`
    /// datasets carrying co-folding confidence metrics.
    #[must_use]
    pub fn affinity_confidence() -> Self {
        Self {
            receptor: "gpcr".to_owned(),
            ligand: "ligand".to_owned(),
            structure: "structure".to_owned(),
            metrics: vec![
                MetricSpec::new("affinity_mean", "Affinity", 3),
                MetricSpec::new("confidence_score", "Confidence", 3),
                MetricSpec::new("complex_plddt", "Complex pLDDT", 3),
                MetricSpec::new("complex_iplddt", "Interface pLDDT", 3),
                MetricSpec::new("iptm", "ipTM", 3),
                MetricSpec::new("complex_ipde", "Interface PDE", 3),
            ],
            table_metrics: vec![
                "affinity_mean".to_owned(),
                "confidence_score".to_owned(),
            ],
        }
    }

    /// Index into [`Self::metrics`] of the metric with the given key.
    #[must_use]
    pub fn metric_index(&self, key: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m.key == key)
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::affinity_confidence()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Data", inline)]
#[serde(default)]
/// Dataset location and shape.
pub struct DataOptions {
    /// Reference of the JSON dataset, resolved by the active source.
    pub source: String,
    /// Field mapping for the configured dataset variant.
    pub mapping: FieldMapping,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self {
            source: "data.json".to_owned(),
            mapping: FieldMapping::default(),
        }
    }
}
