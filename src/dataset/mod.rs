//! Prediction dataset: canonical records, the JSON adapter and the store.
//!
//! The dataset arrives as a JSON array whose field names depend on the
//! pipeline that produced it. A [`FieldMapping`] names the fields to read;
//! everything else in an object is ignored.

pub mod filter;

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{DisplayError, LoadError};
use crate::options::{FieldMapping, MetricSpec};
use crate::source::ResourceSource;

/// One receptor-ligand prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    receptor: String,
    ligand: String,
    scores: Vec<Option<f64>>,
    structure: String,
}

impl PredictionRecord {
    /// Receptor (GPCR) identifier. Never empty.
    #[must_use]
    pub fn receptor(&self) -> &str {
        &self.receptor
    }

    /// Ligand identifier. Never empty.
    #[must_use]
    pub fn ligand(&self) -> &str {
        &self.ligand
    }

    /// Structure file reference as written in the dataset.
    #[must_use]
    pub fn structure(&self) -> &str {
        &self.structure
    }

    /// Raw score at `index` of the dataset's metric list; `None` when the
    /// record has no usable value there.
    #[must_use]
    pub fn score(&self, index: usize) -> Option<f64> {
        self.scores.get(index).copied().flatten()
    }

    /// Score at `index`, or the [`DisplayError`] to show instead.
    pub fn score_for(
        &self,
        index: usize,
        metric: &MetricSpec,
    ) -> Result<f64, DisplayError> {
        self.score(index).ok_or_else(|| DisplayError::MissingValue {
            field: metric.key.clone(),
        })
    }

    /// Whether this record belongs to the given (receptor, ligand) pair.
    #[must_use]
    pub fn is_pair(&self, receptor: &str, ligand: &str) -> bool {
        self.receptor == receptor && self.ligand == ligand
    }
}

/// An immutable, ordered set of prediction records.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    metrics: Vec<MetricSpec>,
    records: Vec<PredictionRecord>,
}

impl Dataset {
    /// Parse a JSON payload using `mapping`.
    pub fn from_json(
        payload: &str,
        mapping: &FieldMapping,
    ) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(payload)?;
        let Value::Array(items) = value else {
            return Err(LoadError::NotAnArray);
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let Value::Object(obj) = item else {
                    return Err(LoadError::Record {
                        index,
                        reason: "not a JSON object".to_owned(),
                    });
                };
                adapt_record(obj, mapping).map_err(|reason| {
                    LoadError::Record { index, reason }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            metrics: mapping.metrics.clone(),
            records,
        })
    }

    /// Every record, in dataset order.
    #[must_use]
    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    /// Metric descriptors the scores of each record are aligned with.
    #[must_use]
    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, distinct receptor identifiers for the autocomplete list.
    #[must_use]
    pub fn receptor_suggestions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.receptor.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}

fn adapt_record(
    obj: &Map<String, Value>,
    mapping: &FieldMapping,
) -> Result<PredictionRecord, String> {
    let receptor = required_text(obj, &mapping.receptor)?;
    let ligand = required_text(obj, &mapping.ligand)?;
    let structure = required_text(obj, &mapping.structure)?;
    let scores = mapping
        .metrics
        .iter()
        .map(|m| obj.get(&m.key).and_then(numeric))
        .collect();

    Ok(PredictionRecord {
        receptor,
        ligand,
        scores,
        structure,
    })
}

fn required_text(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<String, String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => {
            Ok(s.trim().to_owned())
        }
        Some(Value::String(_)) => Err(format!("field {field:?} is empty")),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(format!("field {field:?} is not a string")),
        None => Err(format!("missing field {field:?}")),
    }
}

/// Numbers pass through; numeric strings are coerced. Anything else,
/// including non-finite results, counts as missing.
fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Holds the most recent successfully loaded [`Dataset`].
#[derive(Debug, Default)]
pub struct DatasetStore {
    dataset: Dataset,
    generation: u64,
}

impl DatasetStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `reference` through `source` and replace the current dataset on
    /// success. On failure the current dataset is kept.
    pub fn load(
        &mut self,
        source: &dyn ResourceSource,
        reference: &str,
        mapping: &FieldMapping,
    ) -> Result<&Dataset, LoadError> {
        let payload = source.fetch_text(reference)?;
        self.replace_from_json(&payload, mapping)
    }

    /// Parse an already fetched payload and replace the current dataset on
    /// success. On failure the current dataset is kept.
    pub fn replace_from_json(
        &mut self,
        payload: &str,
        mapping: &FieldMapping,
    ) -> Result<&Dataset, LoadError> {
        let dataset = Dataset::from_json(payload, mapping)?;
        log::info!(
            "loaded {} prediction records ({} metrics)",
            dataset.len(),
            dataset.metrics().len()
        );
        self.dataset = dataset;
        self.generation += 1;
        Ok(&self.dataset)
    }

    /// Current dataset (empty until the first successful load).
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Number of successful loads so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::PKI_DATASET;

    #[test]
    fn adapts_pki_shape() {
        let ds =
            Dataset::from_json(PKI_DATASET, &FieldMapping::pki_score()).unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.records()[0];
        assert_eq!(first.receptor(), "GPR1");
        assert_eq!(first.ligand(), "LIG1");
        assert_eq!(first.structure(), "a.pdb");
        assert_eq!(first.score(0), Some(7.5));
        assert_eq!(first.score(1), Some(0.8));
    }

    #[test]
    fn adapts_affinity_shape_with_string_numbers() {
        let payload = r#"[{
            "gpcr": "ADRB2", "ligand": "carazolol",
            "affinity_mean": "-9.25", "confidence_score": 0.91,
            "structure": "adrb2.cif", "complex_plddt": 88.1,
            "complex_iplddt": 80.4, "iptm": 0.87, "complex_ipde": 1.2,
            "extra": "ignored"
        }]"#;
        let mapping = FieldMapping::affinity_confidence();
        let ds = Dataset::from_json(payload, &mapping).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.score(0), Some(-9.25));
        assert_eq!(rec.score(4), Some(0.87));
        assert_eq!(ds.metrics().len(), 6);
    }

    #[test]
    fn missing_score_is_kept_as_missing() {
        let payload = r#"[{"gpcr": "GPR1", "ligand": "LIG1", "pKi": 7.5,
            "score": null, "structure": "a.pdb"}]"#;
        let mapping = FieldMapping::pki_score();
        let ds = Dataset::from_json(payload, &mapping).unwrap();
        let rec = &ds.records()[0];
        assert_eq!(rec.score(1), None);
        let err = rec.score_for(1, &mapping.metrics[1]).unwrap_err();
        assert_eq!(
            err,
            DisplayError::MissingValue {
                field: "score".to_owned()
            }
        );
    }

    #[test]
    fn rejects_non_array_and_bad_records() {
        let mapping = FieldMapping::pki_score();
        assert!(matches!(
            Dataset::from_json(r#"{"gpcr": "X"}"#, &mapping),
            Err(LoadError::NotAnArray)
        ));
        assert!(matches!(
            Dataset::from_json("[1, 2", &mapping),
            Err(LoadError::Json(_))
        ));
        let empty_ligand = r#"[{"gpcr": "GPR1", "ligand": " ", "structure": "a.pdb"}]"#;
        assert!(matches!(
            Dataset::from_json(empty_ligand, &mapping),
            Err(LoadError::Record { index: 0, .. })
        ));
        let not_object = r#"[{"gpcr": "GPR1", "ligand": "L", "structure": "a.pdb"}, 3]"#;
        assert!(matches!(
            Dataset::from_json(not_object, &mapping),
            Err(LoadError::Record { index: 1, .. })
        ));
    }

    #[test]
    fn suggestions_are_sorted_and_distinct() {
        let payload = r#"[
            {"gpcr": "HTR2A", "ligand": "a", "structure": "1.pdb"},
            {"gpcr": "ADRB2", "ligand": "b", "structure": "2.pdb"},
            {"gpcr": "HTR2A", "ligand": "c", "structure": "3.pdb"}
        ]"#;
        let ds = Dataset::from_json(payload, &FieldMapping::pki_score()).unwrap();
        assert_eq!(ds.receptor_suggestions(), vec!["ADRB2", "HTR2A"]);
    }

    #[test]
    fn failed_reload_keeps_previous_dataset() {
        let mapping = FieldMapping::pki_score();
        let mut store = DatasetStore::new();
        let _ = store.replace_from_json(PKI_DATASET, &mapping).unwrap();
        assert!(store.replace_from_json("not json", &mapping).is_err());
        assert_eq!(store.dataset().len(), 2);
        assert_eq!(store.generation(), 1);

        let single = r#"[{"gpcr": "GPR9", "ligand": "L9", "structure": "z.pdb"}]"#;
        let _ = store.replace_from_json(single, &mapping).unwrap();
        assert_eq!(store.dataset().len(), 1);
        assert_eq!(store.generation(), 2);
    }
}
