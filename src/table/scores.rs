//! Per-record scores table.

use super::Cell;
use crate::dataset::{Dataset, PredictionRecord};

/// One metric of the selected record.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    /// Metric label.
    pub label: String,
    /// Formatted value or the display error.
    pub value: Cell,
}

/// Every metric of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoresTable {
    receptor: String,
    ligand: String,
    rows: Vec<ScoreRow>,
}

impl ScoresTable {
    /// Scores of `record`, one row per metric of `dataset`.
    #[must_use]
    pub fn for_record(dataset: &Dataset, record: &PredictionRecord) -> Self {
        let rows = dataset
            .metrics()
            .iter()
            .enumerate()
            .map(|(i, metric)| ScoreRow {
                label: metric.label.clone(),
                value: Cell::score(record, i, metric),
            })
            .collect();
        Self {
            receptor: record.receptor().to_owned(),
            ligand: record.ligand().to_owned(),
            rows,
        }
    }

    /// Receptor of the record shown.
    #[must_use]
    pub fn receptor(&self) -> &str {
        &self.receptor
    }

    /// Ligand of the record shown.
    #[must_use]
    pub fn ligand(&self) -> &str {
        &self.ligand
    }

    /// Whether this table shows the given pair.
    #[must_use]
    pub fn is_pair(&self, receptor: &str, ligand: &str) -> bool {
        self.receptor == receptor && self.ligand == ligand
    }

    /// Metric rows in metric order.
    #[must_use]
    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::FieldMapping;

    #[test]
    fn shows_every_metric() {
        let json = r#"[{"gpcr": "GPR1", "ligand": "LIG1", "structure": "a.cif",
            "affinity_mean": 1.23456, "confidence_score": 0.5,
            "complex_plddt": 88.1, "complex_iplddt": 80, "iptm": 0.91}]"#;
        let dataset =
            Dataset::from_json(json, &FieldMapping::affinity_confidence()).unwrap();
        let scores = ScoresTable::for_record(&dataset, &dataset.records()[0]);

        assert!(scores.is_pair("GPR1", "LIG1"));
        let shown: Vec<(&str, &str)> = scores
            .rows()
            .iter()
            .map(|r| (r.label.as_str(), r.value.display("n/a")))
            .collect();
        assert_eq!(
            shown,
            vec![
                ("Affinity", "1.235"),
                ("Confidence", "0.500"),
                ("Complex pLDDT", "88.100"),
                ("Interface pLDDT", "80.000"),
                ("ipTM", "0.910"),
                ("Interface PDE", "n/a"),
            ]
        );
    }
}
