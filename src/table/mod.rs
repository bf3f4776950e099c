//! Results table model.
//!
//! The table is rebuilt from scratch on every render; the front-end only
//! mirrors [`ResultsTable::rows`] into its DOM or terminal.

mod scores;

pub use scores::{ScoreRow, ScoresTable};

use crate::dataset::PredictionRecord;
use crate::error::DisplayError;
use crate::options::{FieldMapping, MetricSpec, TableOptions};

/// Text of the action column.
pub const VIEW_LABEL: &str = "View";

/// One rendered cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Identifier text.
    Text(String),
    /// A formatted numeric value.
    Score(String),
    /// A value that could not be displayed.
    Missing(DisplayError),
}

impl Cell {
    /// Text to show, using `missing` for undisplayable values.
    #[must_use]
    pub fn display<'a>(&'a self, missing: &'a str) -> &'a str {
        match self {
            Self::Text(s) | Self::Score(s) => s,
            Self::Missing(_) => missing,
        }
    }

    /// Whether this cell stands in for a missing value.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    fn score(record: &PredictionRecord, index: usize, metric: &MetricSpec) -> Self {
        match record.score_for(index, metric) {
            Ok(v) => Self::Score(format_score(v, metric.precision)),
            Err(e) => Self::Missing(e),
        }
    }
}

/// What the row's "View" button opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    /// Structure reference of the record.
    pub structure: String,
    /// Receptor identifier.
    pub receptor: String,
    /// Ligand identifier.
    pub ligand: String,
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Receptor, ligand, then one cell per table metric.
    pub cells: Vec<Cell>,
    /// The row's view action.
    pub action: RowAction,
    /// The record this row was rendered from.
    pub record: PredictionRecord,
}

/// Results table: fixed columns and the currently rendered rows.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    metrics: Vec<(usize, MetricSpec)>,
    missing_indicator: String,
    rows: Vec<TableRow>,
}

impl ResultsTable {
    /// Empty table with the columns `mapping` selects.
    #[must_use]
    pub fn new(mapping: &FieldMapping, options: &TableOptions) -> Self {
        let metrics = mapping
            .table_metrics
            .iter()
            .filter_map(|key| {
                let found = mapping
                    .metric_index(key)
                    .and_then(|i| mapping.metrics.get(i).map(|m| (i, m.clone())));
                if found.is_none() {
                    log::warn!("table metric {key} is not in the metric list");
                }
                found
            })
            .collect();
        Self {
            metrics,
            missing_indicator: options.missing_indicator.clone(),
            rows: Vec::new(),
        }
    }

    /// Column titles, action column last.
    #[must_use]
    pub fn headers(&self) -> Vec<&str> {
        let mut headers = vec!["GPCR", "Ligand"];
        headers.extend(self.metrics.iter().map(|(_, m)| m.label.as_str()));
        headers.push("Structure");
        headers
    }

    /// Replace every row with one per record, in order.
    pub fn render(&mut self, records: &[&PredictionRecord]) {
        let mut missing = 0usize;
        self.rows = records
            .iter()
            .map(|record| {
                let mut cells = vec![
                    Cell::Text(record.receptor().to_owned()),
                    Cell::Text(record.ligand().to_owned()),
                ];
                for (index, metric) in &self.metrics {
                    let cell = Cell::score(record, *index, metric);
                    if let Cell::Missing(e) = &cell {
                        missing += 1;
                        log::warn!(
                            "{} / {}: {e}",
                            record.receptor(),
                            record.ligand()
                        );
                    }
                    cells.push(cell);
                }
                TableRow {
                    cells,
                    action: RowAction {
                        structure: record.structure().to_owned(),
                        receptor: record.receptor().to_owned(),
                        ligand: record.ligand().to_owned(),
                    },
                    record: (*record).clone(),
                }
            })
            .collect();
        log::debug!("rendered {} rows ({missing} missing values)", self.rows.len());
    }

    /// Rows from the last render.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Row `index` of the last render.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.get(index)
    }

    /// Text used for missing values.
    #[must_use]
    pub fn missing_indicator(&self) -> &str {
        &self.missing_indicator
    }

    /// Displayed text of every row, action column included.
    #[must_use]
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|c| c.display(&self.missing_indicator).to_owned())
                    .chain(std::iter::once(VIEW_LABEL.to_owned()))
                    .collect()
            })
            .collect()
    }
}

/// `value` with exactly `precision` decimal places.
#[must_use]
pub fn format_score(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::filter::filter;
    use crate::dataset::Dataset;
    use crate::fixtures::PKI_DATASET;

    fn table() -> ResultsTable {
        ResultsTable::new(&FieldMapping::pki_score(), &TableOptions::default())
    }

    #[test]
    fn renders_fixed_precision() {
        let dataset = Dataset::from_json(PKI_DATASET, &FieldMapping::pki_score()).unwrap();
        let mut table = table();
        table.render(&filter(&dataset, "", 500));

        assert_eq!(table.headers(), vec!["GPCR", "Ligand", "pKi", "Score", "Structure"]);
        assert_eq!(
            table.display_rows(),
            vec![
                vec!["GPR1", "LIG1", "7.50", "0.800", "View"],
                vec!["GPR2", "LIG2", "6.10", "0.400", "View"],
            ]
        );
        assert_eq!(
            table.row(1).unwrap().action,
            RowAction {
                structure: "b.pdb".to_owned(),
                receptor: "GPR2".to_owned(),
                ligand: "LIG2".to_owned(),
            }
        );
    }

    #[test]
    fn missing_value_only_affects_its_cell() {
        let json = r#"[
            {"gpcr": "GPR1", "ligand": "LIG1", "pKi": null, "score": 0.8, "structure": "a.pdb"},
            {"gpcr": "GPR2", "ligand": "LIG2", "pKi": "6.1", "score": 0.4, "structure": "b.pdb"}
        ]"#;
        let dataset = Dataset::from_json(json, &FieldMapping::pki_score()).unwrap();
        let mut table = table();
        table.render(&filter(&dataset, "", 500));

        let first = table.row(0).unwrap();
        assert!(matches!(
            &first.cells[2],
            Cell::Missing(DisplayError::MissingValue { field }) if field == "pKi"
        ));
        assert_eq!(
            table.display_rows()[0],
            vec!["GPR1", "LIG1", "n/a", "0.800", "View"]
        );
        assert_eq!(table.display_rows()[1][2], "6.10");
    }

    #[test]
    fn render_replaces_rows_and_is_idempotent() {
        let dataset = Dataset::from_json(PKI_DATASET, &FieldMapping::pki_score()).unwrap();
        let mut table = table();
        table.render(&filter(&dataset, "", 500));
        let once = table.rows().to_vec();
        table.render(&filter(&dataset, "", 500));
        assert_eq!(table.rows(), once.as_slice());

        table.render(&filter(&dataset, "gpr2", 500));
        assert_eq!(table.rows().len(), 1);
        table.render(&[]);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn unknown_table_metric_is_skipped() {
        let mut mapping = FieldMapping::pki_score();
        mapping.table_metrics.push("kd".to_owned());
        let table = ResultsTable::new(&mapping, &TableOptions::default());
        assert_eq!(table.headers().len(), 5);
    }

    #[test]
    fn precision_rounding() {
        assert_eq!(format_score(7.4567, 2), "7.46");
        assert_eq!(format_score(0.1, 3), "0.100");
        assert_eq!(format_score(-1.0, 0), "-1");
    }
}
