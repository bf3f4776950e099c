//! Free-text search over the dataset.

use super::{Dataset, PredictionRecord};

/// Records whose receptor or ligand identifier contains `query`
/// (case-insensitive), in dataset order, at most `cap` of them.
///
/// An empty query matches every record. The whole dataset is rescanned on
/// every call.
#[must_use]
pub fn filter<'a>(
    dataset: &'a Dataset,
    query: &str,
    cap: usize,
) -> Vec<&'a PredictionRecord> {
    let needle = query.to_lowercase();
    dataset
        .records()
        .iter()
        .filter(|r| is_hit(r, &needle))
        .take(cap)
        .collect()
}

fn is_hit(record: &PredictionRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.receptor().to_lowercase().contains(needle)
        || record.ligand().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::PKI_DATASET;
    use crate::options::FieldMapping;

    fn dataset(json: &str) -> Dataset {
        Dataset::from_json(json, &FieldMapping::pki_score()).unwrap()
    }

    fn many(n: usize) -> Dataset {
        let items: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"gpcr": "R{}", "ligand": "L{i}", "pKi": 1.0, "score": 0.1, "structure": "{i}.pdb"}}"#,
                    i % 7
                )
            })
            .collect();
        dataset(&format!("[{}]", items.join(",")))
    }

    #[test]
    fn query_matches_receptor_case_insensitively() {
        let ds = dataset(PKI_DATASET);
        let hits = filter(&ds, "gpr1", 500);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], &ds.records()[0]);
    }

    #[test]
    fn query_matches_ligand() {
        let ds = dataset(PKI_DATASET);
        let hits = filter(&ds, "Lig2", 500);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].structure(), "b.pdb");
    }

    #[test]
    fn empty_query_returns_capped_dataset_in_order() {
        let ds = many(40);
        let hits = filter(&ds, "", 25);
        assert_eq!(hits.len(), 25);
        for (hit, rec) in hits.iter().zip(ds.records()) {
            assert_eq!(*hit, rec);
        }
    }

    #[test]
    fn results_preserve_order_and_respect_cap() {
        let ds = many(100);
        let hits = filter(&ds, "r3", 5);
        assert_eq!(hits.len(), 5);
        let positions: Vec<usize> = hits
            .iter()
            .map(|h| {
                ds.records()
                    .iter()
                    .position(|r| std::ptr::eq(r, *h))
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(hits.iter().all(|h| h.receptor() == "R3"));
    }

    #[test]
    fn no_match_yields_empty() {
        let ds = dataset(PKI_DATASET);
        assert!(filter(&ds, "adrb", 500).is_empty());
    }
}
