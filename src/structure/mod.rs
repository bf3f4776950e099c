//! Canonical atom model and structure file readers.
//!
//! Two text formats are accepted: legacy fixed-column PDB and mmCIF. Both
//! readers keep only the first model of multi-model files and produce the
//! same [`Structure`].

pub mod grid;
mod mmcif;
mod pdb;

use std::fmt;

use glam::Vec3;

use crate::error::{ParseErrorKind, StructureParseError};
use crate::options::FormatPreference;

/// One atom of a parsed structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the file.
    pub serial: u32,
    /// Atom name (e.g. `CA`).
    pub name: String,
    /// Three-letter residue name (e.g. `ASP`, `HOH`).
    pub residue_name: String,
    /// Chain identifier.
    pub chain: String,
    /// Residue sequence number.
    pub residue_seq: i32,
    /// Cartesian position in Angstroms.
    pub position: Vec3,
    /// B-factor column; predicted structures store pLDDT here.
    pub b_factor: f32,
    /// Element symbol (may be empty when the file omits it).
    pub element: String,
    /// Whether the atom came from a `HETATM` record.
    pub hetero: bool,
}

impl Atom {
    /// Residue this atom belongs to.
    #[must_use]
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey::new(&self.chain, self.residue_seq)
    }
}

/// (chain, residue number) identity of a residue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    /// Chain identifier.
    pub chain: String,
    /// Residue sequence number.
    pub seq: i32,
}

impl ResidueKey {
    /// Key for residue `seq` of `chain`.
    #[must_use]
    pub fn new(chain: &str, seq: i32) -> Self {
        Self {
            chain: chain.to_owned(),
            seq,
        }
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.seq)
    }
}

/// Text format of a structure file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    /// Legacy fixed-column PDB.
    Pdb,
    /// mmCIF / PDBx.
    Mmcif,
}

impl StructureFormat {
    /// Pick the format for `reference` under the configured preference.
    ///
    /// `Auto` looks at the file extension first and falls back to the
    /// content: a `data_` block header or an `_atom_site.` tag means mmCIF.
    #[must_use]
    pub fn resolve(
        preference: FormatPreference,
        reference: &str,
        content: &str,
    ) -> Self {
        match preference {
            FormatPreference::Pdb => Self::Pdb,
            FormatPreference::Mmcif => Self::Mmcif,
            FormatPreference::Auto => Self::from_extension(reference)
                .unwrap_or_else(|| Self::sniff(content)),
        }
    }

    /// Format implied by the reference's extension, if recognized.
    #[must_use]
    pub fn from_extension(reference: &str) -> Option<Self> {
        let path = reference.split(['?', '#']).next().unwrap_or(reference);
        let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "pdb" | "ent" => Some(Self::Pdb),
            "cif" | "mmcif" => Some(Self::Mmcif),
            _ => None,
        }
    }

    /// Format implied by the text itself.
    #[must_use]
    pub fn sniff(content: &str) -> Self {
        let head = content.trim_start();
        if head.starts_with("data_") || content.contains("_atom_site.") {
            Self::Mmcif
        } else {
            Self::Pdb
        }
    }
}

/// A parsed structure model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<Atom>,
}

impl Structure {
    /// Parse `text` as `format`.
    pub fn parse(
        text: &str,
        format: StructureFormat,
    ) -> Result<Self, StructureParseError> {
        let atoms = match format {
            StructureFormat::Pdb => pdb::read_atoms(text)?,
            StructureFormat::Mmcif => mmcif::read_atoms(text)?,
        };
        if atoms.is_empty() {
            return Err(StructureParseError {
                line: None,
                kind: ParseErrorKind::NoAtoms,
            });
        }
        Ok(Self { atoms })
    }

    /// All atoms in file order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Atom at `index`.
    #[must_use]
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// Positions of all atoms, in atom order.
    #[must_use]
    pub fn positions(&self) -> Vec<Vec3> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// The atoms as PDB coordinate records, serials renumbered from 1.
    #[must_use]
    pub fn to_pdb(&self) -> String {
        pdb::write_atoms(&self.atoms)
    }

    /// Number of distinct residues.
    #[must_use]
    pub fn residue_count(&self) -> usize {
        let mut keys: Vec<ResidueKey> =
            self.atoms.iter().map(Atom::residue_key).collect();
        keys.sort();
        keys.dedup();
        keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{LINEAR_CIF, LINEAR_PDB};

    #[test]
    fn extension_wins_over_content() {
        assert_eq!(
            StructureFormat::resolve(FormatPreference::Auto, "x/a.PDB", "data_x"),
            StructureFormat::Pdb
        );
        assert_eq!(
            StructureFormat::resolve(FormatPreference::Auto, "b.cif?v=2", ""),
            StructureFormat::Mmcif
        );
    }

    #[test]
    fn content_sniffing_without_extension() {
        assert_eq!(
            StructureFormat::resolve(FormatPreference::Auto, "model", LINEAR_CIF),
            StructureFormat::Mmcif
        );
        assert_eq!(
            StructureFormat::resolve(FormatPreference::Auto, "model", LINEAR_PDB),
            StructureFormat::Pdb
        );
    }

    #[test]
    fn explicit_preference_is_honored() {
        assert_eq!(
            StructureFormat::resolve(FormatPreference::Mmcif, "a.pdb", ""),
            StructureFormat::Mmcif
        );
    }

    #[test]
    fn both_formats_yield_the_same_model() {
        let from_pdb = Structure::parse(LINEAR_PDB, StructureFormat::Pdb).unwrap();
        let from_cif =
            Structure::parse(LINEAR_CIF, StructureFormat::Mmcif).unwrap();
        assert_eq!(from_pdb.atoms().len(), 11);
        assert_eq!(from_cif.atoms().len(), 11);
        for (a, b) in from_pdb.atoms().iter().zip(from_cif.atoms()) {
            assert_eq!(a.residue_key(), b.residue_key());
            assert_eq!(a.residue_name, b.residue_name);
            assert_eq!(a.hetero, b.hetero);
            assert!(a.position.distance(b.position) < 1e-4);
            assert_eq!(a.b_factor, b.b_factor);
        }
        assert_eq!(from_pdb.residue_count(), 6);
    }

    #[test]
    fn residue_keys_follow_chain_and_number() {
        let s = Structure::parse(LINEAR_PDB, StructureFormat::Pdb).unwrap();
        let key = ResidueKey::new("B", 101);
        let idx: Vec<usize> = (0..s.atoms().len())
            .filter(|&i| s.atom(i).is_some_and(|a| a.residue_key() == key))
            .collect();
        assert_eq!(idx, vec![8, 9]);
        assert_eq!(key.to_string(), "B:101");
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = Structure::parse("HEADER ONLY\n", StructureFormat::Pdb)
            .unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NoAtoms);
    }
}
