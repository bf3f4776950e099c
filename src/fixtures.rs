//! Shared test inputs.

/// Two-record dataset in the `{gpcr, ligand, pKi, score, structure}` shape.
pub(crate) const PKI_DATASET: &str = r#"[
    {"gpcr": "GPR1", "ligand": "LIG1", "pKi": 7.5, "score": 0.8, "structure": "a.pdb"},
    {"gpcr": "GPR2", "ligand": "LIG2", "pKi": 6.1, "score": 0.4, "structure": "b.pdb"}
]"#;

/// Four residues on a line along x (A1..A4, A4 far away), a two-atom ligand
/// next to A2, and one water far from everything.
pub(crate) const LINEAR_PDB: &str = "\
HEADER    TEST STRUCTURE
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00 50.00           N
ATOM      2  CA  ALA A   1       1.500   0.000   0.000  1.00 50.00           C
ATOM      3  N   GLY A   2       3.800   0.000   0.000  1.00 70.00           N
ATOM      4  CA  GLY A   2       5.300   0.000   0.000  1.00 70.00           C
ATOM      5  N   SER A   3       7.600   0.000   0.000  1.00 90.00           N
ATOM      6  CA  SER A   3       9.100   0.000   0.000  1.00 90.00           C
ATOM      7  N   LEU A   4      20.000   0.000   0.000  1.00 95.00           N
ATOM      8  CA  LEU A   4      21.500   0.000   0.000  1.00 95.00           C
TER       9      LEU A   4
HETATM   10  C1  LIG B 101       5.300   3.000   0.000  1.00 60.00           C
HETATM   11  C2  LIG B 101       6.500   3.500   0.000  1.00 60.00           C
HETATM   12  O   HOH W 201      30.000  30.000  30.000  1.00 20.00           O
END
";

/// A single methionine, used as the "other" structure in load tests.
pub(crate) const SINGLE_RESIDUE_PDB: &str = "\
ATOM      1  N   MET A   1      10.000  10.000  10.000  1.00 80.00           N
ATOM      2  CA  MET A   1      11.500  10.000  10.000  1.00 80.00           C
END
";

/// The same atoms as [`LINEAR_PDB`] in mmCIF form, plus a second model
/// that must be ignored.
pub(crate) const LINEAR_CIF: &str = "\
data_TEST
#
_entry.id TEST
#
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
_atom_site.occupancy
_atom_site.B_iso_or_equiv
_atom_site.auth_seq_id
_atom_site.auth_asym_id
_atom_site.pdbx_PDB_model_num
ATOM   1  N N  ALA A 1 0.000  0.000  0.000  1.00 50.00 1   A 1
ATOM   2  C CA ALA A 1 1.500  0.000  0.000  1.00 50.00 1   A 1
ATOM   3  N N  GLY A 2 3.800  0.000  0.000  1.00 70.00 2   A 1
ATOM   4  C CA GLY A 2 5.300  0.000  0.000  1.00 70.00 2   A 1
ATOM   5  N N  SER A 3 7.600  0.000  0.000  1.00 90.00 3   A 1
ATOM   6  C CA SER A 3 9.100  0.000  0.000  1.00 90.00 3   A 1
ATOM   7  N N  LEU A 4 20.000 0.000  0.000  1.00 95.00 4   A 1
ATOM   8  C CA LEU A 4 21.500 0.000  0.000  1.00 95.00 4   A 1
HETATM 9  C \"C1'\" LIG B . 5.300  3.000  0.000  1.00 60.00 101 B 1
HETATM 10 C C2 LIG B . 6.500  3.500  0.000  1.00 60.00 101 B 1
HETATM 11 O O  HOH C . 30.000 30.000 30.000 1.00 20.00 201 W 1
ATOM   12 N N  ALA A 1 99.000 99.000 99.000 1.00 50.00 1   A 2
#
loop_
_struct_conf.conf_type_id
_struct_conf.id
HELX_P HELX_P1
#
";
