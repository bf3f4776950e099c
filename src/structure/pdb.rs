//! Fixed-column PDB coordinate reader.

use std::fmt::Write;

use glam::Vec3;

use super::Atom;
use crate::error::{ParseErrorKind, StructureParseError};

/// Last column that must be present for a coordinate record (end of z).
const MIN_RECORD_LEN: usize = 54;

/// Read `ATOM`/`HETATM` records up to the end of the first model.
pub(super) fn read_atoms(text: &str) -> Result<Vec<Atom>, StructureParseError> {
    let mut atoms = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_num = i + 1;
        let record = line.get(0..6).unwrap_or(line).trim_end();
        let hetero = match record {
            "ATOM" => false,
            "HETATM" => true,
            "ENDMDL" if !atoms.is_empty() => break,
            _ => continue,
        };
        if line.len() < MIN_RECORD_LEN {
            return Err(StructureParseError::at(
                line_num,
                ParseErrorKind::TruncatedRecord,
            ));
        }

        let serial = column(line, 6, 11)
            .parse::<u32>()
            .unwrap_or(atoms.len() as u32 + 1);
        let name = column(line, 12, 16).to_owned();
        let residue_name = column(line, 17, 20).to_owned();
        let chain = column(line, 21, 22).to_owned();
        let residue_seq = number::<i32>(line, 22, 26, "residue number", line_num)?;
        let x = number::<f32>(line, 30, 38, "x", line_num)?;
        let y = number::<f32>(line, 38, 46, "y", line_num)?;
        let z = number::<f32>(line, 46, 54, "z", line_num)?;
        let b_factor = column(line, 60, 66).parse::<f32>().unwrap_or(0.0);
        let element = match column(line, 76, 78) {
            "" => guess_element(&name),
            e => e.to_owned(),
        };

        atoms.push(Atom {
            serial,
            name,
            residue_name,
            chain,
            residue_seq,
            position: Vec3::new(x, y, z),
            b_factor,
            element,
            hetero,
        });
    }

    Ok(atoms)
}

/// Largest values that fit the fixed-width columns written below.
const SEQ_RANGE: (i32, i32) = (-999, 9999);
const COORD_RANGE: (f32, f32) = (-999.999, 9999.999);
const B_FACTOR_RANGE: (f32, f32) = (-99.99, 999.99);
const MAX_SERIAL: usize = 99_999;

/// Render `atoms` as `ATOM`/`HETATM` records. Serial numbers are
/// rewritten to `index + 1` so they identify atoms by position.
///
/// Values wider than their column are clamped and chain ids are cut to one
/// character, so every record keeps its column layout; a warning reports how
/// many atoms were affected.
pub(super) fn write_atoms(atoms: &[Atom]) -> String {
    let mut out = String::with_capacity(atoms.len() * 81 + 4);
    let mut clamped = 0usize;
    for (i, atom) in atoms.iter().enumerate() {
        let record = if atom.hetero { "HETATM" } else { "ATOM" };
        let name = if atom.name.len() >= 4 {
            truncated(&atom.name, 4).to_owned()
        } else {
            format!(" {:<3}", atom.name)
        };
        let chain = atom.chain.chars().next().unwrap_or(' ');
        let seq = atom.residue_seq.clamp(SEQ_RANGE.0, SEQ_RANGE.1);
        let [x, y, z] = atom
            .position
            .to_array()
            .map(|c| c.clamp(COORD_RANGE.0, COORD_RANGE.1));
        let b_factor = atom.b_factor.clamp(B_FACTOR_RANGE.0, B_FACTOR_RANGE.1);
        if seq != atom.residue_seq
            || Vec3::new(x, y, z) != atom.position
            || b_factor != atom.b_factor
            || atom.chain.chars().count() > 1
        {
            clamped += 1;
        }
        let _ = writeln!(
            out,
            "{record:<6}{:>5} {name} {:>3} {chain}{seq:>4}    {x:>8.3}{y:>8.3}{z:>8.3}{:>6.2}{b_factor:>6.2}          {:>2}",
            (i + 1).min(MAX_SERIAL),
            truncated(&atom.residue_name, 3),
            1.0,
            truncated(&atom.element, 2),
        );
    }
    if clamped > 0 {
        log::warn!("{clamped} atoms had values wider than their PDB columns");
    }
    if atoms.len() > MAX_SERIAL {
        log::warn!(
            "{} atoms exceed the PDB serial range; atoms past {MAX_SERIAL} share a serial",
            atoms.len()
        );
    }
    out.push_str("END\n");
    out
}

fn truncated(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}

/// Trimmed text of the zero-based, end-exclusive column range; empty when
/// the line is too short.
fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start..end).map_or("", str::trim)
}

fn number<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    field: &'static str,
    line_num: usize,
) -> Result<T, StructureParseError> {
    let raw = column(line, start, end);
    raw.parse::<T>().map_err(|_| {
        StructureParseError::at(
            line_num,
            ParseErrorKind::InvalidNumber {
                field,
                value: raw.to_owned(),
            },
        )
    })
}

/// First alphabetic character of the atom name, for files without an
/// element column.
fn guess_element(name: &str) -> String {
    name.chars()
        .find(char::is_ascii_alphabetic)
        .map(|c| c.to_string())
        .unwrap_or_default()
}
