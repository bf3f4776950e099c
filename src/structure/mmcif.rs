//! mmCIF `_atom_site` reader.
//!
//! Only the `_atom_site` loop is interpreted; every other category is
//! skipped. Loop rows may wrap across lines, so values are streamed into a
//! token buffer and drained one full row at a time.

use glam::Vec3;

use super::Atom;
use crate::error::{ParseErrorKind, StructureParseError};

/// Column positions within the `_atom_site` loop header.
#[derive(Default)]
struct AtomSiteColumns {
    count: usize,
    group_pdb: Option<usize>,
    id: Option<usize>,
    type_symbol: Option<usize>,
    auth_atom_id: Option<usize>,
    label_atom_id: Option<usize>,
    auth_comp_id: Option<usize>,
    label_comp_id: Option<usize>,
    auth_asym_id: Option<usize>,
    label_asym_id: Option<usize>,
    auth_seq_id: Option<usize>,
    label_seq_id: Option<usize>,
    cartn_x: Option<usize>,
    cartn_y: Option<usize>,
    cartn_z: Option<usize>,
    b_iso: Option<usize>,
    model_num: Option<usize>,
}

impl AtomSiteColumns {
    fn from_headers(headers: &[String]) -> Self {
        let mut cols = Self {
            count: headers.len(),
            ..Self::default()
        };
        for (i, header) in headers.iter().enumerate() {
            let Some(name) = header.strip_prefix("_atom_site.") else {
                continue;
            };
            let slot = match name {
                "group_PDB" => &mut cols.group_pdb,
                "id" => &mut cols.id,
                "type_symbol" => &mut cols.type_symbol,
                "auth_atom_id" => &mut cols.auth_atom_id,
                "label_atom_id" => &mut cols.label_atom_id,
                "auth_comp_id" => &mut cols.auth_comp_id,
                "label_comp_id" => &mut cols.label_comp_id,
                "auth_asym_id" => &mut cols.auth_asym_id,
                "label_asym_id" => &mut cols.label_asym_id,
                "auth_seq_id" => &mut cols.auth_seq_id,
                "label_seq_id" => &mut cols.label_seq_id,
                "Cartn_x" => &mut cols.cartn_x,
                "Cartn_y" => &mut cols.cartn_y,
                "Cartn_z" => &mut cols.cartn_z,
                "B_iso_or_equiv" => &mut cols.b_iso,
                "pdbx_PDB_model_num" => &mut cols.model_num,
                _ => continue,
            };
            *slot = Some(i);
        }
        cols
    }

    /// Required columns, author-assigned variants preferred.
    fn required(&self, line: usize) -> Result<RequiredColumns, StructureParseError> {
        let need = |idx: Option<usize>, name: &'static str| {
            idx.ok_or_else(|| {
                StructureParseError::at(line, ParseErrorKind::MissingColumn(name))
            })
        };
        Ok(RequiredColumns {
            atom: need(self.auth_atom_id.or(self.label_atom_id), "label_atom_id")?,
            comp: need(self.auth_comp_id.or(self.label_comp_id), "label_comp_id")?,
            asym: need(self.auth_asym_id.or(self.label_asym_id), "label_asym_id")?,
            seq: need(self.auth_seq_id.or(self.label_seq_id), "label_seq_id")?,
            x: need(self.cartn_x, "Cartn_x")?,
            y: need(self.cartn_y, "Cartn_y")?,
            z: need(self.cartn_z, "Cartn_z")?,
        })
    }
}

struct RequiredColumns {
    atom: usize,
    comp: usize,
    asym: usize,
    seq: usize,
    x: usize,
    y: usize,
    z: usize,
}

enum State {
    Base,
    LoopHeader(Vec<String>),
    AtomSite {
        cols: AtomSiteColumns,
        required: Option<RequiredColumns>,
        pending: Vec<String>,
    },
    OtherLoop,
}

/// Read the first model of the `_atom_site` loop.
pub(super) fn read_atoms(text: &str) -> Result<Vec<Atom>, StructureParseError> {
    let mut atoms = Vec::new();
    let mut first_model: Option<String> = None;
    let mut state = State::Base;
    let mut in_text_field = false;
    let mut line_num = 0;

    for (i, raw) in text.lines().enumerate() {
        line_num = i + 1;
        if raw.starts_with(';') {
            in_text_field = !in_text_field;
            continue;
        }
        let trimmed = raw.trim();
        if in_text_field || trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let tokens = tokenize(trimmed);
        let Some(head) = tokens.first().map(String::as_str) else {
            continue;
        };

        if head == "loop_" || head.starts_with("data_") {
            finish_loop(&state, line_num)?;
            state = if head == "loop_" {
                State::LoopHeader(Vec::new())
            } else {
                State::Base
            };
            continue;
        }

        let is_tag = head.starts_with('_');
        if let State::LoopHeader(headers) = &mut state {
            if is_tag {
                headers.push(tokens[0].clone());
                continue;
            }
            state = if headers.iter().any(|h| h.starts_with("_atom_site.")) {
                State::AtomSite {
                    cols: AtomSiteColumns::from_headers(headers),
                    required: None,
                    pending: Vec::new(),
                }
            } else {
                State::OtherLoop
            };
        } else if is_tag {
            finish_loop(&state, line_num)?;
            state = State::Base;
            continue;
        }

        if matches!(state, State::AtomSite { .. }) {
            push_values(
                &mut state,
                tokens,
                line_num,
                &mut first_model,
                &mut atoms,
            )?;
        }
    }

    finish_loop(&state, line_num)?;
    Ok(atoms)
}

fn finish_loop(state: &State, line: usize) -> Result<(), StructureParseError> {
    if let State::AtomSite { cols, pending, .. } = state {
        if !pending.is_empty() {
            return Err(StructureParseError::at(
                line,
                ParseErrorKind::ShortRow {
                    expected: cols.count,
                    found: pending.len(),
                },
            ));
        }
    }
    Ok(())
}

fn push_values(
    state: &mut State,
    tokens: Vec<String>,
    line: usize,
    first_model: &mut Option<String>,
    atoms: &mut Vec<Atom>,
) -> Result<(), StructureParseError> {
    let State::AtomSite {
        cols,
        required,
        pending,
    } = state
    else {
        return Ok(());
    };
    if required.is_none() {
        *required = Some(cols.required(line)?);
    }
    let Some(req) = required.as_ref() else {
        return Ok(());
    };

    pending.extend(tokens);
    while cols.count > 0 && pending.len() >= cols.count {
        let row: Vec<String> = pending.drain(..cols.count).collect();
        if let Some(model_col) = cols.model_num {
            let model = &row[model_col];
            if first_model.get_or_insert_with(|| model.clone()) != model {
                continue;
            }
        }
        atoms.push(atom_from_row(&row, cols, req, line, atoms.len())?);
    }
    Ok(())
}

fn atom_from_row(
    row: &[String],
    cols: &AtomSiteColumns,
    req: &RequiredColumns,
    line: usize,
    index: usize,
) -> Result<Atom, StructureParseError> {
    let optional = |idx: Option<usize>| {
        idx.map(|i| row[i].as_str()).filter(|v| !is_null(v))
    };

    let residue_seq = optional(Some(req.seq))
        .or_else(|| optional(cols.label_seq_id))
        .map_or(Ok(0), |v| parse(v, "residue number", line))?;
    let position = Vec3::new(
        parse(&row[req.x], "Cartn_x", line)?,
        parse(&row[req.y], "Cartn_y", line)?,
        parse(&row[req.z], "Cartn_z", line)?,
    );
    let b_factor = optional(cols.b_iso)
        .and_then(|v| v.parse::<f32>().ok())
        .unwrap_or(0.0);
    let serial = optional(cols.id)
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(index as u32 + 1);

    Ok(Atom {
        serial,
        name: row[req.atom].clone(),
        residue_name: row[req.comp].clone(),
        chain: row[req.asym].clone(),
        residue_seq,
        position,
        b_factor,
        element: optional(cols.type_symbol).unwrap_or_default().to_owned(),
        hetero: optional(cols.group_pdb) == Some("HETATM"),
    })
}

/// `.` (inapplicable) and `?` (unknown) are CIF null values.
fn is_null(value: &str) -> bool {
    value == "." || value == "?"
}

fn parse<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, StructureParseError> {
    value.parse::<T>().map_err(|_| {
        StructureParseError::at(
            line,
            ParseErrorKind::InvalidNumber {
                field,
                value: value.to_owned(),
            },
        )
    })
}

/// Split a line into CIF tokens. A quote opens a quoted value only at the
/// start of a token and closes it only when followed by whitespace, so
/// primes inside names like `C1'` survive.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match in_quote {
            Some(q) => {
                let at_boundary =
                    chars.peek().is_none_or(|next| next.is_whitespace());
                if c == q && at_boundary {
                    in_quote = None;
                    tokens.push(std::mem::take(&mut current));
                } else {
                    current.push(c);
                }
            }
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None if (c == '\'' || c == '"') && current.is_empty() => {
                in_quote = Some(c);
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
