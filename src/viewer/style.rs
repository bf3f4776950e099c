//! Atom selectors and visual styles understood by every viewer backend.

use crate::structure::{Atom, ResidueKey};

/// Which atoms a style or query applies to. Every populated criterion must
/// match; empty lists and `None` match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomSelector {
    /// Restrict to these residues.
    pub residues: Vec<ResidueKey>,
    /// Restrict to these residue names.
    pub residue_names: Vec<String>,
    /// Restrict to hetero (`Some(true)`) or standard (`Some(false)`) atoms.
    pub hetero: Option<bool>,
}

impl AtomSelector {
    /// Every atom.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Atoms of one residue.
    #[must_use]
    pub fn residue(key: ResidueKey) -> Self {
        Self {
            residues: vec![key],
            ..Self::default()
        }
    }

    /// Atoms of any of the given residues.
    #[must_use]
    pub fn residues(keys: Vec<ResidueKey>) -> Self {
        Self {
            residues: keys,
            ..Self::default()
        }
    }

    /// Hetero or standard atoms.
    #[must_use]
    pub fn hetero(hetero: bool) -> Self {
        Self {
            hetero: Some(hetero),
            ..Self::default()
        }
    }

    /// Atoms whose residue name is in `names`.
    #[must_use]
    pub fn residue_names(names: &[String]) -> Self {
        Self {
            residue_names: names.to_vec(),
            ..Self::default()
        }
    }

    /// Whether `atom` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, atom: &Atom) -> bool {
        self.hetero.is_none_or(|h| atom.hetero == h)
            && (self.residue_names.is_empty()
                || self.residue_names.iter().any(|n| *n == atom.residue_name))
            && (self.residues.is_empty()
                || self.residues.iter().any(|k| {
                    k.seq == atom.residue_seq && k.chain == atom.chain
                }))
    }
}

/// How ribbon atoms are colored.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScheme {
    /// One color for everything.
    Uniform([f32; 3]),
    /// Gradient over the B-factor column, clamped to `[min, max]`.
    BFactorSpectrum {
        /// Value mapped to the first stop.
        min: f32,
        /// Value mapped to the last stop.
        max: f32,
        /// Evenly spaced RGB stops.
        gradient: Vec<[f32; 3]>,
    },
}

/// Backbone ribbon representation.
#[derive(Debug, Clone, PartialEq)]
pub struct CartoonStyle {
    /// Ribbon coloring.
    pub color: ColorScheme,
}

/// Stick (ball-and-stick) representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickStyle {
    /// Stick radius in Angstroms.
    pub radius: f32,
}

/// Per-atom visual representation. An atom with no representation is not
/// drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomStyle {
    /// Ribbon, if drawn as part of the backbone trace.
    pub cartoon: Option<CartoonStyle>,
    /// Sticks, if drawn as ball-and-stick.
    pub stick: Option<StickStyle>,
}

impl AtomStyle {
    /// Draw nothing.
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Ribbon only.
    #[must_use]
    pub fn cartoon(color: ColorScheme) -> Self {
        Self {
            cartoon: Some(CartoonStyle { color }),
            stick: None,
        }
    }

    /// Sticks only.
    #[must_use]
    pub fn stick(radius: f32) -> Self {
        Self {
            cartoon: None,
            stick: Some(StickStyle { radius }),
        }
    }

    /// Whether anything is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.cartoon.is_some() || self.stick.is_some()
    }

    /// Layer `other` on top: representations it sets replace ours, the rest
    /// are kept.
    pub fn merge(&mut self, other: &AtomStyle) {
        if let Some(cartoon) = &other.cartoon {
            self.cartoon = Some(cartoon.clone());
        }
        if let Some(stick) = other.stick {
            self.stick = Some(stick);
        }
    }
}
