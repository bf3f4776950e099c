//! Click-to-highlight of a residue and its spatial neighborhood.

use rustc_hash::FxHashSet;

use crate::loader::apply_base_style;
use crate::options::StyleOptions;
use crate::structure::{Atom, ResidueKey};
use crate::viewer::{AtomSelector, AtomStyle, MolViewer};

/// The residue picked by the last click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomSelection {
    /// Index of the clicked atom.
    pub atom: usize,
    /// Residue the clicked atom belongs to.
    pub residue: ResidueKey,
    /// Its three-letter name.
    pub residue_name: String,
    /// Other residues within the cutoff, sorted.
    pub neighbors: Vec<ResidueKey>,
}

impl AtomSelection {
    /// Label shown at the clicked atom, e.g. `ASP A:113`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} {}:{}",
            self.residue_name, self.residue.chain, self.residue.seq
        )
    }
}

/// Highlighter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HighlightState {
    /// Base style only.
    #[default]
    Neutral,
    /// A residue and its neighborhood are emphasized.
    Selected(AtomSelection),
}

/// Applies and clears residue neighborhood highlights on a viewer.
#[derive(Debug, Clone)]
pub struct NeighborhoodHighlighter {
    style: StyleOptions,
    state: HighlightState,
}

impl NeighborhoodHighlighter {
    /// Neutral highlighter using `style` for radii and the cutoff.
    #[must_use]
    pub fn new(style: StyleOptions) -> Self {
        Self {
            style,
            state: HighlightState::Neutral,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    /// Forget the selection without touching the viewer. Used when a new
    /// structure replaces the old one.
    pub fn reset(&mut self) {
        self.state = HighlightState::Neutral;
    }

    /// Highlight the residue of atom `index`. Returns `false` and leaves
    /// everything as is when the index does not name an atom of the
    /// current model.
    pub fn atom_clicked(&mut self, viewer: &mut dyn MolViewer, index: usize) -> bool {
        let Some(atom) = viewer.atom(index) else {
            log::debug!("ignoring click on unknown atom {index}");
            return false;
        };
        let residue = atom.residue_key();
        let residue_name = atom.residue_name.clone();
        let anchor = atom.position;

        apply_base_style(viewer, &self.style);
        viewer.remove_all_labels();

        let selected = AtomSelector::residue(residue.clone());
        let neighbors = neighbor_residues(viewer, &selected, &residue, &self.style);

        if !neighbors.is_empty() {
            viewer.add_style(
                &AtomSelector::residues(neighbors.clone()),
                &AtomStyle::stick(self.style.neighbor_stick_radius),
            );
        }
        viewer.add_style(&selected, &AtomStyle::stick(self.style.selected_stick_radius));

        let selection = AtomSelection {
            atom: index,
            residue,
            residue_name,
            neighbors,
        };
        viewer.add_label(&selection.label(), anchor);

        let mut framed = selection.neighbors.clone();
        framed.push(selection.residue.clone());
        viewer.zoom_to(Some(&AtomSelector::residues(framed)));
        viewer.render();

        log::debug!(
            "selected {} with {} neighboring residues",
            selection.label(),
            selection.neighbors.len()
        );
        self.state = HighlightState::Selected(selection);
        true
    }

    /// Drop the highlight and frame the whole model.
    pub fn double_clicked(&mut self, viewer: &mut dyn MolViewer) {
        if viewer.structure().is_some() {
            viewer.remove_all_labels();
            apply_base_style(viewer, &self.style);
            viewer.zoom_to(None);
            viewer.render();
        }
        if self.state != HighlightState::Neutral {
            log::debug!("highlight cleared");
        }
        self.state = HighlightState::Neutral;
    }
}

/// Residues other than `residue` with any atom within the neighbor cutoff
/// of it. Solvent stays hidden and is never a neighbor.
fn neighbor_residues(
    viewer: &dyn MolViewer,
    selected: &AtomSelector,
    residue: &ResidueKey,
    style: &StyleOptions,
) -> Vec<ResidueKey> {
    let Some(structure) = viewer.structure() else {
        return Vec::new();
    };
    let set: FxHashSet<ResidueKey> = viewer
        .select_within(selected, style.neighbor_cutoff)
        .into_iter()
        .filter_map(|i| structure.atom(i))
        .filter(|a| !style.is_solvent(&a.residue_name))
        .map(Atom::residue_key)
        .filter(|k| k != residue)
        .collect();
    let mut keys: Vec<ResidueKey> = set.into_iter().collect();
    keys.sort();
    keys
}
