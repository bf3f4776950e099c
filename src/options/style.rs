use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Style", inline)]
#[serde(default)]
/// Base structure style and neighborhood highlight parameters.
pub struct StyleOptions {
    /// Viewer background color (any CSS color string).
    #[schemars(title = "Background")]
    pub background: String,
    /// B-factor mapped to the first gradient stop.
    #[schemars(title = "Spectrum Min", range(min = 0.0, max = 100.0))]
    pub spectrum_min: f32,
    /// B-factor mapped to the last gradient stop.
    #[schemars(title = "Spectrum Max", range(min = 0.0, max = 100.0))]
    pub spectrum_max: f32,
    /// Evenly spaced RGB stops of the ribbon spectrum.
    #[schemars(skip)]
    pub gradient: Vec<[f32; 3]>,
    /// Stick radius for hetero atoms in the base style.
    #[schemars(title = "Ligand Stick Radius", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub hetero_stick_radius: f32,
    /// Stick radius for the clicked residue.
    #[schemars(title = "Selected Stick Radius", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub selected_stick_radius: f32,
    /// Stick radius for residues near the clicked one.
    #[schemars(title = "Neighbor Stick Radius", range(min = 0.05, max = 1.0), extend("step" = 0.05))]
    pub neighbor_stick_radius: f32,
    /// Distance cutoff in Angstroms for the neighborhood query.
    #[schemars(title = "Neighbor Cutoff", range(min = 1.0, max = 15.0), extend("step" = 0.5))]
    pub neighbor_cutoff: f32,
    /// Residue names treated as solvent and never drawn.
    #[schemars(skip)]
    pub solvent_residues: Vec<String>,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            background: "white".to_owned(),
            spectrum_min: 50.0,
            spectrum_max: 90.0,
            // red -> orange -> yellow -> green -> blue
            gradient: vec![
                [0.9, 0.1, 0.1],
                [1.0, 0.55, 0.0],
                [1.0, 0.9, 0.1],
                [0.1, 0.75, 0.2],
                [0.1, 0.3, 0.9],
            ],
            hetero_stick_radius: 0.25,
            selected_stick_radius: 0.35,
            neighbor_stick_radius: 0.15,
            neighbor_cutoff: 5.0,
            solvent_residues: vec![
                "HOH".to_owned(),
                "WAT".to_owned(),
                "DOD".to_owned(),
            ],
        }
    }
}

impl StyleOptions {
    /// Whether a residue name is treated as solvent.
    #[must_use]
    pub fn is_solvent(&self, residue_name: &str) -> bool {
        let name = residue_name.trim();
        self.solvent_residues.iter().any(|s| s == name)
    }
}
