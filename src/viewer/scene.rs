//! In-memory viewer used by native builds and tests.

use glam::Vec3;

use super::camera::Camera;
use super::color::scheme_color;
use super::style::{AtomSelector, AtomStyle};
use super::{selected_positions, MolViewer};
use crate::options::{CameraOptions, StyleOptions};
use crate::structure::grid::SpatialGrid;
use crate::structure::Structure;

/// A text label placed in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Label text.
    pub text: String,
    /// Anchor position.
    pub position: Vec3,
}

/// Scene state kept entirely in memory: the model, per-atom styles, labels
/// and an orbit camera. Rendering only counts frames.
#[derive(Debug)]
pub struct SceneViewer {
    background: String,
    camera: Camera,
    model: Option<Structure>,
    grid: SpatialGrid,
    grid_cell: f32,
    styles: Vec<AtomStyle>,
    labels: Vec<Label>,
    picking: bool,
    frames: u64,
}

impl SceneViewer {
    /// Empty scene.
    #[must_use]
    pub fn new(style: &StyleOptions, camera: &CameraOptions) -> Self {
        Self {
            background: style.background.clone(),
            camera: Camera::new(camera),
            model: None,
            grid: SpatialGrid::default(),
            grid_cell: style.neighbor_cutoff,
            styles: Vec::new(),
            labels: Vec::new(),
            picking: false,
            frames: 0,
        }
    }

    /// Background color.
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// The orbit camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current style of atom `index`.
    #[must_use]
    pub fn style(&self, index: usize) -> Option<&AtomStyle> {
        self.styles.get(index)
    }

    /// Labels currently shown.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Whether atoms respond to clicks.
    #[must_use]
    pub fn picking_enabled(&self) -> bool {
        self.picking
    }

    /// Number of `render` calls so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Indices of atoms that have any representation.
    #[must_use]
    pub fn visible_atoms(&self) -> Vec<usize> {
        self.styles
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.is_visible().then_some(i))
            .collect()
    }

    /// Ribbon color of atom `index`, if it is drawn as cartoon.
    #[must_use]
    pub fn cartoon_color(&self, index: usize) -> Option<[f32; 3]> {
        let cartoon = self.styles.get(index)?.cartoon.as_ref()?;
        let atom = self.model.as_ref()?.atom(index)?;
        Some(scheme_color(&cartoon.color, atom.b_factor))
    }

    fn for_selected(&mut self, selector: &AtomSelector, mut apply: impl FnMut(&mut AtomStyle)) {
        let Some(model) = &self.model else {
            return;
        };
        for (atom, style) in model.atoms().iter().zip(self.styles.iter_mut()) {
            if selector.matches(atom) {
                apply(style);
            }
        }
    }
}

impl MolViewer for SceneViewer {
    fn clear(&mut self) {
        self.model = None;
        self.grid = SpatialGrid::default();
        self.styles.clear();
        self.labels.clear();
        self.picking = false;
    }

    fn add_model(&mut self, structure: Structure) {
        log::debug!("scene model: {} atoms", structure.atoms().len());
        self.grid = SpatialGrid::new(structure.positions(), self.grid_cell);
        self.styles = vec![AtomStyle::hidden(); structure.atoms().len()];
        self.picking = false;
        self.model = Some(structure);
    }

    fn structure(&self) -> Option<&Structure> {
        self.model.as_ref()
    }

    fn set_style(&mut self, selector: &AtomSelector, style: &AtomStyle) {
        self.for_selected(selector, |s| *s = style.clone());
    }

    fn add_style(&mut self, selector: &AtomSelector, style: &AtomStyle) {
        self.for_selected(selector, |s| s.merge(style));
    }

    fn select_within(&self, selector: &AtomSelector, distance: f32) -> Vec<usize> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        self.grid
            .within(&selected_positions(model, selector), distance)
    }

    fn add_label(&mut self, text: &str, position: Vec3) {
        self.labels.push(Label {
            text: text.to_owned(),
            position,
        });
    }

    fn remove_all_labels(&mut self) {
        self.labels.clear();
    }

    fn enable_picking(&mut self) {
        self.picking = self.model.is_some();
    }

    fn zoom_to(&mut self, selector: Option<&AtomSelector>) {
        let Some(model) = &self.model else {
            return;
        };
        let positions = match selector {
            Some(sel) => selected_positions(model, sel),
            None => model.positions(),
        };
        self.camera.fit_to_positions(&positions);
    }

    fn render(&mut self) {
        self.frames += 1;
    }
}
