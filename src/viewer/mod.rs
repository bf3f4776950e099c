//! The molecular viewer capability.
//!
//! Everything the explorer does to the 3D view goes through [`MolViewer`],
//! so the same loading and highlighting logic drives the in-memory
//! [`SceneViewer`] on native builds and the browser viewer on the web.

pub mod camera;
pub mod color;
mod scene;
pub mod style;

use glam::Vec3;

pub use scene::{Label, SceneViewer};
pub use style::{AtomSelector, AtomStyle, CartoonStyle, ColorScheme, StickStyle};

use crate::structure::grid::SpatialGrid;
use crate::structure::{Atom, Structure};

/// Operations the explorer needs from a 3D molecular viewer.
///
/// Atom indices are positions in [`Structure::atoms`] of the current model.
pub trait MolViewer {
    /// Remove the model, styles and labels.
    fn clear(&mut self);

    /// Show `structure`, replacing any current model.
    fn add_model(&mut self, structure: Structure);

    /// The current model, if any.
    fn structure(&self) -> Option<&Structure>;

    /// Replace the style of every selected atom.
    fn set_style(&mut self, selector: &AtomSelector, style: &AtomStyle);

    /// Layer `style` onto every selected atom, keeping representations it
    /// does not set.
    fn add_style(&mut self, selector: &AtomSelector, style: &AtomStyle);

    /// Indices of all atoms within `distance` Angstroms of any selected
    /// atom, the selected atoms included. Sorted and unique.
    fn select_within(&self, selector: &AtomSelector, distance: f32) -> Vec<usize> {
        let Some(structure) = self.structure() else {
            return Vec::new();
        };
        let centers = selected_positions(structure, selector);
        SpatialGrid::new(structure.positions(), distance).within(&centers, distance)
    }

    /// Atom at `index` of the current model.
    fn atom(&self, index: usize) -> Option<&Atom> {
        self.structure().and_then(|s| s.atom(index))
    }

    /// Place a text label in world space.
    fn add_label(&mut self, text: &str, position: Vec3);

    /// Remove every label.
    fn remove_all_labels(&mut self);

    /// Make atoms of the current model clickable.
    fn enable_picking(&mut self);

    /// Frame the selected atoms, or the whole model for `None`.
    fn zoom_to(&mut self, selector: Option<&AtomSelector>);

    /// Redraw.
    fn render(&mut self);
}

/// Positions of the atoms `selector` picks out.
#[must_use]
pub fn selected_positions(structure: &Structure, selector: &AtomSelector) -> Vec<Vec3> {
    structure
        .atoms()
        .iter()
        .filter(|a| selector.matches(a))
        .map(|a| a.position)
        .collect()
}

/// Lazily created viewer handle. The viewer is built on first use and
/// reused for the rest of the session.
pub struct ViewerSession<V> {
    handle: Option<V>,
    factory: Box<dyn FnMut() -> V>,
}

impl<V> ViewerSession<V> {
    /// Session that builds its viewer with `factory` when first needed.
    pub fn new(factory: impl FnMut() -> V + 'static) -> Self {
        Self {
            handle: None,
            factory: Box::new(factory),
        }
    }

    /// The viewer, creating it on first call.
    pub fn get_or_create(&mut self) -> &mut V {
        let factory = &mut self.factory;
        self.handle.get_or_insert_with(|| {
            log::debug!("creating molecular viewer");
            factory()
        })
    }

    /// The viewer, if it exists yet.
    #[must_use]
    pub fn get(&self) -> Option<&V> {
        self.handle.as_ref()
    }

    /// Mutable access to the viewer, if it exists yet.
    pub fn get_mut(&mut self) -> Option<&mut V> {
        self.handle.as_mut()
    }

    /// Whether the viewer has been created.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.handle.is_some()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for ViewerSession<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::options::Options;

    #[test]
    fn viewer_is_created_once() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let options = Options::default();
        let mut session = ViewerSession::new(move || {
            counter.set(counter.get() + 1);
            SceneViewer::new(&options.style, &options.camera)
        });
        assert!(!session.is_created());
        assert!(session.get().is_none());

        session.get_or_create().render();
        session.get_or_create().render();
        assert!(session.is_created());
        assert_eq!(built.get(), 1);
        assert_eq!(session.get().map(SceneViewer::frames_rendered), Some(2));
    }
}
