//! Structure loading with a stale-response guard.
//!
//! Loading is split in two phases so the fetch can happen anywhere (a
//! blocking read on native, a future in the browser): [`StructureLoader::request`]
//! hands out a [`StructureRequest`] tagged with a fresh [`RequestId`], and
//! [`StructureLoader::complete`] applies the fetched text only if that id is
//! still the latest one. Parsing happens before the viewer is touched, so a
//! failed load leaves the previous model on screen.

use web_time::Instant;

use crate::error::{FetchError, StructureLoadError};
use crate::options::{StructureOptions, StyleOptions};
use crate::source::ResourceSource;
use crate::structure::{Structure, StructureFormat};
use crate::viewer::{AtomSelector, AtomStyle, ColorScheme, MolViewer, ViewerSession};

/// Monotonically increasing identifier of a structure request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// A structure fetch the host must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureRequest {
    id: RequestId,
    reference: String,
    location: String,
}

impl StructureRequest {
    /// Identifier to report back with the fetched text.
    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The record's structure reference.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Where to fetch it from (reference joined with the base path).
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// What [`StructureLoader::complete`] did.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The structure replaced the displayed one.
    Applied {
        /// The displayed reference.
        reference: String,
        /// Atom count of the new model.
        atoms: usize,
    },
    /// A newer request superseded this one; nothing changed.
    Stale,
    /// Fetching or parsing failed; the previous model is still shown.
    Failed(StructureLoadError),
}

impl LoadOutcome {
    /// Whether the viewer now shows the requested structure.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Tracks the latest structure request and the displayed reference.
#[derive(Debug)]
pub struct StructureLoader {
    options: StructureOptions,
    style: StyleOptions,
    next_id: u64,
    pending: Option<StructureRequest>,
    displayed: Option<String>,
    started: Option<Instant>,
}

impl StructureLoader {
    /// Loader with nothing displayed.
    #[must_use]
    pub fn new(options: StructureOptions, style: StyleOptions) -> Self {
        Self {
            options,
            style,
            next_id: 0,
            pending: None,
            displayed: None,
            started: None,
        }
    }

    /// Start loading `reference`. Returns `None` when that reference is
    /// already in flight, or already displayed with nothing else in flight.
    pub fn request(&mut self, reference: &str) -> Option<StructureRequest> {
        match &self.pending {
            Some(p) if p.reference == reference => return None,
            None if self.displayed.as_deref() == Some(reference) => return None,
            _ => {}
        }

        self.next_id += 1;
        let request = StructureRequest {
            id: RequestId(self.next_id),
            reference: reference.to_owned(),
            location: self.options.resolve(reference),
        };
        if let Some(old) = self.pending.replace(request.clone()) {
            log::debug!(
                "structure {} superseded by {}",
                old.reference,
                request.reference
            );
        }
        self.started = Some(Instant::now());
        Some(request)
    }

    /// Apply the fetched text of `request` to the viewer, unless a newer
    /// request has been issued since.
    pub fn complete<V: MolViewer>(
        &mut self,
        viewer: &mut ViewerSession<V>,
        request: &StructureRequest,
        fetched: Result<String, FetchError>,
    ) -> LoadOutcome {
        if self.pending.as_ref().map(StructureRequest::id) != Some(request.id) {
            log::debug!("dropping stale structure response for {}", request.reference);
            return LoadOutcome::Stale;
        }
        self.pending = None;

        let structure = match fetched
            .map_err(StructureLoadError::from)
            .and_then(|text| self.parse(&request.reference, &text))
        {
            Ok(s) => s,
            Err(e) => {
                log::warn!("failed to load structure {}: {e}", request.reference);
                return LoadOutcome::Failed(e);
            }
        };

        let atoms = structure.atoms().len();
        let view = viewer.get_or_create();
        view.clear();
        view.add_model(structure);
        apply_base_style(view, &self.style);
        view.enable_picking();
        view.zoom_to(None);
        view.render();

        if let Some(started) = self.started.take() {
            log::info!(
                "loaded structure {} ({atoms} atoms) in {:.1} ms",
                request.reference,
                started.elapsed().as_secs_f64() * 1000.0
            );
        }
        self.displayed = Some(request.reference.clone());
        LoadOutcome::Applied {
            reference: request.reference.clone(),
            atoms,
        }
    }

    /// Request, fetch from `source` and apply in one call. `None` when the
    /// request was deduplicated.
    pub fn load_blocking<V: MolViewer>(
        &mut self,
        viewer: &mut ViewerSession<V>,
        source: &dyn ResourceSource,
        reference: &str,
    ) -> Option<LoadOutcome> {
        let request = self.request(reference)?;
        let fetched = source.fetch_text(request.location());
        Some(self.complete(viewer, &request, fetched))
    }

    /// Reference of the displayed structure.
    #[must_use]
    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    /// The request currently in flight.
    #[must_use]
    pub fn pending(&self) -> Option<&StructureRequest> {
        self.pending.as_ref()
    }

    /// Base style settings.
    #[must_use]
    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    fn parse(&self, reference: &str, text: &str) -> Result<Structure, StructureLoadError> {
        let format = StructureFormat::resolve(self.options.format, reference, text);
        Ok(Structure::parse(text, format)?)
    }
}

/// Reset every atom to the base look: B-factor spectrum ribbon for the
/// polymer, sticks for hetero groups, solvent hidden.
pub fn apply_base_style(viewer: &mut dyn MolViewer, style: &StyleOptions) {
    let ribbon = AtomStyle::cartoon(ColorScheme::BFactorSpectrum {
        min: style.spectrum_min,
        max: style.spectrum_max,
        gradient: style.gradient.clone(),
    });
    viewer.set_style(&AtomSelector::hetero(false), &ribbon);
    viewer.set_style(
        &AtomSelector::hetero(true),
        &AtomStyle::stick(style.hetero_stick_radius),
    );
    viewer.set_style(
        &AtomSelector::residue_names(&style.solvent_residues),
        &AtomStyle::hidden(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{LINEAR_PDB, SINGLE_RESIDUE_PDB};
    use crate::options::{CameraOptions, FormatPreference};
    use crate::source::memory::MemorySource;
    use crate::viewer::SceneViewer;

    fn session() -> ViewerSession<SceneViewer> {
        ViewerSession::new(|| {
            SceneViewer::new(&StyleOptions::default(), &CameraOptions::default())
        })
    }

    fn loader() -> StructureLoader {
        StructureLoader::new(StructureOptions::default(), StyleOptions::default())
    }

    #[test]
    fn applies_structure_with_base_style() {
        let mut viewer = session();
        let mut loader = loader();
        let request = loader.request("a.pdb").unwrap();
        let outcome = loader.complete(&mut viewer, &request, Ok(LINEAR_PDB.to_owned()));
        assert!(outcome.is_applied());
        assert_eq!(loader.displayed(), Some("a.pdb"));

        let scene = viewer.get().unwrap();
        assert!(scene.picking_enabled());
        assert_eq!(scene.frames_rendered(), 1);
        assert!(scene.style(0).unwrap().cartoon.is_some());
        assert_eq!(scene.style(8).unwrap().stick.map(|s| s.radius), Some(0.25));
        assert!(scene.style(8).unwrap().cartoon.is_none());
        // water hidden
        assert!(!scene.style(10).unwrap().is_visible());
        assert_eq!(scene.visible_atoms().len(), 10);
    }

    #[test]
    fn duplicate_requests_are_suppressed() {
        let mut viewer = session();
        let mut loader = loader();
        let request = loader.request("a.pdb").unwrap();
        assert!(loader.request("a.pdb").is_none());
        let _ = loader.complete(&mut viewer, &request, Ok(LINEAR_PDB.to_owned()));
        assert!(loader.request("a.pdb").is_none());
        assert!(loader.request("b.pdb").is_some());
    }

    #[test]
    fn superseded_response_is_stale() {
        let mut viewer = session();
        let mut loader = loader();
        let first = loader.request("a.pdb").unwrap();
        let second = loader.request("b.pdb").unwrap();
        assert!(second.id() > first.id());

        let applied =
            loader.complete(&mut viewer, &second, Ok(SINGLE_RESIDUE_PDB.to_owned()));
        assert!(applied.is_applied());
        let late = loader.complete(&mut viewer, &first, Ok(LINEAR_PDB.to_owned()));
        assert!(matches!(late, LoadOutcome::Stale));

        let scene = viewer.get().unwrap();
        assert_eq!(scene.structure().map(|s| s.atoms().len()), Some(2));
        assert_eq!(loader.displayed(), Some("b.pdb"));
    }

    #[test]
    fn failed_parse_keeps_previous_model() {
        let mut viewer = session();
        let mut loader = loader();
        let ok = loader.request("a.pdb").unwrap();
        let _ = loader.complete(&mut viewer, &ok, Ok(LINEAR_PDB.to_owned()));

        let bad = loader.request("broken.pdb").unwrap();
        let outcome = loader.complete(&mut viewer, &bad, Ok("nothing here".to_owned()));
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(StructureLoadError::Parse(_))
        ));
        assert_eq!(loader.displayed(), Some("a.pdb"));
        let scene = viewer.get().unwrap();
        assert_eq!(scene.structure().map(|s| s.atoms().len()), Some(11));
        assert_eq!(scene.frames_rendered(), 1);
    }

    #[test]
    fn failed_fetch_does_not_create_viewer() {
        let mut viewer = session();
        let mut loader = loader();
        let source = MemorySource::default();
        let outcome = loader.load_blocking(&mut viewer, &source, "missing.pdb");
        assert!(matches!(
            outcome,
            Some(LoadOutcome::Failed(StructureLoadError::Fetch(_)))
        ));
        assert!(!viewer.is_created());
        assert!(loader.displayed().is_none());
        // a retry is allowed after a failure
        assert!(loader.request("missing.pdb").is_some());
    }

    #[test]
    fn blocking_load_uses_resolved_location() {
        let mut viewer = session();
        let options = StructureOptions {
            base_path: "structures/".to_owned(),
            format: FormatPreference::Auto,
        };
        let mut loader = StructureLoader::new(options, StyleOptions::default());
        let source = MemorySource::default().with("structures/a.pdb", LINEAR_PDB);
        let outcome = loader.load_blocking(&mut viewer, &source, "a.pdb");
        assert!(outcome.is_some_and(|o| o.is_applied()));
        assert_eq!(source.fetch_count("structures/a.pdb"), 1);
        assert!(loader.load_blocking(&mut viewer, &source, "a.pdb").is_none());
        assert_eq!(source.fetch_count("structures/a.pdb"), 1);
    }
}
