//! The explorer session: one owned object holding the dataset, the visible
//! results, the scores table, the structure loader, the viewer and the
//! highlighter.
//!
//! Front-ends translate UI events into calls on [`Session`] and mirror its
//! accessors back into the page.

use crate::dataset::filter::filter;
use crate::dataset::{Dataset, DatasetStore};
use crate::error::{FetchError, LoadError};
use crate::highlight::{HighlightState, NeighborhoodHighlighter};
use crate::loader::{LoadOutcome, StructureLoader, StructureRequest};
use crate::options::Options;
use crate::source::ResourceSource;
use crate::table::{ResultsTable, ScoresTable, TableRow};
use crate::viewer::{MolViewer, SceneViewer, ViewerSession};

/// Explorer state for one page or process.
pub struct Session<V> {
    options: Options,
    store: DatasetStore,
    query: String,
    table: ResultsTable,
    scores: Option<ScoresTable>,
    loader: StructureLoader,
    viewer: ViewerSession<V>,
    highlighter: NeighborhoodHighlighter,
}

impl Session<SceneViewer> {
    /// Session backed by the in-memory [`SceneViewer`].
    #[must_use]
    pub fn in_memory(options: Options) -> Self {
        let style = options.style.clone();
        let camera = options.camera.clone();
        Self::new(
            options,
            ViewerSession::new(move || SceneViewer::new(&style, &camera)),
        )
    }
}

impl<V: MolViewer> Session<V> {
    /// Empty session; the viewer is created on the first structure load.
    #[must_use]
    pub fn new(options: Options, viewer: ViewerSession<V>) -> Self {
        Self {
            table: ResultsTable::new(&options.data.mapping, &options.table),
            loader: StructureLoader::new(
                options.structure.clone(),
                options.style.clone(),
            ),
            highlighter: NeighborhoodHighlighter::new(options.style.clone()),
            store: DatasetStore::new(),
            query: String::new(),
            scores: None,
            viewer,
            options,
        }
    }

    /// Replace the dataset with `payload` and show its first rows. On
    /// failure the current dataset and table stay as they are.
    pub fn dataset_loaded(&mut self, payload: &str) -> Result<usize, LoadError> {
        let count = self
            .store
            .replace_from_json(payload, &self.options.data.mapping)?
            .len();
        self.query.clear();
        self.scores = None;
        let initial = filter(self.store.dataset(), "", self.options.table.initial_rows);
        self.table.render(&initial);
        Ok(count)
    }

    /// Fetch the configured dataset through `source` and apply it.
    pub fn load_dataset(&mut self, source: &dyn ResourceSource) -> Result<usize, LoadError> {
        let payload = source
            .fetch_text(&self.options.data.source)
            .inspect_err(|e| log::warn!("dataset fetch failed: {e}"))?;
        self.dataset_loaded(&payload)
    }

    /// Show records matching `query`, up to the display cap. The scores
    /// table is cleared when its pair is no longer among the results.
    pub fn search(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        let visible = filter(self.store.dataset(), query, self.options.table.display_cap);
        self.table.render(&visible);

        let keep = self.scores.as_ref().is_none_or(|scores| {
            visible
                .iter()
                .any(|r| scores.is_pair(r.receptor(), r.ligand()))
        });
        if !keep {
            log::debug!("selected pair filtered out; clearing scores");
            self.scores = None;
        }
    }

    /// Activate the view action of row `index`: show its scores and start
    /// loading its structure. Returns the fetch to perform, or `None` when
    /// there is no such row or the structure is already shown or in flight.
    pub fn select_row(&mut self, index: usize) -> Option<StructureRequest> {
        let row = self.table.row(index)?;
        self.scores = Some(ScoresTable::for_record(self.store.dataset(), &row.record));
        let structure = row.action.structure.clone();
        self.loader.request(&structure)
    }

    /// Report the fetched text for `request`.
    pub fn structure_fetched(
        &mut self,
        request: &StructureRequest,
        fetched: Result<String, FetchError>,
    ) -> LoadOutcome {
        let outcome = self.loader.complete(&mut self.viewer, request, fetched);
        if outcome.is_applied() {
            self.highlighter.reset();
        }
        outcome
    }

    /// [`Self::select_row`] followed by a blocking fetch from `source`.
    pub fn open_structure(
        &mut self,
        source: &dyn ResourceSource,
        index: usize,
    ) -> Option<LoadOutcome> {
        let request = self.select_row(index)?;
        let fetched = source.fetch_text(request.location());
        Some(self.structure_fetched(&request, fetched))
    }

    /// An atom of the displayed model was clicked.
    pub fn atom_clicked(&mut self, index: usize) -> bool {
        self.viewer
            .get_mut()
            .is_some_and(|viewer| self.highlighter.atom_clicked(viewer, index))
    }

    /// The viewer canvas was double-clicked.
    pub fn double_clicked(&mut self) {
        match self.viewer.get_mut() {
            Some(viewer) => self.highlighter.double_clicked(viewer),
            None => self.highlighter.reset(),
        }
    }

    /// Rows currently in the results table.
    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        self.table.rows()
    }

    /// The results table.
    #[must_use]
    pub fn table(&self) -> &ResultsTable {
        &self.table
    }

    /// Autocomplete entries for the search box.
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        self.store.dataset().receptor_suggestions()
    }

    /// Scores of the last selected pair.
    #[must_use]
    pub fn scores(&self) -> Option<&ScoresTable> {
        self.scores.as_ref()
    }

    /// Highlighter state.
    #[must_use]
    pub fn highlight(&self) -> &HighlightState {
        self.highlighter.state()
    }

    /// Current dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        self.store.dataset()
    }

    /// Last search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Reference of the displayed structure.
    #[must_use]
    pub fn displayed_structure(&self) -> Option<&str> {
        self.loader.displayed()
    }

    /// The viewer, once created.
    #[must_use]
    pub fn viewer(&self) -> Option<&V> {
        self.viewer.get()
    }

    /// Session options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}
