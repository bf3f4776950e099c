// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Browse GPCR–ligand binding predictions and inspect their predicted
//! complex structures.
//!
//! A prediction dataset (a JSON array of receptor–ligand records with
//! numeric scores and a structure file reference) is loaded into a
//! [`dataset::DatasetStore`], searched with [`dataset::filter::filter`] and
//! shown through [`table::ResultsTable`]. Choosing a row fetches its PDB or
//! mmCIF file, parses it into a [`structure::Structure`] and shows it in a
//! [`viewer::MolViewer`], where clicking an atom highlights its residue and
//! every residue within a distance cutoff.
//!
//! # Key entry points
//!
//! - [`session::Session`] - owns all explorer state; front-ends feed it UI
//!   events
//! - [`loader::StructureLoader`] - request/complete structure loading that
//!   drops superseded responses
//! - [`highlight::NeighborhoodHighlighter`] - residue neighborhood emphasis
//! - [`options::Options`] - runtime configuration (dataset mapping, table
//!   caps, style, camera)
//!
//! # Front-ends
//!
//! Native callers drive a [`session::Session`] over the in-memory
//! [`viewer::SceneViewer`] with a [`source::FileSource`] (or an
//! `HttpSource` with the `net` feature). The `web` feature adds a browser
//! front-end that renders through 3Dmol.js.

pub mod dataset;
pub mod error;
pub mod highlight;
pub mod loader;
pub mod options;
pub mod session;
pub mod source;
pub mod structure;
pub mod table;
pub mod viewer;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod fixtures;

pub use error::ExplorerError;
pub use options::Options;
pub use session::Session;
