//! Blocking resource sources for native consumers.
//!
//! The browser front-end fetches asynchronously and hands payloads to the
//! session directly; these sources cover everything else (tests, tools,
//! native embedders).

use std::path::{Path, PathBuf};

use crate::error::FetchError;

/// Something that can turn a reference (relative path or URL) into text.
pub trait ResourceSource {
    /// Retrieve the full text behind `reference`.
    fn fetch_text(&self, reference: &str) -> Result<String, FetchError>;
}

/// Reads references as paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory references are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for FileSource {
    fn fetch_text(&self, reference: &str) -> Result<String, FetchError> {
        let path = self.root.join(reference);
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
            reference: reference.to_owned(),
            source,
        })
    }
}

/// Fetches references over HTTP(S), relative to a base URL.
#[cfg(feature = "net")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
}

#[cfg(feature = "net")]
impl HttpSource {
    /// Source resolving relative references against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, reference: &str) -> String {
        if reference.contains("://") {
            reference.to_owned()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                reference.trim_start_matches('/')
            )
        }
    }
}

#[cfg(feature = "net")]
impl ResourceSource for HttpSource {
    fn fetch_text(&self, reference: &str) -> Result<String, FetchError> {
        let url = self.url_for(reference);
        log::debug!("GET {url}");
        let response = ureq::get(&url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => FetchError::Status {
                reference: reference.to_owned(),
                status,
            },
            other => FetchError::Transport {
                reference: reference.to_owned(),
                message: other.to_string(),
            },
        })?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Transport {
                reference: reference.to_owned(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::ResourceSource;
    use crate::error::FetchError;

    /// In-memory source that counts fetches per reference.
    #[derive(Default)]
    pub(crate) struct MemorySource {
        files: HashMap<String, String>,
        fetches: RefCell<Vec<String>>,
    }

    impl MemorySource {
        pub(crate) fn with(mut self, reference: &str, text: &str) -> Self {
            let _ = self.files.insert(reference.to_owned(), text.to_owned());
            self
        }

        pub(crate) fn fetch_count(&self, reference: &str) -> usize {
            self.fetches
                .borrow()
                .iter()
                .filter(|r| r.as_str() == reference)
                .count()
        }
    }

    impl ResourceSource for MemorySource {
        fn fetch_text(&self, reference: &str) -> Result<String, FetchError> {
            self.fetches.borrow_mut().push(reference.to_owned());
            self.files
                .get(reference)
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    reference: reference.to_owned(),
                    status: 404,
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_reads_relative_to_root() {
        let dir = std::env::temp_dir().join("gpcr-explorer-file-source");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("data.json"), "[]").unwrap();

        let source = FileSource::new(&dir);
        assert_eq!(source.fetch_text("data.json").unwrap(), "[]");

        let err = source.fetch_text("missing.json").unwrap_err();
        assert_eq!(err.reference(), "missing.json");
        assert!(matches!(err, FetchError::Io { .. }));
    }
}
