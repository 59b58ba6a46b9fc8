//! A fetched-and-parsed set of documentation pages for one run.

use indexmap::IndexMap;

use crate::error::Result;
use crate::fetch::DocFetcher;
use crate::parser::parse_page;
use crate::records::DocPage;
use crate::toc::parse_toc;
use crate::url::{MODULE_PAGE, class_page_file, doc_root};

/// Page name used for the module-level free-function listing.
pub const MODULE_PAGE_NAME: &str = "pyfbsdk";

#[derive(Debug, Default)]
pub struct DocLibrary {
    pages: IndexMap<String, DocPage>,
}

impl DocLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, page: DocPage) {
        self.pages.insert(page.name.clone(), page);
    }

    pub fn page(&self, name: &str) -> Option<&DocPage> {
        self.pages.get(name)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Fetch and parse every named page for `version` from the help site.
    pub fn fetch(
        fetcher: &DocFetcher,
        version: u32,
        page_names: &[String],
        workers: usize,
    ) -> Result<Self> {
        Self::fetch_from(fetcher, &doc_root(version), page_names, workers)
    }

    /// Fetch and parse every named page under an explicit documentation
    /// root URL.
    ///
    /// Page paths come from the site TOC when it resolves, with a fall back
    /// to the Doxygen file-name convention. Fetch failures degrade to empty
    /// pages (the reconciler then leaves those signatures unpatched);
    /// malformed member tables fail the run via `parse_page`.
    pub fn fetch_from(
        fetcher: &DocFetcher,
        root: &str,
        page_names: &[String],
        workers: usize,
    ) -> Result<Self> {
        let root = root.trim_end_matches('/');
        let toc = match fetcher.fetch(&format!("{root}/contents.js")) {
            Ok(payload) => parse_toc(&payload),
            Err(e) => {
                tracing::warn!(error = %e, "TOC fetch failed, falling back to guessed page names");
                IndexMap::new()
            }
        };

        let resolved: Vec<(String, String)> = page_names
            .iter()
            .map(|name| {
                let relative = toc
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| guess_page_file(name));
                let relative = relative.trim_start_matches('/');
                (name.clone(), format!("{root}/{relative}"))
            })
            .collect();

        let urls: Vec<String> = resolved.iter().map(|(_, url)| url.clone()).collect();
        fetcher.prefetch(&urls, workers);

        let mut library = Self::empty();
        for (name, url) in resolved {
            match fetcher.fetch(&url) {
                Ok(html) => library.insert(parse_page(&name, &html, &url)?),
                Err(e) => {
                    tracing::warn!(page = %name, error = %e, "page fetch failed, degrading to empty record set");
                    library.insert(DocPage::empty(name));
                }
            }
        }
        Ok(library)
    }
}

fn guess_page_file(name: &str) -> String {
    if name == MODULE_PAGE_NAME {
        MODULE_PAGE.to_string()
    } else {
        class_page_file(name)
    }
}
