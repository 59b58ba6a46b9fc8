//! The generation pipeline, end to end: snapshot in, `.pyi` file out.
//!
//! Stages run in a fixed order — extract, reconcile (online only), type
//! degradation, patch plugins, dependency sort, render — and the output is
//! written atomically so a crashed run never leaves a truncated stub.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mobu_docs::{DEFAULT_TIMEOUT, DEFAULT_WORKERS, DocFetcher, DocLibrary, MODULE_PAGE_NAME, PageCache};

use crate::error::{Result, StubError};
use crate::extract::extract_module;
use crate::model::ModuleModel;
use crate::plugins::{default_plugins, run_plugins};
use crate::reconcile::{degrade_unknown_types, reconcile_module};
use crate::reflect::ReflectedModule;
use crate::render::{DEFAULT_PREAMBLE, render_module};
use crate::sort::sort_classes;

/// Newest product release the generator targets by default.
pub const DEFAULT_VERSION: u32 = 2025;

/// Token replaced with the target version in addition files.
pub const VERSION_TOKEN: &str = "__VERSION__";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Target product release year, selects the documentation site layout.
    pub version: u32,
    pub out_dir: PathBuf,
    /// Page cache location; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Skip the documentation site entirely.
    pub offline: bool,
    /// Extra stub files copied next to the generated one.
    pub additions_dir: Option<PathBuf>,
    pub timeout: Duration,
    pub workers: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            out_dir: PathBuf::from("."),
            cache_dir: None,
            offline: false,
            additions_dir: None,
            timeout: DEFAULT_TIMEOUT,
            workers: DEFAULT_WORKERS,
        }
    }
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline on a reflected-module snapshot. Returns the
    /// path of the written stub.
    pub fn run(&self, snapshot_json: &str) -> Result<PathBuf> {
        let reflected = ReflectedModule::from_json(snapshot_json)?;
        let model = extract_module(&reflected);
        let docs = if self.config.offline {
            None
        } else {
            Some(self.fetch_docs(&model)?)
        };
        self.finish(model, docs.as_ref())
    }

    /// Pipeline with an explicit documentation library (or none), used by
    /// `run` and directly by tests.
    pub fn generate(
        &self,
        reflected: &ReflectedModule,
        docs: Option<&DocLibrary>,
    ) -> Result<PathBuf> {
        self.finish(extract_module(reflected), docs)
    }

    fn finish(&self, mut model: ModuleModel, docs: Option<&DocLibrary>) -> Result<PathBuf> {
        tracing::info!(
            module = %model.name,
            enums = model.enums.len(),
            classes = model.classes.len(),
            functions = model.functions.len(),
            "extracted module snapshot"
        );

        if let Some(docs) = docs {
            reconcile_module(&mut model, docs);
        }
        degrade_unknown_types(&mut model);
        run_plugins(&mut model, &default_plugins(), self.config.version)?;
        sort_classes(&mut model)?;

        let text = render_module(&model, DEFAULT_PREAMBLE);

        fs::create_dir_all(&self.config.out_dir)
            .map_err(|e| output_error(&self.config.out_dir, e))?;
        let out_path = self.config.out_dir.join(format!("{}.pyi", model.name));
        write_atomic(&out_path, &text)?;
        tracing::info!(path = %out_path.display(), bytes = text.len(), "stub written");

        if let Some(additions) = &self.config.additions_dir {
            self.copy_additions(additions)?;
        }
        Ok(out_path)
    }

    fn fetch_docs(&self, model: &ModuleModel) -> Result<DocLibrary> {
        let cache = match &self.config.cache_dir {
            Some(dir) => Some(PageCache::open(dir)?),
            None => None,
        };
        let fetcher = DocFetcher::new(cache, self.config.timeout);

        let mut page_names: Vec<String> = vec![MODULE_PAGE_NAME.to_string()];
        page_names.extend(model.classes.iter().map(|c| c.name.clone()));
        let docs = DocLibrary::fetch(&fetcher, self.config.version, &page_names, self.config.workers)?;
        tracing::info!(pages = docs.len(), "documentation pages loaded");
        Ok(docs)
    }

    /// Copy hand-maintained addition stubs into the output directory,
    /// substituting the version token.
    fn copy_additions(&self, additions: &Path) -> Result<()> {
        let entries = fs::read_dir(additions).map_err(|e| output_error(additions, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| output_error(additions, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let body = fs::read_to_string(&path).map_err(|e| output_error(&path, e))?;
            let body = body.replace(VERSION_TOKEN, &self.config.version.to_string());
            let target = match path.file_name() {
                Some(name) => self.config.out_dir.join(name),
                None => continue,
            };
            write_atomic(&target, &body)?;
            tracing::debug!(path = %target.display(), "addition copied");
        }
        Ok(())
    }
}

/// Write via a sibling temp file and rename, so readers never observe a
/// partial stub.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("stub.pyi");
    let tmp = dir.join(format!(".{}.{}", name, std::process::id()));
    fs::write(&tmp, contents).map_err(|e| output_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| output_error(path, e))
}

fn output_error(path: &Path, source: std::io::Error) -> StubError {
    StubError::Output {
        path: path.to_path_buf(),
        source,
    }
}
