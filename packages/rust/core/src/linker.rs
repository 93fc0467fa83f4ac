//! Notebook batch pipeline: directory → per-notebook crates → parent crate.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument};

use cratemaker_shared::{Creator, Result};

use crate::clock::Clock;
use crate::notebook::{
    embed_notebook_metadata, extract_default_authors, generate_notebook_crate, get_notebooks,
};
use crate::rocrate::RoCrate;

/// Configuration for the `link_notebooks` pipeline.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Directory holding the notebooks; also receives the parent crate.
    pub dir: PathBuf,
    /// Optional `metadata.json` with default authors.
    pub metadata_file: Option<PathBuf>,
    /// Key under each notebook's `metadata` block.
    pub metadata_key: String,
}

/// Result of the `link_notebooks` pipeline.
#[derive(Debug)]
pub struct LinkResult {
    /// Path of the written parent crate.
    pub crate_path: PathBuf,
    /// Notebooks processed, in processing order.
    pub notebooks: Vec<PathBuf>,
    /// Entities in the parent crate (excluding descriptor and root).
    pub entity_count: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for the notebook batch.
pub trait ProgressReporter {
    /// Called before each notebook is processed.
    fn notebook(&self, path: &Path, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &LinkResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn notebook(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _result: &LinkResult) {}
}

/// Build a crate for every notebook in `dir` and embed it in the notebook
/// under `key`. Returns the notebooks and their crates, in processing order.
#[instrument(skip_all, fields(dir = %dir.display(), key = %key))]
pub fn update_notebook_metadata(
    dir: &Path,
    defaults: Option<&[Creator]>,
    key: &str,
    clock: &dyn Clock,
    progress: &dyn ProgressReporter,
) -> Result<(Vec<PathBuf>, Vec<RoCrate>)> {
    let notebooks = get_notebooks(dir)?;
    let total = notebooks.len();

    let mut crates = Vec::with_capacity(total);
    for (i, notebook) in notebooks.iter().enumerate() {
        progress.notebook(notebook, i + 1, total);

        let crate_ = generate_notebook_crate(notebook, defaults, clock)?;
        embed_notebook_metadata(notebook, key, &crate_.to_string_pretty()?)?;
        crates.push(crate_);
    }

    Ok((notebooks, crates))
}

/// Merge child crates into one parent crate.
///
/// The parent's entity list is every child entity in order; nothing is
/// deduplicated, so an author shared by two notebooks appears twice. Every
/// `File` entity is listed in the parent root's `hasPart`.
pub fn merge_crates(crates: &[RoCrate], clock: &dyn Clock) -> RoCrate {
    let mut parent = RoCrate::new();
    parent.root_mut().set("datePublished", clock.date_published());

    for child in crates {
        for entity in child.entities() {
            if entity.kind() == "File" {
                parent.root_mut().append_to("hasPart", [entity.reference()]);
            }
            parent.add(entity.clone());
        }
    }
    parent
}

/// Merge child crates and write the parent `ro-crate-metadata.json` into
/// `output_dir`.
pub fn link_crates(crates: &[RoCrate], output_dir: &Path, clock: &dyn Clock) -> Result<PathBuf> {
    merge_crates(crates, clock).write(output_dir)
}

/// Run the full notebook batch: embed one crate per notebook, then write the
/// parent crate into the same directory.
#[instrument(skip_all, fields(dir = %config.dir.display()))]
pub fn link_notebooks(
    config: &LinkConfig,
    clock: &dyn Clock,
    progress: &dyn ProgressReporter,
) -> Result<LinkResult> {
    let start = Instant::now();

    let defaults = match &config.metadata_file {
        Some(file) => Some(extract_default_authors(file)?),
        None => None,
    };

    let (notebooks, crates) = update_notebook_metadata(
        &config.dir,
        defaults.as_deref(),
        &config.metadata_key,
        clock,
        progress,
    )?;

    let crate_path = link_crates(&crates, &config.dir, clock)?;

    let result = LinkResult {
        crate_path,
        notebooks,
        entity_count: crates.iter().map(|c| c.entities().len()).sum(),
        elapsed: start.elapsed(),
    };

    info!(
        notebooks = result.notebooks.len(),
        entities = result.entity_count,
        path = %result.crate_path.display(),
        "linked notebook crates"
    );
    progress.done(&result);

    Ok(result)
}
