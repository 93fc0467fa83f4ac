//! Project-level crate: one root descriptor built from a template config.

use std::path::{Path, PathBuf};

use serde_json::{Map, json};
use tracing::{info, instrument, warn};

use cratemaker_shared::Result;

use crate::clock::Clock;
use crate::metadata::{self, Metadata};
use crate::people::create_people;
use crate::rocrate::{ROOT_ID, RoCrate};

/// Version stamped on freshly generated project crates.
pub const DEFAULT_CRATE_VERSION: &str = "0.0.0";

/// Inputs that do not come from the template config.
#[derive(Debug, Clone)]
pub struct ProjectCrateOptions {
    /// Published URL of the project repository, if known.
    pub repository_url: Option<String>,
    /// Literal `version` of the root entity.
    pub version: String,
}

impl Default for ProjectCrateOptions {
    fn default() -> Self {
        Self {
            repository_url: None,
            version: DEFAULT_CRATE_VERSION.to_string(),
        }
    }
}

/// Build the project crate from extracted and normalized metadata.
///
/// The root entity gets `name`, `description` (each only when present),
/// `url`, `version`, `datePublished`, and an `author` list linking one
/// `Person` per creator.
pub fn build_project_crate(
    metadata: &Metadata,
    options: &ProjectCrateOptions,
    clock: &dyn Clock,
) -> Result<RoCrate> {
    let mut crate_ = RoCrate::new();

    if let Some(name) = metadata::string_field(metadata, "project_name") {
        crate_.set_name(name);
    }
    if let Some(description) = metadata::string_field(metadata, "project_description") {
        crate_.set_description(description);
    }

    let mut root = Map::new();
    root.insert("@id".into(), json!(ROOT_ID));
    match &options.repository_url {
        Some(url) => {
            root.insert("url".into(), json!(url));
        }
        None => warn!("no repository configured, root entity will have no url"),
    }
    root.insert("version".into(), json!(options.version));
    root.insert("datePublished".into(), json!(clock.date_published()));
    crate_.update_root(root);

    let creators = metadata::creators(metadata)?;
    let authors = create_people(&mut crate_, &creators);
    crate_.root_mut().append_to("author", authors);

    Ok(crate_)
}

/// Extract, normalize, build and write the project crate.
///
/// Returns the path of the written `ro-crate-metadata.json`.
#[instrument(skip_all, fields(input = %input.display(), out_dir = %out_dir.display()))]
pub fn create_project_crate(
    input: &Path,
    out_dir: &Path,
    options: &ProjectCrateOptions,
    clock: &dyn Clock,
) -> Result<PathBuf> {
    let mut metadata = metadata::extract_metadata(input)?;
    metadata::fix_creator_nesting(&mut metadata)?;

    let crate_ = build_project_crate(&metadata, options, clock)?;
    let path = crate_.write(out_dir)?;

    info!(
        path = %path.display(),
        authors = crate_.entities().len(),
        "project crate written"
    );
    Ok(path)
}
