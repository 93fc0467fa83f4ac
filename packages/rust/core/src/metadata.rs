//! Template configuration extraction.
//!
//! Reads a `cookiecutter.json`-style file, keeps only the whitelisted
//! top-level keys, and flattens the `creators` wrapper into a plain list.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use cratemaker_shared::{Creator, CrateMakerError, METADATA_FIELDS, Result};

/// Extracted project metadata: only whitelisted keys that were present.
pub type Metadata = Map<String, Value>;

/// Key holding the creator list.
pub const CREATORS_KEY: &str = "creators";

/// Key inside the `creators` wrapper that holds the actual list.
pub const CREATOR_LIST_KEY: &str = "creator_list";

/// Read `file` and keep the whitelisted top-level keys.
///
/// Missing keys stay missing; nothing is defaulted.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn extract_metadata(file: &Path) -> Result<Metadata> {
    let content = std::fs::read_to_string(file).map_err(|e| CrateMakerError::io(file, e))?;
    let data: Value = serde_json::from_str(&content)
        .map_err(|e| CrateMakerError::parse(format!("invalid JSON in {}: {e}", file.display())))?;

    let Value::Object(data) = data else {
        return Err(CrateMakerError::parse(format!(
            "{} does not contain a JSON object",
            file.display()
        )));
    };

    let metadata: Metadata = data
        .into_iter()
        .filter(|(key, _)| METADATA_FIELDS.contains(&key.as_str()))
        .collect();

    debug!(keys = ?metadata.keys().collect::<Vec<_>>(), "extracted metadata");
    Ok(metadata)
}

/// Replace the `{"creator_list": [...]}` wrapper under `creators` with the
/// bare list.
///
/// Does nothing if `creators` is absent. An already-flat list is a schema
/// error: the input is expected to come straight from a template config.
pub fn fix_creator_nesting(metadata: &mut Metadata) -> Result<()> {
    let Some(creators) = metadata.get_mut(CREATORS_KEY) else {
        return Ok(());
    };

    let list = creators
        .get(CREATOR_LIST_KEY)
        .filter(|list| list.is_array())
        .cloned()
        .ok_or_else(|| {
            CrateMakerError::schema(format!(
                "`{CREATORS_KEY}` must be an object with a `{CREATOR_LIST_KEY}` list"
            ))
        })?;

    *creators = list;
    Ok(())
}

/// Decode the flat creator list of normalized metadata.
///
/// An absent `creators` key yields an empty list.
pub fn creators(metadata: &Metadata) -> Result<Vec<Creator>> {
    match metadata.get(CREATORS_KEY) {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            CrateMakerError::schema(format!("invalid `{CREATORS_KEY}` list: {e}"))
        }),
    }
}

/// Optional string field such as `project_name`.
pub fn string_field<'a>(metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(Value::as_str)
}

/// Write metadata as the pretty-printed `metadata.json` hand-off file.
pub fn write_metadata(metadata: &Metadata, file: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| CrateMakerError::parse(format!("JSON serialization failed: {e}")))?;
    std::fs::write(file, json).map_err(|e| CrateMakerError::write(file, e))?;
    debug!(path = %file.display(), "wrote metadata file");
    Ok(())
}

/// Extract, normalize and write the hand-off file in one step.
#[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn extract_to_file(input: &Path, output: &Path) -> Result<Metadata> {
    let mut metadata = extract_metadata(input)?;
    fix_creator_nesting(&mut metadata)?;
    write_metadata(&metadata, output)?;
    Ok(metadata)
}
