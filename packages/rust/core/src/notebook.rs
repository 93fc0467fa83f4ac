//! Jupyter notebook crates.
//!
//! Each notebook gets its own crate describing the notebook file and its
//! authors. Authors come from the notebook's own `metadata.authors` block when
//! it has one, otherwise from a `metadata.json` defaults file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use cratemaker_shared::{
    Creator, CrateMakerError, NOTEBOOK_EXTENSION, NOTEBOOK_MEDIA_TYPE, Result,
};

use crate::clock::Clock;
use crate::metadata::{self, CREATORS_KEY};
use crate::people::create_people;
use crate::rocrate::{RoCrate, write_atomic};

/// Key of the author list inside a notebook's `metadata` block.
pub const NOTEBOOK_AUTHORS_KEY: &str = "authors";

/// Notebook files directly inside `dir`, sorted by file name.
pub fn get_notebooks(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CrateMakerError::io(dir, e))?;

    let mut notebooks = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CrateMakerError::io(dir, e))?;
        let path = entry.path();
        let is_notebook = path.extension().is_some_and(|ext| ext == NOTEBOOK_EXTENSION);
        if is_notebook && path.is_file() {
            notebooks.push(path);
        }
    }

    notebooks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), count = notebooks.len(), "found notebooks");
    Ok(notebooks)
}

/// Read a notebook as a JSON object.
pub fn read_notebook(notebook: &Path) -> Result<Map<String, Value>> {
    let content =
        std::fs::read_to_string(notebook).map_err(|e| CrateMakerError::io(notebook, e))?;
    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CrateMakerError::parse(format!(
            "{} is not a notebook document",
            notebook.display()
        ))),
        Err(e) => Err(CrateMakerError::parse(format!(
            "invalid notebook JSON in {}: {e}",
            notebook.display()
        ))),
    }
}

/// Authors embedded in the notebook's own metadata.
///
/// `None` when the notebook has no `metadata.authors` entry; an empty list
/// when it has one that is empty.
pub fn extract_notebook_authors(notebook: &Path) -> Result<Option<Vec<Creator>>> {
    let document = read_notebook(notebook)?;
    let Some(authors) = document
        .get("metadata")
        .and_then(|m| m.get(NOTEBOOK_AUTHORS_KEY))
    else {
        return Ok(None);
    };

    let authors = serde_json::from_value(authors.clone()).map_err(|e| {
        CrateMakerError::schema(format!(
            "invalid metadata.{NOTEBOOK_AUTHORS_KEY} in {}: {e}",
            notebook.display()
        ))
    })?;
    Ok(Some(authors))
}

/// Default authors from a `metadata.json` hand-off file.
///
/// Accepts both the flat `creators` list written by `extract` and the raw
/// `{"creator_list": [...]}` wrapper. An absent `creators` key means no
/// defaults.
pub fn extract_default_authors(metadata_file: &Path) -> Result<Vec<Creator>> {
    let mut metadata = metadata::extract_metadata(metadata_file)?;
    if metadata.get(CREATORS_KEY).is_some_and(Value::is_object) {
        metadata::fix_creator_nesting(&mut metadata)?;
    }
    metadata::creators(&metadata)
}

/// Build the crate for one notebook.
///
/// The notebook's own authors win; otherwise `defaults` is used; with neither
/// the author list is empty.
#[instrument(skip_all, fields(notebook = %notebook.display()))]
pub fn generate_notebook_crate(
    notebook: &Path,
    defaults: Option<&[Creator]>,
    clock: &dyn Clock,
) -> Result<RoCrate> {
    let name = notebook
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CrateMakerError::parse(format!("{} has no file name", notebook.display()))
        })?;

    let authors = match extract_notebook_authors(notebook)? {
        Some(authors) => {
            debug!(count = authors.len(), "using authors embedded in notebook");
            authors
        }
        None => defaults.map(<[Creator]>::to_vec).unwrap_or_default(),
    };

    let mut crate_ = RoCrate::new();
    crate_.root_mut().set("datePublished", clock.date_published());

    let mut properties = Map::new();
    properties.insert("name".into(), json!(name));
    properties.insert("encodingFormat".into(), json!(NOTEBOOK_MEDIA_TYPE));
    crate_.add_file(name.as_str(), properties);

    let people = create_people(&mut crate_, &authors);
    if let Some(file) = crate_.get_mut(&name) {
        file.set("author", people);
    }

    Ok(crate_)
}

/// Store `data` (a serialized crate) as a JSON object under
/// `metadata.<key>` of the notebook, replacing any previous value.
///
/// The notebook is rewritten in place with Jupyter's one-space indentation.
pub fn embed_notebook_metadata(notebook: &Path, key: &str, data: &str) -> Result<()> {
    let payload: Value = serde_json::from_str(data)
        .map_err(|e| CrateMakerError::parse(format!("invalid crate document: {e}")))?;

    let mut document = read_notebook(notebook)?;
    let block = document
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    let Value::Object(block) = block else {
        return Err(CrateMakerError::schema(format!(
            "`metadata` of {} is not an object",
            notebook.display()
        )));
    };
    block.insert(key.to_string(), payload);

    write_notebook(notebook, &Value::Object(document))?;
    debug!(notebook = %notebook.display(), key, "embedded crate in notebook");
    Ok(())
}

fn write_notebook(notebook: &Path, document: &Value) -> Result<()> {
    use serde::Serialize;

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut ser)
        .map_err(|e| CrateMakerError::parse(format!("notebook serialization failed: {e}")))?;
    buf.push(b'\n');

    write_atomic(notebook, buf)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::clock::FixedClock;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cm-notebook-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    fn write_nb(dir: &Path, name: &str, metadata: Value) -> PathBuf {
        let path = dir.join(name);
        let doc = json!({
            "cells": [],
            "metadata": metadata,
            "nbformat": 4,
            "nbformat_minor": 5
        });
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
        path
    }

    #[test]
    fn get_notebooks_filters_and_sorts() {
        let tmp = temp_dir();
        write_nb(&tmp, "b.ipynb", json!({}));
        write_nb(&tmp, "a.ipynb", json!({}));
        std::fs::write(tmp.join("notes.txt"), "x").unwrap();
        std::fs::create_dir_all(tmp.join("dir.ipynb")).unwrap();

        let names: Vec<String> = get_notebooks(&tmp)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.ipynb", "b.ipynb"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn get_notebooks_missing_dir_is_not_found() {
        let err = get_notebooks(Path::new("/no/such/notebooks")).unwrap_err();
        assert!(matches!(err, CrateMakerError::NotFound { .. }));
    }

    #[test]
    fn notebook_authors_absent_vs_empty() {
        let tmp = temp_dir();
        let none = write_nb(&tmp, "none.ipynb", json!({"kernelspec": {}}));
        let empty = write_nb(&tmp, "empty.ipynb", json!({"authors": []}));
        let some = write_nb(&tmp, "some.ipynb", json!({"authors": [{"name": "Doe, Jane"}]}));

        assert_eq!(extract_notebook_authors(&none).unwrap(), None);
        assert_eq!(extract_notebook_authors(&empty).unwrap(), Some(vec![]));
        assert_eq!(
            extract_notebook_authors(&some).unwrap(),
            Some(vec![Creator::new("Doe, Jane", "")])
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn default_authors_accept_flat_and_wrapped() {
        let tmp = temp_dir();
        let flat = tmp.join("flat.json");
        std::fs::write(&flat, r#"{"creators": [{"name": "A B", "orcid": ""}]}"#).unwrap();
        let wrapped = tmp.join("wrapped.json");
        std::fs::write(
            &wrapped,
            r#"{"creators": {"creator_list": [{"name": "A B", "orcid": ""}]}}"#,
        )
        .unwrap();
        let bare = tmp.join("bare.json");
        std::fs::write(&bare, r#"{"project_name": "Demo"}"#).unwrap();

        assert_eq!(extract_default_authors(&flat).unwrap(), vec![Creator::new("A B", "")]);
        assert_eq!(extract_default_authors(&wrapped).unwrap(), vec![Creator::new("A B", "")]);
        assert!(extract_default_authors(&bare).unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn notebook_crate_prefers_embedded_authors() {
        let tmp = temp_dir();
        let nb = write_nb(
            &tmp,
            "analysis.ipynb",
            json!({"authors": [{"name": "Own, Author", "orcid": "0000-0001-5109-3700"}]}),
        );
        let defaults = vec![Creator::new("Default, Dee", "")];

        let crate_ = generate_notebook_crate(&nb, Some(&defaults), &clock()).unwrap();
        let file = crate_.get("analysis.ipynb").unwrap();

        assert_eq!(file.kind(), "File");
        assert_eq!(file.get("name").unwrap(), "analysis.ipynb");
        assert_eq!(file.get("encodingFormat").unwrap(), NOTEBOOK_MEDIA_TYPE);
        assert_eq!(
            file.get("author").unwrap(),
            &json!([{"@id": "https://orcid.org/0000-0001-5109-3700"}])
        );
        assert!(crate_.get("#Default_Dee").is_none());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn notebook_crate_falls_back_to_defaults_then_empty() {
        let tmp = temp_dir();
        let nb = write_nb(&tmp, "analysis.ipynb", json!({}));
        let defaults = vec![Creator::new("Default, Dee", "")];

        let with_defaults = generate_notebook_crate(&nb, Some(&defaults), &clock()).unwrap();
        assert_eq!(
            with_defaults.get("analysis.ipynb").unwrap().get("author").unwrap(),
            &json!([{"@id": "#Default_Dee"}])
        );

        let without = generate_notebook_crate(&nb, None, &clock()).unwrap();
        assert_eq!(
            without.get("analysis.ipynb").unwrap().get("author").unwrap(),
            &json!([])
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn embed_stores_crate_object_under_key() {
        let tmp = temp_dir();
        let nb = write_nb(&tmp, "analysis.ipynb", json!({"kernelspec": {"name": "python3"}}));
        let crate_ = generate_notebook_crate(&nb, None, &clock()).unwrap();

        embed_notebook_metadata(&nb, "ro-crate", &crate_.to_string_pretty().unwrap()).unwrap();

        let raw = std::fs::read_to_string(&nb).unwrap();
        assert!(raw.starts_with("{\n \"cells\""));
        assert!(!tmp.join(".analysis.ipynb.tmp").exists());
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["metadata"]["kernelspec"]["name"], "python3");
        assert_eq!(doc["metadata"]["ro-crate"], crate_.to_json_ld());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn embed_creates_missing_metadata_block() {
        let tmp = temp_dir();
        let nb = tmp.join("bare.ipynb");
        std::fs::write(&nb, r#"{"cells": [], "nbformat": 4}"#).unwrap();

        embed_notebook_metadata(&nb, "ro-crate", r#"{"@graph": []}"#).unwrap();
        let doc: Value = serde_json::from_str(&std::fs::read_to_string(&nb).unwrap()).unwrap();
        assert_eq!(doc["metadata"]["ro-crate"], json!({"@graph": []}));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn embed_rejects_invalid_payload() {
        let tmp = temp_dir();
        let nb = write_nb(&tmp, "a.ipynb", json!({}));
        let err = embed_notebook_metadata(&nb, "ro-crate", "not json").unwrap_err();
        assert!(matches!(err, CrateMakerError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
