//! Core domain types and well-known names for cratemaker.

use serde::{Deserialize, Serialize};

/// Fixed file name of every RO-Crate descriptor we write.
pub const CRATE_METADATA_FILE: &str = "ro-crate-metadata.json";

/// JSON-LD context for RO-Crate 1.1.
pub const RO_CRATE_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";

/// Profile the descriptor entity declares conformance to.
pub const RO_CRATE_PROFILE: &str = "https://w3id.org/ro/crate/1.1";

/// Canonical ORCID resolver, prefixed to bare ORCID identifiers.
pub const ORCID_RESOLVER: &str = "https://orcid.org/";

/// File extension of Jupyter notebooks (without the dot).
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Media type recorded on notebook file entities.
pub const NOTEBOOK_MEDIA_TYPE: &str = "application/x-ipynb+json";

/// Top-level keys retained from a template configuration file.
pub const METADATA_FIELDS: [&str; 3] = ["project_name", "project_description", "creators"];

// ---------------------------------------------------------------------------
// Creator
// ---------------------------------------------------------------------------

/// A contributor: a display name plus an optional ORCID.
///
/// Template configs write `"orcid": ""` for "no ORCID", so an empty string and
/// a missing key mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    #[serde(default)]
    pub orcid: String,
}

impl Creator {
    pub fn new(name: impl Into<String>, orcid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            orcid: orcid.into(),
        }
    }

    /// The ORCID, if one was given.
    pub fn orcid(&self) -> Option<&str> {
        if self.orcid.is_empty() {
            None
        } else {
            Some(&self.orcid)
        }
    }
}

/// The `creators` wrapper used by template configuration files, which cannot
/// hold a top-level list: `{"creator_list": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorList {
    pub creator_list: Vec<Creator>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_without_orcid_key() {
        let creator: Creator = serde_json::from_str(r#"{"name": "Doe, Jane"}"#).expect("parse");
        assert_eq!(creator.name, "Doe, Jane");
        assert_eq!(creator.orcid(), None);
    }

    #[test]
    fn creator_with_empty_orcid() {
        let creator: Creator =
            serde_json::from_str(r#"{"name": "A B", "orcid": ""}"#).expect("parse");
        assert_eq!(creator.orcid(), None);
    }

    #[test]
    fn creator_list_wrapper() {
        let json = r#"{"creator_list": [
            {"name": "A B", "orcid": "0000-0002-1825-0097"},
            {"name": "C D", "orcid": ""}
        ]}"#;
        let wrapper: CreatorList = serde_json::from_str(json).expect("parse");
        assert_eq!(wrapper.creator_list.len(), 2);
        assert_eq!(wrapper.creator_list[0].orcid(), Some("0000-0002-1825-0097"));
    }

    #[test]
    fn cookiecutter_fixture_has_wrapped_creators() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/cookiecutter.fixture.json")
            .expect("read fixture");
        let value: serde_json::Value = serde_json::from_str(&fixture).expect("parse fixture");
        let wrapper: CreatorList =
            serde_json::from_value(value["creators"].clone()).expect("creators wrapper");
        assert_eq!(wrapper.creator_list.len(), 2);
        assert_eq!(wrapper.creator_list[0].name, "Doe, Jane");
    }
}
