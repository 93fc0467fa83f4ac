//! Minimal RO-Crate 1.1 object model and JSON-LD serialization.
//!
//! A crate is a flat `@graph` of entities: the metadata descriptor, the root
//! dataset (`./`), and any number of data or contextual entities that link to
//! each other through `{"@id": ...}` references.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use cratemaker_shared::{
    CRATE_METADATA_FILE, CrateMakerError, RO_CRATE_CONTEXT, RO_CRATE_PROFILE, Result,
};

/// `@id` of the root data entity.
pub const ROOT_ID: &str = "./";

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One node of the crate graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    kind: String,
    #[serde(flatten)]
    properties: Map<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            properties: Map::new(),
        }
    }

    /// Build an entity and set every key of `properties` on it.
    pub fn with_properties(
        id: impl Into<String>,
        kind: impl Into<String>,
        properties: Map<String, Value>,
    ) -> Self {
        let mut entity = Self::new(id, kind);
        entity.update(properties);
        entity
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Merge `properties` into this entity. `@id` and `@type` keys replace the
    /// entity's identity and type rather than becoming plain properties.
    pub fn update(&mut self, properties: Map<String, Value>) {
        for (key, value) in properties {
            if key != "@id" && key != "@type" {
                self.properties.insert(key, value);
                continue;
            }
            match value {
                Value::String(id) if key == "@id" => self.id = id,
                Value::String(kind) => self.kind = kind,
                other => debug!(key = %key, value = %other, "ignoring non-string identity key"),
            }
        }
    }

    /// Append `values` to an array-valued property, creating it if needed.
    /// A scalar already stored under `key` becomes the first array element.
    pub fn append_to(&mut self, key: &str, values: impl IntoIterator<Item = Value>) {
        let slot = self
            .properties
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            let existing = slot.take();
            *slot = Value::Array(vec![existing]);
        }
        if let Value::Array(items) = slot {
            items.extend(values);
        }
    }

    /// A `{"@id": ...}` link to this entity.
    pub fn reference(&self) -> Value {
        reference(&self.id)
    }
}

/// A `{"@id": ...}` link to the entity with the given identifier.
pub fn reference(id: &str) -> Value {
    json!({ "@id": id })
}

// ---------------------------------------------------------------------------
// RoCrate
// ---------------------------------------------------------------------------

/// An RO-Crate descriptor: metadata descriptor, root dataset, and the
/// ordered list of every other entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RoCrate {
    descriptor: Entity,
    root: Entity,
    entities: Vec<Entity>,
}

impl Default for RoCrate {
    fn default() -> Self {
        Self::new()
    }
}

impl RoCrate {
    /// An empty crate: descriptor plus a bare root dataset.
    pub fn new() -> Self {
        let mut descriptor = Entity::new(CRATE_METADATA_FILE, "CreativeWork");
        descriptor.set("conformsTo", reference(RO_CRATE_PROFILE));
        descriptor.set("about", reference(ROOT_ID));

        Self {
            descriptor,
            root: Entity::new(ROOT_ID, "Dataset"),
            entities: Vec::new(),
        }
    }

    pub fn root(&self) -> &Entity {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Entity {
        &mut self.root
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.root.set("name", name.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.root.set("description", description.into());
    }

    /// Merge raw JSON-LD properties into the root entity.
    pub fn update_root(&mut self, properties: Map<String, Value>) {
        self.root.update(properties);
        // the descriptor must keep pointing at the root
        self.descriptor.set("about", self.root.reference());
    }

    /// Add an entity to the graph and return a reference to it.
    ///
    /// Entities are never merged: adding two entities with the same `@id`
    /// keeps both.
    pub fn add(&mut self, entity: Entity) -> Value {
        let link = entity.reference();
        debug!(id = entity.id(), kind = entity.kind(), "added entity");
        self.entities.push(entity);
        link
    }

    /// Add several entities, returning their references in order.
    pub fn add_all(&mut self, entities: impl IntoIterator<Item = Entity>) -> Vec<Value> {
        entities.into_iter().map(|e| self.add(e)).collect()
    }

    /// Add a `File` data entity and list it in the root's `hasPart`.
    pub fn add_file(&mut self, id: impl Into<String>, properties: Map<String, Value>) -> Value {
        let entity = Entity::with_properties(id, "File", properties);
        self.root.append_to("hasPart", [entity.reference()]);
        self.add(entity)
    }

    /// Every entity other than the descriptor and the root, in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        if id == self.root.id() {
            return Some(&self.root);
        }
        if id == self.descriptor.id() {
            return Some(&self.descriptor);
        }
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        if id == self.root.id() {
            return Some(&mut self.root);
        }
        if id == self.descriptor.id() {
            return Some(&mut self.descriptor);
        }
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// The full JSON-LD document.
    pub fn to_json_ld(&self) -> Value {
        let graph: Vec<Value> = [&self.descriptor, &self.root]
            .into_iter()
            .chain(self.entities.iter())
            .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
            .collect();

        json!({
            "@context": RO_CRATE_CONTEXT,
            "@graph": graph,
        })
    }

    /// Pretty-printed JSON-LD.
    pub fn to_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_json_ld())
            .map_err(|e| CrateMakerError::parse(format!("JSON-LD serialization failed: {e}")))
    }

    /// Write `ro-crate-metadata.json` into `dir` and return its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| CrateMakerError::write(dir, e))?;

        let target = dir.join(CRATE_METADATA_FILE);
        write_atomic(&target, self.to_string_pretty()?)?;

        debug!(path = %target.display(), entities = self.entities.len(), "wrote crate");
        Ok(target)
    }
}

/// Replace `target` with `contents`.
///
/// The bytes go to a hidden temp file next to `target` first and are then
/// renamed into place, so readers never observe a half-written file.
pub fn write_atomic(target: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| CrateMakerError::parse(format!("{} has no file name", target.display())))?;
    let temp = target.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, contents).map_err(|e| CrateMakerError::write(&temp, e))?;
    std::fs::rename(&temp, target).map_err(|e| CrateMakerError::write(target, e))
}
