//! In-memory scene hierarchy
//!
//! Objects are addressed by instance id, by hierarchy path (`Canvas/Panel/Button`)
//! or by name. Ids are never reused.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

/// Scene failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Id does not name a live object
    #[error("No GameObject with instance_id {0}")]
    UnknownObject(i64),
    /// Requested parent does not exist
    #[error("Parent GameObject {0} not found")]
    UnknownParent(i64),
    /// Names may not be empty or contain the path separator
    #[error("Invalid GameObject name '{0}'")]
    InvalidName(String),
}

/// Scene object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneObject {
    /// Unique id
    pub instance_id: i64,
    /// Display name
    pub name: String,
    /// Parent id, `None` at the scene root
    pub parent: Option<i64>,
    /// Active flag
    pub active: bool,
    /// Tag
    pub tag: String,
    /// Layer index
    pub layer: usize,
    /// How the object was created (`primitive:Cube`, `prefab:<path>`, ...)
    pub source: String,
}

/// Scene hierarchy
#[derive(Debug, Clone)]
pub struct Scene {
    objects: IndexMap<i64, SceneObject>,
    next_id: i64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: IndexMap::new(),
            next_id: 1000,
        }
    }
}

impl Scene {
    /// Empty scene
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Create an object; returns its id
    ///
    /// # Errors
    ///
    /// Invalid names or an unknown parent.
    pub fn spawn(&mut self, name: &str, source: impl Into<String>, parent: Option<i64>) -> Result<i64, SceneError> {
        validate_name(name)?;
        if let Some(p) = parent {
            if !self.objects.contains_key(&p) {
                return Err(SceneError::UnknownParent(p));
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        self.objects.insert(
            id,
            SceneObject {
                instance_id: id,
                name: name.to_string(),
                parent,
                active: true,
                tag: "Untagged".to_string(),
                layer: 0,
                source: source.into(),
            },
        );
        Ok(id)
    }

    /// Object by id
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Mutable object by id
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownObject`].
    pub fn get_mut(&mut self, id: i64) -> Result<&mut SceneObject, SceneError> {
        self.objects.get_mut(&id).ok_or(SceneError::UnknownObject(id))
    }

    /// Rename an object
    ///
    /// # Errors
    ///
    /// Invalid name or unknown object.
    pub fn rename(&mut self, id: i64, name: &str) -> Result<(), SceneError> {
        validate_name(name)?;
        self.get_mut(id)?.name = name.to_string();
        Ok(())
    }

    /// Direct children in creation order
    #[must_use]
    pub fn children(&self, id: Option<i64>) -> Vec<i64> {
        self.objects
            .values()
            .filter(|o| o.parent == id)
            .map(|o| o.instance_id)
            .collect()
    }

    /// Hierarchy path of an object
    #[must_use]
    pub fn path_of(&self, id: i64) -> Option<String> {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let obj = self.objects.get(&current)?;
            parts.push(obj.name.as_str());
            cursor = obj.parent;
        }
        parts.reverse();
        Some(parts.join("/"))
    }

    /// First object at a hierarchy path
    #[must_use]
    pub fn find_path(&self, path: &str) -> Option<i64> {
        let mut parent = None;
        let mut found = None;
        for segment in path.trim_matches('/').split('/') {
            let id = self
                .children(parent)
                .into_iter()
                .find(|c| self.objects.get(c).is_some_and(|o| o.name == segment))?;
            parent = Some(id);
            found = Some(id);
        }
        found
    }

    /// Every object with exactly this name, in creation order
    #[must_use]
    pub fn find_name(&self, name: &str) -> Vec<i64> {
        self.objects
            .values()
            .filter(|o| o.name == name)
            .map(|o| o.instance_id)
            .collect()
    }

    /// Remove an object and its descendants; returns the removed ids
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownObject`].
    pub fn remove(&mut self, id: i64) -> Result<Vec<i64>, SceneError> {
        if !self.objects.contains_key(&id) {
            return Err(SceneError::UnknownObject(id));
        }
        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            pending.extend(self.children(Some(current)));
            self.objects.shift_remove(&current);
            removed.push(current);
        }
        Ok(removed)
    }

    /// Duplicate a single object under the same parent
    ///
    /// # Errors
    ///
    /// Unknown source or invalid name.
    pub fn duplicate(&mut self, id: i64, name: &str) -> Result<i64, SceneError> {
        let source = self.get(id).cloned().ok_or(SceneError::UnknownObject(id))?;
        let copy = self.spawn(name, format!("copy:{}", source.instance_id), source.parent)?;
        let obj = self.get_mut(copy)?;
        obj.active = source.active;
        obj.tag = source.tag;
        obj.layer = source.layer;
        Ok(copy)
    }

    /// JSON description of an object
    #[must_use]
    pub fn snapshot(&self, id: i64) -> Option<Value> {
        let obj = self.objects.get(&id)?;
        Some(json!({
            "instance_id": obj.instance_id,
            "name": obj.name,
            "path": self.path_of(id),
            "parent_id": obj.parent,
            "active": obj.active,
            "tag": obj.tag,
            "layer": obj.layer,
            "source": obj.source,
        }))
    }
}

fn validate_name(name: &str) -> Result<(), SceneError> {
    if name.trim().is_empty() || name.contains('/') {
        return Err(SceneError::InvalidName(name.to_string()));
    }
    Ok(())
}
