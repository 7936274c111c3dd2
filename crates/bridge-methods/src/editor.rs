//! Editor play-mode, tag and layer state

use serde::{Deserialize, Serialize};

/// Tags every project starts with
pub const BUILTIN_TAGS: [&str; 7] = [
    "Untagged",
    "Respawn",
    "Finish",
    "EditorOnly",
    "MainCamera",
    "Player",
    "GameController",
];

/// Number of layer slots
pub const LAYER_COUNT: usize = 32;

/// First slot available for user layers
pub const FIRST_USER_LAYER: usize = 8;

const BUILTIN_LAYERS: [(usize, &str); 5] = [
    (0, "Default"),
    (1, "TransparentFX"),
    (2, "Ignore Raycast"),
    (4, "Water"),
    (5, "UI"),
];

/// Editor play mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Edit mode
    #[default]
    Stopped,
    /// Playing
    Playing,
    /// Playing but paused
    Paused,
}

/// Editor state failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// Pause requested outside play mode
    #[error("Cannot pause: editor is not in play mode")]
    NotPlaying,
    /// Tag already defined
    #[error("Tag '{0}' already exists")]
    TagExists(String),
    /// Tag not defined
    #[error("Tag '{0}' does not exist")]
    TagNotFound(String),
    /// Built-in tags cannot be removed
    #[error("Tag '{0}' is built in and cannot be removed")]
    BuiltinTag(String),
    /// Layer already defined
    #[error("Layer '{0}' already exists")]
    LayerExists(String),
    /// Layer not defined
    #[error("Layer '{0}' does not exist")]
    LayerNotFound(String),
    /// Built-in layers cannot be removed
    #[error("Layer '{0}' is built in and cannot be removed")]
    BuiltinLayer(String),
    /// Every user layer slot is taken
    #[error("No free user layer slot (8-31)")]
    NoFreeLayer,
}

/// Mutable editor state
#[derive(Debug, Clone)]
pub struct EditorState {
    play_mode: PlayMode,
    tags: Vec<String>,
    layers: Vec<Option<String>>,
}

impl Default for EditorState {
    fn default() -> Self {
        let mut layers = vec![None; LAYER_COUNT];
        for (index, name) in BUILTIN_LAYERS {
            layers[index] = Some(name.to_string());
        }
        Self {
            play_mode: PlayMode::Stopped,
            tags: BUILTIN_TAGS.iter().map(|t| (*t).to_string()).collect(),
            layers,
        }
    }
}

impl EditorState {
    /// Current play mode
    #[inline]
    #[must_use]
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Enter (or resume) play mode; returns the previous mode
    pub fn play(&mut self) -> PlayMode {
        std::mem::replace(&mut self.play_mode, PlayMode::Playing)
    }

    /// Toggle pause while in play mode; returns the new mode
    ///
    /// # Errors
    ///
    /// [`EditorError::NotPlaying`] in edit mode.
    pub fn pause(&mut self) -> Result<PlayMode, EditorError> {
        self.play_mode = match self.play_mode {
            PlayMode::Playing => PlayMode::Paused,
            PlayMode::Paused => PlayMode::Playing,
            PlayMode::Stopped => return Err(EditorError::NotPlaying),
        };
        Ok(self.play_mode)
    }

    /// Return to edit mode; returns the previous mode
    pub fn stop(&mut self) -> PlayMode {
        std::mem::replace(&mut self.play_mode, PlayMode::Stopped)
    }

    /// Defined tags
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Whether `tag` is defined
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Define a tag
    ///
    /// # Errors
    ///
    /// [`EditorError::TagExists`] if already defined.
    pub fn add_tag(&mut self, tag: &str) -> Result<(), EditorError> {
        if self.has_tag(tag) {
            return Err(EditorError::TagExists(tag.to_string()));
        }
        self.tags.push(tag.to_string());
        Ok(())
    }

    /// Remove a user tag
    ///
    /// # Errors
    ///
    /// Built-in or unknown tags.
    pub fn remove_tag(&mut self, tag: &str) -> Result<(), EditorError> {
        if BUILTIN_TAGS.contains(&tag) {
            return Err(EditorError::BuiltinTag(tag.to_string()));
        }
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        if self.tags.len() == before {
            return Err(EditorError::TagNotFound(tag.to_string()));
        }
        Ok(())
    }

    /// Defined layers as `(index, name)`
    #[must_use]
    pub fn layers(&self) -> Vec<(usize, &str)> {
        self.layers
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_deref().map(|name| (i, name)))
            .collect()
    }

    /// Index of a layer by name
    #[must_use]
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.as_deref() == Some(name))
    }

    /// Define a layer in the first free user slot; returns its index
    ///
    /// # Errors
    ///
    /// Duplicate names or a full layer table.
    pub fn add_layer(&mut self, name: &str) -> Result<usize, EditorError> {
        if self.layer_index(name).is_some() {
            return Err(EditorError::LayerExists(name.to_string()));
        }
        let slot = (FIRST_USER_LAYER..LAYER_COUNT)
            .find(|i| self.layers[*i].is_none())
            .ok_or(EditorError::NoFreeLayer)?;
        self.layers[slot] = Some(name.to_string());
        Ok(slot)
    }

    /// Remove a user layer; returns the freed index
    ///
    /// # Errors
    ///
    /// Built-in or unknown layers.
    pub fn remove_layer(&mut self, name: &str) -> Result<usize, EditorError> {
        let index = self
            .layer_index(name)
            .ok_or_else(|| EditorError::LayerNotFound(name.to_string()))?;
        if index < FIRST_USER_LAYER {
            return Err(EditorError::BuiltinLayer(name.to_string()));
        }
        self.layers[index] = None;
        Ok(index)
    }
}
