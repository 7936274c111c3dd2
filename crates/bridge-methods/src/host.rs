//! Editor collaborators shared by the built-in tools

use crate::config::BridgeConfig;
use crate::console::ConsoleLog;
use crate::editor::EditorState;
use crate::scene::Scene;
use parking_lot::Mutex;

/// In-memory editor: console, play/tag/layer state and the open scene
///
/// Each part sits behind its own lock, so tools touching different parts
/// never contend.
#[derive(Debug, Default)]
pub struct EditorHost {
    /// Console buffer
    pub console: ConsoleLog,
    /// Play mode, tags and layers
    pub editor: Mutex<EditorState>,
    /// Open scene
    pub scene: Mutex<Scene>,
}

impl EditorHost {
    /// Host with default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Host sized from configuration
    #[must_use]
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            console: ConsoleLog::new(config.console.capacity),
            ..Self::default()
        }
    }
}
