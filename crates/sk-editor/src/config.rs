//! Editor configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a
//! valid configuration. Secrets such as the share webhook URL are never
//! compiled in; they come from the config file or the environment.

use crate::history::DEFAULT_MAX_DEPTH;
use crate::tools::ToolKind;
use crate::toast::DEFAULT_DURATION_MS;
use serde::{Deserialize, Serialize};
use sk_core::{Color, MAX_DIMENSION, Size};

/// Environment variable holding the share webhook URL.
pub const SHARE_WEBHOOK_ENV: &str = "SKETCHBOARD_SHARE_WEBHOOK_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub width: u32,
    pub height: u32,
    /// Maximum undo depth.
    pub history_depth: usize,
    pub foreground: Color,
    pub background: Color,
    pub tool: ToolKind,
    pub brush_size: u32,
    pub toast_duration_ms: u64,
    pub share: ShareConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            history_depth: DEFAULT_MAX_DEPTH,
            foreground: Color::BLACK,
            background: Color::WHITE,
            tool: ToolKind::Pencil,
            brush_size: 4,
            toast_duration_ms: DEFAULT_DURATION_MS,
            share: ShareConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse from JSON, then clamp out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Fill the share webhook from the environment when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SHARE_WEBHOOK_ENV)
            && !url.trim().is_empty()
        {
            self.share.webhook_url = Some(url);
        }
        self
    }

    /// Zero depth, brush size, or dimensions are raised to 1. Dimensions
    /// are capped at [`MAX_DIMENSION`].
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.clamp(1, MAX_DIMENSION);
        self.height = self.height.clamp(1, MAX_DIMENSION);
        self.history_depth = self.history_depth.max(1);
        self.brush_size = self.brush_size.max(1);
        self
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}
