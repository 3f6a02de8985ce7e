//! Transient toast notifications.
//!
//! A FIFO list where every toast carries its own expiry deadline. The host
//! drives time by calling `tick(now_ms)`; removing a toast early drops its
//! deadline with it.

use serde::{Deserialize, Serialize};

/// Default display time.
pub const DEFAULT_DURATION_MS: u64 = 6000;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Host-clock time at which `tick` removes this toast.
    pub expires_at_ms: u64,
}

/// Everything but the id; unset fields take the queue defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToastOptions {
    pub message: Option<String>,
    pub kind: Option<ToastKind>,
    pub duration_ms: Option<u64>,
    pub icon: Option<String>,
}

impl ToastOptions {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: Some(message.into()),
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: ToastId,
    default_duration_ms: u64,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

impl ToastQueue {
    pub fn new(default_duration_ms: u64) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            default_duration_ms: if default_duration_ms == 0 {
                DEFAULT_DURATION_MS
            } else {
                default_duration_ms
            },
        }
    }

    /// Append a toast and schedule its removal. A missing or zero duration
    /// falls back to the queue default.
    pub fn add(&mut self, options: ToastOptions, now_ms: u64) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;

        let duration_ms = options
            .duration_ms
            .filter(|d| *d > 0)
            .unwrap_or(self.default_duration_ms);
        let toast = Toast {
            id,
            message: options.message.unwrap_or_default(),
            kind: options.kind.unwrap_or_default(),
            duration_ms,
            icon: options.icon,
            expires_at_ms: now_ms.saturating_add(duration_ms),
        };
        log::debug!("toast #{id} ({:?}): {}", toast.kind, toast.message);
        self.toasts.push(toast);
        id
    }

    /// Remove a toast before it expires. Returns whether it was present.
    pub fn remove(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Remove every toast whose deadline has passed, returning their ids.
    pub fn tick(&mut self, now_ms: u64) -> Vec<ToastId> {
        let mut expired = Vec::new();
        self.toasts.retain(|t| {
            if t.expires_at_ms <= now_ms {
                expired.push(t.id);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Earliest pending deadline, for scheduling the next `tick`.
    pub fn next_deadline(&self) -> Option<u64> {
        self.toasts.iter().map(|t| t.expires_at_ms).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn as_slice(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
