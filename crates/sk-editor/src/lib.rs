pub mod config;
pub mod history;
pub mod input;
pub mod selection;
pub mod session;
pub mod share;
pub mod shortcuts;
pub mod toast;
pub mod tools;

pub use config::{EditorConfig, SHARE_WEBHOOK_ENV, ShareConfig};
pub use history::{DEFAULT_MAX_DEPTH, HistoryManager};
pub use input::{InputEvent, Modifiers};
pub use selection::Selection;
pub use session::{EditorSession, MAX_BRUSH_SIZE};
pub use share::{ShareError, SharePayload, ShareTarget};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use toast::{Toast, ToastId, ToastKind, ToastOptions, ToastQueue};
pub use tools::{PaintOp, PaintOps, Tool, ToolContext, ToolKind};
