pub mod chord;
pub mod hook;

pub use chord::{ChordKey, ChordTracker};
pub use hook::{install, HookError, HotkeyListener, ToggleRequest};
