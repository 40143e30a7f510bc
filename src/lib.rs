//! Core logic for perch, an always-resident task and notes widget.
//! The view layer is an external collaborator: it calls in through
//! [`app::App`] and renders through [`visibility::WidgetSurface`].

pub mod app;
pub mod autostart;
pub mod domain;
pub mod hotkey;
pub mod instance;
pub mod logging;
pub mod notifications;
pub mod persistence;
pub mod scheduler;
pub mod ticker;
pub mod visibility;

pub use app::App;
pub use domain::{Change, Document, Task};
pub use hotkey::{ChordKey, ChordTracker, HookError, ToggleRequest};
pub use instance::{InstanceLock, LockError};
pub use persistence::{Settings, Store, StoreError};
pub use scheduler::SaveScheduler;
pub use visibility::{Placement, Rect, Visibility, VisibilityController, WidgetSurface};
