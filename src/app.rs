use crate::domain::{self, Change, ChangeHub, Document, Task};
use crate::notifications;
use crate::persistence::{Settings, Store};
use crate::scheduler::SaveScheduler;
use crate::visibility::{Visibility, VisibilityController, WidgetSurface};
use log::{debug, error, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

/// Main application state.
///
/// Owns the document and is the small interface the external view layer
/// calls: task and notes mutations, counters, visibility toggling. Every
/// mutation that changes the document is announced to the registered change
/// listeners; the save scheduler is subscribed at construction, so task
/// edits persist immediately and notes edits ride the debounce window. All
/// of this runs on the main thread - the only cross-thread traffic is the
/// toggle request channel owned by main.
pub struct App {
    document: Document,
    store: Store,
    hub: ChangeHub,
    scheduler: Rc<RefCell<SaveScheduler>>,
    visibility: VisibilityController,
}

impl App {
    pub fn new(document: Document, store: Store, settings: &Settings) -> Self {
        let scheduler = Rc::new(RefCell::new(SaveScheduler::new()));
        let mut hub = ChangeHub::default();

        // The persistence trigger is just another change listener.
        let save_trigger = Rc::clone(&scheduler);
        hub.subscribe(move |change| {
            save_trigger
                .borrow_mut()
                .document_changed(change, Instant::now());
        });

        Self {
            document,
            store,
            hub,
            scheduler,
            visibility: VisibilityController::new(
                settings.widget_width,
                settings.widget_height,
                settings.edge_margin,
            ),
        }
    }

    /// Register an additional change listener (counter display, view layer)
    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) {
        self.hub.subscribe(listener);
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Look up a task anywhere in the tree (view-layer read access)
    pub fn task(&self, id: Uuid) -> Option<&Task> {
        domain::find_in(&self.document.tasks, id)
    }

    pub fn count_total(&self) -> usize {
        self.document.count_total()
    }

    pub fn count_completed(&self) -> usize {
        self.document.count_completed()
    }

    pub fn count_incomplete(&self) -> usize {
        self.document.count_incomplete()
    }

    /// Add a task at the top level or under `parent`. Blank text is a no-op.
    pub fn add_task(&mut self, parent: Option<Uuid>, text: &str) -> Option<Uuid> {
        let id = self.document.add_task(parent, text)?;
        self.after_change(Change::Tasks);
        Some(id)
    }

    /// Delete a task and its entire subtree
    pub fn delete_task(&mut self, id: Uuid) -> bool {
        let deleted = self.document.delete_task(id);
        if deleted {
            self.after_change(Change::Tasks);
        }
        deleted
    }

    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> bool {
        let changed = self.document.set_completed(id, completed);
        if changed {
            self.after_change(Change::Tasks);
        }
        changed
    }

    pub fn set_expanded(&mut self, id: Uuid, expanded: bool) -> bool {
        let changed = self.document.set_expanded(id, expanded);
        if changed {
            self.after_change(Change::Tasks);
        }
        changed
    }

    pub fn edit_text(&mut self, id: Uuid, new_text: &str) -> bool {
        let changed = self.document.edit_text(id, new_text);
        if changed {
            self.after_change(Change::Tasks);
        }
        changed
    }

    /// Replace the notes text. Saves are debounced, not immediate.
    pub fn set_notes(&mut self, notes: &str) -> bool {
        let changed = self.document.set_notes(notes);
        if changed {
            self.after_change(Change::Notes);
        }
        changed
    }

    /// Announce a change, then run any save that became due right away.
    /// Task mutations request an immediate save, so they hit disk inside the
    /// mutating call; notes edits only arm the debounce window here.
    fn after_change(&mut self, change: Change) {
        self.hub.emit(change);
        self.run_due_saves(Instant::now());
    }

    /// Handle a toggle request from the hotkey listener or the view layer
    pub fn toggle_visibility(&mut self, surface: &mut dyn WidgetSurface, now: Instant) {
        if self.visibility.toggle(surface, now) {
            info!("visibility toggle -> {:?}", self.visibility.state());
        } else {
            debug!("visibility toggle dropped mid-transition");
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility.state()
    }

    /// Advance time-driven work: finished transitions and due saves
    pub fn on_tick(&mut self, surface: &mut dyn WidgetSurface, now: Instant) {
        self.visibility.poll(surface, now);
        self.run_due_saves(now);
    }

    fn run_due_saves(&mut self, now: Instant) {
        let due = self.scheduler.borrow_mut().take_due(now);
        if due {
            self.persist();
        }
    }

    /// Save the current document unconditionally, bypassing any pending
    /// debounce window. Called once at shutdown.
    pub fn flush_now(&mut self) {
        self.scheduler.borrow_mut().take_pending();
        self.persist();
    }

    /// Write the document. Failures are recoverable by design: log, tell the
    /// user, and keep going - the next mutation will try again.
    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.document) {
            error!("save failed: {err}");
            notifications::notify_storage_error(&err.to_string());
        }
    }
}
