use super::task::{self, Task};
use uuid::Uuid;

/// Which part of the document a mutation touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Tasks,
    Notes,
}

/// Registration point for mutation observers: the save scheduler, the counter
/// display and the view layer all subscribe here instead of being wired into
/// the model itself.
#[derive(Default)]
pub struct ChangeHub {
    listeners: Vec<Box<dyn FnMut(Change)>>,
}

impl ChangeHub {
    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(change);
        }
    }
}

/// The single persisted unit: the task forest plus the notes pane text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub tasks: Vec<Task>,
    pub notes: String,
}

impl Document {
    pub fn new(tasks: Vec<Task>, notes: String) -> Self {
        Self { tasks, notes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a new task, either at the top level or under `parent`.
    /// Whitespace-only text is rejected as a no-op, not an error.
    /// Returns the id of the new node.
    pub fn add_task(&mut self, parent: Option<Uuid>, text: &str) -> Option<Uuid> {
        if text.trim().is_empty() {
            return None;
        }

        let task = Task::new(text);
        let id = task.id;

        match parent {
            Some(parent_id) => {
                let parent = task::find_in_mut(&mut self.tasks, parent_id)?;
                parent.add_child(task);
            }
            None => self.tasks.push(task),
        }

        Some(id)
    }

    /// Remove a task and its entire subtree. Returns false for unknown ids.
    pub fn delete_task(&mut self, id: Uuid) -> bool {
        task::remove_from(&mut self.tasks, id).is_some()
    }

    /// Idempotent setter; returns false when nothing changed
    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> bool {
        match task::find_in_mut(&mut self.tasks, id) {
            Some(task) if task.completed != completed => {
                task.completed = completed;
                true
            }
            _ => false,
        }
    }

    /// Idempotent setter; returns false when nothing changed
    pub fn set_expanded(&mut self, id: Uuid, expanded: bool) -> bool {
        match task::find_in_mut(&mut self.tasks, id) {
            Some(task) if task.expanded != expanded => {
                task.expanded = expanded;
                true
            }
            _ => false,
        }
    }

    /// Replace a task's text. Whitespace-only replacements are rejected.
    pub fn edit_text(&mut self, id: Uuid, new_text: &str) -> bool {
        if new_text.trim().is_empty() {
            return false;
        }
        match task::find_in_mut(&mut self.tasks, id) {
            Some(task) => {
                task.text = new_text.to_string();
                true
            }
            None => false,
        }
    }

    /// Replace the notes text; returns false when unchanged
    pub fn set_notes(&mut self, notes: &str) -> bool {
        if self.notes == notes {
            return false;
        }
        self.notes = notes.to_string();
        true
    }

    pub fn count_total(&self) -> usize {
        task::count_total(&self.tasks)
    }

    pub fn count_completed(&self) -> usize {
        task::count_completed(&self.tasks)
    }

    pub fn count_incomplete(&self) -> usize {
        task::count_incomplete(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_add_task_and_subtask_counts() {
        let mut doc = Document::empty();

        let milk = doc.add_task(None, "Buy milk").unwrap();
        let skim = doc.add_task(Some(milk), "2% milk").unwrap();

        assert_eq!(doc.count_total(), 2);
        assert_eq!(doc.count_completed(), 0);

        assert!(doc.set_completed(skim, true));
        assert_eq!(doc.count_completed(), 1);
        assert_eq!(doc.count_incomplete(), 1);
    }

    #[test]
    fn test_add_task_rejects_blank_text() {
        let mut doc = Document::empty();

        assert!(doc.add_task(None, "").is_none());
        assert!(doc.add_task(None, "   \t").is_none());
        assert_eq!(doc.count_total(), 0);
    }

    #[test]
    fn test_add_subtask_expands_collapsed_parent() {
        let mut doc = Document::empty();
        let parent = doc.add_task(None, "Parent").unwrap();
        doc.set_expanded(parent, false);

        doc.add_task(Some(parent), "Child").unwrap();

        assert!(doc.tasks[0].expanded);
    }

    #[test]
    fn test_add_subtask_under_unknown_parent() {
        let mut doc = Document::empty();
        assert!(doc.add_task(Some(Uuid::new_v4()), "orphan").is_none());
        assert_eq!(doc.count_total(), 0);
    }

    #[test]
    fn test_delete_task_drops_descendants() {
        let mut doc = Document::empty();
        let root = doc.add_task(None, "root").unwrap();
        let child = doc.add_task(Some(root), "child").unwrap();
        doc.add_task(Some(child), "grandchild").unwrap();
        doc.add_task(None, "other").unwrap();
        assert_eq!(doc.count_total(), 4);

        // root has 2 descendants: removal shrinks the count by 3
        assert!(doc.delete_task(root));
        assert_eq!(doc.count_total(), 1);
        assert!(!doc.delete_task(root));
    }

    #[test]
    fn test_setters_are_idempotent() {
        let mut doc = Document::empty();
        let id = doc.add_task(None, "Task").unwrap();

        assert!(doc.set_completed(id, true));
        assert!(!doc.set_completed(id, true));

        assert!(doc.set_expanded(id, false));
        assert!(!doc.set_expanded(id, false));
    }

    #[test]
    fn test_edit_text_rejects_blank() {
        let mut doc = Document::empty();
        let id = doc.add_task(None, "Original").unwrap();

        assert!(!doc.edit_text(id, "  "));
        assert_eq!(doc.tasks[0].text, "Original");

        assert!(doc.edit_text(id, "Updated"));
        assert_eq!(doc.tasks[0].text, "Updated");
    }

    #[test]
    fn test_set_notes_noop_when_unchanged() {
        let mut doc = Document::empty();

        assert!(doc.set_notes("hello"));
        assert!(!doc.set_notes("hello"));
        assert!(doc.set_notes("hello world"));
    }

    #[test]
    fn test_change_hub_delivers_to_all_listeners() {
        let mut hub = ChangeHub::default();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |change| seen.borrow_mut().push(change));
        }

        hub.emit(Change::Tasks);
        hub.emit(Change::Notes);

        assert_eq!(
            *seen.borrow(),
            vec![Change::Tasks, Change::Tasks, Change::Notes, Change::Notes]
        );
    }
}
