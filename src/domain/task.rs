use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task node in the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique ID for internal references (not persisted, regenerated on load)
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Display text
    pub text: String,
    /// Whether the task is checked off
    #[serde(default)]
    pub completed: bool,
    /// Whether children are rendered; persists across restarts
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    /// When the task was created (immutable after creation)
    pub created_at: DateTime<Local>,
    /// Child tasks, owned by this node (insertion order = display order)
    #[serde(default)]
    pub children: Vec<Task>,
}

fn default_expanded() -> bool {
    true
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            expanded: true,
            created_at: Local::now(),
            children: Vec::new(),
        }
    }

    /// Whether this node has any children (derived, never stored)
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Append a child task. Newly added children must be visible immediately,
    /// so the parent is expanded as a side effect.
    pub fn add_child(&mut self, child: Task) {
        self.children.push(child);
        self.expanded = true;
    }

    /// Number of nodes in this subtree, including this node
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Task::subtree_len).sum::<usize>()
    }
}

// Round-trip equality has to hold across a save/load cycle, and ids are
// regenerated on load, so they stay out of the comparison.
impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.completed == other.completed
            && self.expanded == other.expanded
            && self.created_at == other.created_at
            && self.children == other.children
    }
}

impl Eq for Task {}

/// Count every node at every depth of the forest
pub fn count_total(tasks: &[Task]) -> usize {
    tasks.iter().map(Task::subtree_len).sum()
}

/// Count completed nodes at every depth of the forest
pub fn count_completed(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|t| (t.completed as usize) + count_completed(&t.children))
        .sum()
}

/// Count incomplete nodes at every depth of the forest
pub fn count_incomplete(tasks: &[Task]) -> usize {
    count_total(tasks) - count_completed(tasks)
}

/// Find a node anywhere in the forest by id
pub fn find_in(tasks: &[Task], id: Uuid) -> Option<&Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_in(&task.children, id) {
            return Some(found);
        }
    }
    None
}

/// Find a node anywhere in the forest by id, mutably
pub fn find_in_mut(tasks: &mut [Task], id: Uuid) -> Option<&mut Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_in_mut(&mut task.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove a node (and its entire subtree) from the forest by id.
/// Returns the detached subtree, or None if the id is unknown.
pub fn remove_from(tasks: &mut Vec<Task>, id: Uuid) -> Option<Task> {
    if let Some(pos) = tasks.iter().position(|t| t.id == id) {
        return Some(tasks.remove(pos));
    }
    for task in tasks {
        if let Some(removed) = remove_from(&mut task.children, id) {
            return Some(removed);
        }
    }
    None
}
