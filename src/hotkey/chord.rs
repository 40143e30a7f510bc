/// The two physical keys that form the toggle chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordKey {
    RightShift,
    RightControl,
}

/// Per-key Up/Down state for the toggle chord.
///
/// Each tracked key is a two-state machine: a key-down event transitions
/// Up -> Down and fires the toggle when the other tracked key is already
/// Down; auto-repeat key-downs arriving while a key is already Down are
/// no-ops for firing. Key-up transitions Down -> Up unconditionally. The
/// tracker never sees untracked keys - the platform hook forwards everything
/// to the OS regardless.
#[derive(Debug, Clone, Default)]
pub struct ChordTracker {
    right_shift_down: bool,
    right_control_down: bool,
}

impl ChordTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a key-down event for a tracked key.
    /// Returns true exactly once per chord formation.
    pub fn key_down(&mut self, key: ChordKey) -> bool {
        match key {
            ChordKey::RightShift => {
                if self.right_shift_down {
                    return false;
                }
                self.right_shift_down = true;
                self.right_control_down
            }
            ChordKey::RightControl => {
                if self.right_control_down {
                    return false;
                }
                self.right_control_down = true;
                self.right_shift_down
            }
        }
    }

    /// Process a key-up event for a tracked key. No side effect besides the
    /// state change.
    pub fn key_up(&mut self, key: ChordKey) {
        match key {
            ChordKey::RightShift => self.right_shift_down = false,
            ChordKey::RightControl => self.right_control_down = false,
        }
    }

    pub fn is_down(&self, key: ChordKey) -> bool {
        match key {
            ChordKey::RightShift => self.right_shift_down,
            ChordKey::RightControl => self.right_control_down,
        }
    }
}
