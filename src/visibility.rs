use std::time::{Duration, Instant};

/// How long the enter/exit transition runs before the state settles
pub const TRANSITION: Duration = Duration::from_millis(200);

/// A rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Where the widget window should sit on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Compute the widget placement: against the right edge of the work area,
/// vertically centered, inset by `margin`
pub fn compute_placement(work_area: Rect, width: i32, height: i32, margin: i32) -> Placement {
    Placement {
        x: work_area.x + work_area.width - width - margin,
        y: work_area.y + (work_area.height - height) / 2,
        width,
        height,
    }
}

/// Visibility of the widget window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    /// Enter transition in progress
    Showing,
    Visible,
    /// Exit transition in progress
    Hiding,
}

/// Commands the visibility machine issues to the view collaborator.
/// The core never draws; a real shell animates these, the bundled host and
/// the tests record them.
pub trait WidgetSurface {
    /// Work area of the primary display (excludes reserved system UI)
    fn work_area(&self) -> Rect;
    fn apply_placement(&mut self, placement: Placement);
    fn begin_show(&mut self);
    fn begin_hide(&mut self);
    /// Remove the element from view; only called after the exit transition
    fn set_hidden(&mut self);
    fn focus_entry(&mut self);
}

/// Show/hide orchestration for the widget window.
///
/// Toggle requests arriving while a transition is in progress are dropped so
/// a chord held slightly too long cannot start competing transitions.
/// Transition completion is time-driven: the controller owns the transition
/// window and `poll` settles it, with instants injected by the caller.
pub struct VisibilityController {
    state: Visibility,
    width: i32,
    height: i32,
    margin: i32,
    transition_ends: Option<Instant>,
}

impl VisibilityController {
    pub fn new(width: i32, height: i32, margin: i32) -> Self {
        Self {
            state: Visibility::Hidden,
            width,
            height,
            margin,
            transition_ends: None,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    fn placement(&self, surface: &dyn WidgetSurface) -> Placement {
        compute_placement(surface.work_area(), self.width, self.height, self.margin)
    }

    /// Handle a toggle request. Returns false when the request was dropped
    /// because a transition is already in progress.
    pub fn toggle(&mut self, surface: &mut dyn WidgetSurface, now: Instant) -> bool {
        match self.state {
            Visibility::Hidden => {
                let placement = self.placement(surface);
                surface.apply_placement(placement);
                surface.begin_show();
                self.state = Visibility::Showing;
                self.transition_ends = Some(now + TRANSITION);
                true
            }
            Visibility::Visible => {
                surface.begin_hide();
                self.state = Visibility::Hiding;
                self.transition_ends = Some(now + TRANSITION);
                true
            }
            Visibility::Showing | Visibility::Hiding => false,
        }
    }

    /// Settle a transition whose window has elapsed; called every tick
    pub fn poll(&mut self, surface: &mut dyn WidgetSurface, now: Instant) {
        let Some(ends) = self.transition_ends else {
            return;
        };
        if now < ends {
            return;
        }
        self.transition_ends = None;

        match self.state {
            Visibility::Showing => {
                self.state = Visibility::Visible;
                // Display layout may have changed since the widget was last
                // shown; re-assert the position before handing over focus.
                let placement = self.placement(surface);
                surface.apply_placement(placement);
                surface.focus_entry();
            }
            Visibility::Hiding => {
                self.state = Visibility::Hidden;
                surface.set_hidden();
            }
            Visibility::Hidden | Visibility::Visible => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Placement(Placement),
        BeginShow,
        BeginHide,
        SetHidden,
        FocusEntry,
    }

    struct RecordingSurface {
        work_area: Rect,
        calls: Vec<Call>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                work_area: Rect {
                    x: 0,
                    y: 0,
                    width: 1920,
                    height: 1040,
                },
                calls: Vec::new(),
            }
        }

        fn count(&self, call: Call) -> usize {
            self.calls.iter().filter(|c| **c == call).count()
        }
    }

    impl WidgetSurface for RecordingSurface {
        fn work_area(&self) -> Rect {
            self.work_area
        }
        fn apply_placement(&mut self, placement: Placement) {
            self.calls.push(Call::Placement(placement));
        }
        fn begin_show(&mut self) {
            self.calls.push(Call::BeginShow);
        }
        fn begin_hide(&mut self) {
            self.calls.push(Call::BeginHide);
        }
        fn set_hidden(&mut self) {
            self.calls.push(Call::SetHidden);
        }
        fn focus_entry(&mut self) {
            self.calls.push(Call::FocusEntry);
        }
    }

    fn controller() -> VisibilityController {
        VisibilityController::new(360, 540, 12)
    }

    #[test]
    fn test_placement_right_edge_centered() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 1920,
            height: 1040,
        };
        let placement = compute_placement(area, 360, 540, 12);
        assert_eq!(placement.x, 1920 - 360 - 12);
        assert_eq!(placement.y, (1040 - 540) / 2);
    }

    #[test]
    fn test_placement_respects_work_area_origin() {
        // Secondary-monitor style work area with a non-zero origin
        let area = Rect {
            x: 1920,
            y: 200,
            width: 1280,
            height: 800,
        };
        let placement = compute_placement(area, 360, 540, 12);
        assert_eq!(placement.x, 1920 + 1280 - 360 - 12);
        assert_eq!(placement.y, 200 + (800 - 540) / 2);
    }

    #[test]
    fn test_show_sequence_reaches_visible_and_focuses() {
        let mut controller = controller();
        let mut surface = RecordingSurface::new();
        let t0 = Instant::now();

        assert!(controller.toggle(&mut surface, t0));
        assert_eq!(controller.state(), Visibility::Showing);
        assert_eq!(surface.count(Call::BeginShow), 1);

        // Transition still running: nothing settles yet
        controller.poll(&mut surface, t0 + TRANSITION / 2);
        assert_eq!(controller.state(), Visibility::Showing);

        controller.poll(&mut surface, t0 + TRANSITION);
        assert_eq!(controller.state(), Visibility::Visible);
        assert_eq!(surface.count(Call::FocusEntry), 1);
    }

    #[test]
    fn test_toggle_during_transition_is_dropped() {
        let mut controller = controller();
        let mut surface = RecordingSurface::new();
        let t0 = Instant::now();

        assert!(controller.toggle(&mut surface, t0));
        // Second request while Showing: dropped
        assert!(!controller.toggle(&mut surface, t0 + Duration::from_millis(50)));

        controller.poll(&mut surface, t0 + TRANSITION);
        assert_eq!(controller.state(), Visibility::Visible);
        assert_eq!(surface.count(Call::BeginShow), 1);
        assert_eq!(surface.count(Call::BeginHide), 0);
    }

    #[test]
    fn test_hide_sequence_hides_only_after_transition() {
        let mut controller = controller();
        let mut surface = RecordingSurface::new();
        let t0 = Instant::now();

        controller.toggle(&mut surface, t0);
        controller.poll(&mut surface, t0 + TRANSITION);
        assert_eq!(controller.state(), Visibility::Visible);

        let t1 = t0 + Duration::from_secs(5);
        assert!(controller.toggle(&mut surface, t1));
        assert_eq!(controller.state(), Visibility::Hiding);
        // Not hidden from view until the exit transition finishes
        assert_eq!(surface.count(Call::SetHidden), 0);

        assert!(!controller.toggle(&mut surface, t1 + Duration::from_millis(10)));

        controller.poll(&mut surface, t1 + TRANSITION);
        assert_eq!(controller.state(), Visibility::Hidden);
        assert_eq!(surface.count(Call::SetHidden), 1);
    }

    #[test]
    fn test_position_reasserted_when_entering_visible() {
        let mut controller = controller();
        let mut surface = RecordingSurface::new();
        let t0 = Instant::now();

        controller.toggle(&mut surface, t0);

        // Resolution change mid-transition: the settle pass must pick it up
        surface.work_area = Rect {
            x: 0,
            y: 0,
            width: 2560,
            height: 1400,
        };
        controller.poll(&mut surface, t0 + TRANSITION);

        let expected = compute_placement(surface.work_area, 360, 540, 12);
        assert_eq!(surface.calls.last(), Some(&Call::FocusEntry));
        assert!(surface.calls.contains(&Call::Placement(expected)));
    }
}
