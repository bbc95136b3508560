use tracing::trace;

use crate::inertia::{InertiaController, InertiaTick};
use crate::window::VisibleWindow;

/// Classified gesture, in device pixels (velocities in pixels per second).
///
/// Scroll deltas follow the "distance travelled since the last event"
/// convention: a positive `dy` means the finger moved up, revealing rows
/// further down the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    Down,
    Scroll { dx: f32, dy: f32 },
    Fling { vx: f32, vy: f32 },
    ShowPress,
    SingleTap,
    LongPress,
}

/// Routes gestures to the window and the inertia controller.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureAdapter;

impl GestureAdapter {
    /// Apply one gesture. Returns `true` if the window changed and a redraw
    /// should be scheduled.
    pub fn handle(
        &self,
        event: GestureEvent,
        window: &mut VisibleWindow,
        inertia: &mut InertiaController,
    ) -> bool {
        trace!(?event, "gesture");
        match event {
            GestureEvent::Down => {
                inertia.cancel();
                false
            }
            GestureEvent::Scroll { dy, .. } => {
                let before = window.rect();
                window.pan_by(dy).is_some() && window.rect() != before
            }
            GestureEvent::Fling { vy, .. } => {
                if let (Some(top), Some(max_top)) = (window.top(), window.max_top()) {
                    inertia.start_fling(top, vy, max_top);
                }
                inertia.is_active()
            }
            GestureEvent::ShowPress | GestureEvent::SingleTap | GestureEvent::LongPress => false,
        }
    }

    /// Per-frame inertia step, called from the render cycle.
    pub fn on_frame(
        &self,
        window: &mut VisibleWindow,
        inertia: &mut InertiaController,
    ) -> InertiaTick {
        inertia.tick(window)
    }
}
