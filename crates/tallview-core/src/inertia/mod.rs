mod clock;
mod solver;

use std::time::Duration;

use tracing::debug;

use crate::window::VisibleWindow;

pub use clock::{FrameClock, SteppedClock, SystemClock};
pub use solver::{ExponentialFling, InertiaSolver};

/// State of one fling, alive from release until it settles or is interrupted.
#[derive(Clone, Debug, PartialEq)]
pub struct FlingSession {
    pub start_top: i32,
    /// Image-space velocity handed to the solver (release velocity negated).
    pub velocity: f32,
    pub active: bool,
    started_at: Duration,
}

/// Result of one inertia step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InertiaTick {
    /// No fling in progress; nothing changed.
    Idle,
    /// The window moved to this top and the fling continues.
    Moved(i32),
    /// The window moved to its final top and the session ended.
    Settled(i32),
}

impl InertiaTick {
    /// Whether this step changed the window and needs a redraw.
    pub fn needs_redraw(self) -> bool {
        !matches!(self, InertiaTick::Idle)
    }
}

/// Turns a fling release into a sequence of window positions.
pub struct InertiaController {
    solver: Box<dyn InertiaSolver>,
    clock: Box<dyn FrameClock>,
    session: Option<FlingSession>,
}

impl InertiaController {
    pub fn new(solver: Box<dyn InertiaSolver>, clock: Box<dyn FrameClock>) -> Self {
        Self {
            solver,
            clock,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.active)
    }

    pub fn session(&self) -> Option<&FlingSession> {
        self.session.as_ref()
    }

    /// Seed the solver from the current top and the release velocity.
    ///
    /// The velocity is negated: a downward finger motion scrolls towards the
    /// top of the image. `max_top` is the lower vertical bound of the fling.
    pub fn start_fling(&mut self, current_top: i32, release_velocity_y: f32, max_top: i32) {
        let velocity = -release_velocity_y;
        self.solver.fling(current_top, velocity, 0, max_top.max(0));
        let started_at = self.clock.now();

        if self.solver.is_finished() {
            debug!(velocity, "fling too slow, nothing to animate");
            self.session = None;
            return;
        }

        debug!(current_top, velocity, max_top, "fling started");
        self.session = Some(FlingSession {
            start_top: current_top,
            velocity,
            active: true,
            started_at,
        });
    }

    /// Advance the fling by one frame and move `window` to the new top.
    pub fn tick(&mut self, window: &mut VisibleWindow) -> InertiaTick {
        let Some(session) = self.session.as_ref() else {
            return InertiaTick::Idle;
        };

        let elapsed = self.clock.now().saturating_sub(session.started_at);
        if !self.solver.compute_offset(elapsed) {
            self.session = None;
            return InertiaTick::Idle;
        }

        let top = self.solver.current();
        window.snap_to_top(top);

        if self.solver.is_finished() {
            debug!(top, "fling settled");
            self.session = None;
            InertiaTick::Settled(top)
        } else {
            InertiaTick::Moved(top)
        }
    }

    /// Stop any fling in progress. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(_) => {
                self.solver.force_finished();
                debug!("fling cancelled");
                true
            }
            None => false,
        }
    }
}
