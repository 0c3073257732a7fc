//! State of the onboarding overlay that guides the user to a surface.

use serde::{Deserialize, Serialize};

/// What the overlay asks the user to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingGoal {
    /// Any horizontal surface.
    #[default]
    HorizontalPlane,
}

/// Insets from the parent view's edges; all zero fills the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeConstraints {
    /// Left inset.
    pub left: f32,
    /// Right inset.
    pub right: f32,
    /// Top inset.
    pub top: f32,
    /// Bottom inset.
    pub bottom: f32,
}

impl EdgeConstraints {
    /// Pin every edge to the parent.
    pub fn fill_parent() -> Self {
        Self::default()
    }
}

/// Overlay configuration plus visibility derived from tracking progress.
///
/// The overlay widget itself is provided by the host platform; this only
/// tracks the wiring the controller is responsible for.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoachingOverlay {
    goal: CoachingGoal,
    activates_automatically: bool,
    session_bound: bool,
    constraints: Option<EdgeConstraints>,
    active: bool,
}

impl CoachingOverlay {
    /// Overlay that has not been installed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the overlay over the view, bound to the session.
    pub fn install(&mut self, goal: CoachingGoal, constraints: EdgeConstraints) {
        self.goal = goal;
        self.constraints = Some(constraints);
        self.activates_automatically = true;
        self.session_bound = true;
        self.active = true;
    }

    /// Goal shown to the user.
    pub fn goal(&self) -> CoachingGoal {
        self.goal
    }

    /// Whether the overlay shows and hides itself.
    pub fn activates_automatically(&self) -> bool {
        self.activates_automatically
    }

    /// Whether the overlay observes a session.
    pub fn is_session_bound(&self) -> bool {
        self.session_bound
    }

    /// Layout constraints, once installed.
    pub fn constraints(&self) -> Option<EdgeConstraints> {
        self.constraints
    }

    /// Whether the overlay is currently shown.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-evaluate visibility after tracking progress changed.
    pub fn update(&mut self, horizontal_planes: usize, tracking_normal: bool) {
        if !(self.session_bound && self.activates_automatically) {
            return;
        }
        let satisfied = tracking_normal
            && match self.goal {
                CoachingGoal::HorizontalPlane => horizontal_planes > 0,
            };
        self.active = !satisfied;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninstalled_overlay_stays_hidden() {
        let mut overlay = CoachingOverlay::new();
        overlay.update(0, true);
        assert!(!overlay.is_active());
        assert!(overlay.constraints().is_none());
    }

    #[test]
    fn horizontal_goal_hides_once_floor_is_found() {
        let mut overlay = CoachingOverlay::new();
        overlay.install(CoachingGoal::HorizontalPlane, EdgeConstraints::fill_parent());
        assert!(overlay.is_active());
        overlay.update(0, true);
        assert!(overlay.is_active());
        overlay.update(1, true);
        assert!(!overlay.is_active());
        overlay.update(1, false);
        assert!(overlay.is_active());
    }
}
