//! Camera commands with last-writer-wins semantics.
//!
//! Moves are fire-and-forget. Every issued command gets a higher generation
//! than all earlier ones, and only the newest generation's target is
//! authoritative; an animation still running for an older command is simply
//! redirected by the view.

use crate::geo::{Bounds, Coordinate, Padding};
use crate::view::{Animation, MapView};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    PanTo {
        coordinate: Coordinate,
        zoom: f64,
        animation: Animation,
    },
    FitBounds {
        bounds: Bounds,
        padding: Padding,
        animation: Animation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

#[derive(Debug, Default)]
pub struct CameraTracker {
    generation: u64,
    target: Option<CameraCommand>,
}

impl CameraTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `command` to the view and make it the current target.
    pub fn issue<V>(&mut self, view: &mut V, command: CameraCommand) -> Generation
    where
        V: MapView + ?Sized,
    {
        self.generation += 1;
        self.target = Some(command);
        tracing::debug!(generation = self.generation, ?command, "camera command");

        match command {
            CameraCommand::PanTo {
                coordinate,
                zoom,
                animation,
            } => view.pan_to(coordinate, zoom, animation),
            CameraCommand::FitBounds {
                bounds,
                padding,
                animation,
            } => view.fit_bounds(bounds, padding, animation),
        }

        Generation(self.generation)
    }

    /// The most recently issued command, if any.
    #[must_use]
    pub fn target(&self) -> Option<&CameraCommand> {
        self.target.as_ref()
    }

    /// Whether `generation` still names the authoritative target.
    #[must_use]
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.generation
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vendmap_core::MapConfig;

    use super::*;
    use crate::headless::HeadlessMap;

    #[test]
    fn newer_command_supersedes_older() {
        let mut view = HeadlessMap::new(&MapConfig::default());
        let mut camera = CameraTracker::new();
        let animation = Animation::Animated {
            duration: Duration::from_millis(1500),
        };

        let first = camera.issue(
            &mut view,
            CameraCommand::PanTo {
                coordinate: Coordinate { lat: 52.5, lon: 13.4 },
                zoom: 12.0,
                animation,
            },
        );
        let second_cmd = CameraCommand::PanTo {
            coordinate: Coordinate { lat: 48.1, lon: 11.6 },
            zoom: 12.0,
            animation,
        };
        let second = camera.issue(&mut view, second_cmd);

        assert!(!camera.is_current(first));
        assert!(camera.is_current(second));
        assert!(second > first);
        assert_eq!(camera.target(), Some(&second_cmd));
        assert_eq!(view.center(), Coordinate { lat: 48.1, lon: 11.6 });
    }

    #[test]
    fn fresh_tracker_has_no_target() {
        assert!(CameraTracker::new().target().is_none());
    }
}
