//! Map viewport: current center, home position and the user's GPS fix.

use crate::models::LatLng;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    default_center: LatLng,
    center: LatLng,
    user_location: Option<LatLng>,
}

impl Viewport {
    pub fn new(default_center: LatLng) -> Self {
        Self {
            default_center,
            center: default_center,
            user_location: None,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn set_center(&mut self, center: LatLng) {
        if center.is_finite() {
            self.center = center;
        }
    }

    /// Recenter on the configured home position.
    pub fn go_home(&mut self) {
        self.center = self.default_center;
    }

    pub fn user_location(&self) -> Option<LatLng> {
        self.user_location
    }

    /// Record a GPS fix and recenter on it. `None` clears the fix.
    pub fn set_user_location(&mut self, location: Option<LatLng>) {
        self.user_location = location.filter(LatLng::is_finite);
        if let Some(location) = self.user_location {
            self.center = location;
        }
    }
}
