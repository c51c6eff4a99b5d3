use glam::{Quat, Vec3};

/// What the character looks at and walks toward this tick.
///
/// Supplied by an external target controller (pointer marker, camera rig,
/// another character). Read-only to the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vec3,
    pub rotation: Option<Quat>,
}

impl Target {
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: None,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

impl From<Vec3> for Target {
    fn from(position: Vec3) -> Self {
        Self::new(position)
    }
}
