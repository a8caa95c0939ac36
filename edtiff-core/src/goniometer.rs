//! Single-axis goniometer model.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::{length, normalize, Vec3};

/// Goniometer with one rotation axis and identity fixed/setting rotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goniometer {
    /// Unit rotation axis in the laboratory frame.
    pub rotation_axis: Vec3,
}

impl Goniometer {
    /// Goniometer rotating about a known axis.
    pub fn known_axis(axis: Vec3) -> Self {
        Self {
            rotation_axis: normalize(axis),
        }
    }

    /// Replace the rotation axis. A zero vector is rejected.
    pub fn set_rotation_axis(&mut self, axis: Vec3) -> Result<()> {
        if length(axis) == 0.0 {
            return Err(Error::InvalidParameter(
                "rotation axis must be non-zero".into(),
            ));
        }
        self.rotation_axis = normalize(axis);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_axis() {
        let gonio = Goniometer::known_axis([0.0, 1.0, 0.0]);
        assert_eq!(gonio.rotation_axis, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_set_rotation_axis() {
        let mut gonio = Goniometer::known_axis([0.0, 1.0, 0.0]);
        gonio.set_rotation_axis([-2.0, 0.0, 0.0]).unwrap();
        assert_eq!(gonio.rotation_axis, [-1.0, 0.0, 0.0]);
        assert!(gonio.set_rotation_axis([0.0, 0.0, 0.0]).is_err());
    }
}
