use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::DeadeyeError;

/// Identifies one camera on a Deadeye coprocessor: a unit letter and a camera number, e.g. `W0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId {
    unit: char,
    inum: u8,
}

impl CameraId {
    pub fn unit(&self) -> char {
        self.unit
    }

    pub fn inum(&self) -> u8 {
        self.inum
    }

    pub fn control_path(&self) -> String {
        format!("/Deadeye/{}/{}", self.unit, self.inum)
    }
}

impl FromStr for CameraId {
    type Err = DeadeyeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(unit), Some(inum), None) if unit.is_ascii_uppercase() && inum.is_ascii_digit() => {
                Ok(CameraId {
                    unit,
                    inum: inum as u8 - b'0',
                })
            }
            _ => Err(DeadeyeError::InvalidCameraId(s.to_string())),
        }
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.unit, self.inum)
    }
}

/// Capture settings of the camera's video source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Capture {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for Capture {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}
