use std::fmt;

use serde::{Deserialize, Serialize};

use crate::deadeye::Capture;
use crate::error::DeadeyeError;
use crate::target::{Rect, TargetData};

const HORIZONTAL_FOV: f64 = 1.0;
const MIN_VALID_TARGETS: usize = 3;

/// Camera frame geometry used to turn hub target pixels into steering errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HubGeometry {
    pub frame_center: i32,
    pub horizontal_fov: f64,
}

impl HubGeometry {
    pub fn new(frame_center: i32, horizontal_fov: f64) -> Self {
        Self {
            frame_center,
            horizontal_fov,
        }
    }

    /// Centers the frame on half the capture width. Widths under two pixels are rejected.
    pub fn from_capture(capture: &Capture) -> Result<Self, DeadeyeError> {
        match i32::try_from(capture.width / 2) {
            Ok(frame_center) if frame_center > 0 => Ok(Self::new(frame_center, HORIZONTAL_FOV)),
            _ => Err(DeadeyeError::InvalidCapture(capture.width)),
        }
    }

    fn center(&self) -> Option<f64> {
        (self.frame_center > 0).then_some(f64::from(self.frame_center))
    }
}

/// Target data for the hub's ring of retro-reflective tape.
///
/// Decoding rejects keys other than `id`, `sn`, `v`, `ep`, `r` and `d`. Encoding omits
/// `ep` and `r`, which only the camera computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubTargetData {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "sn", default = "missing_serial")]
    pub serial: i32,
    #[serde(rename = "v", default)]
    pub valid: bool,
    #[serde(rename = "ep", default, skip_serializing)]
    pub error_pixels: f64,
    #[serde(rename = "r", default, skip_serializing)]
    pub range: f64,
    #[serde(rename = "d", default)]
    pub targets: Vec<Rect>,
}

fn missing_serial() -> i32 {
    -1
}

impl Default for HubTargetData {
    fn default() -> Self {
        Self {
            id: String::new(),
            serial: 0,
            valid: false,
            error_pixels: 0.0,
            range: 0.0,
            targets: Vec::new(),
        }
    }
}

impl HubTargetData {
    /// Valid when the camera flagged the frame valid and saw more than two pieces of tape.
    pub fn is_valid(&self) -> bool {
        self.valid && self.targets.len() >= MIN_VALID_TARGETS
    }

    /// Pixels between the center of the target group and the center of the frame.
    ///
    /// Returns `None` when no targets were detected.
    pub fn error_pixels(&self, geometry: &HubGeometry) -> Option<f64> {
        let first = self.targets.first()?;
        let last = self.targets.last()?;
        let min_x = f64::from(first.bottom_right.x);
        let max_x = f64::from(last.top_left.x);
        Some((max_x + min_x) / 2.0 - f64::from(geometry.frame_center))
    }

    pub fn error_radians(&self, geometry: &HubGeometry) -> Option<f64> {
        let error_pixels = self.error_pixels(geometry)?;
        let frame_width = 2.0 * geometry.center()?;
        Some(-geometry.horizontal_fov * error_pixels / frame_width)
    }

    /// 1.0 when the group is centered, falling to 0.0 at the frame edge.
    ///
    /// Like [`error_radians`](Self::error_radians), returns `None` for a geometry without a
    /// positive frame center.
    pub fn interpolate_t(&self, geometry: &HubGeometry) -> Option<f64> {
        let error_pixels = self.error_pixels(geometry)?;
        let frame_center = geometry.center()?;
        Some((frame_center - error_pixels.abs()) / frame_center)
    }
}

impl TargetData for HubTargetData {
    fn id(&self) -> &str {
        &self.id
    }

    fn serial(&self) -> i32 {
        self.serial
    }

    fn valid(&self) -> bool {
        self.valid
    }
}

impl fmt::Display for HubTargetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HubTargetData{{id={}, serial={}, valid={}, errorPixels={}, range={}, targets=[",
            self.id, self.serial, self.valid, self.error_pixels, self.range
        )?;
        for (index, target) in self.targets.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{target}")?;
        }
        write!(f, "]}}")
    }
}
