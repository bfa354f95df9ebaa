use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DeadeyeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Bounding box of a detected contour.
///
/// On the wire a rect is the array `[x, y, width, height, area]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i32; 5]", into = "[i32; 5]")]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
    pub contour_area: i32,
}

impl Rect {
    pub fn new(top_left: Point, bottom_right: Point, contour_area: i32) -> Self {
        Self {
            top_left,
            bottom_right,
            contour_area,
        }
    }

    pub fn width(&self) -> i32 {
        self.bottom_right.x.saturating_sub(self.top_left.x)
    }

    pub fn height(&self) -> i32 {
        self.bottom_right.y.saturating_sub(self.top_left.y)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.top_left.x.saturating_add(self.width() / 2),
            self.top_left.y.saturating_add(self.height() / 2),
        )
    }
}

impl TryFrom<[i32; 5]> for Rect {
    type Error = DeadeyeError;

    fn try_from(wire: [i32; 5]) -> Result<Self, Self::Error> {
        let [x, y, width, height, area] = wire;
        match (x.checked_add(width), y.checked_add(height)) {
            (Some(right), Some(bottom)) => Ok(Rect::new(
                Point::new(x, y),
                Point::new(right, bottom),
                area,
            )),
            _ => Err(DeadeyeError::InvalidRect(wire)),
        }
    }
}

impl From<Rect> for [i32; 5] {
    fn from(rect: Rect) -> Self {
        [
            rect.top_left.x,
            rect.top_left.y,
            rect.width(),
            rect.height(),
            rect.contour_area,
        ]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect{{topLeft={}, bottomRight={}, contourArea={}}}",
            self.top_left, self.bottom_right, self.contour_area
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_wire() {
        let rect: Rect = serde_json::from_str("[10, 20, 30, 40, 500]").unwrap();
        assert_eq!(rect.top_left, Point::new(10, 20));
        assert_eq!(rect.bottom_right, Point::new(40, 60));
        assert_eq!(rect.width(), 30);
        assert_eq!(rect.height(), 40);
        assert_eq!(rect.contour_area, 500);
        assert_eq!(rect.center(), Point::new(25, 40));
    }

    #[test]
    fn test_rect_to_wire() {
        let rect = Rect::new(Point::new(1, 2), Point::new(4, 8), 9);
        assert_eq!(serde_json::to_string(&rect).unwrap(), "[1,2,3,6,9]");
    }

    #[test]
    fn test_rect_rejects_overflowing_extent() {
        let result = serde_json::from_str::<Rect>("[2147483647, 0, 1, 0, 0]");
        assert!(result.is_err());
        assert!(matches!(
            Rect::try_from([0, i32::MIN, 0, -1, 0]),
            Err(DeadeyeError::InvalidRect(_))
        ));
    }

    #[test]
    fn test_extent_saturates_for_inverted_corners() {
        let rect = Rect::new(Point::new(i32::MAX, 0), Point::new(i32::MIN, 0), 0);
        assert_eq!(rect.width(), i32::MIN);
        assert_eq!(rect.center(), Point::new(i32::MIN / 2 + i32::MAX, 0));
    }

    #[test]
    fn test_rect_rejects_short_array() {
        let result = serde_json::from_str::<Rect>("[1, 2, 3, 4]");
        assert!(result.is_err());
    }
}
