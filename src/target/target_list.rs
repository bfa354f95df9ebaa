use std::fmt;

use serde::{Deserialize, Serialize};

use crate::target::{Rect, TargetData};

/// Target data holding the bounding boxes of every contour the pipeline kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TargetListTargetData {
    pub id: String,
    #[serde(rename = "sn")]
    pub serial: i32,
    #[serde(rename = "v")]
    pub valid: bool,
    #[serde(rename = "d", default)]
    pub targets: Vec<Rect>,
}

impl TargetData for TargetListTargetData {
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

impl fmt::Display for TargetListTargetData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TargetListTargetData{{id={}, serial={}, valid={}, targets=[",
            self.id, self.serial, self.valid
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
