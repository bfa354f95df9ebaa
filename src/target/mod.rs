mod geometry;
mod hub;
mod target_list;

use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use geometry::{Point, Rect};
pub use hub::{HubGeometry, HubTargetData};
pub use target_list::TargetListTargetData;

use crate::error::DeadeyeError;

/// A target-data schema published by a Deadeye camera.
///
/// Every schema carries the camera `id`, a per-frame `serial` and the camera's `valid` flag.
pub trait TargetData:
    DeserializeOwned + Serialize + Clone + Debug + Display + Send + Sync + 'static
{
    fn id(&self) -> &str;
    fn serial(&self) -> i32;
    fn valid(&self) -> bool;

    fn from_json(bytes: &[u8]) -> Result<Self, DeadeyeError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn to_json(&self) -> Result<String, DeadeyeError> {
        Ok(serde_json::to_string(self)?)
    }
}
