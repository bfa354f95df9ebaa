mod deadeye_subsystem;
pub mod metrics;
mod vision_subsystem;

pub use deadeye_subsystem::{DeadeyeSubsystem, DEADEYE_CAMERA};
pub use vision_subsystem::{HubTargetTracker, VisionSubsystem};

/// A robot mechanism registered with the [`Scheduler`](crate::scheduler::Scheduler).
///
/// `periodic` runs once per scheduler tick. Teardown happens on drop.
pub trait Subsystem: Send + Sync {
    fn name(&self) -> &str;

    fn periodic(&self) {}
}
