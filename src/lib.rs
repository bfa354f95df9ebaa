pub mod command;
pub mod config;
pub mod dashboard;
pub mod deadeye;
pub mod error;
pub mod robot;
pub mod scheduler;
pub mod subsystem;
pub mod target;

pub use error::{AppError, DeadeyeError};

pub use deadeye::{Deadeye, TargetDataListener};
pub use robot::RobotContainer;
pub use subsystem::{DeadeyeSubsystem, VisionSubsystem};
