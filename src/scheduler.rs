use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::command::Command;
use crate::subsystem::Subsystem;

/// Ticks registered subsystems and runs commands subject to the robot's enabled state.
pub struct Scheduler {
    subsystems: Vec<Arc<dyn Subsystem>>,
    robot_enabled: AtomicBool,
    period: Duration,
}

impl Scheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            subsystems: Vec::new(),
            robot_enabled: AtomicBool::new(false),
            period,
        }
    }

    pub fn register_subsystem(&mut self, subsystem: Arc<dyn Subsystem>) {
        debug!("Registering subsystem {}", subsystem.name());
        self.subsystems.push(subsystem);
    }

    pub fn subsystem_names(&self) -> Vec<&str> {
        self.subsystems.iter().map(|s| s.name()).collect()
    }

    pub fn robot_enabled(&self) -> bool {
        self.robot_enabled.load(Ordering::SeqCst)
    }

    pub fn set_robot_enabled(&self, enabled: bool) {
        self.robot_enabled.store(enabled, Ordering::SeqCst);
    }

    /// Runs `command` now if the robot state allows it. Returns whether it ran.
    pub fn schedule(&self, command: &dyn Command) -> bool {
        if !self.robot_enabled() && !command.runs_when_disabled() {
            debug!("Robot disabled, not running {}", command.name());
            return false;
        }
        debug!("Running command {}", command.name());
        command.execute();
        true
    }

    pub fn run_once(&self) {
        for subsystem in &self.subsystems {
            subsystem.periodic();
        }
    }

    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!("Scheduler running every {:?}", self.period);
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Scheduler received shutdown");
                    break;
                }
                _ = interval.tick() => self.run_once(),
            }
        }
    }
}
