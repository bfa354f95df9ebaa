use std::sync::Arc;

use tracing::info;

use crate::command::{Command, InstantCommand};
use crate::config::Settings;
use crate::dashboard::{Dashboard, LayoutKind};
use crate::deadeye::link::UdpLink;
use crate::deadeye::{CameraId, PrintListener};
use crate::error::AppError;
use crate::scheduler::Scheduler;
use crate::subsystem::{DeadeyeSubsystem, VisionSubsystem};

pub const DASHBOARD_TAB: &str = "Dashboard";
pub const VISION_LAYOUT: &str = "Vision";
pub const DEADEYE_LAYOUT: &str = "Deadeye";

/// Wires the robot's subsystems to the scheduler and the operator dashboard.
pub struct RobotContainer {
    vision: Arc<VisionSubsystem>,
    deadeye: Arc<DeadeyeSubsystem>,
    dashboard: Dashboard,
    scheduler: Scheduler,
}

impl RobotContainer {
    pub fn new(settings: &Settings, link: &UdpLink) -> Result<Self, AppError> {
        let vision_camera: CameraId = settings.vision.camera.parse()?;
        let vision = Arc::new(VisionSubsystem::new(
            &settings.vision,
            link.register(vision_camera)?,
        )?);
        vision.set_enabled(false);

        let deadeye_camera: CameraId = settings.deadeye.camera.parse()?;
        let deadeye = Arc::new(DeadeyeSubsystem::with_camera(
            &settings.deadeye.camera,
            link.register(deadeye_camera)?,
            PrintListener::stdout(),
        )?);

        let mut scheduler = Scheduler::new(settings.scheduler.period());
        scheduler.register_subsystem(vision.clone());
        scheduler.register_subsystem(deadeye.clone());

        let mut container = Self {
            vision,
            deadeye,
            dashboard: Dashboard::new(),
            scheduler,
        };
        container.configure_button_bindings()?;
        info!(
            "Robot container ready with cameras {} and {}",
            vision_camera, deadeye_camera
        );
        Ok(container)
    }

    fn configure_button_bindings(&mut self) -> Result<(), AppError> {
        let tab = self.dashboard.tab(DASHBOARD_TAB);

        let vision = self.vision.clone();
        let layout = tab.layout(VISION_LAYOUT, LayoutKind::Grid);
        for command in enable_commands(move |enabled| vision.set_enabled(enabled)) {
            layout.add(command)?;
        }

        let deadeye = self.deadeye.clone();
        let layout = tab.layout(DEADEYE_LAYOUT, LayoutKind::Grid);
        for command in enable_commands(move |enabled| deadeye.set_enabled(enabled)) {
            layout.add(command)?;
        }
        Ok(())
    }

    /// Presses a dashboard button. Returns whether its command ran.
    pub fn press(&self, tab: &str, layout: &str, title: &str) -> Result<bool, AppError> {
        let command = self.dashboard.press(tab, layout, title)?;
        Ok(self.scheduler.schedule(command.as_ref()))
    }

    pub fn vision(&self) -> &VisionSubsystem {
        &self.vision
    }

    pub fn deadeye(&self) -> &DeadeyeSubsystem {
        &self.deadeye
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

/// "Enable" and "Disable" buttons for a camera, usable while the robot is disabled.
fn enable_commands<F>(set_enabled: F) -> [Arc<dyn Command>; 2]
where
    F: Fn(bool) + Clone + Send + Sync + 'static,
{
    let set = set_enabled.clone();
    let enable: Arc<dyn Command> =
        Arc::new(InstantCommand::new("Enable", move || set(true)).ignoring_disable(true));
    let disable: Arc<dyn Command> =
        Arc::new(InstantCommand::new("Disable", move || set_enabled(false)).ignoring_disable(true));
    [enable, disable]
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn container() -> (UdpLink, RobotContainer) {
        let link = UdpLink::bind("127.0.0.1:0", 4).await.unwrap();
        let container = RobotContainer::new(&Settings::default(), &link).unwrap();
        (link, container)
    }

    #[tokio::test]
    async fn test_vision_starts_disabled() {
        let (_link, container) = container().await;
        assert!(!container.vision().enabled());
        assert_eq!(container.vision().camera().to_string(), "A0");
        assert_eq!(container.deadeye().camera().to_string(), "W0");
        assert_eq!(
            container.scheduler().subsystem_names(),
            vec!["VisionSubsystem", "DeadeyeSubsystem"]
        );
    }

    #[tokio::test]
    async fn test_dashboard_layout() {
        let (_link, container) = container().await;
        assert_eq!(container.dashboard().tab_names(), vec![DASHBOARD_TAB]);
        let layout = container
            .dashboard()
            .layout(DASHBOARD_TAB, VISION_LAYOUT)
            .unwrap();
        assert_eq!(layout.kind(), LayoutKind::Grid);
        assert_eq!(layout.titles(), vec!["Enable", "Disable"]);
    }

    #[tokio::test]
    async fn test_buttons_toggle_vision_while_robot_disabled() {
        let (_link, container) = container().await;
        assert!(!container.scheduler().robot_enabled());

        assert!(container.press(DASHBOARD_TAB, VISION_LAYOUT, "Enable").unwrap());
        assert!(container.vision().enabled());
        assert!(!container.deadeye().enabled());

        assert!(container.press(DASHBOARD_TAB, VISION_LAYOUT, "Disable").unwrap());
        assert!(!container.vision().enabled());
    }

    #[tokio::test]
    async fn test_buttons_toggle_deadeye() {
        let (_link, container) = container().await;
        assert!(container.press(DASHBOARD_TAB, DEADEYE_LAYOUT, "Enable").unwrap());
        assert!(container.deadeye().enabled());
        assert!(!container.vision().enabled());
    }

    #[tokio::test]
    async fn test_unknown_button() {
        let (_link, container) = container().await;
        assert!(matches!(
            container.press(DASHBOARD_TAB, VISION_LAYOUT, "Calibrate"),
            Err(AppError::Dashboard(_))
        ));
    }

    #[tokio::test]
    async fn test_same_camera_twice_is_error() {
        let link = UdpLink::bind("127.0.0.1:0", 4).await.unwrap();
        let mut settings = Settings::default();
        settings.deadeye.camera = settings.vision.camera.clone();
        assert!(matches!(
            RobotContainer::new(&settings, &link),
            Err(AppError::Deadeye(crate::error::DeadeyeError::RouteExists(_)))
        ));
    }
}
