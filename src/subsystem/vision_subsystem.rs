use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::VisionSettings;
use crate::deadeye::link::TargetDataSource;
use crate::deadeye::{CameraId, Deadeye, TargetDataListener};
use crate::error::{AppError, DeadeyeError};
use crate::subsystem::metrics::{Meter, Throttle};
use crate::subsystem::Subsystem;
use crate::target::{HubGeometry, HubTargetData};

/// Listener state for the hub camera: frame rate, throttled target logging and the latest data.
pub struct HubTargetTracker {
    camera: CameraId,
    geometry: HubGeometry,
    fps_meter: Meter,
    target_log: Throttle,
    latest: RwLock<Option<HubTargetData>>,
}

impl HubTargetTracker {
    fn new(camera: CameraId, geometry: HubGeometry, target_log_interval: Duration) -> Self {
        Self {
            camera,
            geometry,
            fps_meter: Meter::new(),
            target_log: Throttle::new(target_log_interval),
            latest: RwLock::new(None),
        }
    }

    pub fn latest(&self) -> Option<HubTargetData> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fps_meter(&self) -> &Meter {
        &self.fps_meter
    }
}

impl TargetDataListener<HubTargetData> for HubTargetTracker {
    fn on_target_data(&self, data: HubTargetData) {
        if self.target_log.advance_if_elapsed() {
            for (index, rect) in data.targets.iter().enumerate() {
                debug!("{} {} = {}", self.camera, index, rect);
            }
            if let Some(error_radians) = data.error_radians(&self.geometry) {
                debug!("{} error = {:.4} rad", self.camera, error_radians);
            }
        }
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(data);
        self.fps_meter.mark();
    }
}

/// Tracks the hub with a Deadeye camera.
pub struct VisionSubsystem {
    deadeye: Deadeye<HubTargetData>,
    tracker: Arc<HubTargetTracker>,
    fps_log: Throttle,
}

impl VisionSubsystem {
    pub fn new<S>(settings: &VisionSettings, source: S) -> Result<Self, AppError>
    where
        S: TargetDataSource + 'static,
    {
        let camera: CameraId = settings.camera.parse()?;
        let geometry = HubGeometry::from_capture(&settings.capture)?;
        let fps_log = Throttle::new(settings.fps_log_interval()?);
        let tracker = Arc::new(HubTargetTracker::new(
            camera,
            geometry,
            settings.target_log_interval()?,
        ));
        let listener = {
            let tracker = tracker.clone();
            move |data: HubTargetData| tracker.on_target_data(data)
        };
        let deadeye = Deadeye::builder(settings.camera.as_str())
            .capture(settings.capture)
            .listener(listener)
            .build(source)?;

        Ok(Self {
            deadeye,
            tracker,
            fps_log,
        })
    }

    pub fn enabled(&self) -> bool {
        self.deadeye.enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.deadeye.set_enabled(enabled);
    }

    pub fn camera(&self) -> CameraId {
        self.deadeye.id()
    }

    pub fn geometry(&self) -> HubGeometry {
        self.tracker.geometry
    }

    /// Most recent target data, if any has arrived.
    pub fn latest(&self) -> Option<HubTargetData> {
        self.tracker.latest()
    }

    pub fn tracker(&self) -> &HubTargetTracker {
        &self.tracker
    }
}

impl Subsystem for VisionSubsystem {
    fn name(&self) -> &str {
        "VisionSubsystem"
    }

    fn periodic(&self) {
        if self.fps_log.advance_if_elapsed() {
            info!(
                "{} mean FPS = {:.1}",
                self.deadeye.id(),
                self.tracker.fps_meter.mean_rate()
            );
        }
    }
}
