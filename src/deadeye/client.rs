use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::deadeye::link::TargetDataSource;
use crate::deadeye::{CameraId, Capture, TargetDataListener};
use crate::error::DeadeyeError;
use crate::target::TargetData;

const DEFAULT_PUBLISH_CAPACITY: usize = 16;

type SharedListener<T> = Arc<RwLock<Option<Arc<dyn TargetDataListener<T>>>>>;

/// Counters kept by a client's receive task.
#[derive(Debug, Default)]
pub struct ClientStats {
    received: AtomicU64,
    dispatched: AtomicU64,
    dropped_disabled: AtomicU64,
    decode_errors: AtomicU64,
    id_mismatches: AtomicU64,
}

impl ClientStats {
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn dropped_disabled(&self) -> u64 {
        self.dropped_disabled.load(Ordering::Relaxed)
    }

    pub fn decode_errors(&self) -> u64 {
        self.decode_errors.load(Ordering::Relaxed)
    }

    pub fn id_mismatches(&self) -> u64 {
        self.id_mismatches.load(Ordering::Relaxed)
    }
}

/// Client for one Deadeye camera, decoding its datagrams as `T`.
///
/// Building a client spawns its receive task, so it must happen inside a Tokio runtime.
/// The task stops on [`Deadeye::close`], when the client is dropped, or when its source closes.
pub struct Deadeye<T: TargetData> {
    id: CameraId,
    instance_id: Uuid,
    capture: Capture,
    enabled_tx: watch::Sender<bool>,
    listener: SharedListener<T>,
    publish_tx: broadcast::Sender<T>,
    shutdown_tx: broadcast::Sender<()>,
    stats: Arc<ClientStats>,
    task: JoinHandle<()>,
}

impl<T: TargetData> Deadeye<T> {
    pub fn builder(id: impl Into<String>) -> DeadeyeBuilder<T> {
        DeadeyeBuilder::new(id.into())
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn capture(&self) -> Capture {
        self.capture
    }

    pub fn enabled(&self) -> bool {
        *self.enabled_tx.borrow()
    }

    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.enabled_tx.send_replace(enabled);
        if previous != enabled {
            info!(
                "Camera {} {}",
                self.id,
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }

    pub fn set_target_data_listener<L>(&self, listener: L)
    where
        L: TargetDataListener<T> + 'static,
    {
        let mut slot = self.listener.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(listener));
    }

    pub fn clear_target_data_listener(&self) {
        let mut slot = self.listener.write().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Every value handed to the listener is also published here.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.publish_tx.subscribe()
    }

    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn close(&self) -> Result<(), DeadeyeError> {
        match self.shutdown_tx.send(()) {
            Ok(_) => Ok(()),
            Err(_) => {
                debug!("Receive task for client {:?} already stopped", self.instance_id);
                Err(DeadeyeError::Shutdown(self.instance_id))
            }
        }
    }
}

impl<T: TargetData> Drop for Deadeye<T> {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
    }
}

pub struct DeadeyeBuilder<T: TargetData> {
    id: String,
    capture: Capture,
    enabled: bool,
    listener: Option<Arc<dyn TargetDataListener<T>>>,
    publish_capacity: usize,
}

impl<T: TargetData> DeadeyeBuilder<T> {
    fn new(id: String) -> Self {
        Self {
            id,
            capture: Capture::default(),
            enabled: false,
            listener: None,
            publish_capacity: DEFAULT_PUBLISH_CAPACITY,
        }
    }

    pub fn capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: TargetDataListener<T> + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    pub fn publish_capacity(mut self, publish_capacity: usize) -> Self {
        self.publish_capacity = publish_capacity;
        self
    }

    pub fn build<S>(self, source: S) -> Result<Deadeye<T>, DeadeyeError>
    where
        S: TargetDataSource + 'static,
    {
        let id: CameraId = self.id.parse()?;
        let instance_id = Uuid::new_v4();
        let (enabled_tx, enabled_rx) = watch::channel(self.enabled);
        let (publish_tx, _) = broadcast::channel(self.publish_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let listener: SharedListener<T> = Arc::new(RwLock::new(self.listener));
        let stats = Arc::new(ClientStats::default());

        let receiver = ReceiveTask {
            id,
            instance_id,
            source: Box::new(source),
            enabled_rx,
            listener: listener.clone(),
            publish_tx: publish_tx.clone(),
            stats: stats.clone(),
        };
        let task = tokio::spawn(receiver.run(shutdown_rx));
        info!(
            "Deadeye client {:?} bound to camera {} at {}",
            instance_id,
            id,
            id.control_path()
        );

        Ok(Deadeye {
            id,
            instance_id,
            capture: self.capture,
            enabled_tx,
            listener,
            publish_tx,
            shutdown_tx,
            stats,
            task,
        })
    }
}

struct ReceiveTask<T: TargetData> {
    id: CameraId,
    instance_id: Uuid,
    source: Box<dyn TargetDataSource>,
    enabled_rx: watch::Receiver<bool>,
    listener: SharedListener<T>,
    publish_tx: broadcast::Sender<T>,
    stats: Arc<ClientStats>,
}

impl<T: TargetData> ReceiveTask<T> {
    async fn run(mut self, mut shutdown_rx: broadcast::Receiver<()>) {
        debug!("Receive task for client {:?} started", self.instance_id);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Receive task for client {:?} received shutdown", self.instance_id);
                    break;
                }
                datagram = self.source.recv() => {
                    match datagram {
                        Some(datagram) => self.handle_datagram(&datagram),
                        None => {
                            error!("Target data source for camera {} closed", self.id);
                            break;
                        }
                    }
                }
            }
        }
        debug!("Receive task for client {:?} finished", self.instance_id);
    }

    fn handle_datagram(&self, datagram: &[u8]) {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        if !*self.enabled_rx.borrow() {
            debug!("Camera {} disabled, dropping datagram", self.id);
            self.stats.dropped_disabled.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let data = match T::from_json(datagram) {
            Ok(data) => data,
            Err(e) => {
                warn!("Camera {}: {}", self.id, e);
                self.stats.decode_errors.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };

        if data.id() != self.id.to_string() {
            warn!(
                "Camera {} received target data for camera {}, skipping",
                self.id,
                data.id()
            );
            self.stats.id_mismatches.fetch_add(1, Ordering::Relaxed);
            return;
        }

        debug!("Camera {} target data serial {}", self.id, data.serial());
        let _ = self.publish_tx.send(data.clone());

        let listener = self
            .listener
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(listener) = listener {
            listener.on_target_data(data);
        }
        self.stats.dispatched.fetch_add(1, Ordering::Relaxed);
    }
}
