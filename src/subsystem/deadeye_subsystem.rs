use uuid::Uuid;

use crate::deadeye::link::TargetDataSource;
use crate::deadeye::{CameraId, Deadeye, PrintListener, TargetDataListener};
use crate::error::DeadeyeError;
use crate::subsystem::Subsystem;
use crate::target::TargetListTargetData;

pub const DEADEYE_CAMERA: &str = "W0";

/// Owns one target-list Deadeye client and prints every target it reports.
pub struct DeadeyeSubsystem {
    deadeye: Deadeye<TargetListTargetData>,
}

impl DeadeyeSubsystem {
    pub fn new<S>(source: S) -> Result<Self, DeadeyeError>
    where
        S: TargetDataSource + 'static,
    {
        Self::with_camera(DEADEYE_CAMERA, source, PrintListener::stdout())
    }

    pub fn with_camera<S, L>(camera: &str, source: S, listener: L) -> Result<Self, DeadeyeError>
    where
        S: TargetDataSource + 'static,
        L: TargetDataListener<TargetListTargetData> + 'static,
    {
        let deadeye = Deadeye::builder(camera).listener(listener).build(source)?;
        Ok(Self { deadeye })
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.deadeye.set_enabled(enabled);
    }

    pub fn enabled(&self) -> bool {
        self.deadeye.enabled()
    }

    pub fn camera(&self) -> CameraId {
        self.deadeye.id()
    }

    pub fn client_id(&self) -> Uuid {
        self.deadeye.instance_id()
    }
}

impl Subsystem for DeadeyeSubsystem {
    fn name(&self) -> &str {
        "DeadeyeSubsystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deadeye::link::ChannelSource;
    use crate::deadeye::WriterListener;
    use crate::target::TargetData;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_binds_one_client_to_w0() {
        let (_tx, source) = ChannelSource::channel(1);
        let subsystem = DeadeyeSubsystem::new(source).unwrap();
        assert_eq!(subsystem.camera().to_string(), DEADEYE_CAMERA);
        assert_eq!(subsystem.client_id(), subsystem.deadeye.instance_id());
        assert_eq!(subsystem.name(), "DeadeyeSubsystem");
    }

    #[tokio::test]
    async fn test_set_enabled_forwards_flag() {
        let (_tx, source) = ChannelSource::channel(1);
        let subsystem = DeadeyeSubsystem::new(source).unwrap();
        for flag in [true, false, false, true] {
            subsystem.set_enabled(flag);
            assert_eq!(subsystem.deadeye.enabled(), flag);
            assert_eq!(subsystem.enabled(), flag);
        }
    }

    #[tokio::test]
    async fn test_prints_target_data_unmodified() {
        let (tx, source) = ChannelSource::channel(4);
        let buffer = SharedBuffer::default();
        let subsystem = DeadeyeSubsystem::with_camera(
            DEADEYE_CAMERA,
            source,
            WriterListener::new(buffer.clone()),
        )
        .unwrap();
        subsystem.set_enabled(true);

        let payload = br#"{"id":"W0","sn":12,"v":true,"d":[[5,6,7,8,9]]}"#;
        tx.send(payload.to_vec()).await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), async {
            while subsystem.deadeye.stats().dispatched() == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        let expected = TargetListTargetData::from_json(payload).unwrap();
        assert_eq!(buffer.contents(), format!("{expected}\n"));
    }

    #[tokio::test]
    async fn test_invalid_camera_is_client_error() {
        let (_tx, source) = ChannelSource::channel(1);
        let result = DeadeyeSubsystem::with_camera("W", source, PrintListener::stdout());
        assert!(matches!(result, Err(DeadeyeError::InvalidCameraId(_))));
    }
}
