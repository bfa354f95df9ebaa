use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Mutex;

use tracing::warn;

/// Receives target data decoded by a [`Deadeye`](crate::deadeye::Deadeye) client.
///
/// Called on the client's receive task, once per accepted datagram.
pub trait TargetDataListener<T>: Send + Sync {
    fn on_target_data(&self, data: T);
}

impl<T, F> TargetDataListener<T> for F
where
    F: Fn(T) + Send + Sync,
{
    fn on_target_data(&self, data: T) {
        self(data)
    }
}

/// Writes each target data value's `Display` form as one line.
pub struct WriterListener<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterListener<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<T: Display, W: Write + Send> TargetDataListener<T> for WriterListener<W> {
    fn on_target_data(&self, data: T) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(writer, "{data}") {
            warn!("Failed to write target data: {}", e);
        }
    }
}

pub type PrintListener = WriterListener<io::Stdout>;

impl PrintListener {
    pub fn stdout() -> Self {
        WriterListener::new(io::stdout())
    }
}
