use thiserror::Error;
use uuid::Uuid;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Deadeye Error: {0}")]
    Deadeye(#[from] DeadeyeError),
    #[error("Dashboard Error: {0}")]
    Dashboard(String),
}

// Vision client and link errors
#[derive(Error, Debug)]
pub enum DeadeyeError {
    #[error("Invalid camera id {0:?}, expected an uppercase unit letter followed by a digit")]
    InvalidCameraId(String),
    #[error("Capture width {0} leaves no frame center")]
    InvalidCapture(u32),
    #[error("Target rect {0:?} extends past the pixel range")]
    InvalidRect([i32; 5]),
    #[error("Failed to decode target data: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to bind link to {1}: {0}")]
    Bind(std::io::Error, String),
    #[error("Failed to receive datagram: {0}")]
    Receive(std::io::Error),
    #[error("Camera {0} is already registered on this link")]
    RouteExists(String),
    #[error("Failed to send shutdown to client {0}")]
    Shutdown(Uuid),
}
