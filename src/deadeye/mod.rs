//! Client side of the Deadeye vision coprocessor.
//!
//! Cameras publish target data as JSON datagrams. A [`UdpLink`](link::UdpLink) receives them
//! and routes each by camera id to the [`Deadeye`] client bound to that camera, which decodes
//! the datagram into its target data type and hands it to the registered listener.

mod camera;
mod client;
pub mod link;
mod listener;

pub use camera::{CameraId, Capture};
pub use client::{ClientStats, Deadeye, DeadeyeBuilder};
pub use listener::{PrintListener, TargetDataListener, WriterListener};
