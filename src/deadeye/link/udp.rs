use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;
use tokio::net::UdpSocket;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use crate::deadeye::link::ChannelSource;
use crate::deadeye::CameraId;
use crate::error::DeadeyeError;

const MAX_DATAGRAM_BYTES: usize = 65_507;

#[derive(Deserialize)]
struct RoutingHeader {
    id: String,
}

/// Receives target data datagrams from every camera on one UDP port and forwards each to the
/// source registered for its `id`.
pub struct UdpLink {
    socket: UdpSocket,
    routes: RwLock<HashMap<String, mpsc::Sender<Vec<u8>>>>,
    channel_capacity: usize,
}

impl UdpLink {
    pub async fn bind(address: &str, channel_capacity: usize) -> Result<Self, DeadeyeError> {
        let socket = UdpSocket::bind(address)
            .await
            .map_err(|e| DeadeyeError::Bind(e, address.to_string()))?;
        info!("Deadeye link listening on {}", address);
        Ok(Self {
            socket,
            routes: RwLock::new(HashMap::new()),
            channel_capacity,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DeadeyeError> {
        self.socket.local_addr().map_err(DeadeyeError::Receive)
    }

    /// Registers `camera` and returns the source its datagrams are forwarded to.
    pub fn register(&self, camera: CameraId) -> Result<ChannelSource, DeadeyeError> {
        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        let key = camera.to_string();
        if routes.contains_key(&key) {
            return Err(DeadeyeError::RouteExists(key));
        }
        let (tx, source) = ChannelSource::channel(self.channel_capacity);
        debug!("Registered route for camera {}", key);
        routes.insert(key, tx);
        Ok(source)
    }

    /// Forwards datagrams until shutdown. Receive errors are logged and do not stop the link.
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut buffer = vec![0u8; MAX_DATAGRAM_BYTES];
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Deadeye link received shutdown");
                    break;
                }
                result = self.socket.recv_from(&mut buffer) => match result {
                    Ok((length, peer)) => {
                        debug!("Received {} bytes from {}", length, peer);
                        self.route(&buffer[..length]);
                    }
                    Err(e) => error!("Error receiving datagram: {}", e),
                }
            }
        }
    }

    /// Returns true when the datagram was handed to a registered source.
    fn route(&self, datagram: &[u8]) -> bool {
        let header: RoutingHeader = match serde_json::from_slice(datagram) {
            Ok(header) => header,
            Err(e) => {
                warn!("Dropping datagram without a camera id: {}", e);
                return false;
            }
        };

        let sender = {
            let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
            routes.get(&header.id).cloned()
        };
        let Some(sender) = sender else {
            warn!("Dropping datagram for unknown camera {}", header.id);
            return false;
        };

        match sender.try_send(datagram.to_vec()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Dropping datagram for camera {}, client is behind", header.id);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Camera {} client closed, removing route", header.id);
                self.routes
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&header.id);
                false
            }
        }
    }
}
