pub mod source;
pub mod udp;

pub use source::{ChannelSource, TargetDataSource};
pub use udp::UdpLink;
