//! SSDP responder that lets Hue clients find the bridge on the local network

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tokio::net::UdpSocket;

use crate::models::DiscoveryConfig;

mod description;
pub use description::description;

pub const SSDP_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);
pub const SSDP_PORT: u16 = 1900;

/// Device UUID advertised in search responses and in the description document
pub const BRIDGE_UUID: &str = "2f402f80-da50-11e1-9b23-001788102201";

pub const SERVER_BANNER: &str = "Linux/3.14.0 UPnP/1.0 IpBridge/1.65.0";

/// Longer datagrams are truncated
const MAX_DATAGRAM: usize = 1024;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to join multicast group {group}: {source}")]
    Join {
        group: Ipv4Addr,
        source: std::io::Error,
    },
}

/// Return `true` if `message` is an SSDP search for root devices
pub fn is_search_request(message: &str) -> bool {
    message.contains("M-SEARCH") && message.contains("upnp:rootdevice")
}

/// Build the search response pointing to the description document on `host:port`
pub fn search_response(host: IpAddr, port: u16) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=100\r\n\
         EXT:\r\n\
         LOCATION: http://{host}:{port}/description.xml\r\n\
         SERVER: {server}\r\n\
         ST: upnp:rootdevice\r\n\
         USN: uuid:{uuid}::upnp:rootdevice\r\n\
         \r\n",
        host = host,
        port = port,
        server = SERVER_BANNER,
        uuid = BRIDGE_UUID,
    )
}

/// Find the address of the interface on the default route
///
/// No packet is sent: connecting a UDP socket only selects the outgoing interface.
pub async fn local_ip() -> Result<IpAddr, std::io::Error> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80)).await?;
    Ok(socket.local_addr()?.ip())
}

async fn send_reply(
    peer: SocketAddr,
    advertise: Option<IpAddr>,
    api_port: u16,
) -> Result<(), std::io::Error> {
    let host = match advertise {
        Some(address) => address,
        None => local_ip().await?,
    };

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    socket
        .send_to(search_response(host, api_port).as_bytes(), peer)
        .await?;

    Ok(())
}

async fn reply(peer: SocketAddr, advertise: Option<IpAddr>, api_port: u16) {
    match send_reply(peer, advertise, api_port).await {
        Ok(()) => trace!(peer = %peer, "sent SSDP response"),
        Err(error) => debug!(peer = %peer, error = %error, "SSDP response failed"),
    }
}

/// Listens for SSDP search requests and answers each of them
pub struct Responder {
    socket: UdpSocket,
    api_port: u16,
    advertise: Option<IpAddr>,
}

impl Responder {
    /// Bind the multicast listener described by `config`
    ///
    /// Must be called from within the tokio runtime.
    pub fn bind(config: &DiscoveryConfig, api_port: u16) -> Result<Self, DiscoveryError> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.bind(&SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), config.port).into())?;
        socket
            .join_multicast_v4(&config.group, &config.interface)
            .map_err(|source| DiscoveryError::Join {
                group: config.group,
                source,
            })?;
        socket.set_nonblocking(true)?;

        let socket = UdpSocket::from_std(socket.into())?;

        info!(
            group = %config.group,
            port = config.port,
            interface = %config.interface,
            "SSDP discovery listening"
        );

        Ok(Self::from_socket(
            socket,
            api_port,
            config.advertise_address,
        ))
    }

    pub fn from_socket(socket: UdpSocket, api_port: u16, advertise: Option<IpAddr>) -> Self {
        Self {
            socket,
            api_port,
            advertise,
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.socket.local_addr()
    }

    /// Answer search requests until the task is dropped
    pub async fn run(self) {
        let mut buffer = [0u8; MAX_DATAGRAM];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut buffer).await {
                Ok(received) => received,
                Err(error) => {
                    debug!(error = %error, "SSDP receive failed");
                    continue;
                }
            };

            let message = String::from_utf8_lossy(&buffer[..len]);
            if !is_search_request(&message) {
                continue;
            }

            trace!(peer = %peer, "SSDP search request");
            tokio::spawn(reply(peer, self.advertise, self.api_port));
        }
    }
}
