use super::traits::Socket;
use log::debug;
use socket2::{Domain, Protocol, SockAddr, Type};
use std::io::{Error, ErrorKind, Read, Result};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs};
use std::time::Duration;

/// UDP socket for implicit I/O.
///
/// `open` binds the local I/O port with address reuse (so several sessions
/// on one host can share 2222) and remembers the target as the send
/// destination. Datagrams are accepted from any source port.
#[derive(Debug, Default)]
pub struct UdpSocket {
    socket: Option<socket2::Socket>,
    remote: Option<SocketAddr>,
    local_port: Option<u16>,
    timeout: Option<Duration>,
}

impl UdpSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to `local_port` instead of the target's port.
    pub fn with_local_port(local_port: u16) -> Self {
        UdpSocket { local_port: Some(local_port), ..Default::default() }
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket()?
            .local_addr()?
            .as_socket()
            .ok_or_else(|| Error::new(ErrorKind::InvalidData, "local address is not an IP address"))
    }

    fn socket(&self) -> Result<&socket2::Socket> {
        self.socket
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotConnected, "UDP socket is not open"))
    }
}

impl Socket for UdpSocket {
    fn open(&mut self, hostname: &str, port: u16) -> Result<()> {
        let remote = (hostname, port)
            .to_socket_addrs()?
            .find(|a| a.is_ipv4())
            .ok_or_else(|| {
                Error::new(ErrorKind::AddrNotAvailable, "hostname has no IPv4 address")
            })?;

        let socket = socket2::Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_reuse_address(true)?;
        socket.set_read_timeout(self.timeout)?;
        let bind = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, self.local_port.unwrap_or(port));
        socket.bind(&SockAddr::from(bind))?;
        debug!("UDP bound to {} for target {}", bind, remote);

        self.socket = Some(socket);
        self.remote = Some(remote);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.socket = None;
        self.remote = None;
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let remote = self
            .remote
            .ok_or_else(|| {
                Error::new(ErrorKind::InvalidInput, "UDP requires a destination address")
            })?;
        self.socket()?.send_to(data, &SockAddr::from(remote))
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut socket = self.socket()?;
        socket.read(buffer)
    }
}
