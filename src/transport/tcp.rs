use super::traits::Socket;
use log::debug;
use std::io::{Error, ErrorKind, Read, Result, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// TCP client socket for explicit messaging.
#[derive(Debug, Default)]
pub struct TcpSocket {
    stream: Option<TcpStream>,
    timeout: Option<Duration>,
}

impl TcpSocket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Socket whose reads and writes fail after `timeout` instead of blocking.
    pub fn with_timeout(timeout: Duration) -> Self {
        TcpSocket { stream: None, timeout: Some(timeout) }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Get peer address
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.stream()?.peer_addr()
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.stream()?.local_addr()
    }

    fn stream(&self) -> Result<&TcpStream> {
        self.stream
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotConnected, "TCP socket is not open"))
    }
}

impl Socket for TcpSocket {
    fn open(&mut self, hostname: &str, port: u16) -> Result<()> {
        let mut last_err =
            Error::new(ErrorKind::AddrNotAvailable, "hostname resolved to no address");
        for addr in (hostname, port).to_socket_addrs()? {
            let attempt = match self.timeout {
                Some(t) => TcpStream::connect_timeout(&addr, t),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    stream.set_nodelay(true)?;
                    stream.set_read_timeout(self.timeout)?;
                    stream.set_write_timeout(self.timeout)?;
                    debug!("TCP connected to {}", addr);
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            match stream.shutdown(Shutdown::Both) {
                Ok(()) => {}
                // peer already gone
                Err(e) if e.kind() == ErrorKind::NotConnected => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn send(&mut self, data: &[u8]) -> Result<usize> {
        let mut stream = self.stream()?;
        stream.write_all(data)?;
        Ok(data.len())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut stream = self.stream()?;
        stream.read(buffer)
    }
}
