use crate::codec::{Serializable, to_bytes};
use crate::error::Result;

/// Byte transport the session drives.
/// Object safe, so the session can hold TCP, UDP or mock sockets alike.
///
/// Timeouts belong to the implementation; a blocking `receive` blocks the
/// calling session operation.
pub trait Socket: Send {
    /// Resolve `hostname` and connect (TCP) or set the peer (UDP).
    fn open(&mut self, hostname: &str, port: u16) -> std::io::Result<()>;

    fn close(&mut self) -> std::io::Result<()>;

    /// Returns the number of bytes written.
    fn send(&mut self, data: &[u8]) -> std::io::Result<usize>;

    /// Returns the number of bytes read into `buffer`.
    fn receive(&mut self, buffer: &mut [u8]) -> std::io::Result<usize>;

    /// Serialize into a scratch buffer sized to `length()` and send it.
    fn send_serializable(&mut self, value: &dyn Serializable) -> Result<usize> {
        let bytes = to_bytes(value)?;
        Ok(self.send(&bytes)?)
    }
}
