pub mod cip;
pub mod codec;
pub mod config;
pub mod cpf;
pub mod encap;
pub mod error;
pub mod logging;
pub mod session;
pub mod transport;

pub use transport::{MockSocket, Socket, TcpSocket, UdpSocket};
pub use codec::{Deserializable, Payload, Serializable};

pub use cip::{Connection, ConnectionInfo, Path};
pub use config::{ConnectionPolicy, SessionConfig};
pub use error::{EipError, Result};
pub use session::Session;
