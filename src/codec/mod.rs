//! # Wire Codec Module
//!
//! Byte cursors and the serialization contract shared by every
//! EtherNet/IP entity in this crate.
//!
//! ## Key Types
//!
//! - [`Reader`] / [`Writer`] - bounds-checked byte cursors
//! - [`BufferReader`] / [`BufferWriter`] - cursors over a fixed slice
//! - [`StreamReader`] / [`StreamWriter`] - cursors over `std::io` streams
//! - [`Serializable`] / [`Deserializable`] - the entity contract
//! - [`Payload`] - owned bytes or a zero-copy view into a receive buffer
//!
//! All integers are little-endian on the wire.
//!
//! ## Example
//!
//! ```ignore
//! use enip_session::codec::{to_bytes, BufferReader, Deserializable};
//!
//! let bytes = to_bytes(&0xDEADBEEFu32)?;
//! let value = u32::deserialize(&mut BufferReader::new(&bytes))?;
//! ```

pub mod io;
pub mod payload;
pub mod primitives;
pub mod traits;

pub use io::{
    BufferReader, BufferWriter, ReadExt, Reader, StreamReader, StreamWriter, WriteExt, Writer,
};
pub use payload::Payload;
pub use primitives::Primitive;
pub use traits::{Deserializable, Serializable, to_bytes};
