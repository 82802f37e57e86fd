//! # Common Packet Format Module
//!
//! Typed items and the counted item list that carry every RR-Data and
//! implicit I/O payload.

pub mod item;
pub mod packet;
pub mod sequenced;

pub use item::{CpfItem, CpfItemType};
pub use packet::CpfPacket;
pub use sequenced::{SequencedAddressItem, SequencedDataItem};

mod tests;
