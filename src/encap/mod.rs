//! # Encapsulation Module
//!
//! The outermost EtherNet/IP framing: the 24-byte header, the packet that
//! pairs it with a payload, and the payloads of the commands this client
//! issues.
//!
//! ## Key Types
//!
//! - [`EncapHeader`] / [`EncapCommand`] - header and command codes
//! - [`EncapPacket`] - header plus payload
//! - [`RegisterSessionData`] - RegisterSession payload
//! - [`RrDataRequest`] / [`RrDataResponse`] - SendRRData payloads
//! - [`IdentityItemData`] - ListIdentity reply item

pub mod header;
pub mod identity;
pub mod packet;
pub mod register_session;
pub mod rr_data;

pub use header::{EncapCommand, EncapHeader};
pub use identity::IdentityItemData;
pub use packet::EncapPacket;
pub use register_session::{EIP_PROTOCOL_VERSION, RegisterSessionData};
pub use rr_data::{RrDataRequest, RrDataResponse};

mod tests;
