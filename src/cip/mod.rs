//! # CIP Module
//!
//! Common Industrial Protocol pieces carried inside RR-Data frames:
//! logical paths, message router request/response and the connection
//! manager's Forward Open / Forward Close exchange.

pub mod connection;
pub mod forward_close;
pub mod forward_open;
pub mod message_router;
pub mod path;

pub use connection::{Connection, ConnectionInfo};
pub use forward_close::{ForwardCloseRequest, ForwardCloseSuccess};
pub use forward_open::{
    ConnectionPriority, ConnectionType, ForwardOpenRequest, ForwardOpenSuccess,
    calc_connection_params,
};
pub use message_router::{MessageRouterRequest, MessageRouterResponse};
pub use path::{Path, SegmentType};

/// CIP service codes used by this client.
pub mod services {
    pub const GET_ATTRIBUTE_ALL: u8 = 0x01;
    pub const SET_ATTRIBUTE_ALL: u8 = 0x02;
    pub const GET_ATTRIBUTE_SINGLE: u8 = 0x0E;
    pub const SET_ATTRIBUTE_SINGLE: u8 = 0x10;
    pub const FORWARD_CLOSE: u8 = 0x4E;
    pub const LARGE_FORWARD_OPEN: u8 = 0x5B;

    /// Set in the service code of every reply.
    pub const REPLY_FLAG: u8 = 0x80;
}

/// Connection manager object, the target of Forward Open / Close.
pub const CONNECTION_MANAGER_CLASS: u8 = 0x06;
