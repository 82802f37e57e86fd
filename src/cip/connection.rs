use super::forward_close::{ForwardCloseRequest, ForwardCloseSuccess};
use super::forward_open::{ForwardOpenRequest, ForwardOpenSuccess};
use super::path::Path;
use crate::config::ConnectionPolicy;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Assembly object class addressed by I/O connection paths.
pub const ASSEMBLY_CLASS: u8 = 0x04;

/// One direction of an I/O connection as requested by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Assembly instance used as the connection point.
    pub assembly_id: u8,
    /// Connection size in bytes.
    pub buffer_size: u16,
    /// Requested packet interval in microseconds.
    pub rpi: u32,
}

impl ConnectionInfo {
    pub fn new(assembly_id: u8, buffer_size: u16, rpi: u32) -> Self {
        ConnectionInfo { assembly_id, buffer_size, rpi }
    }
}

/// State of one CIP I/O connection between this originator and a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub timeout_tick_size: u8,
    pub timeout_ticks: u8,
    pub timeout_multiplier: u8,
    pub o_to_t_connection_id: u32,
    pub t_to_o_connection_id: u32,
    pub connection_sn: u16,
    pub originator_vendor_id: u16,
    pub originator_sn: u32,
    pub o_to_t_rpi: u32,
    pub t_to_o_rpi: u32,
    pub o_to_t_buffer_size: u16,
    pub t_to_o_buffer_size: u16,
    /// Actual packet intervals granted by the target, in microseconds.
    pub o_to_t_api: u32,
    pub t_to_o_api: u32,
    pub policy: ConnectionPolicy,
    path: Path,
}

impl Connection {
    pub fn new(o_to_t: ConnectionInfo, t_to_o: ConnectionInfo) -> Self {
        Self::with_policy(o_to_t, t_to_o, ConnectionPolicy::default())
    }

    pub fn with_policy(
        o_to_t: ConnectionInfo,
        t_to_o: ConnectionInfo,
        policy: ConnectionPolicy,
    ) -> Self {
        let mut path = Path::instance(ASSEMBLY_CLASS, 1);
        path.add_logical_connection_point(o_to_t.assembly_id)
            .add_logical_connection_point(t_to_o.assembly_id);

        Connection {
            timeout_tick_size: policy.timeout_tick_size,
            timeout_ticks: policy.timeout_ticks,
            timeout_multiplier: policy.timeout_multiplier,
            o_to_t_connection_id: 0,
            t_to_o_connection_id: 0,
            connection_sn: 0,
            originator_vendor_id: 0,
            originator_sn: 0,
            o_to_t_rpi: o_to_t.rpi,
            t_to_o_rpi: t_to_o.rpi,
            o_to_t_buffer_size: o_to_t.buffer_size,
            t_to_o_buffer_size: t_to_o.buffer_size,
            o_to_t_api: 0,
            t_to_o_api: 0,
            policy,
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn create_forward_open_request(&self) -> ForwardOpenRequest {
        let policy = &self.policy;
        let mut req = ForwardOpenRequest {
            timeout_tick_size: self.timeout_tick_size,
            timeout_ticks: self.timeout_ticks,
            o_to_t_connection_id: self.o_to_t_connection_id,
            t_to_o_connection_id: self.t_to_o_connection_id,
            connection_sn: self.connection_sn,
            originator_vendor_id: self.originator_vendor_id,
            originator_sn: self.originator_sn,
            timeout_multiplier: self.timeout_multiplier,
            o_to_t_rpi: self.o_to_t_rpi,
            t_to_o_rpi: self.t_to_o_rpi,
            conn_type: policy.transport_trigger,
            path: self.path.clone(),
            ..Default::default()
        };
        req.set_o_to_t_params(
            self.o_to_t_buffer_size,
            policy.o_to_t_variable,
            policy.priority,
            policy.connection_type,
            policy.shared,
        );
        req.set_t_to_o_params(
            self.t_to_o_buffer_size,
            policy.t_to_o_variable,
            policy.priority,
            policy.connection_type,
            policy.shared,
        );
        req
    }

    pub fn create_forward_close_request(&self) -> ForwardCloseRequest {
        ForwardCloseRequest {
            timeout_tick_size: self.timeout_tick_size,
            timeout_ticks: self.timeout_ticks,
            connection_sn: self.connection_sn,
            originator_vendor_id: self.originator_vendor_id,
            originator_sn: self.originator_sn,
            path: self.path.clone(),
        }
    }

    fn correlates(&self, connection_sn: u16, vendor_id: u16, originator_sn: u32) -> bool {
        if connection_sn != self.connection_sn {
            warn!(
                "Connection SN mismatch: expected 0x{:04X}, got 0x{:04X}",
                self.connection_sn, connection_sn
            );
            return false;
        }
        if vendor_id != self.originator_vendor_id {
            warn!(
                "Originator vendor ID mismatch: expected 0x{:04X}, got 0x{:04X}",
                self.originator_vendor_id, vendor_id
            );
            return false;
        }
        if originator_sn != self.originator_sn {
            warn!(
                "Originator SN mismatch: expected 0x{:08X}, got 0x{:08X}",
                self.originator_sn, originator_sn
            );
            return false;
        }
        true
    }

    /// Check that `result` answers our Forward Open and take over the
    /// connection IDs and packet intervals the target granted.
    pub fn verify_forward_open_result(&mut self, result: &ForwardOpenSuccess<'_>) -> bool {
        if !self.correlates(
            result.connection_sn,
            result.originator_vendor_id,
            result.originator_sn,
        ) {
            return false;
        }

        if result.o_to_t_connection_id != self.o_to_t_connection_id {
            info!(
                "Target assigned O->T connection ID 0x{:08X} (proposed 0x{:08X})",
                result.o_to_t_connection_id, self.o_to_t_connection_id
            );
            self.o_to_t_connection_id = result.o_to_t_connection_id;
        }
        if result.t_to_o_connection_id != self.t_to_o_connection_id {
            info!(
                "Target assigned T->O connection ID 0x{:08X} (proposed 0x{:08X})",
                result.t_to_o_connection_id, self.t_to_o_connection_id
            );
            self.t_to_o_connection_id = result.t_to_o_connection_id;
        }
        self.o_to_t_api = result.o_to_t_api;
        self.t_to_o_api = result.t_to_o_api;
        debug!(
            "Connection 0x{:04X} open: O->T API {} us, T->O API {} us",
            self.connection_sn, self.o_to_t_api, self.t_to_o_api
        );
        true
    }

    pub fn verify_forward_close_result(&self, result: &ForwardCloseSuccess<'_>) -> bool {
        self.correlates(result.connection_sn, result.originator_vendor_id, result.originator_sn)
    }
}
