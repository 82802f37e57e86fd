//! # Session Module
//!
//! Client-side protocol driver for one EtherNet/IP target.
//!
//! ## Lifecycle
//!
//! 1. Build: `Session::new(control_socket, io_socket, config)`
//! 2. Register: `session.open("192.168.1.10")`
//! 3. Explicit messaging: `get_single_attribute`, `set_single_attribute`,
//!    `send_rr_data_command`
//! 4. Implicit I/O: `create_connection`, then `send_io_packet` /
//!    `receive_io_packet`, then `close_connection`
//! 5. Unregister: `session.close()` (also attempted on drop)
//!
//! A session is single-threaded: one request is in flight at a time and
//! every call blocks until the socket answers or fails.
//!
//! ## Example
//!
//! ```ignore
//! let mut session = Session::new(
//!     Box::new(TcpSocket::new()),
//!     Box::new(UdpSocket::new()),
//!     SessionConfig::default(),
//! );
//! session.open("192.168.1.10")?;
//! let serial: u32 = session.get_single_attribute(0x01, 1, 6)?;
//! session.close()?;
//! ```

pub mod ids;

pub use ids::ConnectionIdGenerator;

use crate::cip::services::{
    FORWARD_CLOSE, GET_ATTRIBUTE_SINGLE, LARGE_FORWARD_OPEN, REPLY_FLAG, SET_ATTRIBUTE_SINGLE,
};
use crate::cip::{
    CONNECTION_MANAGER_CLASS, Connection, ConnectionInfo, ForwardCloseSuccess, ForwardOpenSuccess,
    MessageRouterRequest, Path,
};
use crate::codec::{BufferReader, Deserializable, Reader, Serializable, to_bytes};
use crate::config::SessionConfig;
use crate::cpf::{CpfItemType, CpfPacket};
use crate::encap::{
    EncapCommand, EncapHeader, EncapPacket, IdentityItemData, RegisterSessionData, RrDataRequest,
    RrDataResponse,
};
use crate::error::{EipError, Result};
use crate::transport::Socket;
use log::{debug, error, info, warn};
use rand_core::{OsRng, RngCore};

pub struct Session {
    socket: Box<dyn Socket>,
    io_socket: Box<dyn Socket>,
    config: SessionConfig,
    session_handle: u32,
    ids: ConnectionIdGenerator,
    connections: Vec<Connection>,
    recv_buffer: Vec<u8>,
}

impl Session {
    /// Session whose connection ID generators are seeded from the OS RNG.
    pub fn new(
        socket: Box<dyn Socket>,
        io_socket: Box<dyn Socket>,
        config: SessionConfig,
    ) -> Self {
        Self::with_rng(socket, io_socket, config, &mut OsRng)
    }

    pub fn with_rng<R: RngCore + ?Sized>(
        socket: Box<dyn Socket>,
        io_socket: Box<dyn Socket>,
        config: SessionConfig,
        rng: &mut R,
    ) -> Self {
        let recv_buffer = vec![0u8; config.receive_buffer_size.max(EncapHeader::HEADER_LENGTH)];
        Session {
            socket,
            io_socket,
            config,
            session_handle: 0,
            ids: ConnectionIdGenerator::seeded(rng),
            connections: Vec::new(),
            recv_buffer,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handle assigned by the target; 0 while unregistered.
    pub fn session_id(&self) -> u32 {
        self.session_handle
    }

    pub fn is_registered(&self) -> bool {
        self.session_handle != 0
    }

    /// Open connections in creation order. Indices shift down when an
    /// earlier connection is closed.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    /// Open both sockets on the configured ports and register a session.
    pub fn open(&mut self, hostname: &str) -> Result<()> {
        let (port, io_port) = (self.config.port, self.config.io_port);
        self.open_on(hostname, port, io_port)
    }

    /// Open both sockets and register a session. On any failure the sockets
    /// are closed again and the session stays unregistered.
    pub fn open_on(&mut self, hostname: &str, port: u16, io_port: u16) -> Result<()> {
        if self.is_registered() {
            return Err(EipError::protocol(format!(
                "session 0x{:08X} is already registered",
                self.session_handle
            )));
        }
        info!("Opening session with {}:{}", hostname, port);
        self.socket.open(hostname, port)?;
        if let Err(e) = self.io_socket.open(hostname, io_port) {
            self.close_sockets();
            return Err(e.into());
        }

        match self.register() {
            Ok(handle) => {
                self.session_handle = handle;
                info!("Registered session 0x{:08X}", handle);
                Ok(())
            }
            Err(e) => {
                error!("Session registration failed: {}", e);
                self.session_handle = 0;
                self.close_sockets();
                Err(e)
            }
        }
    }

    fn register(&mut self) -> Result<u32> {
        let data =
            RegisterSessionData::new(self.config.protocol_version, self.config.register_options);
        let req = EncapPacket::with_payload(EncapCommand::RegisterSession, 0, &data)?;
        let expected_version = self.config.protocol_version;

        let resp = self.send_command(&req)?;
        let handle = resp.header.session_handle;
        let reply: RegisterSessionData = resp.payload_as()?;

        if reply.protocol_version != expected_version {
            return Err(EipError::protocol(format!(
                "target speaks protocol version {}, this client supports only {}",
                reply.protocol_version, expected_version
            )));
        }
        if reply.options != 0 {
            warn!("RegisterSession reply has nonzero options 0x{:04X}", reply.options);
        }
        Ok(handle)
    }

    /// Unregister and close both sockets. UnregisterSession has no reply,
    /// so none is awaited.
    pub fn close(&mut self) -> Result<()> {
        let sent = if self.is_registered() {
            info!("Closing session 0x{:08X}", self.session_handle);
            let req = EncapPacket::new(EncapCommand::UnregisterSession, self.session_handle);
            self.send_packet(&req)
        } else {
            debug!("Closing unregistered session");
            Ok(())
        };
        self.close_sockets();
        self.session_handle = 0;
        sent
    }

    fn close_sockets(&mut self) {
        if let Err(e) = self.socket.close() {
            warn!("Error closing control socket: {}", e);
        }
        if let Err(e) = self.io_socket.close() {
            warn!("Error closing I/O socket: {}", e);
        }
    }

    fn send_packet(&mut self, packet: &EncapPacket<'_>) -> Result<()> {
        let bytes = to_bytes(packet)?;
        #[cfg(feature = "packet-dump")]
        log::trace!("TX {}", crate::logging::hex_dump(&bytes));
        self.socket.send(&bytes)?;
        Ok(())
    }

    /// Read one whole encapsulation frame into the receive buffer. TCP may
    /// deliver it in pieces, so keep reading until the header's length is
    /// satisfied.
    fn receive_frame(&mut self) -> Result<usize> {
        let mut filled = 0;
        loop {
            if filled == self.recv_buffer.len() {
                return Err(EipError::length(format!(
                    "reply exceeds the {} byte receive buffer",
                    self.recv_buffer.len()
                )));
            }
            let n = self.socket.receive(&mut self.recv_buffer[filled..])?;
            if n == 0 {
                return Err(EipError::protocol("target closed the connection mid-frame"));
            }
            filled += n;
            if filled >= EncapHeader::HEADER_LENGTH {
                let length = u16::from_le_bytes([self.recv_buffer[2], self.recv_buffer[3]]);
                let total = EncapHeader::HEADER_LENGTH + usize::from(length);
                if total > self.recv_buffer.len() {
                    return Err(EipError::length(format!(
                        "reply of {} bytes exceeds the {} byte receive buffer",
                        total,
                        self.recv_buffer.len()
                    )));
                }
                if filled >= total {
                    return Ok(filled);
                }
            }
        }
    }

    /// Send `req` and return the validated reply, which borrows the
    /// session's receive buffer.
    pub fn send_command(&mut self, req: &EncapPacket<'_>) -> Result<EncapPacket<'_>> {
        debug!(
            "Sending {:?} with {} payload bytes",
            req.header.command,
            req.payload_bytes().len()
        );
        self.send_packet(req)?;
        let received = self.receive_frame()?;
        let expected_handle = self.session_handle;

        let frame = &self.recv_buffer[..received];
        #[cfg(feature = "packet-dump")]
        log::trace!("RX {}", crate::logging::hex_dump(frame));
        let mut reader = BufferReader::new(frame);
        let resp = EncapPacket::deserialize_sized(&mut reader, received)?;
        check_packet(&req.header, &resp.header, expected_handle)?;
        Ok(resp)
    }

    /// Issue an explicit CIP request through SendRRData and return the
    /// message router reply. A nonzero general status is an error.
    pub fn send_rr_data_command(
        &mut self,
        service: u8,
        path: &Path,
        data: Option<&dyn Serializable>,
    ) -> Result<RrDataResponse<'static>> {
        let mut rr = RrDataRequest::new(MessageRouterRequest::new(service, path.clone(), data));
        rr.timeout = self.config.rr_data_timeout;
        let req = EncapPacket::with_payload(EncapCommand::SendRrData, self.session_handle, &rr)?;

        let resp = self.send_command(&req)?;
        let rr_resp: RrDataResponse<'_> = resp.payload_as()?;
        let rr_resp = rr_resp.into_owned();

        let mr = &rr_resp.response;
        if mr.service != service | REPLY_FLAG {
            warn!(
                "Reply service 0x{:02X} does not match request service 0x{:02X}",
                mr.service, service
            );
        }
        if !mr.is_success() {
            error!(
                "Service 0x{:02X} failed with general status 0x{:02X}, additional status {:02X?}",
                service,
                mr.general_status,
                mr.additional_status()
            );
            mr.check_status()?;
        }
        Ok(rr_resp)
    }

    /// Get_Attribute_Single on class/instance/attribute, decoded as `T`.
    pub fn get_single_attribute<T>(
        &mut self,
        class_id: u8,
        instance_id: u8,
        attribute_id: u8,
    ) -> Result<T>
    where
        T: for<'x> Deserializable<'x>,
    {
        let path = Path::attribute(class_id, instance_id, attribute_id);
        let resp = self.send_rr_data_command(GET_ATTRIBUTE_SINGLE, &path, None)?;
        resp.response.data_as()
    }

    /// Set_Attribute_Single on class/instance/attribute with the encoding of
    /// `value`.
    pub fn set_single_attribute(
        &mut self,
        class_id: u8,
        instance_id: u8,
        attribute_id: u8,
        value: &dyn Serializable,
    ) -> Result<()> {
        let path = Path::attribute(class_id, instance_id, attribute_id);
        self.send_rr_data_command(SET_ATTRIBUTE_SINGLE, &path, Some(value))?;
        Ok(())
    }

    /// Establish an I/O connection with Large Forward Open and return its
    /// index in [`Session::connections`].
    pub fn create_connection(
        &mut self,
        o_to_t: ConnectionInfo,
        t_to_o: ConnectionInfo,
    ) -> Result<usize> {
        let mut conn = Connection::with_policy(o_to_t, t_to_o, self.config.connection.clone());
        conn.originator_vendor_id = self.config.vendor_id;
        conn.originator_sn = self.config.serial_number;
        conn.connection_sn = self.ids.next_connection_sn();
        conn.o_to_t_connection_id = self.ids.next_connection_id();
        conn.t_to_o_connection_id = self.ids.next_connection_id();
        info!(
            "Opening connection 0x{:04X} (O->T assembly {}, T->O assembly {})",
            conn.connection_sn, o_to_t.assembly_id, t_to_o.assembly_id
        );

        let req = conn.create_forward_open_request();
        let path = Path::instance(CONNECTION_MANAGER_CLASS, 1);
        let resp =
            self.send_rr_data_command(LARGE_FORWARD_OPEN, &path, Some(&req as &dyn Serializable))?;
        let result: ForwardOpenSuccess<'_> = resp.response.data_as()?;

        if !conn.verify_forward_open_result(&result) {
            return Err(EipError::protocol(format!(
                "Forward Open reply does not answer connection 0x{:04X}",
                conn.connection_sn
            )));
        }
        self.connections.push(conn);
        Ok(self.connections.len() - 1)
    }

    /// Tear down the connection at `index` with Forward Close and drop it
    /// from the list. Later connections move down one index.
    pub fn close_connection(&mut self, index: usize) -> Result<()> {
        let conn = self.connections.get(index).ok_or(EipError::NoSuchConnection(index))?;
        info!("Closing connection 0x{:04X}", conn.connection_sn);
        let req = conn.create_forward_close_request();
        let path = Path::instance(CONNECTION_MANAGER_CLASS, 1);

        let resp =
            self.send_rr_data_command(FORWARD_CLOSE, &path, Some(&req as &dyn Serializable))?;
        let result: ForwardCloseSuccess<'_> = resp.response.data_as()?;
        if !self.connections[index].verify_forward_close_result(&result) {
            return Err(EipError::protocol(format!(
                "Forward Close reply does not answer connection 0x{:04X}",
                self.connections[index].connection_sn
            )));
        }
        self.connections.remove(index);
        Ok(())
    }

    /// Receive one implicit I/O datagram. Sequence numbers are left to the
    /// caller.
    pub fn receive_io_packet(&mut self) -> Result<CpfPacket<'static>> {
        let n = self.io_socket.receive(&mut self.recv_buffer)?;
        let mut reader = BufferReader::new(&self.recv_buffer[..n]);
        let packet = CpfPacket::deserialize(&mut reader)?;
        if reader.position() != n {
            warn!("I/O datagram of {} bytes has {} trailing bytes", n, n - reader.position());
        }
        Ok(packet.into_owned())
    }

    pub fn send_io_packet(&mut self, packet: &CpfPacket<'_>) -> Result<()> {
        self.io_socket.send_serializable(packet)?;
        Ok(())
    }

    /// ListIdentity over the control socket; one entry per identity item in
    /// the reply. Works with or without a registered session.
    pub fn list_identity(&mut self) -> Result<Vec<IdentityItemData>> {
        let req = EncapPacket::new(EncapCommand::ListIdentity, self.session_handle);
        let resp = self.send_command(&req)?;
        let packet: CpfPacket<'_> = resp.payload_as()?;
        packet
            .items
            .iter()
            .filter(|item| item.item_type == CpfItemType::ListIdentityResponse)
            .map(|item| item.data_as::<IdentityItemData>())
            .collect()
    }
}

/// Validate a reply header against the request it answers.
fn check_packet(req: &EncapHeader, resp: &EncapHeader, session_handle: u32) -> Result<()> {
    if resp.command != req.command {
        return Err(EipError::protocol(format!(
            "reply command {:?} does not match request {:?}",
            resp.command, req.command
        )));
    }

    if session_handle == 0 && req.command == EncapCommand::RegisterSession {
        if resp.session_handle == 0 {
            return Err(EipError::protocol("registration reply carries a zero session handle"));
        }
    } else if resp.session_handle != session_handle {
        return Err(EipError::protocol(format!(
            "reply session handle 0x{:08X} does not match 0x{:08X}",
            resp.session_handle, session_handle
        )));
    }

    if resp.status != 0 {
        warn!("Reply header has nonzero status 0x{:08X}", resp.status);
    }
    if resp.context != [0u8; 8] {
        warn!("Reply header has nonzero sender context {:02X?}", resp.context);
    }
    if resp.options != 0 {
        warn!("Reply header has nonzero options 0x{:08X}", resp.options);
    }
    Ok(())
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.is_registered() {
            debug!("Session 0x{:08X} dropped while registered", self.session_handle);
            if let Err(e) = self.close() {
                warn!("Error closing session on drop: {}", e);
            }
        }
    }
}
