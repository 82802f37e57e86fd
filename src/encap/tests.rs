#[cfg(test)]
mod tests {
    use crate::cip::{MessageRouterRequest, MessageRouterResponse, Path};
    use crate::codec::{BufferReader, Deserializable, Payload, Serializable, to_bytes};
    use crate::cpf::{CpfItem, CpfItemType, CpfPacket};
    use crate::encap::{
        EncapCommand, EncapHeader, EncapPacket, IdentityItemData, RegisterSessionData,
        RrDataRequest, RrDataResponse,
    };
    use std::net::{Ipv4Addr, SocketAddrV4};

    /// Interface handle, timeout, then `items` as a CPF packet.
    fn rr_reply_bytes(items: Vec<CpfItem<'static>>) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 0, 0, 0];
        bytes.extend(to_bytes(&CpfPacket::with_items(items)).unwrap());
        bytes
    }

    fn mr_reply(data: &[u8]) -> CpfItem<'static> {
        let mut body = vec![0x8E, 0x00, 0x00, 0x00];
        body.extend_from_slice(data);
        CpfItem::from_payload(CpfItemType::UnconnectedMessage, Payload::from(body))
    }

    #[test]
    fn test_command_codes() {
        assert_eq!(EncapCommand::from(0x0065), EncapCommand::RegisterSession);
        assert_eq!(EncapCommand::from(0x006F), EncapCommand::SendRrData);
        assert_eq!(EncapCommand::from(0x1234), EncapCommand::Unknown(0x1234));
        assert_eq!(u16::from(EncapCommand::UnregisterSession), 0x0066);
        assert_eq!(u16::from(EncapCommand::ListIdentity), 0x0063);
    }

    #[test]
    fn test_header_round_trip() {
        let header = EncapHeader {
            command: EncapCommand::SendRrData,
            length: 0x0010,
            session_handle: 0xDEADBEEF,
            status: 0,
            context: [1, 2, 3, 4, 5, 6, 7, 8],
            options: 0,
        };
        let bytes = to_bytes(&header).unwrap();
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[..8], &[0x6F, 0x00, 0x10, 0x00, 0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(&bytes[12..20], &[1, 2, 3, 4, 5, 6, 7, 8]);

        let decoded = EncapHeader::deserialize_sized(&mut BufferReader::new(&bytes), 24).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_header_wrong_size() {
        let bytes = [0u8; 24];
        let err = EncapHeader::deserialize_sized(&mut BufferReader::new(&bytes), 20).unwrap_err();
        assert!(err.is_framing());
        let err = EncapHeader::deserialize(&mut BufferReader::new(&bytes[..23])).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_packet_length_recomputed() {
        let data = RegisterSessionData::default();
        let mut packet =
            EncapPacket::with_payload(EncapCommand::RegisterSession, 0, &data).unwrap();
        // stale length must not reach the wire
        packet.header.length = 99;
        let bytes = to_bytes(&packet).unwrap();
        assert_eq!(bytes.len(), 28);
        assert_eq!(&bytes[..4], &[0x65, 0x00, 0x04, 0x00]);
        assert_eq!(&bytes[24..], &[0x01, 0x00, 0x00, 0x00]);

        packet.clear_payload();
        assert_eq!(packet.header.length, 0);
        assert_eq!(to_bytes(&packet).unwrap().len(), 24);
    }

    #[test]
    fn test_packet_sized_decode() {
        let data = RegisterSessionData::default();
        let packet = EncapPacket::with_payload(EncapCommand::RegisterSession, 7, &data).unwrap();
        let bytes = to_bytes(&packet).unwrap();

        let decoded = EncapPacket::deserialize_sized(&mut BufferReader::new(&bytes), 28).unwrap();
        assert_eq!(decoded.header.session_handle, 7);
        assert!(decoded.payload().unwrap().is_borrowed());
        let data: RegisterSessionData = decoded.payload_as().unwrap();
        assert_eq!(data, RegisterSessionData::new(1, 0));

        let err = EncapPacket::deserialize_sized(&mut BufferReader::new(&bytes), 30).unwrap_err();
        assert!(err.is_framing());

        // header claims 4 payload bytes, only 3 present
        let err = EncapPacket::deserialize(&mut BufferReader::new(&bytes[..27])).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_packet_without_payload() {
        let packet = EncapPacket::new(EncapCommand::UnregisterSession, 0xDEADBEEF);
        assert!(packet.payload().is_none());
        assert!(packet.payload_bytes().is_empty());
        let err = packet.payload_as::<RegisterSessionData>().unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_packet_into_owned() {
        let bytes = {
            let p = EncapPacket::with_payload(EncapCommand::SendRrData, 1, &0xAABBu16).unwrap();
            to_bytes(&p).unwrap()
        };
        let owned =
            EncapPacket::deserialize(&mut BufferReader::new(&bytes)).unwrap().into_owned();
        drop(bytes);
        assert_eq!(owned.payload_bytes(), &[0xBB, 0xAA]);
    }

    #[test]
    fn test_register_session_data() {
        let data = RegisterSessionData::default();
        assert_eq!(data.protocol_version, 1);
        assert_eq!(to_bytes(&data).unwrap(), vec![0x01, 0x00, 0x00, 0x00]);

        let short = [0x01, 0x00, 0x00];
        let err = RegisterSessionData::deserialize(&mut BufferReader::new(&short)).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_rr_data_request_layout() {
        let path = Path::attribute(0x01, 0x01, 0x07);
        let mut rr = RrDataRequest::new(MessageRouterRequest::new(0x0E, path, None));
        rr.timeout = 5;
        let bytes = to_bytes(&rr).unwrap();
        assert_eq!(rr.length(), 24);
        assert_eq!(
            bytes,
            vec![
                0x00, 0x00, 0x00, 0x00, // interface handle
                0x05, 0x00, // timeout
                0x02, 0x00, // item count
                0x00, 0x00, 0x00, 0x00, // null address item
                0xB2, 0x00, 0x08, 0x00, // unconnected message item
                0x0E, 0x03, 0x20, 0x01, 0x24, 0x01, 0x30, 0x07,
            ]
        );

        let err = RrDataRequest::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_rr_data_response_decode() {
        let bytes = rr_reply_bytes(vec![CpfItem::null(), mr_reply(&[0x2A, 0x00])]);
        let resp = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap();
        assert_eq!(resp.response.service, 0x8E);
        assert!(resp.response.is_success());
        assert_eq!(resp.response.data_as::<u16>().unwrap(), 42);
        assert!(matches!(resp.response.response_data, Some(Payload::Borrowed(_))));

        // and back again
        assert_eq!(to_bytes(&resp).unwrap(), bytes);
    }

    #[test]
    fn test_rr_data_response_extra_items_tolerated() {
        let extra = CpfItem::from_payload(CpfItemType::Unknown(0x0100), Payload::from(vec![1, 2]));
        let bytes = rr_reply_bytes(vec![CpfItem::null(), mr_reply(&[]), extra]);
        let resp = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap();
        assert!(resp.response.data().is_empty());
    }

    #[test]
    fn test_rr_data_response_rejects_bad_layouts() {
        // single item
        let bytes = rr_reply_bytes(vec![CpfItem::null()]);
        let err = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_protocol());

        // address item that is not null
        let connected =
            CpfItem::from_payload(CpfItemType::ConnectionBased, Payload::from(vec![0; 4]));
        let bytes = rr_reply_bytes(vec![connected, mr_reply(&[])]);
        let err = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_protocol());

        // null item with a nonzero length
        let fat_null = CpfItem::from_payload(CpfItemType::Null, Payload::from(vec![0; 2]));
        let bytes = rr_reply_bytes(vec![fat_null, mr_reply(&[])]);
        let err = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_protocol());

        // data item of the wrong type
        let wrong = CpfItem::from_payload(
            CpfItemType::ConnectedTransportPacket,
            Payload::from(vec![0x8E, 0, 0, 0]),
        );
        let bytes = rr_reply_bytes(vec![CpfItem::null(), wrong]);
        let err = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_protocol());

        // data item too short for a message router reply
        let short =
            CpfItem::from_payload(CpfItemType::UnconnectedMessage, Payload::from(vec![0x8E, 0]));
        let bytes = rr_reply_bytes(vec![CpfItem::null(), short]);
        let err = RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_rr_data_response_owned_payload() {
        let resp = RrDataResponse {
            interface_handle: 0,
            timeout: 0,
            response: MessageRouterResponse {
                service: 0x90,
                general_status: 0,
                additional_status: None,
                response_data: None,
            },
        };
        let bytes = to_bytes(&resp).unwrap();
        let decoded =
            RrDataResponse::deserialize(&mut BufferReader::new(&bytes)).unwrap().into_owned();
        assert_eq!(decoded, resp);
    }

    #[test]
    fn test_identity_round_trip() {
        let identity = IdentityItemData {
            socket_addr: SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 10), 44818),
            vendor_id: 1,
            device_type: 0x0C,
            product_code: 0x41,
            revision_major: 2,
            revision_minor: 7,
            status: 0x0030,
            serial_number: 0x1122_3344,
            product_name: b"Adapter".to_vec(),
            state: 3,
            ..Default::default()
        };
        let bytes = to_bytes(&identity).unwrap();
        assert_eq!(bytes.len(), identity.length());
        // sin_family and sin_port are big-endian
        assert_eq!(&bytes[2..8], &[0x00, 0x02, 0xAF, 0x12, 192, 168]);

        let decoded = IdentityItemData::deserialize(&mut BufferReader::new(&bytes)).unwrap();
        assert_eq!(decoded, identity);

        let short = &bytes[..bytes.len() - 1];
        let err = IdentityItemData::deserialize(&mut BufferReader::new(short)).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_identity_name_keeps_raw_octets() {
        // Latin-1 e-acute followed by 'B'
        let identity = IdentityItemData {
            product_name: vec![0xE9, b'B'],
            ..Default::default()
        };
        let bytes = to_bytes(&identity).unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[32..], &[0x02, 0xE9, b'B', 0x00]);

        let decoded = IdentityItemData::deserialize(&mut BufferReader::new(&bytes)).unwrap();
        assert_eq!(decoded.product_name, vec![0xE9, b'B']);
        assert_eq!(to_bytes(&decoded).unwrap(), bytes);
        assert_eq!(decoded.product_name_lossy(), "\u{FFFD}B");
    }
}
