//! Byte-exact layouts of complete frames, built and parsed through the
//! public API only.

use enip_session::cip::{
    ForwardCloseSuccess, ForwardOpenSuccess, MessageRouterRequest, MessageRouterResponse, Path,
    services,
};
use enip_session::codec::{
    BufferReader, BufferWriter, Deserializable, Payload, StreamReader, StreamWriter, to_bytes,
};
use enip_session::cpf::{CpfItem, CpfItemType, CpfPacket, SequencedAddressItem, SequencedDataItem};
use enip_session::encap::{
    EncapCommand, EncapHeader, EncapPacket, IdentityItemData, RegisterSessionData, RrDataRequest,
    RrDataResponse,
};
use enip_session::{Connection, ConnectionInfo, Serializable};
use std::io::Cursor;

#[test]
fn test_get_attribute_frame() {
    let rr = RrDataRequest::new(MessageRouterRequest::new(
        services::GET_ATTRIBUTE_SINGLE,
        Path::attribute(0x01, 0x01, 0x01),
        None,
    ));
    let packet = EncapPacket::with_payload(EncapCommand::SendRrData, 0x0000_0042, &rr).unwrap();
    let bytes = to_bytes(&packet).unwrap();

    #[rustfmt::skip]
    let expected = vec![
        // encapsulation header
        0x6F, 0x00, 0x18, 0x00,
        0x42, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        // interface handle, timeout
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        // CPF: two items, null address, unconnected message
        0x02, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0xB2, 0x00, 0x08, 0x00,
        // message router request
        0x0E, 0x03, 0x20, 0x01, 0x24, 0x01, 0x30, 0x01,
    ];
    assert_eq!(bytes, expected);
}

#[test]
fn test_register_session_frame() {
    let data = RegisterSessionData::default();
    let packet = EncapPacket::with_payload(EncapCommand::RegisterSession, 0, &data).unwrap();
    let bytes = to_bytes(&packet).unwrap();
    assert_eq!(bytes.len(), 28);
    assert_eq!(&bytes[0..2], &[0x65, 0x00]);
    assert_eq!(&bytes[2..4], &[0x04, 0x00]);
    assert_eq!(&bytes[4..8], &[0x00; 4]);
    assert_eq!(&bytes[24..28], &[0x01, 0x00, 0x00, 0x00]);
}

#[test]
fn test_cpf_count_semantics() {
    assert_eq!(to_bytes(&CpfPacket::new()).unwrap(), vec![0x00, 0x00]);

    let packet = CpfPacket::with_items(vec![
        CpfItem::null(),
        CpfItem::from_payload(CpfItemType::from(0x55AA), Payload::from(vec![9, 8, 7, 6])),
    ]);
    assert_eq!(
        to_bytes(&packet).unwrap(),
        vec![0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xAA, 0x55, 0x04, 0x00, 9, 8, 7, 6]
    );
}

#[test]
fn test_forward_close_pads_after_size() {
    let conn = Connection::new(
        ConnectionInfo::new(0x70, 16, 5_000),
        ConnectionInfo::new(0x71, 16, 5_000),
    );
    let close = to_bytes(&conn.create_forward_close_request()).unwrap();
    let open = to_bytes(&conn.create_forward_open_request()).unwrap();

    let segments = [0x20, 0x04, 0x24, 0x01, 0x2C, 0x70, 0x2C, 0x71];
    assert_eq!(&close[10..12], &[0x04, 0x00]);
    assert_eq!(&close[12..], &segments);
    assert_eq!(open[39], 0x04);
    assert_eq!(&open[40..], &segments);
}

#[test]
fn test_reply_parsed_from_stream() {
    let reply = vec![
        0x6F, 0x00, 0x16, 0x00, 0x42, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xB2, 0x00, 0x06, 0x00,
        0x8E, 0x00, 0x00, 0x00, 0x34, 0x12,
    ];

    let mut reader = StreamReader::new(Cursor::new(reply.clone()));
    let packet = EncapPacket::deserialize_sized(&mut reader, reply.len()).unwrap();
    assert!(!packet.payload().unwrap().is_borrowed());
    let rr: RrDataResponse = packet.payload_as().unwrap();
    assert_eq!(rr.response.data_as::<u16>().unwrap(), 0x1234);

    // the same bytes come back out through a stream writer
    let mut out = Vec::new();
    packet.serialize(&mut StreamWriter::new(&mut out)).unwrap();
    assert_eq!(out, reply);

    let from_slice =
        EncapPacket::deserialize_sized(&mut BufferReader::new(&reply), reply.len()).unwrap();
    assert_eq!(from_slice.into_owned(), packet.into_owned());
}

#[test]
fn test_short_buffer_rejected_for_every_entity() {
    let value: u16 = 0x0102;
    let conn = Connection::new(
        ConnectionInfo::new(0x70, 16, 5_000),
        ConnectionInfo::new(0x71, 16, 5_000),
    );
    let mut padded = Path::with_pad_after_length();
    padded.add_logical_class(0x04).add_logical_instance(0x01);
    let mr_request = MessageRouterRequest::new(
        services::SET_ATTRIBUTE_SINGLE,
        Path::attribute(0x01, 0x01, 0x07),
        Some(&value as &dyn Serializable),
    );
    let mr_response = MessageRouterResponse {
        service: 0x8E,
        general_status: 0x05,
        additional_status: Some(Payload::from(vec![0xAA, 0xBB])),
        response_data: Some(Payload::from(vec![0x99])),
    };
    let rr_request = RrDataRequest::new(MessageRouterRequest::new(
        services::GET_ATTRIBUTE_SINGLE,
        Path::attribute(0x01, 0x01, 0x01),
        None,
    ));
    let packet = EncapPacket::with_payload(EncapCommand::SendRrData, 0x42, &value).unwrap();
    let cpf = CpfPacket::with_items(vec![
        CpfItem::null(),
        CpfItem::from_payload(CpfItemType::UnconnectedMessage, Payload::from(vec![1, 2, 3])),
    ]);
    let open_reply = ForwardOpenSuccess {
        o_to_t_connection_id: 1,
        t_to_o_connection_id: 2,
        response_data: Some(Payload::from(vec![0xDE, 0xAD])),
        ..Default::default()
    };
    let close_reply = ForwardCloseSuccess {
        connection_sn: 7,
        originator_vendor_id: 0x1234,
        originator_sn: 99,
        response_data: None,
    };
    let identity = IdentityItemData {
        product_name: b"Adapter".to_vec(),
        ..Default::default()
    };
    let header = EncapHeader::new(EncapCommand::ListIdentity, 1);
    let path = Path::attribute(0x01, 0x01, 0x07);
    let open_request = conn.create_forward_open_request();
    let close_request = conn.create_forward_close_request();
    let address = SequencedAddressItem::new(0xAAAA_0001, 1);
    let io_data = SequencedDataItem::new(1, 0u32);
    let register = RegisterSessionData::default();

    let cases: &[(&str, &dyn Serializable)] = &[
        ("encap header", &header),
        ("encap packet", &packet),
        ("cpf item", &cpf.items[1]),
        ("cpf packet", &cpf),
        ("path", &path),
        ("padded path", &padded),
        ("message router request", &mr_request),
        ("message router response", &mr_response),
        ("rr data request", &rr_request),
        ("forward open request", &open_request),
        ("forward open success", &open_reply),
        ("forward close request", &close_request),
        ("forward close success", &close_reply),
        ("sequenced address item", &address),
        ("sequenced data item", &io_data),
        ("register session", &register),
        ("identity", &identity),
    ];

    for &(name, entity) in cases {
        let mut buf = vec![0u8; entity.length() - 1];
        let err = entity.serialize(&mut BufferWriter::new(&mut buf)).unwrap_err();
        assert!(err.is_framing(), "{}: unexpected error {:?}", name, err);
    }
}
