#[cfg(test)]
mod tests {
    use crate::codec::{BufferReader, Deserializable, Payload, Serializable, to_bytes};
    use crate::cpf::{CpfItem, CpfItemType, CpfPacket, SequencedAddressItem, SequencedDataItem};

    #[test]
    fn test_item_type_codes() {
        assert_eq!(CpfItemType::from(0x00B2), CpfItemType::UnconnectedMessage);
        assert_eq!(CpfItemType::from(0x8002), CpfItemType::SequencedAddress);
        assert_eq!(CpfItemType::from(0x55AA), CpfItemType::Unknown(0x55AA));
        assert_eq!(u16::from(CpfItemType::ListIdentityResponse), 0x000C);
        assert_eq!(u16::from(CpfItemType::Unknown(0x55AA)), 0x55AA);
    }

    #[test]
    fn test_empty_packet() {
        let packet = CpfPacket::new();
        assert_eq!(packet.length(), 2);
        assert_eq!(to_bytes(&packet).unwrap(), vec![0x00, 0x00]);

        let bytes = [0x00, 0x00];
        let decoded = CpfPacket::deserialize(&mut BufferReader::new(&bytes)).unwrap();
        assert_eq!(decoded.item_count(), 0);
    }

    #[test]
    fn test_two_item_packet_layout() {
        let value: u32 = 0x0403_0201;
        let packet = CpfPacket::with_items(vec![
            CpfItem::null(),
            CpfItem::new(CpfItemType::from(0x55AA), &value).unwrap(),
        ]);
        assert_eq!(packet.length(), 14);
        let bytes = to_bytes(&packet).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x02, 0x00, // item count
                0x00, 0x00, 0x00, 0x00, // null address item
                0xAA, 0x55, 0x04, 0x00, // data item header
                0x01, 0x02, 0x03, 0x04,
            ]
        );

        let decoded = CpfPacket::deserialize(&mut BufferReader::new(&bytes)).unwrap();
        assert_eq!(decoded.item_count(), 2);
        assert_eq!(decoded.items[0].item_type, CpfItemType::Null);
        assert!(decoded.items[0].data.is_none());
        let data = decoded.find(CpfItemType::Unknown(0x55AA)).unwrap();
        assert!(matches!(data.data, Some(Payload::Borrowed(_))));
        assert_eq!(data.data_as::<u32>().unwrap(), 0x0403_0201);
        assert!(decoded.find(CpfItemType::UnconnectedMessage).is_none());
    }

    #[test]
    fn test_packet_one_byte_short() {
        let value: u32 = 7;
        let packet = CpfPacket::with_items(vec![
            CpfItem::null(),
            CpfItem::new(CpfItemType::UnconnectedMessage, &value).unwrap(),
        ]);
        let bytes = to_bytes(&packet).unwrap();
        let short = &bytes[..bytes.len() - 1];
        let err = CpfPacket::deserialize(&mut BufferReader::new(short)).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_packet_count_larger_than_input() {
        // count of 65535 with no items behind it
        let err = CpfPacket::deserialize(&mut BufferReader::new(&[0xFF, 0xFF])).unwrap_err();
        assert!(err.is_framing());

        // count of 3, only one null item present
        let bytes = [0x03, 0x00, 0x00, 0x00, 0x00, 0x00];
        let err = CpfPacket::deserialize(&mut BufferReader::new(&bytes)).unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_item_sized_checks() {
        // envelope too small for the item header
        let bytes = [0x00, 0x00, 0x00];
        let err = CpfItem::deserialize_sized(&mut BufferReader::new(&bytes), 3).unwrap_err();
        assert!(err.is_framing());

        // item claims 4 data bytes, envelope holds 2
        let bytes = [0xB2, 0x00, 0x04, 0x00, 0x01, 0x02, 0x03, 0x04];
        let err = CpfItem::deserialize_sized(&mut BufferReader::new(&bytes), 6).unwrap_err();
        assert!(err.is_framing());

        let item = CpfItem::deserialize_sized(&mut BufferReader::new(&bytes), 8).unwrap();
        assert_eq!(item.item_type, CpfItemType::UnconnectedMessage);
        assert_eq!(item.data(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_item_without_data() {
        let item = CpfItem::null();
        assert_eq!(item.data_length(), 0);
        assert!(item.data().is_empty());
        let err = item.data_as::<u8>().unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_item_into_owned() {
        let bytes = [0xB1, 0x00, 0x02, 0x00, 0xAB, 0xCD];
        let owned = {
            let item = CpfItem::deserialize(&mut BufferReader::new(&bytes)).unwrap();
            item.into_owned()
        };
        assert!(matches!(owned.data, Some(Payload::Owned(_))));
        assert_eq!(owned.data(), &[0xAB, 0xCD]);
    }

    #[test]
    fn test_sequenced_address_item() {
        let addr = SequencedAddressItem::new(0x1122_3344, 9);
        let item = addr.to_item().unwrap();
        assert_eq!(item.item_type, CpfItemType::SequencedAddress);
        assert_eq!(
            to_bytes(&item).unwrap(),
            vec![0x02, 0x80, 0x08, 0x00, 0x44, 0x33, 0x22, 0x11, 0x09, 0x00, 0x00, 0x00]
        );
        assert_eq!(item.data_as::<SequencedAddressItem>().unwrap(), addr);
    }

    #[test]
    fn test_sequenced_data_item() {
        let data = SequencedDataItem::new(5, 0xBEEFu16);
        assert_eq!(data.length(), 4);
        let bytes = to_bytes(&data).unwrap();
        assert_eq!(bytes, vec![0x05, 0x00, 0xEF, 0xBE]);

        let decoded: SequencedDataItem<Payload<'_>> =
            SequencedDataItem::deserialize_sized(&mut BufferReader::new(&bytes), 4).unwrap();
        assert_eq!(decoded.sequence_number, 5);
        assert_eq!(decoded.value.as_slice(), &[0xEF, 0xBE]);

        let err =
            SequencedDataItem::<u16>::deserialize_sized(&mut BufferReader::new(&bytes[..1]), 1)
                .unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_io_packet_shape() {
        let data = SequencedDataItem::new(1, 0u32);
        let packet = CpfPacket::with_items(vec![
            SequencedAddressItem::new(0xAAAA_0001, 1).to_item().unwrap(),
            CpfItem::new(CpfItemType::ConnectedTransportPacket, &data).unwrap(),
        ]);
        let bytes = to_bytes(&packet).unwrap();
        assert_eq!(bytes.len(), 2 + 12 + 4 + 6);
        assert_eq!(&bytes[14..18], &[0xB1, 0x00, 0x06, 0x00]);
    }
}
