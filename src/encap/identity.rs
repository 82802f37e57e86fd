use crate::codec::{Deserializable, ReadExt, Reader, Serializable, WriteExt, Writer};
use crate::error::{EipError, Result};
use std::borrow::Cow;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Identity reported in a ListIdentity reply (CPF item type 0x000C).
///
/// The embedded socket address is the only big-endian field in the
/// encapsulation layer. The product name is a CIP SHORT_STRING and is kept
/// as the octets the device sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityItemData {
    pub encap_protocol_version: u16,
    pub sin_family: u16,
    pub socket_addr: SocketAddrV4,
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    pub revision_major: u8,
    pub revision_minor: u8,
    pub status: u16,
    pub serial_number: u32,
    pub product_name: Vec<u8>,
    pub state: u8,
}

impl Default for IdentityItemData {
    fn default() -> Self {
        IdentityItemData {
            encap_protocol_version: 1,
            sin_family: 2,
            socket_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0),
            vendor_id: 0,
            device_type: 0,
            product_code: 0,
            revision_major: 0,
            revision_minor: 0,
            status: 0,
            serial_number: 0,
            product_name: Vec::new(),
            state: 0,
        }
    }
}

impl IdentityItemData {
    /// Product name for display. Octets that are not UTF-8 become U+FFFD.
    pub fn product_name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.product_name)
    }
}

fn read_be<const N: usize>(reader: &mut dyn Reader<'_>) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_bytes(&mut buf)?;
    Ok(buf)
}

impl Serializable for IdentityItemData {
    fn length(&self) -> usize {
        // version + sockaddr (16) + fixed identity fields + name + state
        2 + 16 + 14 + 1 + self.product_name.len() + 1
    }

    fn serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        let name_len = u8::try_from(self.product_name.len()).map_err(|_| {
            EipError::length(format!(
                "product name of {} bytes is too long",
                self.product_name.len()
            ))
        })?;
        writer.write(self.encap_protocol_version)?;
        writer.write_bytes(&self.sin_family.to_be_bytes())?;
        writer.write_bytes(&self.socket_addr.port().to_be_bytes())?;
        writer.write_bytes(&self.socket_addr.ip().octets())?;
        writer.write_zeros(8)?;
        writer.write(self.vendor_id)?;
        writer.write(self.device_type)?;
        writer.write(self.product_code)?;
        writer.write(self.revision_major)?;
        writer.write(self.revision_minor)?;
        writer.write(self.status)?;
        writer.write(self.serial_number)?;
        writer.write(name_len)?;
        writer.write_bytes(&self.product_name)?;
        writer.write(self.state)
    }
}

impl<'a> Deserializable<'a> for IdentityItemData {
    fn deserialize(reader: &mut dyn Reader<'a>) -> Result<Self> {
        let encap_protocol_version = reader.read()?;
        let sin_family = u16::from_be_bytes(read_be(reader)?);
        let port = u16::from_be_bytes(read_be(reader)?);
        let ip = Ipv4Addr::from(read_be::<4>(reader)?);
        reader.skip(8)?;
        let vendor_id = reader.read()?;
        let device_type = reader.read()?;
        let product_code = reader.read()?;
        let revision_major = reader.read()?;
        let revision_minor = reader.read()?;
        let status = reader.read()?;
        let serial_number = reader.read()?;
        let name_len = reader.read::<u8>()?;
        let mut product_name = vec![0u8; usize::from(name_len)];
        reader.read_bytes(&mut product_name)?;
        let state = reader.read()?;
        Ok(IdentityItemData {
            encap_protocol_version,
            sin_family,
            socket_addr: SocketAddrV4::new(ip, port),
            vendor_id,
            device_type,
            product_code,
            revision_major,
            revision_minor,
            status,
            serial_number,
            product_name,
            state,
        })
    }
}
