use rand_core::RngCore;

/// Hands out connection serial numbers and connection IDs for Forward Open.
///
/// Both counters start at random values so a reconnecting client does not
/// reuse the IDs of connections the target may still hold. Zero is skipped
/// on wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdGenerator {
    next_connection_sn: u16,
    next_connection_id: u32,
}

impl ConnectionIdGenerator {
    pub fn new(first_connection_sn: u16, first_connection_id: u32) -> Self {
        ConnectionIdGenerator {
            next_connection_sn: first_connection_sn.max(1),
            next_connection_id: first_connection_id.max(1),
        }
    }

    pub fn seeded<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let sn = (rng.next_u32() & 0xFFFF) as u16;
        Self::new(sn, rng.next_u32())
    }

    pub fn next_connection_sn(&mut self) -> u16 {
        let current = self.next_connection_sn;
        self.next_connection_sn = match current.wrapping_add(1) {
            0 => 1,
            n => n,
        };
        current
    }

    pub fn next_connection_id(&mut self) -> u32 {
        let current = self.next_connection_id;
        self.next_connection_id = match current.wrapping_add(1) {
            0 => 1,
            n => n,
        };
        current
    }
}
