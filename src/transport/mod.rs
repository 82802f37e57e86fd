pub mod mock;
pub mod tcp;
pub mod traits;
pub mod udp;

pub use mock::*;
pub use tcp::*;
pub use traits::*;
pub use udp::*;
