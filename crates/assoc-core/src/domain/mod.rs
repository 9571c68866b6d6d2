//! Domain model (payload trait, classification result).

pub mod change;
pub mod payload;

pub use self::change::{ChangeKind, Transmission};
pub use self::payload::Payload;
