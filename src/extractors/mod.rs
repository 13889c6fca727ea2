//! Request extractors shared by handlers.

pub mod identity;
pub mod payload;

pub use identity::Caller;
pub use payload::Payload;
