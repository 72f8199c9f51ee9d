//! The WFD/Miracast session-control state machine and its I/O drivers.

pub mod async_endpoint;
pub mod constants;
pub mod endpoint;
pub mod error;
pub mod session;
pub mod sink;
pub mod source;

pub use async_endpoint::AsyncEndpoint;
pub use endpoint::Endpoint;
pub use error::{ProtocolError, WfdError};
pub use session::{HandshakePhase, Phase, Receiver, SinkSession, SourceSession};
