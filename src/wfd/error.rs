//! WFD protocol and connection error types.

use crate::rtsp::CodecError;

/// Errors arising from the session state machine rather than the wire codec
/// (both connection-fatal).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A response's `CSeq` did not match the request that was sent.
    #[error("CSeq mismatch: sent {sent}, received {received}")]
    CseqMismatch {
        /// The `CSeq` stamped on the outgoing request.
        sent: u32,
        /// The `CSeq` carried by the response that was received instead.
        received: u32,
    },

    /// A response referenced a `CSeq` with no matching pending request.
    #[error("response with unknown CSeq {0}")]
    UnknownCseq(u32),

    /// A message arrived while the session was in a phase that forbids it
    /// (e.g. SETUP before the trigger, or SETUP out of handshake order).
    #[error("message received in forbidden phase: {0}")]
    ForbiddenInPhase(String),
}

/// Top-level per-connection error, uniting transport, framing, and protocol
/// failures. Method-unsupported is deliberately absent: it is
/// recovered locally as a 406 response, never propagated here.
#[derive(Debug, thiserror::Error)]
pub enum WfdError {
    /// The underlying stream errored or was unexpectedly closed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The wire codec could not frame or serialize a message.
    #[error("framing error: {0}")]
    Codec(#[from] CodecError),

    /// The session state machine rejected a message.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The connection ended gracefully (e.g. after TEARDOWN).
    #[error("connection closed")]
    Closed,
}
