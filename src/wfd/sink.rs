//! The sink role's per-connection driver loop.
//!
//! Send M1 OPTIONS, wait for M3 and M4 (handled by the session's `Receiver`
//! impl, which also sends M6 SETUP as a follow-up once M5 arrives), then
//! loop on the steady M7 state until TEARDOWN.

use std::io::{Read, Write};

use tracing::info;

use crate::wfd::endpoint::Endpoint;
use crate::wfd::error::WfdError;
use crate::wfd::session::{Phase, SinkSession};

/// Run the M1-M6 handshake for one connection, from the sink's perspective,
/// over a blocking stream. Returns the endpoint (with its receive buffer
/// intact, ready for further PLAY/PAUSE/TEARDOWN traffic) and the resulting
/// session.
///
/// # Errors
/// Propagates the first fatal error from the endpoint.
pub fn drive_sink_connection<S: Read + Write>(
    stream: S,
) -> Result<(Endpoint<S>, SinkSession), WfdError> {
    let mut endpoint = Endpoint::new(stream);
    let mut session = SinkSession::new();

    // M1: we open with OPTIONS and block for the M2 ack.
    endpoint.send_request(session.options_request(), &mut session)?;
    info!("M1 acked, awaiting M3-M5");

    // M3 (GET_PARAMETER) and M4 (SET_PARAMETER formats) arrive as inbound
    // requests; M5's trigger also arrives inbound and causes our own SETUP
    // (M6) to be sent automatically as a follow-up.
    while session.handshake_phase != crate::wfd::session::HandshakePhase::Setup {
        endpoint.wait_for_request(&mut session)?;
    }
    info!("handshake complete, phase = {:?}", session.phase);

    Ok((endpoint, session))
}

/// Send a trigger-style request (PLAY/PAUSE/TEARDOWN) and block for its ack.
///
/// # Errors
/// Propagates any fatal endpoint error.
pub fn send_trigger<S: Read + Write>(
    endpoint: &mut Endpoint<S>,
    session: &mut SinkSession,
    request: crate::rtsp::Request,
) -> Result<(), WfdError> {
    endpoint.send_request(request, session)?;
    if session.phase == Phase::Closed {
        info!("TEARDOWN acked, tearing down connection");
    }
    Ok(())
}
