//! The source role's per-connection driver loop.
//!
//! Wait for M1, pipeline M2-M5, then loop `wait_for_request` until the peer
//! tears down.

use std::io::{Read, Write};

use tracing::info;

use crate::wfd::endpoint::Endpoint;
use crate::wfd::error::WfdError;
use crate::wfd::session::{Phase, SourceSession};

/// Run the full M1-M7 choreography for one accepted connection, from the
/// source's perspective, over a blocking stream.
///
/// # Errors
/// Propagates the first fatal error from the endpoint; the connection is
/// then abandoned by the caller.
pub fn drive_source_connection<S: Read + Write>(
    stream: S,
    url: &str,
    presentation_url: &str,
) -> Result<SourceSession, WfdError> {
    let mut endpoint = Endpoint::new(stream);
    let mut session = SourceSession::new();

    // M1: sink opens with OPTIONS; we reply via wait_for_request.
    endpoint.wait_for_request(&mut session)?;
    info!("M1 handled, proceeding to M2-M5");

    // M2: plain OPTIONS, response discarded.
    endpoint.send_request(session.options_request(url), &mut session)?;
    // M3: GET_PARAMETER.
    endpoint.send_request(session.get_parameter_request(url), &mut session)?;
    // M4: SET_PARAMETER with chosen formats.
    endpoint.send_request(
        session.set_parameter_formats_request(url, presentation_url),
        &mut session,
    )?;
    // M5: SET_PARAMETER trigger=SETUP.
    endpoint.send_request(session.set_parameter_trigger_request(url), &mut session)?;
    info!("M2-M5 pipeline complete, awaiting M6 SETUP");

    // M6 and the M7 steady state both arrive as inbound requests.
    while session.phase != Phase::Closed {
        endpoint.wait_for_request(&mut session)?;
    }
    info!("TEARDOWN handled, connection closing");
    endpoint.teardown();
    Ok(session)
}
