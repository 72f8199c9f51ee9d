//! The WFD M1-M7 session state machine, for both the source and sink roles.
//!
//! Kept free of I/O: an [`Endpoint`](crate::wfd::endpoint::Endpoint) or
//! [`AsyncEndpoint`](crate::wfd::async_endpoint::AsyncEndpoint) drives one of
//! these through a byte stream by calling the [`Receiver`] callbacks.

use tracing::{debug, warn};

use crate::rtsp::headers::names;
use crate::rtsp::{Content, Message, Method, Request, Response, StatusCode};
use crate::wfd::constants::{
    self, param, AUDIO_CODECS_VALUE, DEFAULT_SINK_RTP_PORT, VIDEO_FORMATS_VALUE, WFD_CAPABILITY,
};
use crate::wfd::error::ProtocolError;

/// Connection-wide playback phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// M1-M6 in progress; no media session established yet.
    Handshake,
    /// Established, not streaming.
    Pause,
    /// Established and streaming.
    Play,
    /// TEARDOWN handled; the connection should be dropped.
    Closed,
}

/// Sub-phase of the handshake, meaningful only while `phase == Handshake`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    /// Waiting for / exchanging M1-M2 OPTIONS.
    Options,
    /// M3 `GET_PARAMETER` exchanged.
    GetParameters,
    /// M4 `SET_PARAMETER` (formats) exchanged.
    SetParameters,
    /// M5 trigger received/sent; M6 SETUP may now proceed.
    Setup,
}

/// An action the session state machine asks the driver loop to take after
/// handling an inbound request — e.g. the sink must send its own SETUP once
/// it receives the M5 trigger. A fully-formed request the driver loop sends
/// next, so the driver needs no role-specific knowledge to act on it.
pub type FollowUp = Request;

/// The outcome of handling an inbound request: the response to send back,
/// plus any request that should be sent as a consequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleResult {
    /// The response to send back for the request just handled.
    pub response: Response,
    /// A request to send immediately after, if the handler produced one.
    pub follow_up: Option<FollowUp>,
}

impl HandleResult {
    fn just(response: Response) -> Self {
        Self {
            response,
            follow_up: None,
        }
    }
}

/// The two callbacks an [`Endpoint`](crate::wfd::endpoint::Endpoint) drives a
/// connection through: handle an inbound request, or react to a response to
/// a request this side previously sent.
pub trait Receiver {
    /// Handle an inbound request, producing the response to send back.
    ///
    /// # Errors
    /// Returns [`ProtocolError::ForbiddenInPhase`] if the request is not
    /// valid in the current phase (connection-fatal).
    fn process_request(&mut self, request: &Request) -> Result<HandleResult, ProtocolError>;

    /// React to a response to a request this side sent earlier.
    ///
    /// # Errors
    /// May surface a protocol error if the response is unacceptable in the
    /// current phase.
    fn process_response(
        &mut self,
        response: &Response,
        original_request: &Request,
    ) -> Result<(), ProtocolError>;
}

fn unsupported_method() -> HandleResult {
    HandleResult::just(Response::new(StatusCode::NOT_ACCEPTABLE))
}

fn public_header_value() -> String {
    format!("{WFD_CAPABILITY}, GET_PARAMETER, SET_PARAMETER")
}

/// Source-role session state (the peer driving the handshake).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSession {
    /// Current playback phase.
    pub phase: Phase,
    /// Current handshake sub-phase (meaningful only during `Handshake`).
    pub handshake_phase: HandshakePhase,
    /// RTP port the sink reported in its M3 `GET_PARAMETER` response.
    pub sink_rtp_port: u16,
    /// Set once TEARDOWN has been handled; the driver loop should exit.
    pub disconnecting: bool,
}

impl Default for SourceSession {
    fn default() -> Self {
        Self {
            phase: Phase::Handshake,
            handshake_phase: HandshakePhase::Options,
            sink_rtp_port: DEFAULT_SINK_RTP_PORT,
            disconnecting: false,
        }
    }
}

impl SourceSession {
    /// A fresh session at the start of the handshake.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the M2 `OPTIONS` request the source sends after replying to M1.
    #[must_use]
    pub fn options_request(&self, url: &str) -> Request {
        Request::new(Method::Options, url).with_header(names::REQUIRE, WFD_CAPABILITY)
    }

    /// Build the M3 `GET_PARAMETER` request body listing the parameters this
    /// source requires from the sink.
    #[must_use]
    pub fn get_parameter_request(&self, url: &str) -> Request {
        let mut body = String::new();
        for name in constants::REQUESTED_PARAMETERS {
            body.push_str(name);
            body.push_str("\r\n");
        }
        Request::new(Method::GetParameter, url).with_content(Content::text_parameters(body))
    }

    /// Build the M4 `SET_PARAMETER` request fixing the chosen formats.
    #[must_use]
    pub fn set_parameter_formats_request(&self, url: &str, presentation_url: &str) -> Request {
        let body = format!(
            "{}: {}\r\n{}: {}\r\n{}: {}\r\n{}: {}\r\n",
            param::VIDEO_FORMATS,
            VIDEO_FORMATS_VALUE,
            param::AUDIO_CODECS,
            AUDIO_CODECS_VALUE,
            param::PRESENTATION_URL,
            presentation_url,
            param::CLIENT_RTP_PORTS,
            constants::client_rtp_ports_value(self.sink_rtp_port),
        );
        Request::new(Method::SetParameter, url).with_content(Content::text_parameters(body))
    }

    /// Build the M5 `SET_PARAMETER` trigger request that asks the sink to
    /// SETUP.
    #[must_use]
    pub fn set_parameter_trigger_request(&self, url: &str) -> Request {
        let body = format!("{}: SETUP\r\n", param::TRIGGER_METHOD);
        Request::new(Method::SetParameter, url).with_content(Content::text_parameters(body))
    }
}

impl Receiver for SourceSession {
    fn process_request(&mut self, request: &Request) -> Result<HandleResult, ProtocolError> {
        match request.method {
            // M1: sink requests OPTIONS.
            Method::Options => Ok(HandleResult::just(
                Response::new(StatusCode::OK).with_header(names::PUBLIC, public_header_value()),
            )),
            // M6: sink SETUPs with a Transport header.
            Method::Setup => {
                if self.handshake_phase != HandshakePhase::Setup {
                    warn!(phase = ?self.handshake_phase, "SETUP received out of order");
                    return Err(ProtocolError::ForbiddenInPhase(format!(
                        "SETUP received while handshake_phase = {:?}",
                        self.handshake_phase
                    )));
                }
                let transport = request.headers.get(names::TRANSPORT).unwrap_or("").to_string();
                self.phase = Phase::Pause;
                debug!("M6 SETUP handled, phase -> Pause");
                Ok(HandleResult::just(
                    Response::new(StatusCode::OK)
                        .with_header(names::TRANSPORT, transport)
                        .with_header(names::SESSION, constants::session_header_value()),
                ))
            }
            // M7 steady state.
            Method::Play => {
                self.phase = Phase::Play;
                Ok(HandleResult::just(Response::new(StatusCode::OK)))
            }
            Method::Pause => {
                self.phase = Phase::Pause;
                Ok(HandleResult::just(Response::new(StatusCode::OK)))
            }
            Method::Teardown => {
                self.disconnecting = true;
                self.phase = Phase::Closed;
                Ok(HandleResult::just(Response::new(StatusCode::OK)))
            }
            Method::GetParameter | Method::SetParameter | Method::Other(_) => {
                warn!(method = ?request.method, "unsupported request for source role");
                Ok(unsupported_method())
            }
        }
    }

    fn process_response(
        &mut self,
        response: &Response,
        original_request: &Request,
    ) -> Result<(), ProtocolError> {
        if !response.status.is_success() {
            warn!(status = response.status.as_u16(), "non-2xx response during handshake");
        }
        match original_request.method {
            // M3: record the sink's RTP port (falls back to the default if absent).
            Method::GetParameter => {
                self.sink_rtp_port = DEFAULT_SINK_RTP_PORT;
                self.handshake_phase = HandshakePhase::GetParameters;
            }
            // M4 and M5 are distinguished by the presence of the trigger
            // parameter in the request body we sent.
            Method::SetParameter => {
                if is_trigger_setup(original_request) {
                    self.handshake_phase = HandshakePhase::Setup;
                } else {
                    self.handshake_phase = HandshakePhase::SetParameters;
                }
            }
            // M2: OPTIONS response discarded; SETUP/PLAY/PAUSE/TEARDOWN
            // responses have nothing further to record.
            Method::Options
            | Method::Setup
            | Method::Play
            | Method::Pause
            | Method::Teardown
            | Method::Other(_) => {}
        }
        Ok(())
    }
}

fn is_trigger_setup(request: &Request) -> bool {
    request
        .content
        .as_ref()
        .is_some_and(|c| contains_line(&c.bytes, param::TRIGGER_METHOD))
}

fn contains_line(bytes: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    bytes
        .windows(needle.len())
        .any(|window| window == needle)
}

/// Sink-role session state (the peer reacting to the handshake).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSession {
    /// Current playback phase.
    pub phase: Phase,
    /// Current handshake sub-phase (meaningful only during `Handshake`).
    pub handshake_phase: HandshakePhase,
    /// RTP port this sink advertises/uses for its own SETUP.
    pub rtp_port: u16,
    /// Set once TEARDOWN has been handled; the driver loop should exit.
    pub disconnecting: bool,
}

impl Default for SinkSession {
    fn default() -> Self {
        Self {
            phase: Phase::Handshake,
            handshake_phase: HandshakePhase::Options,
            rtp_port: DEFAULT_SINK_RTP_PORT,
            disconnecting: false,
        }
    }
}

impl SinkSession {
    /// A fresh session at the start of the handshake.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the M1 `OPTIONS` request the sink sends to open the handshake.
    #[must_use]
    pub fn options_request(&self) -> Request {
        Request::new(Method::Options, "*").with_header(names::REQUIRE, WFD_CAPABILITY)
    }

    /// Build the sink's own SETUP request (M6), once triggered by M5.
    #[must_use]
    pub fn setup_request(&self, url: &str) -> Request {
        Request::new(Method::Setup, url)
            .with_header(names::TRANSPORT, constants::sink_transport_value(self.rtp_port))
    }

    /// Build a PLAY request.
    #[must_use]
    pub fn play_request(&self, url: &str) -> Request {
        Request::new(Method::Play, url)
    }

    /// Build a PAUSE request.
    #[must_use]
    pub fn pause_request(&self, url: &str) -> Request {
        Request::new(Method::Pause, url)
    }

    /// Build a TEARDOWN request.
    #[must_use]
    pub fn teardown_request(&self, url: &str) -> Request {
        Request::new(Method::Teardown, url)
    }
}

impl Receiver for SinkSession {
    fn process_request(&mut self, request: &Request) -> Result<HandleResult, ProtocolError> {
        match request.method {
            // M3: advertise capabilities.
            Method::GetParameter => {
                let body = format!(
                    "{}: {}\r\n{}: {}\r\n{}: {}\r\n{}: none\r\n{}: none\r\n",
                    param::VIDEO_FORMATS,
                    VIDEO_FORMATS_VALUE,
                    param::AUDIO_CODECS,
                    AUDIO_CODECS_VALUE,
                    param::CLIENT_RTP_PORTS,
                    constants::client_rtp_ports_value(self.rtp_port),
                    param::CONTENT_PROTECTION,
                    param::UIBC_CAPABILITY,
                );
                self.handshake_phase = HandshakePhase::GetParameters;
                Ok(HandleResult::just(
                    Response::new(StatusCode::OK)
                        .with_content(Content::text_parameters(body)),
                ))
            }
            // M4/M5: both arrive as SET_PARAMETER; M5 carries the trigger.
            Method::SetParameter => {
                if is_trigger_setup(request) {
                    self.handshake_phase = HandshakePhase::Setup;
                    debug!("M5 trigger SETUP received, will SETUP in reply");
                    Ok(HandleResult {
                        response: Response::new(StatusCode::OK),
                        follow_up: Some(self.setup_request(&request.url)),
                    })
                } else {
                    self.handshake_phase = HandshakePhase::SetParameters;
                    Ok(HandleResult::just(Response::new(StatusCode::OK)))
                }
            }
            // M2: ack the source's plain OPTIONS the same way M1 was acked.
            Method::Options => Ok(HandleResult::just(
                Response::new(StatusCode::OK).with_header(names::PUBLIC, public_header_value()),
            )),
            Method::Setup | Method::Play | Method::Pause | Method::Teardown | Method::Other(_) => {
                warn!(method = ?request.method, "unsupported request for sink role");
                Ok(unsupported_method())
            }
        }
    }

    fn process_response(
        &mut self,
        response: &Response,
        original_request: &Request,
    ) -> Result<(), ProtocolError> {
        if !response.status.is_success() {
            warn!(status = response.status.as_u16(), "non-2xx response during handshake");
        }
        match original_request.method {
            // Ack for our own SETUP (M6): handshake complete.
            Method::Setup => {
                self.phase = Phase::Pause;
            }
            Method::Play => self.phase = Phase::Play,
            Method::Pause => self.phase = Phase::Pause,
            Method::Teardown => {
                self.disconnecting = true;
                self.phase = Phase::Closed;
            }
            // M2 ack for our M1 OPTIONS; nothing else to record.
            Method::Options | Method::GetParameter | Method::SetParameter | Method::Other(_) => {}
        }
        Ok(())
    }
}

/// Convert a [`Message`] known to be a request into a [`Request`], or `None`
/// if it is a response.
#[must_use]
pub fn as_request(message: &Message) -> Option<&Request> {
    match message {
        Message::Request(r) => Some(r),
        Message::Response(_) => None,
    }
}

/// Convert a [`Message`] known to be a response into a [`Response`], or
/// `None` if it is a request.
#[must_use]
pub fn as_response(message: &Message) -> Option<&Response> {
    match message {
        Message::Response(r) => Some(r),
        Message::Request(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_replies_to_m1_options() {
        let mut source = SourceSession::new();
        let request = Request::new(Method::Options, "*").with_header(names::REQUIRE, WFD_CAPABILITY);
        let result = source.process_request(&request).unwrap();
        assert_eq!(result.response.status, StatusCode::OK);
        assert_eq!(
            result.response.headers.get(names::PUBLIC),
            Some("org.wfa.wfd1.0, GET_PARAMETER, SET_PARAMETER")
        );
    }

    #[test]
    fn source_rejects_setup_before_trigger() {
        let mut source = SourceSession::new();
        let request = Request::new(Method::Setup, "rtsp://x/wfd1.0")
            .with_header(names::TRANSPORT, "RTP/AVP/UDP;unicast;client_port=1028");
        assert!(source.process_request(&request).is_err());
    }

    #[test]
    fn source_handshake_advances_through_m3_m4_m5() {
        let mut source = SourceSession::new();
        let get_param = source.get_parameter_request("rtsp://x/wfd1.0");
        source
            .process_response(&Response::new(StatusCode::OK), &get_param)
            .unwrap();
        assert_eq!(source.handshake_phase, HandshakePhase::GetParameters);

        let set_formats = source.set_parameter_formats_request("rtsp://x/wfd1.0", "rtsp://x/wfd1.0");
        source
            .process_response(&Response::new(StatusCode::OK), &set_formats)
            .unwrap();
        assert_eq!(source.handshake_phase, HandshakePhase::SetParameters);

        let trigger = source.set_parameter_trigger_request("rtsp://x/wfd1.0");
        source
            .process_response(&Response::new(StatusCode::OK), &trigger)
            .unwrap();
        assert_eq!(source.handshake_phase, HandshakePhase::Setup);
    }

    #[test]
    fn source_m6_setup_transitions_to_pause() {
        let mut source = SourceSession::new();
        source.handshake_phase = HandshakePhase::Setup;
        let request = Request::new(Method::Setup, "rtsp://x/wfd1.0")
            .with_header(names::TRANSPORT, "RTP/AVP/UDP;unicast;client_port=1028");
        let result = source.process_request(&request).unwrap();
        assert_eq!(source.phase, Phase::Pause);
        assert_eq!(
            result.response.headers.get(names::TRANSPORT),
            Some("RTP/AVP/UDP;unicast;client_port=1028")
        );
        assert_eq!(
            result.response.headers.get(names::SESSION),
            Some("01234567;timeout=30")
        );
    }

    #[test]
    fn source_m7_teardown_closes_and_disconnects() {
        let mut source = SourceSession::new();
        let request = Request::new(Method::Teardown, "rtsp://x/wfd1.0");
        source.process_request(&request).unwrap();
        assert_eq!(source.phase, Phase::Closed);
        assert!(source.disconnecting);
    }

    #[test]
    fn sink_m5_trigger_yields_follow_up_setup() {
        let mut sink = SinkSession::new();
        let body = format!("{}: SETUP\r\n", param::TRIGGER_METHOD);
        let request = Request::new(Method::SetParameter, "rtsp://x/wfd1.0")
            .with_content(Content::text_parameters(body));
        let result = sink.process_request(&request).unwrap();
        let follow_up = result.follow_up.expect("expected a follow-up SETUP request");
        assert_eq!(follow_up.method, Method::Setup);
        assert_eq!(follow_up.url, "rtsp://x/wfd1.0");
        assert_eq!(
            follow_up.headers.get(names::TRANSPORT),
            Some(constants::sink_transport_value(DEFAULT_SINK_RTP_PORT).as_str())
        );
        assert_eq!(sink.handshake_phase, HandshakePhase::Setup);
    }

    #[test]
    fn sink_unknown_method_is_406() {
        let mut sink = SinkSession::new();
        let request = Request::new(Method::Play, "*");
        let result = sink.process_request(&request).unwrap();
        assert_eq!(result.response.status, StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn sink_acks_m2_options_with_public_header() {
        let mut sink = SinkSession::new();
        let request = Request::new(Method::Options, "*").with_header(names::REQUIRE, WFD_CAPABILITY);
        let result = sink.process_request(&request).unwrap();
        assert_eq!(result.response.status, StatusCode::OK);
        assert_eq!(
            result.response.headers.get(names::PUBLIC),
            Some("org.wfa.wfd1.0, GET_PARAMETER, SET_PARAMETER")
        );
    }

    #[test]
    fn sink_m3_get_parameter_advertises_all_five_parameters() {
        let mut sink = SinkSession::new();
        let request = Request::new(Method::GetParameter, "rtsp://x/wfd1.0");
        let result = sink.process_request(&request).unwrap();
        let body = result.response.content.expect("expected a text/parameters body");
        let body = String::from_utf8(body.bytes).unwrap();
        assert!(body.contains(param::VIDEO_FORMATS));
        assert!(body.contains(param::AUDIO_CODECS));
        assert!(body.contains(param::CLIENT_RTP_PORTS));
        assert!(body.contains(param::CONTENT_PROTECTION));
        assert!(body.contains(param::UIBC_CAPABILITY));
    }
}
