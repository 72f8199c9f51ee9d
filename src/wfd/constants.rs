//! Canonical WFD wire values (ports, session id, parameter bodies).
//!
//! These must be emitted bit-for-bit for interop with real WFD sinks/sources.

/// The WFD well-known server port.
pub const DEFAULT_PORT: u16 = 7236;

/// Default sink RTP port, used before the source has learned the sink's
/// actual advertised port.
pub const DEFAULT_SINK_RTP_PORT: u16 = 1028;

/// Fixed session id used for every SETUP response.
pub const SESSION_ID: &str = "01234567";

/// `text/parameters` media type used by every WFD body.
pub const TEXT_PARAMETERS: &str = "text/parameters";

/// WFD capability negotiation token carried on `Require`/`Public`.
pub const WFD_CAPABILITY: &str = "org.wfa.wfd1.0";

/// Names the state machine recognizes within a `text/parameters` body.
/// All other names are passed through unchanged.
pub mod param {
    /// `wfd_video_formats`.
    pub const VIDEO_FORMATS: &str = "wfd_video_formats";
    /// `wfd_audio_codecs`.
    pub const AUDIO_CODECS: &str = "wfd_audio_codecs";
    /// `wfd_client_rtp_ports`.
    pub const CLIENT_RTP_PORTS: &str = "wfd_client_rtp_ports";
    /// `wfd_content_protection`.
    pub const CONTENT_PROTECTION: &str = "wfd_content_protection";
    /// `wfd_uibc_capability`.
    pub const UIBC_CAPABILITY: &str = "wfd_uibc_capability";
    /// `wfd_presentation_URL`.
    pub const PRESENTATION_URL: &str = "wfd_presentation_URL";
    /// `wfd_trigger_method`.
    pub const TRIGGER_METHOD: &str = "wfd_trigger_method";
}

/// Canonical `wfd_video_formats` value (must match bit-for-bit).
pub const VIDEO_FORMATS_VALUE: &str =
    "00 00 01 01 00000020 00000000 00000000 00 0000 0000 00 none none";

/// Canonical `wfd_audio_codecs` value (must match bit-for-bit).
pub const AUDIO_CODECS_VALUE: &str = "LPCM 00000002 00";

/// Build the `wfd_client_rtp_ports` value for the given sink RTP port.
#[must_use]
pub fn client_rtp_ports_value(port: u16) -> String {
    format!("RTP/AVP/UDP;unicast {port} 0 mode=play")
}

/// Build the `Transport` header value the sink sends on its outbound SETUP.
#[must_use]
pub fn sink_transport_value(rtp_port: u16) -> String {
    format!("RTP/AVP/UDP;unicast;client_port={rtp_port}")
}

/// Build the `Session` header value for a SETUP response.
#[must_use]
pub fn session_header_value() -> String {
    format!("{SESSION_ID};timeout=30")
}

/// Parameter names M3's `GET_PARAMETER` body requests of the sink.
pub const REQUESTED_PARAMETERS: &[&str] = &[
    param::VIDEO_FORMATS,
    param::AUDIO_CODECS,
    param::CLIENT_RTP_PORTS,
    param::CONTENT_PROTECTION,
    param::UIBC_CAPABILITY,
];
