//! WFD sink role binary: connects to a source, runs the M1-M7 handshake,
//! then issues a PLAY followed by a TEARDOWN.

use std::net::TcpStream;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use wfd::wfd::sink::{drive_sink_connection, send_trigger};
use wfd::Config;

/// Run a WFD sink, connecting to a source.
#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
struct Opts {
    /// Host to connect to.
    host: String,

    /// Port to connect to.
    #[clap(short, long, default_value_t = 7236)]
    port: u16,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let config = Config::new().port(opts.port).bind_address(opts.host.clone());

    let stream = match TcpStream::connect((config.bind_address.as_str(), config.port)) {
        Ok(stream) => stream,
        Err(err) => {
            error!(%err, "failed to connect");
            return ExitCode::FAILURE;
        }
    };
    info!(host = %config.bind_address, port = config.port, "connected to source");

    run(stream).map_or(ExitCode::FAILURE, |()| ExitCode::SUCCESS)
}

fn run(stream: TcpStream) -> Result<(), wfd::WfdError> {
    let (mut endpoint, mut session) = drive_sink_connection(stream)?;
    info!(phase = ?session.phase, "handshake complete");

    let url = "rtsp://localhost/wfd1.0";
    let play = session.play_request(url);
    send_trigger(&mut endpoint, &mut session, play)?;
    info!("playing");
    let teardown = session.teardown_request(url);
    send_trigger(&mut endpoint, &mut session, teardown)?;
    endpoint.teardown();
    info!("torn down");
    Ok(())
}
