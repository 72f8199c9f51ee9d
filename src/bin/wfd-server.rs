//! WFD source role binary: listens for sink connections and drives the
//! M1-M7 handshake on each.

use std::net::TcpListener;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use wfd::wfd::source::drive_source_connection;
use wfd::Config;

/// Run a WFD source, accepting sink connections.
#[derive(Parser, Debug)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
struct Opts {
    /// Port to listen on.
    #[clap(short, long, default_value_t = 7236)]
    port: u16,

    /// Address to bind to.
    #[clap(short, long, default_value = "0.0.0.0")]
    bind: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let config = Config::new().port(opts.port).bind_address(opts.bind);

    let listener = match TcpListener::bind((config.bind_address.as_str(), config.port)) {
        Ok(listener) => listener,
        Err(err) => {
            error!(%err, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(port = config.port, "WFD source listening");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                error!(%err, "failed to accept connection");
                continue;
            }
        };
        let peer = stream.peer_addr().ok();
        info!(?peer, "accepted connection");
        let url = "rtsp://localhost/wfd1.0";
        let presentation_url = "rtsp://localhost/wfd1.0";
        match drive_source_connection(stream, url, presentation_url) {
            Ok(_) => info!(?peer, "connection closed gracefully"),
            Err(err) => {
                error!(?peer, %err, "connection terminated with an error");
            }
        }
    }
    ExitCode::SUCCESS
}
