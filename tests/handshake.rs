//! End-to-end M1-M7 handshake between a source and a sink over a real TCP
//! loopback connection, each driven by its own thread.

use std::net::{TcpListener, TcpStream};
use std::thread;

use wfd::wfd::sink::{drive_sink_connection, send_trigger};
use wfd::wfd::source::drive_source_connection;
use wfd::Phase;

#[test]
fn source_and_sink_complete_the_handshake_and_teardown() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let source = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let url = "rtsp://localhost/wfd1.0";
        drive_source_connection(stream, url, url).unwrap()
    });

    let sink = thread::spawn(move || {
        let stream = TcpStream::connect(addr).unwrap();
        let (mut endpoint, mut session) = drive_sink_connection(stream).unwrap();
        assert_eq!(session.phase, Phase::Pause);

        let url = "rtsp://localhost/wfd1.0";
        let play = session.play_request(url);
        send_trigger(&mut endpoint, &mut session, play).unwrap();
        assert_eq!(session.phase, Phase::Play);

        let teardown = session.teardown_request(url);
        send_trigger(&mut endpoint, &mut session, teardown).unwrap();
        assert_eq!(session.phase, Phase::Closed);
        endpoint.teardown();
        session
    });

    let source_session = source.join().unwrap();
    let sink_session = sink.join().unwrap();

    assert_eq!(source_session.phase, Phase::Closed);
    assert!(source_session.disconnecting);
    assert_eq!(sink_session.phase, Phase::Closed);
    assert!(sink_session.disconnecting);
}
