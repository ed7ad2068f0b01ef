//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.  Each
//! line received is parsed as a JSON-encoded [`Request`] and answered with
//! exactly one JSON-encoded [`Response`] line.
//!
//! # Wire format
//!
//! ```json
//! {"screen":{"x":0,"y":25,"width":1440,"height":875},"windows":[{"id":1,"frame":{"x":10,"y":40,"width":800,"height":600}}],"focused":1,"command":{"MoveTo":"center"}}
//! {"ok":true,"columns":6,"placements":[{"id":1,"frame":{"x":320.0,"y":162.0,"width":800.0,"height":600.0}}]}
//! ```
//!
//! A line that is not a valid request gets an `"ok":false` response and the
//! connection stays open.

use crate::command::{Envelope, Request, Response};
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded requests.
///
/// Each accepted connection can send multiple newline-delimited requests.
/// When the connection closes, the listener waits for the next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do after one connection is finished.
enum Flow {
    Continue,
    Shutdown,
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serve every request line on one connection.
    fn serve(
        &self,
        stream: UnixStream,
        sink: &mpsc::Sender<Envelope>,
    ) -> Result<Flow, UnixSocketError> {
        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let response = match serde_json::from_slice::<Request>(&line) {
                Ok(request) => {
                    debug!("received {:?}", request.command);
                    let (reply_tx, reply_rx) = mpsc::channel();
                    let envelope = Envelope {
                        request,
                        reply: reply_tx,
                    };
                    if sink.send(envelope).is_err() {
                        info!("sink closed, shutting down");
                        return Ok(Flow::Shutdown);
                    }
                    match reply_rx.recv() {
                        Ok(response) => response,
                        Err(_) => {
                            info!("sink dropped the request, shutting down");
                            return Ok(Flow::Shutdown);
                        }
                    }
                }
                Err(e) => {
                    error!("bad request: {} ({})", String::from_utf8_lossy(&line).trim_end(), e);
                    Response::error(None, format!("bad request: {}", e))
                }
            };
            write_response(&mut writer, &response)?;
        }
        Ok(Flow::Continue)
    }
}

fn write_response(writer: &mut impl Write, response: &Response) -> Result<(), UnixSocketError> {
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the sink is closed.  Run it on a
    /// dedicated thread.
    fn run(&mut self, sink: mpsc::Sender<Envelope>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    match self.serve(stream, &sink) {
                        Ok(Flow::Continue) => debug!("client disconnected"),
                        Ok(Flow::Shutdown) => break,
                        Err(e) => error!("connection error: {}", e),
                    }
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::command::{Command, Placement};
    use crate::geometry::Rect;
    use std::io::{BufRead, BufReader, Write};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Helper: create a unique temporary socket path for each test.
    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("winsnap-test-{}-{}.sock", std::process::id(), id))
    }

    /// Start a listener and a responder thread that echoes each command's
    /// window back as a placement at the origin.
    fn start(path: &Path) -> mpsc::Receiver<Command> {
        let (env_tx, env_rx) = mpsc::channel::<Envelope>();
        let (seen_tx, seen_rx) = mpsc::channel();

        let listen_path = path.to_path_buf();
        std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&listen_path);
            let _ = listener.run(env_tx);
        });

        std::thread::spawn(move || {
            for env in env_rx {
                let _ = seen_tx.send(env.request.command.clone());
                let placements = env
                    .request
                    .focused
                    .map(|id| Placement {
                        id,
                        frame: Rect::new(0.0, 0.0, 10.0, 10.0),
                    })
                    .into_iter()
                    .collect();
                let _ = env.reply.send(Response::ok(6, placements));
            }
        });

        // Give the listener a moment to bind.
        std::thread::sleep(std::time::Duration::from_millis(150));
        seen_rx
    }

    fn read_response(reader: &mut impl BufRead) -> Response {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read response");
        serde_json::from_str(&line).expect("response json")
    }

    #[test]
    fn request_response_over_socket() {
        let path = tmp_socket_path();
        let seen = start(&path);

        let mut stream = UnixStream::connect(&path).expect("connect");
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        writeln!(
            stream,
            r#"{{"screen":{{"x":0,"y":0,"width":800,"height":600}},"windows":[{{"id":3,"frame":{{"x":1,"y":2,"width":3,"height":4}}}}],"focused":3,"command":{{"MoveTo":"center"}}}}"#
        )
        .unwrap();
        let first = read_response(&mut reader);
        assert!(first.ok);
        assert_eq!(first.placements.len(), 1);
        assert_eq!(first.placements[0].id, 3);

        writeln!(
            stream,
            r#"{{"screen":{{"x":0,"y":0,"width":800,"height":600}},"command":"SnapToGrid"}}"#
        )
        .unwrap();
        let second = read_response(&mut reader);
        assert!(second.ok);
        assert!(second.placements.is_empty());

        let cmds: Vec<Command> = seen.try_iter().collect();
        assert_eq!(cmds, vec![Command::MoveTo(Anchor::Center), Command::SnapToGrid]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn malformed_json_gets_an_error_response() {
        let path = tmp_socket_path();
        let seen = start(&path);

        let mut stream = UnixStream::connect(&path).expect("connect");
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        writeln!(stream, "not json at all").unwrap();
        let bad = read_response(&mut reader);
        assert!(!bad.ok);
        assert!(bad.error.unwrap().starts_with("bad request"));

        // The connection is still usable.
        writeln!(
            stream,
            r#"{{"screen":{{"x":0,"y":0,"width":800,"height":600}},"command":{{"ResizeGrid":1}}}}"#
        )
        .unwrap();
        let good = read_response(&mut reader);
        assert!(good.ok);

        let cmds: Vec<Command> = seen.try_iter().collect();
        assert_eq!(cmds, vec![Command::ResizeGrid(1)]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn invalid_utf8_gets_an_error_response() {
        let path = tmp_socket_path();
        let seen = start(&path);

        let mut stream = UnixStream::connect(&path).expect("connect");
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        stream.write_all(b"\xff\xfe garbage\n").unwrap();
        let bad = read_response(&mut reader);
        assert!(!bad.ok);
        assert_eq!(bad.columns, None);
        assert!(bad.error.unwrap().starts_with("bad request"));

        writeln!(
            stream,
            r#"{{"screen":{{"x":0,"y":0,"width":800,"height":600}},"command":"SnapToGrid"}}"#
        )
        .unwrap();
        let good = read_response(&mut reader);
        assert!(good.ok);

        let cmds: Vec<Command> = seen.try_iter().collect();
        assert_eq!(cmds, vec![Command::SnapToGrid]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let path = tmp_socket_path();
        let _seen = start(&path);

        let mut stream = UnixStream::connect(&path).expect("connect");
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        writeln!(stream).unwrap();
        writeln!(
            stream,
            r#"{{"screen":{{"x":0,"y":0,"width":800,"height":600}},"command":"IncreaseWidth"}}"#
        )
        .unwrap();
        let response = read_response(&mut reader);
        assert!(response.ok);

        let _ = std::fs::remove_file(&path);
    }
}
