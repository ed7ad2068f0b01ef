//! Core traits that decouple winsnap from any specific host application or
//! transport mechanism.
//!
//! The geometry code is pure.  Everything it needs from the outside world
//! (the usable screen area, window frames, a way to apply a new frame) comes
//! through [`WindowHost`], and every command arrives through a
//! [`CommandSource`].  The [`Placer`](crate::placer::Placer) only depends on
//! these abstractions.

use crate::command::{Envelope, WindowInfo};
use crate::geometry::Rect;
use std::sync::mpsc;

/// Abstraction over the application that owns the windows.
///
/// An implementation might wrap a live window-management API, or it might
/// be a snapshot of rectangles supplied by a client (see
/// [`SnapshotHost`](crate::host::SnapshotHost)).
pub trait WindowHost {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// Usable area of the screen the current command acts on, excluding
    /// menu bars, docks and other reserved regions.
    fn visible_frame(&self) -> Result<Rect, Self::Error>;

    /// The focused window, or `None` if no window has focus.
    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error>;

    /// Every visible window on the screen, in the host's stacking order.
    fn visible_windows(&self) -> Result<Vec<WindowInfo>, Self::Error>;

    /// Give window `id` a new frame.
    fn set_frame(&self, id: u64, frame: Rect) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of placement requests.
///
/// Implementations listen on some transport (a Unix socket, a hotkey
/// callback bridge, an in-memory channel, …) and forward each request into
/// the provided [`mpsc::Sender`] together with a channel for its response.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received request must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming request into `sink`.
    ///
    /// This method blocks the calling thread.
    fn run(&mut self, sink: mpsc::Sender<Envelope>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Command, Request, Response};

    /// A test double that emits a fixed sequence of requests and collects
    /// the responses.
    struct MockSource {
        requests: Vec<Request>,
        responses: Vec<Response>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Envelope>) -> Result<(), MockError> {
            for request in self.requests.drain(..) {
                let (tx, rx) = mpsc::channel();
                sink.send(Envelope { request, reply: tx }).map_err(|_| MockError)?;
                self.responses.push(rx.recv().map_err(|_| MockError)?);
            }
            Ok(())
        }
    }

    fn request(command: Command) -> Request {
        Request {
            screen: Rect::new(0.0, 0.0, 800.0, 600.0),
            windows: Vec::new(),
            focused: None,
            command,
        }
    }

    #[test]
    fn mock_source_round_trips_replies() {
        let (tx, rx) = mpsc::channel::<Envelope>();
        let responder = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for env in rx {
                seen.push(env.request.command.clone());
                let _ = env.reply.send(Response::ok(6, Vec::new()));
            }
            seen
        });

        let mut src = MockSource {
            requests: vec![request(Command::SnapToGrid), request(Command::ResizeGrid(1))],
            responses: Vec::new(),
        };
        src.run(tx).unwrap();

        let seen = responder.join().unwrap();
        assert_eq!(seen, vec![Command::SnapToGrid, Command::ResizeGrid(1)]);
        assert_eq!(src.responses.len(), 2);
        assert!(src.responses.iter().all(|r| r.ok));
    }
}
