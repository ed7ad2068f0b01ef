//! [`WindowHost`] backed by a client-supplied snapshot.
//!
//! The daemon never talks to a window system itself.  Each request carries
//! the usable screen rectangle and the frames of the visible windows; a
//! [`SnapshotHost`] serves those to the placer and records every frame it
//! is asked to apply so they can be sent back as [`Placement`]s.

use crate::command::{Placement, Request, WindowInfo};
use crate::geometry::Rect;
use crate::traits::WindowHost;
use std::cell::RefCell;

/// Errors produced by [`SnapshotHost`].
#[derive(Debug, thiserror::Error)]
pub enum SnapshotHostError {
    /// A window id that is not part of the snapshot.
    #[error("unknown window id: {0}")]
    UnknownWindow(u64),
}

/// In-memory host built from one request.
///
/// Frames written with [`set_frame`](WindowHost::set_frame) are visible to
/// later queries on the same host and are collected, in order, as
/// placements.
#[derive(Debug)]
pub struct SnapshotHost {
    screen: Rect,
    focused: Option<u64>,
    windows: RefCell<Vec<WindowInfo>>,
    placements: RefCell<Vec<Placement>>,
}

impl SnapshotHost {
    pub fn new(screen: Rect, windows: Vec<WindowInfo>, focused: Option<u64>) -> Self {
        Self {
            screen,
            focused,
            windows: RefCell::new(windows),
            placements: RefCell::new(Vec::new()),
        }
    }

    /// Snapshot of the screen and windows described by `request`.
    pub fn from_request(request: &Request) -> Self {
        Self::new(request.screen, request.windows.clone(), request.focused)
    }

    /// Consume the host and return the frames applied to it.
    pub fn into_placements(self) -> Vec<Placement> {
        self.placements.into_inner()
    }
}

impl WindowHost for SnapshotHost {
    type Error = SnapshotHostError;

    fn visible_frame(&self) -> Result<Rect, Self::Error> {
        Ok(self.screen)
    }

    fn focused_window(&self) -> Result<Option<WindowInfo>, Self::Error> {
        let Some(id) = self.focused else {
            return Ok(None);
        };
        self.windows
            .borrow()
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .map(Some)
            .ok_or(SnapshotHostError::UnknownWindow(id))
    }

    fn visible_windows(&self) -> Result<Vec<WindowInfo>, Self::Error> {
        Ok(self.windows.borrow().clone())
    }

    fn set_frame(&self, id: u64, frame: Rect) -> Result<(), Self::Error> {
        let mut windows = self.windows.borrow_mut();
        let window = windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(SnapshotHostError::UnknownWindow(id))?;
        window.frame = frame;
        self.placements.borrow_mut().push(Placement { id, frame });
        Ok(())
    }
}
