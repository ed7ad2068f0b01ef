//! The orchestrator that ties the geometry code, the grid configuration and
//! a window host together.
//!
//! [`Placer`] owns the process-wide [`GridConfig`] and reacts to
//! [`Command`]s by computing target frames with the pure functions in
//! [`anchor`](crate::anchor), [`grid`](crate::grid) and
//! [`sizing`](crate::sizing), then applying them through a [`WindowHost`].

use crate::anchor::{position_for, Anchor};
use crate::command::{Command, FillTarget, Request, Response, WindowInfo};
use crate::config::{Config, PlacementConfig};
use crate::geometry::Rect;
use crate::grid::{cell_to_rect, clamp_cell, snap_rect, GridCell, GridConfig};
use crate::host::SnapshotHost;
use crate::sizing::{fraction_frame, ResizeStep};
use crate::traits::WindowHost;
use log::{debug, error, info, warn};

/// Possible errors from the placer.
#[derive(Debug, thiserror::Error)]
pub enum PlacerError {
    /// The window host returned an error.
    #[error("window host error: {0}")]
    Host(String),

    /// The usable screen area has no width or no height, so no grid or
    /// anchor position can be derived from it.
    #[error("usable screen area is empty: {0:?}")]
    EmptyScreen(Rect),

    /// A screen or window rectangle, or a frame computed from one, holds a
    /// NaN or infinite coordinate.
    #[error("rectangle is not finite: {0:?}")]
    NonFinite(Rect),
}

/// Where a command puts the focused window.
#[derive(Debug, Clone, Copy)]
enum Target {
    Anchor(Anchor),
    Fill(FillTarget),
    Cell(GridCell),
    Snap,
    Step(ResizeStep),
}

/// Routes commands to the geometry code and applies the results.
///
/// The placer is the only owner of the grid configuration; the column count
/// changes only through [`Command::ResizeGrid`].  It holds no other state,
/// so one placer can serve any number of hosts, one command at a time.
///
/// # Typical usage
///
/// ```ignore
/// let mut placer = Placer::new(&Config::default());
/// let host = SnapshotHost::from_request(&request);
/// placer.handle(&host, Command::MoveTo(Anchor::Center))?;
/// ```
#[derive(Debug, Clone)]
pub struct Placer {
    grid: GridConfig,
    placement: PlacementConfig,
}

impl Placer {
    /// Create a placer from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        let config = config.clone().validated();
        Self {
            grid: config.grid,
            placement: config.placement,
        }
    }

    /// Current grid configuration.
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Current grid column count.
    pub fn columns(&self) -> u32 {
        self.grid.columns
    }

    /// Anchor and resize settings.
    pub fn placement(&self) -> &PlacementConfig {
        &self.placement
    }

    /// Process a single [`Command`] against `host`.
    ///
    /// Commands aimed at the focused window are a no-op when nothing is
    /// focused.  [`Command::ResizeGrid`] updates the column count before it
    /// touches the host, so the new granularity sticks even if re-snapping
    /// the windows fails.
    pub fn handle<H: WindowHost>(&mut self, host: &H, cmd: Command) -> Result<(), PlacerError> {
        let target = match cmd {
            Command::ResizeGrid(delta) => {
                let before = self.grid.columns;
                let after = self.grid.resize(delta);
                info!("grid columns {} -> {}", before, after);
                return self.resnap_all(host);
            }
            Command::MoveTo(anchor) => Target::Anchor(anchor),
            Command::Fill(fill) => Target::Fill(fill),
            Command::PlaceCell(cell) => Target::Cell(cell),
            Command::SnapToGrid => Target::Snap,
            Command::IncreaseWidth => Target::Step(ResizeStep::IncreaseWidth),
            Command::DecreaseWidth => Target::Step(ResizeStep::DecreaseWidth),
            Command::IncreaseHeight => Target::Step(ResizeStep::IncreaseHeight),
            Command::DecreaseHeight => Target::Step(ResizeStep::DecreaseHeight),
        };

        let screen = usable_frame(host)?;
        let Some(window) = focused_window(host)? else {
            debug!("no focused window, ignoring {:?}", target);
            return Ok(());
        };

        let frame = match target {
            Target::Anchor(anchor) => {
                info!("move {} to {}", window.id, anchor);
                let origin = position_for(anchor, screen, window.frame, self.placement.margin);
                window.frame.with_origin(origin)
            }

            Target::Fill(fill) => {
                info!(
                    "fill {} to {}x{} at {}",
                    window.id, fill.width, fill.height, fill.origin
                );
                fraction_frame(
                    screen,
                    window.frame,
                    fill.width,
                    fill.height,
                    fill.origin,
                    self.placement.margin,
                )
            }

            Target::Cell(cell) => {
                let clamped = clamp_cell(cell, &self.grid);
                if clamped != cell {
                    debug!("cell {:?} clamped to {:?}", cell, clamped);
                }
                info!("place {} in {:?}", window.id, clamped);
                cell_to_rect(clamped, screen, &self.grid)
            }

            Target::Snap => {
                info!("snap {} to grid", window.id);
                snap_rect(window.frame, screen, &self.grid)
            }

            Target::Step(step) => {
                info!("{} of {}", step, window.id);
                let size = step.apply(window.frame.size(), screen, self.placement.increment);
                window.frame.with_size(size)
            }
        };

        apply(host, &window, frame)
    }

    /// Handle one wire [`Request`] against a snapshot of the rectangles it
    /// carries and build the [`Response`] for the client.
    pub fn respond(&mut self, request: &Request) -> Response {
        let host = SnapshotHost::from_request(request);
        match self.handle(&host, request.command.clone()) {
            Ok(()) => Response::ok(self.columns(), host.into_placements()),
            Err(e) => {
                error!("command {:?} failed: {}", request.command, e);
                Response::error(Some(self.columns()), e.to_string())
            }
        }
    }

    /// Snap every visible window to its nearest cell in the current grid.
    fn resnap_all<H: WindowHost>(&self, host: &H) -> Result<(), PlacerError> {
        let screen = usable_frame(host)?;
        let windows = host
            .visible_windows()
            .map_err(|e| PlacerError::Host(e.to_string()))?;
        debug!("re-snapping {} window(s)", windows.len());

        let mut first_error = None;
        for window in &windows {
            let result = finite(window.frame)
                .and_then(|frame| apply(host, window, snap_rect(frame, screen, &self.grid)));
            if let Err(e) = result {
                warn!("re-snap of {} ({:?}) failed: {}", window.id, window.title, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

//  Helpers

fn usable_frame<H: WindowHost>(host: &H) -> Result<Rect, PlacerError> {
    let screen = host
        .visible_frame()
        .map_err(|e| PlacerError::Host(e.to_string()))?;
    let screen = finite(screen)?;
    if screen.is_empty() {
        return Err(PlacerError::EmptyScreen(screen));
    }
    Ok(screen)
}

fn focused_window<H: WindowHost>(host: &H) -> Result<Option<WindowInfo>, PlacerError> {
    let window = host
        .focused_window()
        .map_err(|e| PlacerError::Host(e.to_string()))?;
    if let Some(window) = &window {
        finite(window.frame)?;
    }
    Ok(window)
}

fn finite(rect: Rect) -> Result<Rect, PlacerError> {
    if rect.is_finite() {
        Ok(rect)
    } else {
        Err(PlacerError::NonFinite(rect))
    }
}

/// Round `frame` to whole pixels and hand it to the host, unless the window
/// is already there.
fn apply<H: WindowHost>(host: &H, window: &WindowInfo, frame: Rect) -> Result<(), PlacerError> {
    let frame = finite(frame.clamped().round())?;
    if frame == window.frame {
        debug!("{} already at {:?}", window.id, frame);
        return Ok(());
    }
    host.set_frame(window.id, frame)
        .map_err(|e| PlacerError::Host(e.to_string()))
}

//  Tests
