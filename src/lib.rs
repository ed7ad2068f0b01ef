//! **winsnap**: anchor and grid geometry for keyboard-driven window
//! placement.
//!
//! The heart of the crate is two pure components:
//!
//! * [`anchor`]: places a window at a named anchor (center, an edge or a
//!   corner) of the usable screen area.
//! * [`grid`]: divides the usable screen area into `columns × rows` cells
//!   and converts between cells and pixel rectangles.
//!
//! [`sizing`] adds fractional frames ("left half", "maximize") and step
//! resizing on top of the anchors.
//!
//! # Architecture
//!
//! Around the pure core, the crate is organised around two traits:
//!
//! * [`traits::WindowHost`]: abstracts the application that owns the
//!   windows, so placement logic is not coupled to any window system.
//! * [`traits::CommandSource`]: abstracts the transport that delivers
//!   requests, so the main loop is not coupled to any IPC mechanism.
//!
//! [`placer::Placer`] owns the grid configuration and applies commands
//! through a host.  Concrete implementations live in [`host`] (a snapshot of
//! client-supplied rectangles) and [`ipc`] (Unix-socket request listener).

pub mod anchor;
pub mod command;
pub mod config;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod ipc;
pub mod placer;
pub mod sizing;
pub mod traits;
