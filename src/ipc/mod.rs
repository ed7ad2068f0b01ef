//! IPC listener that accepts placement requests over a Unix socket.
//!
//! A host-side script (a hotkey handler in the window-management host, a
//! shell helper, etc.) connects to the socket, sends newline-delimited JSON
//! requests and reads one JSON response per request.

pub mod listener;
