//! Commands and wire types used throughout winsnap.
//!
//! [`Command`] describes every placement action, [`WindowInfo`] describes a
//! window the host knows about, and [`Request`] / [`Response`] are the
//! newline-delimited JSON messages spoken over the control socket.
//!
//! Clients may spell a fill target either as an object
//! (`{"width":0.5,"height":1,"origin":"top-right"}`) or as a short string
//! (`"0.5 1 top-right"`); the daemon parses both.

use crate::anchor::Anchor;
use crate::geometry::Rect;
use crate::grid::GridCell;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::mpsc;

/// Fraction of the usable screen a window should cover, and where to put it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillTarget {
    /// Fraction of the screen width, `1.0` for full width.
    pub width: f64,
    /// Fraction of the screen height, `1.0` for full height.
    pub height: f64,
    /// Anchor the resized window is placed at.  Defaults to top-left.
    pub origin: Anchor,
}

impl FillTarget {
    pub fn new(width: f64, height: f64, origin: Anchor) -> Self {
        Self {
            width,
            height,
            origin,
        }
    }
}

impl<'de> Deserialize<'de> for FillTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = FillTarget;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "object {{width, height, origin?}} or string \"width height [origin]\"")
            }
            fn visit_map<A>(self, mut map: A) -> Result<FillTarget, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut width = None;
                let mut height = None;
                let mut origin = None;
                while let Some(k) = map.next_key::<String>()? {
                    match k.as_str() {
                        "width" => width = Some(map.next_value()?),
                        "height" => height = Some(map.next_value()?),
                        "origin" => origin = Some(map.next_value()?),
                        _ => {
                            let _: serde::de::IgnoredAny = map.next_value()?;
                        }
                    }
                }
                Ok(FillTarget {
                    width: width.ok_or_else(|| <A::Error as DeError>::missing_field("width"))?,
                    height: height.ok_or_else(|| <A::Error as DeError>::missing_field("height"))?,
                    origin: origin.unwrap_or(Anchor::TopLeft),
                })
            }
            fn visit_str<E>(self, s: &str) -> Result<FillTarget, E>
            where
                E: DeError,
            {
                let parts: Vec<&str> = s.split_whitespace().collect();
                if parts.len() != 2 && parts.len() != 3 {
                    return Err(E::custom(format!(
                        "Fill: expected \"width height [origin]\", got {:?}",
                        s
                    )));
                }
                let width: f64 = parts[0]
                    .parse()
                    .map_err(|_| E::custom("Fill: width must be a number"))?;
                let height: f64 = parts[1]
                    .parse()
                    .map_err(|_| E::custom("Fill: height must be a number"))?;
                let origin = match parts.get(2) {
                    Some(name) => name.parse::<Anchor>().map_err(E::custom)?,
                    None => Anchor::TopLeft,
                };
                Ok(FillTarget {
                    width,
                    height,
                    origin,
                })
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every action the placer can perform.
///
/// Commands that act on "the window" apply to the focused window and do
/// nothing when no window is focused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Move the focused window to an anchor of the usable screen area,
    /// keeping its size.
    MoveTo(Anchor),

    /// Resize the focused window to a fraction of the usable screen area and
    /// place it at the target's origin anchor.
    Fill(FillTarget),

    /// Put the focused window into a grid cell.  The cell is clamped to the
    /// grid first.
    PlaceCell(GridCell),

    /// Snap the focused window to its nearest grid cell.
    SnapToGrid,

    /// Change the grid column count by the given delta (floored at one
    /// column), then re-snap every visible window to the new grid.
    ResizeGrid(i32),

    /// Grow the focused window by one increment of the screen width.
    IncreaseWidth,
    /// Shrink the focused window by one increment of the screen width.
    DecreaseWidth,
    /// Grow the focused window by one increment of the screen height.
    IncreaseHeight,
    /// Shrink the focused window by one increment of the screen height.
    DecreaseHeight,
}

/// A window known to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    /// Host-assigned window id.
    pub id: u64,
    /// Current frame in screen coordinates.
    pub frame: Rect,
    /// Human-readable title, used only for logging.
    #[serde(default)]
    pub title: String,
}

/// One message from a client.
///
/// The client supplies everything the placer needs to know about the
/// screen and its windows with every request; the daemon keeps nothing but
/// the grid configuration between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Usable area of the screen the command acts on (menu bar and dock
    /// already excluded).
    pub screen: Rect,
    /// Visible windows on that screen.
    #[serde(default)]
    pub windows: Vec<WindowInfo>,
    /// Id of the focused window, if any.
    #[serde(default)]
    pub focused: Option<u64>,
    pub command: Command,
}

/// A frame the client should apply to one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: u64,
    pub frame: Rect,
}

/// The daemon's answer to one [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Grid column count after the request was handled.  Absent when the
    /// request never reached the placer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    /// Frames to apply, in the order they were computed.
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl Response {
    pub fn ok(columns: u32, placements: Vec<Placement>) -> Self {
        Self {
            ok: true,
            error: None,
            columns: Some(columns),
            placements,
        }
    }

    pub fn error(columns: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            columns,
            placements: Vec::new(),
        }
    }
}

/// A request travelling from a [`CommandSource`](crate::traits::CommandSource)
/// to the thread that owns the placer, with the channel its response goes
/// back on.
#[derive(Debug)]
pub struct Envelope {
    pub request: Request,
    pub reply: mpsc::Sender<Response>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_commands_from_json() {
        let cmd: Command = serde_json::from_str(r#""SnapToGrid""#).unwrap();
        assert_eq!(cmd, Command::SnapToGrid);
        let cmd: Command = serde_json::from_str(r#""DecreaseHeight""#).unwrap();
        assert_eq!(cmd, Command::DecreaseHeight);
    }

    #[test]
    fn move_to_accepts_anchor_spellings() {
        let a: Command = serde_json::from_str(r#"{"MoveTo":"top-left"}"#).unwrap();
        let b: Command = serde_json::from_str(r#"{"MoveTo":"TopLeft"}"#).unwrap();
        assert_eq!(a, Command::MoveTo(Anchor::TopLeft));
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Command>(r#"{"MoveTo":"nowhere"}"#).is_err());
    }

    #[test]
    fn fill_from_object() {
        let cmd: Command =
            serde_json::from_str(r#"{"Fill":{"width":0.5,"height":1,"origin":"top-right"}}"#)
                .unwrap();
        assert_eq!(cmd, Command::Fill(FillTarget::new(0.5, 1.0, Anchor::TopRight)));
    }

    #[test]
    fn fill_origin_defaults_to_top_left() {
        let cmd: Command = serde_json::from_str(r#"{"Fill":{"width":1,"height":1}}"#).unwrap();
        assert_eq!(cmd, Command::Fill(FillTarget::new(1.0, 1.0, Anchor::TopLeft)));
    }

    #[test]
    fn fill_from_string() {
        let cmd: Command = serde_json::from_str(r#"{"Fill":"0.5 1 right"}"#).unwrap();
        assert_eq!(cmd, Command::Fill(FillTarget::new(0.5, 1.0, Anchor::Right)));
        let cmd: Command = serde_json::from_str(r#"{"Fill":"1 0.5"}"#).unwrap();
        assert_eq!(cmd, Command::Fill(FillTarget::new(1.0, 0.5, Anchor::TopLeft)));
    }

    #[test]
    fn fill_rejects_bad_strings() {
        assert!(serde_json::from_str::<Command>(r#"{"Fill":"half"}"#).is_err());
        assert!(serde_json::from_str::<Command>(r#"{"Fill":"x 1"}"#).is_err());
        assert!(serde_json::from_str::<Command>(r#"{"Fill":"1 1 sideways"}"#).is_err());
    }

    #[test]
    fn place_cell_and_resize_grid() {
        let cmd: Command = serde_json::from_str(
            r#"{"PlaceCell":{"column":1,"row":0,"column_span":2,"row_span":1}}"#,
        )
        .unwrap();
        assert_eq!(cmd, Command::PlaceCell(GridCell::new(1, 0, 2, 1)));
        let cmd: Command = serde_json::from_str(r#"{"ResizeGrid":-1}"#).unwrap();
        assert_eq!(cmd, Command::ResizeGrid(-1));
    }

    #[test]
    fn request_defaults() {
        let req: Request = serde_json::from_str(
            r#"{"screen":{"x":0,"y":25,"width":1440,"height":875},"command":"SnapToGrid"}"#,
        )
        .unwrap();
        assert!(req.windows.is_empty());
        assert_eq!(req.focused, None);
        assert_eq!(req.screen, Rect::new(0.0, 25.0, 1440.0, 875.0));
    }

    #[test]
    fn error_field_only_on_failure() {
        let json = serde_json::to_string(&Response::error(Some(6), "boom")).unwrap();
        assert!(json.contains(r#""ok":false"#));
        assert!(json.contains(r#""error":"boom""#));
        assert!(json.contains(r#""columns":6"#));
        let json = serde_json::to_string(&Response::ok(6, vec![])).unwrap();
        assert!(!json.contains("error"));
    }

    #[test]
    fn columns_omitted_when_unknown() {
        let json = serde_json::to_string(&Response::error(None, "bad request")).unwrap();
        assert!(!json.contains("columns"));
        let back: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(back.columns, None);
    }
}
