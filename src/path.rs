//! Bounding-box extraction over SVG path data.
//!
//! This deliberately handles only the command subset the upstream layer
//! documents use (`m`, `C`/`c`, `l`, `z`), with endpoint-only bounds for
//! cubics. It is not a general path-grammar consumer.

use crate::errors::{Error, Result};
use crate::geometry::{BoundingBox, BoundingBoxBuilder};

/// Token index always interpreted as an absolute position: a path's first
/// coordinate pair follows its leading command letter, and a path always
/// begins with an absolute moveto whatever that letter's mode says.
const FORCE_ABSOLUTE_INDEX: usize = 1;

/// Coordinate pairs per cubic segment: two control points, then the endpoint.
const CUBIC_PAIRS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Absolute,
    Relative,
}

/// Parse state threaded through the token loop.
///
/// The active command persists across repeated coordinate pairs until a
/// new recognized letter token appears; the mode is derived from it.
#[derive(Debug, Clone)]
struct PathCommandState {
    cursor: (f32, f32),
    command: Option<char>,
    mode: Mode,
    // position within a cubic's control/control/endpoint cycle
    cubic_phase: u8,
}

impl PathCommandState {
    fn new() -> Self {
        Self {
            cursor: (0., 0.),
            command: None,
            mode: Mode::Absolute,
            cubic_phase: 0,
        }
    }

    /// Apply a command letter token. Unrecognized letters leave the state
    /// untouched; a diagnostic is their only effect.
    fn set_command(&mut self, letter: char) {
        match letter {
            'm' | 'l' | 'c' => self.mode = Mode::Relative,
            'C' => self.mode = Mode::Absolute,
            'z' => return, // close; consumes no coordinates
            other => {
                tracing::warn!("unrecognized path command '{other}'");
                return;
            }
        }
        self.command = Some(letter);
        self.cubic_phase = 0;
    }

    /// Step the cubic cycle for one coordinate pair; returns true when the
    /// pair is the on-curve endpoint (always true outside a cubic).
    fn cubic_step(&mut self) -> bool {
        if matches!(self.command, Some('C') | Some('c')) {
            self.cubic_phase = (self.cubic_phase + 1) % CUBIC_PAIRS;
            self.cubic_phase == 0
        } else {
            true
        }
    }
}

/// Split a coordinate token into exactly two comma-separated floats.
fn parse_pair(token: &str, pos: usize) -> Result<(f32, f32)> {
    let bad = || Error::PathSyntax {
        token: token.to_string(),
        pos,
    };
    let mut parts = token.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => {
            let x = x.parse().map_err(|_| bad())?;
            let y = y.parse().map_err(|_| bad())?;
            Ok((x, y))
        }
        _ => Err(bad()),
    }
}

/// The sequence of cursor positions visited by the given path data.
///
/// Tokens are whitespace-separated; a single-character token is a command
/// letter, anything else must be an `x,y` coordinate pair. Control points
/// of cubic segments never move the cursor and are not reported.
pub fn path_points(data: &str) -> Result<Vec<(f32, f32)>> {
    let mut state = PathCommandState::new();
    let mut points = Vec::new();

    for (pos, token) in data.split_whitespace().enumerate() {
        if token.len() == 1 {
            state.set_command(token.chars().next().expect("len checked"));
            continue;
        }
        let (x, y) = parse_pair(token, pos)?;
        if !state.cubic_step() {
            tracing::debug!("skipping control point '{token}'");
            continue;
        }
        state.cursor = if pos == FORCE_ABSOLUTE_INDEX || state.mode == Mode::Absolute {
            (x, y)
        } else {
            (state.cursor.0 + x, state.cursor.1 + y)
        };
        points.push(state.cursor);
    }
    Ok(points)
}

/// Bounding box of every cursor position the path data visits, or `None`
/// for data which yields no positions at all.
pub fn path_bbox(data: &str) -> Result<Option<BoundingBox>> {
    let mut bb = BoundingBoxBuilder::new();
    for point in path_points(data)? {
        bb.point(point);
    }
    Ok(bb.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_moveto_lineto() {
        let points = path_points("m 10,20 5,5 l -1,2").unwrap();
        // first pair is forced absolute; the rest accumulate relative
        assert_eq!(points, vec![(10., 20.), (15., 25.), (14., 27.)]);
    }

    #[test]
    fn test_bbox_rect_path() {
        let bbox = path_bbox("M 0,0 L 10,0 L 10,10 L 0,10 Z").unwrap();
        assert_eq!(bbox, Some(BoundingBox::new(0., 0., 10., 10.)));
    }

    #[test]
    fn test_bbox_absolute_minmax() {
        // for absolute-only data the box is the component-wise min/max
        // of exactly the listed points
        for (pd, exp) in [
            // control points don't count, only the cubic endpoint
            ("C 1,2 5,-3 4,10", Some(BoundingBox::new(4., 10., 4., 10.))),
            ("M 1,2 M 5,-3 M 4,10", Some(BoundingBox::new(1., -3., 5., 10.))),
            ("M 7,7", Some(BoundingBox::new(7., 7., 7., 7.))),
        ] {
            assert_eq!(path_bbox(pd).unwrap(), exp, "failed for path: {pd}");
        }
    }

    #[test]
    fn test_bbox_close_only() {
        // 'z' with no prior coordinates leaves the accumulator unset
        assert_eq!(path_bbox("z").unwrap(), None);
        assert_eq!(path_bbox("").unwrap(), None);
    }

    #[test]
    fn test_bbox_idempotent() {
        let pd = "m 3,4 c 1,9 2,9 3,1 l -10,2";
        assert_eq!(path_bbox(pd).unwrap(), path_bbox(pd).unwrap());
    }

    #[test]
    fn test_relative_order_dependence() {
        // commuting two relative steps moves the intermediate cursor and
        // therefore the box
        let a = path_bbox("l 0,0 10,0 -5,5").unwrap();
        let b = path_bbox("l 0,0 -5,5 10,0").unwrap();
        assert_eq!(a, Some(BoundingBox::new(0., 0., 10., 5.)));
        assert_eq!(b, Some(BoundingBox::new(-5., 0., 5., 5.)));
        assert_ne!(a, b);
    }

    #[test]
    fn test_moveto_is_relative() {
        // 'm' is treated as relative throughout; only the leading pair is
        // pinned absolute
        let points = path_points("m 5,5 m 2,2 m 2,2").unwrap();
        assert_eq!(points, vec![(5., 5.), (7., 7.), (9., 9.)]);
    }

    #[test]
    fn test_cubic_endpoints_only() {
        let points = path_points("m 5,5 c 1,80 2,80 3,0").unwrap();
        assert_eq!(points, vec![(5., 5.), (8., 5.)]);

        // repeated segments keep cycling control/control/endpoint
        let points = path_points("m 0,0 c 0,9 1,9 2,0 0,9 1,9 2,0").unwrap();
        assert_eq!(points, vec![(0., 0.), (2., 0.), (4., 0.)]);

        // absolute variant sets rather than adds the endpoint
        let points = path_points("m 5,5 C 0,80 1,80 30,40").unwrap();
        assert_eq!(points, vec![(5., 5.), (30., 40.)]);
    }

    #[test]
    fn test_unknown_command_keeps_mode() {
        // 'Q' is not in the command table; mode stays relative from 'm'
        let points = path_points("m 1,1 2,2 Q 3,3").unwrap();
        assert_eq!(points, vec![(1., 1.), (3., 3.), (6., 6.)]);

        // ...and stays absolute when nothing has changed it
        let points = path_points("M 1,1 M 2,2").unwrap();
        assert_eq!(points, vec![(1., 1.), (2., 2.)]);
    }

    #[test]
    fn test_malformed_tokens() {
        for pd in ["M 0,0 L 10", "m 1,2,3", "m a,b", "m 1,2 3,x"] {
            assert!(path_bbox(pd).is_err(), "should fail: {pd}");
        }

        // the error carries the offending token and its index
        match path_points("M 0,0 L 10") {
            Err(Error::PathSyntax { token, pos }) => {
                assert_eq!(token, "10");
                assert_eq!(pos, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
