//! Fixed track color palette.

use std::path::PathBuf;

use crate::models::ColoredTrack;

use super::types::{RenderError, RenderResult};

/// Track colors, assigned by position.
pub const PALETTE: [&str; 10] = [
    "#1b5e20", "#880e4f", "#bf360c", "#4e342e", "#01579b", "#1a237e", "#ff6f00", "#455a64",
    "#33691e", "#ff0000",
];

/// Maximum number of tracks in one animation.
pub const MAX_TRACKS: usize = PALETTE.len();

/// Pair each path with `PALETTE[i]` for its position `i`.
///
/// More paths than colors is rejected rather than wrapped around, so no
/// two tracks in one video ever share a color.
pub fn assign_colors(paths: &[PathBuf]) -> RenderResult<Vec<ColoredTrack>> {
    if paths.len() > MAX_TRACKS {
        return Err(RenderError::TooManyTracks {
            count: paths.len(),
            max: MAX_TRACKS,
        });
    }

    Ok(paths
        .iter()
        .zip(PALETTE)
        .map(|(path, color)| ColoredTrack {
            path: path.clone(),
            color: color.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("/t/{}.gpx", i))).collect()
    }

    #[test]
    fn colors_follow_position() {
        let colored = assign_colors(&paths(3)).unwrap();
        let colors: Vec<_> = colored.iter().map(|c| c.color.as_str()).collect();
        assert_eq!(colors, vec!["#1b5e20", "#880e4f", "#bf360c"]);
    }

    #[test]
    fn reordering_reassigns() {
        let mut p = paths(2);
        let first = assign_colors(&p).unwrap();
        p.reverse();
        let second = assign_colors(&p).unwrap();

        assert_eq!(first[0].path, second[1].path);
        assert_eq!(second[0].color, "#1b5e20");
        assert_eq!(second[1].color, "#880e4f");
    }

    #[test]
    fn full_palette_is_allowed() {
        let colored = assign_colors(&paths(MAX_TRACKS)).unwrap();
        assert_eq!(colored.last().unwrap().color, "#ff0000");
    }

    #[test]
    fn eleven_is_too_many() {
        let err = assign_colors(&paths(11)).unwrap_err();
        assert!(matches!(err, RenderError::TooManyTracks { count: 11, max: 10 }));
    }
}
