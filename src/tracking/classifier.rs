//! Fingertip position to direction classification.
//!
//! The camera frame is divided into a central dead zone, two vertical
//! bands and two horizontal bands. Vertical bands are checked first, so a
//! fingertip in a corner resolves to up or down rather than left or right.

use crate::game::Direction;

/// Half-width of the dead zone around the frame center (0.5, 0.5)
pub const DEAD_ZONE: f32 = 0.1;
/// Fingertip above this row signals up
pub const UP_THRESHOLD: f32 = 0.35;
/// Fingertip below this row signals down
pub const DOWN_THRESHOLD: f32 = 0.6;
/// Fingertip left of this column signals left
pub const LEFT_THRESHOLD: f32 = 0.35;
/// Fingertip right of this column signals right
pub const RIGHT_THRESHOLD: f32 = 0.65;

/// Classify a normalized fingertip position into a direction.
///
/// Total over [0,1]x[0,1]; callers clamp detector output into the unit
/// square first. Returns `None` inside the dead zone and in the band
/// between the thresholds.
pub fn classify(x: f32, y: f32) -> Option<Direction> {
    if (x - 0.5).abs() < DEAD_ZONE && (y - 0.5).abs() < DEAD_ZONE {
        return None;
    }

    if y < UP_THRESHOLD {
        Some(Direction::Up)
    } else if y > DOWN_THRESHOLD {
        Some(Direction::Down)
    } else if x < LEFT_THRESHOLD {
        Some(Direction::Left)
    } else if x > RIGHT_THRESHOLD {
        Some(Direction::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone_is_silent() {
        assert_eq!(classify(0.5, 0.5), None);
        assert_eq!(classify(0.45, 0.55), None);
        assert_eq!(classify(0.59, 0.41), None);

        // sweep the whole dead zone
        for i in 0..20 {
            for j in 0..20 {
                let x = 0.41 + i as f32 * 0.009;
                let y = 0.41 + j as f32 * 0.009;
                assert_eq!(classify(x, y), None, "({x}, {y}) should be silent");
            }
        }
    }

    #[test]
    fn test_four_zones() {
        assert_eq!(classify(0.5, 0.1), Some(Direction::Up));
        assert_eq!(classify(0.5, 0.9), Some(Direction::Down));
        assert_eq!(classify(0.1, 0.5), Some(Direction::Left));
        assert_eq!(classify(0.9, 0.5), Some(Direction::Right));
    }

    #[test]
    fn test_vertical_zones_win_in_corners() {
        // up beats both left and right
        assert_eq!(classify(0.1, 0.1), Some(Direction::Up));
        assert_eq!(classify(0.9, 0.1), Some(Direction::Up));
        // down likewise
        assert_eq!(classify(0.1, 0.9), Some(Direction::Down));
        assert_eq!(classify(0.9, 0.9), Some(Direction::Down));
    }

    #[test]
    fn test_up_wins_for_any_column() {
        let mut x = 0.0;
        while x <= 1.0 {
            assert_eq!(classify(x, 0.2), Some(Direction::Up), "x = {x}");
            x += 0.05;
        }
    }

    #[test]
    fn test_band_between_thresholds_is_silent() {
        // outside the dead zone but inside every threshold
        assert_eq!(classify(0.38, 0.5), None);
        assert_eq!(classify(0.62, 0.45), None);
        assert_eq!(classify(0.5, 0.37), None);
    }

    #[test]
    fn test_threshold_boundaries_are_exclusive() {
        assert_eq!(classify(0.35, 0.35), None);
        assert_eq!(classify(0.65, 0.35), None);
        assert_eq!(classify(0.2, 0.6), Some(Direction::Left));
    }
}
