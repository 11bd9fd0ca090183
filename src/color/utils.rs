//! Color utilities

use super::BRI_MAX;
use crate::models::Color;

/// Base color of the warm white blend used in color temperature mode
const WARM_WHITE: (u8, u8, u8) = (255, 220, 180);

fn scale(component: u8, fraction: f64) -> u8 {
    (f64::from(component) * fraction).round() as u8
}

/// Return the warm white color for a given brightness
///
/// # Parameters
///
/// * `brightness`: brightness on the bridge scale, 0-254
pub fn warm_white(brightness: u8) -> Color {
    let fraction = (f64::from(brightness) / f64::from(BRI_MAX)).min(1.0);
    let (r, g, b) = WARM_WHITE;

    Color::new(scale(r, fraction), scale(g, fraction), scale(b, fraction))
}

/// Convert a bridge brightness to a v2 dimming percentage
pub fn brightness_to_percent(brightness: u8) -> f64 {
    f64::from(brightness) / f64::from(BRI_MAX) * 100.0
}

/// Convert a v2 dimming percentage to a bridge brightness
///
/// Only the lower bound is clamped (to 1). Percentages above 100 are not clamped to the
/// bridge maximum and saturate at `u8::MAX` instead.
pub fn percent_to_brightness(percent: f64) -> u8 {
    (percent / 100.0 * f64::from(BRI_MAX)).round().max(1.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_white() {
        assert_eq!(warm_white(254), Color::new(255, 220, 180));
        assert_eq!(warm_white(127), Color::new(128, 110, 90));
        assert_eq!(warm_white(0), Color::new(0, 0, 0));
    }

    #[test]
    fn test_percent_to_brightness() {
        assert_eq!(percent_to_brightness(50.0), 127);
        assert_eq!(percent_to_brightness(100.0), 254);
        assert_eq!(percent_to_brightness(0.0), 1);
        assert_eq!(percent_to_brightness(-20.0), 1);
    }

    #[test]
    fn test_percent_above_range_is_not_clamped_to_max() {
        assert_eq!(percent_to_brightness(100.2), 255);
        assert_eq!(percent_to_brightness(150.0), 255);
    }

    #[test]
    fn test_percent_round_trip() {
        for bri in 1..=BRI_MAX {
            assert_eq!(percent_to_brightness(brightness_to_percent(bri)), bri);
        }
    }
}
