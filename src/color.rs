//! Color conversions between the bridge's integer ranges and display colors
//!
//! The xy mapping implemented here is a linear rescaling of hue and saturation, not a
//! colorimetric conversion. It only has to survive a round-trip through v2 clients.

use crate::models::Color;

mod utils;
pub use utils::*;

/// Largest hue value on the bridge scale
pub const HUE_MAX: u16 = 65535;
/// Largest saturation value on the bridge scale
pub const SAT_MAX: u8 = 254;
/// Largest brightness value on the bridge scale
pub const BRI_MAX: u8 = 254;

/// Color shown for a light that is switched off
pub const OFF: Color = Color::new(30, 30, 30);

fn channel(value: f64) -> u8 {
    (255.0 * value).round() as u8
}

/// Convert a bridge hue/saturation/brightness triplet to RGB
///
/// # Parameters
///
/// * `hue`: hue, 0-65535 mapped to 0-360 degrees
/// * `saturation`: saturation, 0-254
/// * `brightness`: brightness, 0-254
pub fn hsv_to_rgb(hue: u16, saturation: u8, brightness: u8) -> Color {
    let h = f64::from(hue) / f64::from(HUE_MAX) * 360.0;
    let s = (f64::from(saturation) / f64::from(SAT_MAX)).min(1.0);
    let v = (f64::from(brightness) / f64::from(BRI_MAX)).min(1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Color::new(channel(r + m), channel(g + m), channel(b + m))
}

/// Map hue and saturation to xy coordinates
pub fn hue_sat_to_xy(hue: u16, saturation: u8) -> (f64, f64) {
    (
        f64::from(hue) / f64::from(HUE_MAX),
        f64::from(saturation) / f64::from(SAT_MAX),
    )
}

/// Map xy coordinates back to hue and saturation
///
/// Coordinates outside of [0, 1] saturate at the ends of the integer ranges.
pub fn xy_to_hue_sat(x: f64, y: f64) -> (u16, u8) {
    (
        (x * f64::from(HUE_MAX)).round() as u16,
        (y * f64::from(SAT_MAX)).round() as u8,
    )
}
