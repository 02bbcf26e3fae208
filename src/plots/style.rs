//! Shared colors, fonts, and the density palette.

use plotters::style::RGBColor;

/// Font family for axis labels and legends.
pub const FONT: &str = "sans-serif";
/// Tick label size in pixels.
pub const TICK_SIZE: u32 = 14;
/// Axis description size in pixels.
pub const AXIS_SIZE: u32 = 16;

/// Posterior sample points in trace panels.
pub const SAMPLE_COLOR: RGBColor = RGBColor(31, 119, 180);
/// Histogram bar fill.
pub const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
/// Credible-region shading under a histogram outline.
pub const SHADE_COLOR: RGBColor = RGBColor(178, 178, 178);
/// Chain separators and error-bar whiskers.
pub const MUTED_GREY: RGBColor = RGBColor(128, 128, 128);

/// Viridis control points, evenly spaced over `[0, 1]`.
const VIRIDIS_ANCHORS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Viridis colormap sampled at `t` in `[0, 1]`, interpolating linearly
/// between control points. Out-of-range values clamp.
#[must_use]
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let segments = (VIRIDIS_ANCHORS.len() - 1) as f64;
    let position = t * segments;
    let index = (position.floor() as usize).min(VIRIDIS_ANCHORS.len() - 2);
    let fraction = position - index as f64;

    let low = VIRIDIS_ANCHORS[index];
    let high = VIRIDIS_ANCHORS[index + 1];
    let channel = |a: u8, b: u8| {
        let blended = f64::from(a) + (f64::from(b) - f64::from(a)) * fraction;
        blended.round().clamp(0.0, 255.0) as u8
    };
    RGBColor(
        channel(low[0], high[0]),
        channel(low[1], high[1]),
        channel(low[2], high[2]),
    )
}

/// Color for a normalized point density `t` in `[0, 1]`: the reversed
/// viridis map, so sparse cells render yellow and dense cells purple.
#[must_use]
pub fn density_color(t: f64) -> RGBColor {
    viridis(1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viridis_endpoints_match_the_anchor_table() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
    }

    #[test]
    fn viridis_clamps_out_of_range_input() {
        assert_eq!(viridis(-2.0), viridis(0.0));
        assert_eq!(viridis(3.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn density_color_reverses_the_map() {
        assert_eq!(density_color(0.0), viridis(1.0));
        assert_eq!(density_color(1.0), viridis(0.0));
    }
}
