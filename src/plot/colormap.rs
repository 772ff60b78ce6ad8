//! Plasma colormap used to colour points by depth

/// Evenly spaced samples of the plasma map, dark purple to yellow
const PLASMA_STOPS: [[u8; 3]; 9] = [
    [13, 8, 135],
    [75, 3, 161],
    [125, 3, 168],
    [168, 34, 150],
    [203, 70, 121],
    [229, 107, 93],
    [248, 148, 65],
    [253, 195, 40],
    [240, 249, 33],
];

/// Colour for `t` in `0.0..=1.0`; values outside are clamped
pub fn plasma(t: f32) -> [u8; 3] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (PLASMA_STOPS.len() - 1) as f32;
    let index = (scaled.floor() as usize).min(PLASMA_STOPS.len() - 2);
    let frac = scaled - index as f32;

    let (a, b) = (PLASMA_STOPS[index], PLASMA_STOPS[index + 1]);
    let mut rgb = [0u8; 3];
    for channel in 0..3 {
        let value = a[channel] as f32 + (b[channel] as f32 - a[channel] as f32) * frac;
        rgb[channel] = value.round() as u8;
    }
    rgb
}

/// Map `value` from `min..=max` onto `0.0..=1.0`
///
/// A degenerate range maps everything to the bottom of the scale.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span.abs() <= f32::EPSILON {
        0.0
    } else {
        ((value - min) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(plasma(0.0), PLASMA_STOPS[0]);
        assert_eq!(plasma(1.0), PLASMA_STOPS[8]);
        assert_eq!(plasma(0.5), PLASMA_STOPS[4]);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(plasma(-3.0), plasma(0.0));
        assert_eq!(plasma(7.0), plasma(1.0));
        assert_eq!(plasma(f32::NAN), plasma(0.0));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(1.5, 1.0, 2.0), 0.5);
        assert_eq!(normalize(3.0, 1.0, 2.0), 1.0);
        assert_eq!(normalize(1.0, 1.0, 1.0), 0.0);
    }
}
