//! Linear color wash between the desk's two zones.

use crate::color::Rgb;

/// Computes the per-segment colors for a span of `segments` lights.
///
/// Index 0 is the left end of the span and carries exactly `left`; the
/// last index carries exactly `right`. Channel values are truncated, not
/// rounded.
pub fn wash(left: Rgb, right: Rgb, segments: usize) -> Vec<Rgb> {
    match segments {
        0 => vec![],
        1 => vec![left],
        _ => (0..segments)
            .map(|index| segment_color(left, right, index, segments))
            .collect(),
    }
}

fn segment_color(left: Rgb, right: Rgb, index: usize, segments: usize) -> Rgb {
    Rgb::from_channels(
        channel_ramp(left.r, right.r, index, segments),
        channel_ramp(left.g, right.g, index, segments),
        channel_ramp(left.b, right.b, index, segments),
    )
}

fn channel_ramp(left: u8, right: u8, index: usize, segments: usize) -> i64 {
    let span = f64::from(left) - f64::from(right);
    let value = f64::from(left) - index as f64 * span / (segments as f64 - 1.0);

    value as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        let colors = wash(Rgb::new(255, 10, 0), Rgb::new(0, 200, 90), 16);

        assert_eq!(colors.len(), 16);
        assert_eq!(colors[0], Rgb::new(255, 10, 0));
        assert_eq!(colors[15], Rgb::new(0, 200, 90));
    }

    #[test]
    fn full_ramp_truncates_per_segment() {
        // 255 -> 0 over 16 segments steps down by exactly 17 per segment.
        let colors = wash(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0), 16);

        for (index, color) in colors.iter().enumerate() {
            let expected = 255 - 17 * index as i64;
            assert_eq!(i64::from(color.r), expected);
            assert_eq!(i64::from(color.g), expected);
            assert_eq!(i64::from(color.b), expected);
        }
    }

    #[test]
    fn truncation_matches_float_math() {
        // 10 -> 255 at segment 1 of 16: 10 + 245/15 = 26.33.. -> 26
        let rising = wash(Rgb::new(10, 0, 0), Rgb::new(255, 0, 0), 16);
        assert_eq!(rising[1].r, 26);

        // 26 -> 12 at segment 1 of 16: 26 - 14/15 = 25.06.. -> 25
        let falling = wash(Rgb::new(26, 0, 0), Rgb::new(12, 0, 0), 16);
        assert_eq!(falling[1].r, 25);
    }

    #[test]
    fn constant_span_stays_constant() {
        let color = Rgb::new(40, 80, 120);
        for segment in wash(color, color, 16) {
            assert_eq!(segment, color);
        }
    }

    #[test]
    fn rising_ramp_is_monotonic() {
        let colors = wash(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255), 16);

        for pair in colors.windows(2) {
            assert!(pair[0].r <= pair[1].r);
        }
    }

    #[test]
    fn degenerate_spans() {
        assert!(wash(Rgb::default(), Rgb::default(), 0).is_empty());

        let single = wash(Rgb::new(9, 9, 9), Rgb::new(1, 1, 1), 1);
        assert_eq!(single, vec![Rgb::new(9, 9, 9)]);
    }
}
