/// Viridis-style sequential colormap, anchored at nine evenly spaced control
/// colors and linearly interpolated between them.
const ANCHORS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 45, 123),
    (59, 82, 139),
    (44, 114, 142),
    (33, 145, 140),
    (39, 173, 129),
    (94, 201, 98),
    (170, 220, 50),
    (253, 231, 37),
];

/// Sample the colormap at `t` in [0, 1]; out-of-range values are clamped.
pub fn viridis(t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (ANCHORS.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    if lower >= ANCHORS.len() - 1 {
        return ANCHORS[ANCHORS.len() - 1];
    }
    let frac = scaled - lower as f64;
    let (r0, g0, b0) = ANCHORS[lower];
    let (r1, g1, b1) = ANCHORS[lower + 1];
    (
        lerp(r0, r1, frac),
        lerp(g0, g1, frac),
        lerp(b0, b1, frac),
    )
}

pub fn to_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_anchors() {
        assert_eq!(viridis(0.0), (68, 1, 84));
        assert_eq!(viridis(1.0), (253, 231, 37));
        assert_eq!(viridis(-0.5), viridis(0.0));
        assert_eq!(viridis(1.5), viridis(1.0));
    }

    #[test]
    fn lightness_increases_monotonically() {
        let luma = |(r, g, b): (u8, u8, u8)| {
            0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
        };
        let mut prev = luma(viridis(0.0));
        for i in 1..=10 {
            let next = luma(viridis(i as f64 / 10.0));
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex((68, 1, 84)), "#440154");
        assert_eq!(to_hex((253, 231, 37)), "#fde725");
    }
}
