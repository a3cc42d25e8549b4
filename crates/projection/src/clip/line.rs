//! Parametric (Liang–Barsky) segment clipping against an axis-aligned box.

/// Clip the segment `a → b` to `[x0, x1] × [y0, y1]`.
///
/// Walks the four slabs, narrowing the entry/exit parameters `t0 ≤ t1` on the
/// segment. Returns the clipped endpoints, or `None` when the interval
/// becomes empty. Endpoints already inside are returned bit-for-bit.
pub fn clip_line(
    a: [f64; 2],
    b: [f64; 2],
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
) -> Option<([f64; 2], [f64; 2])> {
    let [ax, ay] = a;
    let [bx, by] = b;
    let dx = bx - ax;
    let dy = by - ay;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    // Each slab is `q / p` with `p` the direction component; `lower` marks
    // the min edge of the slab.
    let slabs = [
        (x0 - ax, dx, true),
        (x1 - ax, dx, false),
        (y0 - ay, dy, true),
        (y1 - ay, dy, false),
    ];

    for (r, d, lower) in slabs {
        if d == 0.0 {
            // Parallel to this edge: reject if outside it.
            if (lower && r > 0.0) || (!lower && r < 0.0) {
                return None;
            }
            continue;
        }
        let r = r / d;
        // Entering the slab when moving towards increasing coordinate on the
        // lower edge, or decreasing on the upper edge.
        let entering = (d > 0.0) == lower;
        if entering {
            if r > t1 {
                return None;
            }
            if r > t0 {
                t0 = r;
            }
        } else {
            if r < t0 {
                return None;
            }
            if r < t1 {
                t1 = r;
            }
        }
    }

    let a = if t0 > 0.0 {
        [ax + t0 * dx, ay + t0 * dy]
    } else {
        a
    };
    let b = if t1 < 1.0 {
        [ax + t1 * dx, ay + t1 * dy]
    } else {
        b
    };
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::clip_line;

    #[test]
    fn inside_segment_is_untouched() {
        let a = [1.0, 1.0];
        let b = [2.0, 3.0];
        assert_eq!(clip_line(a, b, 0.0, 0.0, 10.0, 10.0), Some((a, b)));
    }

    #[test]
    fn crossing_segment_is_trimmed() {
        let (a, b) = clip_line([-5.0, 5.0], [15.0, 5.0], 0.0, 0.0, 10.0, 10.0).expect("visible");
        assert_eq!(a, [0.0, 5.0]);
        assert_eq!(b, [10.0, 5.0]);
    }

    #[test]
    fn reversed_direction_is_trimmed() {
        let (a, b) = clip_line([15.0, 5.0], [5.0, 5.0], 0.0, 0.0, 10.0, 10.0).expect("visible");
        assert_eq!(a, [10.0, 5.0]);
        assert_eq!(b, [5.0, 5.0]);
    }

    #[test]
    fn outside_segment_is_rejected() {
        assert_eq!(clip_line([11.0, 0.0], [12.0, 10.0], 0.0, 0.0, 10.0, 10.0), None);
        assert_eq!(clip_line([-1.0, 11.0], [11.0, 20.0], 0.0, 0.0, 10.0, 10.0), None);
    }

    #[test]
    fn vertical_segment_outside_is_rejected() {
        assert_eq!(clip_line([-1.0, 0.0], [-1.0, 10.0], 0.0, 0.0, 10.0, 10.0), None);
    }

    #[test]
    fn diagonal_corner_cut() {
        let (a, b) = clip_line([-5.0, 5.0], [5.0, -5.0], 0.0, 0.0, 10.0, 10.0).expect("touches");
        assert_eq!(a, [0.0, 0.0]);
        assert_eq!(b, [0.0, 0.0]);
    }
}
