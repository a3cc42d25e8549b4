//! Reconnecting clipped ring fragments along the clip boundary.

use foundation::arena::Arena;
use foundation::math::{EPSILON, point_equal};
use tracing::trace;

use super::{Clip, Direction};
use crate::buffer::BufferPoint;
use crate::stream::Stream;

/// A fragment endpoint, linked twice: once in the subject list (fragment
/// order) and once in the clip list (boundary order).
#[derive(Debug, Clone)]
struct Intersection {
    point: [f64; 2],
    /// Index of the owning fragment; `None` for clip-list nodes.
    segment: Option<usize>,
    other: usize,
    entry: bool,
    visited: bool,
    next: usize,
    prev: usize,
}

impl Intersection {
    fn new(point: [f64; 2], segment: Option<usize>, entry: bool) -> Self {
        Self {
            point,
            segment,
            other: 0,
            entry,
            visited: false,
            next: 0,
            prev: 0,
        }
    }
}

fn pair(nodes: &mut Arena<Intersection>, subject: Intersection, clip: Intersection) -> (usize, usize) {
    let a = nodes.alloc(subject);
    let b = nodes.alloc(clip);
    nodes[a].other = b;
    nodes[b].other = a;
    (a, b)
}

fn link(nodes: &mut Arena<Intersection>, list: &[usize]) {
    let n = list.len();
    for (i, &a) in list.iter().enumerate() {
        let b = list[(i + 1) % n];
        nodes[a].next = b;
        nodes[b].prev = a;
    }
}

/// Emit closed rings built from `segments`, filling the gaps between
/// fragment ends with walks along the boundary of `clip`.
///
/// `start_inside` tells whether the boundary's start point lies inside the
/// unclipped polygon; it seeds the alternating entry/exit flags of the
/// boundary-ordered intersection list.
pub(crate) fn rejoin<S: Stream + ?Sized>(
    clip: &Clip,
    mut segments: Vec<Vec<BufferPoint>>,
    start_inside: bool,
    stream: &mut S,
) {
    let mut nodes = Arena::with_capacity(segments.len() * 4);
    let mut subject = Vec::with_capacity(segments.len() * 2);
    let mut boundary = Vec::with_capacity(segments.len() * 2);

    for (index, segment) in segments.iter_mut().enumerate() {
        if segment.len() <= 1 {
            continue;
        }
        let n = segment.len() - 1;
        let p0 = segment[0];
        if point_equal(p0.xy(), segment[n].xy()) {
            if !p0.is_tagged() && !segment[n].is_tagged() {
                stream.line_start();
                for p in &segment[..n] {
                    stream.point(p.x, p.y, None);
                }
                stream.line_end();
                continue;
            }
            // Keep the two ends of a tagged closed fragment distinct.
            segment[n].x += 2.0 * EPSILON;
        }
        let p1 = segment[n];

        let (a, b) = pair(
            &mut nodes,
            Intersection::new(p0.xy(), Some(index), true),
            Intersection::new(p0.xy(), None, false),
        );
        subject.push(a);
        boundary.push(b);
        let (a, b) = pair(
            &mut nodes,
            Intersection::new(p1.xy(), Some(index), false),
            Intersection::new(p1.xy(), None, true),
        );
        subject.push(a);
        boundary.push(b);
    }

    let Some(&start) = subject.first() else {
        return;
    };
    trace!(
        "rejoining {} clipped fragments (start inside: {start_inside})",
        subject.len() / 2
    );

    boundary.sort_by(|&a, &b| clip.compare_intersection(nodes[a].point, nodes[b].point));
    link(&mut nodes, &subject);
    link(&mut nodes, &boundary);
    let mut inside = start_inside;
    for &i in &boundary {
        inside = !inside;
        nodes[i].entry = inside;
    }

    loop {
        let mut current = start;
        while nodes[current].visited {
            current = nodes[current].next;
            if current == start {
                return;
            }
        }

        let mut is_subject = true;
        let mut points = nodes[current].segment;
        stream.line_start();
        loop {
            let other = nodes[current].other;
            nodes[current].visited = true;
            nodes[other].visited = true;
            if nodes[current].entry {
                if is_subject {
                    if let Some(seg) = points {
                        for p in &segments[seg] {
                            stream.point(p.x, p.y, None);
                        }
                    }
                } else {
                    let to = nodes[nodes[current].next].point;
                    clip.interpolate(Some((nodes[current].point, to)), Direction::Forward, stream);
                }
                current = nodes[current].next;
            } else {
                if is_subject {
                    points = nodes[nodes[current].prev].segment;
                    if let Some(seg) = points {
                        for p in segments[seg].iter().rev() {
                            stream.point(p.x, p.y, None);
                        }
                    }
                } else {
                    let to = nodes[nodes[current].prev].point;
                    clip.interpolate(Some((nodes[current].point, to)), Direction::Backward, stream);
                }
                current = nodes[current].prev;
            }
            current = nodes[current].other;
            points = nodes[current].segment;
            is_subject = !is_subject;
            if nodes[current].visited {
                break;
            }
        }
        stream.line_end();
    }
}

#[cfg(test)]
mod tests {
    use super::rejoin;
    use crate::buffer::BufferPoint;
    use crate::clip::Clip;
    use crate::stream::Recorder;
    use pretty_assertions::assert_eq;

    fn seg(points: &[[f64; 2]]) -> Vec<BufferPoint> {
        points
            .iter()
            .map(|p| BufferPoint {
                x: p[0],
                y: p[1],
                z: None,
            })
            .collect()
    }

    #[test]
    fn nothing_to_rejoin() {
        let mut rec = Recorder::new();
        rejoin(&Clip::antimeridian(), Vec::new(), false, &mut rec);
        assert!(rec.events().is_empty());
    }

    #[test]
    fn closed_untagged_fragment_is_emitted_as_is() {
        let mut rec = Recorder::new();
        let ring = seg(&[[1.0, 1.0], [1.0, 2.0], [2.0, 2.0], [1.0, 1.0]]);
        rejoin(&Clip::rectangle(0.0, 0.0, 10.0, 10.0), vec![ring], false, &mut rec);
        assert_eq!(rec.lines(), vec![vec![[1.0, 1.0], [1.0, 2.0], [2.0, 2.0]]]);
    }

    #[test]
    fn open_fragment_is_closed_along_the_boundary() {
        let mut rec = Recorder::new();
        // Enters through the y1 edge, leaves through the x1 edge.
        let fragment = seg(&[[5.0, 10.0], [5.0, 5.0], [10.0, 5.0]]);
        rejoin(&Clip::rectangle(0.0, 0.0, 10.0, 10.0), vec![fragment], false, &mut rec);
        let lines = rec.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            vec![[5.0, 10.0], [5.0, 5.0], [10.0, 5.0], [10.0, 10.0]]
        );
    }
}
