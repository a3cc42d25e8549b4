//! In-memory line buffer used by the clip stages.

use crate::stream::Stream;

/// A buffered vertex. `z` carries the intersection tag set by clip filters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BufferPoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl BufferPoint {
    pub fn xy(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    pub fn is_tagged(&self) -> bool {
        self.z.is_some_and(|z| z != 0.0)
    }
}

/// Terminal sink that records every line it sees.
///
/// `lineEnd` is a no-op: lines are delimited by the next `lineStart`.
#[derive(Debug, Default)]
pub struct Buffer {
    lines: Vec<Vec<BufferPoint>>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the last line onto the head of the first.
    pub fn rejoin(&mut self) {
        if self.lines.len() > 1 {
            let first = self.lines.remove(0);
            if let Some(last) = self.lines.last_mut() {
                last.extend(first);
            }
        }
    }

    /// Drain the recorded lines.
    pub fn take_lines(&mut self) -> Vec<Vec<BufferPoint>> {
        std::mem::take(&mut self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Stream for Buffer {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        debug_assert!(!self.lines.is_empty(), "buffer point outside of a line");
        if let Some(line) = self.lines.last_mut() {
            line.push(BufferPoint { x, y, z });
        }
    }

    fn line_start(&mut self) {
        self.lines.push(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::Buffer;
    use crate::stream::Stream;

    fn xy(lines: &[Vec<super::BufferPoint>]) -> Vec<Vec<[f64; 2]>> {
        lines
            .iter()
            .map(|l| l.iter().map(|p| p.xy()).collect())
            .collect()
    }

    #[test]
    fn records_lines_in_order() {
        let mut b = Buffer::new();
        b.line_start();
        b.point(0.0, 0.0, None);
        b.point(1.0, 0.0, Some(2.0));
        b.line_end();
        b.line_start();
        b.point(5.0, 5.0, None);
        let lines = b.take_lines();
        assert_eq!(xy(&lines), vec![vec![[0.0, 0.0], [1.0, 0.0]], vec![[5.0, 5.0]]]);
        assert!(lines[0][1].is_tagged());
        assert!(b.is_empty());
    }

    #[test]
    fn rejoin_appends_first_to_last() {
        let mut b = Buffer::new();
        for line in [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]] {
            b.line_start();
            for v in line {
                b.point(v, v, None);
            }
        }
        b.rejoin();
        let lines = xy(&b.take_lines());
        assert_eq!(
            lines,
            vec![
                vec![[3.0, 3.0], [4.0, 4.0]],
                vec![[5.0, 5.0], [6.0, 6.0], [1.0, 1.0], [2.0, 2.0]],
            ]
        );
    }
}
