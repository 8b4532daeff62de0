use bugsim_data::Vec2;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

#[derive(Clone, Debug, Default)]
/// Uniform grid index over agent positions.
///
/// Uses the offset-array layout: `cell_offsets[i]..cell_offsets[i + 1]`
/// indexes into `agent_indices` for every agent in cell `i`. Indices refer to
/// the position slice the hash was last built from, so they line up with the
/// tick's snapshot order. Positions outside the arena are not indexed.
pub struct SpatialHash {
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub agent_indices: Vec<usize>,
}

impl SpatialHash {
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let cols = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            agent_indices: Vec::new(),
        }
    }

    /// Flat cell index of a position, `None` when non-finite or out of bounds.
    #[inline]
    pub fn get_cell_idx(&self, p: Vec2) -> Option<usize> {
        if !p.is_finite() {
            return None;
        }
        if p.x.abs() > i32::MAX as f64 * self.cell_size || p.y.abs() > i32::MAX as f64 * self.cell_size
        {
            return None;
        }
        let cx = (p.x / self.cell_size).floor() as i32;
        let cy = (p.y / self.cell_size).floor() as i32;
        // The far arena edge belongs to the last cell.
        let cx = if cx == self.cols as i32 && p.x <= self.width { cx - 1 } else { cx };
        let cy = if cy == self.rows as i32 && p.y <= self.height { cy - 1 } else { cy };
        if cx < 0 || cx >= self.cols as i32 || cy < 0 || cy >= self.rows as i32 {
            None
        } else {
            Some((cy as usize * self.cols) + cx as usize)
        }
    }

    pub fn build_parallel(&mut self, positions: &[Vec2]) {
        let cell_count = self.cols * self.rows;

        let atomic_counts: Vec<AtomicUsize> =
            (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
        positions.par_iter().for_each(|&p| {
            if let Some(idx) = self.get_cell_idx(p) {
                atomic_counts[idx].fetch_add(1, AtomicOrdering::Relaxed);
            }
        });
        let counts: Vec<usize> = atomic_counts.into_iter().map(|a| a.into_inner()).collect();

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.agent_indices.clear();
        self.agent_indices.resize(total, 0);

        // Sequential fill keeps per-cell order equal to input order.
        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for (agent_idx, &p) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(p) {
                self.agent_indices[cursor[cell_idx]] = agent_idx;
                cursor[cell_idx] += 1;
            }
        }
    }

    fn cell_range(&self, center: Vec2, radius: f64) -> (i32, i32, i32, i32) {
        let min_cx = ((center.x - radius) / self.cell_size).floor() as i32;
        let max_cx = ((center.x + radius) / self.cell_size).floor() as i32;
        let min_cy = ((center.y - radius) / self.cell_size).floor() as i32;
        let max_cy = ((center.y + radius) / self.cell_size).floor() as i32;
        (
            min_cx.max(0),
            max_cx.min(self.cols as i32 - 1),
            min_cy.max(0),
            max_cy.min(self.rows as i32 - 1),
        )
    }

    /// Calls `callback` for every agent in the cells overlapping the query
    /// square. Callers filter by exact distance.
    pub fn query_callback<F>(&self, center: Vec2, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        let (min_cx, max_cx, min_cy, max_cy) = self.cell_range(center, radius);
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = (cy as usize * self.cols) + cx as usize;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &agent_idx in &self.agent_indices[start..end] {
                    callback(agent_idx);
                }
            }
        }
    }

    #[inline]
    pub fn query_into(&self, center: Vec2, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(center, radius, |idx| result.push(idx));
    }
}
