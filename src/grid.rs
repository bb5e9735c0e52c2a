//! The padded cluster grid: construction, cell access, and the public
//! `step` entry point (the sweep engine itself lives in `sweep.rs`).

use crate::cluster::{RuleKernel, CELLS_PER_CLUSTER, INTERIOR_MASK};
use crate::error::{LifeError, Result};
use crate::rule::Rule;
use crate::sweep::{self, StepOptions};
use tracing::{debug, instrument};

/// A finite `height x width` grid of cells evolving under a totalistic
/// rule, with a Dirichlet (fixed-zero) boundary.
///
/// Storage is a column-major array of `u64` clusters, each packing
/// `CELLS_PER_CLUSTER` cells plus two halo bits, with a one-cluster zero
/// border on all four sides. Coordinates are 0-based `(row, col)`.
pub struct Grid {
    height: usize,
    width: usize,
    rule: Rule,
    kernel: RuleKernel,
    /// Rows per cluster column, including the top/bottom border (`height + 2`).
    stride: usize,
    /// Active cluster columns covering the logical width (`ceil(width / C)`).
    active_cols: usize,
    /// Cell bits to clear in the rightmost active column after every step.
    trailing_clear_mask: u64,
    /// Column-major storage, `stride * (active_cols + 2)` words.
    clusters: Vec<u64>,
    scratch_a: Vec<u64>,
    scratch_b: Vec<u64>,
}

impl Grid {
    /// Construct a logical `height x width` grid under `rule`. Both
    /// dimensions must be positive.
    #[instrument(skip(rule), fields(%rule))]
    pub fn new(height: usize, width: usize, rule: Rule) -> Result<Grid> {
        if height == 0 || width == 0 {
            return Err(LifeError::Configuration(format!(
                "grid dimensions must be positive, got {height}x{width}"
            )));
        }
        let cells_per_cluster = CELLS_PER_CLUSTER as usize;
        let active_cols = width.div_ceil(cells_per_cluster);
        let stride = height + 2;
        let total_cols = active_cols + 2;

        let remainder = width % cells_per_cluster;
        let valid_in_last_col = if remainder == 0 { cells_per_cluster } else { remainder };
        let keep_mask = ((1u64 << valid_in_last_col) - 1) << 1;
        let trailing_clear_mask = INTERIOR_MASK & !keep_mask;

        debug!(height, width, active_cols, stride, "constructed grid");

        Ok(Grid {
            height,
            width,
            rule,
            kernel: RuleKernel::for_rule(rule),
            stride,
            active_cols,
            trailing_clear_mask,
            clusters: vec![0u64; stride * total_cols],
            scratch_a: vec![0u64; stride],
            scratch_b: vec![0u64; stride],
        })
    }

    /// Logical width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The rule this grid evolves under.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.height || col >= self.width {
            return Err(LifeError::Bounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(())
    }

    fn locate(&self, row: usize, col: usize) -> (usize, u32) {
        let cluster_row = row + 1;
        let cluster_col = col / CELLS_PER_CLUSTER as usize + 1;
        let bit_pos = (col % CELLS_PER_CLUSTER as usize) as u32 + 1;
        (cluster_col * self.stride + cluster_row, bit_pos)
    }

    /// Read the cell at `(row, col)`, 0-based.
    pub fn get(&self, row: usize, col: usize) -> Result<bool> {
        self.check_bounds(row, col)?;
        let (idx, bit) = self.locate(row, col);
        Ok((self.clusters[idx] >> bit) & 1 != 0)
    }

    /// Write the cell at `(row, col)`, 0-based.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<()> {
        self.check_bounds(row, col)?;
        let (idx, bit) = self.locate(row, col);
        if alive {
            self.clusters[idx] |= 1u64 << bit;
        } else {
            self.clusters[idx] &= !(1u64 << bit);
        }
        Ok(())
    }

    /// Blit a rectangular boolean bitmap into the grid with its top-left
    /// corner at `(origin_row, origin_col)`. This is the one primitive
    /// pattern-insertion collaborators need; it is not a shape catalog —
    /// it is implemented purely in terms of `set`. The whole footprint is
    /// bounds-checked before any cell is written, so an `Err` leaves the
    /// grid untouched rather than half-patched.
    pub fn blit(&mut self, origin_row: usize, origin_col: usize, pattern: &[&[bool]]) -> Result<()> {
        for (dr, row) in pattern.iter().enumerate() {
            if let Some(last_dc) = row.len().checked_sub(1) {
                self.check_bounds(origin_row + dr, origin_col + last_dc)?;
            }
        }
        for (dr, row) in pattern.iter().enumerate() {
            for (dc, &alive) in row.iter().enumerate() {
                self.set(origin_row + dr, origin_col + dc, alive)
                    .expect("footprint already bounds-checked");
            }
        }
        Ok(())
    }

    /// Advance the grid by one generation.
    #[instrument(skip(self), fields(height = self.height, width = self.width))]
    pub fn step(&mut self, opts: StepOptions) {
        sweep::run(
            &mut self.clusters,
            &mut self.scratch_a,
            &mut self.scratch_b,
            self.stride,
            self.active_cols,
            self.height,
            &self.kernel,
            self.trailing_clear_mask,
            opts,
        );
        debug_assert!(self.border_is_zero(), "Dirichlet border must stay zero");
    }

    /// Check that the one-cluster zero border and any padding bits beyond
    /// the logical width are still zero. Only ever invoked through
    /// `debug_assert!`, which elides the call in release builds via its
    /// own internal `cfg!(debug_assertions)` check — this method itself
    /// must stay unconditionally compiled so that elision works.
    fn border_is_zero(&self) -> bool {
        let total_cols = self.active_cols + 2;
        for col in [0, total_cols - 1] {
            let start = col * self.stride;
            if self.clusters[start..start + self.stride].iter().any(|&w| w != 0) {
                return false;
            }
        }
        for row in [0, self.stride - 1] {
            for col in 1..=self.active_cols {
                if self.clusters[col * self.stride + row] != 0 {
                    return false;
                }
            }
        }
        let last_col_start = self.active_cols * self.stride;
        let last_col = &self.clusters[last_col_start..last_col_start + self.stride];
        last_col
            .iter()
            .all(|&w| w & self.trailing_clear_mask == 0)
    }
}
