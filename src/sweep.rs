//! The column-sweep engine: advances every active cluster column by one
//! generation using two rotating halo-valid scratch columns, per
//! spec.md §4.4.
//!
//! Phase 0 primes scratch column `A` with a halo-valid copy of cluster
//! column 1. Phase 1 walks columns `2..=P`: it writes the kernel result
//! for column `j-1` (read only from `A`), then prepares `B` as a
//! halo-valid copy of column `j` (read only from `A` and the
//! not-yet-touched columns `j` and `j+1`), then rotates `A`/`B`. Phase 2
//! finalizes the last active column `P` from `A` and masks off any
//! trailing bits beyond the logical width. No cell read by a sub-step is
//! written by that same sub-step, which is what authorizes both SIMD
//! vectorization within a chunk and parallel execution across chunks.

use crate::cluster::{halo, RuleKernel};
use rayon::prelude::*;

/// Options controlling one call to `Grid::step`.
#[derive(Clone, Copy, Debug)]
pub struct StepOptions {
    /// Row-chunk size; each chunk is an independent schedulable unit.
    pub chunk_len: usize,
    /// `None` means "auto": parallel iff `height > PARALLEL_THRESHOLD`.
    pub parallel: Option<bool>,
}

/// Grids taller than this many rows default to parallel stepping.
pub const PARALLEL_THRESHOLD: usize = 1024;

/// Default row-chunk length: large enough to amortize scheduling, small
/// enough that a chunk's scratch stays L1-resident.
pub const DEFAULT_CHUNK_LEN: usize = 64;

impl Default for StepOptions {
    fn default() -> Self {
        StepOptions {
            chunk_len: DEFAULT_CHUNK_LEN,
            parallel: None,
        }
    }
}

#[inline]
fn column(buf: &[u64], stride: usize, col: usize) -> &[u64] {
    &buf[col * stride..(col + 1) * stride]
}

#[inline]
fn column_mut(buf: &mut [u64], stride: usize, col: usize) -> &mut [u64] {
    &mut buf[col * stride..(col + 1) * stride]
}

/// Write `dest[1..=height] = kernel(a[r-1], a[r], a[r+1])`, optionally
/// clearing `trailing_clear` from every written word (used only for the
/// rightmost active column, to zero cells beyond the logical width).
fn kernel_sweep(
    dest: &mut [u64],
    a: &[u64],
    height: usize,
    kernel: &RuleKernel,
    chunk_len: usize,
    parallel: bool,
    trailing_clear: Option<u64>,
) {
    let compute = |r: usize| {
        let mut v = kernel.apply(a[r - 1], a[r], a[r + 1]);
        if let Some(clear) = trailing_clear {
            v &= !clear;
        }
        v
    };
    let active = &mut dest[1..=height];
    if parallel {
        active
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = 1 + chunk_idx * chunk_len;
                for (k, slot) in chunk.iter_mut().enumerate() {
                    *slot = compute(base + k);
                }
            });
    } else {
        for (idx, slot) in active.iter_mut().enumerate() {
            *slot = compute(idx + 1);
        }
    }
}

/// Write `dest[1..=height] = halo(left[r], center[r], right[r])`.
fn halo_sweep(
    dest: &mut [u64],
    left: &[u64],
    center: &[u64],
    right: &[u64],
    height: usize,
    chunk_len: usize,
    parallel: bool,
) {
    let compute = |r: usize| halo(left[r], center[r], right[r]);
    let active = &mut dest[1..=height];
    if parallel {
        active
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = 1 + chunk_idx * chunk_len;
                for (k, slot) in chunk.iter_mut().enumerate() {
                    *slot = compute(base + k);
                }
            });
    } else {
        for (idx, slot) in active.iter_mut().enumerate() {
            *slot = compute(idx + 1);
        }
    }
}

/// Advance every active cluster column by one generation.
///
/// `clusters` is the grid's padded column-major cluster storage
/// (`stride * (active_cols + 2)` words); `scratch_a`/`scratch_b` are the
/// two rotating column buffers (`stride` words each). `trailing_clear_mask`
/// has the cell bits beyond logical width `n` set within the rightmost
/// active column; it is 0 when `n` is a multiple of `C = 62`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run(
    clusters: &mut [u64],
    scratch_a: &mut [u64],
    scratch_b: &mut [u64],
    stride: usize,
    active_cols: usize,
    height: usize,
    kernel: &RuleKernel,
    trailing_clear_mask: u64,
    opts: StepOptions,
) {
    let chunk_len = opts.chunk_len.max(1);
    let parallel = opts.parallel.unwrap_or(height > PARALLEL_THRESHOLD);

    // Phase 0: prime A as a halo-valid copy of cluster column 1.
    {
        let col0 = column(clusters, stride, 0);
        let col1 = column(clusters, stride, 1);
        let col2 = column(clusters, stride, 2);
        halo_sweep(scratch_a, col0, col1, col2, height, chunk_len, parallel);
    }

    let mut a: &mut [u64] = scratch_a;
    let mut b: &mut [u64] = scratch_b;

    // Phase 1: interior sweep, j = 2..=active_cols.
    for j in 2..=active_cols {
        {
            let dest = column_mut(clusters, stride, j - 1);
            kernel_sweep(dest, a, height, kernel, chunk_len, parallel, None);
        }
        {
            let col_j = column(clusters, stride, j);
            let col_j1 = column(clusters, stride, j + 1);
            halo_sweep(b, a, col_j, col_j1, height, chunk_len, parallel);
        }
        std::mem::swap(&mut a, &mut b);
    }

    // Phase 2: finalize the rightmost active column.
    {
        let dest = column_mut(clusters, stride, active_cols);
        kernel_sweep(
            dest,
            a,
            height,
            kernel,
            chunk_len,
            parallel,
            Some(trailing_clear_mask),
        );
    }
}
