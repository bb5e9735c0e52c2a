//! `life_engine`: a bit-packed outer-totalistic cellular automaton engine.
//!
//! Advances large, dense, finite grids (Dirichlet/fixed-zero boundary) by
//! one generation at a time, packing 62 cells per `u64` cluster and
//! sweeping columns with two rotating halo-valid scratch buffers so the
//! inner loop stays branch-light, vectorizable, and cache-resident. See
//! `Grid` for the public surface.

pub mod cluster;
pub mod error;
pub mod grid;
pub mod rule;
pub mod sweep;

pub use error::{LifeError, Result};
pub use grid::Grid;
pub use rule::Rule;
pub use sweep::{StepOptions, DEFAULT_CHUNK_LEN, PARALLEL_THRESHOLD};
