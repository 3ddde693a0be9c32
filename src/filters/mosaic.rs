//! Mosaic stylization.
//!
//! `k` distinct seed positions are drawn from a [`SeedSource`]; every pixel
//! joins the cluster of its nearest seed (Euclidean distance) and is
//! replaced by the cluster's mean color.
//!
//! ## Determinism
//!
//! Clusters are indexed by seed order, never by map iteration, so a fixed
//! seed sequence always yields the same partition. When two seeds are
//! equidistant from a pixel the one later in seed order wins.

use ndarray::{Array3, ArrayView3};
use rand::Rng;
use rayon::prelude::*;

use crate::error::{ProcessorError, ProcessorResult};

/// Grid cell, `row` in `[0, height)` and `col` in `[0, width)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position2D {
    pub row: usize,
    pub col: usize,
}

impl Position2D {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Squared Euclidean distance; orders positions the same way the true
    /// distance does, without leaving integer arithmetic.
    pub fn distance_sq(&self, other: &Position2D) -> u64 {
        let dr = self.row.abs_diff(other.row) as u64;
        let dc = self.col.abs_diff(other.col) as u64;
        dr * dr + dc * dc
    }
}

/// Source of candidate seed positions.
///
/// Implemented for every [`rand::Rng`]; tests can implement it directly to
/// script the exact sequence of positions.
pub trait SeedSource {
    /// Next candidate, uniformly within a `height x width` grid.
    fn next_position(&mut self, height: usize, width: usize) -> Position2D;
}

impl<R: Rng> SeedSource for R {
    fn next_position(&mut self, height: usize, width: usize) -> Position2D {
        Position2D::new(self.gen_range(0..height), self.gen_range(0..width))
    }
}

/// Draw `count` distinct positions, rejection-sampling duplicates.
///
/// # Errors
/// [`ProcessorError::InvalidArgument`] if `count` is zero or exceeds the
/// number of cells (no set of distinct seeds could exist).
pub fn draw_seeds<S: SeedSource + ?Sized>(
    height: usize,
    width: usize,
    count: usize,
    source: &mut S,
) -> ProcessorResult<Vec<Position2D>> {
    let cells = height * width;
    if count == 0 || count > cells {
        return Err(ProcessorError::invalid_argument(format!(
            "seed count must be in 1..={cells}, got {count}"
        )));
    }

    let mut seeds: Vec<Position2D> = Vec::with_capacity(count);
    while seeds.len() < count {
        let candidate = source.next_position(height, width);
        if !seeds.contains(&candidate) {
            seeds.push(candidate);
        }
    }
    Ok(seeds)
}

/// Nearest-seed partition of a grid.
#[derive(Clone, Debug)]
pub struct Clustering {
    seeds: Vec<Position2D>,
    height: usize,
    width: usize,
    /// Row-major seed index per cell.
    labels: Vec<usize>,
}

impl Clustering {
    /// Assign every cell of a `height x width` grid to its nearest seed.
    ///
    /// Rows are labelled in parallel with rayon.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if `seeds` is empty or a seed lies
    /// outside the grid.
    pub fn assign(height: usize, width: usize, seeds: Vec<Position2D>) -> ProcessorResult<Self> {
        if seeds.is_empty() {
            return Err(ProcessorError::invalid_argument("at least one seed is required"));
        }
        if let Some(outside) = seeds.iter().find(|p| p.row >= height || p.col >= width) {
            return Err(ProcessorError::invalid_argument(format!(
                "seed {outside:?} lies outside the {width}x{height} grid"
            )));
        }

        let mut labels = vec![0usize; height * width];
        labels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, cells)| {
                for (col, label) in cells.iter_mut().enumerate() {
                    *label = nearest_seed(&seeds, Position2D::new(row, col));
                }
            });

        Ok(Self { seeds, height, width, labels })
    }

    pub fn seeds(&self) -> &[Position2D] {
        &self.seeds
    }

    /// Index into [`seeds`](Self::seeds) of the cluster owning `(row, col)`.
    ///
    /// # Panics
    /// If the position is outside the grid.
    pub fn label(&self, row: usize, col: usize) -> usize {
        assert!(row < self.height && col < self.width, "({row}, {col}) outside grid");
        self.labels[row * self.width + col]
    }

    /// Member positions of every cluster, in seed order, each row-major.
    pub fn clusters(&self) -> Vec<Vec<Position2D>> {
        let mut members = vec![Vec::new(); self.seeds.len()];
        for (i, &label) in self.labels.iter().enumerate() {
            members[label].push(Position2D::new(i / self.width, i % self.width));
        }
        members
    }

    /// Integer-truncated mean `[r, g, b]` of every cluster, in seed order.
    ///
    /// # Errors
    /// [`ProcessorError::InvalidArgument`] if `input` is not
    /// `(height, width, 3)` for this grid.
    pub fn mean_colors(&self, input: ArrayView3<u8>) -> ProcessorResult<Vec<[u8; 3]>> {
        self.check_input(input)?;
        let mut sums = vec![[0u64; 3]; self.seeds.len()];
        let mut counts = vec![0u64; self.seeds.len()];

        for (i, &label) in self.labels.iter().enumerate() {
            let (row, col) = (i / self.width, i % self.width);
            for c in 0..3 {
                sums[label][c] += input[[row, col, c]] as u64;
            }
            counts[label] += 1;
        }

        Ok(sums
            .iter()
            .zip(&counts)
            .map(|(sum, &n)| sum.map(|s| if n == 0 { 0 } else { (s / n) as u8 }))
            .collect())
    }

    /// Paint every cell with its cluster's mean color.
    ///
    /// # Errors
    /// Same as [`mean_colors`](Self::mean_colors).
    pub fn render(&self, input: ArrayView3<u8>) -> ProcessorResult<Array3<u8>> {
        let means = self.mean_colors(input)?;
        Ok(Array3::from_shape_fn((self.height, self.width, 3), |(row, col, c)| {
            means[self.labels[row * self.width + col]][c]
        }))
    }

    fn check_input(&self, input: ArrayView3<u8>) -> ProcessorResult<()> {
        if input.dim() != (self.height, self.width, 3) {
            return Err(ProcessorError::invalid_argument(format!(
                "image is {:?} but clustering covers ({}, {}, 3)",
                input.dim(),
                self.height,
                self.width
            )));
        }
        Ok(())
    }
}

/// Last seed in order among those at minimum distance.
fn nearest_seed(seeds: &[Position2D], cell: Position2D) -> usize {
    let mut best = 0;
    let mut best_dist = u64::MAX;
    for (i, seed) in seeds.iter().enumerate() {
        let d = seed.distance_sq(&cell);
        if d <= best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// Mosaic an RGB u8 image with `seed_count` clusters.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, 3) with RGB u8 values
/// * `seed_count` - Number of clusters (1..=height*width)
/// * `source` - Seed position generator
///
/// # Returns
/// New array of the same shape where each cluster is flattened to its mean
#[tracing::instrument(level = "debug", skip(input, source))]
pub fn mosaic_rgb_u8<S: SeedSource + ?Sized>(
    input: ArrayView3<u8>,
    seed_count: usize,
    source: &mut S,
) -> ProcessorResult<Array3<u8>> {
    let (height, width, _) = input.dim();
    let seeds = draw_seeds(height, width, seed_count, source)?;
    tracing::debug!(height, width, seeds = seeds.len(), "clustering");

    Clustering::assign(height, width, seeds)?.render(input)
}
