//! Uniform grid discretization of a bounded real vector space
//!
//! Cells are indexed row-major with the first axis varying fastest.
//! Neighbors are the axis-aligned adjacent cells. An edge is valid when
//! the straight segment between the two cell centers is collision free.

use itertools::izip;
use nalgebra::DVector;
use rand::Rng;

use crate::common::{Abstraction, PlanningError, PlanningResult};
use crate::utils::real_vector::RealVectorSpace;

#[derive(Debug, Clone)]
pub struct GridAbstraction {
    space: RealVectorSpace,
    cells_per_dim: Vec<usize>,
    check_resolution: f64,
}

impl GridAbstraction {
    pub fn new(space: RealVectorSpace, cells_per_dim: Vec<usize>, check_resolution: f64) -> PlanningResult<Self> {
        if space.bounds().len() != cells_per_dim.len() {
            return Err(PlanningError::InvalidParameter(format!(
                "grid has {} axes but the space has {} dimensions",
                cells_per_dim.len(),
                space.bounds().len()
            )));
        }
        let cells_per_dim = cells_per_dim.into_iter().map(|n| n.max(1)).collect();
        Ok(Self {
            space,
            cells_per_dim,
            check_resolution,
        })
    }

    pub fn space(&self) -> &RealVectorSpace {
        &self.space
    }

    fn cell_width(&self, axis: usize) -> f64 {
        let (lo, hi) = self.space.bounds()[axis];
        (hi - lo) / self.cells_per_dim[axis] as f64
    }

    /// Per-axis grid coordinates of a cell
    pub fn coords(&self, cell: usize) -> Vec<usize> {
        let mut rest = cell;
        self.cells_per_dim
            .iter()
            .map(|&n| {
                let c = rest % n;
                rest /= n;
                c
            })
            .collect()
    }

    pub fn cell_from_coords(&self, coords: &[usize]) -> usize {
        coords
            .iter()
            .zip(self.cells_per_dim.iter())
            .rev()
            .fold(0, |acc, (&c, &n)| acc * n + c)
    }

    pub fn cell_center(&self, cell: usize) -> DVector<f64> {
        let coords = self.coords(cell);
        let values: Vec<f64> = izip!(coords.iter(), self.space.bounds().iter(), 0..)
            .map(|(&c, &(lo, _), axis)| lo + (c as f64 + 0.5) * self.cell_width(axis))
            .collect();
        DVector::from_vec(values)
    }
}

impl Abstraction<DVector<f64>> for GridAbstraction {
    fn size(&self) -> usize {
        self.cells_per_dim.iter().product()
    }

    fn cell_of(&self, state: &DVector<f64>) -> usize {
        let coords: Vec<usize> = izip!(state.iter(), self.space.bounds().iter(), self.cells_per_dim.iter())
            .map(|(&v, &(lo, hi), &n)| {
                let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.0 };
                ((t * n as f64).floor().max(0.0) as usize).min(n - 1)
            })
            .collect();
        self.cell_from_coords(&coords)
    }

    fn neighbors(&self, cell: usize) -> Vec<usize> {
        let coords = self.coords(cell);
        let mut result = Vec::with_capacity(2 * coords.len());
        for axis in 0..coords.len() {
            if coords[axis] > 0 {
                let mut c = coords.clone();
                c[axis] -= 1;
                result.push(self.cell_from_coords(&c));
            }
            if coords[axis] + 1 < self.cells_per_dim[axis] {
                let mut c = coords.clone();
                c[axis] += 1;
                result.push(self.cell_from_coords(&c));
            }
        }
        result
    }

    fn is_valid_edge(&self, from: usize, to: usize) -> bool {
        self.space
            .is_segment_valid(&self.cell_center(from), &self.cell_center(to), self.check_resolution)
    }

    fn representative_state(&self, cell: usize) -> DVector<f64> {
        self.cell_center(cell)
    }

    fn supports_sampling(&self) -> bool {
        true
    }

    fn sample_cell_state<R: Rng + ?Sized>(&self, cell: usize, rng: &mut R) -> Option<DVector<f64>> {
        let coords = self.coords(cell);
        let values: Vec<f64> = izip!(coords.iter(), self.space.bounds().iter(), 0..)
            .map(|(&c, &(lo, _), axis)| {
                let width = self.cell_width(axis);
                let low = lo + c as f64 * width;
                if width > 0.0 {
                    rng.gen_range(low..low + width)
                } else {
                    low
                }
            })
            .collect();
        Some(DVector::from_vec(values))
    }
}
