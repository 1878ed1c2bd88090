//! Spatial meshes and implicit operator assembly
//!
//! A mesh decides how cells are numbered as degrees of freedom and how lateral
//! diffusion couples them. Each row of the assembled operator reads
//!
//! $$\left(\frac{C_k}{\Delta t} + B + \sum_{m} c_{km}\right) T_k - \sum_{m} c_{km} T_m$$
//!
//! with $\Delta t = 1 / n_{steps}$ years and $c_{km}$ the diffusive coupling between
//! neighbouring cells `k` and `m`.

use crate::errors::{check_shape, EBMError, EBMResult};
use crate::physical_model::PhysicalModel;
use crate::utils::linear_algebra::BandMatrix;
use ndarray::{Array2, ArrayView2};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Trait for meshes consumed by the discretization
///
/// Fields are indexed `[longitude, latitude]` with extents given by [`Mesh::shape`].
/// The mesh is immutable once built.
pub trait Mesh: Clone + std::fmt::Debug + Send + Sync {
    /// Grid extents `(nx, ny)`
    fn shape(&self) -> (usize, usize);

    /// Number of degrees of freedom
    fn dof(&self) -> usize {
        let (nx, ny) = self.shape();
        nx * ny
    }

    /// Position of cell `(i, j)` in the solution vector
    fn dof_index(&self, i: usize, j: usize) -> usize;

    /// Relative area of each cell
    fn area_weights(&self) -> Array2<f64>;

    /// Assemble the operator for one implicit step of a year split into
    /// `num_steps_year` steps.
    fn assemble_operator(
        &self,
        num_steps_year: usize,
        model: &PhysicalModel,
    ) -> EBMResult<BandMatrix>;

    /// Area-weighted mean of a field
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have the extents of the mesh
    fn aggregate_global(&self, values: ArrayView2<f64>) -> f64 {
        assert_eq!(
            values.dim(),
            self.shape(),
            "field must match the mesh extents"
        );
        let weights = self.area_weights();
        let total: f64 = weights.sum();
        (&weights * &values).sum() / total
    }
}

/// Regular longitude-latitude grid on the unit sphere
///
/// Latitude rows run from the North Pole (`j = 0`) to the South Pole (`j = ny - 1`)
/// inclusive, matching the rows of the insolation table. Longitudes are periodic.
///
/// Longitudes are interleaved in the degree-of-freedom ordering
/// (`0, nx-1, 1, nx-2, ...`) so that the periodic seam does not widen the operator
/// band beyond `2 * ny`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    nx: usize,
    ny: usize,
    lon_position: Vec<usize>,
    /// Northern and southern cell edges of each row, clipped at the poles
    edges: Vec<(f64, f64)>,
}

impl LatLonGrid {
    pub fn new(nx: usize, ny: usize) -> EBMResult<Self> {
        if nx == 0 || ny < 2 {
            return Err(EBMError::InvalidConfiguration(format!(
                "a lat-lon grid needs at least one longitude and two latitude rows, got {}x{}",
                nx, ny
            )));
        }

        let mut lon_position = vec![0; nx];
        for p in 0..nx {
            let i = if p % 2 == 0 { p / 2 } else { nx - 1 - p / 2 };
            lon_position[i] = p;
        }

        let dlat = PI / (ny - 1) as f64;
        let edges = (0..ny)
            .map(|j| {
                let lat = FRAC_PI_2 - j as f64 * dlat;
                (
                    (lat + 0.5 * dlat).min(FRAC_PI_2),
                    (lat - 0.5 * dlat).max(-FRAC_PI_2),
                )
            })
            .collect();

        Ok(Self {
            nx,
            ny,
            lon_position,
            edges,
        })
    }

    /// Latitude spacing in radians
    pub fn dlat(&self) -> f64 {
        PI / (self.ny - 1) as f64
    }

    /// Longitude spacing in radians
    pub fn dlon(&self) -> f64 {
        TAU / self.nx as f64
    }

    /// Latitude of each row centre in radians
    pub fn latitudes(&self) -> Vec<f64> {
        (0..self.ny)
            .map(|j| FRAC_PI_2 - j as f64 * self.dlat())
            .collect()
    }

    /// `(lower, upper)` bandwidths of the assembled operator
    pub fn bandwidths(&self) -> (usize, usize) {
        let reach = match self.nx {
            1 => 1,
            2 => self.ny,
            _ => 2 * self.ny,
        };
        let width = reach.min(self.dof() - 1).max(1);
        (width, width)
    }

    /// $\sin(\phi_{north}) - \sin(\phi_{south})$ for row `j`
    fn row_area(&self, j: usize) -> f64 {
        let (north, south) = self.edges[j];
        north.sin() - south.sin()
    }
}

impl Mesh for LatLonGrid {
    fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    fn dof_index(&self, i: usize, j: usize) -> usize {
        self.lon_position[i] * self.ny + j
    }

    fn area_weights(&self) -> Array2<f64> {
        let dlon = self.dlon();
        Array2::from_shape_fn((self.nx, self.ny), |(_, j)| self.row_area(j) * dlon)
    }

    fn assemble_operator(
        &self,
        num_steps_year: usize,
        model: &PhysicalModel,
    ) -> EBMResult<BandMatrix> {
        if num_steps_year == 0 {
            return Err(EBMError::InvalidConfiguration(
                "the number of steps per year must be positive".to_string(),
            ));
        }
        let shape = self.shape();
        check_shape("physical model", shape, &[model.shape().0, model.shape().1])?;

        let (kl, ku) = self.bandwidths();
        let mut operator = BandMatrix::zeros(self.dof(), kl, ku);

        let diffusion = model.diffusion_coeff();
        let heat_capacity = model.heat_capacity();
        let relaxation = model.radiative_cooling_feedback();
        let steps = num_steps_year as f64;
        let dlat = self.dlat();
        let dlon = self.dlon();

        for i in 0..self.nx {
            for j in 0..self.ny {
                let k = self.dof_index(i, j);
                let (north, south) = self.edges[j];
                let area = self.row_area(j);

                let mut couplings: Vec<(usize, usize, f64)> = Vec::with_capacity(4);
                if j > 0 {
                    couplings.push((i, j - 1, north.cos() / (dlat * area)));
                }
                if j + 1 < self.ny {
                    couplings.push((i, j + 1, south.cos() / (dlat * area)));
                }
                if self.nx > 1 {
                    let midpoint = 0.5 * (north + south);
                    let zonal = (north - south) / (midpoint.cos() * dlon * dlon * area);
                    couplings.push(((i + 1) % self.nx, j, zonal));
                    couplings.push(((i + self.nx - 1) % self.nx, j, zonal));
                }

                let mut diagonal = heat_capacity[[i, j]] * steps + relaxation;
                for (ni, nj, geometric) in couplings {
                    let face = 0.5 * (diffusion[[i, j]] + diffusion[[ni, nj]]);
                    let coupling = face * geometric;
                    diagonal += coupling;
                    operator.add(k, self.dof_index(ni, nj), -coupling)?;
                }
                operator.add(k, k, diagonal)?;
            }
        }

        Ok(operator)
    }
}
