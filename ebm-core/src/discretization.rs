//! Implicit time stepping of the annual cycle
//!
//! Each step solves the backward Euler update
//!
//! $$\left(\frac{C}{\Delta t} + B - \nabla \cdot D \nabla\right) T^{t} = \frac{C}{\Delta t} T^{t-1} + F^{t} - A$$
//!
//! The operator on the left does not change during a run, so it is factorized once at
//! construction and every step only performs the triangular solves. The previous
//! temperature of step `0` is the last step of the stored annual cycle, so repeated
//! calls to [`Discretization::run_year`] continue the simulation year after year.

use crate::errors::{EBMError, EBMResult};
use crate::mesh::Mesh;
use crate::physical_model::PhysicalModel;
use crate::utils::linear_algebra::BandLu;
use log::{debug, info};
use nalgebra::DVector;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Temperature used to seed every cell and step of the annual cycle (°C)
pub const INITIAL_TEMPERATURE: f64 = 5.0;

/// Factorized implicit operator plus the state of the annual cycle.
///
/// The discretization owns its model. The CO2 concentration can only be changed
/// through [`Discretization::set_co2_concentration`], which needs exclusive access and
/// therefore cannot overlap with a step.
#[derive(Debug, Clone)]
pub struct Discretization<M: Mesh> {
    mesh: M,
    model: PhysicalModel,
    num_steps_year: usize,
    factors: BandLu,
    /// $C_k / \Delta t$ in degree-of-freedom order
    capacity_over_dt: DVector<f64>,
    /// `[dof, num_steps_year]`
    annual_temperature: Array2<f64>,
    rhs: DVector<f64>,
    last_rhs: DVector<f64>,
    solution: DVector<f64>,
}

impl<M: Mesh> Discretization<M> {
    /// Assemble and factorize the operator for `(mesh, model, num_steps_year)`.
    pub fn new(mesh: M, model: PhysicalModel, num_steps_year: usize) -> EBMResult<Self> {
        if num_steps_year == 0 {
            return Err(EBMError::InvalidConfiguration(
                "the number of steps per year must be positive".to_string(),
            ));
        }
        let (nx, ny) = mesh.shape();
        if model.shape() != (nx, ny) {
            return Err(EBMError::ShapeMismatch {
                field: "physical model".to_string(),
                expected: format!("{:?}", [nx, ny]),
                found: format!("{:?}", [model.shape().0, model.shape().1]),
            });
        }

        let dof = mesh.dof();
        let operator = mesh.assemble_operator(num_steps_year, &model)?;
        if operator.size() != dof {
            return Err(EBMError::ShapeMismatch {
                field: "operator".to_string(),
                expected: format!("{} rows", dof),
                found: format!("{} rows", operator.size()),
            });
        }
        let (kl, ku) = operator.bandwidths();
        debug!(
            "Factorizing operator with {} degrees of freedom (lower={}, upper={})",
            dof, kl, ku
        );
        let factors = operator.factorize()?;

        let heat_capacity = model.heat_capacity();
        let mut capacity_over_dt = DVector::zeros(dof);
        for i in 0..nx {
            for j in 0..ny {
                capacity_over_dt[mesh.dof_index(i, j)] =
                    heat_capacity[[i, j]] * num_steps_year as f64;
            }
        }

        info!(
            "Discretization ready: {}x{} grid, {} steps per year",
            nx, ny, num_steps_year
        );

        Ok(Self {
            mesh,
            model,
            num_steps_year,
            factors,
            capacity_over_dt,
            annual_temperature: Array2::from_elem((dof, num_steps_year), INITIAL_TEMPERATURE),
            rhs: DVector::zeros(dof),
            last_rhs: DVector::zeros(dof),
            solution: DVector::zeros(dof),
        })
    }

    /// Forcing slice used by step `t`.
    ///
    /// When the model carries a different number of forcing steps than the annual
    /// cycle, step `t` maps onto slice `floor(t * ntimesteps / num_steps_year)`.
    pub fn forcing_index(&self, t: usize) -> usize {
        t * self.model.ntimesteps() / self.num_steps_year
    }

    /// Advance step `t` of the annual cycle and return the new temperatures in
    /// degree-of-freedom order.
    pub fn step(&mut self, t: usize) -> EBMResult<ArrayView1<f64>> {
        if t >= self.num_steps_year {
            return Err(EBMError::StepOutOfRange {
                step: t,
                num_steps: self.num_steps_year,
            });
        }
        let previous = if t == 0 { self.num_steps_year - 1 } else { t - 1 };

        std::mem::swap(&mut self.rhs, &mut self.last_rhs);
        let forcing_index = self.forcing_index(t);
        let forcing = self.model.solar_forcing();
        let cooling = self.model.radiative_cooling_co2();
        let (nx, ny) = self.mesh.shape();
        for i in 0..nx {
            for j in 0..ny {
                self.rhs[self.mesh.dof_index(i, j)] = forcing[[i, j, forcing_index]] - cooling;
            }
        }

        for k in 0..self.solution.len() {
            self.solution[k] =
                self.capacity_over_dt[k] * self.annual_temperature[[k, previous]] + self.rhs[k];
        }
        self.factors.solve_in_place(&mut self.solution);

        let mut column = self.annual_temperature.column_mut(t);
        for (target, value) in column.iter_mut().zip(self.solution.iter()) {
            *target = *value;
        }
        Ok(self.annual_temperature.column(t))
    }

    /// Advance every step of one year in order.
    pub fn run_year(&mut self) -> EBMResult<()> {
        for t in 0..self.num_steps_year {
            self.step(t)?;
        }
        Ok(())
    }

    /// Update the CO2 concentration of the owned model.
    ///
    /// Only the right-hand side of later steps changes; the factors are kept.
    pub fn set_co2_concentration(&mut self, co2_ppm: f64) -> EBMResult<()> {
        self.model.set_co2_concentration(co2_ppm)?;
        debug!(
            "CO2 set to {} ppm (radiative cooling {:.4} W/m^2)",
            co2_ppm,
            self.model.radiative_cooling_co2()
        );
        Ok(())
    }

    /// Temperatures of step `t` as an `[nx, ny]` field.
    pub fn temperature_field(&self, t: usize) -> EBMResult<Array2<f64>> {
        if t >= self.num_steps_year {
            return Err(EBMError::StepOutOfRange {
                step: t,
                num_steps: self.num_steps_year,
            });
        }
        Ok(Array2::from_shape_fn(self.mesh.shape(), |(i, j)| {
            self.annual_temperature[[self.mesh.dof_index(i, j), t]]
        }))
    }

    /// Annual mean temperature of each cell as an `[nx, ny]` field.
    pub fn annual_mean_field(&self) -> Array2<f64> {
        let mean = self
            .annual_temperature
            .mean_axis(Axis(1))
            .unwrap_or_else(|| ndarray::Array1::zeros(self.mesh.dof()));
        Array2::from_shape_fn(self.mesh.shape(), |(i, j)| mean[self.mesh.dof_index(i, j)])
    }

    /// `[dof, num_steps_year]` temperatures of the annual cycle.
    pub fn annual_temperature(&self) -> ArrayView2<f64> {
        self.annual_temperature.view()
    }

    /// Source vector of the most recent step.
    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// Source vector of the step before the most recent one.
    pub fn last_rhs(&self) -> &DVector<f64> {
        &self.last_rhs
    }

    pub fn factors(&self) -> &BandLu {
        &self.factors
    }

    pub fn num_steps_year(&self) -> usize {
        self.num_steps_year
    }

    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    pub fn model(&self) -> &PhysicalModel {
        &self.model
    }
}
