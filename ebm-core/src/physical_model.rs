//! Per-cell physical parameters and seasonal forcing of the energy balance model
//!
//! The surface energy budget of each cell is
//!
//! $$C \frac{\partial T}{\partial t} = \nabla \cdot (D \nabla T) + F(t) - (A + B T)$$
//!
//! where:
//! - $C$ = heat capacity of the surface layer plus the atmospheric column
//! - $D$ = lateral diffusion coefficient
//! - $F$ = absorbed solar radiation
//! - $A$ = CO2-dependent radiative cooling constant
//! - $B$ = radiative feedback sensitivity
//!
//! Only $A$ can change after construction, through
//! [`PhysicalModel::set_co2_concentration`].

use crate::errors::{check_shape, EBMError, EBMResult};
use crate::forcing::{co_albedo, seasonal_forcing};
use crate::geography::{Geography, SurfaceType};
use crate::insolation::{InsolationEngine, LatitudeBands, SolarConstant};
use crate::orbital::OrbitalElements;
use crate::parameters::{radiative_cooling_co2, ModelParameters};
use log::debug;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use std::f64::consts::PI;

/// Physical fields of the model, co-indexed `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalModel {
    diffusion_coeff: Array2<f64>,
    heat_capacity: Array2<f64>,
    albedo: Array2<f64>,
    solar_forcing: Array3<f64>,
    co2_ppm: f64,
    radiative_cooling_co2: f64,
    radiative_cooling_feedback: f64,
}

fn validate_co2(co2_ppm: f64) -> EBMResult<()> {
    if co2_ppm.is_finite() && co2_ppm > 0.0 {
        Ok(())
    } else {
        Err(EBMError::InvalidConfiguration(format!(
            "CO2 concentration must be positive, got {} ppm",
            co2_ppm
        )))
    }
}

impl PhysicalModel {
    /// Derive all fields from a geography table, an albedo table and parameters.
    ///
    /// The seasonal forcing uses the orbital configuration of
    /// `parameters.reference_year`.
    pub fn new(
        geography: &Geography,
        albedo: Array2<f64>,
        parameters: &ModelParameters,
    ) -> EBMResult<Self> {
        let (nx, ny) = geography.shape();
        if ny < 2 {
            return Err(EBMError::InvalidConfiguration(format!(
                "at least two latitude rows are required, got {}",
                ny
            )));
        }
        check_shape("albedo", (nx, ny), albedo.shape())?;
        validate_co2(parameters.co2_ppm)?;

        let diffusion_coeff = diffusion_coefficients(geography, parameters);
        let heat_capacity = heat_capacities(geography, parameters);

        let orbit = OrbitalElements::for_year(parameters.reference_year);
        debug!(
            "Orbital elements for {}: e={:.6}, obliquity={:.6}, perihelion={:.6}",
            parameters.reference_year, orbit.eccentricity, orbit.obliquity, orbit.perihelion
        );
        let solar_constant = match &parameters.solar_constant_series {
            Some(series) => SolarConstant::Series(series.clone()),
            None => SolarConstant::Fixed(parameters.solar_constant),
        };
        let engine = InsolationEngine::new(orbit, parameters.ntimesteps, solar_constant)?;
        let insolation = engine.compute(&LatitudeBands::pole_to_pole(ny))?;
        let solar_forcing = seasonal_forcing(
            co_albedo(albedo.view())?.view(),
            insolation.daily_mean.view(),
            parameters.forcing_offset,
        )?;

        debug!(
            "Built physical model on a {}x{} grid with {} forcing steps",
            nx, ny, parameters.ntimesteps
        );

        Ok(Self {
            diffusion_coeff,
            heat_capacity,
            albedo,
            solar_forcing,
            co2_ppm: parameters.co2_ppm,
            radiative_cooling_co2: parameters.radiative_cooling_co2(),
            radiative_cooling_feedback: parameters.radiative_cooling_feedback,
        })
    }

    /// Assemble a model from precomputed fields.
    ///
    /// All spatial fields must share the `[nx, ny]` extents of `diffusion_coeff`.
    pub fn from_fields(
        diffusion_coeff: Array2<f64>,
        heat_capacity: Array2<f64>,
        albedo: Array2<f64>,
        solar_forcing: Array3<f64>,
        co2_ppm: f64,
        radiative_cooling_feedback: f64,
    ) -> EBMResult<Self> {
        let shape = diffusion_coeff.dim();
        check_shape("heat capacity", shape, heat_capacity.shape())?;
        check_shape("albedo", shape, albedo.shape())?;
        check_shape("solar forcing", shape, &solar_forcing.shape()[..2])?;
        if solar_forcing.dim().2 == 0 {
            return Err(EBMError::InvalidConfiguration(
                "solar forcing needs at least one time step".to_string(),
            ));
        }
        if let Some(c) = heat_capacity.iter().find(|c| !(**c > 0.0)) {
            return Err(EBMError::InvalidConfiguration(format!(
                "heat capacities must be positive, got {}",
                c
            )));
        }
        validate_co2(co2_ppm)?;

        Ok(Self {
            diffusion_coeff,
            heat_capacity,
            albedo,
            solar_forcing,
            co2_ppm,
            radiative_cooling_co2: radiative_cooling_co2(co2_ppm),
            radiative_cooling_feedback,
        })
    }

    /// Update the CO2 concentration and the radiative cooling constant derived from it.
    ///
    /// No other field is touched. Any factorized operator built from this model
    /// remains valid since the constant only enters the right-hand side.
    pub fn set_co2_concentration(&mut self, co2_ppm: f64) -> EBMResult<()> {
        validate_co2(co2_ppm)?;
        self.co2_ppm = co2_ppm;
        self.radiative_cooling_co2 = radiative_cooling_co2(co2_ppm);
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize) {
        self.diffusion_coeff.dim()
    }

    /// Number of forcing steps per year.
    pub fn ntimesteps(&self) -> usize {
        self.solar_forcing.dim().2
    }

    pub fn diffusion_coeff(&self) -> ArrayView2<f64> {
        self.diffusion_coeff.view()
    }

    pub fn heat_capacity(&self) -> ArrayView2<f64> {
        self.heat_capacity.view()
    }

    pub fn albedo(&self) -> ArrayView2<f64> {
        self.albedo.view()
    }

    pub fn solar_forcing(&self) -> ArrayView3<f64> {
        self.solar_forcing.view()
    }

    pub fn co2_concentration(&self) -> f64 {
        self.co2_ppm
    }

    pub fn radiative_cooling_co2(&self) -> f64 {
        self.radiative_cooling_co2
    }

    pub fn radiative_cooling_feedback(&self) -> f64 {
        self.radiative_cooling_feedback
    }
}

/// Lateral diffusion coefficients.
///
/// With $w_j = \sin(\pi j / (n_{lat} - 1))^5$ (zero at the poles, one at the equator):
/// - ocean: $(K_{eq} - K_{ocean}) w_j + K_{ocean}$
/// - elsewhere: $(K_{land} - K_{pole}) w_j + K_{pole}$, with a separate pole value
///   for each hemisphere
fn diffusion_coefficients(geography: &Geography, parameters: &ModelParameters) -> Array2<f64> {
    let (nx, ny) = geography.shape();
    let equator_row = ny / 2;

    Array2::from_shape_fn((nx, ny), |(i, j)| {
        let weight = (PI * j as f64 / (ny - 1) as f64).sin().powi(5);
        if geography.get(i, j).diffuses_as_ocean() {
            (parameters.diffusion_equator - parameters.diffusion_ocean) * weight
                + parameters.diffusion_ocean
        } else {
            let pole = if j < equator_row {
                parameters.diffusion_land_north_pole
            } else {
                parameters.diffusion_land_south_pole
            };
            (parameters.diffusion_land - pole) * weight + pole
        }
    })
}

/// Heat capacity of the surface layer plus the atmospheric column for each surface type.
pub fn surface_heat_capacity(surface: SurfaceType, parameters: &ModelParameters) -> f64 {
    let layer = match surface {
        SurfaceType::Land => parameters.land_heat_capacity(),
        SurfaceType::PerennialSeaIce => parameters.sea_ice_heat_capacity(),
        SurfaceType::PermanentSnow => parameters.snow_heat_capacity(),
        SurfaceType::InlandWater => parameters.mixed_layer_heat_capacity() / 3.0,
        SurfaceType::PacificOcean
        | SurfaceType::AtlanticOcean
        | SurfaceType::IndianOcean
        | SurfaceType::MediterraneanSea => parameters.mixed_layer_heat_capacity(),
    };
    layer + parameters.atmosphere_heat_capacity()
}

fn heat_capacities(geography: &Geography, parameters: &ModelParameters) -> Array2<f64> {
    geography
        .cells()
        .mapv(|surface| surface_heat_capacity(surface, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use ndarray::Array2;

    fn mixed_geography(nx: usize, ny: usize) -> Geography {
        let codes = Array2::from_shape_fn((nx, ny), |(i, _)| if i % 2 == 0 { 1 } else { 5 });
        Geography::from_codes(codes.view()).unwrap()
    }

    fn reference_model(nx: usize, ny: usize) -> PhysicalModel {
        PhysicalModel::new(
            &mixed_geography(nx, ny),
            Array2::from_elem((nx, ny), 0.3),
            &ModelParameters::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_field_shapes() {
        let model = reference_model(8, 9);

        assert_eq!(model.shape(), (8, 9));
        assert_eq!(model.heat_capacity().dim(), (8, 9));
        assert_eq!(model.albedo().dim(), (8, 9));
        assert_eq!(model.solar_forcing().dim(), (8, 9, 48));
        assert_eq!(model.ntimesteps(), 48);
    }

    #[test]
    fn test_reference_radiative_cooling() {
        let model = reference_model(4, 5);
        assert_eq!(model.radiative_cooling_co2(), 210.3);
        assert_eq!(model.radiative_cooling_feedback(), 2.15);
    }

    #[test]
    fn test_heat_capacity_depends_only_on_surface() {
        let model = reference_model(6, 7);
        let heat_capacity = model.heat_capacity();

        // Column 0 is land everywhere, column 1 ocean everywhere
        for j in 1..7 {
            assert_eq!(heat_capacity[[0, j]], heat_capacity[[0, j - 1]]);
            assert_eq!(heat_capacity[[1, j]], heat_capacity[[1, j - 1]]);
        }
        assert_eq!(heat_capacity[[0, 3]], heat_capacity[[2, 3]]);
        assert!(heat_capacity[[1, 3]] > heat_capacity[[0, 3]]);
    }

    #[test]
    fn test_inland_water_is_third_of_ocean_layer() {
        let params = ModelParameters::default();
        let c_atm = params.atmosphere_heat_capacity();
        let ocean = surface_heat_capacity(SurfaceType::PacificOcean, &params) - c_atm;
        let lake = surface_heat_capacity(SurfaceType::InlandWater, &params) - c_atm;
        assert!(is_close!(lake * 3.0, ocean));
    }

    #[test]
    fn test_diffusion_profile() {
        let params = ModelParameters::default();
        let model = reference_model(2, 9);
        let diffusion = model.diffusion_coeff();

        // Land column: pole values at the ends, land value at the equator
        assert!(is_close!(diffusion[[0, 0]], params.diffusion_land_north_pole));
        assert!(is_close!(diffusion[[0, 8]], params.diffusion_land_south_pole));
        assert!(is_close!(diffusion[[0, 4]], params.diffusion_land));

        // Ocean column: symmetric between hemispheres
        assert!(is_close!(diffusion[[1, 0]], params.diffusion_ocean));
        assert!(is_close!(diffusion[[1, 8]], params.diffusion_ocean));
        assert!(is_close!(diffusion[[1, 4]], params.diffusion_equator));
        assert!(is_close!(diffusion[[1, 2]], diffusion[[1, 6]]));
    }

    #[test]
    fn test_mediterranean_uses_land_diffusion() {
        let codes = Array2::from_shape_fn((2, 5), |(i, _)| if i == 0 { 1 } else { 8 });
        let geography = Geography::from_codes(codes.view()).unwrap();
        let model =
            PhysicalModel::new(&geography, Array2::zeros((2, 5)), &ModelParameters::default())
                .unwrap();

        for j in 0..5 {
            assert_eq!(model.diffusion_coeff()[[0, j]], model.diffusion_coeff()[[1, j]]);
        }
        assert!(model.heat_capacity()[[1, 0]] > model.heat_capacity()[[0, 0]]);
    }

    #[test]
    fn test_set_co2_only_touches_cooling() {
        let mut model = reference_model(4, 5);
        let original = model.clone();

        model.set_co2_concentration(630.0).unwrap();

        assert!(model.radiative_cooling_co2() < original.radiative_cooling_co2());
        assert_eq!(model.co2_concentration(), 630.0);
        assert_eq!(model.solar_forcing(), original.solar_forcing());
        assert_eq!(model.heat_capacity(), original.heat_capacity());
        assert_eq!(model.diffusion_coeff(), original.diffusion_coeff());
        assert_eq!(
            model.radiative_cooling_feedback(),
            original.radiative_cooling_feedback()
        );
    }

    #[test]
    fn test_co2_round_trip() {
        let mut model = reference_model(4, 5);
        let original = model.radiative_cooling_co2();

        model.set_co2_concentration(315.0).unwrap();
        model.set_co2_concentration(630.0).unwrap();
        model.set_co2_concentration(315.0).unwrap();

        assert!(is_close!(model.radiative_cooling_co2(), original));
    }

    #[test]
    fn test_invalid_co2_rejected() {
        let mut model = reference_model(4, 5);
        assert!(model.set_co2_concentration(0.0).is_err());
        assert!(model.set_co2_concentration(-10.0).is_err());
        assert_eq!(model.radiative_cooling_co2(), 210.3);
    }

    #[test]
    fn test_albedo_shape_checked() {
        let result = PhysicalModel::new(
            &mixed_geography(4, 5),
            Array2::zeros((5, 4)),
            &ModelParameters::default(),
        );
        assert!(matches!(result, Err(EBMError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_single_row_rejected() {
        let result = PhysicalModel::new(
            &Geography::uniform(4, 1, SurfaceType::Land),
            Array2::zeros((4, 1)),
            &ModelParameters::default(),
        );
        assert!(matches!(result, Err(EBMError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_from_fields_shape_checked() {
        let result = PhysicalModel::from_fields(
            Array2::ones((3, 3)),
            Array2::ones((3, 3)),
            Array2::zeros((3, 3)),
            Array3::zeros((3, 2, 4)),
            315.0,
            2.15,
        );
        assert!(matches!(result, Err(EBMError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_forcing_follows_co_albedo() {
        let nx = 3;
        let ny = 5;
        let albedo = Array2::from_shape_fn((nx, ny), |(i, _)| 0.2 * i as f64);
        let model = PhysicalModel::new(
            &Geography::uniform(nx, ny, SurfaceType::Land),
            albedo,
            &ModelParameters::default(),
        )
        .unwrap();
        let forcing = model.solar_forcing();

        // Equator at the equinox: forcing scales with 1 - albedo
        let ratio = forcing[[2, 2, 0]] / forcing[[0, 2, 0]];
        assert!(is_close!(ratio, 0.6));
    }
}
