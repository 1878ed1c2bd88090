//! Physical parameters of the energy balance model
//!
//! Default values reproduce the reference 1950 AD configuration.

use serde::{Deserialize, Serialize};

/// Seconds in a Julian year, used to express heat capacities in $\text{W yr / m}^2\text{ K}$.
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0;

/// Reference CO2 concentration (ppm) at which the radiative cooling constant equals
/// [`RADIATIVE_COOLING_REFERENCE`].
pub const CO2_REFERENCE: f64 = 315.0;

/// Outgoing long-wave radiation at 0 °C for the reference CO2 concentration ($\text{W/m}^2$).
pub const RADIATIVE_COOLING_REFERENCE: f64 = 210.3;

/// Radiative forcing coefficient of the logarithmic CO2 law ($\text{W/m}^2$).
pub const CO2_FORCING_COEFFICIENT: f64 = 5.35;

/// CO2-dependent constant term of the linearised outgoing long-wave radiation.
///
/// $$A = 210.3 - 5.35 \ln(C / 315)$$
///
/// Strictly decreasing in `co2_ppm`. The caller is responsible for `co2_ppm > 0`.
pub fn radiative_cooling_co2(co2_ppm: f64) -> f64 {
    RADIATIVE_COOLING_REFERENCE - CO2_FORCING_COEFFICIENT * (co2_ppm / CO2_REFERENCE).ln()
}

/// Parameters of the energy balance model.
///
/// # Units
///
/// - Diffusion coefficients: $\text{W/m}^2\text{/K}$ on the unit sphere
/// - Heat capacities: derived as depth × volumetric heat capacity / [`SECONDS_PER_YEAR`],
///   giving $\text{W yr / m}^2\text{ K}$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    // Radiation
    /// Atmospheric CO2 concentration (ppm).
    /// Default: 315.0
    pub co2_ppm: f64,

    /// Sensitivity of outgoing long-wave radiation to temperature ($\text{W/m}^2\text{/K}$).
    /// Default: 2.15
    pub radiative_cooling_feedback: f64,

    /// Constant radiative offset subtracted from the solar forcing ($\text{W/m}^2$).
    /// Default: 0.0
    pub forcing_offset: f64,

    // Orbit and insolation
    /// Calendar year whose orbital configuration drives the seasonal forcing.
    /// Default: 1950
    pub reference_year: i64,

    /// Solar constant ($\text{W/m}^2$).
    /// Default: 1371.685
    pub solar_constant: f64,

    /// Optional solar constant per forcing step, for solar-cycle experiments.
    /// Must have `ntimesteps` entries when set.
    pub solar_constant_series: Option<Vec<f64>>,

    /// Number of forcing time steps per year.
    /// Default: 48
    pub ntimesteps: usize,

    // Diffusion
    /// Diffusion coefficient of ocean cells at the equator.
    /// Default: 0.65
    pub diffusion_equator: f64,

    /// Diffusion coefficient of ocean cells at the poles.
    /// Default: 0.40
    pub diffusion_ocean: f64,

    /// Diffusion coefficient of land cells at the equator.
    /// Default: 0.65
    pub diffusion_land: f64,

    /// Diffusion coefficient of land cells at the North Pole.
    /// Default: 0.28
    pub diffusion_land_north_pole: f64,

    /// Diffusion coefficient of land cells at the South Pole.
    /// Default: 0.20
    pub diffusion_land_south_pole: f64,

    // Heat capacity
    /// Thermally active soil depth (m).
    /// Default: 1.0
    pub land_depth: f64,

    /// Volumetric heat capacity of soil ($\text{J/m}^3\text{/K}$).
    /// Default: 2.4e6
    pub land_volumetric_heat: f64,

    /// Thickness of perennial sea ice (m).
    /// Default: 2.5
    pub sea_ice_depth: f64,

    /// Volumetric heat capacity of ice ($\text{J/m}^3\text{/K}$).
    /// Default: 1.93e6
    pub sea_ice_volumetric_heat: f64,

    /// Depth of permanent snow pack (m).
    /// Default: 1.5
    pub snow_depth: f64,

    /// Volumetric heat capacity of snow ($\text{J/m}^3\text{/K}$).
    /// Default: 0.84e6
    pub snow_volumetric_heat: f64,

    /// Ocean mixed layer depth (m). Inland lakes and seas use a third of the ocean value.
    /// Default: 70.0
    pub mixed_layer_depth: f64,

    /// Volumetric heat capacity of sea water ($\text{J/m}^3\text{/K}$).
    /// Default: 4.1e6
    pub ocean_volumetric_heat: f64,

    /// Surface air density ($\text{kg/m}^3$).
    /// Default: 1.225
    pub air_density: f64,

    /// Specific heat of air at constant pressure ($\text{J/kg/K}$).
    /// Default: 1000.0
    pub air_specific_heat: f64,

    /// Number of atmospheric layers integrated for the column heat capacity.
    /// Default: 10
    pub atmosphere_layers: usize,

    /// Thickness of each atmospheric layer (m).
    /// Default: 500.0
    pub atmosphere_layer_thickness: f64,

    /// Density scale height of the atmosphere (m).
    /// Default: 7600.0
    pub scale_height: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            // Radiation
            co2_ppm: CO2_REFERENCE,
            radiative_cooling_feedback: 2.15,
            forcing_offset: 0.0,

            // Orbit and insolation
            reference_year: 1950,
            solar_constant: 1371.685,
            solar_constant_series: None,
            ntimesteps: 48,

            // Diffusion
            diffusion_equator: 0.65,
            diffusion_ocean: 0.40,
            diffusion_land: 0.65,
            diffusion_land_north_pole: 0.28,
            diffusion_land_south_pole: 0.20,

            // Heat capacity
            land_depth: 1.0,
            land_volumetric_heat: 2.4e6,
            sea_ice_depth: 2.5,
            sea_ice_volumetric_heat: 1.93e6,
            snow_depth: 1.5,
            snow_volumetric_heat: 0.84e6,
            mixed_layer_depth: 70.0,
            ocean_volumetric_heat: 4.1e6,
            air_density: 1.225,
            air_specific_heat: 1000.0,
            atmosphere_layers: 10,
            atmosphere_layer_thickness: 500.0,
            scale_height: 7600.0,
        }
    }
}

fn layer_heat_capacity(depth: f64, volumetric_heat: f64) -> f64 {
    depth * volumetric_heat / SECONDS_PER_YEAR
}

impl ModelParameters {
    /// Radiative cooling constant for the configured CO2 concentration.
    pub fn radiative_cooling_co2(&self) -> f64 {
        radiative_cooling_co2(self.co2_ppm)
    }

    /// Heat capacity of the atmospheric column ($\text{W yr / m}^2\text{ K}$).
    ///
    /// Integrates an exponentially decaying density profile over
    /// `atmosphere_layers` layers:
    ///
    /// $$C_{atm} = \sum_{k} \rho_0 e^{-z_k / H} c_p \Delta z$$
    pub fn atmosphere_heat_capacity(&self) -> f64 {
        let dz = self.atmosphere_layer_thickness;
        (0..self.atmosphere_layers)
            .map(|k| {
                let z = k as f64 * dz;
                let density = self.air_density * (-z / self.scale_height).exp();
                layer_heat_capacity(dz, density * self.air_specific_heat)
            })
            .sum()
    }

    pub fn land_heat_capacity(&self) -> f64 {
        layer_heat_capacity(self.land_depth, self.land_volumetric_heat)
    }

    pub fn sea_ice_heat_capacity(&self) -> f64 {
        layer_heat_capacity(self.sea_ice_depth, self.sea_ice_volumetric_heat)
    }

    pub fn snow_heat_capacity(&self) -> f64 {
        layer_heat_capacity(self.snow_depth, self.snow_volumetric_heat)
    }

    /// Heat capacity of the ocean mixed layer ($\text{W yr / m}^2\text{ K}$).
    ///
    /// For the 70 m default, ~9.1 W yr / m^2 K.
    pub fn mixed_layer_heat_capacity(&self) -> f64 {
        layer_heat_capacity(self.mixed_layer_depth, self.ocean_volumetric_heat)
    }
}
