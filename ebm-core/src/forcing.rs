//! Seasonal solar forcing
//!
//! Broadcasts the zonal insolation over longitude and weights it by the fraction
//! of radiation each cell absorbs:
//!
//! $$F_{i,j,t} = I_{j,t} (1 - \alpha_{i,j}) - F_{offset}$$
//!
//! Energy is not rebalanced here; any zonal structure comes from the albedo field.

use crate::errors::{EBMError, EBMResult};
use ndarray::{Array2, Array3, ArrayView2, Zip};

/// Fraction of incident radiation absorbed by each cell.
pub fn co_albedo(albedo: ArrayView2<f64>) -> EBMResult<Array2<f64>> {
    if let Some(((i, j), value)) = albedo
        .indexed_iter()
        .find(|(_, value)| !(0.0..=1.0).contains(*value))
    {
        return Err(EBMError::InvalidConfiguration(format!(
            "albedo at cell ({}, {}) is {}, expected a value in [0, 1]",
            i, j, value
        )));
    }
    Ok(albedo.mapv(|a| 1.0 - a))
}

/// Build the `[nlon, nlat, nt]` forcing tensor.
///
/// `co_albedo` is indexed `[longitude, latitude]` and `insolation` is `[latitude, time]`.
pub fn seasonal_forcing(
    co_albedo: ArrayView2<f64>,
    insolation: ArrayView2<f64>,
    offset: f64,
) -> EBMResult<Array3<f64>> {
    let (nlon, nlat) = co_albedo.dim();
    let (nlat_insolation, nt) = insolation.dim();
    if nlat != nlat_insolation {
        return Err(EBMError::ShapeMismatch {
            field: "insolation".to_string(),
            expected: format!("[{}, {}]", nlat, nt),
            found: format!("[{}, {}]", nlat_insolation, nt),
        });
    }

    let mut forcing = Array3::zeros((nlon, nlat, nt));
    let zip = Zip::indexed(&mut forcing);
    let kernel = |(i, j, t): (usize, usize, usize), value: &mut f64| {
        *value = insolation[[j, t]] * co_albedo[[i, j]] - offset;
    };

    // Cells are independent; ordering does not matter
    #[cfg(feature = "parallel")]
    zip.par_for_each(kernel);
    #[cfg(not(feature = "parallel"))]
    zip.for_each(kernel);

    Ok(forcing)
}
