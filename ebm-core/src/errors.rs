use thiserror::Error;

/// Error type for invalid model construction and stepping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EBMError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Shape mismatch for {field}. Expected {expected}, got {found}")]
    ShapeMismatch {
        field: String,
        expected: String,
        found: String,
    },
    #[error("Unrecognised surface classification {code} at cell ({i}, {j}). Valid codes are 1 to 8")]
    UnknownSurfaceType { code: i32, i: usize, j: usize },
    #[error("Eccentricity must lie in [0, 1), got {0}")]
    UnphysicalEccentricity(f64),
    #[error("Operator is singular or near-singular: pivot {pivot:e} at row {row}")]
    SingularOperator { row: usize, pivot: f64 },
    #[error("Entry ({row}, {col}) lies outside the operator band (lower={kl}, upper={ku})")]
    OutsideBand {
        row: usize,
        col: usize,
        kl: usize,
        ku: usize,
    },
    #[error("Step {step} is outside the annual cycle of {num_steps} steps")]
    StepOutOfRange { step: usize, num_steps: usize },
    #[error("Orbit integration failed: {0}")]
    Integration(String),
}

/// Convenience type for `Result<T, EBMError>`.
pub type EBMResult<T> = Result<T, EBMError>;

/// Check that a 2D field matches the expected `(nx, ny)` extents.
pub(crate) fn check_shape(field: &str, expected: (usize, usize), found: &[usize]) -> EBMResult<()> {
    if found != [expected.0, expected.1] {
        return Err(EBMError::ShapeMismatch {
            field: field.to_string(),
            expected: format!("{:?}", [expected.0, expected.1]),
            found: format!("{:?}", found),
        });
    }
    Ok(())
}
