//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned for malformed or unsupported problem descriptions.
#[derive(Debug, Error)]
pub enum InputError {
    /// The interpolation type is not one of `linear`, `polynomial`, `cspline`.
    #[error("unsupported interpolation type '{0}'")]
    UnsupportedInterpolation(String),

    /// The declared number of samples disagrees with the samples given.
    #[error("expected {expected} sample points; got {got}")]
    SampleCount { expected: usize, got: usize },

    /// An interpolation method was given fewer samples than it requires.
    #[error("{kind} interpolation requires at least {need} samples; got {got}")]
    TooFewSamples { kind: &'static str, need: usize, got: usize },

    /// Polynomial interpolation was requested without a degree.
    #[error("polynomial interpolation requires a degree")]
    MissingDegree,

    /// A required line of the input text is absent.
    #[error("missing input field: {0}")]
    MissingField(&'static str),

    /// A line of the input text could not be parsed.
    #[error("could not parse {field} from '{value}'")]
    BadField { field: &'static str, value: String },
}

/// Returned when a least-squares polynomial fit is ill-posed.
#[derive(Debug, Error)]
pub enum FitError {
    /// The degree leaves fewer samples than coefficients.
    #[error("polynomial degree must be less than the number of samples; got degree {degree} for {samples} samples")]
    DegreeTooHigh { degree: usize, samples: usize },

    /// Degree 0 was requested.
    #[error("polynomial degree must be at least 1")]
    ZeroDegree,

    /// The scaled Vandermonde matrix is numerically rank-deficient.
    #[error("polynomial fit of degree {degree} is rank-deficient")]
    RankDeficient { degree: usize },
}

/// Returned for physically meaningless parameters.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Returned when a non-positive mass is encountered.
    #[error("mass must be greater than 0; got {0}")]
    BadMass(f64),

    /// Returned when a non-positive grid spacing is encountered.
    #[error("grid spacing must be greater than 0; got {0}")]
    BadSpacing(f64),

    /// Returned when a grid has fewer than two points.
    #[error("grid must have at least 2 points; got {0}")]
    TooFewPoints(usize),

    /// Returned when the potential is NaN or infinite at some grid point.
    #[error("potential must be finite; got {value} at grid point {index}")]
    NonFinite { index: usize, value: f64 },

    /// Returned when the grid window is empty, inverted, or not finite.
    #[error("grid window must satisfy xmin < xmax; got [{xmin}, {xmax}]")]
    BadWindow { xmin: f64, xmax: f64 },
}

impl DomainError {
    pub(crate) fn check_mass(mass: f64) -> Result<(), Self> {
        (mass > 0.0).then_some(()).ok_or(Self::BadMass(mass))
    }

    pub(crate) fn check_spacing(dx: f64) -> Result<(), Self> {
        (dx > 0.0).then_some(()).ok_or(Self::BadSpacing(dx))
    }

    pub(crate) fn check_npoints(npoints: usize) -> Result<(), Self> {
        (npoints >= 2).then_some(()).ok_or(Self::TooFewPoints(npoints))
    }
}

/// Returned when a 1-based inclusive eigenvalue index range `lo..=hi` does not
/// lie within `1..=n`.
#[derive(Debug, Error)]
#[error("eigen index range {lo}..={hi} must satisfy 1 <= lo <= hi <= {n}")]
pub struct RangeError {
    pub lo: usize,
    pub hi: usize,
    pub n: usize,
}

impl RangeError {
    pub(crate) fn check(lo: usize, hi: usize, n: usize) -> Result<(), Self> {
        (1 <= lo && lo <= hi && hi <= n)
            .then_some(())
            .ok_or(Self { lo, hi, n })
    }
}

/// Returned when the eigensolver exhausts its iteration budget.
#[derive(Debug, Error)]
pub enum ConvergenceError {
    /// Bisection failed to isolate an eigenvalue.
    #[error("bisection for eigenvalue {index} did not converge in {iters} iterations")]
    Bisection { index: usize, iters: usize },

    /// Inverse iteration failed to reach the residual bound.
    #[error("inverse iteration for eigenvector {index} did not converge in {iters} iterations (residual {residual:e})")]
    InverseIteration { index: usize, iters: usize, residual: f64 },
}

/// Non-fatal: the variance `<x²> - <x>²` of an eigenstate came out negative
/// through cancellation and was clamped to zero.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[error("negative variance {radicand:e} for state {state} clamped to zero")]
pub struct ComputationWarning {
    /// Zero-based column index of the eigenstate.
    pub state: usize,
    /// The offending (negative) radicand.
    pub radicand: f64,
}

/// Returned from functions in [`interp`][crate::interp].
#[derive(Debug, Error)]
pub enum InterpError {
    /// [`InputError`]
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// [`FitError`]
    #[error("fit error: {0}")]
    Fit(#[from] FitError),

    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// [`DomainError`]
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// [`LinalgError`].
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

/// Returned from functions in [`eigen`][crate::eigen].
#[derive(Debug, Error)]
pub enum EigenError {
    /// [`RangeError`]
    #[error("range error: {0}")]
    Range(#[from] RangeError),

    /// [`ConvergenceError`]
    #[error("convergence error: {0}")]
    Convergence(#[from] ConvergenceError),

    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),
}

/// Returned from the full solving pipeline in [`solve`][crate::solve].
#[derive(Debug, Error)]
pub enum XError {
    /// [`InputError`]
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// [`InterpError`]
    #[error("interpolation error: {0}")]
    Interp(#[from] InterpError),

    /// [`DomainError`]
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// [`EigenError`]
    #[error("eigensolver error: {0}")]
    Eigen(#[from] EigenError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),
}

/// Returned from reading and writing numeric tables in
/// [`table`][crate::table].
#[derive(Debug, Error)]
pub enum TableError {
    /// I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A token could not be read as a floating-point number.
    #[error("could not parse '{token}' on line {line} as a number")]
    Parse { line: usize, token: String },

    /// Rows of a table have differing numbers of columns.
    #[error("row {line} has {got} columns; expected {expected}")]
    Ragged { line: usize, expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_check_bounds() {
        assert!(RangeError::check(1, 5, 10).is_ok());
        assert!(RangeError::check(10, 10, 10).is_ok());
        assert!(RangeError::check(0, 5, 10).is_err());
        assert!(RangeError::check(6, 5, 10).is_err());
        assert!(RangeError::check(1, 11, 10).is_err());
    }

    #[test]
    fn domain_checks() {
        assert!(DomainError::check_mass(1.0).is_ok());
        assert!(matches!(DomainError::check_mass(0.0), Err(DomainError::BadMass(_))));
        assert!(matches!(DomainError::check_mass(-2.0), Err(DomainError::BadMass(_))));
        assert!(matches!(DomainError::check_spacing(0.0), Err(DomainError::BadSpacing(_))));
        assert!(matches!(DomainError::check_npoints(1), Err(DomainError::TooFewPoints(1))));
    }

    #[test]
    fn length_check() {
        let a = nd::array![1.0, 2.0];
        let b = nd::array![1.0, 2.0, 3.0];
        let err = LengthError::check(&a, &b).unwrap_err();
        assert_eq!((err.0, err.1), (2, 3));
    }
}
