//! Uniform coordinate grids and sparse potential samples.

use ndarray as nd;
use crate::error::{ DomainError, LengthError };

/// A uniform coordinate grid described "linspace-style": start, inclusive end,
/// and a number of points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grid {
    xmin: f64,
    xmax: f64,
    npoints: usize,
}

impl Grid {
    /// Create a new `Grid`.
    ///
    /// Fails if `npoints < 2` or if `xmin < xmax` does not hold for finite
    /// bounds.
    pub fn new(xmin: f64, xmax: f64, npoints: usize) -> Result<Self, DomainError>
    {
        DomainError::check_npoints(npoints)?;
        (xmin.is_finite() && xmax.is_finite() && xmin < xmax)
            .then_some(())
            .ok_or(DomainError::BadWindow { xmin, xmax })?;
        Ok(Self { xmin, xmax, npoints })
    }

    /// Left edge of the grid.
    pub fn xmin(&self) -> f64 { self.xmin }

    /// Right edge of the grid (inclusive).
    pub fn xmax(&self) -> f64 { self.xmax }

    /// Number of grid points.
    pub fn npoints(&self) -> usize { self.npoints }

    /// Grid spacing `(xmax - xmin) / (npoints - 1)`.
    pub fn dx(&self) -> f64 {
        (self.xmax - self.xmin) / (self.npoints - 1) as f64
    }

    /// Generate the coordinate array.
    ///
    /// Points are computed as `xmin + i * dx`, with the final point pinned to
    /// `xmax` exactly.
    pub fn points(&self) -> nd::Array1<f64> {
        let dx = self.dx();
        let mut x: nd::Array1<f64>
            = (0..self.npoints)
            .map(|i| i as f64 * dx + self.xmin)
            .collect();
        x[self.npoints - 1] = self.xmax;
        x
    }
}

/// An ordered set of `(x, y)` sample points of a potential.
///
/// The `x` values should be strictly increasing; this is not enforced, but
/// every interpolation method assumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleSet {
    x: nd::Array1<f64>,
    y: nd::Array1<f64>,
}

impl SampleSet {
    /// Create a new `SampleSet` from bare coordinate and value arrays.
    pub fn new(x: nd::Array1<f64>, y: nd::Array1<f64>)
        -> Result<Self, LengthError>
    {
        LengthError::check(&x, &y)?;
        Ok(Self { x, y })
    }

    /// Create a new `SampleSet` from `(x, y)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where I: IntoIterator<Item = (f64, f64)>
    {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        Self { x: x.into(), y: y.into() }
    }

    /// Get a reference to the coordinate array.
    pub fn get_x(&self) -> &nd::Array1<f64> { &self.x }

    /// Get a reference to the value array.
    pub fn get_y(&self) -> &nd::Array1<f64> { &self.y }

    /// Number of samples.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.x.len() }

    /// Return `true` if the sample abscissae are strictly increasing.
    pub fn is_increasing(&self) -> bool {
        self.x.iter().zip(self.x.iter().skip(1)).all(|(a, b)| a < b)
    }
}
