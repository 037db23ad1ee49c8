//! Discretization of sparsely sampled potentials onto a uniform grid.
//!
//! ```
//! use seqsolver::{ grid::{ Grid, SampleSet }, interp::{ self, Interpolation } };
//!
//! let samples = SampleSet::from_pairs([(-1.0, 1.0), (0.0, 0.0), (1.0, 1.0)]);
//! let grid = Grid::new(-1.0, 1.0, 5).unwrap();
//! let pot = interp::discretize(&samples, &grid, Interpolation::Linear).unwrap();
//! assert_eq!(pot.get_x().to_vec(), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
//! assert_eq!(pot.get_V().to_vec(), vec![1.0, 0.5, 0.0, 0.5, 1.0]);
//! ```

use std::fmt;
use ndarray as nd;
use ndarray_linalg::{ LeastSquaresSvd, SolveTridiagonal };
use crate::{
    Arr1,
    error::{ DomainError, FitError, InputError, InterpError, LengthError },
    grid::{ Grid, SampleSet },
};

pub type InterpResult<T> = Result<T, InterpError>;

// polynomial degrees at or above this are logged as oscillation-prone
const HIGH_DEGREE: usize = 10;

/// Interpolation method selector and parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Piecewise-linear, clamped to the boundary values outside the samples.
    Linear,
    /// Least-squares polynomial fit.
    Polynomial {
        /// Degree of the fitting polynomial; must be at least 1 and less than
        /// the number of samples.
        degree: usize,
    },
    /// Natural cubic spline (zero second derivative at both ends).
    CubicSpline,
}

impl Interpolation {
    /// Parse an interpolation type name as it appears in input files
    /// (`linear`, `polynomial`, or `cspline`).
    ///
    /// `degree` is only consulted for `polynomial`, for which it is required.
    pub fn from_name(name: &str, degree: Option<usize>)
        -> Result<Self, InputError>
    {
        match name.trim() {
            "linear" => Ok(Self::Linear),
            "polynomial" => {
                degree.map(|degree| Self::Polynomial { degree })
                    .ok_or(InputError::MissingDegree)
            },
            "cspline" => Ok(Self::CubicSpline),
            other => Err(InputError::UnsupportedInterpolation(other.into())),
        }
    }

    /// Name of the interpolation type as it appears in input files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Polynomial { .. } => "polynomial",
            Self::CubicSpline => "cspline",
        }
    }

}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polynomial { degree } => write!(f, "polynomial({})", degree),
            _ => f.write_str(self.name()),
        }
    }
}

/// A potential sampled on a uniform coordinate grid.
///
/// Arrays borrowed from this type are guaranteed to have the same length
/// (at least 2).
#[derive(Clone, Debug, PartialEq)]
pub struct DiscretizedPotential {
    // coordinate array
    x: nd::Array1<f64>,
    // potential array
    V: nd::Array1<f64>,
}

impl DiscretizedPotential {
    /// Create a new `DiscretizedPotential` from bare coordinate and potential
    /// arrays.
    ///
    /// The coordinates are assumed to be uniformly spaced.
    pub fn new_arrays(x: nd::Array1<f64>, V: nd::Array1<f64>)
        -> InterpResult<Self>
    {
        LengthError::check(&x, &V)?;
        DomainError::check_npoints(x.len())?;
        Ok(Self { x, V })
    }

    /// Create a new `DiscretizedPotential` by evaluating a function on a
    /// grid.
    pub fn from_fn<F>(grid: &Grid, V: F) -> Self
    where F: FnMut(f64) -> f64
    {
        let x = grid.points();
        let V = x.mapv(V);
        Self { x, V }
    }

    /// Get a reference to the coordinate array.
    pub fn get_x(&self) -> &nd::Array1<f64> { &self.x }

    /// Get a reference to the potential array.
    pub fn get_V(&self) -> &nd::Array1<f64> { &self.V }

    /// Get the grid spacing, taken as the difference between the first two
    /// coordinates.
    pub fn get_dx(&self) -> f64 { self.x[1] - self.x[0] }

    /// Get the length of the coordinate and potential arrays.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.x.len() }

    /// Return the `npoints × 2` table of `(x, V(x))` rows.
    pub fn to_table(&self) -> nd::Array2<f64> {
        nd::Array2::from_shape_fn(
            (self.len(), 2),
            |(i, j)| if j == 0 { self.x[i] } else { self.V[i] },
        )
    }
}

/// Interpolate `samples` onto every point of `grid` using the given method.
pub fn discretize(
    samples: &SampleSet,
    grid: &Grid,
    interpolation: Interpolation,
) -> InterpResult<DiscretizedPotential>
{
    tracing::debug!(
        samples = samples.len(),
        npoints = grid.npoints(),
        %interpolation,
        "discretizing potential",
    );
    if !samples.is_increasing() {
        tracing::warn!(
            "sample abscissae are not strictly increasing; \
            interpolation results may be meaningless"
        );
    }
    let x = grid.points();
    let (data_x, data_y) = (samples.get_x(), samples.get_y());
    let V: nd::Array1<f64>
        = match interpolation {
            Interpolation::Linear => linear(data_x, data_y, &x)?,
            Interpolation::Polynomial { degree } => {
                let coeffs = polyfit(data_x, data_y, degree)?;
                x.mapv(|xk| polyval(&coeffs, xk))
            },
            Interpolation::CubicSpline => {
                NaturalSpline::new(data_x, data_y)?.eval(&x)
            },
        };
    Ok(DiscretizedPotential { x, V })
}

// find the index `j` in `0..=n - 2` of the sample interval containing `x`,
// clamped to the first/last interval outside the sampled range
fn locate<S>(data_x: &Arr1<S>, x: f64) -> usize
where S: nd::Data<Elem = f64>
{
    let n = data_x.len();
    let mut lo: usize = 0;
    let mut hi: usize = n - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if data_x[mid] <= x { lo = mid; } else { hi = mid; }
    }
    lo
}

/// Piecewise-linear interpolation of sampled data at points `x`.
///
/// Outside the sampled range, the boundary values are returned.
pub fn linear<S, T, U>(
    data_x: &Arr1<S>,
    data_y: &Arr1<T>,
    x: &Arr1<U>,
) -> InterpResult<nd::Array1<f64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
    U: nd::Data<Elem = f64>,
{
    LengthError::check(data_x, data_y)?;
    let n = data_x.len();
    if n < 2 {
        return Err(
            InputError::TooFewSamples { kind: "linear", need: 2, got: n }.into()
        );
    }
    let y: nd::Array1<f64>
        = x.mapv(|xk| {
            if xk <= data_x[0] {
                data_y[0]
            } else if xk >= data_x[n - 1] {
                data_y[n - 1]
            } else {
                let j = locate(data_x, xk);
                if data_x[j] == xk {
                    data_y[j]
                } else {
                    let slope
                        = (data_y[j + 1] - data_y[j])
                        / (data_x[j + 1] - data_x[j]);
                    slope * (xk - data_x[j]) + data_y[j]
                }
            }
        });
    Ok(y)
}

/// Compute the least-squares polynomial of given degree through sampled data.
///
/// Coefficients are returned in ascending order of power. The fit is an SVD
/// least-squares solve (LAPACK `?gelsd`) on the Vandermonde matrix with
/// unit-norm columns.
pub fn polyfit<S, T>(data_x: &Arr1<S>, data_y: &Arr1<T>, degree: usize)
    -> InterpResult<nd::Array1<f64>>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(data_x, data_y)?;
    let m = data_x.len();
    if degree == 0 { return Err(FitError::ZeroDegree.into()); }
    if degree >= m {
        return Err(FitError::DegreeTooHigh { degree, samples: m }.into());
    }
    if degree >= HIGH_DEGREE {
        tracing::warn!(
            degree,
            "high-degree polynomial fits are prone to oscillation",
        );
    }
    let p = degree + 1;

    let mut A: nd::Array2<f64>
        = nd::Array2::from_shape_fn((m, p), |(i, j)| data_x[i].powi(j as i32));
    let scale: nd::Array1<f64>
        = A.columns().into_iter()
        .map(|col| {
            let norm = col.dot(&col).sqrt();
            if norm == 0.0 { 1.0 } else { norm }
        })
        .collect();
    A.columns_mut().into_iter().zip(&scale)
        .for_each(|(mut col, s)| { col /= *s; });

    let fit = A.least_squares(data_y)?;
    let smax = fit.singular_values.iter().copied().fold(0.0, f64::max);
    let tol = f64::EPSILON * m as f64 * smax;
    let rank = fit.singular_values.iter().filter(|s| **s > tol).count();
    if rank < p {
        return Err(FitError::RankDeficient { degree }.into());
    }
    let mut c: nd::Array1<f64> = fit.solution;
    c /= &scale;
    Ok(c)
}

/// Evaluate a polynomial with coefficients given in ascending order of power.
pub fn polyval<S>(coeffs: &Arr1<S>, x: f64) -> f64
where S: nd::Data<Elem = f64>
{
    coeffs.iter().rev().fold(0.0, |acc, ck| acc * x + *ck)
}

/// A natural cubic spline through a set of sample points.
///
/// Outside the sampled range, the spline is continued by the cubic of the
/// nearest end interval.
#[derive(Clone, Debug)]
pub struct NaturalSpline {
    x: nd::Array1<f64>,
    y: nd::Array1<f64>,
    // second derivatives at the knots
    m: nd::Array1<f64>,
}

impl NaturalSpline {
    /// Construct the spline; requires at least 3 points.
    pub fn new<S, T>(data_x: &Arr1<S>, data_y: &Arr1<T>) -> InterpResult<Self>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        LengthError::check(data_x, data_y)?;
        let n = data_x.len();
        if n < 3 {
            return Err(
                InputError::TooFewSamples { kind: "cspline", need: 3, got: n }
                    .into()
            );
        }
        let h: nd::Array1<f64>
            = data_x.iter().zip(data_x.iter().skip(1))
            .map(|(xk, xkp1)| xkp1 - xk)
            .collect();
        let diag: nd::Array1<f64>
            = (1..n - 1).map(|i| 2.0 * (h[i - 1] + h[i])).collect();
        let off: nd::Array1<f64> = h.slice(nd::s![1..n - 2]).to_owned();
        let rhs: nd::Array1<f64>
            = (1..n - 1)
            .map(|i| {
                6.0 * (
                    (data_y[i + 1] - data_y[i]) / h[i]
                    - (data_y[i] - data_y[i - 1]) / h[i - 1]
                )
            })
            .collect();
        let interior: nd::Array1<f64>
            = if n == 3 {
                // LAPACK's tridiagonal extraction wants at least a 2 x 2 system
                nd::array![rhs[0] / diag[0]]
            } else {
                let k = n - 2;
                let mut sys: nd::Array2<f64> = nd::Array2::from_diag(&diag);
                (0..k - 1).for_each(|i| {
                    sys[[i, i + 1]] = off[i];
                    sys[[i + 1, i]] = off[i];
                });
                sys.solve_tridiagonal(&rhs)?
            };
        let mut m: nd::Array1<f64> = nd::Array1::zeros(n);
        m.slice_mut(nd::s![1..n - 1]).assign(&interior);
        Ok(Self { x: data_x.to_owned(), y: data_y.to_owned(), m })
    }

    /// Evaluate the spline at a single point.
    pub fn eval_single(&self, x: f64) -> f64 {
        let j = locate(&self.x, x);
        let h = self.x[j + 1] - self.x[j];
        let a = self.x[j + 1] - x;
        let b = x - self.x[j];
        (self.m[j] * a.powi(3) + self.m[j + 1] * b.powi(3)) / (6.0 * h)
            + (self.y[j] / h - self.m[j] * h / 6.0) * a
            + (self.y[j + 1] / h - self.m[j + 1] * h / 6.0) * b
    }

    /// Evaluate the spline at every point of `x`.
    pub fn eval<S>(&self, x: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        x.mapv(|xk| self.eval_single(xk))
    }

    /// Get the second derivatives of the spline at the knots.
    pub fn get_second_derivs(&self) -> &nd::Array1<f64> { &self.m }
}
