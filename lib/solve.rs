//! The full solving pipeline for the one-dimensional, time-independent
//! Schrödinger equation (TISE):
//! ```text
//! samples ─discretize→ potential ─build→ hamiltonian ─solve→ eigenpairs ─compute→ observables
//! ```
//! Each stage is a pure function of its inputs; [`solve`] composes them.

use std::path::Path;
use ndarray as nd;
use crate::{
    eigen::{ self, EigenRequest, EigenSpectrum },
    error::{ EigenError, TableError, XError },
    grid::{ Grid, SampleSet },
    hamiltonian,
    interp::{ self, DiscretizedPotential, Interpolation },
    observables::{ self, Observables },
    table,
};

pub type XResult<T> = Result<T, XError>;

/// File name for the potential table written by [`Solution::save`].
pub const POTENTIAL_FILE: &str = "potential.dat";
/// File name for the energies table written by [`Solution::save`].
pub const ENERGIES_FILE: &str = "energies.dat";
/// File name for the wavefunctions table written by [`Solution::save`].
pub const WAVEFUNCTIONS_FILE: &str = "wavefuncs.dat";
/// File name for the expectation values table written by [`Solution::save`].
pub const EXPVALUES_FILE: &str = "expvalues.dat";

/// Full description of a single solve.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    /// Particle mass.
    pub mass: f64,
    /// Coordinate grid.
    pub grid: Grid,
    /// Range of eigenpairs to compute.
    pub eigen: EigenRequest,
    /// Interpolation method used to discretize `samples`.
    pub interpolation: Interpolation,
    /// Sparse samples of the potential.
    pub samples: SampleSet,
}

/// Output of a single solve.
#[derive(Clone, Debug)]
pub struct Solution {
    potential: DiscretizedPotential,
    spectrum: EigenSpectrum,
    observables: Observables,
}

impl Solution {
    /// Get a reference to the discretized potential.
    pub fn get_potential(&self) -> &DiscretizedPotential { &self.potential }

    /// Get a reference to the computed eigenpairs.
    pub fn get_spectrum(&self) -> &EigenSpectrum { &self.spectrum }

    /// Get a reference to the position observables.
    pub fn get_observables(&self) -> &Observables { &self.observables }

    /// Return the `npoints × 2` table of `(x, V(x))` rows.
    pub fn potential_table(&self) -> nd::Array2<f64> {
        self.potential.to_table()
    }

    /// Return the `k × 1` table of ascending energies.
    pub fn energies_table(&self) -> nd::Array2<f64> {
        self.spectrum.get_values().clone().insert_axis(nd::Axis(1))
    }

    /// Return the `npoints × (k + 1)` table whose first column is the grid
    /// and whose remaining columns are the eigenvectors.
    pub fn wavefunctions_table(&self) -> nd::Array2<f64> {
        let x = self.potential.get_x();
        let wfs = self.spectrum.get_vectors();
        nd::Array2::from_shape_fn(
            (x.len(), wfs.ncols() + 1),
            |(i, j)| if j == 0 { x[i] } else { wfs[[i, j - 1]] },
        )
    }

    /// Return the `k × 2` table of `(<x>, σ)` rows.
    pub fn expvalues_table(&self) -> nd::Array2<f64> {
        self.observables.to_table()
    }

    /// Write all four tables to files in `dir`, which must already exist.
    pub fn save<P>(&self, dir: P) -> Result<(), TableError>
    where P: AsRef<Path>
    {
        let dir = dir.as_ref();
        table::save_table(dir.join(POTENTIAL_FILE), &self.potential_table())?;
        table::save_table(dir.join(ENERGIES_FILE), &self.energies_table())?;
        table::save_table(dir.join(WAVEFUNCTIONS_FILE), &self.wavefunctions_table())?;
        table::save_table(dir.join(EXPVALUES_FILE), &self.expvalues_table())?;
        tracing::debug!(dir = %dir.display(), "wrote solution tables");
        Ok(())
    }
}

/// Run the full pipeline for `problem`.
///
/// The eigen request is checked against the grid size before any work is
/// done.
///
/// ```
/// use seqsolver::{
///     eigen::EigenRequest,
///     grid::{ Grid, SampleSet },
///     interp::Interpolation,
///     solve::{ self, Problem },
/// };
///
/// let problem = Problem {
///     mass: 1.0,
///     grid: Grid::new(-1.0, 1.0, 201).unwrap(),
///     eigen: EigenRequest::lowest(3),
///     interpolation: Interpolation::Linear,
///     samples: SampleSet::from_pairs([(-1.0, 0.0), (1.0, 0.0)]),
/// };
/// let sol = solve::solve(&problem).unwrap();
/// assert_eq!(sol.energies_table().dim(), (3, 1));
/// assert_eq!(sol.wavefunctions_table().dim(), (201, 4));
/// ```
pub fn solve(problem: &Problem) -> XResult<Solution> {
    problem.eigen.check(problem.grid.npoints()).map_err(EigenError::from)?;
    tracing::debug!(
        mass = problem.mass,
        interpolation = %problem.interpolation,
        "solving",
    );
    let potential
        = interp::discretize(&problem.samples, &problem.grid, problem.interpolation)?;
    let h = hamiltonian::build(&potential, problem.mass)?;
    let spectrum = eigen::solve(&h, problem.eigen)?;
    let observables
        = observables::compute(potential.get_x(), spectrum.get_vectors())?;
    Ok(Solution { potential, spectrum, observables })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;
    use crate::error::{ DomainError, InterpError, FitError };

    fn box_problem() -> Problem {
        Problem {
            mass: 1.0,
            grid: Grid::new(0.0, 1.0, 101).unwrap(),
            eigen: EigenRequest::new(2, 4),
            interpolation: Interpolation::Linear,
            samples: SampleSet::from_pairs([(0.0, 0.0), (1.0, 0.0)]),
        }
    }

    #[test]
    fn tables_have_consistent_shapes() {
        let sol = solve(&box_problem()).unwrap();
        assert_eq!(sol.potential_table().dim(), (101, 2));
        assert_eq!(sol.energies_table().dim(), (3, 1));
        assert_eq!(sol.expvalues_table().dim(), (3, 2));
        let wf = sol.wavefunctions_table();
        assert_eq!(wf.dim(), (101, 4));
        assert_eq!(wf.column(0), sol.get_potential().get_x().view());
        assert_eq!(wf.column(2), sol.get_spectrum().get_vectors().column(1));
        assert_eq!(sol.get_spectrum().first_index(), 2);
        // box symmetric about x = 1/2
        sol.get_observables().get_records().iter()
            .for_each(|rec| assert_abs_diff_eq!(rec.mean, 0.5, epsilon = 1e-9));
    }

    #[test]
    fn errors_propagate_by_stage() {
        let mut problem = box_problem();
        problem.eigen = EigenRequest::new(0, 3);
        assert!(matches!(solve(&problem), Err(XError::Eigen(EigenError::Range(_)))));

        let mut problem = box_problem();
        problem.eigen = EigenRequest::new(1, 102);
        assert!(matches!(solve(&problem), Err(XError::Eigen(EigenError::Range(_)))));

        let mut problem = box_problem();
        problem.mass = 0.0;
        assert!(matches!(solve(&problem), Err(XError::Domain(DomainError::BadMass(_)))));

        let mut problem = box_problem();
        problem.interpolation = Interpolation::Polynomial { degree: 2 };
        assert!(matches!(
            solve(&problem),
            Err(XError::Interp(InterpError::Fit(FitError::DegreeTooHigh { .. }))),
        ));
    }

    #[test]
    fn save_writes_all_tables() {
        let sol = solve(&box_problem()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        sol.save(dir.path()).unwrap();
        let energies = table::load_table(dir.path().join(ENERGIES_FILE)).unwrap();
        assert_eq!(energies, sol.energies_table());
        let wf = table::load_table(dir.path().join(WAVEFUNCTIONS_FILE)).unwrap();
        assert_eq!(wf, sol.wavefunctions_table());
        assert!(dir.path().join(POTENTIAL_FILE).is_file());
        assert!(dir.path().join(EXPVALUES_FILE).is_file());
    }
}
