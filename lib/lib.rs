#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for automated solution of the
//! one-dimensional, time-independent Schrödinger equation for potentials given
//! as a handful of sample points.
//!
//! Solving proceeds as a strictly forward pipeline:
//! 1. Interpolate sampled `(x, V(x))` pairs onto a uniform grid
//!    ([`interp`]), by
//!     - Piecewise-linear interpolation
//!     - Least-squares polynomial fit
//!     - Natural cubic spline
//! 2. Assemble the three-point finite-difference Hamiltonian, a symmetric
//!    tridiagonal matrix ([`hamiltonian`])
//! 3. Compute a contiguous block of its eigenpairs by Sturm-sequence bisection
//!    and inverse iteration ([`eigen`])
//! 4. Compute position expectation values and uncertainties for each
//!    eigenstate ([`observables`])
//!
//! [`solve::solve`] runs all four; [`input`] and [`table`] read problem
//! descriptions from text and write results as plain-text tables.
//!
//! All quantities are in atomic units (ħ = 1).
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod grid;
pub mod interp;
pub mod tridiag;
pub mod hamiltonian;
pub mod eigen;
pub mod observables;
pub mod solve;
pub mod input;
pub mod table;

pub mod docs;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
