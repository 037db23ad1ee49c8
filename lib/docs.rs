//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Discretization](#discretization)
//! - [Eigenvalues by bisection](#eigenvalues-by-bisection)
//! - [Eigenvectors by inverse iteration](#eigenvectors-by-inverse-iteration)
//! - [Observables](#observables)
//! - [Interpolation](#interpolation)
//!
//! # Background
//! Solution of the one-dimensional time-independent Schrödinger equation (TISE)
//! ```text
//!    ħ² ∂²
//! - --- --- ψ(x) + V(x) ψ(x) = E ψ(x)
//!   2 m ∂x²
//! ```
//! amounts to finding the eigenpairs of the Hamiltonian operator
//! -(*ħ*²/2 *m*) (*∂*²/*∂x*²) + *V*(*x*), where *V*(*x*) is a (conservative)
//! potential and *m* is the mass of the particle. Since the Hamiltonian is
//! Hermitian, its eigenvalues are real and the associated wavefunctions can be
//! chosen real-valued as well. Everything in this crate works in atomic units,
//! *ħ* = 1, so that energies are measured in units of (1 / mass × length²).
//!
//! # Discretization
//! On a uniform grid
//! ```text
//! x[i] = x₀ + i δx, i ∊ {0, ..., N - 1}
//! ψ[i] = ψ(x[i])
//! V[i] = V(x[i])
//! ```
//! the second derivative is replaced by the three-point central difference
//! ```text
//! ∂²ψ      ψ[i + 1] - 2 ψ[i] + ψ[i - 1]
//! --- [i] ≈ ---------------------------- + O(δx²)
//! ∂x²                  δx²
//! ```
//! with the wavefunction taken to vanish at the (implicit) points *x*[-1] and
//! *x*[*N*], i.e. the grid is enclosed by infinitely high walls just outside
//! its ends. The TISE then becomes the *N*×*N* matrix eigenvalue problem
//! ```text
//! H ψ = E ψ
//!
//! H[i, i]     = 1 / (m δx²) + V[i]
//! H[i, i ± 1] = -1 / (2 m δx²)
//! ```
//! which is real, symmetric, and tridiagonal. For *V* = 0 the eigenvalues are
//! known exactly,
//! ```text
//!        1                kπ
//! E_k = ---- (1 - cos(-------)),  k ∊ {1, ..., N}
//!       m δx²            N + 1
//! ```
//! which approach the infinite-well energies (*kπ*)² / (2 *m* *L*²) with
//! *L* = (*N* + 1) *δx* as *N* → ∞.
//!
//! Since only a handful of the lowest (or otherwise contiguous) eigenpairs are
//! usually wanted, there is no need to diagonalize *H* fully; see below.
//!
//! # Eigenvalues by bisection
//! For a symmetric tridiagonal matrix *T* with diagonal *a* and off-diagonal
//! *b*, the LDLᵀ factorization of *T* - *λ* *I* has pivots
//! ```text
//! d[0] = a[0] - λ
//! d[i] = a[i] - λ - b[i - 1]² / d[i - 1]
//! ```
//! By Sylvester's law of inertia, the number of negative pivots equals the
//! number of eigenvalues of *T* strictly less than *λ*. This count (the Sturm
//! count) is monotone in *λ*, so the *k*-th eigenvalue can be isolated by
//! bisection, starting from the Gershgorin interval that contains the whole
//! spectrum[^1]. Pivots that come out too close to zero are replaced by a tiny
//! negative number, which keeps the recurrence finite without changing the
//! count by more than the rounding already present.
//!
//! Bisection stops once the bracketing interval is narrower than
//! ```text
//! max(ε ‖T‖₁, 2 ε max(|lower|, |upper|))
//! ```
//! where *ε* is the machine epsilon, which determines each eigenvalue to
//! within a small multiple of the unavoidable rounding error. The number of
//! halvings this takes is known in advance, so exceeding it signals a genuine
//! failure.
//!
//! # Eigenvectors by inverse iteration
//! Given an accurate eigenvalue approximation *λ*, the corresponding
//! eigenvector is the dominant direction of (*T* - *λ* *I*)⁻¹. Inverse
//! iteration therefore repeatedly solves
//! ```text
//! (T - λ I) y = v,  v ← y / ‖y‖₂
//! ```
//! from a (deterministic) pseudo-random starting vector, using an LU
//! factorization with partial pivoting that is computed once per
//! eigenvalue[^2]. Because *λ* is so close to an eigenvalue, a single step
//! usually suffices; iteration stops when the residual
//! ```text
//! ‖T v - λ v‖₂ ≤ 16 √N ε ‖T‖₁
//! ```
//! and at least two steps have been taken.
//!
//! Eigenvectors for eigenvalues that are close together (relative to ‖*T*‖₁)
//! are ill-determined individually: any rotation within their span is almost
//! as good. Each new vector in such a cluster is therefore orthogonalized
//! (modified Gram-Schmidt) against the ones already found at every step, and
//! coincident eigenvalues receive slightly separated shifts. Nearly degenerate
//! pairs arise physically as the tunnelling doublets of symmetric double
//! wells.
//!
//! Eigenvectors are returned with unit sum of squares over the grid and with
//! the first component whose magnitude exceeds 10⁻⁶ of the largest made
//! positive, so that results are reproducible.
//!
//! # Observables
//! With discrete eigenvectors normalized as above, position moments are plain
//! sums over the grid,
//! ```text
//! <x>  = Σ ψ[i] x[i] ψ[i]
//! <x²> = Σ ψ[i] x[i]² ψ[i]
//! σ    = √(<x²> - <x>²)
//! ```
//! with no factor of *δx*. Equivalently, the wavefunctions are normalized with
//! respect to the discrete inner product rather than an approximation to the
//! continuum integral; the two conventions differ only by an overall factor
//! √*δx* on every wavefunction, which cancels in the moments above.
//!
//! # Interpolation
//! The potential is supplied only at a few sample points and must be filled in
//! over the whole grid. Three schemes are available:
//! - Piecewise-linear, with the end sample values held constant beyond the
//!   sampled range. This is well suited to piecewise-constant wells, where
//!   near-vertical walls are given as pairs of close sample points.
//! - A least-squares polynomial of fixed degree. The fit is an SVD
//!   least-squares solve on the Vandermonde matrix with its columns scaled to
//!   unit norm. High degrees oscillate strongly between samples (Runge's
//!   phenomenon) and should be avoided.
//! - A natural cubic spline, i.e. the twice-continuously differentiable
//!   piecewise cubic through every sample with zero second derivative at both
//!   ends. Beyond the sampled range the end cubics are continued.
//!
//! [^1]: W. Barth, R. S. Martin, and J. H. Wilkinson, "Calculation of the
//! eigenvalues of a symmetric tridiagonal matrix by the method of bisection."
//! Numerische Mathematik **9** 386-393 (1967).
//!
//! [^2]: I. C. F. Ipsen, "Computing an eigenvector with inverse iteration."
//! SIAM Review **39** 2 254-291 (1997).
