use seqsolver::{
    eigen::{ self, EigenRequest },
    grid::{ Grid, SampleSet },
    hamiltonian,
    interp::{ DiscretizedPotential, Interpolation },
    solve::{ self, Problem },
};

// solve for eigenstates of the quantum harmonic oscillator

fn main() -> anyhow::Result<()> {
    const MASS: f64 = 4.0;
    const OMEGA: f64 = 1.0;
    const NSTATES: usize = 5;

    let e = |n: usize| OMEGA * (0.5 + n as f64);
    let v = |x: f64| 0.5 * MASS * OMEGA.powi(2) * x.powi(2);

    // from five samples of the potential, fitted with a parabola
    let problem = Problem {
        mass: MASS,
        grid: Grid::new(-5.0, 5.0, 1999)?,
        eigen: EigenRequest::lowest(NSTATES),
        interpolation: Interpolation::Polynomial { degree: 2 },
        samples: SampleSet::from_pairs(
            [-2.0, -1.0, 0.0, 1.0, 2.0].into_iter().map(|x| (x, v(x)))),
    };
    let sol = solve::solve(&problem)?;
    println!("  n      expected      computed           <x>         σ(x)");
    sol.get_spectrum().states()
        .zip(sol.get_observables().get_records())
        .for_each(|(state, rec)| {
            println!(
                "{:3}  {:12.6}  {:12.6}  {:12.3e}  {:11.6}",
                state.index, e(state.index - 1), state.e, rec.mean, rec.sigma,
            );
        });

    // the same directly from the exact potential, on a finer grid
    let grid = Grid::new(-6.0, 6.0, 4001)?;
    let pot = DiscretizedPotential::from_fn(&grid, v);
    let h = hamiltonian::build(&pot, MASS)?;
    let spec = eigen::solve(&h, EigenRequest::new(10, 12))?;
    println!();
    spec.states()
        .for_each(|state| {
            println!(
                "{:3}  {:12.6}  {:12.6}",
                state.index, e(state.index - 1), state.e,
            );
        });
    Ok(())
}
