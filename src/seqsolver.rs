//! Solve the one-dimensional Schrödinger equation for a potential described in
//! an input file, writing the potential, energies, wavefunctions, and position
//! expectation values as plain-text tables.

use std::{
    fs,
    io::{ self, BufRead, Write },
    path::PathBuf,
};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use seqsolver::{ input::InputFile, solve };

#[derive(Debug, Parser)]
#[command(name = "seqsolver")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Problem description file
    #[arg(default_value = "schrodinger.inp")]
    input: PathBuf,

    /// Directory in which to write output tables
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Degree of the fitting polynomial, if not given in the input file
    #[arg(short, long)]
    degree: Option<usize>,
}

fn prompt_degree() -> anyhow::Result<usize> {
    let mut stdout = io::stdout();
    write!(stdout, "Degree of the fitting polynomial: ")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)
        .context("failed to read polynomial degree")?;
    line.trim().parse()
        .with_context(|| format!("invalid polynomial degree '{}'", line.trim()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let file = InputFile::parse(&text)
        .with_context(|| format!("malformed input file {}", cli.input.display()))?;
    let degree
        = if file.needs_degree() && cli.degree.is_none() {
            Some(prompt_degree()?)
        } else {
            cli.degree
        };
    let problem = file.into_problem(degree)?;
    tracing::info!(
        mass = problem.mass,
        xmin = problem.grid.xmin(),
        xmax = problem.grid.xmax(),
        npoints = problem.grid.npoints(),
        interpolation = %problem.interpolation,
        "loaded {}",
        cli.input.display(),
    );

    let sol = solve::solve(&problem).context("failed to solve")?;
    sol.get_spectrum().states()
        .zip(sol.get_observables().get_records())
        .for_each(|(state, rec)| {
            tracing::info!(
                n = state.index,
                e = state.e,
                x = rec.mean,
                sigma = rec.sigma,
                "eigenstate",
            );
        });

    fs::create_dir_all(&cli.output_dir)
        .with_context(|| format!("failed to create {}", cli.output_dir.display()))?;
    sol.save(&cli.output_dir)
        .with_context(|| format!("failed to write output to {}", cli.output_dir.display()))?;
    Ok(())
}
