//! Reading problem descriptions from `schrodinger.inp`-style text.
//!
//! The format is one field per line:
//! ```text
//! 2.0                 # mass
//! -2.0 2.0 1999       # xmin xmax npoints
//! 1 5                 # first and last eigenvalue (1-based, inclusive)
//! polynomial 2        # interpolation type, with optional degree
//! 3                   # number of sample points
//! -2.0 4.0
//! 0.0 0.0
//! 2.0 4.0
//! ```
//! Anything after a `#` or after the first tab on a line is ignored, as are
//! blank lines.

use std::str::FromStr;
use crate::{
    eigen::EigenRequest,
    error::InputError,
    grid::{ Grid, SampleSet },
    interp::Interpolation,
    solve::{ Problem, XResult },
};

/// The raw contents of an input file.
///
/// The interpolation type is validated when the file is parsed, but the
/// polynomial degree may be left unspecified until
/// [`into_problem`][Self::into_problem].
#[derive(Clone, Debug, PartialEq)]
pub struct InputFile {
    /// Particle mass.
    pub mass: f64,
    /// Grid window `(xmin, xmax, npoints)`.
    pub window: (f64, f64, usize),
    /// 1-based inclusive eigenvalue index range `(lo, hi)`.
    pub eigen: (usize, usize),
    /// Interpolation type name: `linear`, `polynomial`, or `cspline`.
    pub interpolation: String,
    /// Polynomial degree, if given on the interpolation line.
    pub degree: Option<usize>,
    /// Potential samples.
    pub samples: SampleSet,
}

fn strip_line(line: &str) -> &str {
    let line = line.split('#').next().unwrap_or("");
    line.split('\t').next().unwrap_or("").trim()
}

fn parse_token<T>(field: &'static str, token: &str) -> Result<T, InputError>
where T: FromStr
{
    token.parse()
        .map_err(|_| InputError::BadField { field, value: token.into() })
}

// parse a line as exactly `N` whitespace-separated tokens
fn tokens<'a, const N: usize>(field: &'static str, line: &'a str)
    -> Result<[&'a str; N], InputError>
{
    let toks: Vec<&str> = line.split_whitespace().collect();
    toks.try_into()
        .map_err(|_| InputError::BadField { field, value: line.into() })
}

impl InputFile {
    /// Parse the contents of an input file.
    pub fn parse(text: &str) -> Result<Self, InputError> {
        let mut lines = text.lines().map(strip_line).filter(|l| !l.is_empty());
        let mut next_line = |field: &'static str| {
            lines.next().ok_or(InputError::MissingField(field))
        };

        let mass: f64 = parse_token("mass", next_line("mass")?)?;

        let [xmin, xmax, npoints] = tokens::<3>("window", next_line("window")?)?;
        let window: (f64, f64, usize) = (
            parse_token("xmin", xmin)?,
            parse_token("xmax", xmax)?,
            parse_token("npoints", npoints)?,
        );

        let [lo, hi] = tokens::<2>("eigen range", next_line("eigen range")?)?;
        let eigen: (usize, usize) = (
            parse_token("first eigenvalue", lo)?,
            parse_token("last eigenvalue", hi)?,
        );

        let interp_line = next_line("interpolation type")?;
        let mut interp_toks = interp_line.split_whitespace();
        let interpolation: String
            = interp_toks.next()
            .ok_or(InputError::MissingField("interpolation type"))?
            .into();
        let degree: Option<usize>
            = interp_toks.next()
            .map(|d| parse_token("polynomial degree", d))
            .transpose()?;
        // only the name is checked here; the degree may still be missing
        if let Err(err @ InputError::UnsupportedInterpolation(_))
            = Interpolation::from_name(&interpolation, degree)
        {
            return Err(err);
        }

        let nsamples: usize
            = parse_token("sample count", next_line("sample count")?)?;
        let pairs: Vec<(f64, f64)>
            = lines
            .map(|line| {
                let [x, y] = tokens::<2>("sample point", line)?;
                Ok((parse_token("sample x", x)?, parse_token("sample y", y)?))
            })
            .collect::<Result<_, InputError>>()?;
        if pairs.len() != nsamples {
            return Err(InputError::SampleCount {
                expected: nsamples,
                got: pairs.len(),
            });
        }
        let samples = SampleSet::from_pairs(pairs);

        Ok(Self { mass, window, eigen, interpolation, degree, samples })
    }

    /// Return `true` if the interpolation type requires a degree and none was
    /// given in the file.
    pub fn needs_degree(&self) -> bool {
        self.degree.is_none()
            && matches!(
                Interpolation::from_name(&self.interpolation, None),
                Err(InputError::MissingDegree),
            )
    }

    /// Convert to a [`Problem`].
    ///
    /// A degree given in the file takes precedence over `degree`.
    pub fn into_problem(self, degree: Option<usize>) -> XResult<Problem> {
        let interpolation
            = Interpolation::from_name(&self.interpolation, self.degree.or(degree))?;
        let (xmin, xmax, npoints) = self.window;
        let grid = Grid::new(xmin, xmax, npoints)?;
        let (lo, hi) = self.eigen;
        Ok(Problem {
            mass: self.mass,
            grid,
            eigen: EigenRequest::new(lo, hi),
            interpolation,
            samples: self.samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XError;

    const INFINITE_WELL: &str = "\
2.0\t# mass
-2.0 2.0 1999\t# xMin xMax nPoint
1 5\t# first and last eigenvalue

linear\t# interpolation type
2\t# nr. of interpolation points
-2.0 0.0
2.0 0.0
";

    #[test]
    fn parses_tab_commented_file() {
        let file = InputFile::parse(INFINITE_WELL).unwrap();
        assert_eq!(file.mass, 2.0);
        assert_eq!(file.window, (-2.0, 2.0, 1999));
        assert_eq!(file.eigen, (1, 5));
        assert_eq!(file.interpolation, "linear");
        assert_eq!(file.degree, None);
        assert!(!file.needs_degree());
        assert_eq!(file.samples.get_x().to_vec(), vec![-2.0, 2.0]);
        let problem = file.into_problem(None).unwrap();
        assert_eq!(problem.interpolation, Interpolation::Linear);
        assert_eq!(problem.grid.npoints(), 1999);
        assert_eq!((problem.eigen.lo(), problem.eigen.hi()), (1, 5));
    }

    #[test]
    fn polynomial_degree_sources() {
        let text = "4.0\n-5 5 101\n1 3\npolynomial\n3\n-1 1\n0 0\n1 1\n";
        let file = InputFile::parse(text).unwrap();
        assert!(file.needs_degree());
        assert!(matches!(
            file.clone().into_problem(None),
            Err(XError::Input(InputError::MissingDegree)),
        ));
        let problem = file.into_problem(Some(2)).unwrap();
        assert_eq!(problem.interpolation, Interpolation::Polynomial { degree: 2 });

        let inline = text.replace("polynomial\n", "polynomial 2 # inline\n");
        let file = InputFile::parse(&inline).unwrap();
        assert_eq!(file.degree, Some(2));
        let problem = file.into_problem(Some(5)).unwrap();
        assert_eq!(problem.interpolation, Interpolation::Polynomial { degree: 2 });
    }

    #[test]
    fn rejects_malformed_input() {
        let bad_kind = INFINITE_WELL.replace("linear", "quadratic");
        assert!(matches!(
            InputFile::parse(&bad_kind),
            Err(InputError::UnsupportedInterpolation(name)) if name == "quadratic",
        ));

        let bad_count = INFINITE_WELL.replace("\n2\t#", "\n3\t#");
        assert!(matches!(
            InputFile::parse(&bad_count),
            Err(InputError::SampleCount { expected: 3, got: 2 }),
        ));

        let bad_mass = INFINITE_WELL.replace("2.0\t# mass", "heavy\t# mass");
        assert!(matches!(
            InputFile::parse(&bad_mass),
            Err(InputError::BadField { field: "mass", .. }),
        ));

        let short_window = INFINITE_WELL.replace("-2.0 2.0 1999", "-2.0 2.0");
        assert!(matches!(
            InputFile::parse(&short_window),
            Err(InputError::BadField { field: "window", .. }),
        ));

        assert!(matches!(
            InputFile::parse("1.0\n"),
            Err(InputError::MissingField("window")),
        ));
    }
}
