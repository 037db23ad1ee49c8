//! Plain-text numeric tables.
//!
//! Tables are written one row per line, with columns separated by single
//! spaces and every value in scientific notation with 18 digits after the
//! decimal point and a signed, two-digit exponent (e.g.
//! `-1.250000000000000000e-01`). Reading is more lenient: any whitespace
//! separates columns, and `#` starts a comment.

use std::{
    fs,
    io::{ self, BufRead, BufWriter, Write },
    path::Path,
};
use ndarray as nd;
use crate::{ Arr2, error::TableError };

/// Format a single value.
pub fn format_value(value: f64) -> String {
    let repr = format!("{:.18e}", value);
    match repr.split_once('e') {
        Some((mant, exp)) => match exp.parse::<i32>() {
            Ok(exp) => format!("{}e{:+03}", mant, exp),
            Err(_) => repr,
        },
        None => repr,
    }
}

/// Write `table` to `writer`.
pub fn write_table<W, S>(writer: &mut W, table: &Arr2<S>) -> io::Result<()>
where
    W: Write,
    S: nd::Data<Elem = f64>,
{
    for row in table.rows() {
        let line: Vec<String> = row.iter().copied().map(format_value).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Read a table from `reader`.
///
/// Blank and comment-only lines are skipped. Fails if a token is not a
/// number or if rows have differing numbers of columns.
pub fn read_table<R>(reader: R) -> Result<nd::Array2<f64>, TableError>
where R: BufRead
{
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (k, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("");
        if content.trim().is_empty() { continue; }
        let row: Vec<f64>
            = content.split_whitespace()
            .map(|token| {
                token.parse::<f64>()
                    .map_err(|_| TableError::Parse { line: k + 1, token: token.into() })
            })
            .collect::<Result<_, _>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(TableError::Ragged {
                    line: k + 1,
                    expected: first.len(),
                    got: row.len(),
                });
            }
        }
        rows.push(row);
    }
    let ncols = rows.first().map(|row| row.len()).unwrap_or(0);
    Ok(nd::Array2::from_shape_fn((rows.len(), ncols), |(i, j)| rows[i][j]))
}

/// Write `table` to a file at `path`, creating or truncating it.
pub fn save_table<P, S>(path: P, table: &Arr2<S>) -> Result<(), TableError>
where
    P: AsRef<Path>,
    S: nd::Data<Elem = f64>,
{
    let mut writer = BufWriter::new(fs::File::create(path)?);
    write_table(&mut writer, table)?;
    writer.flush()?;
    Ok(())
}

/// Read a table from a file at `path`.
pub fn load_table<P>(path: P) -> Result<nd::Array2<f64>, TableError>
where P: AsRef<Path>
{
    read_table(io::BufReader::new(fs::File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_format() {
        assert_eq!(format_value(1.0), "1.000000000000000000e+00");
        assert_eq!(format_value(-0.125), "-1.250000000000000000e-01");
        assert_eq!(format_value(0.0), "0.000000000000000000e+00");
        // digits past the 17th are those of the exact binary value
        assert_eq!(format_value(-0.00125), "-1.250000000000000026e-03");
        assert_eq!(format_value(6.02e23), "6.019999999999999958e+23");
        assert_eq!(format_value(1e-300), "1.000000000000000025e-300");
    }

    #[test]
    fn write_then_read_preserves_values() {
        let table = nd::array![[0.1, -2.5e-7], [1.0 / 3.0, 1e10]];
        let mut buf: Vec<u8> = Vec::new();
        write_table(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(text.lines().next().unwrap().split(' ').count(), 2);
        let back = read_table(text.as_bytes()).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn read_errors() {
        let text = "# header\n1 2\n\n3 x\n";
        assert!(matches!(
            read_table(text.as_bytes()),
            Err(TableError::Parse { line: 4, token }) if token == "x",
        ));
        let text = "1 2\n3 4 5\n";
        assert!(matches!(
            read_table(text.as_bytes()),
            Err(TableError::Ragged { line: 2, expected: 2, got: 3 }),
        ));
        assert_eq!(read_table("".as_bytes()).unwrap().dim(), (0, 0));
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energies.dat");
        let table = nd::array![[0.5], [1.5], [2.5]];
        save_table(&path, &table).unwrap();
        assert_eq!(load_table(&path).unwrap(), table);
        assert!(matches!(
            load_table(dir.path().join("missing.dat")),
            Err(TableError::Io(_)),
        ));
    }
}
