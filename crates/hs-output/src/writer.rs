//! Plain-text profile tables.
//!
//! The `.hse` table has a commented header giving the cell count and the
//! variable names, then one row per cell: coordinate, density, temperature,
//! pressure and one mass fraction per species present in the profile. The
//! `.extras` table has the same layout with sound speed and entropy.

use crate::{OutputError, OutputResult};
use hs_eos::Species;
use hs_model::Profile;
use std::io::{BufRead, Write};

const THERMO_COLUMNS: [&str; 3] = ["density", "temperature", "pressure"];
const EXTRA_COLUMNS: [&str; 2] = ["sound speed", "entropy"];

/// Species with a nonzero mass fraction in any cell, in table order.
pub fn present_species(profile: &Profile) -> Vec<Species> {
    Species::ALL
        .iter()
        .copied()
        .filter(|&sp| {
            profile
                .zones()
                .iter()
                .any(|z| z.composition.mass_fraction(sp) > 0.0)
        })
        .collect()
}

pub fn write_profile(profile: &Profile, out: &mut impl Write) -> OutputResult<()> {
    let species = present_species(profile);
    let mut names: Vec<&str> = THERMO_COLUMNS.to_vec();
    names.extend(species.iter().map(|sp| sp.long_name()));
    write_header(out, profile.len(), &names)?;

    for (i, zone) in profile.zones().iter().enumerate() {
        let mut row = vec![profile.grid().center(i), zone.rho, zone.t, zone.p];
        row.extend(species.iter().map(|&sp| zone.composition.mass_fraction(sp)));
        write_row(out, &row)?;
    }
    Ok(())
}

pub fn write_extras(profile: &Profile, out: &mut impl Write) -> OutputResult<()> {
    write_header(out, profile.len(), &EXTRA_COLUMNS)?;
    for (i, zone) in profile.zones().iter().enumerate() {
        write_row(out, &[profile.grid().center(i), zone.cs, zone.s])?;
    }
    Ok(())
}

fn write_header(out: &mut impl Write, npts: usize, names: &[&str]) -> OutputResult<()> {
    writeln!(out, "# npts = {npts}")?;
    writeln!(out, "# num of variables = {}", names.len())?;
    for name in names {
        writeln!(out, "# {name}")?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, values: &[f64]) -> OutputResult<()> {
    for v in values {
        write!(out, "{v:>20.12e}")?;
    }
    writeln!(out)?;
    Ok(())
}

/// A table read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    pub variables: Vec<String>,
    /// Coordinate of each row.
    pub coordinates: Vec<f64>,
    /// One entry per row, one value per variable.
    pub rows: Vec<Vec<f64>>,
}

impl ProfileTable {
    pub fn parse(input: impl BufRead) -> OutputResult<Self> {
        let mut npts: Option<usize> = None;
        let mut nvars: Option<usize> = None;
        let mut variables = Vec::new();
        let mut coordinates = Vec::new();
        let mut rows = Vec::new();

        for (n, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = n + 1;
            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim();
                if let Some(v) = comment.strip_prefix("npts =") {
                    npts = Some(parse_count(v, line_no)?);
                } else if let Some(v) = comment.strip_prefix("num of variables =") {
                    nvars = Some(parse_count(v, line_no)?);
                } else {
                    variables.push(comment.to_string());
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let mut values = Vec::new();
            for field in line.split_whitespace() {
                let value = field.parse::<f64>().map_err(|_| OutputError::Malformed {
                    line: line_no,
                    what: format!("not a number: {field}"),
                })?;
                values.push(value);
            }
            if values.len() != variables.len() + 1 {
                return Err(OutputError::Malformed {
                    line: line_no,
                    what: format!(
                        "expected {} columns, found {}",
                        variables.len() + 1,
                        values.len()
                    ),
                });
            }
            coordinates.push(values[0]);
            values.remove(0);
            rows.push(values);
        }

        if nvars != Some(variables.len()) {
            return Err(OutputError::Malformed {
                line: 0,
                what: format!(
                    "header declares {nvars:?} variables, names {}",
                    variables.len()
                ),
            });
        }
        if npts != Some(rows.len()) {
            return Err(OutputError::Malformed {
                line: 0,
                what: format!("header declares {npts:?} rows, found {}", rows.len()),
            });
        }

        Ok(Self {
            variables,
            coordinates,
            rows,
        })
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let k = self.variables.iter().position(|v| v == name)?;
        Some(self.rows.iter().map(|r| r[k]).collect())
    }
}

fn parse_count(text: &str, line: usize) -> OutputResult<usize> {
    text.trim().parse().map_err(|_| OutputError::Malformed {
        line,
        what: format!("bad count: {}", text.trim()),
    })
}
