//! Delimited text format for particle sets.
//!
//! One header row followed by one row per particle:
//!
//! ```text
//! id,x,y,z,vx,vy,vz,mass,time
//! 0,0.5,0.25,1,0,0,0,1,0
//! ```
//!
//! Floats are written in Rust's shortest round-trip form, so position,
//! velocity, mass and time reload bit-for-bit. The `id` column is informational:
//! loaded particles receive fresh ids from the supplied allocator.

use std::io::{BufRead, Write};

use crate::core::id::IdAllocator;
use crate::core::particle::Particle;
use crate::core::particle_set::ParticleSet;
use crate::error::{Error, Result};

/// Field separator.
pub const DELIMITER: char = ',';

/// Header names, in column order.
pub const COLUMNS: [&str; 9] = ["id", "x", "y", "z", "vx", "vy", "vz", "mass", "time"];

/// Write `set` with header to `out`.
pub fn write_set<W: Write>(set: &ParticleSet, mut out: W) -> Result<()> {
    writeln!(out, "{}", COLUMNS.join(","))?;
    for p in set.iter() {
        let [x, y, z] = p.position;
        let [vx, vy, vz] = p.velocity;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            p.id(),
            x,
            y,
            z,
            vx,
            vy,
            vz,
            p.mass,
            p.current_time
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Read a set written by [`write_set`].
///
/// Errors:
/// - `Error::Parse` on a missing or unexpected header, a row with the wrong
///   number of columns, a field that does not parse, or a blank row followed
///   by more data. Blank lines after the last row are ignored.
/// - `Error::Io` if reading fails.
pub fn read_set<R: BufRead>(input: R, ids: &IdAllocator) -> Result<ParticleSet> {
    let mut lines = input.lines().enumerate();

    let header = match lines.next() {
        Some((_, line)) => line?,
        None => return Err(Error::parse(1, "missing header row")),
    };
    let names: Vec<&str> = header.trim().split(DELIMITER).map(str::trim).collect();
    if names != COLUMNS {
        return Err(Error::parse(
            1,
            format!("expected header `{}`, found `{}`", COLUMNS.join(","), header.trim()),
        ));
    }

    // Rows are parsed into a buffer first so a bad row allocates no ids.
    // Blank lines are only allowed after the last data row.
    let mut rows = Vec::new();
    let mut first_blank: Option<usize> = None;
    for (idx, line) in lines {
        let line = line?;
        let lineno = idx + 1;
        if line.trim().is_empty() {
            first_blank.get_or_insert(lineno);
            continue;
        }
        if let Some(blank) = first_blank {
            return Err(Error::parse(blank, "blank row between data rows"));
        }
        rows.push(parse_row(&line, lineno)?);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut p = Particle::new_in(
                ids,
                [row[0], row[1], row[2]],
                [row[3], row[4], row[5]],
                row[6],
            );
            p.current_time = row[7];
            p
        })
        .collect())
}

fn parse_row(line: &str, lineno: usize) -> Result<[f64; 8]> {
    let fields: Vec<&str> = line.trim().split(DELIMITER).map(str::trim).collect();
    if fields.len() != COLUMNS.len() {
        return Err(Error::parse(
            lineno,
            format!("expected {} columns, found {}", COLUMNS.len(), fields.len()),
        ));
    }
    fields[0]
        .parse::<u64>()
        .map_err(|e| Error::parse(lineno, format!("column `id`: {e}")))?;

    let mut values = [0.0; 8];
    for (k, (value, field)) in values.iter_mut().zip(&fields[1..]).enumerate() {
        *value = field
            .parse::<f64>()
            .map_err(|e| Error::parse(lineno, format!("column `{}`: {e}", COLUMNS[k + 1])))?;
    }
    Ok(values)
}
