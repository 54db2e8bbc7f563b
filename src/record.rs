//! JPL processed position file parsing.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Calendar sanity bounds on the decimal year epoch field.
const MIN_DECIMAL_YEAR: f64 = 1900.0;
const MAX_DECIMAL_YEAR: f64 = 2200.0;

/// One raw GPS position record, as read from a position file or from
/// a repository query. Geographic coordinates, not yet projected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GnssRecord {
    /// Decimal year epoch
    pub epoch: f64,
    /// Latitude [°]
    pub lat: f64,
    /// Longitude [°]
    pub lon: f64,
    /// Ellipsoidal height [m]
    pub z: f64,
    /// 3 sigma position uncertainty [m]
    pub sigma3: f64,
}

/// Reads a position file for the given station.
/// Unlike per line issues, a file that cannot be opened is an [Error].
pub fn read_position_file<P: AsRef<Path>>(
    path: P,
    station_id: &str,
) -> Result<Vec<GnssRecord>, Error> {
    let path = path.as_ref();
    let fd = File::open(path).map_err(|source| Error::FileOpen {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_position_records(BufReader::new(fd), station_id))
}

/// Parses position records line by line. Each line carries six
/// whitespace separated fields:
/// `decimal_year lat lon height sigma station_id`.
/// Lines with a different field count, a foreign station ID or
/// unparsable numbers are skipped with a diagnostic, never fatal.
pub fn parse_position_records<R: BufRead>(reader: R, station_id: &str) -> Vec<GnssRecord> {
    let mut records = Vec::new();
    for (nth, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("{}: skipping line {}: {}", station_id, nth, e);
                continue;
            },
        };
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            warn!(
                "{}: skipping line {}: expected 6 fields, found {}",
                station_id,
                nth,
                fields.len()
            );
            continue;
        }
        if fields[5] != station_id {
            warn!(
                "{}: skipping line {}: foreign station \"{}\"",
                station_id, nth, fields[5]
            );
            continue;
        }
        match parse_numeric_fields(&fields[..5]) {
            Some([epoch, lat, lon, z, sigma3])
                if (MIN_DECIMAL_YEAR..MAX_DECIMAL_YEAR).contains(&epoch) =>
            {
                records.push(GnssRecord {
                    epoch,
                    lat,
                    lon,
                    z,
                    sigma3,
                });
            },
            Some([epoch, ..]) => {
                warn!(
                    "{}: skipping line {}: epoch {} outside calendar bounds",
                    station_id, nth, epoch
                );
            },
            None => {
                warn!("{}: skipping line {}: invalid numeric field", station_id, nth);
            },
        }
    }
    records
}

/// Every field must parse to a finite value: `f64::parse` also
/// accepts "nan" and "inf", which must never reach the epoch and
/// projection arithmetic.
fn parse_numeric_fields(fields: &[&str]) -> Option<[f64; 5]> {
    let mut values = [0.0_f64; 5];
    for (value, field) in values.iter_mut().zip(fields.iter()) {
        *value = field.parse::<f64>().ok().filter(|v| v.is_finite())?;
    }
    Some(values)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    const NIT3_FILE: &str = "\
2020.0 -75.0 0.0 100.0 0.01 NIT3
2020.5 -75.0 0.0 100.0 0.01 NIT3
2021.0 -75.0 0.0 100.0 0.01 NIT3
";

    #[test]
    fn test_parse_well_formed() {
        let records = parse_position_records(Cursor::new(NIT3_FILE), "NIT3");
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            GnssRecord {
                epoch: 2020.0,
                lat: -75.0,
                lon: 0.0,
                z: 100.0,
                sigma3: 0.01,
            }
        );
    }

    #[test]
    fn test_skips_invalid_lines() {
        let content = format!(
            "{}{}",
            NIT3_FILE,
            "2021.5 -75.0 0.0 100.0 NIT3\n\
             2021.5 -75.0 0.0 100.0 0.01 ABCD\n\
             2021.5 -75.0 abc 100.0 0.01 NIT3\n\
             \n"
        );
        let records = parse_position_records(Cursor::new(content), "NIT3");
        // wrong field count, foreign station, bad float: all skipped
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_skips_non_finite_and_out_of_range_fields() {
        let content = "\
nan -75.0 0.0 100.0 0.01 NIT3
2020.5 inf 0.0 100.0 0.01 NIT3
2020.5 -75.0 0.0 -inf 0.01 NIT3
20205.0 -75.0 0.0 100.0 0.01 NIT3
2021.0 -75.0 0.0 100.0 0.01 NIT3
";
        let records = parse_position_records(Cursor::new(content), "NIT3");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].epoch, 2021.0);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_position_file("/does/not/exist", "NIT3"),
            Err(Error::FileOpen { .. })
        ));
    }
}
