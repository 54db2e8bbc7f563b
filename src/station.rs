//! Per station sample buffer and window subsetting.
use std::path::Path;

use hifitime::Epoch;
use log::debug;

use crate::epoch::DateSpec;
use crate::error::Error;
use crate::projection::{Epsg, PolarStereographic};
use crate::record::{read_position_file, GnssRecord};
use crate::sample::Sample;

/// Windows holding fewer samples than this yield the NaN velocity
/// sentinel, unless the caller requests otherwise.
pub(crate) const DEFAULT_MIN_POINTS: usize = 10;

/// In memory GPS displacement series for one cal/val station.
///
/// A [Station] is created empty, fed any number of position files or
/// record batches (in any order), and queried for velocity over date
/// windows. Samples stay sorted by epoch across every merge. Not
/// internally synchronized: callers serialize access to a shared
/// instance.
#[derive(Debug, Clone)]
pub struct Station {
    station_id: String,
    epsg: Option<Epsg>,
    projection: Option<PolarStereographic>,
    samples: Vec<Sample>,
    /// mean latitude of the latest ingested batch [°]
    mean_lat: f64,
    /// parallel scale at (0°E, mean_lat), undoes projection
    /// distortion at velocity read time
    proj_length_scale: f64,
}

impl Station {
    /// Creates an empty [Station]. The CRS is selected from the first
    /// ingested latitude: [Epsg::AntarcticPolarStereographic] below
    /// 55°S, [Epsg::ArcticPolarStereographic] above 55°N.
    pub fn new(station_id: &str) -> Self {
        Self {
            station_id: station_id.to_string(),
            epsg: None,
            projection: None,
            samples: Vec::new(),
            mean_lat: f64::NAN,
            proj_length_scale: f64::NAN,
        }
    }

    /// Pins the CRS ahead of ingestion, required for stations between
    /// 55°S and 55°N. Immutable once the first batch is in.
    pub fn with_epsg(mut self, epsg: Epsg) -> Self {
        if self.projection.is_none() {
            self.epsg = Some(epsg);
        }
        self
    }

    /// Four character station ID
    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    /// Selected CRS, `None` until pinned or first ingestion
    pub fn epsg(&self) -> Option<Epsg> {
        self.epsg
    }

    /// Retained samples, sorted by epoch
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean latitude of the latest ingested batch [°],
    /// NaN before first ingestion.
    pub fn mean_latitude(&self) -> f64 {
        self.mean_lat
    }

    /// Current projection length scale, NaN before first ingestion.
    pub fn proj_length_scale(&self) -> f64 {
        self.proj_length_scale
    }

    /// Reads a position file and merges it, returning the number of
    /// samples ingested. Invalid lines are skipped with a diagnostic;
    /// a missing file is an [Error].
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, Error> {
        let records = read_position_file(path, &self.station_id)?;
        self.add_records(&records)
    }

    /// Merges a batch of raw records, the repository compatible path.
    /// Projects every record, appends, then re-sorts the whole buffer
    /// by epoch: one stable permutation, whole samples move together.
    pub fn add_records(&mut self, records: &[GnssRecord]) -> Result<usize, Error> {
        if records.is_empty() {
            return Ok(0);
        }
        let projection = match self.projection {
            Some(projection) => projection,
            None => {
                let epsg = match self.epsg {
                    Some(epsg) => epsg,
                    None => Epsg::from_latitude(records[0].lat)?,
                };
                debug!("{}: selected {}", self.station_id, epsg);
                let projection = PolarStereographic::new(epsg);
                self.epsg = Some(epsg);
                self.projection = Some(projection);
                projection
            },
        };

        self.samples
            .extend(records.iter().map(|rec| Sample::from_record(rec, &projection)));

        // keep time monotonic across merges
        self.samples.sort_by(|a, b| a.epoch.total_cmp(&b.epoch));

        self.mean_lat = records.iter().map(|rec| rec.lat).sum::<f64>() / records.len() as f64;
        self.proj_length_scale = projection.parallel_scale(self.mean_lat);

        debug!(
            "{}: merged {} samples ({} total), k={:.6} @ {:.3}°",
            self.station_id,
            records.len(),
            self.samples.len(),
            self.proj_length_scale,
            self.mean_lat
        );
        Ok(records.len())
    }

    /// Returns all samples with timestamp in [d1, d2], both ends
    /// inclusive, or `None` when fewer than `min_points` are in range.
    pub fn subset<'a, 'b>(
        &'a self,
        d1: impl Into<DateSpec<'b>>,
        d2: impl Into<DateSpec<'b>>,
        min_points: usize,
    ) -> Result<Option<&'a [Sample]>, Error> {
        let d1 = d1.into().resolve()?;
        let d2 = d2.into().resolve()?;
        Ok(self.window(d1, d2, min_points))
    }

    /// Closed interval lookup over the sorted buffer.
    pub(crate) fn window(&self, d1: Epoch, d2: Epoch, min_points: usize) -> Option<&[Sample]> {
        let start = self.samples.partition_point(|s| s.date < d1);
        let end = self.samples.partition_point(|s| s.date <= d2);
        let in_range = &self.samples[start..end];
        if in_range.is_empty() || in_range.len() < min_points {
            return None;
        }
        Some(in_range)
    }
}
