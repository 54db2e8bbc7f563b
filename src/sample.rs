use hifitime::Epoch;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::projection::PolarStereographic;
use crate::record::GnssRecord;

/// One GPS epoch measurement, reprojected to the station plane.
/// Built by ingestion only; a [Station](crate::prelude::Station) keeps
/// its samples sorted by decimal year epoch at all times.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Calendar timestamp (UTC)
    pub date: Epoch,
    /// Decimal year epoch
    pub epoch: f64,
    /// Latitude [°]
    pub lat: f64,
    /// Longitude [°]
    pub lon: f64,
    /// Projected easting [m]
    pub x: f64,
    /// Projected northing [m]
    pub y: f64,
    /// Ellipsoidal height [m]
    pub z: f64,
    /// 3 sigma position uncertainty [m]
    pub sigma3: f64,
}

impl Sample {
    /// Builds a [Sample] by projecting one raw record.
    pub(crate) fn from_record(record: &GnssRecord, projection: &PolarStereographic) -> Self {
        let (x, y) = projection.forward(record.lat, record.lon);
        Self {
            date: crate::epoch::decimal_year_to_epoch(record.epoch),
            epoch: record.epoch,
            lat: record.lat,
            lon: record.lon,
            x,
            y,
            z: record.z,
            sigma3: record.sigma3,
        }
    }
}
