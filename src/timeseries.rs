//! Sliding window velocity time series.
use hifitime::{Epoch, Unit};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::epoch::DateSpec;
use crate::error::Error;
use crate::station::{Station, DEFAULT_MIN_POINTS};
use crate::velocity::{Velocity, REGRESSION_MIN_POINTS};

/// Velocity estimation method
#[derive(Default, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    /// OLS regression of position against epoch over the window.
    #[default]
    Regression,
    /// Difference of window averaged positions. Less sensitive to
    /// short window noise, needs density on both window edges.
    PointToPoint,
}

impl std::str::FromStr for Method {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regression" => Ok(Self::Regression),
            "point" => Ok(Self::PointToPoint),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Regression => write!(fmt, "regression"),
            Self::PointToPoint => write!(fmt, "point"),
        }
    }
}

/// Index aligned velocity time series: one window midpoint and one
/// velocity component pair per sliding window step. Under sampled
/// windows appear as NaN, preserving alignment.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VelocitySeries {
    /// Window midpoints
    pub dates: Vec<Epoch>,
    /// Easting rates [m/yr]
    pub vx: Vec<f64>,
    /// Northing rates [m/yr]
    pub vy: Vec<f64>,
}

impl VelocitySeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates (midpoint, velocity) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Epoch, Velocity)> + '_ {
        self.dates
            .iter()
            .zip(self.vx.iter().zip(self.vy.iter()))
            .map(|(date, (vx, vy))| (*date, Velocity { vx: *vx, vy: *vy }))
    }

    fn push(&mut self, date: Epoch, velocity: Velocity) {
        self.dates.push(date);
        self.vx.push(velocity.vx);
        self.vy.push(velocity.vy);
    }
}

impl Station {
    /// Drives either estimator over a window of `dt_hours`, sliding
    /// its start by `sample_interval_hours` from `d1` for as long as
    /// the window fits before `d2`. The point to point method
    /// defaults its averaging period to dT/24 hours when none is
    /// given. Under sampled windows contribute NaN, never an error.
    pub fn compute_velocity_time_series<'b>(
        &self,
        d1: impl Into<DateSpec<'b>>,
        d2: impl Into<DateSpec<'b>>,
        dt_hours: f64,
        sample_interval_hours: f64,
        method: Method,
        averaging_hours: Option<f64>,
    ) -> Result<VelocitySeries, Error> {
        if !(sample_interval_hours > 0.0) {
            return Err(Error::NonPositiveSamplingInterval(sample_interval_hours));
        }
        let d1 = d1.into().resolve()?;
        let d2 = d2.into().resolve()?;
        let averaging_hours = averaging_hours.unwrap_or(dt_hours / 24.0);

        let width = dt_hours * Unit::Hour;
        let step = sample_interval_hours * Unit::Hour;
        let half_width = (dt_hours / 2.0) * Unit::Hour;

        let mut series = VelocitySeries::default();
        let mut current = d1;
        while current + width < d2 {
            let velocity = match method {
                // same floors as the direct estimator APIs: a window
                // resolves here iff it resolves there
                Method::Regression => {
                    self.regression_velocity(current, current + width, REGRESSION_MIN_POINTS)
                },
                Method::PointToPoint => self.pt_to_pt_velocity(
                    current,
                    current + width,
                    DEFAULT_MIN_POINTS,
                    averaging_hours,
                ),
            };
            series.push(current + half_width, velocity);
            current = current + step;
        }
        Ok(series)
    }
}
