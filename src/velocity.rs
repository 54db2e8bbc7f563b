//! Window velocity estimators.
use hifitime::{Epoch, Unit};
use polyfit_rs::polyfit_rs::polyfit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::epoch::DateSpec;
use crate::error::Error;
use crate::sample::Sample;
use crate::station::{Station, DEFAULT_MIN_POINTS};

/// Hours averaged on either side of a date by the point to point
/// estimator, by default.
pub(crate) const DEFAULT_AVERAGING_HOURS: f64 = 12.0;

/// A slope needs two points: the regression estimator's default
/// floor, shared with the sliding window driver.
pub(crate) const REGRESSION_MIN_POINTS: usize = 2;

/// Surface velocity estimate, ground meters per year.
///
/// An under sampled window yields [Velocity::NAN] rather than an
/// error: missing data is not exceptional in GPS time series. Check
/// [Velocity::is_nan] before aggregating.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity {
    /// Easting rate [m/yr]
    pub vx: f64,
    /// Northing rate [m/yr]
    pub vy: f64,
}

impl Velocity {
    /// "No data in window" sentinel
    pub const NAN: Velocity = Velocity {
        vx: f64::NAN,
        vy: f64::NAN,
    };

    pub fn is_nan(&self) -> bool {
        self.vx.is_nan() || self.vy.is_nan()
    }

    /// Magnitude [m/yr]
    pub fn speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

impl std::fmt::Display for Velocity {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "(vx={:.3e}, vy={:.3e}) m/yr", self.vx, self.vy)
    }
}

impl Station {
    /// Regression velocity estimate over [d1, d2]: slope of the OLS
    /// line of projected x (and y) against decimal year epoch, scaled
    /// back to ground units. At least two samples are required,
    /// otherwise [Velocity::NAN].
    pub fn compute_velocity<'b>(
        &self,
        d1: impl Into<DateSpec<'b>>,
        d2: impl Into<DateSpec<'b>>,
    ) -> Result<Velocity, Error> {
        self.compute_velocity_with_min_points(d1, d2, REGRESSION_MIN_POINTS)
    }

    /// [Station::compute_velocity] with a custom sample floor.
    pub fn compute_velocity_with_min_points<'b>(
        &self,
        d1: impl Into<DateSpec<'b>>,
        d2: impl Into<DateSpec<'b>>,
        min_points: usize,
    ) -> Result<Velocity, Error> {
        let d1 = d1.into().resolve()?;
        let d2 = d2.into().resolve()?;
        Ok(self.regression_velocity(d1, d2, min_points))
    }

    pub(crate) fn regression_velocity(&self, d1: Epoch, d2: Epoch, min_points: usize) -> Velocity {
        let samples = match self.window(d1, d2, min_points) {
            Some(samples) => samples,
            None => return Velocity::NAN,
        };
        let epochs: Vec<f64> = samples.iter().map(|s| s.epoch).collect();
        let xs: Vec<f64> = samples.iter().map(|s| s.x).collect();
        let ys: Vec<f64> = samples.iter().map(|s| s.y).collect();
        match (slope(&epochs, &xs), slope(&epochs, &ys)) {
            (Some(vx), Some(vy)) => Velocity {
                vx: vx / self.proj_length_scale(),
                vy: vy / self.proj_length_scale(),
            },
            // degenerate fit (e.g. zero epoch spread)
            _ => Velocity::NAN,
        }
    }

    /// Point to point velocity estimate: positions averaged over
    /// [d ± 12 h] around both dates, differenced and divided by the
    /// elapsed mean epoch. Less sensitive to short window noise than
    /// the regression estimate, but needs adequate sample density on
    /// both sides ([Station::compute_velocity_pt_to_pt_with_options]
    /// tunes the floor and the averaging period).
    pub fn compute_velocity_pt_to_pt<'b>(
        &self,
        d1: impl Into<DateSpec<'b>>,
        d2: impl Into<DateSpec<'b>>,
    ) -> Result<Velocity, Error> {
        self.compute_velocity_pt_to_pt_with_options(
            d1,
            d2,
            DEFAULT_MIN_POINTS,
            DEFAULT_AVERAGING_HOURS,
        )
    }

    /// [Station::compute_velocity_pt_to_pt] with a custom sample
    /// floor per window and averaging period [h].
    pub fn compute_velocity_pt_to_pt_with_options<'b>(
        &self,
        d1: impl Into<DateSpec<'b>>,
        d2: impl Into<DateSpec<'b>>,
        min_points: usize,
        averaging_hours: f64,
    ) -> Result<Velocity, Error> {
        let d1 = d1.into().resolve()?;
        let d2 = d2.into().resolve()?;
        Ok(self.pt_to_pt_velocity(d1, d2, min_points, averaging_hours))
    }

    pub(crate) fn pt_to_pt_velocity(
        &self,
        d1: Epoch,
        d2: Epoch,
        min_points: usize,
        averaging_hours: f64,
    ) -> Velocity {
        let t_avg = averaging_hours * Unit::Hour;
        let w1 = self.window(d1 - t_avg, d1 + t_avg, min_points);
        let w2 = self.window(d2 - t_avg, d2 + t_avg, min_points);
        let (w1, w2) = match (w1, w2) {
            (Some(w1), Some(w2)) => (w1, w2),
            _ => return Velocity::NAN,
        };
        let (x1, y1, epoch1) = mean_position(w1);
        let (x2, y2, epoch2) = mean_position(w2);
        let dt = epoch2 - epoch1;
        if dt == 0.0 {
            // both windows resolve to the same mean epoch
            return Velocity::NAN;
        }
        Velocity {
            vx: (x2 - x1) / dt / self.proj_length_scale(),
            vy: (y2 - y1) / dt / self.proj_length_scale(),
        }
    }
}

/// Mean projected position and mean decimal year epoch.
fn mean_position(samples: &[Sample]) -> (f64, f64, f64) {
    let k = samples.len() as f64;
    let (mut x, mut y, mut epoch) = (0.0, 0.0, 0.0);
    for sample in samples {
        x += sample.x;
        y += sample.y;
        epoch += sample.epoch;
    }
    (x / k, y / k, epoch / k)
}

/// OLS slope of v against t (degree 1 fit, intercept discarded).
fn slope(t: &[f64], v: &[f64]) -> Option<f64> {
    let coefficients = polyfit(t, v, 1).ok()?;
    let slope = *coefficients.get(1)?;
    if slope.is_finite() {
        Some(slope)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slope() {
        let t = [0.0, 1.0, 2.0, 3.0];
        let v = [1.0, 3.0, 5.0, 7.0];
        assert!((slope(&t, &v).unwrap() - 2.0).abs() < 1.0E-9);
    }

    #[test]
    fn test_nan_sentinel() {
        assert!(Velocity::NAN.is_nan());
        assert!(!Velocity { vx: 0.0, vy: 0.0 }.is_nan());
    }

    #[test]
    fn test_speed() {
        let v = Velocity { vx: 3.0, vy: 4.0 };
        assert!((v.speed() - 5.0).abs() < 1.0E-12);
    }
}
