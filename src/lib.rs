#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod epoch;
mod error;
mod projection;
mod record;
mod sample;
mod station;
mod timeseries;
mod velocity;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::epoch::{
        decimal_year_to_epoch, epoch_to_decimal_year, DateSpec, DEFAULT_DATE_FORMAT,
    };
    pub use crate::projection::{Epsg, PolarStereographic};
    pub use crate::record::GnssRecord;
    pub use crate::sample::Sample;
    pub use crate::station::Station;
    pub use crate::timeseries::{Method, VelocitySeries};
    pub use crate::velocity::Velocity;
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
}

// pub export
pub use error::Error;
