//! Polar stereographic mapping (EPSG method 9829, variant B).
use std::f64::consts::FRAC_PI_4;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// WGS84 ellipsoid semi major axis [m]
pub(crate) const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS84 inverse flattening
pub(crate) const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;

/// Supported projected coordinate reference systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Epsg {
    /// EPSG:3031 Antarctic Polar Stereographic,
    /// standard parallel 71°S, central meridian 0°.
    AntarcticPolarStereographic,
    /// EPSG:3413 NSIDC Sea Ice Polar Stereographic North,
    /// standard parallel 70°N, central meridian 45°W.
    ArcticPolarStereographic,
}

impl Epsg {
    /// Numeric EPSG code
    pub const fn code(&self) -> u16 {
        match self {
            Self::AntarcticPolarStereographic => 3031,
            Self::ArcticPolarStereographic => 3413,
        }
    }

    /// Builds [Epsg] from a numeric code.
    pub fn from_code(code: u16) -> Result<Self, Error> {
        match code {
            3031 => Ok(Self::AntarcticPolarStereographic),
            3413 => Ok(Self::ArcticPolarStereographic),
            other => Err(Error::UnsupportedEpsg(other)),
        }
    }

    /// Selects the CRS from a seed latitude: below 55°S the Antarctic
    /// system, above 55°N the Arctic system. Anything in between has
    /// no default and must be supplied explicitly.
    pub fn from_latitude(lat: f64) -> Result<Self, Error> {
        if lat < -55.0 {
            Ok(Self::AntarcticPolarStereographic)
        } else if lat > 55.0 {
            Ok(Self::ArcticPolarStereographic)
        } else {
            Err(Error::UnresolvedEpsg(lat))
        }
    }

    /// Standard parallel (latitude of true scale) [°]
    const fn standard_parallel(&self) -> f64 {
        match self {
            Self::AntarcticPolarStereographic => -71.0,
            Self::ArcticPolarStereographic => 70.0,
        }
    }

    /// Central meridian [°]
    const fn central_meridian(&self) -> f64 {
        match self {
            Self::AntarcticPolarStereographic => 0.0,
            Self::ArcticPolarStereographic => -45.0,
        }
    }

    const fn is_south(&self) -> bool {
        matches!(self, Self::AntarcticPolarStereographic)
    }
}

impl std::fmt::Display for Epsg {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "EPSG:{}", self.code())
    }
}

/// Forward transform from WGS84 geographic coordinates to the
/// projected plane, plus the local scale distortion. Immutable once
/// built for a [Station](crate::prelude::Station).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarStereographic {
    epsg: Epsg,
    /// first eccentricity
    e: f64,
    /// a * m(lat_ts) / t(lat_ts)
    rho_f: f64,
    lon_0_rad: f64,
    south: bool,
}

impl PolarStereographic {
    pub fn new(epsg: Epsg) -> Self {
        let f = 1.0 / WGS84_INVERSE_FLATTENING;
        let e = (2.0 * f - f * f).sqrt();
        let south = epsg.is_south();
        let lat_ts = epsg.standard_parallel().to_radians();
        let t_f = Self::iso_t(lat_ts, e, south);
        let m_f = Self::m(lat_ts, e);
        Self {
            epsg,
            e,
            rho_f: WGS84_SEMI_MAJOR_AXIS_M * m_f / t_f,
            lon_0_rad: epsg.central_meridian().to_radians(),
            south,
        }
    }

    pub const fn epsg(&self) -> Epsg {
        self.epsg
    }

    /// Projects (lat, lon) [°] to planar (x, y) [m].
    /// Neither supported CRS carries false offsets.
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let rho = self.rho_f * Self::iso_t(lat.to_radians(), self.e, self.south);
        let theta = lon.to_radians() - self.lon_0_rad;
        if self.south {
            (rho * theta.sin(), rho * theta.cos())
        } else {
            (rho * theta.sin(), -rho * theta.cos())
        }
    }

    /// Scale factor k along a parallel at the given latitude [°]:
    /// 1.0 at the standard parallel, below 1.0 poleward of it.
    /// Longitude independent for this projection family.
    pub fn parallel_scale(&self, lat: f64) -> f64 {
        let lat_rad = lat.to_radians();
        let rho = self.rho_f * Self::iso_t(lat_rad, self.e, self.south);
        rho / (WGS84_SEMI_MAJOR_AXIS_M * Self::m(lat_rad, self.e))
    }

    /// Isometric latitude function t
    fn iso_t(lat_rad: f64, e: f64, south: bool) -> f64 {
        let es = ((1.0 + e * lat_rad.sin()) / (1.0 - e * lat_rad.sin())).powf(e / 2.0);
        if south {
            (FRAC_PI_4 + lat_rad / 2.0).tan() / es
        } else {
            (FRAC_PI_4 - lat_rad / 2.0).tan() * es
        }
    }

    /// Meridional function m
    fn m(lat_rad: f64, e: f64) -> f64 {
        lat_rad.cos() / (1.0 - (e * lat_rad.sin()).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-75.0, Ok(Epsg::AntarcticPolarStereographic))]
    #[case(-55.1, Ok(Epsg::AntarcticPolarStereographic))]
    #[case(70.0, Ok(Epsg::ArcticPolarStereographic))]
    #[case(20.0, Err(()))]
    #[case(-55.0, Err(()))]
    fn test_epsg_from_latitude(#[case] lat: f64, #[case] expected: Result<Epsg, ()>) {
        assert_eq!(Epsg::from_latitude(lat).map_err(|_| ()), expected);
    }

    #[test]
    fn test_epsg_codes() {
        for epsg in [
            Epsg::AntarcticPolarStereographic,
            Epsg::ArcticPolarStereographic,
        ] {
            assert_eq!(Epsg::from_code(epsg.code()).unwrap(), epsg);
        }
        assert!(Epsg::from_code(4326).is_err());
        assert_eq!(Epsg::AntarcticPolarStereographic.to_string(), "EPSG:3031");
    }

    #[test]
    fn test_antarctic_forward() {
        let proj = PolarStereographic::new(Epsg::AntarcticPolarStereographic);
        // south pole maps to the origin
        let (x, y) = proj.forward(-90.0, 0.0);
        assert!(x.abs() < 1.0E-6 && y.abs() < 1.0E-6);
        // on the central meridian
        let (x, y) = proj.forward(-75.0, 0.0);
        assert!(x.abs() < 1.0E-6);
        assert!((y - 1_638_783.238_407).abs() < 1.0E-3);
        let (x, y) = proj.forward(-71.0, 0.0);
        assert!(x.abs() < 1.0E-6);
        assert!((y - 2_082_760.108_543).abs() < 1.0E-3);
        // 90°E maps to +x
        let (x, y) = proj.forward(-75.0, 90.0);
        assert!((x - 1_638_783.238_407).abs() < 1.0E-3);
        assert!(y.abs() < 1.0E-6);
    }

    #[test]
    fn test_arctic_forward() {
        let proj = PolarStereographic::new(Epsg::ArcticPolarStereographic);
        let (x, y) = proj.forward(90.0, 0.0);
        assert!(x.abs() < 1.0E-6 && y.abs() < 1.0E-6);
        // central meridian maps to -y
        let (x, y) = proj.forward(70.0, -45.0);
        assert!(x.abs() < 1.0E-6);
        assert!((y + 2_187_927.649_279).abs() < 1.0E-3);
        let (x, y) = proj.forward(75.0, -40.0);
        assert!((x - 142_401.981_162).abs() < 1.0E-3);
        assert!((y + 1_627_662.092_701).abs() < 1.0E-3);
    }

    #[rstest]
    #[case(Epsg::AntarcticPolarStereographic, -71.0, 1.0)]
    #[case(Epsg::AntarcticPolarStereographic, -75.0, 0.989_625_544_501)]
    #[case(Epsg::ArcticPolarStereographic, 70.0, 1.0)]
    #[case(Epsg::ArcticPolarStereographic, 75.0, 0.986_664_282_035)]
    fn test_parallel_scale(#[case] epsg: Epsg, #[case] lat: f64, #[case] expected: f64) {
        let proj = PolarStereographic::new(epsg);
        assert!((proj.parallel_scale(lat) - expected).abs() < 1.0E-9);
    }
}
