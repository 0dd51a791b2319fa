use crate::error::{ConversionError, Result};
use crate::models::GeodeticEllipsoid;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
}

impl Hemisphere {
    pub fn as_letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_letter())
    }
}

impl FromStr for Hemisphere {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "N" | "NORTH" | "NORTE" => Ok(Hemisphere::North),
            "S" | "SOUTH" | "SUL" => Ok(Hemisphere::South),
            other => Err(ConversionError::Config(format!(
                "Invalid hemisphere '{}'. Expected N or S",
                other
            ))),
        }
    }
}

/// Projection parameters shared read-only by every conversion of a run.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct ProjectionConfig {
    pub ellipsoid: GeodeticEllipsoid,

    #[validate(range(min = 1, max = 60))]
    pub zone: u8,

    pub hemisphere: Hemisphere,
}

impl ProjectionConfig {
    pub fn new(ellipsoid: GeodeticEllipsoid, zone: u8, hemisphere: Hemisphere) -> Result<Self> {
        let config = Self {
            ellipsoid,
            zone,
            hemisphere,
        };
        config.validate()?;
        Ok(config)
    }

    /// SIRGAS2000 / UTM zone 23S, the default reference system.
    pub fn sirgas2000_23s() -> Self {
        Self {
            ellipsoid: GeodeticEllipsoid::GRS80,
            zone: 23,
            hemisphere: Hemisphere::South,
        }
    }

    /// Central meridian of the zone in degrees
    pub fn central_meridian(&self) -> f64 {
        -183.0 + 6.0 * f64::from(self.zone)
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self::sirgas2000_23s()
    }
}

impl fmt::Display for ProjectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / UTM zone {}{}",
            self.ellipsoid.name, self.zone, self.hemisphere
        )
    }
}

/// Raw UTM input in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub easting: f64,
    pub northing: f64,
}

impl PlanarPoint {
    pub fn new(easting: f64, northing: f64) -> Self {
        Self { easting, northing }
    }

    pub fn is_finite(&self) -> bool {
        self.easting.is_finite() && self.northing.is_finite()
    }
}

/// Geographic position in decimal degrees. Negative longitude is West,
/// negative latitude is South.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeographicPoint {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude_deg: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude_deg: f64,
}

impl GeographicPoint {
    pub fn new(longitude_deg: f64, latitude_deg: f64) -> Self {
        Self {
            longitude_deg,
            latitude_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_meridian() {
        let config = ProjectionConfig::sirgas2000_23s();
        assert_eq!(config.central_meridian(), -45.0);

        let zone1 = ProjectionConfig::new(GeodeticEllipsoid::GRS80, 1, Hemisphere::North).unwrap();
        assert_eq!(zone1.central_meridian(), -177.0);

        let zone60 = ProjectionConfig::new(GeodeticEllipsoid::GRS80, 60, Hemisphere::North).unwrap();
        assert_eq!(zone60.central_meridian(), 177.0);
    }

    #[test]
    fn test_invalid_zone_rejected() {
        assert!(ProjectionConfig::new(GeodeticEllipsoid::GRS80, 0, Hemisphere::South).is_err());
        assert!(ProjectionConfig::new(GeodeticEllipsoid::GRS80, 61, Hemisphere::South).is_err());
    }

    #[test]
    fn test_hemisphere_parsing() {
        assert_eq!("s".parse::<Hemisphere>().unwrap(), Hemisphere::South);
        assert_eq!(" North ".parse::<Hemisphere>().unwrap(), Hemisphere::North);
        assert!("X".parse::<Hemisphere>().is_err());
    }

    #[test]
    fn test_geographic_point_validation() {
        assert!(GeographicPoint::new(-45.0, -27.12).validate().is_ok());
        assert!(GeographicPoint::new(-181.0, 0.0).validate().is_err());
        assert!(GeographicPoint::new(0.0, 91.0).validate().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProjectionConfig::sirgas2000_23s().to_string(),
            "GRS80 / UTM zone 23S"
        );
    }
}
