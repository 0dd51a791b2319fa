use crate::error::{ConversionError, Result};
use crate::models::{GeographicPoint, Hemisphere, PlanarPoint, ProjectionConfig};
use crate::utils::constants::{FALSE_EASTING, FALSE_NORTHING_SOUTH, UTM_SCALE_FACTOR};
use validator::Validate;

const SERIES_ORDER: usize = 6;
const NEWTON_TOLERANCE: f64 = 1e-12;
const NEWTON_MAX_ITERATIONS: usize = 10;

/// Ellipsoidal Transverse Mercator for one UTM zone, using the Krüger
/// series in the third flattening carried to sixth order (Karney 2011).
/// Accurate to a few nanometers within a zone and well below a millimeter
/// out to several thousand kilometers from the central meridian.
#[derive(Debug, Clone)]
pub struct UtmProjector {
    config: ProjectionConfig,
    /// Scaled rectifying radius k0 * A
    scaled_radius: f64,
    eccentricity: f64,
    alpha: [f64; SERIES_ORDER],
    beta: [f64; SERIES_ORDER],
}

impl UtmProjector {
    pub fn new(config: ProjectionConfig) -> Self {
        let ellipsoid = config.ellipsoid;
        let n = ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1983433.0 * n6 / 1935360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0
                + 167603.0 * n6 / 181440.0,
            49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
            34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
            212378941.0 * n6 / 319334400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                - 1118711.0 * n6 / 3870720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
            4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
            20648693.0 * n6 / 638668800.0,
        ];

        Self {
            config,
            scaled_radius: UTM_SCALE_FACTOR * ellipsoid.rectifying_radius(),
            eccentricity: ellipsoid.eccentricity(),
            alpha,
            beta,
        }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Convert a UTM easting/northing pair to longitude/latitude in decimal degrees.
    pub fn inverse(&self, point: PlanarPoint) -> Result<GeographicPoint> {
        self.check_zone()?;
        if !point.is_finite() {
            return Err(ConversionError::Projection(format!(
                "non-finite input ({}, {})",
                point.easting, point.northing
            )));
        }

        let x = point.easting - FALSE_EASTING;
        let y = match self.config.hemisphere {
            Hemisphere::North => point.northing,
            Hemisphere::South => point.northing - FALSE_NORTHING_SOUTH,
        };

        let eta = x / self.scaled_radius;
        let xi = y / self.scaled_radius;

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, beta) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_prime.sinh();
        let sin_xi = xi_prime.sin();
        let cos_xi = xi_prime.cos();

        // Conformal latitude as tan(chi), then back to geodetic latitude
        let tau_prime = sin_xi / (sinh_eta * sinh_eta + cos_xi * cos_xi).sqrt();
        let tau = self.geodetic_tan_from_conformal(tau_prime);

        let latitude = tau.atan().to_degrees();
        let delta_lon = sinh_eta.atan2(cos_xi).to_degrees();
        let longitude = normalize_longitude(self.config.central_meridian() + delta_lon);

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ConversionError::Projection(format!(
                "no solution for ({}, {})",
                point.easting, point.northing
            )));
        }

        Ok(GeographicPoint::new(longitude, latitude))
    }

    /// Convert longitude/latitude in decimal degrees to UTM easting/northing
    /// in this projector's zone and hemisphere.
    pub fn forward(&self, point: GeographicPoint) -> Result<PlanarPoint> {
        self.check_zone()?;
        if !point.longitude_deg.is_finite() || !point.latitude_deg.is_finite() {
            return Err(ConversionError::Projection(format!(
                "non-finite input ({}, {})",
                point.longitude_deg, point.latitude_deg
            )));
        }
        point
            .validate()
            .map_err(|e| ConversionError::Projection(e.to_string()))?;

        let lambda = normalize_longitude(point.longitude_deg - self.config.central_meridian())
            .to_radians();
        let tau = point.latitude_deg.to_radians().tan();
        let tau_prime = self.conformal_tan(tau);

        let cos_lambda = lambda.cos();
        let xi_prime = tau_prime.atan2(cos_lambda);
        let eta_prime = (lambda.sin() / (tau_prime * tau_prime + cos_lambda * cos_lambda).sqrt())
            .asinh();

        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, alpha) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let easting = FALSE_EASTING + self.scaled_radius * eta;
        let northing = match self.config.hemisphere {
            Hemisphere::North => self.scaled_radius * xi,
            Hemisphere::South => self.scaled_radius * xi + FALSE_NORTHING_SOUTH,
        };

        Ok(PlanarPoint::new(easting, northing))
    }

    fn check_zone(&self) -> Result<()> {
        if !(1..=60).contains(&self.config.zone) {
            return Err(ConversionError::Projection(format!(
                "UTM zone {} is outside 1..=60",
                self.config.zone
            )));
        }
        Ok(())
    }

    /// tan of the conformal latitude from tan of the geodetic latitude
    fn conformal_tan(&self, tau: f64) -> f64 {
        let e = self.eccentricity;
        let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
    }

    /// Newton iteration inverting `conformal_tan`
    fn geodetic_tan_from_conformal(&self, tau_prime: f64) -> f64 {
        let one_minus_e2 = 1.0 - self.eccentricity * self.eccentricity;
        let mut tau = tau_prime;

        for _ in 0..NEWTON_MAX_ITERATIONS {
            let tau_i = self.conformal_tan(tau);
            let delta = (tau_prime - tau_i) / (1.0 + tau_i * tau_i).sqrt()
                * (1.0 + one_minus_e2 * tau * tau)
                / (one_minus_e2 * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < NEWTON_TOLERANCE {
                break;
            }
        }

        tau
    }
}

fn normalize_longitude(degrees: f64) -> f64 {
    if degrees > 180.0 {
        degrees - 360.0
    } else if degrees < -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}
