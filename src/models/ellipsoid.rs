use serde::Serialize;

/// Reference ellipsoid defined by its semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeodeticEllipsoid {
    pub name: &'static str,
    /// Semi-major axis in meters
    pub semi_major_axis: f64,
    pub flattening: f64,
}

impl GeodeticEllipsoid {
    /// GRS80, the ellipsoid of SIRGAS2000.
    pub const GRS80: GeodeticEllipsoid = GeodeticEllipsoid {
        name: "GRS80",
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_222_101,
    };

    pub const WGS84: GeodeticEllipsoid = GeodeticEllipsoid {
        name: "WGS84",
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// Look up a built-in ellipsoid by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::GRS80, Self::WGS84]
            .into_iter()
            .find(|e| e.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn inverse_flattening(&self) -> f64 {
        1.0 / self.flattening
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// First eccentricity squared, e² = f(2 - f)
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// Second eccentricity squared, e'² = e² / (1 - e²)
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.eccentricity_squared();
        e2 / (1.0 - e2)
    }

    /// Third flattening n = f / (2 - f), the expansion parameter of the Krüger series
    pub fn third_flattening(&self) -> f64 {
        self.flattening / (2.0 - self.flattening)
    }

    /// Rectifying radius A: the meridian arc length is A times the rectifying latitude.
    pub fn rectifying_radius(&self) -> f64 {
        let n = self.third_flattening();
        let n2 = n * n;
        self.semi_major_axis / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0 + n2 * n2 * n2 / 256.0)
    }
}

impl Default for GeodeticEllipsoid {
    fn default() -> Self {
        Self::GRS80
    }
}
