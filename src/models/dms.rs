use serde::{Deserialize, Serialize};

/// Which geographic axis a value belongs to; decides the cardinal letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Longitude,
    Latitude,
}

impl Axis {
    pub fn direction_letter(&self, negative: bool) -> char {
        match (self, negative) {
            (Axis::Longitude, true) => 'W',
            (Axis::Longitude, false) => 'E',
            (Axis::Latitude, true) => 'S',
            (Axis::Latitude, false) => 'N',
        }
    }
}

/// Degrees, minutes and seconds of an angle.
///
/// The sign is carried by `negative` rather than by `degrees`, so values in
/// (-1, 0) keep their sign even though their whole degrees are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DmsValue {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl DmsValue {
    /// Degrees with the sign applied. Zero for values in (-1, 1); check
    /// `negative` for the sign in that case.
    pub fn signed_degrees(&self) -> i64 {
        if self.negative {
            -i64::from(self.degrees)
        } else {
            i64::from(self.degrees)
        }
    }

    pub fn to_decimal(&self) -> f64 {
        let magnitude =
            f64::from(self.degrees) + f64::from(self.minutes) / 60.0 + self.seconds / 3600.0;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_letters() {
        assert_eq!(Axis::Longitude.direction_letter(true), 'W');
        assert_eq!(Axis::Longitude.direction_letter(false), 'E');
        assert_eq!(Axis::Latitude.direction_letter(true), 'S');
        assert_eq!(Axis::Latitude.direction_letter(false), 'N');
    }

    #[test]
    fn test_negative_below_one_degree_keeps_sign() {
        let value = DmsValue {
            negative: true,
            degrees: 0,
            minutes: 30,
            seconds: 0.0,
        };
        assert_eq!(value.signed_degrees(), 0);
        assert_eq!(value.to_decimal(), -0.5);
    }
}
