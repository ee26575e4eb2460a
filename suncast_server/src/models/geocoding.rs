use serde::Deserialize;
use std::num::ParseFloatError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A coordinate as geocoders send it: Nominatim uses decimal strings, others
/// plain JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    pub fn to_f64(&self) -> Result<f64, ParseFloatError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text.trim().parse(),
        }
    }
}

/// One match from a Nominatim-style search.
#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub lat: Decimal,
    pub lon: Decimal,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl GeocodingResult {
    pub fn coordinates(&self) -> Result<Coordinates, ParseFloatError> {
        Ok(Coordinates {
            latitude: self.lat.to_f64()?,
            longitude: self.lon.to_f64()?,
        })
    }
}
