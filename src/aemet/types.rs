//! Serde models for AEMET municipality forecast documents.
//!
//! AEMET is inconsistent about value types: the same field is a number in
//! the daily document and a string in the hourly one, and sometimes an empty
//! string. Display values are therefore read through [`Text`], which accepts
//! strings, numbers and nulls alike.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A scalar rendered as text, whatever JSON type AEMET used for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(pub String);

impl Text {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde_json::Value;

        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Text(s)),
            Value::Number(n) => Ok(Text(n.to_string())),
            Value::Bool(b) => Ok(Text(b.to_string())),
            Value::Null => Ok(Text::default()),
            other => Err(serde::de::Error::custom(format!(
                "expected a scalar, found {}",
                other
            ))),
        }
    }
}

/// First step of every AEMET request: a pointer to the actual payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DataLink {
    #[serde(default)]
    pub datos: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub estado: Option<u16>,
}

// ============================================================================
// Shared pieces
// ============================================================================

/// Sky state for a period: AEMET icon code (e.g. "12" or "12n") plus text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkyState {
    #[serde(default)]
    pub value: Text,
    #[serde(default)]
    pub periodo: Option<String>,
    #[serde(default)]
    pub descripcion: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodValue {
    #[serde(default)]
    pub value: Text,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinMax {
    #[serde(default)]
    pub maxima: Text,
    #[serde(default)]
    pub minima: Text,
}

// ============================================================================
// Daily document
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct DailyForecast {
    pub elaborado: NaiveDateTime,
    #[serde(default)]
    pub nombre: Option<String>,
    pub prediccion: DailyPrediction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyPrediction {
    #[serde(default)]
    pub dia: Vec<DailyEntry>,
}

/// One day of the daily forecast. Per-period arrays hold seven entries for
/// the first days (whole day, two halves, four quarters) and fewer later on.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyEntry {
    #[serde(rename = "probPrecipitacion", default)]
    pub precipitation_probability: Vec<PeriodValue>,
    #[serde(rename = "estadoCielo", default)]
    pub sky: Vec<SkyState>,
    #[serde(rename = "viento", default)]
    pub wind: Vec<DailyWind>,
    #[serde(rename = "temperatura", default)]
    pub temperature: MinMax,
    #[serde(rename = "sensTermica", default)]
    pub thermal_sensation: MinMax,
    #[serde(rename = "humedadRelativa", default)]
    pub relative_humidity: MinMax,
    #[serde(rename = "uvMax", default)]
    pub uv_max: Option<Text>,
    pub fecha: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyWind {
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub velocidad: Text,
}

// ============================================================================
// Hourly document
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyForecast {
    pub elaborado: NaiveDateTime,
    #[serde(default)]
    pub nombre: Option<String>,
    pub prediccion: HourlyPrediction,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyPrediction {
    #[serde(default)]
    pub dia: Vec<HourlyEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyEntry {
    #[serde(rename = "estadoCielo", default)]
    pub sky: Vec<SkyState>,
    #[serde(rename = "precipitacion", default)]
    pub precipitation: Vec<PeriodValue>,
    #[serde(rename = "temperatura", default)]
    pub temperature: Vec<PeriodValue>,
    #[serde(rename = "humedadRelativa", default)]
    pub relative_humidity: Vec<PeriodValue>,
    #[serde(rename = "vientoAndRachaMax", default)]
    pub wind_and_gusts: Vec<WindOrGust>,
    pub fecha: NaiveDateTime,
}

/// `vientoAndRachaMax` interleaves wind entries (direction + speed arrays)
/// with gust entries, which carry only a `value` and are told apart by
/// their empty direction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindOrGust {
    #[serde(default)]
    pub direccion: Vec<Text>,
    #[serde(default)]
    pub velocidad: Vec<Text>,
}

impl WindOrGust {
    pub fn is_wind(&self) -> bool {
        !self.direccion.is_empty()
    }

    pub fn direction(&self) -> &str {
        self.direccion.first().map(Text::as_str).unwrap_or("")
    }

    pub fn speed(&self) -> &str {
        self.velocidad.first().map(Text::as_str).unwrap_or("")
    }
}

impl HourlyEntry {
    /// Wind entries only, in hour order.
    pub fn winds(&self) -> impl Iterator<Item = &WindOrGust> {
        self.wind_and_gusts.iter().filter(|w| w.is_wind())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{DAILY, HOURLY};
    use super::*;

    #[test]
    fn test_daily_document_parses_numbers_as_text() {
        let docs: Vec<DailyForecast> = serde_json::from_str(DAILY).unwrap();
        let doc = &docs[0];

        assert_eq!(doc.nombre.as_deref(), Some("Málaga"));
        assert_eq!(doc.prediccion.dia.len(), 3);

        let today = &doc.prediccion.dia[0];
        assert_eq!(today.temperature.maxima.as_str(), "24");
        assert_eq!(today.wind[3].direccion, "N");
        assert_eq!(today.wind[3].velocidad.as_str(), "5");
        assert_eq!(today.uv_max.as_ref().map(Text::as_str), Some("8"));
        assert!(doc.prediccion.dia[2].uv_max.is_none());
    }

    #[test]
    fn test_hourly_winds_skip_gusts() {
        let docs: Vec<HourlyForecast> = serde_json::from_str(HOURLY).unwrap();
        let day = &docs[0].prediccion.dia[0];

        let winds: Vec<_> = day.winds().collect();
        assert_eq!(winds.len(), 3);
        assert_eq!(winds[1].direction(), "NE");
        assert_eq!(winds[1].speed(), "8");
        assert_eq!(day.precipitation[1].value.as_str(), "Ip");
    }

    #[test]
    fn test_text_rejects_objects() {
        let result: Result<Text, _> = serde_json::from_str(r#"{"a": 1}"#);
        assert!(result.is_err());

        let null: Text = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());
    }
}
