//! Instantaneous metric cards, set straight from the payload without animation

use crate::payload::SummaryPayload;

/// Average temperature (°C) at and above which the health bucket drops
pub const HEALTH_TEMPERATURE_THRESHOLD: f64 = 120.0;

/// Two-bucket placeholder classifier on average temperature.
///
/// The percentages are fixed labels, not a computed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthIndex {
    Nominal,
    Elevated,
}

impl HealthIndex {
    pub fn from_avg_temperature(avg_temperature: f64) -> Self {
        if avg_temperature < HEALTH_TEMPERATURE_THRESHOLD {
            HealthIndex::Nominal
        } else {
            HealthIndex::Elevated
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthIndex::Nominal => "94%",
            HealthIndex::Elevated => "78%",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCards {
    pub total_units: String,
    pub avg_pressure: String,
    pub avg_flowrate: String,
    pub avg_temperature: String,
    pub health: HealthIndex,
}

impl MetricCards {
    pub fn from_payload(payload: &SummaryPayload) -> Self {
        Self {
            total_units: payload.total_count.to_string(),
            avg_pressure: format!("{:.2} psi", payload.avg_pressure),
            avg_flowrate: format!("{:.2} m³/h", payload.avg_flowrate),
            avg_temperature: format!("{:.2} °C", payload.avg_temperature),
            health: HealthIndex::from_avg_temperature(payload.avg_temperature),
        }
    }

    /// (title, value) pairs in display order
    pub fn cards(&self) -> [(&'static str, &str); 5] {
        [
            ("TOTAL UNITS", self.total_units.as_str()),
            ("AVG PRESSURE", self.avg_pressure.as_str()),
            ("AVG FLOWRATE", self.avg_flowrate.as_str()),
            ("AVG TEMPERATURE", self.avg_temperature.as_str()),
            ("HEALTH INDEX", self.health.label()),
        ]
    }
}
