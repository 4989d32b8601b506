use std::fmt;

/// Category of a threshold violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertType {
    TempHigh,
    TempLow,
    HumHigh,
    HumLow,
    /// Any code the backend sends that we don't know, kept verbatim.
    Other(String),
}

impl AlertType {
    /// The four deviation types counted in the summary cards.
    pub const KNOWN: [AlertType; 4] = [
        AlertType::TempHigh,
        AlertType::TempLow,
        AlertType::HumHigh,
        AlertType::HumLow,
    ];

    pub fn parse(code: &str) -> Self {
        match code {
            "TEMP_HIGH" => AlertType::TempHigh,
            "TEMP_LOW" => AlertType::TempLow,
            "HUM_HIGH" => AlertType::HumHigh,
            "HUM_LOW" => AlertType::HumLow,
            other => AlertType::Other(other.to_string()),
        }
    }

    /// Wire code, e.g. `TEMP_HIGH`.
    pub fn code(&self) -> &str {
        match self {
            AlertType::TempHigh => "TEMP_HIGH",
            AlertType::TempLow => "TEMP_LOW",
            AlertType::HumHigh => "HUM_HIGH",
            AlertType::HumLow => "HUM_LOW",
            AlertType::Other(code) => code,
        }
    }

    /// Temperature alerts are shown in °C, everything else in %.
    pub fn is_temperature(&self) -> bool {
        self.code().contains("TEMP")
    }

    pub fn unit(&self) -> &'static str {
        if self.is_temperature() {
            "°C"
        } else {
            "%"
        }
    }

    /// Localized display label.
    pub fn label(&self) -> String {
        match self {
            AlertType::TempHigh => t!("alert_type.temp_high").to_string(),
            AlertType::TempLow => t!("alert_type.temp_low").to_string(),
            AlertType::HumHigh => t!("alert_type.hum_high").to_string(),
            AlertType::HumLow => t!("alert_type.hum_low").to_string(),
            AlertType::Other(code) => code.clone(),
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single threshold-violation event at one tagged location.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub alert_id: i64,
    pub alert_type: AlertType,
    pub measured_value: f64,
    pub reference_value: f64,
    pub threshold: f64,
    pub message: String,
    pub measurement_number: i64,
    pub created_at: String,
}

impl Alert {
    /// Absolute distance between the measured and reference value.
    pub fn deviation(&self) -> f64 {
        (self.measured_value - self.reference_value).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_codes_roundtrip() {
        for kind in AlertType::KNOWN {
            assert_eq!(AlertType::parse(kind.code()), kind);
        }
    }

    #[test]
    fn parse_unknown_code_is_kept() {
        let kind = AlertType::parse("PRESSURE_HIGH");
        assert_eq!(kind, AlertType::Other("PRESSURE_HIGH".to_string()));
        assert_eq!(kind.code(), "PRESSURE_HIGH");
    }

    #[test]
    fn units_follow_category() {
        assert_eq!(AlertType::TempHigh.unit(), "°C");
        assert_eq!(AlertType::TempLow.unit(), "°C");
        assert_eq!(AlertType::HumHigh.unit(), "%");
        assert_eq!(AlertType::Other("TEMP_SPIKE".into()).unit(), "°C");
        assert_eq!(AlertType::Other("UNKNOWN".into()).unit(), "%");
    }

    #[test]
    fn deviation_is_absolute() {
        let alert = Alert {
            alert_id: 1,
            alert_type: AlertType::TempLow,
            measured_value: 18.5,
            reference_value: 25.0,
            threshold: 3.0,
            message: String::new(),
            measurement_number: 2,
            created_at: String::new(),
        };
        assert!((alert.deviation() - 6.5).abs() < 1e-9);
    }
}
