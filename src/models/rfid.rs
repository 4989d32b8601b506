use serde::Serialize;

/// A physical sensor/location marker with its reference baselines.
///
/// The alert tree only carries the first five fields; the RFID tag screen
/// fills the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct RfidTag {
    pub id: i64,
    pub uid: String,
    pub location_name: String,
    pub reference_temperature: f64,
    pub reference_humidity: f64,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

impl RfidTag {
    /// A tag with only its id known; every other field defaulted.
    pub fn placeholder(id: i64) -> Self {
        Self {
            id,
            uid: crate::constants::UNKNOWN.to_string(),
            location_name: t!("placeholder.location").to_string(),
            reference_temperature: 0.0,
            reference_humidity: 0.0,
            description: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// `UID - location` as used in pickers.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.uid, self.location_name)
    }
}

/// Body for `POST /rfid-tags`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRfidTag {
    pub uid: String,
    pub location_name: String,
    pub description: String,
    pub reference_temperature: f64,
    pub reference_humidity: f64,
}

/// Body for `PATCH /rfid-tags/{id}`: only the fields that changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RfidTagPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_humidity: Option<f64>,
}

impl RfidTagPatch {
    /// Diff the edited values against the stored tag.
    pub fn between(original: &RfidTag, edited: &NewRfidTag) -> Self {
        Self {
            uid: (edited.uid != original.uid).then(|| edited.uid.clone()),
            location_name: (edited.location_name != original.location_name)
                .then(|| edited.location_name.clone()),
            description: (edited.description != original.description)
                .then(|| edited.description.clone()),
            reference_temperature: (edited.reference_temperature
                != original.reference_temperature)
                .then_some(edited.reference_temperature),
            reference_humidity: (edited.reference_humidity != original.reference_humidity)
                .then_some(edited.reference_humidity),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
