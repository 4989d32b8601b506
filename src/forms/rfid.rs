use super::{number_text, FormError, TextField};
use crate::models::{NewRfidTag, RfidTag, RfidTagPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfidField {
    Uid,
    Location,
    Description,
    ReferenceTemperature,
    ReferenceHumidity,
}

impl RfidField {
    pub const ALL: [RfidField; 5] = [
        RfidField::Uid,
        RfidField::Location,
        RfidField::Description,
        RfidField::ReferenceTemperature,
        RfidField::ReferenceHumidity,
    ];

    pub fn label(self) -> String {
        match self {
            RfidField::Uid => t!("rfid.uid").to_string(),
            RfidField::Location => t!("rfid.location").to_string(),
            RfidField::Description => t!("rfid.description").to_string(),
            RfidField::ReferenceTemperature => t!("rfid.ref_temp").to_string(),
            RfidField::ReferenceHumidity => t!("rfid.ref_hum").to_string(),
        }
    }
}

/// What the RFID form resolves to on submit.
#[derive(Debug, Clone, PartialEq)]
pub enum RfidSubmission {
    Create(NewRfidTag),
    Update { id: i64, patch: RfidTagPatch },
    /// Edit confirmed without changing anything: nothing to send.
    Unchanged,
}

/// Create/edit form for one RFID tag.
#[derive(Debug, Clone)]
pub struct RfidForm {
    original: Option<RfidTag>,
    fields: [TextField; 5],
    pub focus: usize,
    pub error: Option<FormError>,
}

impl RfidForm {
    pub fn create() -> Self {
        Self {
            original: None,
            fields: Default::default(),
            focus: 0,
            error: None,
        }
    }

    pub fn edit(tag: &RfidTag) -> Self {
        Self {
            fields: [
                TextField::with_value(&tag.uid),
                TextField::with_value(&tag.location_name),
                TextField::with_value(&tag.description),
                TextField::with_value(number_text(tag.reference_temperature)),
                TextField::with_value(number_text(tag.reference_humidity)),
            ],
            original: Some(tag.clone()),
            focus: 0,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    pub fn field(&self, field: RfidField) -> &TextField {
        &self.fields[field as usize]
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        &mut self.fields[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Every field is required and both references must be numbers.
    fn values(&self) -> Result<NewRfidTag, FormError> {
        let text = |f: RfidField| self.field(f).trimmed().to_string();
        let uid = text(RfidField::Uid);
        let location_name = text(RfidField::Location);
        let description = text(RfidField::Description);
        let temp = self.field(RfidField::ReferenceTemperature).parse_f64();
        let hum = self.field(RfidField::ReferenceHumidity).parse_f64();
        match (temp, hum) {
            (Some(reference_temperature), Some(reference_humidity))
                if !uid.is_empty() && !location_name.is_empty() && !description.is_empty() =>
            {
                Ok(NewRfidTag {
                    uid,
                    location_name,
                    description,
                    reference_temperature,
                    reference_humidity,
                })
            }
            _ => Err(FormError::MissingFields),
        }
    }

    pub fn submit(&mut self) -> Result<RfidSubmission, FormError> {
        let result = self.values().map(|values| match &self.original {
            None => RfidSubmission::Create(values),
            Some(original) => {
                let patch = RfidTagPatch::between(original, &values);
                if patch.is_empty() {
                    RfidSubmission::Unchanged
                } else {
                    RfidSubmission::Update {
                        id: original.id,
                        patch,
                    }
                }
            }
        });
        self.error = result.as_ref().err().cloned();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag() -> RfidTag {
        RfidTag {
            id: 9,
            uid: "A1B2".into(),
            location_name: "Cold room".into(),
            reference_temperature: 4.0,
            reference_humidity: 80.5,
            description: "Dairy".into(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn type_into(form: &mut RfidForm, field: RfidField, text: &str) {
        form.focus = field as usize;
        for c in text.chars() {
            form.focused_mut().insert(c);
        }
    }

    #[test]
    fn create_requires_every_field() {
        let mut form = RfidForm::create();
        type_into(&mut form, RfidField::Uid, "FF01");
        type_into(&mut form, RfidField::Location, "Dock");
        type_into(&mut form, RfidField::Description, "Inbound");
        type_into(&mut form, RfidField::ReferenceTemperature, "22");
        assert_eq!(form.submit(), Err(FormError::MissingFields));
        assert_eq!(form.error, Some(FormError::MissingFields));

        type_into(&mut form, RfidField::ReferenceHumidity, "x");
        assert_eq!(form.submit(), Err(FormError::MissingFields));

        form.focus = RfidField::ReferenceHumidity as usize;
        form.focused_mut().backspace();
        type_into(&mut form, RfidField::ReferenceHumidity, "55.5");
        match form.submit() {
            Ok(RfidSubmission::Create(t)) => {
                assert_eq!(t.uid, "FF01");
                assert_eq!(t.reference_humidity, 55.5);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(form.error, None);
    }

    #[test]
    fn edit_without_changes_sends_nothing() {
        let mut form = RfidForm::edit(&tag());
        assert_eq!(form.field(RfidField::ReferenceTemperature).value(), "4");
        assert_eq!(form.submit(), Ok(RfidSubmission::Unchanged));
    }

    #[test]
    fn edit_sends_only_changed_fields() {
        let mut form = RfidForm::edit(&tag());
        type_into(&mut form, RfidField::Location, " B");
        match form.submit() {
            Ok(RfidSubmission::Update { id, patch }) => {
                assert_eq!(id, 9);
                assert_eq!(patch.location_name.as_deref(), Some("Cold room B"));
                assert!(patch.uid.is_none());
                assert!(patch.reference_temperature.is_none());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn focus_wraps() {
        let mut form = RfidForm::create();
        form.focus_prev();
        assert_eq!(form.focus, 4);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }
}
