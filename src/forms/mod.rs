//! Modal input forms for RFID tags and work plans.

use std::fmt;

mod rfid;
mod work_plan;

pub use rfid::{RfidField, RfidForm, RfidSubmission};
pub use work_plan::{PlanField, WorkPlanForm};

/// Why a form could not be submitted. Shown inline under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    MissingFields,
    MissingDescription,
    InvalidThresholds,
    NoItems,
    InvalidFrequency { index: usize },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FormError::MissingFields => t!("form.error.required"),
            FormError::MissingDescription => t!("form.error.description"),
            FormError::InvalidThresholds => t!("form.error.thresholds"),
            FormError::NoItems => t!("form.error.no_items"),
            FormError::InvalidFrequency { index } => {
                t!("form.error.frequency", index = index + 1)
            }
        };
        f.write_str(&msg)
    }
}

impl std::error::Error for FormError {}

/// Single-line text input with a byte-offset cursor on char boundaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn parse_f64(&self) -> Option<f64> {
        self.trimmed().replace(',', ".").parse().ok().filter(|v: &f64| v.is_finite())
    }

    pub fn parse_i64(&self) -> Option<i64> {
        self.trimmed().parse().ok()
    }
}

/// Format a stored number for an edit field without a trailing `.0`.
pub(crate) fn number_text(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut f = TextField::default();
        for c in "Kho ạ".chars() {
            f.insert(c);
        }
        f.left();
        f.backspace();
        assert_eq!(f.value(), "Khoạ");
        f.right();
        f.backspace();
        assert_eq!(f.value(), "Kho");
        assert_eq!(f.cursor(), 3);
    }

    #[test]
    fn numbers_parse_with_comma_or_dot() {
        assert_eq!(TextField::with_value(" 25,5 ").parse_f64(), Some(25.5));
        assert_eq!(TextField::with_value("3.0").parse_f64(), Some(3.0));
        assert_eq!(TextField::with_value("").parse_f64(), None);
        assert_eq!(TextField::with_value("NaN").parse_f64(), None);
        assert_eq!(TextField::with_value("4").parse_i64(), Some(4));
    }

    #[test]
    fn number_text_drops_integral_fraction() {
        assert_eq!(number_text(25.0), "25");
        assert_eq!(number_text(25.5), "25.5");
    }
}
