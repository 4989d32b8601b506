use super::{number_text, FormError, TextField};
use crate::models::{NewPlanItem, NewWorkPlan, RfidTag, WorkPlanSummary};

/// Focusable parts of the work plan form, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    Description,
    ItemTag(usize),
    ItemFrequency(usize),
    TempThreshold,
    HumThreshold,
    ViolationCount,
}

/// One location row: a choice from the tag list plus its frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanItemDraft {
    /// Index into the form's tag choices; `None` when there are none.
    pub choice: Option<usize>,
    pub frequency: TextField,
}

/// Create form for a work plan, optionally prefilled from an existing one.
#[derive(Debug, Clone)]
pub struct WorkPlanForm {
    pub reapply: bool,
    pub description: TextField,
    pub temp_threshold: TextField,
    pub hum_threshold: TextField,
    pub violation_count: TextField,
    pub items: Vec<PlanItemDraft>,
    choices: Vec<RfidTag>,
    focus: usize,
    pub error: Option<FormError>,
}

impl WorkPlanForm {
    /// Empty form with one location row at frequency 1.
    pub fn new(choices: Vec<RfidTag>) -> Self {
        let mut form = Self {
            reapply: false,
            description: TextField::default(),
            temp_threshold: TextField::default(),
            hum_threshold: TextField::default(),
            violation_count: TextField::default(),
            items: Vec::new(),
            choices,
            focus: 0,
            error: None,
        };
        form.add_item();
        form
    }

    /// Prefill from an existing plan. Tags no longer in `choices` fall back
    /// to the first choice.
    pub fn from_template(plan: &WorkPlanSummary, choices: Vec<RfidTag>) -> Self {
        let blank_zero = |v: f64| if v == 0.0 { String::new() } else { number_text(v) };
        let items = plan
            .items
            .iter()
            .map(|item| PlanItemDraft {
                choice: choices
                    .iter()
                    .position(|t| t.id == item.rfid_tag_id)
                    .or((!choices.is_empty()).then_some(0)),
                frequency: TextField::with_value(item.measurement_frequency.to_string()),
            })
            .collect::<Vec<_>>();
        let mut form = Self {
            reapply: true,
            description: TextField::with_value(&plan.plan.description),
            temp_threshold: TextField::with_value(blank_zero(plan.plan.temp_threshold)),
            hum_threshold: TextField::with_value(blank_zero(plan.plan.hum_threshold)),
            violation_count: TextField::with_value(blank_zero(plan.plan.violation_count as f64)),
            items,
            choices,
            focus: 0,
            error: None,
        };
        if form.items.is_empty() {
            form.add_item();
        }
        form
    }

    pub fn choices(&self) -> &[RfidTag] {
        &self.choices
    }

    pub fn choice_label(&self, item: &PlanItemDraft) -> String {
        item.choice
            .and_then(|i| self.choices.get(i))
            .map(RfidTag::display_name)
            .unwrap_or_else(|| t!("plan.no_tags").to_string())
    }

    /// Flat focus order: description, each item's tag and frequency, then
    /// the three threshold fields.
    pub fn fields(&self) -> Vec<PlanField> {
        let mut fields = vec![PlanField::Description];
        for i in 0..self.items.len() {
            fields.push(PlanField::ItemTag(i));
            fields.push(PlanField::ItemFrequency(i));
        }
        fields.extend([
            PlanField::TempThreshold,
            PlanField::HumThreshold,
            PlanField::ViolationCount,
        ]);
        fields
    }

    pub fn focused(&self) -> PlanField {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let n = self.fields().len();
        self.focus = (self.focus + n - 1) % n;
    }

    /// The text field under focus, if the focus is on one.
    pub fn focused_text_mut(&mut self) -> Option<&mut TextField> {
        match self.focused() {
            PlanField::Description => Some(&mut self.description),
            PlanField::ItemFrequency(i) => self.items.get_mut(i).map(|it| &mut it.frequency),
            PlanField::TempThreshold => Some(&mut self.temp_threshold),
            PlanField::HumThreshold => Some(&mut self.hum_threshold),
            PlanField::ViolationCount => Some(&mut self.violation_count),
            PlanField::ItemTag(_) => None,
        }
    }

    /// Step the focused item's tag choice forward or back.
    pub fn cycle_choice(&mut self, forward: bool) {
        let n = self.choices.len();
        if n == 0 {
            return;
        }
        if let PlanField::ItemTag(i) = self.focused() {
            if let Some(item) = self.items.get_mut(i) {
                let cur = item.choice.unwrap_or(0);
                item.choice = Some(if forward { (cur + 1) % n } else { (cur + n - 1) % n });
            }
        }
    }

    pub fn add_item(&mut self) {
        self.items.push(PlanItemDraft {
            choice: (!self.choices.is_empty()).then_some(0),
            frequency: TextField::with_value("1"),
        });
    }

    /// Remove the focused item. The last remaining item cannot be removed.
    pub fn remove_focused_item(&mut self) -> Result<(), FormError> {
        let idx = match self.focused() {
            PlanField::ItemTag(i) | PlanField::ItemFrequency(i) => i,
            _ => return Ok(()),
        };
        if self.items.len() <= 1 {
            self.error = Some(FormError::NoItems);
            return Err(FormError::NoItems);
        }
        self.items.remove(idx);
        self.focus = self.focus.min(self.fields().len() - 1);
        Ok(())
    }

    fn values(&self) -> Result<NewWorkPlan, FormError> {
        let description = self.description.trimmed().to_string();
        if description.is_empty() {
            return Err(FormError::MissingDescription);
        }
        let (Some(temp_threshold), Some(hum_threshold), Some(violation_count)) = (
            self.temp_threshold.parse_f64(),
            self.hum_threshold.parse_f64(),
            self.violation_count.parse_i64(),
        ) else {
            return Err(FormError::InvalidThresholds);
        };

        let mut items = Vec::new();
        for (index, draft) in self.items.iter().enumerate() {
            let Some(tag) = draft.choice.and_then(|i| self.choices.get(i)) else {
                continue;
            };
            if draft.frequency.trimmed().is_empty() {
                continue;
            }
            let measurement_frequency = draft
                .frequency
                .parse_i64()
                .filter(|f| *f >= 1)
                .ok_or(FormError::InvalidFrequency { index })?;
            items.push(NewPlanItem {
                rfid_tag_id: tag.id,
                measurement_frequency,
            });
        }
        if items.is_empty() {
            return Err(FormError::NoItems);
        }

        Ok(NewWorkPlan {
            description,
            items,
            temp_threshold,
            hum_threshold,
            violation_count,
        })
    }

    pub fn submit(&mut self) -> Result<NewWorkPlan, FormError> {
        let result = self.values();
        self.error = result.as_ref().err().cloned();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkPlan, WorkPlanItem, WorkPlanStatus};

    fn tag(id: i64, uid: &str) -> RfidTag {
        let mut t = RfidTag::placeholder(id);
        t.uid = uid.into();
        t
    }

    fn choices() -> Vec<RfidTag> {
        vec![tag(5, "AA"), tag(6, "BB"), tag(7, "CC")]
    }

    fn fill(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.insert(c);
        }
    }

    fn valid_form() -> WorkPlanForm {
        let mut form = WorkPlanForm::new(choices());
        fill(&mut form.description, "Morning round");
        fill(&mut form.temp_threshold, "3.0");
        fill(&mut form.hum_threshold, "8");
        fill(&mut form.violation_count, "2");
        form
    }

    #[test]
    fn new_form_has_one_item_at_frequency_one() {
        let form = WorkPlanForm::new(choices());
        assert_eq!(form.items.len(), 1);
        assert_eq!(form.items[0].choice, Some(0));
        assert_eq!(form.items[0].frequency.value(), "1");
    }

    #[test]
    fn valid_form_builds_request() {
        let mut form = valid_form();
        form.add_item();
        form.focus = 3; // second item's tag
        form.cycle_choice(true);
        form.cycle_choice(true);
        let plan = form.submit().unwrap();
        assert_eq!(plan.description, "Morning round");
        assert_eq!(plan.violation_count, 2);
        let ids: Vec<i64> = plan.items.iter().map(|i| i.rfid_tag_id).collect();
        assert_eq!(ids, vec![5, 7]);
    }

    #[test]
    fn validation_order() {
        let mut form = WorkPlanForm::new(choices());
        assert_eq!(form.submit(), Err(FormError::MissingDescription));
        fill(&mut form.description, "x");
        assert_eq!(form.submit(), Err(FormError::InvalidThresholds));

        let mut form = valid_form();
        form.items[0].frequency = TextField::with_value("0");
        assert_eq!(form.submit(), Err(FormError::InvalidFrequency { index: 0 }));

        let mut form = valid_form();
        form.items[0].frequency = TextField::default();
        assert_eq!(form.submit(), Err(FormError::NoItems));

        let mut form = WorkPlanForm::new(Vec::new());
        fill(&mut form.description, "x");
        fill(&mut form.temp_threshold, "1");
        fill(&mut form.hum_threshold, "1");
        fill(&mut form.violation_count, "1");
        assert_eq!(form.submit(), Err(FormError::NoItems));
    }

    #[test]
    fn last_item_cannot_be_removed() {
        let mut form = valid_form();
        form.focus = 1;
        assert_eq!(form.remove_focused_item(), Err(FormError::NoItems));
        form.add_item();
        assert_eq!(form.remove_focused_item(), Ok(()));
        assert_eq!(form.items.len(), 1);
    }

    #[test]
    fn template_prefills_fields() {
        let summary = WorkPlanSummary {
            plan: WorkPlan {
                id: 4,
                description: "Weekly".into(),
                status: WorkPlanStatus::Completed,
                temp_threshold: 2.5,
                hum_threshold: 0.0,
                violation_count: 3,
                created_at: String::new(),
            },
            progress: "100".into(),
            items: vec![
                WorkPlanItem {
                    id: 1,
                    rfid_tag_id: 6,
                    measurement_frequency: 4,
                    uid: "BB".into(),
                    location_name: String::new(),
                },
                WorkPlanItem {
                    id: 2,
                    rfid_tag_id: 99,
                    measurement_frequency: 2,
                    uid: "ZZ".into(),
                    location_name: String::new(),
                },
            ],
            updated_at: String::new(),
        };
        let form = WorkPlanForm::from_template(&summary, choices());
        assert!(form.reapply);
        assert_eq!(form.description.value(), "Weekly");
        assert_eq!(form.temp_threshold.value(), "2.5");
        assert_eq!(form.hum_threshold.value(), "");
        assert_eq!(form.violation_count.value(), "3");
        assert_eq!(form.items[0].choice, Some(1));
        assert_eq!(form.items[0].frequency.value(), "4");
        assert_eq!(form.items[1].choice, Some(0));
    }

    #[test]
    fn focus_order_follows_items() {
        let mut form = valid_form();
        form.add_item();
        assert_eq!(form.fields().len(), 8);
        form.focus_prev();
        assert_eq!(form.focused(), PlanField::ViolationCount);
        form.focus_next();
        assert_eq!(form.focused(), PlanField::Description);
        assert!(form.focused_text_mut().is_some());
        form.focus_next();
        assert!(form.focused_text_mut().is_none());
    }
}
