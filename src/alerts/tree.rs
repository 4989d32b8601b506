use std::collections::HashMap;

use serde_json::Value;

use crate::models::{Alert, RfidTag, WorkPlan};
use crate::normalize::{self, wire};

/// One RFID tag inside a work plan node and the alerts raised there,
/// in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct TagGroup {
    pub tag: RfidTag,
    pub alerts: Vec<Alert>,
}

/// A work plan with its tag groups in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkPlanNode {
    pub plan: WorkPlan,
    groups: Vec<TagGroup>,
    index: HashMap<i64, usize>,
}

impl WorkPlanNode {
    fn new(plan: WorkPlan) -> Self {
        Self {
            plan,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn groups(&self) -> &[TagGroup] {
        &self.groups
    }

    #[cfg(test)]
    pub fn group(&self, tag_id: i64) -> Option<&TagGroup> {
        self.index.get(&tag_id).map(|&i| &self.groups[i])
    }

    pub fn alert_count(&self) -> usize {
        self.groups.iter().map(|g| g.alerts.len()).sum()
    }

    /// Existing group for `tag.id`, or a new one appended at the end.
    fn group_mut(&mut self, tag: RfidTag) -> &mut TagGroup {
        let next = self.groups.len();
        let idx = *self.index.entry(tag.id).or_insert(next);
        if idx == next {
            self.groups.push(TagGroup {
                tag,
                alerts: Vec::new(),
            });
        }
        &mut self.groups[idx]
    }
}

/// Alert logs regrouped as work plan → RFID tag → alerts.
///
/// Work plans and tag groups keep first-seen order and appear once each.
/// Built fresh for every fetched page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertLogTree {
    nodes: Vec<WorkPlanNode>,
    index: HashMap<i64, usize>,
}

impl AlertLogTree {
    pub fn nodes(&self) -> &[WorkPlanNode] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn node(&self, plan_id: i64) -> Option<&WorkPlanNode> {
        self.index.get(&plan_id).map(|&i| &self.nodes[i])
    }

    #[cfg(test)]
    pub fn plan_ids(&self) -> Vec<i64> {
        self.nodes.iter().map(|n| n.plan.id).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Existing node for the plan's id, or a new one built from `plan`.
    /// The first occurrence's header wins.
    fn node_mut(&mut self, plan: WorkPlan) -> &mut WorkPlanNode {
        let next = self.nodes.len();
        let idx = *self.index.entry(plan.id).or_insert(next);
        if idx == next {
            self.nodes.push(WorkPlanNode::new(plan));
        }
        &mut self.nodes[idx]
    }
}

/// Group one page of raw alert-log records.
///
/// Records without a usable work plan id and tag groups without a usable
/// tag id are skipped. Alerts are appended as they come, never deduplicated.
pub fn aggregate(records: &[Value]) -> AlertLogTree {
    let mut tree = AlertLogTree::default();
    let mut skipped = 0usize;

    for record in records {
        let Some(raw) = wire::from_value::<wire::RawAlertLog>(record) else {
            skipped += 1;
            continue;
        };
        let Some(plan) = raw.work_plan.and_then(normalize::alert_work_plan) else {
            skipped += 1;
            continue;
        };
        let node = tree.node_mut(plan);

        for group in &raw.rfid_tags {
            let Some(raw_group) = wire::from_value::<wire::RawTagGroup>(group) else {
                skipped += 1;
                continue;
            };
            let Some(tag) = raw_group.rfid_tag.and_then(normalize::tag_ref) else {
                skipped += 1;
                continue;
            };
            node.group_mut(tag)
                .alerts
                .extend(raw_group.alerts.iter().map(normalize::alert));
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "alert log entries without usable ids skipped");
    }
    tree
}
