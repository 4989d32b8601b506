use std::collections::{HashMap, HashSet};

/// Open/closed state of the alert tree: any number of plans, and per plan
/// any number of tags. Survives page changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeExpansion {
    plans: HashSet<i64>,
    tags: HashMap<i64, HashSet<i64>>,
}

impl TreeExpansion {
    pub fn toggle_plan(&mut self, plan_id: i64) {
        if !self.plans.remove(&plan_id) {
            self.plans.insert(plan_id);
        }
    }

    /// Toggle one tag under a plan. A plan entry with no open tags is
    /// removed entirely.
    pub fn toggle_tag(&mut self, plan_id: i64, tag_id: i64) {
        let open = self.tags.entry(plan_id).or_default();
        if !open.remove(&tag_id) {
            open.insert(tag_id);
        }
        if open.is_empty() {
            self.tags.remove(&plan_id);
        }
    }

    pub fn is_plan_open(&self, plan_id: i64) -> bool {
        self.plans.contains(&plan_id)
    }

    pub fn is_tag_open(&self, plan_id: i64, tag_id: i64) -> bool {
        self.tags.get(&plan_id).is_some_and(|t| t.contains(&tag_id))
    }
}

/// At most one open row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleExpansion(Option<i64>);

impl SingleExpansion {
    pub fn toggle(&mut self, id: i64) {
        self.0 = if self.0 == Some(id) { None } else { Some(id) };
    }

    pub fn is_open(&self, id: i64) -> bool {
        self.0 == Some(id)
    }

    pub fn open_id(&self) -> Option<i64> {
        self.0
    }

    pub fn close(&mut self) {
        self.0 = None;
    }
}

/// One open plan and, inside it, one open location. Any change of the
/// open plan closes the location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NestedExpansion {
    plan: SingleExpansion,
    location: SingleExpansion,
}

impl NestedExpansion {
    pub fn toggle_plan(&mut self, plan_id: i64) {
        self.plan.toggle(plan_id);
        self.location.close();
    }

    pub fn toggle_location(&mut self, location_id: i64) {
        self.location.toggle(location_id);
    }

    pub fn is_plan_open(&self, plan_id: i64) -> bool {
        self.plan.is_open(plan_id)
    }

    pub fn is_location_open(&self, plan_id: i64, location_id: i64) -> bool {
        self.plan.is_open(plan_id) && self.location.is_open(location_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_plans_toggle_independently() {
        let mut e = TreeExpansion::default();
        e.toggle_plan(1);
        e.toggle_plan(2);
        assert!(e.is_plan_open(1) && e.is_plan_open(2));
        e.toggle_plan(1);
        assert!(!e.is_plan_open(1));
        assert!(e.is_plan_open(2));
    }

    #[test]
    fn closing_last_tag_drops_plan_entry() {
        let mut e = TreeExpansion::default();
        e.toggle_tag(1, 10);
        e.toggle_tag(1, 20);
        e.toggle_tag(1, 10);
        assert!(e.is_tag_open(1, 20));
        e.toggle_tag(1, 20);
        assert!(!e.is_tag_open(1, 20));
        assert_eq!(e, TreeExpansion::default());
    }

    #[test]
    fn tags_are_scoped_to_their_plan() {
        let mut e = TreeExpansion::default();
        e.toggle_tag(1, 10);
        assert!(!e.is_tag_open(2, 10));
    }

    #[test]
    fn single_expansion_keeps_one_open() {
        let mut e = SingleExpansion::default();
        e.toggle(3);
        e.toggle(4);
        assert!(!e.is_open(3));
        assert_eq!(e.open_id(), Some(4));
        e.toggle(4);
        assert_eq!(e.open_id(), None);
    }

    #[test]
    fn switching_plan_closes_location() {
        let mut e = NestedExpansion::default();
        e.toggle_plan(1);
        e.toggle_location(10);
        assert!(e.is_location_open(1, 10));
        e.toggle_plan(2);
        assert!(!e.is_location_open(2, 10));
        e.toggle_location(10);
        e.toggle_plan(2);
        assert!(!e.is_plan_open(2));
        e.toggle_plan(2);
        assert!(!e.is_location_open(2, 10));
    }
}
