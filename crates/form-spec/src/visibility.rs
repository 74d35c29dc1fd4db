use std::collections::{BTreeMap, BTreeSet};

use crate::record::Record;
use crate::spec::form::FormSpec;

pub type VisibilityMap = BTreeMap<String, bool>;

/// Projects which declared fields are shown for the current record.
///
/// Uses the same guard evaluation as [`validate`](crate::validate::validate),
/// so a field is validated exactly when it is visible. Fields that no rule set
/// mentions are always shown.
pub fn visible_fields(spec: &FormSpec, record: &Record) -> VisibilityMap {
    let mut mentioned = BTreeSet::new();
    let mut active = BTreeSet::new();

    for rule_set in &spec.rule_sets {
        let is_active = spec.is_active(rule_set, record);
        for field in rule_set.fields() {
            mentioned.insert(field);
            if is_active {
                active.insert(field);
            }
        }
    }

    spec.fields
        .iter()
        .map(|field| {
            let name = field.name.as_str();
            let visible = active.contains(name) || !mentioned.contains(name);
            (field.name.clone(), visible)
        })
        .collect()
}
