//! Policy compilation: regex compilation, cross-reference validation, and
//! comparator pre-resolution. Everything that can be malformed fails here,
//! before any element is looked at.

use crate::comparator::Comparator;
use crate::error::PolicyError;
use crate::groups::CompiledCustomGroup;
use crate::partition::PartitionMode;
use ordfix_types::policy::{
    GroupOverride, GroupsEntry, NewlinesSetting, OrderingPolicy, SortSpec,
};
use std::collections::HashMap;

/// A validated, pre-resolved ordering policy. Immutable for the lifetime
/// of the reconciler that owns it.
#[derive(Debug)]
pub struct CompiledPolicy {
    pub(crate) entries: Vec<GroupsEntry>,
    pub(crate) base: Comparator,
    pub(crate) custom: Vec<CompiledCustomGroup>,
    custom_by_name: HashMap<String, usize>,
    slots: HashMap<String, usize>,
    pub(crate) slot_count: usize,
    pub(crate) slot_comparators: Vec<Option<Comparator>>,
    pub(crate) slot_newlines_inside: Vec<Option<NewlinesSetting>>,
    pub(crate) slot_comment_above: Vec<Option<String>>,
    pub(crate) partition: PartitionMode,
    pub(crate) global_newlines: NewlinesSetting,
}

impl CompiledPolicy {
    pub fn new(policy: &OrderingPolicy) -> Result<Self, PolicyError> {
        let base = Comparator::new(&policy.sort)?;

        let mut custom = Vec::with_capacity(policy.custom_groups.len());
        let mut custom_by_name = HashMap::new();
        for group in &policy.custom_groups {
            if custom_by_name.contains_key(&group.name) {
                return Err(PolicyError::DuplicateCustomGroup {
                    name: group.name.clone(),
                });
            }
            custom_by_name.insert(group.name.clone(), custom.len());
            custom.push(CompiledCustomGroup::new(group, &policy.sort)?);
        }

        let mut slots = HashMap::new();
        let mut slot_comparators = Vec::with_capacity(policy.groups.len());
        let mut slot_newlines_inside = Vec::with_capacity(policy.groups.len());
        let mut slot_comment_above = Vec::with_capacity(policy.groups.len());

        for (slot, entry) in policy.groups.iter().enumerate() {
            let mut comparator = None;
            let mut newlines_inside = None;
            let mut comment_above = None;

            match entry {
                GroupsEntry::Group(name) => register(&mut slots, name, slot)?,
                GroupsEntry::AnyOf(names) => {
                    for name in names {
                        register(&mut slots, name, slot)?;
                    }
                }
                GroupsEntry::Override(over) => {
                    for name in over.group.names() {
                        register(&mut slots, name, slot)?;
                    }
                    comparator = override_comparator(&policy.sort, over)?;
                    newlines_inside = over.newlines_inside;
                    comment_above = over.comment_above.clone();
                }
                GroupsEntry::Newlines(_) => {}
            }

            slot_comparators.push(comparator);
            slot_newlines_inside.push(newlines_inside);
            slot_comment_above.push(comment_above);
        }

        // A custom group nothing references could never take effect.
        for group in &policy.custom_groups {
            if !slots.contains_key(&group.name) {
                return Err(PolicyError::UnreferencedCustomGroup {
                    name: group.name.clone(),
                });
            }
        }

        let partition = PartitionMode::compile(policy)?;

        Ok(Self {
            entries: policy.groups.clone(),
            base,
            custom,
            custom_by_name,
            slot_count: policy.groups.len(),
            slots,
            slot_comparators,
            slot_newlines_inside,
            slot_comment_above,
            partition,
            global_newlines: policy.newlines_between,
        })
    }

    /// Index of the first `groups` entry matching the label, or the
    /// implicit trailing "unknown" slot.
    pub(crate) fn slot_of(&self, label: &str) -> usize {
        self.slots.get(label).copied().unwrap_or(self.slot_count)
    }

    pub(crate) fn custom_group(&self, label: &str) -> Option<&CompiledCustomGroup> {
        self.custom_by_name
            .get(label)
            .map(|&index| &self.custom[index])
    }

    /// Comparator for two elements that resolved to the same slot.
    pub(crate) fn comparator_for(&self, label_a: &str, label_b: &str, slot: usize) -> &Comparator {
        if label_a == label_b
            && let Some(group) = self.custom_group(label_a)
            && let Some(comparator) = &group.comparator
        {
            return comparator;
        }
        if slot < self.slot_count
            && let Some(comparator) = &self.slot_comparators[slot]
        {
            return comparator;
        }
        &self.base
    }
}

fn register(
    slots: &mut HashMap<String, usize>,
    name: &str,
    slot: usize,
) -> Result<(), PolicyError> {
    if slots.insert(name.to_string(), slot).is_some() {
        return Err(PolicyError::DuplicateGroup {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn override_comparator(
    base: &SortSpec,
    over: &GroupOverride,
) -> Result<Option<Comparator>, PolicyError> {
    if over.order.is_none() && over.sort_type.is_none() && over.fallback_sort.is_none() {
        return Ok(None);
    }
    let mut spec = base.clone();
    if let Some(sort_type) = over.sort_type {
        spec.sort_type = sort_type;
    }
    if let Some(order) = over.order {
        spec.order = order;
    }
    if let Some(fallback) = &over.fallback_sort {
        spec.fallback_sort = Some(fallback.clone());
    }
    Comparator::new(&spec).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordfix_types::policy::{CustomGroup, GroupRef, SortOrder};

    fn policy_with_groups(groups: Vec<GroupsEntry>) -> OrderingPolicy {
        OrderingPolicy {
            groups,
            ..OrderingPolicy::default()
        }
    }

    #[test]
    fn labels_resolve_to_first_matching_entry() {
        let policy = policy_with_groups(vec![
            GroupsEntry::Group("methods".to_string()),
            GroupsEntry::Newlines(NewlinesSetting::Always),
            GroupsEntry::AnyOf(vec!["getters".to_string(), "setters".to_string()]),
        ]);
        let compiled = CompiledPolicy::new(&policy).expect("compile");

        assert_eq!(compiled.slot_of("methods"), 0);
        assert_eq!(compiled.slot_of("getters"), 2);
        assert_eq!(compiled.slot_of("setters"), 2);
        // Unknown labels land in the trailing bucket.
        assert_eq!(compiled.slot_of("anything"), 3);
    }

    #[test]
    fn duplicate_group_name_is_rejected() {
        let policy = policy_with_groups(vec![
            GroupsEntry::Group("a".to_string()),
            GroupsEntry::AnyOf(vec!["b".to_string(), "a".to_string()]),
        ]);
        assert!(matches!(
            CompiledPolicy::new(&policy),
            Err(PolicyError::DuplicateGroup { name }) if name == "a"
        ));
    }

    #[test]
    fn duplicate_custom_group_is_rejected() {
        let mut first = CustomGroup::new("cg");
        first.matcher.element_name_pattern = Some("x".to_string());
        let mut second = CustomGroup::new("cg");
        second.matcher.element_name_pattern = Some("y".to_string());

        let policy = OrderingPolicy {
            groups: vec![GroupsEntry::Group("cg".to_string())],
            custom_groups: vec![first, second],
            ..OrderingPolicy::default()
        };
        assert!(matches!(
            CompiledPolicy::new(&policy),
            Err(PolicyError::DuplicateCustomGroup { .. })
        ));
    }

    #[test]
    fn unreferenced_custom_group_is_rejected() {
        let mut group = CustomGroup::new("cg");
        group.matcher.element_name_pattern = Some("x".to_string());
        let policy = OrderingPolicy {
            groups: vec![GroupsEntry::Group("other".to_string())],
            custom_groups: vec![group],
            ..OrderingPolicy::default()
        };
        assert!(matches!(
            CompiledPolicy::new(&policy),
            Err(PolicyError::UnreferencedCustomGroup { name }) if name == "cg"
        ));
    }

    #[test]
    fn override_entries_carry_their_settings() {
        let policy = policy_with_groups(vec![GroupsEntry::Override(GroupOverride {
            group: GroupRef::Many(vec!["a".to_string(), "b".to_string()]),
            newlines_inside: Some(NewlinesSetting::Never),
            comment_above: Some("Header".to_string()),
            order: Some(SortOrder::Desc),
            ..GroupOverride::new("unused")
        })]);
        let compiled = CompiledPolicy::new(&policy).expect("compile");

        assert_eq!(compiled.slot_of("a"), 0);
        assert_eq!(compiled.slot_of("b"), 0);
        assert_eq!(
            compiled.slot_newlines_inside[0],
            Some(NewlinesSetting::Never)
        );
        assert_eq!(compiled.slot_comment_above[0].as_deref(), Some("Header"));
        assert!(compiled.slot_comparators[0].is_some());
    }

    #[test]
    fn custom_group_comparator_beats_slot_override() {
        let mut group = CustomGroup::new("cg");
        group.matcher.element_name_pattern = Some("x".to_string());
        group.order = Some(SortOrder::Desc);

        let policy = OrderingPolicy {
            groups: vec![GroupsEntry::Group("cg".to_string())],
            custom_groups: vec![group],
            ..OrderingPolicy::default()
        };
        let compiled = CompiledPolicy::new(&policy).expect("compile");

        // Same custom label on both sides: the custom comparator wins.
        let comparator = compiled.comparator_for("cg", "cg", 0);
        let el = ordfix_types::element::Element::new("a", ordfix_types::element::Span::new(0, 1));
        let el2 = ordfix_types::element::Element::new("b", ordfix_types::element::Span::new(0, 1));
        let a = crate::comparator::Sortable {
            element: &el,
            label: "cg",
        };
        let b = crate::comparator::Sortable {
            element: &el2,
            label: "cg",
        };
        assert_eq!(comparator.compare(&a, &b), std::cmp::Ordering::Greater);
    }
}
