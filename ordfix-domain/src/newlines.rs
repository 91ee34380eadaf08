//! Blank-line policy resolution: a three-level override pipeline.
//!
//! Within one group: custom-group `newlines_inside`, then the slot's own
//! `newlines_inside`, then the global default (`ignore` disables the check,
//! anything else means exactly zero). Between groups: every directive
//! sitting strictly between the two slots is pooled with the global
//! default, and always-class beats ignore beats never-class across the
//! pool; among always-class requirements the largest count wins.

use crate::compile::CompiledPolicy;
use ordfix_types::policy::{GroupsEntry, NewlinesSetting};

/// Required blank lines between two elements resolved to `left_slot` and
/// `right_slot`, with `left_slot <= right_slot`. `None` means spacing is
/// unconstrained.
pub(crate) fn required_blank_lines(
    policy: &CompiledPolicy,
    left_label: &str,
    left_slot: usize,
    right_label: &str,
    right_slot: usize,
) -> Option<u32> {
    if left_slot == right_slot {
        return required_within_group(policy, left_label, right_label, left_slot);
    }

    let mut max_required: Option<u32> = None;
    let mut saw_ignore = false;
    let mut consider = |setting: NewlinesSetting| match setting.blank_lines() {
        Some(n) if n >= 1 => max_required = Some(max_required.map_or(n, |m| m.max(n))),
        Some(_) => {}
        None => saw_ignore = true,
    };

    let fence = right_slot.min(policy.slot_count);
    for entry in &policy.entries[left_slot + 1..fence] {
        if let GroupsEntry::Newlines(setting) = entry {
            consider(*setting);
        }
    }
    consider(policy.global_newlines);

    if let Some(required) = max_required {
        Some(required)
    } else if saw_ignore {
        None
    } else {
        Some(0)
    }
}

fn required_within_group(
    policy: &CompiledPolicy,
    left_label: &str,
    right_label: &str,
    slot: usize,
) -> Option<u32> {
    if left_label == right_label
        && let Some(group) = policy.custom_group(left_label)
        && let Some(inside) = group.newlines_inside
    {
        return inside.blank_lines();
    }
    if slot < policy.slot_count
        && let Some(inside) = policy.slot_newlines_inside[slot]
    {
        return inside.blank_lines();
    }
    match policy.global_newlines {
        NewlinesSetting::Ignore => None,
        _ => Some(0),
    }
}
