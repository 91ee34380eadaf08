//! Reconciliation: compute the desired order for one sortable region, diff
//! it against the actual order, and emit violations plus the spacing and
//! header-comment requirements fix synthesis needs.

use crate::comparator::Sortable;
use crate::compile::CompiledPolicy;
use crate::{dependency, groups, newlines, partition};
use ordfix_types::element::Element;
use ordfix_types::outcome::{CommentInsertion, Reconciliation, SpacingRequirement};
use ordfix_types::violation::{Summary, Violation, ViolationKind};
use std::collections::HashSet;
use tracing::debug;

pub struct Reconciler {
    policy: CompiledPolicy,
}

impl Reconciler {
    pub fn new(policy: CompiledPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CompiledPolicy {
        &self.policy
    }

    /// Process one sortable region to completion. Pure: all side tables
    /// are scoped to this call and the elements are never mutated.
    pub fn reconcile(&self, elements: &[Element]) -> Reconciliation {
        let policy = &self.policy;
        let count = elements.len();
        if count == 0 {
            return Reconciliation::default();
        }

        let parts = partition::partition_ids(&policy.partition, elements);
        let labels = groups::effective_labels(policy, elements);
        let slots: Vec<usize> = labels.iter().map(|label| policy.slot_of(label)).collect();

        let mut desired = Vec::with_capacity(count);
        let mut exempt = HashSet::new();
        let mut start = 0;
        while start < count {
            let mut end = start + 1;
            while end < count && parts[end] == parts[start] {
                end += 1;
            }
            self.order_partition(elements, &labels, &slots, start..end, &mut desired, &mut exempt);
            start = end;
        }

        let mut position = vec![0usize; count];
        for (slot, &original) in desired.iter().enumerate() {
            position[original] = slot;
        }

        let mut violations = Vec::new();
        let mut summary = Summary::default();

        // Order-shaped violations: at most one per right-hand element,
        // dependency complaints first. Suppressed elements neither trigger
        // nor receive reports, but their anchored positions still shape
        // `position` for everyone else.
        let mut previous: Option<usize> = None;
        for right in 0..count {
            if elements[right].is_suppressed {
                continue;
            }
            if let Some(found) = self.dependency_violation(elements, &parts, &exempt, right) {
                summary.record(found.kind);
                violations.push(found);
            } else if let Some(left) = previous
                && position[right] < position[left]
            {
                let kind = if slots[left] != slots[right] {
                    ViolationKind::GroupOrder
                } else {
                    ViolationKind::Order
                };
                let mut violation =
                    Violation::new(kind, &elements[left].name, &elements[right].name);
                if kind == ViolationKind::GroupOrder {
                    violation = violation.with_groups(&labels[left], &labels[right]);
                }
                summary.record(kind);
                violations.push(violation);
            }
            previous = Some(right);
        }

        // Spacing violations: actual adjacent pairs whose order is already
        // correct, inside one partition.
        for right in 1..count {
            let left = right - 1;
            if parts[left] != parts[right]
                || elements[left].is_suppressed
                || elements[right].is_suppressed
                || position[right] < position[left]
                || slots[left] > slots[right]
            {
                continue;
            }
            let Some(required) = newlines::required_blank_lines(
                policy,
                &labels[left],
                slots[left],
                &labels[right],
                slots[right],
            ) else {
                continue;
            };
            let actual = elements[right].blank_lines_before;
            if actual == required {
                continue;
            }
            let kind = if actual < required {
                ViolationKind::MissingSpacing
            } else {
                ViolationKind::ExtraSpacing
            };
            summary.record(kind);
            violations.push(Violation::new(
                kind,
                &elements[left].name,
                &elements[right].name,
            ));
        }

        // Spacing requirements along the desired sequence, for fixes.
        let mut spacing = Vec::new();
        for gap in 0..count - 1 {
            let (left, right) = (desired[gap], desired[gap + 1]);
            if parts[left] != parts[right]
                || elements[left].is_suppressed
                || elements[right].is_suppressed
                || slots[left] > slots[right]
            {
                continue;
            }
            if let Some(required) = newlines::required_blank_lines(
                policy,
                &labels[left],
                slots[left],
                &labels[right],
                slots[right],
            ) {
                spacing.push(SpacingRequirement {
                    gap,
                    blank_lines: required,
                });
            }
        }

        // Required header comments above the first member of a group.
        let mut comment_insertions = Vec::new();
        let mut seen_groups = HashSet::new();
        for (slot_position, &original) in desired.iter().enumerate() {
            let group_slot = slots[original];
            if group_slot >= policy.slot_count || elements[original].is_suppressed {
                continue;
            }
            let Some(text) = &policy.slot_comment_above[group_slot] else {
                continue;
            };
            if !seen_groups.insert((parts[original], group_slot)) {
                continue;
            }
            let present = elements[original]
                .comments_above
                .iter()
                .any(|comment| comment.text.trim() == text.trim());
            if present {
                continue;
            }
            summary.record(ViolationKind::MissingCommentAbove);
            violations.push(Violation {
                kind: ViolationKind::MissingCommentAbove,
                left_name: labels[original].clone(),
                right_name: elements[original].name.clone(),
                left_group: Some(labels[original].clone()),
                right_group: None,
            });
            comment_insertions.push(CommentInsertion {
                slot: slot_position,
                text: text.clone(),
            });
        }

        debug!(
            elements = count,
            partitions = parts.last().map_or(0, |last| last + 1),
            violations = violations.len(),
            "reconciled region"
        );

        Reconciliation {
            violations,
            desired,
            spacing,
            comment_insertions,
            summary,
        }
    }

    /// Desired order for one partition: group slot, then the slot's
    /// comparator, then dependency hoisting; suppressed elements stay at
    /// their original indices.
    fn order_partition(
        &self,
        elements: &[Element],
        labels: &[String],
        slots: &[usize],
        range: std::ops::Range<usize>,
        desired: &mut Vec<usize>,
        exempt: &mut HashSet<usize>,
    ) {
        let policy = &self.policy;
        let members: Vec<usize> = range.collect();
        let movable: Vec<usize> = members
            .iter()
            .copied()
            .filter(|&index| !elements[index].is_suppressed)
            .collect();

        let mut sorted_local: Vec<usize> = (0..movable.len()).collect();
        sorted_local.sort_by(|&la, &lb| {
            let (a, b) = (movable[la], movable[lb]);
            slots[a].cmp(&slots[b]).then_with(|| {
                policy
                    .comparator_for(&labels[a], &labels[b], slots[a])
                    .compare(
                        &Sortable {
                            element: &elements[a],
                            label: &labels[a],
                        },
                        &Sortable {
                            element: &elements[b],
                            label: &labels[b],
                        },
                    )
            })
        });

        let graph = dependency::DepGraph::build(elements, &movable);
        let cyclic = graph.cyclic_members();
        let ordered_local = graph.order(&sorted_local, &cyclic);
        exempt.extend(cyclic.iter().map(|&local| movable[local]));

        let ordered: Vec<usize> = ordered_local.iter().map(|&local| movable[local]).collect();
        let mut next = 0;
        for &index in &members {
            if elements[index].is_suppressed {
                desired.push(index);
            } else {
                desired.push(ordered[next]);
                next += 1;
            }
        }
    }

    /// First earlier element whose value reads `right`, when `right` is a
    /// non-exempt producer that should have come first.
    fn dependency_violation(
        &self,
        elements: &[Element],
        parts: &[u32],
        exempt: &HashSet<usize>,
        right: usize,
    ) -> Option<Violation> {
        if exempt.contains(&right) {
            return None;
        }
        for left in 0..right {
            if parts[left] != parts[right]
                || elements[left].is_suppressed
                || exempt.contains(&left)
            {
                continue;
            }
            if dependency::depends_on(&elements[left], &elements[right]) {
                return Some(Violation::new(
                    ViolationKind::DependencyOrder,
                    &elements[left].name,
                    &elements[right].name,
                ));
            }
        }
        None
    }
}
