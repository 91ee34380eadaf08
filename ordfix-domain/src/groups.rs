//! Custom-group membership and group-index resolution.
//!
//! Two phases: first the element's effective label is found (the first
//! matching custom group wins, otherwise the label assigned by the rule),
//! then the label is looked up in the ordered `groups` sequence. Labels
//! matching no entry land in the implicit trailing "unknown" slot.

use crate::comparator::Comparator;
use crate::compile::CompiledPolicy;
use crate::error::PolicyError;
use ordfix_types::element::Element;
use ordfix_types::policy::{CustomGroup, ElementMatcher, SortSpec};
use regex::Regex;

#[derive(Debug)]
pub(crate) struct CompiledCustomGroup {
    pub name: String,
    matchers: Vec<CompiledMatcher>,
    pub comparator: Option<Comparator>,
    pub newlines_inside: Option<ordfix_types::policy::NewlinesSetting>,
}

impl CompiledCustomGroup {
    pub fn new(group: &CustomGroup, base: &SortSpec) -> Result<Self, PolicyError> {
        let matchers = group
            .matchers()
            .iter()
            .map(|matcher| CompiledMatcher::new(matcher, &group.name))
            .collect::<Result<Vec<_>, _>>()?;

        let comparator = if group.order.is_some()
            || group.sort_type.is_some()
            || group.fallback_sort.is_some()
        {
            let mut spec = base.clone();
            if let Some(sort_type) = group.sort_type {
                spec.sort_type = sort_type;
            }
            if let Some(order) = group.order {
                spec.order = order;
            }
            if let Some(fallback) = &group.fallback_sort {
                spec.fallback_sort = Some(fallback.clone());
            }
            Some(Comparator::new(&spec)?)
        } else {
            None
        };

        Ok(Self {
            name: group.name.clone(),
            matchers,
            comparator,
            newlines_inside: group.newlines_inside,
        })
    }

    /// Logical OR across the group's matchers.
    pub fn matches(&self, element: &Element) -> bool {
        self.matchers.iter().any(|matcher| matcher.matches(element))
    }
}

#[derive(Debug)]
struct CompiledMatcher {
    name_pattern: Option<Regex>,
    value_pattern: Option<Regex>,
    selector: Option<String>,
    modifiers: Vec<String>,
}

impl CompiledMatcher {
    fn new(matcher: &ElementMatcher, group: &str) -> Result<Self, PolicyError> {
        if matcher.is_empty() {
            return Err(PolicyError::EmptyMatcher {
                name: group.to_string(),
            });
        }
        Ok(Self {
            name_pattern: compile_pattern(&matcher.element_name_pattern, "element_name_pattern")?,
            value_pattern: compile_pattern(&matcher.element_value_pattern, "element_value_pattern")?,
            selector: matcher.selector.clone(),
            modifiers: matcher.modifiers.clone(),
        })
    }

    /// Logical AND across the matcher's present fields.
    fn matches(&self, element: &Element) -> bool {
        if let Some(pattern) = &self.name_pattern
            && !pattern.is_match(&element.name)
        {
            return false;
        }
        if let Some(pattern) = &self.value_pattern {
            match &element.value {
                Some(value) if pattern.is_match(value) => {}
                _ => return false,
            }
        }
        if let Some(selector) = &self.selector
            && element.selector.as_deref() != Some(selector.as_str())
        {
            return false;
        }
        self.modifiers
            .iter()
            .all(|modifier| element.modifiers.contains(modifier))
    }
}

pub(crate) fn compile_pattern(
    pattern: &Option<String>,
    field: &'static str,
) -> Result<Option<Regex>, PolicyError> {
    match pattern {
        Some(pattern) => Regex::new(pattern)
            .map(Some)
            .map_err(|source| PolicyError::InvalidPattern {
                field,
                pattern: pattern.clone(),
                source,
            }),
        None => Ok(None),
    }
}

/// Effective group label per element: the first matching custom group, or
/// the rule-assigned label.
pub(crate) fn effective_labels(policy: &CompiledPolicy, elements: &[Element]) -> Vec<String> {
    elements
        .iter()
        .map(|element| {
            policy
                .custom
                .iter()
                .find(|group| group.matches(element))
                .map(|group| group.name.clone())
                .unwrap_or_else(|| element.group.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordfix_types::element::Span;
    use ordfix_types::policy::SortOrder;

    fn element(name: &str) -> Element {
        Element::new(name, Span::new(0, name.len()))
    }

    fn compiled(mut configure: impl FnMut(&mut CustomGroup)) -> CompiledCustomGroup {
        let mut group = CustomGroup::new("g");
        configure(&mut group);
        CompiledCustomGroup::new(&group, &SortSpec::default()).expect("compile custom group")
    }

    #[test]
    fn single_matcher_requires_every_field() {
        let group = compiled(|g| {
            g.matcher.element_name_pattern = Some("^on".to_string());
            g.matcher.selector = Some("property".to_string());
        });

        let mut matching = element("onClick");
        matching.selector = Some("property".to_string());
        assert!(group.matches(&matching));

        let mut wrong_selector = element("onClick");
        wrong_selector.selector = Some("method".to_string());
        assert!(!group.matches(&wrong_selector));

        let mut wrong_name = element("click");
        wrong_name.selector = Some("property".to_string());
        assert!(!group.matches(&wrong_name));
    }

    #[test]
    fn any_of_is_satisfied_by_one_branch() {
        let group = compiled(|g| {
            g.any_of = vec![
                ElementMatcher {
                    element_name_pattern: Some("^id$".to_string()),
                    ..ElementMatcher::default()
                },
                ElementMatcher {
                    selector: Some("index-signature".to_string()),
                    ..ElementMatcher::default()
                },
            ];
        });

        assert!(group.matches(&element("id")));

        let mut by_selector = element("whatever");
        by_selector.selector = Some("index-signature".to_string());
        assert!(group.matches(&by_selector));

        assert!(!group.matches(&element("name")));
    }

    #[test]
    fn value_pattern_fails_without_a_value() {
        let group = compiled(|g| {
            g.matcher.element_value_pattern = Some("^use".to_string());
        });

        let mut with_value = element("hook");
        with_value.value = Some("useMemo(...)".to_string());
        assert!(group.matches(&with_value));

        assert!(!group.matches(&element("hook")));
    }

    #[test]
    fn modifiers_are_a_subset_check() {
        let group = compiled(|g| {
            g.matcher.modifiers = vec!["static".to_string(), "readonly".to_string()];
        });

        let mut both = element("a");
        both.modifiers = vec![
            "static".to_string(),
            "readonly".to_string(),
            "public".to_string(),
        ];
        assert!(group.matches(&both));

        let mut one = element("a");
        one.modifiers = vec!["static".to_string()];
        assert!(!group.matches(&one));
    }

    #[test]
    fn empty_matcher_is_rejected() {
        let group = CustomGroup::new("g");
        assert!(matches!(
            CompiledCustomGroup::new(&group, &SortSpec::default()),
            Err(PolicyError::EmptyMatcher { .. })
        ));
    }

    #[test]
    fn bad_pattern_is_rejected_with_the_field_name() {
        let mut group = CustomGroup::new("g");
        group.matcher.element_name_pattern = Some("(unclosed".to_string());
        let err = CompiledCustomGroup::new(&group, &SortSpec::default()).unwrap_err();
        assert!(err.to_string().contains("element_name_pattern"));
    }

    #[test]
    fn overrides_produce_a_dedicated_comparator() {
        let group = compiled(|g| {
            g.matcher.element_name_pattern = Some(".".to_string());
            g.order = Some(SortOrder::Desc);
        });
        assert!(group.comparator.is_some());

        let plain = compiled(|g| {
            g.matcher.element_name_pattern = Some(".".to_string());
        });
        assert!(plain.comparator.is_none());
    }
}
