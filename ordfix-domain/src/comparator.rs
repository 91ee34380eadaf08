//! Comparator builder: one closed variant per sort type, resolved once per
//! policy so the hot comparison loop never branches on strings.

use crate::error::PolicyError;
use ordfix_types::element::Element;
use ordfix_types::policy::{SortOrder, SortSpec, SortType, SpecialCharacters};
use std::cmp::Ordering;
use std::collections::HashMap;

/// An element paired with its effective group label for one comparison.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sortable<'a> {
    pub element: &'a Element,
    pub label: &'a str,
}

#[derive(Debug, Clone)]
pub(crate) struct Comparator {
    kind: CompareKind,
    descending: bool,
    fallback: Option<Box<Comparator>>,
}

#[derive(Debug, Clone)]
enum CompareKind {
    Alphabetical {
        ignore_case: bool,
        special: SpecialCharacters,
    },
    Natural {
        ignore_case: bool,
        special: SpecialCharacters,
    },
    LineLength,
    Alphabet {
        ranks: HashMap<char, usize>,
        ignore_case: bool,
        special: SpecialCharacters,
    },
    Unsorted,
    SubgroupOrder {
        ranks: HashMap<String, usize>,
    },
}

impl Comparator {
    pub fn new(spec: &SortSpec) -> Result<Self, PolicyError> {
        let kind = match spec.sort_type {
            SortType::Alphabetical => CompareKind::Alphabetical {
                ignore_case: spec.ignore_case,
                special: spec.special_characters,
            },
            SortType::Natural => CompareKind::Natural {
                ignore_case: spec.ignore_case,
                special: spec.special_characters,
            },
            SortType::LineLength => CompareKind::LineLength,
            SortType::Custom => {
                if spec.alphabet.is_empty() {
                    return Err(PolicyError::EmptyAlphabet);
                }
                let mut ranks = HashMap::new();
                for (rank, ch) in spec.alphabet.chars().enumerate() {
                    ranks.entry(ch).or_insert(rank);
                }
                CompareKind::Alphabet {
                    ranks,
                    ignore_case: spec.ignore_case,
                    special: spec.special_characters,
                }
            }
            SortType::Unsorted => CompareKind::Unsorted,
            SortType::SubgroupOrder => {
                if spec.subgroup_order.is_empty() {
                    return Err(PolicyError::EmptySubgroupOrder);
                }
                let ranks = spec
                    .subgroup_order
                    .iter()
                    .enumerate()
                    .map(|(rank, label)| (label.clone(), rank))
                    .collect();
                CompareKind::SubgroupOrder { ranks }
            }
        };

        let fallback = match &spec.fallback_sort {
            Some(inner) => Some(Box::new(Comparator::new(inner)?)),
            None => None,
        };

        Ok(Self {
            kind,
            descending: spec.order == SortOrder::Desc,
            fallback,
        })
    }

    pub fn compare(&self, a: &Sortable<'_>, b: &Sortable<'_>) -> Ordering {
        let mut result = match &self.kind {
            CompareKind::Alphabetical {
                ignore_case,
                special,
            } => {
                let left = normalize(&a.element.name, *ignore_case, *special);
                let right = normalize(&b.element.name, *ignore_case, *special);
                left.cmp(&right)
            }
            CompareKind::Natural {
                ignore_case,
                special,
            } => {
                let left = normalize(&a.element.name, *ignore_case, *special);
                let right = normalize(&b.element.name, *ignore_case, *special);
                natural_cmp(&left, &right)
            }
            CompareKind::LineLength => a.element.size.cmp(&b.element.size),
            CompareKind::Alphabet {
                ranks,
                ignore_case,
                special,
            } => {
                let left = normalize(&a.element.name, *ignore_case, *special);
                let right = normalize(&b.element.name, *ignore_case, *special);
                alphabet_cmp(ranks, &left, &right)
            }
            CompareKind::Unsorted => Ordering::Equal,
            CompareKind::SubgroupOrder { ranks } => {
                match (ranks.get(a.label), ranks.get(b.label)) {
                    (Some(left), Some(right)) => left.cmp(right),
                    // Labels outside the list compare equal and keep their
                    // source order through the stable sort.
                    _ => Ordering::Equal,
                }
            }
        };

        if self.descending {
            result = result.reverse();
        }
        if result == Ordering::Equal
            && let Some(fallback) = &self.fallback
        {
            return fallback.compare(a, b);
        }
        result
    }
}

fn normalize(name: &str, ignore_case: bool, special: SpecialCharacters) -> String {
    let stripped = match special {
        SpecialCharacters::Keep => name.to_string(),
        SpecialCharacters::Trim => name
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_string(),
        SpecialCharacters::Remove => name.chars().filter(|c| c.is_alphanumeric()).collect(),
    };
    if ignore_case {
        stripped.to_lowercase()
    } else {
        stripped
    }
}

/// Alphabetical comparison where runs of digits compare by numeric value,
/// so `item2` sorts before `item10`.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let end_a = digit_run_end(&a, i);
            let end_b = digit_run_end(&b, j);
            let run = cmp_digit_runs(&a[i..end_a], &b[j..end_b]);
            if run != Ordering::Equal {
                return run;
            }
            i = end_a;
            j = end_b;
        } else {
            let step = a[i].cmp(&b[j]);
            if step != Ordering::Equal {
                return step;
            }
            i += 1;
            j += 1;
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn digit_run_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn cmp_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let sig_a = &a[a.iter().take_while(|&&c| c == '0').count()..];
    let sig_b = &b[b.iter().take_while(|&&c| c == '0').count()..];
    sig_a
        .len()
        .cmp(&sig_b.len())
        .then_with(|| sig_a.cmp(sig_b))
        .then_with(|| a.len().cmp(&b.len()))
}

/// Per-character comparison by rank in a supplied alphabet. Characters
/// absent from the alphabet sort after every known character.
fn alphabet_cmp(ranks: &HashMap<char, usize>, a: &str, b: &str) -> Ordering {
    let mut right = b.chars();
    for ca in a.chars() {
        let Some(cb) = right.next() else {
            return Ordering::Greater;
        };
        let ra = ranks.get(&ca).copied().unwrap_or(usize::MAX);
        let rb = ranks.get(&cb).copied().unwrap_or(usize::MAX);
        if ra != rb {
            return ra.cmp(&rb);
        }
    }
    if right.next().is_some() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordfix_types::element::Span;

    fn element(name: &str, size: usize) -> Element {
        let mut el = Element::new(name, Span::new(0, size));
        el.size = size;
        el
    }

    fn cmp(spec: &SortSpec, a: &Element, b: &Element) -> Ordering {
        let comparator = Comparator::new(spec).expect("comparator");
        comparator.compare(
            &Sortable {
                element: a,
                label: "",
            },
            &Sortable {
                element: b,
                label: "",
            },
        )
    }

    #[test]
    fn natural_orders_numeric_runs_by_value() {
        let spec = SortSpec {
            sort_type: SortType::Natural,
            ..SortSpec::default()
        };
        let item2 = element("item2", 5);
        let item10 = element("item10", 6);
        assert_eq!(cmp(&spec, &item2, &item10), Ordering::Less);
        assert_eq!(cmp(&spec, &item10, &item2), Ordering::Greater);
    }

    #[test]
    fn natural_breaks_leading_zero_ties_by_raw_length() {
        let spec = SortSpec {
            sort_type: SortType::Natural,
            ..SortSpec::default()
        };
        let padded = element("item01", 6);
        let plain = element("item1", 5);
        assert_eq!(cmp(&spec, &plain, &padded), Ordering::Less);
    }

    #[test]
    fn line_length_descending_scenario() {
        let spec = SortSpec {
            sort_type: SortType::LineLength,
            order: SortOrder::Desc,
            ..SortSpec::default()
        };
        let a = element("a", 1);
        let bb = element("bb", 2);
        let bbb = element("bbb", 3);
        assert_eq!(cmp(&spec, &bbb, &bb), Ordering::Less);
        assert_eq!(cmp(&spec, &bb, &a), Ordering::Less);
    }

    #[test]
    fn line_length_ties_fall_through_to_fallback() {
        let spec = SortSpec {
            sort_type: SortType::LineLength,
            fallback_sort: Some(Box::new(SortSpec::default())),
            ..SortSpec::default()
        };
        let ab = element("ab", 2);
        let aa = element("aa", 2);
        assert_eq!(cmp(&spec, &aa, &ab), Ordering::Less);
        assert_eq!(cmp(&spec, &ab, &aa), Ordering::Greater);
    }

    #[test]
    fn unsorted_always_ties() {
        let spec = SortSpec {
            sort_type: SortType::Unsorted,
            ..SortSpec::default()
        };
        let z = element("z", 1);
        let a = element("a", 1);
        assert_eq!(cmp(&spec, &z, &a), Ordering::Equal);
    }

    #[test]
    fn custom_alphabet_defines_the_order() {
        let spec = SortSpec {
            sort_type: SortType::Custom,
            alphabet: "zyxwvutsrqponmlkjihgfedcba".to_string(),
            ..SortSpec::default()
        };
        let z = element("z", 1);
        let a = element("a", 1);
        assert_eq!(cmp(&spec, &z, &a), Ordering::Less);
    }

    #[test]
    fn custom_requires_alphabet() {
        let spec = SortSpec {
            sort_type: SortType::Custom,
            ..SortSpec::default()
        };
        assert!(matches!(
            Comparator::new(&spec),
            Err(PolicyError::EmptyAlphabet)
        ));
    }

    #[test]
    fn subgroup_order_ranks_labels_and_ties_unknowns() {
        let spec = SortSpec {
            sort_type: SortType::SubgroupOrder,
            subgroup_order: vec!["late".to_string(), "early".to_string()],
            ..SortSpec::default()
        };
        let comparator = Comparator::new(&spec).expect("comparator");
        let a = element("a", 1);
        let b = element("b", 1);

        let late = Sortable {
            element: &a,
            label: "late",
        };
        let early = Sortable {
            element: &b,
            label: "early",
        };
        let stray = Sortable {
            element: &b,
            label: "stray",
        };
        assert_eq!(comparator.compare(&late, &early), Ordering::Less);
        assert_eq!(comparator.compare(&late, &stray), Ordering::Equal);
        assert_eq!(comparator.compare(&stray, &early), Ordering::Equal);
    }

    #[test]
    fn special_characters_trim_and_remove() {
        let trim = SortSpec {
            special_characters: SpecialCharacters::Trim,
            ..SortSpec::default()
        };
        let underscored = element("__b", 3);
        let plain = element("a", 1);
        assert_eq!(cmp(&trim, &plain, &underscored), Ordering::Less);

        let remove = SortSpec {
            special_characters: SpecialCharacters::Remove,
            ..SortSpec::default()
        };
        let dashed = element("a-b", 3);
        let joined = element("ab", 2);
        assert_eq!(cmp(&remove, &dashed, &joined), Ordering::Equal);
    }

    #[test]
    fn case_sensitivity_follows_the_ignore_case_flag() {
        let sensitive = SortSpec {
            ignore_case: false,
            ..SortSpec::default()
        };
        let upper = element("B", 1);
        let lower = element("a", 1);
        assert_eq!(cmp(&sensitive, &upper, &lower), Ordering::Less);

        let insensitive = SortSpec::default();
        assert_eq!(cmp(&insensitive, &lower, &upper), Ordering::Less);
    }
}
