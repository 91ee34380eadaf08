use ordfix_types::edit::TextEdit;
use ordfix_types::element::{Element, Span};
use ordfix_types::policy::{
    CustomGroup, GroupOverride, GroupsEntry, NewlinesSetting, OrderingPolicy, SortOrder, SortSpec,
    SortType, SpecialCharacters,
};
use ordfix_types::violation::{Violation, ViolationKind};
use pretty_assertions::assert_eq;

#[test]
fn sort_type_serializes_kebab_case() {
    assert_eq!(
        serde_json::to_value(SortType::LineLength).expect("serialize"),
        serde_json::json!("line-length")
    );
    assert_eq!(
        serde_json::to_value(SortType::SubgroupOrder).expect("serialize"),
        serde_json::json!("subgroup-order")
    );
    assert_eq!(
        serde_json::to_value(SortType::Alphabetical).expect("serialize"),
        serde_json::json!("alphabetical")
    );
}

#[test]
fn violation_kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_value(ViolationKind::DependencyOrder).expect("serialize"),
        serde_json::json!("dependency_order")
    );
    assert_eq!(
        serde_json::to_value(ViolationKind::MissingCommentAbove).expect("serialize"),
        serde_json::json!("missing_comment_above")
    );
}

#[test]
fn violation_omits_empty_groups() {
    let v = Violation::new(ViolationKind::Order, "b", "a");
    let value = serde_json::to_value(&v).expect("serialize violation");
    assert!(value.get("left_group").is_none());
    assert!(value.get("right_group").is_none());
}

#[test]
fn element_omits_empty_collections() {
    let el = Element::new("a", Span::new(0, 1));
    let value = serde_json::to_value(&el).expect("serialize element");
    assert!(value.get("dependencies").is_none());
    assert!(value.get("comments_above").is_none());
    assert!(value.get("value").is_none());
    // Always carries its own name as a dependency name.
    assert_eq!(value["dependency_names"], serde_json::json!(["a"]));
}

#[test]
fn policy_roundtrips_through_json() {
    let mut cg = CustomGroup::new("callbacks");
    cg.matcher.element_name_pattern = Some("^on[A-Z]".to_string());
    cg.order = Some(SortOrder::Desc);

    let policy = OrderingPolicy {
        sort: SortSpec {
            sort_type: SortType::Natural,
            ignore_case: false,
            special_characters: SpecialCharacters::Trim,
            fallback_sort: Some(Box::new(SortSpec {
                sort_type: SortType::LineLength,
                ..SortSpec::default()
            })),
            ..SortSpec::default()
        },
        groups: vec![
            GroupsEntry::Group("callbacks".to_string()),
            GroupsEntry::Newlines(NewlinesSetting::Always),
            GroupsEntry::AnyOf(vec!["property".to_string(), "method".to_string()]),
            GroupsEntry::Override(GroupOverride {
                newlines_inside: Some(NewlinesSetting::Count(2)),
                comment_above: Some("Everything else".to_string()),
                ..GroupOverride::new("rest")
            }),
        ],
        custom_groups: vec![cg],
        newlines_between: NewlinesSetting::Never,
        partition_by_comment: None,
        partition_by_newline: Some(1),
    };

    let json = serde_json::to_string(&policy).expect("serialize policy");
    let back: OrderingPolicy = serde_json::from_str(&json).expect("deserialize policy");
    assert_eq!(back, policy);
}

#[test]
fn default_policy_is_minimal_json() {
    let value = serde_json::to_value(OrderingPolicy::default()).expect("serialize");
    assert!(value.get("partition_by_comment").is_none());
    assert!(value.get("partition_by_newline").is_none());
    assert_eq!(value["newlines_between"], serde_json::json!("ignore"));
}

#[test]
fn text_edit_roundtrips() {
    let edit = TextEdit::replace(Span::new(3, 9), "a: 1");
    let json = serde_json::to_string(&edit).expect("serialize edit");
    let back: TextEdit = serde_json::from_str(&json).expect("deserialize edit");
    assert_eq!(back, edit);
}
