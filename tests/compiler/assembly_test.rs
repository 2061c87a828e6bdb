use std::sync::Arc;

use formscope::metadata::{AttributeMap, AttributeMetadata, AttributeType};
use formscope::odata::{
    compile_query, FilterCondition, FilterGroup, FilterOperator, GroupJoin, QueryDefinition,
    SortDir,
};
use insta::assert_snapshot;

fn account_attrs() -> Arc<AttributeMap> {
    let mut map = AttributeMap::new();
    map.insert("name".to_string(), AttributeMetadata::new(AttributeType::String));
    map.insert("statecode".to_string(), AttributeMetadata::new(AttributeType::Optionset));
    map.insert("revenue".to_string(), AttributeMetadata::new(AttributeType::Number));
    map.insert("createdon".to_string(), AttributeMetadata::new(AttributeType::Date));
    map.insert(
        "primarycontactid".to_string(),
        AttributeMetadata::lookup(["contact"]),
    );
    Arc::new(map)
}

#[test]
fn test_inferred_scenario() {
    let query = QueryDefinition::new()
        .select(["name"])
        .filter_group(FilterGroup::and(vec![FilterCondition::new(
            "statecode",
            FilterOperator::Eq,
            "0",
        )]))
        .top(10);

    assert_eq!(
        compile_query(&query),
        "?$select=name&$filter=statecode eq 0&$top=10"
    );
}

#[test]
fn test_parameter_order_is_fixed() {
    let query = QueryDefinition::new()
        .order_by("name", SortDir::Desc)
        .top(3)
        .filter_group(FilterGroup::and(vec![FilterCondition::new(
            "name",
            FilterOperator::Ne,
            "x",
        )]))
        .select(["name"]);

    assert_eq!(
        compile_query(&query),
        "?$select=name&$filter=name ne 'x'&$top=3&$orderby=name desc"
    );
}

#[test]
fn test_order_direction_defaults_to_asc() {
    let mut query = QueryDefinition::new();
    query.order_attr = Some("createdon".to_string());
    assert_eq!(compile_query(&query), "?$orderby=createdon asc");
}

#[test]
fn test_zero_top_is_omitted() {
    let query = QueryDefinition::new().select(["name"]).top(0);
    assert_eq!(compile_query(&query), "?$select=name");
}

#[test]
fn test_empty_order_attr_is_omitted() {
    let query = QueryDefinition::new().order_by("", SortDir::Desc);
    assert_eq!(compile_query(&query), "");
}

#[test]
fn test_output_shape() {
    let queries = vec![
        QueryDefinition::new(),
        QueryDefinition::new().select(["a", "b"]),
        QueryDefinition::new().top(1).order_by("a", SortDir::Asc),
        QueryDefinition::new()
            .select(["a"])
            .filter_group(FilterGroup::and(vec![FilterCondition::bare(
                "a",
                FilterOperator::NeNull,
            )])),
    ];

    for query in &queries {
        let compiled = compile_query(query);
        if compiled.is_empty() {
            continue;
        }
        assert!(compiled.starts_with('?'), "{}", compiled);
        assert!(!compiled.ends_with('&'), "{}", compiled);
        assert!(!compiled.contains("&&"), "{}", compiled);
        assert!(!compiled.starts_with("?&"), "{}", compiled);
        for param in ["$select=", "$filter=", "$top=", "$orderby="] {
            assert!(compiled.matches(param).count() <= 1, "{}", compiled);
        }
    }
}

#[test]
fn test_compile_is_idempotent() {
    let query = QueryDefinition::new()
        .select(["name", "primarycontactid"])
        .filter_group(FilterGroup::or(vec![
            FilterCondition::new("name", FilterOperator::Contains, "Ltd"),
            FilterCondition::new("revenue", FilterOperator::Gt, "1000"),
        ]))
        .with_attr_map(account_attrs());

    assert_eq!(compile_query(&query), compile_query(&query));
}

#[test]
fn test_full_account_query() {
    let query = QueryDefinition::new()
        .select(["name", "primarycontactid", "revenue"])
        .filter_group(FilterGroup::and(vec![
            FilterCondition::new("statecode", FilterOperator::Eq, "0"),
            FilterCondition::new("createdon", FilterOperator::Ge, "2024-01-01"),
        ]))
        .filter_group(
            FilterGroup::or(vec![
                FilterCondition::new("name", FilterOperator::StartsWith, "Fabrikam"),
                FilterCondition::new(
                    "primarycontactid",
                    FilterOperator::Eq,
                    "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                ),
            ])
            .joined_with(GroupJoin::Or),
        )
        .filter_group(
            FilterGroup::not(vec![FilterCondition::new(
                "name",
                FilterOperator::NotContains,
                "test",
            )])
            .joined_with(GroupJoin::And),
        )
        .order_by("revenue", SortDir::Desc)
        .top(50)
        .with_attr_map(account_attrs());

    assert_snapshot!(
        compile_query(&query),
        @"?$select=name,_primarycontactid_value,revenue&$filter=(statecode eq 0 and createdon ge '2024-01-01T00:00:00.000Z') or (startswith(name,'Fabrikam') or _primarycontactid_value eq 3fa85f64-5717-4562-b3fc-2c963f66afa6) and not (not contains(name,'test'))&$top=50&$orderby=revenue desc"
    );
}
