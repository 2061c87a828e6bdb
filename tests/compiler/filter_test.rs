use std::sync::Arc;

use formscope::metadata::{AttributeMap, AttributeMetadata, AttributeType};
use formscope::odata::{
    compile_query, FilterCondition, FilterGroup, FilterOperator, ODataQueryCompiler,
    QueryDefinition,
};

fn typed(entries: &[(&str, AttributeType)]) -> Arc<AttributeMap> {
    Arc::new(
        entries
            .iter()
            .map(|(name, ty)| (name.to_string(), AttributeMetadata::new(*ty)))
            .collect(),
    )
}

/// Compile a single condition and return the `$filter` text.
fn filter_of(cond: FilterCondition, attrs: Option<Arc<AttributeMap>>) -> String {
    let mut query = QueryDefinition::new().filter_group(FilterGroup::and(vec![cond]));
    query.attr_map = attrs;
    let compiled = compile_query(&query);
    compiled
        .strip_prefix("?$filter=")
        .map(str::to_string)
        .unwrap_or(compiled)
}

#[test]
fn test_null_operator_ignores_value() {
    assert_eq!(
        filter_of(FilterCondition::bare("x", FilterOperator::EqNull), None),
        "x eq null"
    );
    assert_eq!(
        filter_of(FilterCondition::new("x", FilterOperator::EqNull, "something"), None),
        "x eq null"
    );
    assert_eq!(
        filter_of(
            FilterCondition::new("parentid", FilterOperator::NeNull, "1"),
            Some(typed(&[("parentid", AttributeType::Lookup)]))
        ),
        "parentid ne null"
    );
}

#[test]
fn test_inferred_boolean() {
    assert_eq!(
        filter_of(FilterCondition::new("donotemail", FilterOperator::Eq, "True"), None),
        "donotemail eq true"
    );
}

#[test]
fn test_inferred_guid_becomes_lookup() {
    assert_eq!(
        filter_of(
            FilterCondition::new(
                "parentaccountid",
                FilterOperator::Eq,
                "3fa85f64-5717-4562-b3fc-2c963f66afa6"
            ),
            None
        ),
        "_parentaccountid_value eq 3fa85f64-5717-4562-b3fc-2c963f66afa6"
    );
}

#[test]
fn test_padded_guid_is_quoted_as_string() {
    assert_eq!(
        filter_of(
            FilterCondition::new(
                "parentid",
                FilterOperator::Eq,
                " 3fa85f64-5717-4562-b3fc-2c963f66afa6 "
            ),
            None
        ),
        "parentid eq ' 3fa85f64-5717-4562-b3fc-2c963f66afa6 '"
    );
}

#[test]
fn test_inferred_number() {
    assert_eq!(
        filter_of(FilterCondition::new("employees", FilterOperator::Ge, "42"), None),
        "employees ge 42"
    );
    assert_eq!(
        filter_of(FilterCondition::new("ratio", FilterOperator::Lt, "0.50"), None),
        "ratio lt 0.5"
    );
}

#[test]
fn test_inferred_date() {
    assert_eq!(
        filter_of(FilterCondition::new("createdon", FilterOperator::Gt, "2024-03-01"), None),
        "createdon gt '2024-03-01T00:00:00.000Z'"
    );
}

#[test]
fn test_inferred_string_is_quoted_and_escaped() {
    assert_eq!(
        filter_of(FilterCondition::new("name", FilterOperator::Eq, "O'Neil's"), None),
        "name eq 'O''Neil''s'"
    );
}

#[test]
fn test_escaping_doubles_every_quote() {
    for n in 0..5 {
        let raw = format!("a{}b", "'".repeat(n));
        let filter = filter_of(FilterCondition::new("name", FilterOperator::Eq, raw), None);
        let quotes = filter.matches('\'').count();
        assert_eq!(quotes, 2 * n + 2, "filter: {}", filter);
    }
}

#[test]
fn test_metadata_type_overrides_inference() {
    let attrs = typed(&[("accountnumber", AttributeType::String)]);
    assert_eq!(
        filter_of(
            FilterCondition::new("accountnumber", FilterOperator::Eq, "1001"),
            Some(attrs)
        ),
        "accountnumber eq '1001'"
    );
}

#[test]
fn test_number_attribute_with_text_emits_nan() {
    let attrs = typed(&[("revenue", AttributeType::Number)]);
    assert_eq!(
        filter_of(
            FilterCondition::new("revenue", FilterOperator::Gt, "a lot"),
            Some(attrs)
        ),
        "revenue gt NaN"
    );
}

#[test]
fn test_boolean_attribute_lowercases_raw_value() {
    let attrs = typed(&[("isactive", AttributeType::Boolean)]);
    assert_eq!(
        filter_of(
            FilterCondition::new("isactive", FilterOperator::Ne, "FALSE"),
            Some(attrs)
        ),
        "isactive ne false"
    );
}

#[test]
fn test_optionset_numeric_and_label() {
    let attrs = typed(&[("industrycode", AttributeType::Optionset)]);
    assert_eq!(
        filter_of(
            FilterCondition::new("industrycode", FilterOperator::Eq, "7"),
            Some(attrs.clone())
        ),
        "industrycode eq 7"
    );
    assert_eq!(
        filter_of(
            FilterCondition::new("industrycode", FilterOperator::Eq, "Retail's"),
            Some(attrs)
        ),
        "industrycode eq 'Retail''s'"
    );
}

#[test]
fn test_lookup_attribute_is_unquoted() {
    let attrs = typed(&[("ownerid", AttributeType::Lookup)]);
    assert_eq!(
        filter_of(
            FilterCondition::new("ownerid", FilterOperator::Eq, "not-a-guid"),
            Some(attrs)
        ),
        "_ownerid_value eq not-a-guid"
    );
}

#[test]
fn test_date_attribute_with_offset_is_normalized_to_utc() {
    let attrs = typed(&[("modifiedon", AttributeType::Date)]);
    assert_eq!(
        filter_of(
            FilterCondition::new("modifiedon", FilterOperator::Le, "2024-03-01T10:00:00+02:00"),
            Some(attrs)
        ),
        "modifiedon le '2024-03-01T08:00:00.000Z'"
    );
}

#[test]
fn test_unknown_type_is_quoted() {
    let attrs = typed(&[("blob", AttributeType::Unknown)]);
    assert_eq!(
        filter_of(FilterCondition::new("blob", FilterOperator::Eq, "12"), Some(attrs)),
        "blob eq '12'"
    );
}

#[test]
fn test_string_functions() {
    let attrs = typed(&[("name", AttributeType::String)]);
    let cases = [
        (FilterOperator::Contains, "contains(name,'Con''s')"),
        (FilterOperator::StartsWith, "startswith(name,'Con''s')"),
        (FilterOperator::EndsWith, "endswith(name,'Con''s')"),
        (FilterOperator::NotContains, "not contains(name,'Con''s')"),
    ];

    for (op, expected) in cases {
        assert_eq!(
            filter_of(FilterCondition::new("name", op, "Con's"), Some(attrs.clone())),
            expected
        );
    }
}

#[test]
fn test_string_function_on_non_string_is_dropped() {
    let attrs = typed(&[("revenue", AttributeType::Number)]);
    let query = QueryDefinition::new()
        .select(["name"])
        .filter_group(FilterGroup::and(vec![FilterCondition::new(
            "revenue",
            FilterOperator::Contains,
            "100",
        )]))
        .with_attr_map(attrs);

    assert_eq!(compile_query(&query), "?$select=name");
}

#[test]
fn test_string_function_on_inferred_number_is_dropped() {
    // "100" infers number, so contains() cannot apply
    let query = QueryDefinition::new().filter_group(FilterGroup::and(vec![
        FilterCondition::new("code", FilterOperator::Contains, "100"),
    ]));

    let compiled = ODataQueryCompiler::default().compile_with_diagnostics(&query);
    assert_eq!(compiled.query, "");
    assert_eq!(compiled.dropped.len(), 1);
    assert_eq!(compiled.dropped[0].attr, "code");
}

#[test]
fn test_missing_value_compiles_as_empty_string() {
    assert_eq!(
        filter_of(FilterCondition::bare("name", FilterOperator::Eq), None),
        "name eq ''"
    );
}
