//! Filter-to-query compiler
//!
//! Translates a `FilterSelection` into the weighted multi-field request the
//! search API consumes. Compilation is a pure function: no I/O, no hidden
//! state, and deterministic output bytes for identical input. It never
//! produces a user-visible error; unknown labels degrade by being dropped
//! and an empty scope set degrades to the default scope set.

use std::collections::BTreeMap;

use crate::app::models::{FieldFilter, SearchRequest};
use crate::constants::search;

use super::fields;
use super::filters::FilterSelection;

/// One-based page request from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number
    pub page: u32,
    /// Results per page
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: search::PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create a page request for a one-based page with the default size
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }
}

/// Compile a filter selection into a search request
///
/// Filter groups are emitted in a fixed order (scopes, province, city,
/// industry, date range, contact channels); within a group, values follow
/// the ordered-set iteration order of the selection.
pub fn compile(selection: &FilterSelection, keyword: &str, page: PageRequest) -> SearchRequest {
    let mut field_filters = Vec::new();

    // Scope group: one filter listing every active scope field. An empty
    // scope selection substitutes the default set rather than sending an
    // empty-scope request, which would match nothing.
    field_filters.push(scope_filter(selection));

    if let Some(province) = &selection.province {
        field_filters.push(FieldFilter::new("province", vec![province.clone()]));

        if !selection.cities().is_empty() {
            field_filters.push(FieldFilter::new(
                "city",
                selection.cities().iter().cloned().collect(),
            ));
        }
    }

    if !selection.industries.is_empty() {
        field_filters.push(FieldFilter::new(
            "industry",
            selection.industries.iter().cloned().collect(),
        ));
    }

    let intervals: Vec<String> = selection
        .year_ranges
        .iter()
        .filter_map(|token| fields::year_range_expr(token))
        .map(str::to_string)
        .collect();
    if !intervals.is_empty() {
        field_filters.push(FieldFilter::new("establishment_date", intervals));
    }

    let contact_fields: Vec<String> = selection
        .contact_channels
        .iter()
        .filter_map(|label| fields::contact_channel_field(label))
        .map(str::to_string)
        .collect();
    if !contact_fields.is_empty() {
        field_filters.push(FieldFilter::new("exists", contact_fields));
    }

    SearchRequest::new(
        truncate_keyword(keyword),
        field_filters,
        page.page,
        page.page_size,
    )
}

/// Build the scope filter, falling back to the default scope set
///
/// Unknown scope labels are dropped silently; they only arise from stale UI
/// state. If every selected label is unknown the defaults are substituted,
/// so the scope filter is never empty.
fn scope_filter(selection: &FilterSelection) -> FieldFilter {
    let mut scope_fields: BTreeMap<String, Vec<String>> = selection
        .scopes
        .iter()
        .filter_map(|label| fields::scope_field(label))
        .map(|field| (field.to_string(), Vec::new()))
        .collect();

    if scope_fields.is_empty() {
        scope_fields = fields::DEFAULT_SCOPES
            .iter()
            .filter_map(|label| fields::scope_field(label))
            .map(|field| (field.to_string(), Vec::new()))
            .collect();
    }

    FieldFilter {
        field_filter: scope_fields,
        weight: 1,
    }
}

/// Clamp user keyword input to the accepted length, on a char boundary
fn truncate_keyword(keyword: &str) -> String {
    keyword
        .trim()
        .chars()
        .take(search::MAX_KEYWORD_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scopes_substitute_defaults() {
        let selection = FilterSelection::new();
        let request = compile(&selection, "科技", PageRequest::default());

        let scope = &request.field_filters[0];
        assert_eq!(scope.field_filter.len(), fields::DEFAULT_SCOPES.len());
        assert!(scope.field_filter.contains_key("company_name"));
        assert!(scope.field_filter.contains_key("business_scope"));
        assert!(scope.field_filter.values().all(Vec::is_empty));
    }

    #[test]
    fn test_unknown_scopes_fall_back_to_defaults() {
        let mut selection = FilterSelection::new();
        selection.toggle_scope("不支持的范围");
        let request = compile(&selection, "科技", PageRequest::default());

        let scope = &request.field_filters[0];
        assert_eq!(scope.field_filter.len(), fields::DEFAULT_SCOPES.len());
    }

    #[test]
    fn test_explicit_scopes_compile_to_one_filter() {
        let mut selection = FilterSelection::new();
        selection.toggle_scope("企业名称");
        selection.toggle_scope("地址");
        let request = compile(&selection, "科技", PageRequest::default());

        let scope = &request.field_filters[0];
        assert_eq!(scope.field_filter.len(), 2);
        assert!(scope.field_filter.contains_key("company_name"));
        assert!(scope.field_filter.contains_key("address"));
    }

    #[test]
    fn test_group_ordering_is_stable() {
        let mut selection = FilterSelection::new();
        selection.select_province("广东省");
        selection.toggle_city("深圳市");
        selection.toggle_industry("制造业");
        selection.toggle_year_range("1年内");
        selection.toggle_contact_channel("电话");

        let request = compile(&selection, "科技", PageRequest::default());
        let fields: Vec<&str> = request
            .field_filters
            .iter()
            .skip(1) // scope filter first
            .map(|f| f.field())
            .collect();
        assert_eq!(
            fields,
            ["province", "city", "industry", "establishment_date", "exists"]
        );
    }

    #[test]
    fn test_city_omitted_without_selection() {
        let mut selection = FilterSelection::new();
        selection.select_province("广东省");
        let request = compile(&selection, "科技", PageRequest::default());

        assert!(request.field_filters.iter().all(|f| f.field() != "city"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        // scopes empty, province set, no cities, one industry, one year range
        let mut selection = FilterSelection::new();
        selection.select_province("广东省");
        selection.toggle_industry("制造业");
        selection.toggle_year_range("1年内");

        let request = compile(&selection, "科技", PageRequest::default());

        assert_eq!(request.keyword, "科技");
        // default-scope filter + province + industry + date range
        assert_eq!(request.field_filters.len(), 4);
        assert!(request.field_filters.iter().all(|f| f.weight == 1));
        assert_eq!(request.page_index, 0);
        assert_eq!(request.page_size, search::PAGE_SIZE);
    }

    #[test]
    fn test_unmapped_year_ranges_dropped() {
        let mut selection = FilterSelection::new();
        selection.toggle_year_range("二十年以上");
        let request = compile(&selection, "科技", PageRequest::default());

        assert!(request
            .field_filters
            .iter()
            .all(|f| f.field() != "establishment_date"));
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let mut a = FilterSelection::new();
        a.toggle_industry("制造业");
        a.toggle_industry("批发和零售业");
        let mut b = FilterSelection::new();
        b.toggle_industry("批发和零售业");
        b.toggle_industry("制造业");

        let req_a = compile(&a, "科技", PageRequest::default());
        let req_b = compile(&b, "科技", PageRequest::default());
        assert_eq!(
            serde_json::to_string(&req_a).unwrap(),
            serde_json::to_string(&req_b).unwrap()
        );
    }

    #[test]
    fn test_keyword_truncated_to_limit() {
        let long: String = "科".repeat(300);
        let request = compile(&FilterSelection::new(), &long, PageRequest::default());
        assert_eq!(request.keyword.chars().count(), search::MAX_KEYWORD_LEN);
    }
}
