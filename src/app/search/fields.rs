//! Static field tables for the search filter compiler
//!
//! Scope labels are the user-facing toggles shown in the filter bar; each
//! maps to one backend search field. The tables are the external collaborator
//! the compiler consults; unknown labels are dropped by callers, never
//! errored, since they only arise from stale or unsupported UI state.

/// Default scope set used when the user has not toggled any scope
///
/// An empty scope list would match nothing in the underlying search, so the
/// compiler substitutes this fixed set instead.
pub const DEFAULT_SCOPES: &[&str] = &[
    "企业名称",
    "法定代表人",
    "所属行业",
    "地址",
    "经营范围",
    "公司类型",
];

/// Map a scope label to its backend field name
pub fn scope_field(label: &str) -> Option<&'static str> {
    let field = match label {
        "企业名称" => "company_name",
        "法定代表人" => "legal_representative",
        "注册资本" => "registered_capital",
        "成立日期" => "establishment_date",
        "经营状态" => "operating_status",
        "所属省份" => "province",
        "所属城市" | "所属市区" => "city",
        "所属区县" => "district",
        "企业类型" | "公司类型" => "company_type",
        "统一社会信用代码" => "credit_code",
        "纳税人识别号" => "tax_number",
        "工商注册号" => "registration_number",
        "组织机构代码" => "organization_code",
        "电话" | "联系电话" => "phone",
        "所属行业" => "industry",
        "注册地址" | "地址" => "address",
        "网址" => "website",
        "邮箱" => "email",
        "经营范围" => "business_scope",
        _ => return None,
    };
    Some(field)
}

/// Map a year-range token to its interval expression on `establishment_date`
///
/// Intervals are relative date-math expressions understood by the search
/// backend. Unmapped tokens are dropped by the compiler.
pub fn year_range_expr(token: &str) -> Option<&'static str> {
    let expr = match token {
        "3个月内" => r#"{ "gte": "now-3M/d", "lte": "now/d" }"#,
        "半年内" => r#"{ "gte": "now-6M/d", "lte": "now/d" }"#,
        "1年内" => r#"{ "gte": "now-1y/d", "lte": "now/d" }"#,
        "1-3年" => r#"{ "gte": "now-3y/d", "lte": "now-1y/d" }"#,
        "3-5年" => r#"{ "gte": "now-5y/d", "lte": "now-3y/d" }"#,
        "5-10年" => r#"{ "gte": "now-10y/d", "lte": "now-5y/d" }"#,
        "10年以上" => r#"{ "lte": "now-10y/d" }"#,
        _ => return None,
    };
    Some(expr)
}

/// Map a contact-channel label to its backend field name
pub fn contact_channel_field(label: &str) -> Option<&'static str> {
    let field = match label {
        "电话" => "phone",
        "邮箱" => "email",
        "网址" => "website",
        _ => return None,
    };
    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scopes_all_resolve() {
        for label in DEFAULT_SCOPES {
            assert!(
                scope_field(label).is_some(),
                "default scope {label} must map to a field"
            );
        }
    }

    #[test]
    fn test_scope_aliases() {
        assert_eq!(scope_field("地址"), Some("address"));
        assert_eq!(scope_field("注册地址"), Some("address"));
        assert_eq!(scope_field("公司类型"), Some("company_type"));
        assert_eq!(scope_field("企业类型"), Some("company_type"));
    }

    #[test]
    fn test_unknown_scope_is_none() {
        assert_eq!(scope_field("不存在的范围"), None);
    }

    #[test]
    fn test_year_range_tokens() {
        assert!(year_range_expr("1年内").unwrap().contains("now-1y/d"));
        assert!(year_range_expr("10年以上").unwrap().contains("now-10y/d"));
        assert_eq!(year_range_expr("20年以上"), None);
    }

    #[test]
    fn test_year_range_exprs_are_valid_json() {
        for token in [
            "3个月内",
            "半年内",
            "1年内",
            "1-3年",
            "3-5年",
            "5-10年",
            "10年以上",
        ] {
            let expr = year_range_expr(token).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(expr).unwrap();
            assert!(parsed.is_object());
        }
    }

    #[test]
    fn test_contact_channels() {
        assert_eq!(contact_channel_field("电话"), Some("phone"));
        assert_eq!(contact_channel_field("邮箱"), Some("email"));
        assert_eq!(contact_channel_field("网址"), Some("website"));
        assert_eq!(contact_channel_field("传真"), None);
    }
}
