//! Domain and wire models shared across the client core
//!
//! These types mirror the JSON bodies of the remote lookup/payment API.
//! Request bodies must serialize deterministically (stable field-filter
//! ordering), which is why ordered collections are used where map order
//! would otherwise leak into the bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PaymentError;

/// Status of an order as reported by the payment service
///
/// Terminal statuses are `Paid`, `Failed`, `Refunded` and `Cancelled`.
/// `Refunded` is terminal but does not close the hosting UI automatically:
/// the user may need to read the refund notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting payment
    Pending,
    /// Payment confirmed
    Paid,
    /// Payment failed
    Failed,
    /// Order refunded after payment
    Refunded,
    /// Order cancelled before payment
    Cancelled,
    /// Any status string this client does not know; polling continues
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Check whether no further transition is expected without a new session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Paid
                | PaymentStatus::Failed
                | PaymentStatus::Refunded
                | PaymentStatus::Cancelled
        )
    }

    /// Check whether this status closes the hosting dialog automatically
    pub fn closes_ui(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Paid | PaymentStatus::Failed | PaymentStatus::Cancelled
        )
    }

    /// Human-readable label for order listings
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "待支付",
            PaymentStatus::Paid => "已付款",
            PaymentStatus::Failed => "支付失败",
            PaymentStatus::Refunded => "已退款",
            PaymentStatus::Cancelled => "已取消",
            PaymentStatus::Unknown => "未知状态",
        }
    }
}

/// Payment provider selected for a checkout attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Wechat,
    Alipay,
}

impl Channel {
    /// Wire value used in request bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Wechat => "wechat",
            Channel::Alipay => "alipay",
        }
    }

    /// Display label for receipts and dialogs
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Wechat => "微信支付",
            Channel::Alipay => "支付宝",
        }
    }
}

impl FromStr for Channel {
    type Err = PaymentError;

    /// Parse a channel value from user or route input
    ///
    /// Unknown channels fail here, before any network call is made.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wechat" => Ok(Channel::Wechat),
            "alipay" => Ok(Channel::Alipay),
            other => Err(PaymentError::UnsupportedChannel {
                channel: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw WeChat gateway response, before parameter validation
///
/// All fields are optional on the wire; which ones are required depends on
/// the presentation selected for the current environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WechatPayParams {
    #[serde(rename = "appId", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(rename = "timeStamp", skip_serializing_if = "Option::is_none")]
    pub time_stamp: Option<String>,
    #[serde(rename = "nonceStr", skip_serializing_if = "Option::is_none")]
    pub nonce_str: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(rename = "signType", skip_serializing_if = "Option::is_none")]
    pub sign_type: Option<String>,
    #[serde(rename = "paySign", skip_serializing_if = "Option::is_none")]
    pub pay_sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mweb_url: Option<String>,
}

/// Raw Alipay gateway response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlipayPayParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_url: Option<String>,
}

/// The six signed parameters required for an in-app bridge invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    #[serde(rename = "appId")]
    pub app_id: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
    #[serde(rename = "nonceStr")]
    pub nonce_str: String,
    pub package: String,
    #[serde(rename = "signType")]
    pub sign_type: String,
    #[serde(rename = "paySign")]
    pub pay_sign: String,
}

/// UI mechanism used to complete a payment
///
/// Exactly one variant is populated per session, selected by payment
/// channel and browser environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelPresentation {
    /// Invoke the in-app payment bridge with signed parameters
    InAppBridge(BridgeRequest),
    /// Navigate the current page to the gateway
    RedirectUrl { url: String },
    /// Render a QR code for the user to scan
    QrCode { payload: String },
}

/// Response to creating a purchase intent
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseCreateResponse {
    pub success: bool,
    pub out_trade_no: Option<String>,
}

/// Response carrying only an acknowledgement flag
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    pub success: bool,
}

/// Response to creating WeChat payment parameters
#[derive(Debug, Clone, Deserialize)]
pub struct WechatPayCreateResponse {
    pub success: bool,
    pub result: Option<WechatPayParams>,
}

/// Response to creating Alipay payment parameters
#[derive(Debug, Clone, Deserialize)]
pub struct AlipayPayCreateResponse {
    pub success: bool,
    pub result: Option<AlipayPayParams>,
}

/// Order snapshot returned by the status poll endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSnapshot {
    pub status: PaymentStatus,
}

/// Response to polling an order by id
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusResponse {
    pub success: bool,
    pub order: Option<OrderSnapshot>,
}

/// Response to the daily export allowance check
///
/// Negative means "not entitled" (non-member); zero means "entitled but
/// exhausted for today".
#[derive(Debug, Clone, Deserialize)]
pub struct ExportLimitResponse {
    pub available_limit: i64,
}

/// Response to the membership status lookup
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipResponse {
    pub is_member: bool,
}

/// One compiled constraint: a backend field and its acceptable values
///
/// Wire shape is `{"field_filter": {"<field>": [..values..]}, "weight": n}`.
/// Most filters hold one field; the scope filter holds one entry per
/// searched field. A `BTreeMap` keeps the serialized bytes deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field_filter: BTreeMap<String, Vec<String>>,
    pub weight: u32,
}

impl FieldFilter {
    /// Create a filter for one field with weight 1
    ///
    /// Weight is an extension point for relevance tuning; every filter the
    /// compiler produces today carries weight 1.
    pub fn new(field: impl Into<String>, values: Vec<String>) -> Self {
        let mut field_filter = BTreeMap::new();
        field_filter.insert(field.into(), values);
        Self {
            field_filter,
            weight: 1,
        }
    }

    /// The backend field this filter constrains
    pub fn field(&self) -> &str {
        self.field_filter
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// The acceptable values for the field (empty = match-any within scope)
    pub fn values(&self) -> &[String] {
        self.field_filter
            .values()
            .next()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Weighted multi-field search request
///
/// `page_index` is zero-based on the wire. Construction owns the one-based
/// to zero-based translation; nothing else in the crate performs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keyword: String,
    pub field_filters: Vec<FieldFilter>,
    pub page_index: u32,
    pub page_size: u32,
}

impl SearchRequest {
    /// Build a request from a one-based page number
    pub fn new(
        keyword: impl Into<String>,
        field_filters: Vec<FieldFilter>,
        page: u32,
        page_size: u32,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            field_filters,
            page_index: page.saturating_sub(1),
            page_size,
        }
    }
}

/// Total hit count in a search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

/// Hit container in a search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub total: TotalHits,
    #[serde(default)]
    pub hits: Vec<serde_json::Value>,
}

/// Search response envelope
///
/// Hit sources are kept as raw JSON: rendering them is the embedding UI's
/// concern, not this core's. Aggregations feed the filter option lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub hits: SearchHits,
    #[serde(default)]
    pub aggregations: Option<serde_json::Value>,
}

impl SearchResponse {
    /// Total number of matching records (feeds the pager)
    pub fn total_hits(&self) -> u64 {
        self.hits.total.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
        assert!(PaymentStatus::Refunded.is_terminal());
        assert!(PaymentStatus::Cancelled.is_terminal());
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(!PaymentStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_refunded_does_not_close_ui() {
        assert!(PaymentStatus::Paid.closes_ui());
        assert!(!PaymentStatus::Refunded.closes_ui());
        assert!(!PaymentStatus::Pending.closes_ui());
    }

    #[test]
    fn test_status_deserializes_from_wire_strings() {
        let status: PaymentStatus = serde_json::from_str("\"PAID\"").unwrap();
        assert_eq!(status, PaymentStatus::Paid);

        let status: PaymentStatus = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, PaymentStatus::Unknown);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("wechat".parse::<Channel>().unwrap(), Channel::Wechat);
        assert_eq!("alipay".parse::<Channel>().unwrap(), Channel::Alipay);
        assert!("paypal".parse::<Channel>().is_err());
    }

    #[test]
    fn test_field_filter_wire_shape() {
        let filter = FieldFilter::new("province", vec!["广东省".to_string()]);
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "field_filter": { "province": ["广东省"] },
                "weight": 1
            })
        );
        assert_eq!(filter.field(), "province");
        assert_eq!(filter.values(), ["广东省".to_string()]);
    }

    #[test]
    fn test_search_request_page_translation() {
        let request = SearchRequest::new("科技", vec![], 1, 10);
        assert_eq!(request.page_index, 0);

        let request = SearchRequest::new("科技", vec![], 5, 10);
        assert_eq!(request.page_index, 4);
    }

    #[test]
    fn test_wechat_params_wire_names() {
        let raw = serde_json::json!({
            "appId": "wx1",
            "timeStamp": "167",
            "nonceStr": "abc",
            "package": "prepay_id=1",
            "signType": "RSA",
            "paySign": "sig",
            "code_url": "weixin://wxpay/..."
        });
        let params: WechatPayParams = serde_json::from_value(raw).unwrap();
        assert_eq!(params.app_id.as_deref(), Some("wx1"));
        assert_eq!(params.code_url.as_deref(), Some("weixin://wxpay/..."));
        assert!(params.mweb_url.is_none());
    }
}
