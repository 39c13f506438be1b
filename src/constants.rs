//! Application constants for the enterprise-lookup client core
//!
//! This module centralizes all constants used throughout the crate,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Environment variable name for the API base URL
    pub const API_BASE_URL: &str = "ENTLOOKUP_API_BASE_URL";

    /// Environment variable name for the API bearer token
    pub const API_TOKEN: &str = "ENTLOOKUP_API_TOKEN";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "entlookup/0.1.0 (enterprise lookup client)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// API endpoint paths, relative to the configured base URL
pub mod api {
    /// Default API base URL when no configuration is present
    pub const DEFAULT_BASE_URL: &str = "https://api.entlookup.example";

    /// Create a membership purchase intent
    pub const PURCHASES: &str = "/membership/purchases";

    /// Create an order tied to a purchase intent
    pub const ORDERS_CREATE: &str = "/orders/create";

    /// Create WeChat payment parameters
    pub const PAY_WECHAT_CREATE: &str = "/pay/wechat/create";

    /// Create Alipay payment parameters
    pub const PAY_ALIPAY_CREATE: &str = "/pay/alipay/create";

    /// Poll order status; the out_trade_no is appended as a path segment
    pub const ORDERS: &str = "/orders";

    /// Weighted multi-field search
    pub const SEARCH_MULTI: &str = "/search/multi";

    /// Keyword bootstrap search
    pub const SEARCH: &str = "/search";

    /// Submit a bulk export of the current search
    pub const SEARCH_MULTI_EXPORT: &str = "/search/multi/export";

    /// Remaining export allowance for today
    pub const EXPORT_LIMIT_TODAY: &str = "/export/limit/today";

    /// Membership status for the current session
    pub const MEMBERSHIP: &str = "/membership";
}

/// Rate limiting and retry configuration
pub mod limits {
    /// Default client-side rate limit (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 10;

    /// Maximum retry attempts for failed idempotent requests
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 500;
}

/// Search and pagination configuration
pub mod search {
    /// Result page size sent to the search API
    pub const PAGE_SIZE: u32 = 10;

    /// Maximum number of page links in a pagination window
    pub const MAX_PAGES_TO_SHOW: u32 = 10;

    /// Page ceiling for members
    pub const MEMBER_PAGE_LIMIT: u32 = 10;

    /// Page ceiling for guests and signed-in non-members
    pub const NON_MEMBER_PAGE_LIMIT: u32 = 3;

    /// Maximum keyword length accepted from user input
    pub const MAX_KEYWORD_LEN: usize = 100;
}

/// Payment session timing
pub mod payment {
    use super::Duration;

    /// Interval between order-status polls
    pub const POLL_INTERVAL: Duration = Duration::from_secs(3);

    /// Hard ceiling on how long a session keeps polling
    pub const POLL_TIMEOUT: Duration = Duration::from_secs(5 * 60);
}

/// Export quota configuration
pub mod export {
    /// Fixed per-export batch ceiling (rows per export), shown to the user
    pub const BATCH_CEILING: u32 = 10_000;
}

// Re-export commonly used constants for convenience
pub use api::DEFAULT_BASE_URL;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::{DEFAULT_RATE_LIMIT_RPS, MAX_RETRIES, RETRY_BASE_DELAY_MS};
pub use payment::{POLL_INTERVAL, POLL_TIMEOUT};
pub use search::{MAX_PAGES_TO_SHOW, PAGE_SIZE};
