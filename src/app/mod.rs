//! Core application logic for the enterprise-lookup client
//!
//! This module contains the main application components: the HTTP client,
//! wire models, the faceted-search pipeline, the checkout state machine,
//! the export quota gate, and account session state.
//!
//! # Examples
//!
//! ```rust,no_run
//! use entlookup::app::search::{compile, FilterSelection, PageRequest};
//! use entlookup::app::{ApiClient, SearchApi};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new()?;
//!
//! let mut selection = FilterSelection::new();
//! selection.select_province("广东省");
//!
//! let request = compile(&selection, "科技", PageRequest::default());
//! let response = client.search_multi(&request).await?;
//! println!("total hits: {}", response.total_hits());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod export;
pub mod models;
pub mod payment;
pub mod search;
pub mod session;

// Re-export main public API
pub use client::{ApiClient, ClientConfig, PaymentApi, SearchApi};
pub use export::ExportDecision;
pub use models::{Channel, ChannelPresentation, FieldFilter, PaymentStatus, SearchRequest};
pub use payment::{BridgeGate, Environment, PaymentConfig, PaymentSession, SessionEvent};
pub use search::{AccessTier, FilterSelection};
pub use session::UserSession;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ClientConfig::default();
        assert!(config.tcp_nodelay);
    }
}
