//! Account session state
//!
//! Tracks whether the current user is logged in and holds membership, and
//! derives the access tier the search pager enforces. Membership is
//! resolved once per session and cached; callers refresh explicitly after
//! a successful checkout.

use chrono::{DateTime, Utc};

use crate::app::client::SearchApi;
use crate::app::search::AccessTier;
use crate::errors::ApiResult;

/// Login and membership state for the current user
#[derive(Debug, Clone, Default)]
pub struct UserSession {
    logged_in: bool,
    is_member: bool,
    resolved_at: Option<DateTime<Utc>>,
}

impl UserSession {
    /// An anonymous session (not logged in)
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in session with known membership (for callers that already
    /// resolved it, and for tests)
    pub fn authenticated(is_member: bool) -> Self {
        Self {
            logged_in: true,
            is_member,
            resolved_at: Some(Utc::now()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn is_member(&self) -> bool {
        self.logged_in && self.is_member
    }

    /// When membership was last resolved against the backend
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// The access tier the pager enforces for this session
    pub fn tier(&self) -> AccessTier {
        AccessTier::from_membership(self.logged_in, self.is_member)
    }

    /// Resolve membership against the backend and mark the session logged in
    ///
    /// Called after login and again after a successful membership checkout,
    /// so a fresh purchase raises the tier without a page reload.
    pub async fn resolve(&mut self, api: &dyn SearchApi) -> ApiResult<()> {
        self.is_member = api.membership_status().await?;
        self.logged_in = true;
        self.resolved_at = Some(Utc::now());
        Ok(())
    }

    /// Drop back to an anonymous session (logout)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
