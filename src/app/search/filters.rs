//! User filter selections for faceted search
//!
//! `FilterSelection` holds the independent sets a user can toggle in the
//! filter bar. The one cross-field invariant lives here: cities only make
//! sense under a selected province, and the selection model allows a single
//! province at a time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A structured set of search filter selections
///
/// All sets are ordered (`BTreeSet`) so that compilation produces
/// byte-identical request bodies for identical selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Scope labels toggled as search targets; empty means "use defaults"
    pub scopes: BTreeSet<String>,
    /// Selected province, if any (single-province model)
    pub province: Option<String>,
    /// Selected cities within the province; empty whenever `province` is
    cities: BTreeSet<String>,
    /// Selected industry labels
    pub industries: BTreeSet<String>,
    /// Selected establishment year-range tokens
    pub year_ranges: BTreeSet<String>,
    /// Selected contact-channel labels (电话 / 邮箱 / 网址)
    pub contact_channels: BTreeSet<String>,
}

impl FilterSelection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Cities selected within the current province
    pub fn cities(&self) -> &BTreeSet<String> {
        &self.cities
    }

    /// Toggle a scope label on or off
    pub fn toggle_scope(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.scopes.remove(&label) {
            self.scopes.insert(label);
        }
    }

    /// Select a province, or toggle it off if it is already selected
    ///
    /// Selecting a different province replaces the previous one. Any change
    /// of province, including deselection, resets the city selection.
    pub fn select_province(&mut self, province: impl Into<String>) {
        let province = province.into();
        if self.province.as_deref() == Some(province.as_str()) {
            self.province = None;
        } else {
            self.province = Some(province);
        }
        self.cities.clear();
    }

    /// Clear the province (and therefore the city) selection
    pub fn clear_province(&mut self) {
        self.province = None;
        self.cities.clear();
    }

    /// Toggle a city on or off; ignored when no province is selected
    pub fn toggle_city(&mut self, city: impl Into<String>) {
        if self.province.is_none() {
            return;
        }
        let city = city.into();
        if !self.cities.remove(&city) {
            self.cities.insert(city);
        }
    }

    /// Toggle an industry label on or off
    pub fn toggle_industry(&mut self, industry: impl Into<String>) {
        let industry = industry.into();
        if !self.industries.remove(&industry) {
            self.industries.insert(industry);
        }
    }

    /// Toggle a year-range token on or off
    pub fn toggle_year_range(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !self.year_ranges.remove(&token) {
            self.year_ranges.insert(token);
        }
    }

    /// Toggle a contact-channel label on or off
    pub fn toggle_contact_channel(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.contact_channels.remove(&label) {
            self.contact_channels.insert(label);
        }
    }

    /// Check whether no filters are active at all
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
            && self.province.is_none()
            && self.industries.is_empty()
            && self.year_ranges.is_empty()
            && self.contact_channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_selection_is_empty() {
        let selection = FilterSelection::new();
        assert!(selection.is_empty());
        assert!(selection.cities().is_empty());
    }

    #[test]
    fn test_selecting_province_enables_cities() {
        let mut selection = FilterSelection::new();
        selection.toggle_city("深圳市");
        assert!(selection.cities().is_empty(), "no province, no cities");

        selection.select_province("广东省");
        selection.toggle_city("深圳市");
        selection.toggle_city("广州市");
        assert_eq!(selection.cities().len(), 2);
    }

    #[test]
    fn test_switching_province_clears_cities() {
        let mut selection = FilterSelection::new();
        selection.select_province("广东省");
        selection.toggle_city("深圳市");

        selection.select_province("浙江省");
        assert_eq!(selection.province.as_deref(), Some("浙江省"));
        assert!(selection.cities().is_empty());
    }

    #[test]
    fn test_reselecting_province_toggles_off_and_clears_cities() {
        let mut selection = FilterSelection::new();
        selection.select_province("广东省");
        selection.toggle_city("深圳市");

        selection.select_province("广东省");
        assert!(selection.province.is_none());
        assert!(selection.cities().is_empty());
    }

    #[test]
    fn test_clear_province_clears_cities() {
        let mut selection = FilterSelection::new();
        selection.select_province("广东省");
        selection.toggle_city("深圳市");

        selection.clear_province();
        assert!(selection.province.is_none());
        assert!(selection.cities().is_empty());
    }

    #[test]
    fn test_toggles_are_involutive() {
        let mut selection = FilterSelection::new();
        selection.toggle_scope("企业名称");
        selection.toggle_scope("企业名称");
        assert!(selection.scopes.is_empty());

        selection.toggle_industry("制造业");
        selection.toggle_industry("制造业");
        assert!(selection.industries.is_empty());
    }
}
