//! Browser environment detection
//!
//! Payment presentation depends on where the page is running. Detection is
//! isolated here as a capability-detection collaborator: the rest of the
//! payment code depends only on the [`Environment`] enum, never on raw
//! user-agent strings.

use serde::{Deserialize, Serialize};

/// Where the checkout UI is being hosted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Inside the provider's in-app browser (payment bridge available)
    InAppBrowser,
    /// A generic mobile browser
    MobileBrowser,
    /// A desktop browser
    DesktopBrowser,
}

const MOBILE_MARKERS: &[&str] = &[
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Classify a user-agent string into an [`Environment`]
///
/// The in-app check runs first: the in-app browser also matches the mobile
/// markers, and the bridge presentation must win there.
pub fn detect(user_agent: &str) -> Environment {
    let ua = user_agent.to_lowercase();

    if ua.contains("micromessenger") {
        return Environment::InAppBrowser;
    }
    if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
        return Environment::MobileBrowser;
    }
    Environment::DesktopBrowser
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_app_browser_detected() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
                  AppleWebKit/605.1.15 MicroMessenger/8.0.42";
        assert_eq!(detect(ua), Environment::InAppBrowser);
    }

    #[test]
    fn test_in_app_wins_over_mobile() {
        // the in-app UA also contains "iphone"
        let ua = "iphone micromessenger";
        assert_eq!(detect(ua), Environment::InAppBrowser);
    }

    #[test]
    fn test_mobile_browser_detected() {
        let ua = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36";
        assert_eq!(detect(ua), Environment::MobileBrowser);
    }

    #[test]
    fn test_desktop_fallback() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
        assert_eq!(detect(ua), Environment::DesktopBrowser);
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        assert_eq!(detect("MICROMESSENGER"), Environment::InAppBrowser);
        assert_eq!(detect("IPHONE"), Environment::MobileBrowser);
    }
}
