//! Channel presentation selection
//!
//! Pure dispatch from (channel, environment) to the presentation mechanism,
//! plus validation of the gateway parameters each presentation requires.
//! All parameter failures here surface as `Failed` terminal payment states
//! in the session controller; nothing is retried.

use crate::app::models::{
    AlipayPayParams, BridgeRequest, Channel, ChannelPresentation, WechatPayParams,
};
use crate::errors::{PaymentError, PaymentResult};

use super::environment::Environment;

/// Which UI mechanism a checkout should use, before parameters exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationKind {
    /// Invoke the in-app payment bridge
    Bridge,
    /// Navigate the current page to the gateway
    Redirect,
    /// Render a scannable QR code
    QrCode,
}

/// Select the presentation for a channel in a given environment
///
/// Pure and total: channel values are already validated at parse time
/// (`Channel::from_str`), so every combination has a defined presentation.
/// Alipay prefers a QR code everywhere; the session controller falls back
/// to a redirect if the gateway returned only `pay_url`.
pub fn select(channel: Channel, environment: Environment) -> PresentationKind {
    match (channel, environment) {
        (Channel::Wechat, Environment::InAppBrowser) => PresentationKind::Bridge,
        (Channel::Wechat, Environment::MobileBrowser) => PresentationKind::Redirect,
        (Channel::Wechat, Environment::DesktopBrowser) => PresentationKind::QrCode,
        (Channel::Alipay, _) => PresentationKind::QrCode,
    }
}

/// Validate WeChat gateway parameters into a concrete presentation
pub fn resolve_wechat(
    environment: Environment,
    params: &WechatPayParams,
) -> PaymentResult<ChannelPresentation> {
    match select(Channel::Wechat, environment) {
        PresentationKind::Bridge => bridge_request(params).map(ChannelPresentation::InAppBridge),
        PresentationKind::Redirect => params
            .mweb_url
            .clone()
            .map(|url| ChannelPresentation::RedirectUrl { url })
            .ok_or(PaymentError::MissingRedirectUrl),
        PresentationKind::QrCode => params
            .code_url
            .clone()
            .map(|payload| ChannelPresentation::QrCode { payload })
            .ok_or(PaymentError::MissingQrCode),
    }
}

/// Validate Alipay gateway parameters into a concrete presentation
///
/// QR payload is preferred; a redirect URL is the fallback. Both missing is
/// a parameter failure.
pub fn resolve_alipay(params: &AlipayPayParams) -> PaymentResult<ChannelPresentation> {
    if let Some(payload) = params.qr_code.clone() {
        return Ok(ChannelPresentation::QrCode { payload });
    }
    if let Some(url) = params.pay_url.clone() {
        return Ok(ChannelPresentation::RedirectUrl { url });
    }
    Err(PaymentError::MissingAlipayTarget)
}

/// Require all six signed bridge parameters
fn bridge_request(params: &WechatPayParams) -> PaymentResult<BridgeRequest> {
    fn require(
        value: &Option<String>,
        name: &'static str,
    ) -> PaymentResult<String> {
        value
            .clone()
            .ok_or(PaymentError::IncompleteParameters { missing: name })
    }

    Ok(BridgeRequest {
        app_id: require(&params.app_id, "appId")?,
        time_stamp: require(&params.time_stamp, "timeStamp")?,
        nonce_str: require(&params.nonce_str, "nonceStr")?,
        package: require(&params.package, "package")?,
        sign_type: require(&params.sign_type, "signType")?,
        pay_sign: require(&params.pay_sign, "paySign")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_wechat_params() -> WechatPayParams {
        WechatPayParams {
            app_id: Some("wx1".into()),
            time_stamp: Some("1670000000".into()),
            nonce_str: Some("nonce".into()),
            package: Some("prepay_id=1".into()),
            sign_type: Some("RSA".into()),
            pay_sign: Some("signature".into()),
            code_url: Some("weixin://wxpay/bizpayurl?pr=x".into()),
            mweb_url: Some("https://wx.example/h5".into()),
        }
    }

    #[test]
    fn test_selection_matrix() {
        assert_eq!(
            select(Channel::Wechat, Environment::InAppBrowser),
            PresentationKind::Bridge
        );
        assert_eq!(
            select(Channel::Wechat, Environment::MobileBrowser),
            PresentationKind::Redirect
        );
        assert_eq!(
            select(Channel::Wechat, Environment::DesktopBrowser),
            PresentationKind::QrCode
        );
        assert_eq!(
            select(Channel::Alipay, Environment::DesktopBrowser),
            PresentationKind::QrCode
        );
    }

    #[test]
    fn test_bridge_requires_all_six_params() {
        let presentation =
            resolve_wechat(Environment::InAppBrowser, &full_wechat_params()).unwrap();
        assert!(matches!(presentation, ChannelPresentation::InAppBridge(_)));

        let mut incomplete = full_wechat_params();
        incomplete.pay_sign = None;
        let err = resolve_wechat(Environment::InAppBrowser, &incomplete).unwrap_err();
        assert!(matches!(
            err,
            PaymentError::IncompleteParameters { missing: "paySign" }
        ));
    }

    #[test]
    fn test_mobile_requires_redirect_url() {
        let presentation =
            resolve_wechat(Environment::MobileBrowser, &full_wechat_params()).unwrap();
        assert_eq!(
            presentation,
            ChannelPresentation::RedirectUrl {
                url: "https://wx.example/h5".into()
            }
        );

        let mut missing = full_wechat_params();
        missing.mweb_url = None;
        assert!(matches!(
            resolve_wechat(Environment::MobileBrowser, &missing),
            Err(PaymentError::MissingRedirectUrl)
        ));
    }

    #[test]
    fn test_desktop_requires_qr_payload() {
        let mut missing = full_wechat_params();
        missing.code_url = None;
        assert!(matches!(
            resolve_wechat(Environment::DesktopBrowser, &missing),
            Err(PaymentError::MissingQrCode)
        ));
    }

    #[test]
    fn test_alipay_prefers_qr_over_redirect() {
        let params = AlipayPayParams {
            qr_code: Some("https://qr.alipay.example/x".into()),
            pay_url: Some("https://alipay.example/pay".into()),
        };
        assert!(matches!(
            resolve_alipay(&params).unwrap(),
            ChannelPresentation::QrCode { .. }
        ));

        let redirect_only = AlipayPayParams {
            qr_code: None,
            pay_url: Some("https://alipay.example/pay".into()),
        };
        assert!(matches!(
            resolve_alipay(&redirect_only).unwrap(),
            ChannelPresentation::RedirectUrl { .. }
        ));
    }

    #[test]
    fn test_alipay_missing_both_fails() {
        let empty = AlipayPayParams::default();
        assert!(matches!(
            resolve_alipay(&empty),
            Err(PaymentError::MissingAlipayTarget)
        ));
    }
}
