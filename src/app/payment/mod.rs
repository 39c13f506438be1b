//! Checkout: environment detection, presentation, and the session machine
//!
//! A checkout attempt is one [`PaymentSession`]. The host detects the
//! [`Environment`] once per page load, builds a [`BridgeGate`] for in-app
//! flows, and reacts to [`SessionEvent`]s; everything else is internal.

pub mod bridge;
pub mod environment;
pub mod presenter;
pub mod session;

pub use bridge::BridgeGate;
pub use environment::{detect, Environment};
pub use presenter::{resolve_alipay, resolve_wechat, select, PresentationKind};
pub use session::{PaymentConfig, PaymentSession, SessionEvent, SessionState, TimeoutNotice};
