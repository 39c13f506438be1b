//! Payment session controller
//!
//! Owns the lifecycle of one checkout attempt: order creation, channel
//! presentation, status polling, timeout, and terminal-state dispatch.
//!
//! State machine:
//!
//! ```text
//! Initializing -> AwaitingPayment -> { Paid | Failed | Refunded | Cancelled }
//!       |                |                       |
//!       +----------------+-----------------------+--> Closed (dialog dismissed)
//! ```
//!
//! Cancellation is the load-bearing correctness property: closing the
//! session must deterministically stop the polling interval and the timeout
//! timer together, and no event may be emitted afterwards. Every async
//! completion re-checks the cancellation token before touching state, so a
//! late-arriving poll response for a dismissed dialog is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::app::client::PaymentApi;
use crate::app::models::{Channel, ChannelPresentation, PaymentStatus};
use crate::constants::payment;
use crate::errors::{PaymentError, PaymentResult};

use super::bridge::BridgeGate;
use super::environment::Environment;
use super::presenter;

/// What to do when the polling window expires without a terminal status
///
/// The payment may still complete out-of-band, so expiry never forces a
/// `Failed` transition either way; this only controls whether the host is
/// told about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutNotice {
    /// Stop polling and say nothing
    Silent,
    /// Stop polling and emit [`SessionEvent::TimedOut`]
    Surfaced,
}

/// Timing configuration for a payment session
#[derive(Debug, Clone, Copy)]
pub struct PaymentConfig {
    /// Interval between order-status polls
    pub poll_interval: Duration,
    /// Hard ceiling on how long the session keeps polling
    pub poll_timeout: Duration,
    /// Timeout surfacing behavior
    pub timeout_notice: TimeoutNotice,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            poll_interval: payment::POLL_INTERVAL,
            poll_timeout: payment::POLL_TIMEOUT,
            timeout_notice: TimeoutNotice::Surfaced,
        }
    }
}

/// Current phase of a payment session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created; order-creation sequence not yet complete
    Initializing,
    /// Presentation shown; waiting for the user to pay
    AwaitingPayment,
    /// Reached a terminal payment status
    Settled(PaymentStatus),
    /// Host dismissed the dialog before settlement
    Closed,
}

/// Events emitted to the hosting UI
///
/// The host reacts (navigation, rendering, messaging); the controller never
/// performs UI work itself. No event is emitted after `close()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Remote order status changed
    StatusChanged(PaymentStatus),
    /// Payment confirmed; emitted exactly once
    Succeeded,
    /// The hosting dialog should close
    Closed,
    /// Polling window expired without settlement (Surfaced mode only)
    TimedOut,
    /// Invoke the in-app bridge with these parameters (bridge became ready)
    InvokeBridge(crate::app::models::BridgeRequest),
    /// Navigate the page to the gateway URL
    Redirect(String),
    /// Render this QR payload
    ShowQrCode(String),
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    presentation: Option<ChannelPresentation>,
    order_id: Option<String>,
}

/// Shared handles the background tasks need
#[derive(Clone)]
struct SessionCore {
    inner: Arc<Mutex<SessionInner>>,
    cancel: CancellationToken,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionCore {
    /// Emit an event unless the session has been cancelled
    fn emit(&self, event: SessionEvent) {
        if self.cancel.is_cancelled() {
            debug!(?event, "discarding event for cancelled session");
            return;
        }
        let _ = self.events.send(event);
    }

    fn state(&self) -> SessionState {
        self.inner.lock().expect("session state poisoned").state
    }

    fn set_state(&self, state: SessionState) {
        self.inner.lock().expect("session state poisoned").state = state;
    }
}

/// Controller for one checkout attempt
///
/// Construct one per attempt; a closed session is never reopened. Events
/// arrive on the receiver returned by [`PaymentSession::new`].
pub struct PaymentSession {
    plan_id: i64,
    channel: Channel,
    environment: Environment,
    config: PaymentConfig,
    api: Arc<dyn PaymentApi>,
    bridge: BridgeGate,
    core: SessionCore,
    open_started: AtomicBool,
}

impl PaymentSession {
    /// Create a session and the event stream its host listens on
    pub fn new(
        api: Arc<dyn PaymentApi>,
        plan_id: i64,
        channel: Channel,
        environment: Environment,
        config: PaymentConfig,
        bridge: BridgeGate,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            plan_id,
            channel,
            environment,
            config,
            api,
            bridge,
            core: SessionCore {
                inner: Arc::new(Mutex::new(SessionInner {
                    state: SessionState::Initializing,
                    presentation: None,
                    order_id: None,
                })),
                cancel: CancellationToken::new(),
                events,
            },
            open_started: AtomicBool::new(false),
        };
        (session, receiver)
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.core.state()
    }

    /// The presentation resolved for this session, once available
    pub fn presentation(&self) -> Option<ChannelPresentation> {
        self.core
            .inner
            .lock()
            .expect("session state poisoned")
            .presentation
            .clone()
    }

    /// The order id (out_trade_no) once the order has been created
    pub fn order_id(&self) -> Option<String> {
        self.core
            .inner
            .lock()
            .expect("session state poisoned")
            .order_id
            .clone()
    }

    /// Start the checkout sequence
    ///
    /// Performs, in order: create purchase intent, create order, request
    /// channel parameters; then dispatches the presentation and starts
    /// polling where the flow calls for it. Any failure aborts the whole
    /// sequence and settles the session as `Failed`; the sequence is never
    /// retried automatically, to avoid duplicate orders.
    ///
    /// Re-entrant calls while the first is still in flight are no-ops.
    pub async fn open(&self) -> PaymentResult<()> {
        if self.core.cancel.is_cancelled() {
            return Err(PaymentError::SessionClosed);
        }
        if self
            .open_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(plan_id = self.plan_id, "checkout already started; ignoring re-entrant open");
            return Ok(());
        }

        match self.setup().await {
            Ok((order_id, presentation)) => {
                if self.core.cancel.is_cancelled() {
                    debug!(order_id, "session closed during setup; dropping result");
                    return Ok(());
                }
                {
                    let mut inner = self.core.inner.lock().expect("session state poisoned");
                    inner.order_id = Some(order_id.clone());
                    inner.presentation = Some(presentation.clone());
                    inner.state = SessionState::AwaitingPayment;
                }
                self.dispatch(order_id, presentation);
                Ok(())
            }
            Err(err) => {
                if self.core.cancel.is_cancelled() {
                    debug!("session closed during setup; suppressing failure");
                    return Ok(());
                }
                warn!(error = %err, plan_id = self.plan_id, "checkout setup failed");
                self.core.set_state(SessionState::Settled(PaymentStatus::Failed));
                self.core.emit(SessionEvent::StatusChanged(PaymentStatus::Failed));
                Err(err)
            }
        }
    }

    /// Close the session: stop polling and the timeout timer together
    ///
    /// Idempotent; callable from any state. After this returns, no further
    /// events will be emitted, even if a poll response is still in flight.
    pub fn close(&self) {
        if self.core.cancel.is_cancelled() {
            return;
        }
        debug!(plan_id = self.plan_id, "closing payment session");
        {
            let mut inner = self.core.inner.lock().expect("session state poisoned");
            if !matches!(inner.state, SessionState::Settled(_)) {
                inner.state = SessionState::Closed;
            }
        }
        self.core.cancel.cancel();
    }

    /// Run the ordered setup sequence against the payment API
    async fn setup(&self) -> PaymentResult<(String, ChannelPresentation)> {
        let out_trade_no = self
            .api
            .create_purchase(self.plan_id, self.channel)
            .await
            .map_err(|source| PaymentError::SetupFailed {
                step: "create-purchase",
                source,
            })?;

        self.api
            .create_order(self.plan_id, self.channel, &out_trade_no)
            .await
            .map_err(|source| PaymentError::SetupFailed {
                step: "create-order",
                source,
            })?;

        let presentation = match self.channel {
            Channel::Wechat => {
                let params = self
                    .api
                    .create_wechat_payment(&out_trade_no)
                    .await
                    .map_err(|source| PaymentError::SetupFailed {
                        step: "create-payment-params",
                        source,
                    })?;
                presenter::resolve_wechat(self.environment, &params)?
            }
            Channel::Alipay => {
                let params = self
                    .api
                    .create_alipay_payment(&out_trade_no)
                    .await
                    .map_err(|source| PaymentError::SetupFailed {
                        step: "create-payment-params",
                        source,
                    })?;
                presenter::resolve_alipay(&params)?
            }
        };

        Ok((out_trade_no, presentation))
    }

    /// Emit the presentation event and start background work for it
    ///
    /// Redirect presentations skip polling: the page navigates away and the
    /// destination handles completion. Bridge and QR presentations poll.
    fn dispatch(&self, order_id: String, presentation: ChannelPresentation) {
        match presentation {
            ChannelPresentation::RedirectUrl { url } => {
                self.core.emit(SessionEvent::Redirect(url));
            }
            ChannelPresentation::QrCode { payload } => {
                self.core.emit(SessionEvent::ShowQrCode(payload));
                self.spawn_poll_task(order_id);
            }
            ChannelPresentation::InAppBridge(request) => {
                self.spawn_bridge_task(request);
                self.spawn_poll_task(order_id);
            }
        }
    }

    /// Wait for the bridge-ready signal, then hand the host the invocation
    fn spawn_bridge_task(&self, request: crate::app::models::BridgeRequest) {
        let core = self.core.clone();
        let gate = self.bridge.clone();
        tokio::spawn(async move {
            if gate.wait_ready(&core.cancel).await {
                core.emit(SessionEvent::InvokeBridge(request));
            } else {
                debug!("session cancelled before bridge became ready");
            }
        });
    }

    /// Poll order status until a terminal state, cancellation, or timeout
    fn spawn_poll_task(&self, order_id: String) {
        let core = self.core.clone();
        let api = Arc::clone(&self.api);
        let config = self.config;
        tokio::spawn(async move {
            let deadline = Instant::now() + config.poll_timeout;
            let mut interval = tokio::time::interval(config.poll_interval);
            // the immediate first tick would poll before the user had a
            // chance to act; consume it so polls start one interval in
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = core.cancel.cancelled() => {
                        debug!(order_id, "payment polling cancelled");
                        break;
                    }
                    _ = tokio::time::sleep_until(deadline) => {
                        debug!(order_id, "payment polling timed out");
                        if config.timeout_notice == TimeoutNotice::Surfaced {
                            core.emit(SessionEvent::TimedOut);
                        }
                        break;
                    }
                    _ = interval.tick() => {
                        let result = api.order_status(&order_id).await;
                        // a response that raced a close() must be discarded
                        if core.cancel.is_cancelled() {
                            debug!(order_id, "dropping poll response for cancelled session");
                            break;
                        }
                        match result {
                            Err(err) => {
                                // never crash the loop, never settle on an
                                // error response; try again next tick
                                warn!(order_id, error = %err, "order status poll failed");
                            }
                            Ok(status) => {
                                if Self::apply_status(&core, status) {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });
    }

    /// Apply a polled status; returns true when polling should stop
    fn apply_status(core: &SessionCore, status: PaymentStatus) -> bool {
        if matches!(core.state(), SessionState::Settled(_) | SessionState::Closed) {
            return true;
        }

        core.emit(SessionEvent::StatusChanged(status));
        if !status.is_terminal() {
            return false;
        }

        core.set_state(SessionState::Settled(status));
        match status {
            PaymentStatus::Paid => {
                core.emit(SessionEvent::Succeeded);
                core.emit(SessionEvent::Closed);
            }
            PaymentStatus::Failed | PaymentStatus::Cancelled => {
                core.emit(SessionEvent::Closed);
            }
            // refunded: the user may need to read the notice, so the
            // dialog stays open; only the polling stops
            PaymentStatus::Refunded => {}
            PaymentStatus::Pending | PaymentStatus::Unknown => unreachable!(),
        }
        true
    }
}

impl Drop for PaymentSession {
    /// Unmount semantics: dropping the controller stops all background work
    fn drop(&mut self) {
        self.core.cancel.cancel();
    }
}
