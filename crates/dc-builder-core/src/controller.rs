//! Modal state and recalculation controller.
//!
//! Owns the active [`BuilderSession`], debounces pricing, reconciles server
//! responses with the view and guards add-to-cart. Every calculate dispatch is
//! stamped with a sequence number; a response that is not the latest
//! dispatched one is dropped. `open` and `close` also advance the sequence so
//! responses from a previous session never land in the next one.
//!
//! No `RefCell` borrow is held across an `.await`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::BuilderConfig;
use crate::control::SubmitState;
use crate::error::{CalculationError, SubmitError};
use crate::ports::{BuilderView, Navigator, Notifier, StorefrontApi};
use crate::pricing::{CartLine, PriceSnapshot};
use crate::schedule::{Debouncer, Scheduler};
use crate::selection::Selection;
use crate::session::BuilderSession;

pub struct Collaborators {
    pub api: Rc<dyn StorefrontApi>,
    pub view: Rc<dyn BuilderView>,
    pub notifier: Rc<dyn Notifier>,
    pub navigator: Rc<dyn Navigator>,
    pub scheduler: Rc<dyn Scheduler>,
}

/// Outcome of a successful add-to-cart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigated {
    pub url: String,
}

#[derive(Clone)]
pub struct BuilderController {
    inner: Rc<Inner>,
}

struct Inner {
    config: BuilderConfig,
    api: Rc<dyn StorefrontApi>,
    view: Rc<dyn BuilderView>,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    debouncer: Debouncer,
    session: RefCell<Option<BuilderSession>>,
    control: Cell<SubmitState>,
    sequence: Cell<u64>,
}

impl BuilderController {
    pub fn new(config: BuilderConfig, deps: Collaborators) -> Self {
        let debouncer = Debouncer::new(deps.scheduler, config.debounce());
        Self {
            inner: Rc::new(Inner {
                config,
                api: deps.api,
                view: deps.view,
                notifier: deps.notifier,
                navigator: deps.navigator,
                debouncer,
                session: RefCell::new(None),
                control: Cell::new(SubmitState::Idle),
                sequence: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.inner.config
    }

    pub fn submit_state(&self) -> SubmitState {
        self.inner.control.get()
    }

    pub fn is_open(&self) -> bool {
        self.inner.session.borrow().is_some()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .map(|s| s.selection().clone())
    }

    pub fn snapshot(&self) -> Option<PriceSnapshot> {
        self.inner
            .session
            .borrow()
            .as_ref()
            .and_then(|s| s.snapshot().cloned())
    }

    // ── Modal lifecycle ──

    /// Start a fresh session for `product_id`, show the modal and schedule
    /// the first price.
    pub async fn open(&self, product_id: u32) {
        let view = &self.inner.view;
        self.inner.debouncer.cancel();
        let session_id = self.advance_sequence();

        let mut session = BuilderSession::new(session_id, product_id);
        view.clear_addon_marks();
        let applied = session
            .selection_mut()
            .apply_defaults_if_unset(&view.size_group(), &view.base_group());
        if let Some(id) = applied.size {
            view.activate_size(id);
        }
        if let Some(id) = applied.base {
            view.activate_base(id);
        }
        info!(
            product_id,
            size_id = session.selection().size_id(),
            base_id = session.selection().base_id(),
            "builder opened"
        );
        *self.inner.session.borrow_mut() = Some(session);
        self.set_control(SubmitState::Idle);
        view.set_total(&self.inner.config.labels.calculating);

        let title = self.lookup_title(product_id).await;
        if !self.is_current_session(session_id) {
            debug!(product_id, "session replaced during title lookup");
            return;
        }
        view.set_title(&title);
        view.show();
        self.schedule_recalculation();
    }

    /// Hide the modal and release the session along with its price.
    pub fn close(&self) {
        self.inner.debouncer.cancel();
        self.advance_sequence();
        if self.inner.session.borrow_mut().take().is_some() {
            debug!("builder closed");
        }
        self.inner.view.hide();
    }

    async fn lookup_title(&self, product_id: u32) -> String {
        let fallback = || self.inner.config.default_title.clone();
        if product_id == 0 {
            return fallback();
        }
        match self.inner.api.product_name(product_id).await {
            Ok(name) if !name.trim().is_empty() => name,
            Ok(_) => fallback(),
            Err(err) => {
                debug!(product_id, %err, "product name lookup failed");
                fallback()
            }
        }
    }

    // ── Selection mutations ──

    pub fn select_size(&self, id: u32) {
        self.inner.view.activate_size(id);
        if self.mutate(|s| s.selection_mut().set_size(id)).is_some() {
            self.schedule_recalculation();
        }
    }

    pub fn select_base(&self, id: u32) {
        self.inner.view.activate_base(id);
        if self.mutate(|s| s.selection_mut().set_base(id)).is_some() {
            self.schedule_recalculation();
        }
    }

    pub fn toggle_addon(&self, id: u32) {
        let Some(Some(selected)) = self.mutate(|s| s.selection_mut().toggle_addon(id)) else {
            return;
        };
        self.inner.view.mark_addon(id, selected);
        self.schedule_recalculation();
    }

    /// Debounced entry point for every selection change.
    pub fn schedule_recalculation(&self) {
        let this = self.clone();
        self.inner.debouncer.trigger(Box::pin(async move {
            this.recalculate().await;
        }));
    }

    // ── Pricing ──

    /// Price the current selection.
    ///
    /// Returns the stored snapshot on success. `None` when pricing failed or
    /// when a newer dispatch superseded this one.
    pub async fn recalculate(&self) -> Option<PriceSnapshot> {
        let seq = self.advance_sequence();
        let prepared = self.inner.session.borrow().as_ref().and_then(|s| {
            let selection = s.selection();
            selection
                .calculate_request()
                .map(|req| (req, selection.revision()))
        });
        let Some((request, revision)) = prepared else {
            self.apply_calculation_failure(seq, CalculationError::MissingProduct);
            return None;
        };

        self.set_pricing_control(SubmitState::Calculating);
        debug!(seq, product_id = request.product_id, "calculate dispatched");
        let outcome = self.inner.api.calculate(&request).await;

        if !self.is_latest(seq) {
            debug!(seq, latest = self.inner.sequence.get(), "discarding superseded calculation");
            return None;
        }

        match outcome {
            Ok(calc) => {
                let snapshot = PriceSnapshot::new(calc, revision);
                let stored = self.mutate(|s| s.store_snapshot(snapshot.clone()));
                if stored.is_none() {
                    return None;
                }
                info!(seq, subtotal = snapshot.subtotal, "calculation applied");
                self.inner
                    .view
                    .set_total(&self.inner.config.format_total(snapshot.subtotal));
                self.set_pricing_control(SubmitState::Ready {
                    subtotal: snapshot.subtotal,
                });
                Some(snapshot)
            }
            Err(err) => {
                self.apply_calculation_failure(seq, err.into());
                None
            }
        }
    }

    fn apply_calculation_failure(&self, seq: u64, reason: CalculationError) {
        warn!(seq, %reason, "calculation failed");
        self.mutate(|s| s.clear_snapshot());
        self.inner.view.set_total(&self.inner.config.labels.total_error);
        self.set_pricing_control(SubmitState::Unavailable);
    }

    // ── Cart submission ──

    /// Add the priced configuration to the cart.
    ///
    /// Size, base and add-ons come from the held snapshot even if the
    /// selection changed after it was produced. Without a snapshot a
    /// calculation runs first, and nothing is sent if it fails.
    pub async fn submit(&self) -> Result<Navigated, SubmitError> {
        if self.submit_state().is_busy() {
            return Err(SubmitError::Busy);
        }

        let snapshot = match self.snapshot() {
            Some(snapshot) => snapshot,
            None => self
                .recalculate()
                .await
                .ok_or(SubmitError::PricingUnavailable)?,
        };

        let (product_id, current) = {
            let session = self.inner.session.borrow();
            let session = session.as_ref().ok_or(SubmitError::PricingUnavailable)?;
            let selection = session.selection();
            (
                selection.product_id().ok_or(SubmitError::PricingUnavailable)?,
                snapshot.is_current_for(selection),
            )
        };
        if !current {
            debug!(product_id, "submitting snapshot older than the live selection");
        }

        let request = CartLine::from_snapshot(product_id, &snapshot).to_request();
        self.set_control(SubmitState::Submitting);

        match self.inner.api.add_to_cart(&request).await {
            Ok(()) => {
                info!(product_id, subtotal = snapshot.subtotal, "added to cart");
                let url = self.inner.config.cart_url.clone();
                self.inner.notifier.notify(&self.inner.config.labels.added);
                self.close();
                self.set_control(SubmitState::NavigatingAway);
                self.inner.navigator.navigate(&url);
                Ok(Navigated { url })
            }
            Err(err) => {
                warn!(product_id, %err, "add to cart failed");
                self.set_control(SubmitState::SubmitFailed);
                Err(SubmitError::Cart(err))
            }
        }
    }

    // ── Internals ──

    fn set_control(&self, state: SubmitState) {
        self.inner.control.set(state);
        self.inner
            .view
            .set_submit(state.is_enabled(), &state.label(&self.inner.config));
    }

    /// Pricing outcomes never replace `Submitting` or `NavigatingAway`;
    /// the snapshot is still updated underneath.
    fn set_pricing_control(&self, state: SubmitState) {
        if !self.submit_state().is_busy() {
            self.set_control(state);
        }
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut BuilderSession) -> R) -> Option<R> {
        self.inner.session.borrow_mut().as_mut().map(f)
    }

    fn advance_sequence(&self) -> u64 {
        let next = self.inner.sequence.get() + 1;
        self.inner.sequence.set(next);
        next
    }

    fn is_latest(&self, seq: u64) -> bool {
        self.inner.sequence.get() == seq
    }

    fn is_current_session(&self, id: u64) -> bool {
        self.inner
            .session
            .borrow()
            .as_ref()
            .is_some_and(|s| s.id() == id)
    }
}
