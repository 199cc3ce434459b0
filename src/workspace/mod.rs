//! Estimation workspace
//!
//! Owns the session state and coordinates the four request channels against
//! the pricing service: submit, list history, fetch analytics and fetch
//! detail. State lives behind one lock that is only held for a single
//! [`reduce`] step, never across an await, so channels may run concurrently.

pub mod form;
pub mod geometry;
pub mod state;
pub mod view;

pub use form::FormUpdate;
pub use geometry::GeometryPreview;
pub use state::{
    reduce, Action, Channel, InFlight, Selection, SelectionStatus, Ticket, WorkspaceState,
};
pub use view::{breakdown, format_currency, BidView, BreakdownEntry};

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::domain::{CreateJobRequest, JobSpecification, TradePreset};
use crate::services::PricingBackend;

/// Number of recent bids requested for the history list.
pub const HISTORY_LIMIT: u32 = 10;

/// Session workspace shared by the view and its request tasks.
#[derive(Clone)]
pub struct Workspace {
    backend: Arc<dyn PricingBackend>,
    inner: Arc<RwLock<WorkspaceState>>,
    sequence: Arc<AtomicU64>,
    revision: Arc<watch::Sender<u64>>,
}

impl Workspace {
    pub fn new(backend: Arc<dyn PricingBackend>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend,
            inner: Arc::new(RwLock::new(WorkspaceState::default())),
            sequence: Arc::new(AtomicU64::new(0)),
            revision: Arc::new(revision),
        }
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Copy of the current state.
    pub fn snapshot(&self) -> WorkspaceState {
        self.inner.read().clone()
    }

    /// Read from the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&WorkspaceState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Revision counter bumped after every applied action.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn dispatch(&self, action: Action) {
        self.dispatch_and(action, |_| ());
    }

    /// Apply `action` and inspect the resulting state under the same lock.
    fn dispatch_and<R>(&self, action: Action, f: impl FnOnce(&WorkspaceState) -> R) -> R {
        let result = {
            let mut state = self.inner.write();
            let current = std::mem::take(&mut *state);
            *state = reduce(current, action);
            f(&state)
        };
        self.revision.send_modify(|rev| *rev += 1);
        result
    }

    fn next_ticket(&self) -> Ticket {
        Ticket(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Dispatches `action` when dropped, including on early return or cancellation.
    fn settle_on_drop(&self, action: Action) -> SettleGuard<'_> {
        SettleGuard {
            workspace: self,
            action: Some(action),
        }
    }

    // =========================================================================
    // Form
    // =========================================================================

    pub fn edit(&self, update: FormUpdate) {
        self.dispatch(Action::FormEdited(update));
    }

    pub fn preview(&self) -> GeometryPreview {
        self.read(|s| geometry::preview_input(&s.form.dimensions))
    }

    pub fn active_preset(&self) -> &'static TradePreset {
        self.read(|s| s.form.trade.preset())
    }

    /// Clear the error and displayed bid and restore the default form.
    pub fn reset(&self) {
        self.dispatch(Action::Reset);
    }

    pub fn dismiss_error(&self) {
        self.dispatch(Action::ErrorDismissed);
    }

    pub fn bid_view(&self) -> Option<BidView> {
        self.read(|s| s.bid.as_ref().map(BidView::from_bid))
    }

    // =========================================================================
    // Channels
    // =========================================================================

    /// Load history and analytics at session start.
    pub async fn initialize(&self) {
        tokio::join!(self.refresh_history(), self.refresh_analytics());
    }

    /// Submit the current form.
    pub async fn submit(&self) {
        let spec = self.read(|s| s.form.clone());
        self.submit_specification(&spec).await;
    }

    /// Price `spec`, then refresh history and analytics in that order.
    #[instrument(skip(self, spec), fields(trade = %spec.trade))]
    pub async fn submit_specification(&self, spec: &JobSpecification) {
        let request = CreateJobRequest::from(spec);
        let ticket = self.next_ticket();

        self.dispatch(Action::SubmitRequested);
        let _settle = self.settle_on_drop(Action::SubmitSettled);
        debug!(ticket = ticket.0, "Submitting job");

        match self.backend.create_job(&request).await {
            Ok(bid) => {
                info!(job_id = %bid.job_id, total_bid = bid.total_bid, "Bid generated");
                self.dispatch(Action::SubmitSucceeded { ticket, bid });
                self.refresh_history().await;
                self.refresh_analytics().await;
            }
            Err(e) => {
                warn!(error = %e, "Job submission failed");
                self.dispatch(Action::SubmitFailed {
                    message: Channel::Submit.failure_message(&e),
                });
            }
        }
    }

    /// Replace the history list with the most recent bids.
    #[instrument(skip(self))]
    pub async fn refresh_history(&self) {
        let ticket = self.next_ticket();

        self.dispatch(Action::HistoryRequested);
        let _settle = self.settle_on_drop(Action::HistorySettled);

        match self.backend.list_jobs(HISTORY_LIMIT).await {
            Ok(entries) => {
                info!(count = entries.len(), "History loaded");
                self.dispatch(Action::HistorySucceeded { ticket, entries });
            }
            Err(e) => {
                warn!(error = %e, "History request failed");
                self.dispatch(Action::HistoryFailed {
                    message: Channel::ListHistory.failure_message(&e),
                });
            }
        }
    }

    /// Replace the analytics summary.
    #[instrument(skip(self))]
    pub async fn refresh_analytics(&self) {
        let ticket = self.next_ticket();

        self.dispatch(Action::AnalyticsRequested);
        let _settle = self.settle_on_drop(Action::AnalyticsSettled);

        match self.backend.analytics_summary().await {
            Ok(summary) => {
                info!(total_jobs = summary.total_jobs, "Analytics loaded");
                self.dispatch(Action::AnalyticsSucceeded { ticket, summary });
            }
            Err(e) => {
                warn!(error = %e, "Analytics request failed");
                self.dispatch(Action::AnalyticsFailed {
                    message: Channel::FetchAnalytics.failure_message(&e),
                });
            }
        }
    }

    /// Select a history entry and load its bid unless it is already displayed.
    #[instrument(skip(self))]
    pub async fn select_history_entry(&self, job_id: &str) {
        if job_id.is_empty() {
            return;
        }

        let ticket = self.next_ticket();
        let already_displayed = self.dispatch_and(
            Action::DetailRequested {
                ticket,
                job_id: job_id.to_string(),
            },
            |s| s.displayed_job_id() == Some(job_id),
        );
        if already_displayed {
            debug!("Bid already displayed, skipping fetch");
            return;
        }

        match self.backend.get_job(job_id).await {
            Ok(bid) => {
                info!(job_id = %bid.job_id, "Bid details loaded");
                self.dispatch(Action::DetailSucceeded { ticket, bid });
            }
            Err(e) => {
                warn!(error = %e, "Bid detail request failed");
                self.dispatch(Action::DetailFailed {
                    job_id: job_id.to_string(),
                    message: Channel::FetchDetail.failure_message(&e),
                });
            }
        }
    }
}

struct SettleGuard<'a> {
    workspace: &'a Workspace,
    action: Option<Action>,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            self.workspace.dispatch(action);
        }
    }
}
