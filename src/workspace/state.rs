//! Workspace state and its reducer
//!
//! All mutation goes through [`reduce`], one [`Action`] at a time. Results
//! carry the [`Ticket`] their request was issued with; a result older than the
//! newest one already applied to the same slice is dropped.

use serde::Serialize;

use super::form::FormUpdate;
use crate::domain::{AnalyticsSummary, Bid, HistoryEntry, JobSpecification};
use crate::error::ApiError;

/// Issue-order position of a request. Larger is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Ticket(pub u64);

/// Independently tracked request lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Submit,
    ListHistory,
    FetchAnalytics,
    FetchDetail,
}

impl Channel {
    pub fn fallback_message(self) -> &'static str {
        match self {
            Channel::Submit => "Failed to generate bid. Please try again.",
            Channel::ListHistory => "Unable to load previous bids.",
            Channel::FetchAnalytics => "Unable to load analytics.",
            Channel::FetchDetail => "Unable to load bid details.",
        }
    }

    /// User-visible text for a failed request on this channel.
    ///
    /// Only job creation surfaces the service's own detail text.
    pub fn failure_message(self, err: &ApiError) -> String {
        match (self, err.detail()) {
            (Channel::Submit, Some(detail)) => detail.to_string(),
            _ => self.fallback_message().to_string(),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Submit => write!(f, "submit"),
            Channel::ListHistory => write!(f, "list_history"),
            Channel::FetchAnalytics => write!(f, "fetch_analytics"),
            Channel::FetchDetail => write!(f, "fetch_detail"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    /// Highlighted, content not (yet) loaded for it.
    Pending,
    /// The displayed bid is this job.
    Confirmed,
    /// Loading this job's detail failed.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub job_id: String,
    pub status: SelectionStatus,
}

impl Selection {
    fn new(job_id: impl Into<String>, status: SelectionStatus) -> Self {
        Self {
            job_id: job_id.into(),
            status,
        }
    }
}

/// Requests in flight per busy-flagged channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InFlight {
    pub submit: u32,
    pub history: u32,
    pub analytics: u32,
}

/// Newest ticket applied to each shared slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
struct Applied {
    bid: Ticket,
    history: Ticket,
    analytics: Ticket,
}

/// Session state of the estimation workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceState {
    pub form: JobSpecification,
    pub bid: Option<Bid>,
    pub history: Vec<HistoryEntry>,
    pub analytics: Option<AnalyticsSummary>,
    pub selection: Option<Selection>,
    pub in_flight: InFlight,
    pub error: Option<String>,
    applied: Applied,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            form: JobSpecification::default(),
            bid: None,
            history: Vec::new(),
            analytics: None,
            selection: None,
            in_flight: InFlight::default(),
            error: None,
            applied: Applied::default(),
        }
    }
}

impl WorkspaceState {
    pub fn is_submitting(&self) -> bool {
        self.in_flight.submit > 0
    }

    pub fn is_loading_history(&self) -> bool {
        self.in_flight.history > 0
    }

    pub fn is_loading_analytics(&self) -> bool {
        self.in_flight.analytics > 0
    }

    pub fn selected_job_id(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.job_id.as_str())
    }

    pub fn displayed_job_id(&self) -> Option<&str> {
        self.bid.as_ref().map(|b| b.job_id.as_str())
    }

    fn status_for(&self, job_id: &str) -> SelectionStatus {
        if self.displayed_job_id() == Some(job_id) {
            SelectionStatus::Confirmed
        } else {
            SelectionStatus::Pending
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FormEdited(FormUpdate),

    SubmitRequested,
    SubmitSucceeded { ticket: Ticket, bid: Bid },
    SubmitFailed { message: String },
    SubmitSettled,

    HistoryRequested,
    HistorySucceeded { ticket: Ticket, entries: Vec<HistoryEntry> },
    HistoryFailed { message: String },
    HistorySettled,

    AnalyticsRequested,
    AnalyticsSucceeded { ticket: Ticket, summary: AnalyticsSummary },
    AnalyticsFailed { message: String },
    AnalyticsSettled,

    DetailRequested { ticket: Ticket, job_id: String },
    DetailSucceeded { ticket: Ticket, bid: Bid },
    DetailFailed { job_id: String, message: String },

    ErrorDismissed,
    Reset,
}

/// Produce the next state snapshot.
pub fn reduce(mut state: WorkspaceState, action: Action) -> WorkspaceState {
    match action {
        Action::FormEdited(update) => {
            state.form = state.form.apply(update);
        }

        Action::SubmitRequested => {
            state.error = None;
            state.in_flight.submit += 1;
        }
        Action::SubmitSucceeded { ticket, bid } => {
            if ticket > state.applied.bid {
                state.applied.bid = ticket;
                state.selection = Some(Selection::new(&bid.job_id, SelectionStatus::Confirmed));
                state.bid = Some(bid);
            }
        }
        Action::SubmitFailed { message }
        | Action::HistoryFailed { message }
        | Action::AnalyticsFailed { message } => {
            state.error = Some(message);
        }
        Action::SubmitSettled => {
            state.in_flight.submit = state.in_flight.submit.saturating_sub(1);
        }

        Action::HistoryRequested => {
            state.in_flight.history += 1;
        }
        Action::HistorySucceeded { ticket, entries } => {
            if ticket > state.applied.history {
                state.applied.history = ticket;
                if state.selection.is_none() {
                    if let Some(first) = entries.first() {
                        let status = state.status_for(&first.job_id);
                        state.selection = Some(Selection::new(&first.job_id, status));
                    }
                }
                state.history = entries;
            }
        }
        Action::HistorySettled => {
            state.in_flight.history = state.in_flight.history.saturating_sub(1);
        }

        Action::AnalyticsRequested => {
            state.in_flight.analytics += 1;
        }
        Action::AnalyticsSucceeded { ticket, summary } => {
            if ticket > state.applied.analytics {
                state.applied.analytics = ticket;
                state.analytics = Some(summary);
            }
        }
        Action::AnalyticsSettled => {
            state.in_flight.analytics = state.in_flight.analytics.saturating_sub(1);
        }

        Action::DetailRequested { ticket, job_id } => {
            if !job_id.is_empty() {
                let status = state.status_for(&job_id);
                // Re-selecting the displayed bid needs no fetch, but it is
                // still the newest request for the bid slice.
                if status == SelectionStatus::Confirmed && ticket > state.applied.bid {
                    state.applied.bid = ticket;
                }
                state.selection = Some(Selection::new(job_id, status));
            }
        }
        Action::DetailSucceeded { ticket, bid } => {
            if ticket > state.applied.bid {
                state.applied.bid = ticket;
                if let Some(selection) = state.selection.as_mut() {
                    if selection.job_id == bid.job_id {
                        selection.status = SelectionStatus::Confirmed;
                    }
                }
                state.bid = Some(bid);
            }
        }
        Action::DetailFailed { job_id, message } => {
            if let Some(selection) = state.selection.as_mut() {
                if selection.job_id == job_id {
                    selection.status = SelectionStatus::Failed;
                }
            }
            state.error = Some(message);
        }

        Action::ErrorDismissed => {
            state.error = None;
        }
        Action::Reset => {
            state.error = None;
            state.bid = None;
            state.form = JobSpecification::default();
            if let Some(selection) = state.selection.as_mut() {
                if selection.status == SelectionStatus::Confirmed {
                    selection.status = SelectionStatus::Pending;
                }
            }
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{bid, history_entry};
    use crate::domain::Trade;

    fn with_bid(job_id: &str) -> WorkspaceState {
        reduce(
            WorkspaceState::default(),
            Action::SubmitSucceeded {
                ticket: Ticket(1),
                bid: bid(job_id),
            },
        )
    }

    #[test]
    fn initial_state_is_idle() {
        let state = WorkspaceState::default();
        assert!(!state.is_submitting());
        assert!(!state.is_loading_history());
        assert!(!state.is_loading_analytics());
        assert_eq!(state.bid, None);
        assert_eq!(state.selection, None);
        assert_eq!(state.error, None);
        assert_eq!(state.form.trade, Trade::Concrete);
    }

    #[test]
    fn submit_request_clears_error_and_sets_busy() {
        let mut state = WorkspaceState::default();
        state.error = Some("old".to_string());

        let state = reduce(state, Action::SubmitRequested);
        assert!(state.is_submitting());
        assert_eq!(state.error, None);

        let state = reduce(state, Action::SubmitSettled);
        assert!(!state.is_submitting());
    }

    #[test]
    fn submit_success_selects_new_bid() {
        let state = with_bid("job-1");
        assert_eq!(state.displayed_job_id(), Some("job-1"));
        assert_eq!(
            state.selection,
            Some(Selection::new("job-1", SelectionStatus::Confirmed))
        );
    }

    #[test]
    fn submit_failure_keeps_bid_and_selection() {
        let before = with_bid("job-1");
        let after = reduce(
            before.clone(),
            Action::SubmitFailed {
                message: "invalid location".to_string(),
            },
        );
        assert_eq!(after.error.as_deref(), Some("invalid location"));
        assert_eq!(after.bid, before.bid);
        assert_eq!(after.selection, before.selection);
    }

    #[test]
    fn empty_history_selects_nothing() {
        let state = reduce(
            WorkspaceState::default(),
            Action::HistorySucceeded {
                ticket: Ticket(1),
                entries: vec![],
            },
        );
        assert_eq!(state.selection, None);
        assert!(state.history.is_empty());
    }

    #[test]
    fn history_defaults_focus_to_first_entry_only_when_unselected() {
        let state = reduce(
            WorkspaceState::default(),
            Action::HistorySucceeded {
                ticket: Ticket(1),
                entries: vec![history_entry("job-a"), history_entry("job-b")],
            },
        );
        assert_eq!(
            state.selection,
            Some(Selection::new("job-a", SelectionStatus::Pending))
        );

        let state = reduce(
            with_bid("job-z"),
            Action::HistorySucceeded {
                ticket: Ticket(2),
                entries: vec![history_entry("job-a")],
            },
        );
        assert_eq!(state.selected_job_id(), Some("job-z"));
    }

    #[test]
    fn history_failure_keeps_prior_list() {
        let state = reduce(
            WorkspaceState::default(),
            Action::HistorySucceeded {
                ticket: Ticket(1),
                entries: vec![history_entry("job-a")],
            },
        );
        let state = reduce(
            state,
            Action::HistoryFailed {
                message: Channel::ListHistory.fallback_message().to_string(),
            },
        );
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Unable to load previous bids."));
    }

    #[test]
    fn stale_results_are_dropped() {
        let state = reduce(
            WorkspaceState::default(),
            Action::SubmitSucceeded {
                ticket: Ticket(5),
                bid: bid("job-new"),
            },
        );
        let state = reduce(
            state,
            Action::SubmitSucceeded {
                ticket: Ticket(3),
                bid: bid("job-old"),
            },
        );
        assert_eq!(state.displayed_job_id(), Some("job-new"));
        assert_eq!(state.selected_job_id(), Some("job-new"));

        let state = reduce(
            state,
            Action::HistorySucceeded {
                ticket: Ticket(9),
                entries: vec![history_entry("a"), history_entry("b")],
            },
        );
        let state = reduce(
            state,
            Action::HistorySucceeded {
                ticket: Ticket(8),
                entries: vec![],
            },
        );
        assert_eq!(state.history.len(), 2);
    }

    #[test]
    fn detail_selection_moves_through_tri_state() {
        let state = reduce(
            with_bid("job-1"),
            Action::DetailRequested {
                ticket: Ticket(2),
                job_id: "job-2".to_string(),
            },
        );
        assert_eq!(
            state.selection,
            Some(Selection::new("job-2", SelectionStatus::Pending))
        );

        let failed = reduce(
            state.clone(),
            Action::DetailFailed {
                job_id: "job-2".to_string(),
                message: "Unable to load bid details.".to_string(),
            },
        );
        assert_eq!(
            failed.selection.as_ref().map(|s| s.status),
            Some(SelectionStatus::Failed)
        );
        assert_eq!(failed.displayed_job_id(), Some("job-1"));

        let loaded = reduce(
            state,
            Action::DetailSucceeded {
                ticket: Ticket(2),
                bid: bid("job-2"),
            },
        );
        assert_eq!(
            loaded.selection,
            Some(Selection::new("job-2", SelectionStatus::Confirmed))
        );
        assert_eq!(loaded.displayed_job_id(), Some("job-2"));
    }

    #[test]
    fn reselecting_displayed_bid_confirms_immediately() {
        let state = reduce(
            with_bid("job-1"),
            Action::DetailRequested {
                ticket: Ticket(2),
                job_id: "job-1".to_string(),
            },
        );
        assert_eq!(
            state.selection.map(|s| s.status),
            Some(SelectionStatus::Confirmed)
        );
    }

    #[test]
    fn reselecting_displayed_bid_outranks_older_detail() {
        let state = reduce(
            with_bid("job-1"),
            Action::DetailRequested {
                ticket: Ticket(2),
                job_id: "job-2".to_string(),
            },
        );
        let state = reduce(
            state,
            Action::DetailRequested {
                ticket: Ticket(3),
                job_id: "job-1".to_string(),
            },
        );
        let state = reduce(
            state,
            Action::DetailSucceeded {
                ticket: Ticket(2),
                bid: bid("job-2"),
            },
        );

        assert_eq!(state.displayed_job_id(), Some("job-1"));
        assert_eq!(
            state.selection,
            Some(Selection::new("job-1", SelectionStatus::Confirmed))
        );
    }

    #[test]
    fn empty_detail_request_is_ignored() {
        let before = with_bid("job-1");
        let after = reduce(
            before.clone(),
            Action::DetailRequested {
                ticket: Ticket(2),
                job_id: String::new(),
            },
        );
        assert_eq!(after, before);
    }

    #[test]
    fn reset_keeps_history_and_analytics() {
        let mut state = with_bid("job-1");
        state.history = vec![history_entry("job-1")];
        state.error = Some("boom".to_string());
        state.form = state.form.apply(FormUpdate::Trade(Trade::Hvac));

        let state = reduce(state, Action::Reset);
        assert_eq!(state.bid, None);
        assert_eq!(state.error, None);
        assert_eq!(state.form, JobSpecification::default());
        assert_eq!(state.history.len(), 1);
        assert_eq!(
            state.selection,
            Some(Selection::new("job-1", SelectionStatus::Pending))
        );
    }

    #[test]
    fn overlapping_requests_keep_busy_until_last_settles() {
        let state = reduce(WorkspaceState::default(), Action::HistoryRequested);
        let state = reduce(state, Action::HistoryRequested);
        let state = reduce(state, Action::HistorySettled);
        assert!(state.is_loading_history());
        let state = reduce(state, Action::HistorySettled);
        assert!(!state.is_loading_history());
        let state = reduce(state, Action::HistorySettled);
        assert_eq!(state.in_flight.history, 0);
    }

    #[test]
    fn failure_messages_follow_channel_policy() {
        let rejected = ApiError::Rejected {
            status: 400,
            detail: Some("invalid location".to_string()),
        };
        assert_eq!(Channel::Submit.failure_message(&rejected), "invalid location");
        assert_eq!(
            Channel::FetchDetail.failure_message(&rejected),
            "Unable to load bid details."
        );
        assert_eq!(
            Channel::Submit.failure_message(&ApiError::Transport("refused".into())),
            "Failed to generate bid. Please try again."
        );
        assert_eq!(
            Channel::FetchAnalytics.failure_message(&ApiError::Malformed("eof".into())),
            "Unable to load analytics."
        );
    }
}
