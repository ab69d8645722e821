//! View-state container for the dashboard.
//!
//! Holds the symbol input, fetched statements, loading/error flags, display
//! options and the current chart instance. Fetch results are applied in
//! arrival order: when two submissions overlap, whichever outcome arrives
//! last overwrites the state.

use tracing::{debug, error, info};

use crate::api::{self, StatementPair, StatementSource};
use crate::chart::ChartModel;
use crate::error::FundviewError;
use crate::options::DisplayOptions;
use crate::reconcile::{reconcile, Reconciled};
use crate::statement::{combined_metric_keys, Statement};

/// Result of one submission, tagged with the request that produced it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub request_id: u64,
    pub symbol: String,
    pub result: Result<StatementPair, FundviewError>,
}

/// A submission that has been accepted and still needs its fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub symbol: String,
}

#[derive(Debug, Default)]
pub struct ViewState {
    /// Text currently in the symbol input.
    pub symbol_input: String,
    /// Symbol whose statements are loaded.
    pub active_symbol: Option<String>,
    pub income: Option<Statement>,
    pub balance: Option<Statement>,
    pub loading: bool,
    pub error: Option<String>,
    pub options: DisplayOptions,
    chart: Option<ChartModel>,
    next_request_id: u64,
    last_applied_id: Option<u64>,
}

impl ViewState {
    pub fn new(symbol: &str, options: DisplayOptions) -> Self {
        Self {
            symbol_input: symbol.to_string(),
            options,
            ..Self::default()
        }
    }

    pub fn chart(&self) -> Option<&ChartModel> {
        self.chart.as_ref()
    }

    /// Editing the input clears any error.
    pub fn set_symbol_input(&mut self, text: &str) {
        self.symbol_input = text.to_string();
        self.error = None;
    }

    /// Start a submission for the current input.
    ///
    /// Returns the request to run, or `None` when the input was rejected
    /// (the fixed error message is set in that case).
    pub fn begin_submit(&mut self) -> Option<PendingRequest> {
        match api::normalize_symbol(&self.symbol_input) {
            Ok(symbol) => {
                self.next_request_id += 1;
                self.loading = true;
                info!("Submitting request #{} for {}", self.next_request_id, symbol);
                Some(PendingRequest {
                    request_id: self.next_request_id,
                    symbol,
                })
            }
            Err(e) => {
                self.fail(&e);
                None
            }
        }
    }

    /// Apply a finished fetch. Success replaces both statements and rebuilds
    /// the chart; failure keeps the statements but tears the chart down.
    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if self
            .last_applied_id
            .is_some_and(|last| last > outcome.request_id)
        {
            debug!(
                "Request #{} ({}) arrived after a newer one; overwriting anyway",
                outcome.request_id, outcome.symbol
            );
        }
        self.last_applied_id = Some(outcome.request_id);

        match outcome.result {
            Ok(pair) => {
                self.loading = false;
                self.error = None;
                self.chart = None;
                self.active_symbol = Some(pair.symbol);
                self.income = Some(pair.income);
                self.balance = Some(pair.balance);
                self.render_chart();
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Run a full submission against `source` and apply its outcome.
    pub async fn submit<S: StatementSource>(&mut self, source: &S) {
        let Some(request) = self.begin_submit() else {
            return;
        };
        let outcome = run_request(source, request).await;
        self.apply_outcome(outcome);
    }

    fn fail(&mut self, e: &FundviewError) {
        error!("Error fetching financial data: {}", e);
        self.loading = false;
        self.error = Some(e.user_message());
        self.chart = None;
    }

    /// Replace the display options and redraw.
    pub fn apply_options(&mut self, options: DisplayOptions) {
        self.options = options;
        self.render_chart();
    }

    /// Reconcile the loaded statements with the current options.
    pub fn reconciled(&self) -> Option<Reconciled> {
        let (income, balance) = (self.income.as_ref()?, self.balance.as_ref()?);
        Some(reconcile(
            income,
            balance,
            self.options.cadence,
            &self.options.selected_metrics(),
            self.options.gaps,
        ))
    }

    /// Drop the current chart and build a new one from loaded data.
    pub fn render_chart(&mut self) {
        self.chart = None;
        if let Some(reconciled) = self.reconciled() {
            self.chart = Some(ChartModel::new(
                &reconciled,
                self.options.scale,
                self.options.cadence,
            ));
        }
    }

    /// Metric keys offered for each statement: (income, balance).
    pub fn metric_keys(&self) -> (Vec<String>, Vec<String>) {
        let income = self.income.as_ref().map(Statement::metric_keys).unwrap_or_default();
        let balance = self.balance.as_ref().map(Statement::metric_keys).unwrap_or_default();
        (income, balance)
    }

    pub fn all_metric_keys(&self) -> Vec<String> {
        combined_metric_keys(self.income.iter().chain(self.balance.iter()))
    }

    /// Heading shown above the form.
    pub fn title(&self) -> String {
        format!(
            "Financial Data for {}",
            self.symbol_input.trim().to_uppercase()
        )
    }
}

/// Fetch both statements for an accepted request.
pub async fn run_request<S: StatementSource>(source: &S, request: PendingRequest) -> FetchOutcome {
    let result = api::fetch_statements(source, &request.symbol).await;
    FetchOutcome {
        request_id: request.request_id,
        symbol: request.symbol,
        result,
    }
}
