//! Dashboard screen session

use cafetal_client::{
    ApiClient, Completion, DashboardMeta, OverviewQuery, Resource, ResourceSnapshot,
};
use cafetal_metrics::{DashboardView, OverviewPayload, Period, Reconciler};
use chrono::{DateTime, Utc};
use std::future::Future;

/// An overview payload with the filters it was fetched for
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedOverview {
    /// Filters of the request
    pub query: OverviewQuery,
    /// Response body
    pub payload: OverviewPayload,
}

/// Filters, overview fetch and reconciliation for the dashboard
///
/// Changing a filter does not fetch by itself; call [`refresh`] afterwards.
/// Each refresh supersedes the previous one, so a slow response for an old
/// filter never overwrites a newer one.
///
/// [`refresh`]: DashboardSession::refresh
#[derive(Debug)]
pub struct DashboardSession {
    api: ApiClient,
    query: OverviewQuery,
    overview: Resource<LoadedOverview>,
    meta: Resource<DashboardMeta>,
    clock: Option<DateTime<Utc>>,
}

impl DashboardSession {
    /// New session with default filters
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            query: OverviewQuery::default(),
            overview: Resource::new("dashboard.overview"),
            meta: Resource::new("dashboard.meta"),
            clock: None,
        }
    }

    /// Reconcile with a fixed clock instead of the current time
    #[must_use]
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.clock = Some(now);
        self
    }

    /// Current filters
    #[must_use]
    pub fn query(&self) -> &OverviewQuery {
        &self.query
    }

    /// Set the period; returns whether it changed
    pub fn set_period(&mut self, period: Period) -> bool {
        let changed = self.query.period != period;
        self.query.period = period;
        changed
    }

    /// Set the warehouse filter; returns whether it changed
    pub fn set_warehouse(&mut self, warehouse: impl Into<String>) -> bool {
        let warehouse = warehouse.into();
        let changed = self.query.warehouse != warehouse;
        self.query.warehouse = warehouse;
        changed
    }

    /// Set the category filter; returns whether it changed
    pub fn set_category(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        let changed = self.query.category != category;
        self.query.category = category;
        changed
    }

    /// Issue an overview request for the current filters
    ///
    /// The request is registered immediately; the returned future performs
    /// it and does not borrow the session, so filters can change meanwhile.
    pub fn refresh(&self) -> impl Future<Output = Completion> + Send + 'static {
        let ticket = self.overview.begin();
        let api = self.api.clone();
        let query = self.query.clone();
        let resource = self.overview.clone();
        tracing::info!(
            "Dashboard refresh: period={} warehouse={} category={}",
            query.period,
            query.warehouse,
            query.category
        );
        async move {
            let Some(ticket) = ticket else {
                return Completion::Closed;
            };
            let result = api.dashboard_overview(&query).await;
            resource.complete(
                ticket,
                result.map(|payload| LoadedOverview { query, payload }),
            )
        }
    }

    /// Load the warehouse and category catalogs
    pub async fn load_meta(&self) -> Completion {
        self.meta.run(self.api.dashboard_meta()).await
    }

    /// Overview and catalogs together
    pub async fn refresh_all(&self) -> (Completion, Completion) {
        futures::join!(self.refresh(), self.load_meta())
    }

    /// Overview fetch state
    #[must_use]
    pub fn overview_state(&self) -> ResourceSnapshot<LoadedOverview> {
        self.overview.snapshot()
    }

    /// Filter catalogs, once loaded
    #[must_use]
    pub fn meta(&self) -> Option<DashboardMeta> {
        self.meta.data()
    }

    /// Reconciled view of the latest successful overview
    ///
    /// Uses the period the payload was fetched for, which lags the current
    /// filters while a refresh is in flight.
    #[must_use]
    pub fn view(&self) -> Option<DashboardView> {
        let reconciler = self.clock.map_or_else(Reconciler::new, Reconciler::at);
        self.overview.with_data(|loaded| {
            loaded.map(|l| reconciler.reconcile(&l.payload, l.query.period))
        })
    }

    /// Tear down; in-flight responses are dropped
    pub fn close(&self) {
        self.overview.close();
        self.meta.close();
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        self.close();
    }
}
