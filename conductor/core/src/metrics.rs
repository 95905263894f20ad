//! Business Metrics
//!
//! Display values shown next to the conversation: churn rate, number of
//! high-risk customers, a freshness label and the insight pipeline status.
//!
//! Values come from a [`MetricsSource`]. The Conductor reads the source once
//! when a surface connects; refreshing is the source's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of the pipeline that refreshes the insights
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Pipeline name, e.g. `refresh_insights_dag`
    pub name: String,
    /// Free-form status, e.g. `RUNNING`
    pub status: String,
}

/// One reading of the metrics panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Current churn rate, already formatted (e.g. `15.2%`)
    pub churn_rate: String,
    /// Number of high-risk customers, already formatted
    pub high_risk_count: String,
    /// How fresh the numbers are (e.g. `Just now`)
    pub last_update: String,
    /// Pipeline feeding the numbers, if known
    pub pipeline: Option<PipelineStatus>,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            churn_rate: "15.2%".to_string(),
            high_risk_count: "152".to_string(),
            last_update: "Just now".to_string(),
            pipeline: Some(PipelineStatus {
                name: "refresh_insights_dag".to_string(),
                status: "RUNNING".to_string(),
            }),
        }
    }
}

/// Anything that can produce a metrics snapshot
pub trait MetricsSource: Send + Sync {
    /// Current snapshot
    fn snapshot(&self) -> MetricsSnapshot;
}

/// Fixed metrics, optionally with a timestamp for the freshness label
#[derive(Clone, Debug, Default)]
pub struct StaticMetrics {
    snapshot: MetricsSnapshot,
    refreshed_at: Option<DateTime<Utc>>,
}

impl StaticMetrics {
    /// Serve the given snapshot verbatim
    pub fn new(snapshot: MetricsSnapshot) -> Self {
        Self {
            snapshot,
            refreshed_at: None,
        }
    }

    /// Derive `last_update` from this timestamp on every read
    #[must_use]
    pub fn refreshed_at(mut self, at: DateTime<Utc>) -> Self {
        self.refreshed_at = Some(at);
        self
    }
}

impl MetricsSource for StaticMetrics {
    fn snapshot(&self) -> MetricsSnapshot {
        let mut snapshot = self.snapshot.clone();
        if let Some(at) = self.refreshed_at {
            snapshot.last_update = freshness_label(at, Utc::now());
        }
        snapshot
    }
}

/// Human label for how long ago `at` was, relative to `now`
#[must_use]
pub fn freshness_label(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{minutes} min ago")
    } else {
        format!("{} h ago", elapsed.num_hours())
    }
}
