// Memoized input loading shared by every view handler.
use crate::data::memo::TtlMemo;
use crate::data::table::{normalize_table, DataQuality, NormalizeOptions, TableSource};
use crate::error::EngineError;
use crate::goals::{load_goals, GoalStore, LoadedGoals};
use crate::metrics::project::MetricDeriver;
use crate::metrics::Partition;
use chrono::{DateTime, Utc};
use shared::models::{GoalSet, ProjectRecord};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Normalized table as of its last fetch.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub records: Vec<ProjectRecord>,
    pub quality: DataQuality,
    pub fetched_at: DateTime<Utc>,
}

/// Returns the memoized table, fetching and normalizing it when stale. Fetch
/// failures are not memoized; the next call tries again.
pub async fn load_table(
    source: Arc<dyn TableSource>,
    memo: Arc<RwLock<TtlMemo<TableSnapshot>>>,
    options: NormalizeOptions,
) -> Result<Arc<TableSnapshot>, EngineError> {
    if let Some(snapshot) = memo.read().await.get() {
        return Ok(snapshot);
    }

    let mut guard = memo.write().await;
    // Another caller may have loaded it while we waited for the write lock
    if let Some(snapshot) = guard.get() {
        return Ok(snapshot);
    }

    let description = source.describe();
    let fetched = tokio::task::spawn_blocking(move || {
        source.fetch().map(|raw| {
            let normalized = normalize_table(&raw, &options);
            TableSnapshot {
                records: normalized.records,
                quality: normalized.quality,
                fetched_at: Utc::now(),
            }
        })
    })
    .await
    .map_err(|e| EngineError::ProcessingError(format!("table fetch task failed: {}", e)))?;

    match fetched {
        Ok(snapshot) => {
            info!(source = %description, records = snapshot.records.len(), "Project table refreshed");
            Ok(guard.store(snapshot))
        }
        Err(e) => {
            warn!(source = %description, error = %e, "Project table unavailable");
            Err(EngineError::TableUnavailable(format!("{}: {}", description, e)))
        }
    }
}

/// Returns the memoized goals. Never fails: a broken store yields defaults and
/// the warning travels with them.
pub async fn load_goals_cached(
    store: Arc<dyn GoalStore>,
    memo: Arc<RwLock<TtlMemo<LoadedGoals>>>,
) -> Result<Arc<LoadedGoals>, EngineError> {
    if let Some(goals) = memo.read().await.get() {
        return Ok(goals);
    }

    let mut guard = memo.write().await;
    if let Some(goals) = guard.get() {
        return Ok(goals);
    }
    let loaded = tokio::task::spawn_blocking(move || load_goals(store.as_ref()))
        .await
        .map_err(|e| EngineError::ProcessingError(format!("goal load task failed: {}", e)))?;
    Ok(guard.store(loaded))
}

/// Everything a view needs for one render pass.
pub struct ViewInputs<'a> {
    pub records: &'a [ProjectRecord],
    pub goals: &'a GoalSet,
    pub admin_prefixes: &'a [String],
    pub hours_tolerance: f64,
    pub warnings: Vec<String>,
}

impl<'a> ViewInputs<'a> {
    pub fn partition(&self) -> Partition<'a> {
        Partition::split(self.records, self.admin_prefixes)
    }

    pub fn deriver(&self) -> MetricDeriver {
        MetricDeriver::new(self.goals).with_hours_tolerance(self.hours_tolerance)
    }
}

/// Data-quality notes followed by the goal warning, if any.
pub fn collect_warnings(snapshot: &TableSnapshot, goals: &LoadedGoals) -> Vec<String> {
    let mut warnings = snapshot.quality.warnings();
    warnings.extend(goals.warning.iter().cloned());
    warnings
}
