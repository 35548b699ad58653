use super::helpers::ViewInputs;
use crate::error::EngineError;
use crate::metrics::project::{composition, cost_lines};
use chrono::Utc;
use shared::reports::ProjectDetail;

/// Detail of one project, looked up by its trimmed identifier. Internal cost
/// centers are not projects and are not found here.
pub fn build_project_detail(inputs: ViewInputs<'_>, project_id: &str) -> Result<ProjectDetail, EngineError> {
    let wanted = project_id.trim();
    let record = inputs
        .partition()
        .sales
        .into_iter()
        .find(|record| record.project_id.trim() == wanted)
        .ok_or_else(|| EngineError::ProjectNotFound(wanted.to_string()))?;

    let deriver = inputs.deriver();
    let metrics = deriver.derive(record);
    Ok(ProjectDetail {
        generated_at: Utc::now(),
        goals: *inputs.goals,
        record: record.clone(),
        metrics,
        margin_on_target: metrics.margin_pct >= deriver.margin_goal(),
        cost_lines: cost_lines(record),
        composition: composition(record),
        warnings: inputs.warnings,
    })
}

/// Identifiers of the sales projects, in table order.
pub fn project_ids(inputs: &ViewInputs<'_>) -> Vec<String> {
    inputs
        .partition()
        .sales
        .into_iter()
        .map(|record| record.project_id.clone())
        .collect()
}
