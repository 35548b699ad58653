use crate::goals::LoadedGoals;
use shared::reports::GoalsView;

pub fn build_goals_view(loaded: &LoadedGoals) -> GoalsView {
    GoalsView {
        goals: loaded.goals,
        net_margin_goal: loaded.goals.net_margin(),
        warning: loaded.warning.clone(),
    }
}
