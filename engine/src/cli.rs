// Command-line front end: argument parsing and command execution.
use crate::data::normalizer::brazilian_format::parse_decimal;
use anyhow::Context;
use crate::error::EngineError;
use crate::goals::normalize_goal_set;
use crate::services::DashboardEngine;
use serde::Serialize;
use shared::models::{GoalSet, ProjectStatus};
use shared::reports::{GoalsView, InsightsReport, PortfolioOverview, ProjectDetail, RevenueBase, SortKey, SortOrder, TileQuery};
use shared::utils::brazilian_format::{format_currency, format_currency_short, format_percent, format_thousands};
use std::path::PathBuf;

pub const USAGE: &str = "\
usage: engine [--config PATH] <command>

commands:
  portfolio [--status S,...] [--sort project|sold|margin|progress] [--asc]
  project <ID>
  insights [--base concluded|total]
  goals
  set-goals <SALES> <MARGIN> <ADMIN>";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Portfolio(TileQuery),
    Project(String),
    Insights(RevenueBase),
    Goals,
    SetGoals(GoalSet),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub command: Command,
}

fn usage_error(message: impl Into<String>) -> EngineError {
    EngineError::ConfigError(format!("{}\n\n{}", message.into(), USAGE))
}

fn parse_statuses(value: &str) -> Result<Vec<ProjectStatus>, EngineError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ProjectStatus::parse(s).ok_or_else(|| usage_error(format!("unknown status '{}'", s))))
        .collect()
}

fn parse_sort_key(value: &str) -> Result<SortKey, EngineError> {
    match value {
        "project" => Ok(SortKey::Project),
        "sold" => Ok(SortKey::Sold),
        "margin" => Ok(SortKey::Margin),
        "progress" => Ok(SortKey::Progress),
        other => Err(usage_error(format!("unknown sort key '{}'", other))),
    }
}

fn parse_portfolio<I: Iterator<Item = String>>(mut rest: I) -> Result<Command, EngineError> {
    let mut query = TileQuery::default();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--status" => {
                let value = rest.next().ok_or_else(|| usage_error("--status needs a value"))?;
                query.statuses = parse_statuses(&value)?;
            }
            "--sort" => {
                let value = rest.next().ok_or_else(|| usage_error("--sort needs a value"))?;
                query.sort = parse_sort_key(&value)?;
            }
            "--asc" => query.order = SortOrder::Ascending,
            "--desc" => query.order = SortOrder::Descending,
            other => return Err(usage_error(format!("unexpected argument '{}'", other))),
        }
    }
    Ok(Command::Portfolio(query))
}

fn parse_insights<I: Iterator<Item = String>>(mut rest: I) -> Result<Command, EngineError> {
    let mut base = RevenueBase::Concluded;
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--base" => {
                base = match rest.next().as_deref() {
                    Some("concluded") => RevenueBase::Concluded,
                    Some("total") => RevenueBase::Total,
                    Some(other) => return Err(usage_error(format!("unknown revenue base '{}'", other))),
                    None => return Err(usage_error("--base needs a value")),
                }
            }
            other => return Err(usage_error(format!("unexpected argument '{}'", other))),
        }
    }
    Ok(Command::Insights(base))
}

fn parse_goal_value(name: &str, value: Option<String>) -> Result<f64, EngineError> {
    let value = value.ok_or_else(|| usage_error(format!("missing {} goal", name)))?;
    let parsed = parse_decimal(&value).with_context(|| format!("{} goal '{}' is not a number", name, value))?;
    Ok(parsed)
}

/// Parses the arguments that follow the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, EngineError> {
    let mut args = args.into_iter();
    let mut config = None;

    let command_name = loop {
        match args.next() {
            Some(arg) if arg == "--config" => {
                let path = args.next().ok_or_else(|| usage_error("--config needs a path"))?;
                config = Some(PathBuf::from(path));
            }
            Some(arg) => break arg,
            None => return Err(usage_error("missing command")),
        }
    };

    let command = match command_name.as_str() {
        "portfolio" => parse_portfolio(args)?,
        "project" => {
            let id = args.next().ok_or_else(|| usage_error("project needs an ID"))?;
            if let Some(extra) = args.next() {
                return Err(usage_error(format!("unexpected argument '{}'", extra)));
            }
            Command::Project(id)
        }
        "insights" => parse_insights(args)?,
        "goals" => Command::Goals,
        "set-goals" => {
            let sales = parse_goal_value("sales", args.next())?;
            let margin = parse_goal_value("margin", args.next())?;
            let admin = parse_goal_value("admin", args.next())?;
            Command::SetGoals(normalize_goal_set(sales, margin, admin)?)
        }
        other => return Err(usage_error(format!("unknown command '{}'", other))),
    };

    Ok(CliArgs { config, command })
}

/// Rendered result of a command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub json: String,
    /// One-line summary in Brazilian display format.
    pub headline: String,
    pub warnings: Vec<String>,
}

fn render<T: Serialize>(view: &T, headline: String, warnings: Vec<String>) -> Result<CommandOutput, EngineError> {
    Ok(CommandOutput {
        json: serde_json::to_string_pretty(view)?,
        headline,
        warnings,
    })
}

pub fn portfolio_headline(view: &PortfolioOverview) -> String {
    format!(
        "Sold {} ({} of goal), margin {}, {} of {} projects open",
        format_currency_short(view.sold_total),
        format_percent(view.sales_goal_pct, 0),
        format_percent(view.total_margin_pct, 1),
        format_thousands(view.open_count as u64),
        format_thousands(view.total_count as u64)
    )
}

pub fn project_headline(view: &ProjectDetail) -> String {
    format!(
        "{} {}: sold {}, margin {}{}",
        view.record.project_id,
        view.record.client,
        format_currency(view.record.sold),
        format_percent(view.metrics.margin_pct, 1),
        if view.metrics.critical { " (critical)" } else { "" }
    )
}

pub fn insights_headline(view: &InsightsReport) -> String {
    match &view.closed {
        Some(closed) => format!(
            "{} closed projects, sold {}, profit {}, margin {}",
            format_thousands(closed.project_count as u64),
            format_currency(closed.sold_total),
            format_currency(closed.profit_total),
            format_percent(closed.margin_pct, 1)
        ),
        None => "No closed projects yet".to_string(),
    }
}

pub fn goals_headline(view: &GoalsView) -> String {
    format!(
        "Sales goal {}, gross margin {}, admin cost {}, net margin {}",
        format_currency(view.goals.sales),
        format_percent(view.goals.gross_margin, 1),
        format_percent(view.goals.admin_cost, 1),
        format_percent(view.net_margin_goal, 1)
    )
}

pub async fn execute(engine: &DashboardEngine, command: Command) -> Result<CommandOutput, EngineError> {
    match command {
        Command::Portfolio(query) => {
            let view = engine.portfolio(&query).await?;
            render(&view, portfolio_headline(&view), view.warnings.clone())
        }
        Command::Project(id) => {
            let view = engine.project_detail(&id).await?;
            render(&view, project_headline(&view), view.warnings.clone())
        }
        Command::Insights(base) => {
            let view = engine.insights(base).await?;
            render(&view, insights_headline(&view), view.warnings.clone())
        }
        Command::Goals => {
            let view = engine.goals_view().await?;
            render(&view, goals_headline(&view), view.warning.iter().cloned().collect())
        }
        Command::SetGoals(goals) => {
            engine.save_goals(goals).await?;
            let view = engine.goals_view().await?;
            render(&view, goals_headline(&view), view.warning.iter().cloned().collect())
        }
    }
}
