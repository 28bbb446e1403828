use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use streetwise_game::format_money;

use crate::simulation::{RunAggregate, RunOutcome, RunRecord};

/// Everything a report renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport<'a> {
    pub generated_at: String,
    pub max_days: u32,
    pub determinism_verified: bool,
    pub aggregates: &'a [RunAggregate],
    pub runs: &'a [RunRecord],
}

impl<'a> TestReport<'a> {
    #[must_use]
    pub fn new(
        aggregates: &'a [RunAggregate],
        runs: &'a [RunRecord],
        max_days: u32,
        determinism_verified: bool,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            max_days,
            determinism_verified,
            aggregates,
            runs,
        }
    }
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

pub fn generate_console_report(
    out: &mut dyn Write,
    report: &TestReport<'_>,
    verbose: bool,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Playthrough Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;
    writeln!(out, "Generated: {}", report.generated_at)?;
    writeln!(out, "Total runs: {}", report.runs.len())?;
    writeln!(out, "Day cap: {}", report.max_days)?;
    if report.determinism_verified {
        writeln!(out, "Determinism: {}", "verified".green())?;
    }
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for agg in report.aggregates {
        let rate = percent(agg.survival_rate);
        let rate = if agg.survival_rate >= 0.5 {
            rate.as_str().green()
        } else if agg.survival_rate > 0.0 {
            rate.as_str().yellow()
        } else {
            rate.as_str().red()
        };
        writeln!(
            out,
            "{} / {}",
            agg.mode.as_str().bold(),
            agg.strategy.key().bold()
        )?;
        writeln!(out, "   Runs: {}", agg.runs)?;
        writeln!(
            out,
            "   Days survived: {:.1} ± {:.1}",
            agg.mean_days, agg.std_days
        )?;
        writeln!(out, "   Survival rate: {rate}")?;
        writeln!(
            out,
            "   Collapses: {} starvation, {} exhaustion",
            agg.starvations, agg.exhaustions
        )?;
        writeln!(out, "   Mean final money: ${:.2}", agg.mean_final_money)?;
        writeln!(out)?;
    }

    if verbose {
        writeln!(out, "{}", "🎲 Individual Runs".bright_yellow().bold())?;
        writeln!(out, "{}", "=================".yellow())?;
        for run in report.runs {
            let outcome = match run.outcome {
                RunOutcome::Survived => run.outcome.label().green(),
                RunOutcome::Starvation | RunOutcome::Exhaustion => run.outcome.label().red(),
            };
            writeln!(
                out,
                "{} / {} seed {}: {outcome} after {} days, {} money, {} events, {} actions [{}]",
                run.mode,
                run.strategy,
                run.seed,
                run.days_survived,
                format_money(run.final_money),
                run.events_seen,
                run.actions_taken,
                run.fingerprint
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &TestReport<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    report: &TestReport<'_>,
    verbose: bool,
) -> Result<()> {
    writeln!(out, "# Streetwise Playthrough Results\n")?;
    writeln!(out, "- **Generated**: {}", report.generated_at)?;
    writeln!(out, "- **Total runs**: {}", report.runs.len())?;
    writeln!(out, "- **Day cap**: {}", report.max_days)?;
    if report.determinism_verified {
        writeln!(out, "- **Determinism**: verified")?;
    }
    writeln!(out)?;

    writeln!(out, "## Summary\n")?;
    writeln!(
        out,
        "| Mode | Strategy | Runs | Mean days | Std days | Survival | Mean money |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for agg in report.aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {:.1} | {:.1} | {} | ${:.2} |",
            agg.mode,
            agg.strategy,
            agg.runs,
            agg.mean_days,
            agg.std_days,
            percent(agg.survival_rate),
            agg.mean_final_money
        )?;
    }

    if verbose {
        writeln!(out, "\n## Runs\n")?;
        for run in report.runs {
            writeln!(
                out,
                "- {} / {} seed {}: {} after {} days ({}), `{}`",
                run.mode,
                run.strategy,
                run.seed,
                run.outcome.label(),
                run.days_survived,
                format_money(run.final_money),
                run.fingerprint
            )?;
        }
    }
    Ok(())
}
