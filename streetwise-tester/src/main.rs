mod policy;
mod reports;
mod simulation;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use streetwise_game::ModeTuning;

use policy::Strategy;
use reports::TestReport;
use simulation::{RunRecord, SimulationConfig, aggregate_runs, run_simulation, verify_determinism};
use util::{OutputTarget, parse_modes, parse_seeds, parse_strategies};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "streetwise-tester", version)]
#[command(about = "Automated playthroughs and balance reports for Streetwise")]
struct Args {
    /// Modes to run (comma-separated: normal, chaos, all)
    #[arg(long, default_value = "normal,chaos")]
    modes: String,

    /// Strategies to run (comma-separated: cautious, hustler, random, all)
    #[arg(long, default_value = "cautious,hustler,random")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Base seeds (comma-separated integers)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Consecutive seeds played per base seed
    #[arg(long, default_value_t = 10)]
    iterations: u64,

    /// Stop a run that is still alive on this day
    #[arg(long, default_value_t = 60)]
    max_days: u32,

    /// JSON tuning override (missing mode rows keep their built-in values)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Replay every run and fail if any final snapshot differs
    #[arg(long)]
    verify_determinism: bool,

    /// Include every individual run in the report
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let tuning = load_tuning(args.tuning.as_ref())?;
    let configs = expand_configs(&args)?;
    log::info!("running {} playthroughs", configs.len());

    let records = configs
        .into_iter()
        .map(|config| run_simulation(config, tuning))
        .collect::<Result<Vec<RunRecord>>>()?;

    if args.verify_determinism {
        verify_determinism(&records, args.max_days, tuning)?;
    }

    let aggregates = aggregate_runs(&records);
    let report = TestReport::new(&aggregates, &records, args.max_days, args.verify_determinism);
    write_report(&args, &report, start_time)
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in Strategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:10} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏙️  Streetwise Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_tuning(path: Option<&PathBuf>) -> Result<ModeTuning> {
    let Some(path) = path else {
        return Ok(ModeTuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning {}", path.display()))?;
    ModeTuning::from_json(&json).with_context(|| format!("invalid tuning {}", path.display()))
}

fn expand_configs(args: &Args) -> Result<Vec<SimulationConfig>> {
    let modes = parse_modes(&args.modes)?;
    let strategies = parse_strategies(&args.strategies)?;
    let seeds = parse_seeds(&args.seeds)?;
    let iterations = args.iterations.max(1);

    let mut configs = Vec::new();
    for &mode in &modes {
        for &strategy in &strategies {
            for &base in &seeds {
                for offset in 0..iterations {
                    configs.push(
                        SimulationConfig::new(mode, strategy, base.wrapping_add(offset))
                            .with_max_days(args.max_days),
                    );
                }
            }
        }
    }
    Ok(configs)
}

fn write_report(args: &Args, report: &TestReport<'_>, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, report)?,
        ReportFormat::Markdown => {
            reports::generate_markdown_report(&mut output_target, report, args.verbose)?;
        }
        ReportFormat::Console => {
            reports::generate_console_report(
                &mut output_target,
                report,
                args.verbose,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetwise_game::GameMode;

    fn base_args() -> Args {
        Args {
            modes: "normal".to_string(),
            strategies: "cautious".to_string(),
            list_strategies: false,
            seeds: "1337".to_string(),
            iterations: 1,
            max_days: 10,
            tuning: None,
            report: ReportFormat::Json,
            output: None,
            verify_determinism: false,
            verbose: false,
        }
    }

    #[test]
    fn configs_cover_every_combination() {
        let args = Args {
            modes: "all".to_string(),
            strategies: "cautious,random".to_string(),
            seeds: "5,100".to_string(),
            iterations: 3,
            ..base_args()
        };
        let configs = expand_configs(&args).expect("configs");
        assert_eq!(configs.len(), 2 * 2 * 2 * 3);
        assert!(configs.iter().all(|config| config.max_days == 10));
        assert!(configs.iter().any(|config| config.seed == 7));
        assert!(configs.iter().any(|config| config.seed == 102));
        assert!(
            configs
                .iter()
                .any(|config| config.mode == GameMode::Chaos && config.strategy == Strategy::Random)
        );
    }

    #[test]
    fn zero_iterations_still_plays_each_seed() {
        let args = Args {
            iterations: 0,
            ..base_args()
        };
        assert_eq!(expand_configs(&args).expect("configs").len(), 1);
    }

    #[test]
    fn tuning_override_is_validated() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("streetwise-tuning-good-{}.json", std::process::id()));
        let bad = dir.join(format!("streetwise-tuning-bad-{}.json", std::process::id()));
        std::fs::write(&good, r#"{"chaos": {"actionsPerDay": 5, "dailyHungerDecayMin": 10, "dailyHungerDecayMax": 12, "extraEventChance": 0.2, "badLuckBoost": 0.0, "lowHungerThreshold": 25, "healthRegen": 2}}"#)
            .expect("write good");
        std::fs::write(&bad, r#"{"normal": {"actionsPerDay": 0, "dailyHungerDecayMin": 1, "dailyHungerDecayMax": 2, "extraEventChance": 0.1, "badLuckBoost": 0.0, "lowHungerThreshold": 20, "healthRegen": 3}}"#)
            .expect("write bad");

        let tuning = load_tuning(Some(&good)).expect("valid override");
        assert_eq!(tuning.chaos.actions_per_day, 5);
        assert_eq!(tuning.normal, ModeTuning::default().normal);
        assert!(load_tuning(Some(&bad)).is_err());
        assert!(load_tuning(Some(&dir.join("streetwise-missing-tuning.json"))).is_err());
        assert_eq!(load_tuning(None).expect("default"), ModeTuning::default());

        let _ = std::fs::remove_file(good);
        let _ = std::fs::remove_file(bad);
    }
}
