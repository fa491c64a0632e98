use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskrank_core::{analyze, suggest, Scorer, Strategy};

mod config;
mod input;
mod report;
mod server;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "taskrank",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKRANK_BUILD_SHA"), ")"),
    about = "Rank tasks by urgency, importance, effort and dependencies"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every task in a JSON file and print them highest priority first
    Analyze {
        /// Task array, or {"tasks": [...], "strategy": "..."}
        file: PathBuf,

        /// Overrides the file's strategy and the configured default
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the few tasks worth doing first
    Suggest {
        file: PathBuf,

        #[arg(long)]
        strategy: Option<Strategy>,

        /// Number of tasks (default: scoring.suggest_limit from config)
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Show the weight vector of every strategy
    Strategies,

    /// Serve the JSON API
    Serve {
        /// Bind address (default: server.bind from config)
        #[arg(long)]
        bind: Option<String>,

        /// Port (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Manage ~/.taskrank/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config (never overwrites)
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so --json output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            file,
            strategy,
            json,
        } => {
            let cfg = config::load_config()?;
            let task_file = input::read_task_file(&file)?;
            let scorer = scorer_for(&cfg, strategy, task_file.strategy)?;
            let analysis = analyze(&scorer, &task_file.tasks);

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!(
                    "Strategy: {} | today: {} | tasks: {}\n",
                    analysis.strategy,
                    scorer.today(),
                    analysis.tasks.len()
                );
                print!("{}", report::render_ranking(&analysis.tasks));
                println!();
                print!("{}", report::render_cycles(&analysis.circular_dependencies));
            }
        }

        Command::Suggest {
            file,
            strategy,
            limit,
            json,
        } => {
            let cfg = config::load_config()?;
            let task_file = input::read_task_file(&file)?;
            let scorer = scorer_for(&cfg, strategy, task_file.strategy)?;
            let limit = limit.unwrap_or(cfg.scoring.suggest_limit);
            let top = suggest(&scorer, &task_file.tasks, limit);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "strategy": scorer.strategy(),
                        "top_tasks": top,
                        "count": top.len(),
                    }))?
                );
            } else {
                println!("Top {} tasks ({}):\n", top.len(), scorer.strategy());
                print!("{}", report::render_ranking(&top));
            }
        }

        Command::Strategies => {
            let cfg = config::load_config()?;
            print!("{}", report::render_strategies(cfg.scoring.default_strategy));
        }

        Command::Serve { bind, port } => {
            let mut cfg = config::load_config()?;
            if let Some(bind) = bind {
                cfg.server.bind = bind;
            }
            if let Some(port) = port {
                cfg.server.port = port;
            }
            let state = server::AppState::from_config(&cfg)?;
            server::serve(&cfg.server_addr(), state).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!(
                    "{}",
                    toml::to_string_pretty(&cfg).context("serialize config")?
                );
            }
        },
    }

    Ok(())
}

/// Strategy precedence: command-line flag, then the task file, then config.
fn scorer_for(
    cfg: &Config,
    flag: Option<Strategy>,
    from_file: Option<Strategy>,
) -> Result<Scorer> {
    let strategy = flag.or(from_file).unwrap_or(cfg.scoring.default_strategy);
    Ok(Scorer::new(strategy).with_today(cfg.today()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_defaulting_to(strategy: Strategy) -> Config {
        let mut cfg = Config::default();
        cfg.scoring.default_strategy = strategy;
        cfg
    }

    #[test]
    fn flag_beats_file_and_config() {
        let cfg = config_defaulting_to(Strategy::HighImpact);
        let scorer = scorer_for(
            &cfg,
            Some(Strategy::DeadlineDriven),
            Some(Strategy::FastestWins),
        )
        .unwrap();
        assert_eq!(scorer.strategy(), Strategy::DeadlineDriven);
    }

    #[test]
    fn file_strategy_beats_config() {
        let cfg = config_defaulting_to(Strategy::HighImpact);
        let scorer = scorer_for(&cfg, None, Some(Strategy::FastestWins)).unwrap();
        assert_eq!(scorer.strategy(), Strategy::FastestWins);
    }

    #[test]
    fn config_default_applies_without_flag_or_file_strategy() {
        let cfg = config_defaulting_to(Strategy::HighImpact);
        let scorer = scorer_for(&cfg, None, None).unwrap();
        assert_eq!(scorer.strategy(), Strategy::HighImpact);
    }

    #[test]
    fn unknown_file_strategy_does_not_fall_through_to_config() {
        let cfg = config_defaulting_to(Strategy::HighImpact);
        let file = input::parse_task_document(&json!({
            "tasks": [{"id": 1}],
            "strategy": "nonsense"
        }))
        .unwrap();
        let scorer = scorer_for(&cfg, None, file.strategy).unwrap();
        assert_eq!(scorer.strategy(), Strategy::SmartBalance);
    }

    #[test]
    fn strategy_flag_parses_strictly() {
        let args = ["taskrank", "analyze", "tasks.json", "--strategy"];
        let cli = Cli::try_parse_from(args.iter().chain(&["high_impact"])).unwrap();
        assert!(matches!(
            cli.command,
            Command::Analyze { strategy: Some(Strategy::HighImpact), .. }
        ));
        assert!(Cli::try_parse_from(args.iter().chain(&["bogus"])).is_err());
    }
}
