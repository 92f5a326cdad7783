pub mod output;
pub mod shutdown;
pub mod watch;

use std::{io::IsTerminal, path::PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{error, level_filters::LevelFilter};

use crate::{
    api::{client::DEFAULT_API_URL, HttpEntryClient},
    storage::timer_store::{JsonTimerStore, TimerStore},
    timer::{
        format::format_duration, id::RandomIdGenerator, manager::TimerManager,
        submit::stop_and_submit,
    },
    utils::{
        clock::DefaultClock,
        dir::{application_default_path, create_application_dir, timers_file},
        logging::{enable_logging, CLI_PREFIX},
    },
};

use output::{render_timers, short_id, Styling};
use shutdown::detect_shutdown;

const UNTITLED_TIMER: &str = "Untitled timer";

#[derive(Parser, Debug)]
#[command(name = "tact", version, long_about = None)]
#[command(about = "Local work timers that turn into Tact entries")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        env = "TACT_API_URL",
        default_value = DEFAULT_API_URL,
        help = "Backend API URL"
    )]
    api: String,
    #[arg(
        long,
        help = "Application directory. By default $HOME/.tact, or the working directory if there is no home"
    )]
    dir: Option<PathBuf>,
    #[arg(long, help = "Print logs to the console")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level, overrides RUST_LOG")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Start a new timer, pausing the running one")]
    Start {
        #[arg(help = "What you are working on")]
        description: Vec<String>,
    },
    #[command(about = "Pause a timer. Defaults to the running one")]
    Pause {
        #[arg(help = "Timer id or a unique prefix of it")]
        id: Option<String>,
    },
    #[command(about = "Resume a paused timer, pausing the running one")]
    Resume {
        #[arg(help = "Timer id or a unique prefix of it")]
        id: String,
    },
    #[command(about = "Stop a timer and submit it as an entry. Defaults to the running one")]
    Stop {
        #[arg(help = "Timer id or a unique prefix of it")]
        id: Option<String>,
        #[arg(long, help = "Only stop the timer locally, don't create an entry")]
        no_submit: bool,
    },
    #[command(about = "Delete a timer")]
    Delete {
        #[arg(help = "Timer id or a unique prefix of it")]
        id: String,
    },
    #[command(about = "Show active timers and timers completed today")]
    List {},
    #[command(about = "Show the running timer, refreshed every second, until Ctrl-C")]
    Watch {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args.dir.unwrap_or_else(application_default_path);

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        args.log_filter
    };
    // Timers keep working without a log directory.
    if let Err(e) = create_application_dir(&app_dir)
        .and_then(|_| enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log))
    {
        eprintln!("Logging disabled: {e}");
    }

    let mut manager = TimerManager::new(
        JsonTimerStore::new(timers_file(&app_dir)),
        Box::new(DefaultClock),
        Box::new(RandomIdGenerator),
    );

    let styling = if std::io::stdout().is_terminal() {
        Styling::Colored
    } else {
        Styling::Plain
    };

    match args.commands {
        Commands::Start { description } => {
            let description = timer_description(&description);
            if let Some(running) = manager.running_timer() {
                println!("Paused {}", running.description());
            }
            let timer = manager.start_timer(description);
            println!("Started {} {}", short_id(timer.id()), timer.description());
            Ok(())
        }
        Commands::Pause { id } => {
            let id = match id {
                Some(prefix) => resolve_id(&manager, &prefix)?,
                None => running_id(&manager)?,
            };
            manager.pause_timer(&id);
            print_timer_state(&manager, &id);
            Ok(())
        }
        Commands::Resume { id } => {
            let id = resolve_id(&manager, &id)?;
            manager.resume_timer(&id);
            print_timer_state(&manager, &id);
            Ok(())
        }
        Commands::Stop { id, no_submit } => {
            let id = match id {
                Some(prefix) => resolve_id(&manager, &prefix)?,
                None => running_id(&manager)?,
            };
            if manager.get_timer(&id).is_some_and(|t| t.is_stopped()) {
                bail!("Timer {} is already stopped", short_id(&id));
            }
            if no_submit {
                if let Some(timer) = manager.stop_timer(&id) {
                    println!(
                        "Stopped {} after {}",
                        timer.description(),
                        format_duration(timer.accumulated_seconds() as i64)
                    );
                }
                return Ok(());
            }

            let client = HttpEntryClient::new(&args.api)?;
            match stop_and_submit(&mut manager, &client, &id).await {
                Ok(submission) => {
                    println!(
                        "Stopped {}, created entry: {}",
                        short_id(&submission.timer_id),
                        submission.text
                    );
                    Ok(())
                }
                Err(e) => {
                    error!("Entry submission failed for {id}: {e:?}");
                    bail!("Timer was stopped but the entry could not be created: {e}")
                }
            }
        }
        Commands::Delete { id } => {
            let id = resolve_id(&manager, &id)?;
            manager.delete_timer(&id);
            println!("Deleted {}", short_id(&id));
            Ok(())
        }
        Commands::List {} => {
            let now = manager.now();
            print!(
                "{}",
                render_timers(
                    &manager.active_timers(),
                    &manager.completed_today(),
                    now,
                    styling
                )
            );
            Ok(())
        }
        Commands::Watch {} => {
            let shutdown_token = CancellationToken::new();
            let mut stdout = std::io::stdout();
            let (_, result) = tokio::join!(detect_shutdown(shutdown_token.clone()), async {
                let result = watch::watch(&mut manager, &mut stdout, shutdown_token.clone()).await;
                shutdown_token.cancel();
                result
            });
            result
        }
    }
}

/// Joins the words given on the command line. Nothing at all gives a placeholder description.
fn timer_description(words: &[String]) -> String {
    let description = words.join(" ");
    let description = description.trim();
    if description.is_empty() {
        UNTITLED_TIMER.to_string()
    } else {
        description.to_string()
    }
}

fn running_id<S: TimerStore>(manager: &TimerManager<S>) -> Result<String> {
    match manager.running_timer() {
        Some(timer) => Ok(timer.id().to_string()),
        None => bail!("No timer is running"),
    }
}

/// Accepts a full timer id or any prefix that matches exactly one timer.
fn resolve_id<S: TimerStore>(manager: &TimerManager<S>, prefix: &str) -> Result<String> {
    if let Some(timer) = manager.get_timer(prefix) {
        return Ok(timer.id().to_string());
    }

    let matches = manager
        .timers()
        .iter()
        .filter(|t| t.id().starts_with(prefix))
        .collect::<Vec<_>>();

    match matches.as_slice() {
        [timer] => Ok(timer.id().to_string()),
        [] => bail!("No timer matches {prefix:?}"),
        _ => bail!(
            "{prefix:?} matches {} timers, use more characters",
            matches.len()
        ),
    }
}

fn print_timer_state<S: TimerStore>(manager: &TimerManager<S>, id: &str) {
    if let Some(timer) = manager.get_timer(id) {
        println!(
            "{} {} ({})",
            short_id(timer.id()),
            timer.description(),
            timer.state()
        );
    }
}
