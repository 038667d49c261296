mod terminal;

use clap::{Parser, Subcommand};
use kp_app::{AppResult, Config, Session};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "kp-cli")]
#[command(about = "kittyplot - compare experiment runs in one grid of charts", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Render directives file (overrides config)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    /// Runlist file (overrides config)
    #[arg(long, global = true)]
    runlist: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load runs and render the matching metrics
    Plot {
        /// Run directories or .log files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Regex matched against the start of each metric name
        #[arg(short, long, default_value = "")]
        pattern: String,
        /// Output image (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load runs and list their metric names
    Keys {
        /// Run directories or .log files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Only list names matching this regex
        #[arg(short, long)]
        pattern: Option<String>,
    },
    /// List runlist entries
    Runs,
    /// Hide a run from future plots
    Hide {
        /// Run label
        label: String,
    },
    /// Show a hidden run again
    Show {
        /// Run label
        label: String,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing (RUST_LOG selects the level)
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Plot {
            paths,
            pattern,
            output,
        } => cmd_plot(config, &paths, &pattern, output),
        Commands::Keys { paths, pattern } => cmd_keys(config, &paths, pattern.as_deref()),
        Commands::Runs => cmd_runs(&config),
        Commands::Hide { label } => cmd_set_visible(&config, &label, false),
        Commands::Show { label } => cmd_set_visible(&config, &label, true),
    }
}

fn load_config(cli: &Cli) -> AppResult<Config> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(settings) = &cli.settings {
        config.settings_path = settings.clone();
    }
    if let Some(runlist) = &cli.runlist {
        config.runlist_path = runlist.clone();
    }
    Ok(config)
}

fn cmd_plot(
    mut config: Config,
    paths: &[PathBuf],
    pattern: &str,
    output: Option<PathBuf>,
) -> AppResult<()> {
    if let Some(output) = output {
        config.plot_path = output;
    }
    let terminal_px = terminal::pixel_size_or(config.fallback_size);

    let mut session = Session::load(config, paths)?;
    report_unreadable(&session, &mut io::stderr())?;
    session.select(pattern)?;

    match session.render(terminal_px) {
        Ok(output) => {
            println!("{}", output.path.display());
            for metric in &output.failed {
                eprintln!("warning: could not draw {metric}");
            }
            Ok(())
        }
        Err(err) if err.is_empty_metric_set() => {
            println!("no metrics");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Tell the user which inputs could not be read.
fn report_unreadable(session: &Session, out: &mut impl Write) -> io::Result<()> {
    if let Some(message) = session.load_warning() {
        writeln!(out, "warning: {message}")?;
    }
    Ok(())
}

fn cmd_keys(config: Config, paths: &[PathBuf], pattern: Option<&str>) -> AppResult<()> {
    let mut session = Session::load(config, paths)?;
    report_unreadable(&session, &mut io::stderr())?;
    let keys: Vec<&str> = match pattern {
        Some(pattern) => {
            session.select(pattern)?;
            session
                .selector()
                .matches()
                .iter()
                .map(String::as_str)
                .collect()
        }
        None => session.dataset().keys().iter().map(String::as_str).collect(),
    };

    if keys.is_empty() {
        println!("no metrics");
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}

fn cmd_runs(config: &Config) -> AppResult<()> {
    let runlist = config.runlist();
    let entries = runlist.entries()?;
    if entries.is_empty() {
        println!("No runs in {}", display(runlist.path()));
        return Ok(());
    }
    for entry in entries {
        let mark = if entry.visible { "shown " } else { "hidden" };
        println!("{mark}  {}", entry.label);
    }
    Ok(())
}

fn cmd_set_visible(config: &Config, label: &str, visible: bool) -> AppResult<()> {
    let runlist = config.runlist();
    let matched = runlist.set_visible(label, visible)?;
    if matched == 0 {
        println!("No run '{label}' in {}", display(runlist.path()));
    } else {
        let verb = if visible { "Showing" } else { "Hiding" };
        println!("{verb} {label}");
    }
    Ok(())
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
