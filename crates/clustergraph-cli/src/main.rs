use anyhow::{Context, Result};
use chrono::Local;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use clustergraph_collect::{
    replay, CollectOptions, CollectOutcome, CollectSummary, Collector, FixtureSource,
    ReplayInputs, ReplaySummary, SnapshotPaths, SnapshotWriter,
};
use clustergraph_core::{Inventory, Settings, TopologyError};
use clustergraph_graph::TopologyGraph;
use colored::Colorize;
use secrecy::SecretString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, Registry};

/// Process exit codes. Scripts rely on the exact values.
mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const PARTIAL: i32 = 1;
    pub const FAILED: i32 = 2;
    pub const NO_MEMBERS: i32 = 10;
    pub const NOT_FOUND: i32 = 20;
    pub const IO: i32 = 30;
    pub const BAD_ARGUMENTS: i32 = 98;
    pub const USAGE: i32 = 99;
}

#[derive(Parser, Debug)]
#[command(name = "clustergraph")]
#[command(about = "ClusterGraph - Message queue cluster topology discovery", long_about = None)]
#[command(version, arg_required_else_help = true)]
struct Cli {
    /// Additional configuration file layered over config/default.toml
    #[arg(long, global = true, env = "CLUSTERGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query every inventory member and write snapshot files (and optionally a graph)
    Collect(CollectArgs),

    /// Rebuild the graph from snapshot files
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct CollectArgs {
    /// Inventory file, one `tag:name:host(port),...:channel` line per member
    #[arg(short = 'f', long)]
    inventory: PathBuf,

    /// Only collect members whose tag matches one of these patterns (`*`, `?`)
    #[arg(short = 't', long = "tag", num_args = 1..)]
    tags: Vec<String>,

    /// Also collect cluster queues
    #[arg(short = 'q', long)]
    queues: bool,

    /// Write the topology graph to GRAPH.graphml and GRAPH.json
    #[arg(short = 'g', long)]
    graph: Option<PathBuf>,

    /// Prefix for the snapshot file names
    #[arg(short = 'x', long)]
    prefix: Option<String>,

    /// TLS cipher suite for member connections
    #[arg(short = 'c', long)]
    cipher: Option<String>,

    /// User id for member connections
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Password for member connections
    #[arg(
        short = 'p',
        long,
        requires = "user",
        env = "CLUSTERGRAPH_PASSWORD",
        hide_env_values = true
    )]
    password: Option<String>,

    /// JSON cluster description served as the attribute source
    #[arg(long)]
    fixture: PathBuf,

    /// Members queried concurrently
    #[arg(long)]
    workers: Option<usize>,

    /// Per-member deadline in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Queue manager snapshot file
    #[arg(short = 'm', long = "qmgrs")]
    queue_managers: PathBuf,

    /// Cluster link snapshot file
    #[arg(short = 'c', long)]
    links: PathBuf,

    /// Cluster queue snapshot file
    #[arg(short = 'q', long)]
    queues: Option<PathBuf>,

    /// Write the topology graph to GRAPH.graphml and GRAPH.json
    #[arg(short = 'g', long)]
    graph: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => exit_code::USAGE,
                _ => exit_code::BAD_ARGUMENTS,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), render_error(&e));
            exit_code_for(&e)
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&settings.logging.level, cli.verbose);

    match cli.command {
        Commands::Collect(args) => {
            apply_collect_overrides(&mut settings, &args)?;
            run_collect(&args, &settings, &mut io::stdout()).await
        }
        Commands::Replay(args) => run_replay(&args),
    }
}

fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn apply_collect_overrides(settings: &mut Settings, args: &CollectArgs) -> Result<()> {
    if let Some(workers) = args.workers {
        settings.collection.workers = workers;
    }
    if let Some(timeout) = args.timeout {
        settings.collection.member_timeout_secs = timeout;
    }
    if args.queues {
        settings.collection.collect_queues = true;
    }
    if let Some(prefix) = &args.prefix {
        settings.snapshot.prefix = prefix.clone();
    }
    if let Some(user) = &args.user {
        settings.credentials.user_id = Some(user.clone());
    }
    if let Some(password) = &args.password {
        settings.credentials.password = Some(SecretString::from(password.clone()));
    }
    if let Some(cipher) = &args.cipher {
        settings.credentials.cipher_suite = Some(cipher.clone());
    }
    settings.validate().context("Invalid command line options")?;
    Ok(())
}

/// Once the inventory and fixture are loaded, the summary is printed to `out`
/// on every path, including a sink or export failure.
async fn run_collect(args: &CollectArgs, settings: &Settings, out: &mut dyn Write) -> Result<i32> {
    let mut inventory = Inventory::load(&args.inventory, &args.tags)
        .with_context(|| format!("Failed to load inventory {}", args.inventory.display()))?;
    if inventory.is_empty() {
        let summary = CollectSummary::default();
        print_collect_summary(out, &summary, &[])?;
        return Ok(exit_code::NO_MEMBERS);
    }

    let source = FixtureSource::load(&args.fixture)
        .with_context(|| format!("Failed to load fixture {}", args.fixture.display()))?;
    let options = CollectOptions::from_settings(settings);
    let paths = SnapshotPaths::new(&settings.snapshot.prefix, &Local::now(), options.collect_queues);
    let writer = SnapshotWriter::create(paths.clone()).context("Failed to create snapshot files")?;
    let mut graph = args.graph.as_ref().map(|_| TopologyGraph::new());
    let mut written: Vec<PathBuf> = paths.all().into_iter().map(Path::to_path_buf).collect();

    let collector = Collector::new(Arc::new(source), options);
    let collected = {
        let mut sink = (writer, graph.as_mut());
        collector.collect(&mut inventory, &mut sink).await
    };
    let summary = match collected {
        Ok(summary) => summary,
        Err(aborted) => {
            print_collect_summary(out, &aborted.summary, &written)?;
            return Err(aborted.into());
        }
    };

    if let (Some(base), Some(graph)) = (&args.graph, graph.as_mut()) {
        debug!("Graph: {}", graph.stats());
        let exported = graph.write_exports(base);
        graph.close();
        match exported {
            Ok(files) => written.extend(files),
            Err(e) => {
                print_collect_summary(out, &summary, &written)?;
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to export graph to {}", base.display())));
            }
        }
    }

    print_collect_summary(out, &summary, &written)?;
    Ok(match summary.outcome() {
        CollectOutcome::Complete => exit_code::SUCCESS,
        CollectOutcome::Partial => exit_code::PARTIAL,
        CollectOutcome::Failed => exit_code::FAILED,
        CollectOutcome::NoMembers => exit_code::NO_MEMBERS,
    })
}

fn run_replay(args: &ReplayArgs) -> Result<i32> {
    let inputs = ReplayInputs {
        queue_managers: args.queue_managers.clone(),
        links: args.links.clone(),
        queues: args.queues.clone(),
    };
    let mut graph = TopologyGraph::new();
    let summary = replay(&inputs, &mut graph).context("Replay failed")?;
    let written = graph
        .write_exports(&args.graph)
        .with_context(|| format!("Failed to export graph to {}", args.graph.display()))?;
    info!("Replay graph: {}", graph.stats());
    print_replay_summary(&mut io::stdout(), &summary, &written)?;
    graph.close();
    Ok(exit_code::SUCCESS)
}

fn print_collect_summary(
    out: &mut dyn Write,
    summary: &CollectSummary,
    written: &[PathBuf],
) -> io::Result<()> {
    writeln!(out, "{}", "Collection summary".bold())?;
    writeln!(out, "  {:<10} {}", "attempted", summary.attempted)?;
    writeln!(out, "  {:<10} {}", "succeeded", summary.succeeded.to_string().green())?;
    let failed = if summary.failed > 0 {
        summary.failed.to_string().red()
    } else {
        summary.failed.to_string().normal()
    };
    writeln!(out, "  {:<10} {}", "failed", failed)?;
    for failure in &summary.failures {
        writeln!(out, "    {} {}", failure.member.yellow(), failure.reason)?;
    }
    for path in written {
        writeln!(out, "  {:<10} {}", "wrote", path.display())?;
    }
    let outcome = match summary.outcome() {
        CollectOutcome::Complete => "complete".green(),
        CollectOutcome::Partial => "partial".yellow(),
        CollectOutcome::Failed => "failed".red(),
        CollectOutcome::NoMembers => "no members matched the tag filter".yellow(),
    };
    writeln!(out, "  {:<10} {}", "outcome", outcome.bold())
}

fn print_replay_summary(
    out: &mut dyn Write,
    summary: &ReplaySummary,
    written: &[PathBuf],
) -> io::Result<()> {
    writeln!(out, "{}", "Replay summary".bold())?;
    writeln!(out, "  {:<14} {}", "queue managers", summary.queue_managers)?;
    writeln!(out, "  {:<14} {}", "links", summary.links)?;
    writeln!(out, "  {:<14} {}", "queues", summary.queues)?;
    for path in written {
        writeln!(out, "  {:<14} {}", "wrote", path.display())?;
    }
    Ok(())
}

/// Joins the error chain, leaving out a cause whose text the previous
/// message already contains.
fn render_error(err: &anyhow::Error) -> String {
    let mut rendered = err.to_string();
    let mut previous = rendered.clone();
    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        if !previous.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        previous = text;
    }
    rendered
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<TopologyError>() {
            return match e.root() {
                TopologyError::NotFound(_) => exit_code::NOT_FOUND,
                TopologyError::Config(_) => exit_code::BAD_ARGUMENTS,
                _ => exit_code::IO,
            };
        }
    }
    exit_code::IO
}
