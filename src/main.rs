//! hoststat - host utilization sampler binary
//!
//! Samples CPU and memory in the background and serves the results over HTTP.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hoststat::{
    start_web_server, ExtendedInfo, MetricProvider, Reading, Sampler, SamplerConfig, StateStore,
    SystemCollector, WebConfig, DEFAULT_FAILURE_THRESHOLD, DEFAULT_INTERVAL_MS, DEFAULT_WEB_PORT,
};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "hoststat")]
#[command(about = "Host CPU/memory sampler with an HTTP API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Samples host CPU and memory utilization every 500ms and serves the latest reading, a 100-entry history and extended host facts over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Consecutive failed cycles before reporting degraded
    #[arg(long, default_value_t = DEFAULT_FAILURE_THRESHOLD)]
    failure_threshold: u32,

    /// Refresh extended host info every N cycles
    #[arg(long, default_value_t = 1)]
    extended_every: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the sampler and web server (default)
    Serve(ServeArgs),

    /// Take a single sample and exit
    Snapshot(SnapshotArgs),

    /// Show host information
    Info,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[derive(Serialize)]
struct OneShot {
    current: Reading,
    more_info: ExtendedInfo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(args).await?,
        Some(Commands::Info) => info_command().await?,
        None => serve_command(&cli, &ServeArgs::default()).await?,
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing::subscriber::set_global_default(build_subscriber(cli, rust_log.as_deref()))?;

    Ok(())
}

/// `RUST_LOG` directives win when present and valid; otherwise the flags pick
/// the level, WARN by default.
fn log_filter(cli: &Cli, rust_log: Option<&str>) -> EnvFilter {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}

fn build_subscriber(cli: &Cli, rust_log: Option<&str>) -> impl tracing::Subscriber + Send + Sync {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(cli, rust_log))
        .with_target(false)
        .compact()
        .finish()
}

fn sampler_config(cli: &Cli) -> SamplerConfig {
    SamplerConfig::default()
        .with_failure_threshold(cli.failure_threshold)
        .with_extended_every(cli.extended_every)
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    info!("Starting hoststat...");

    let collector = SystemCollector::new().context("initializing system collector")?;
    let state = StateStore::shared();
    let sampler = Sampler::new(collector, state.clone(), sampler_config(cli))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sampler_task = tokio::spawn(sampler.run(shutdown_rx));

    let web_config = WebConfig::new(&cli.host, cli.port).with_cors(!args.no_cors);

    info!("Configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);
    info!("  - Sampling interval: {}ms", DEFAULT_INTERVAL_MS);
    info!("  - Failure threshold: {}", cli.failure_threshold);
    info!("  - Extended info every {} cycle(s)", cli.extended_every);

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown requested");
        let _ = shutdown_tx.send(true);
    };

    let served = start_web_server(web_config, state, shutdown).await;

    // Dropping the sender on an early server error also stops the sampler.
    sampler_task.await.context("sampler task panicked")?;
    served?;

    Ok(())
}

async fn snapshot_command(args: &SnapshotArgs) -> anyhow::Result<()> {
    let mut collector = SystemCollector::new()?;
    let shot = OneShot {
        current: collector.sample_basic().await?,
        more_info: collector.sample_extended().await?,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&shot)?),
        "pretty" => print_pretty(&shot),
        other => anyhow::bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }

    Ok(())
}

async fn info_command() -> anyhow::Result<()> {
    let mut collector = SystemCollector::new()?;
    let info = collector.sample_extended().await?;

    println!("hoststat host information");
    println!("=========================");
    println!();

    #[cfg(feature = "host-info")]
    {
        println!("System Details:");
        println!("  Hostname: {}", info.host.hostname);
        println!("  OS: {} {}", info.host.platform, info.host.platform_version);
        println!("  Kernel: {} ({})", info.host.kernel_version, info.host.kernel_arch);
        println!("  Uptime: {} seconds", info.host.uptime_seconds);
        println!();
    }

    println!("Hardware:");
    println!("  CPU: {} ({} cores)", info.cpu.model_name, info.cpu.cores);
    println!("  Memory: {:.1} GB total", gib(info.memory.total));

    #[cfg(feature = "host-info")]
    {
        println!();
        println!("Storage:");
        for disk in &info.disks {
            println!(
                "  {} on {} ({}): {:.1} GB total, {:.1} GB free",
                disk.device,
                disk.mount_point,
                disk.fs_type,
                gib(disk.total),
                gib(disk.free)
            );
        }
    }

    Ok(())
}

fn print_pretty(shot: &OneShot) {
    println!(
        "Snapshot ({})",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("==========================================");
    println!();

    println!("CPU:");
    println!("  Usage: {}%", shot.current.cpu_usage_percent);
    println!("  Model: {}", shot.more_info.cpu.model_name);
    println!("  Cores: {}", shot.more_info.cpu.cores);
    println!(
        "  Load: {:.2}, {:.2}, {:.2}",
        shot.more_info.cpu.load1, shot.more_info.cpu.load5, shot.more_info.cpu.load15
    );
    println!();

    println!("Memory:");
    println!("  Usage: {}%", shot.current.mem_usage_percent);
    println!("  Total: {:.1} GB", gib(shot.more_info.memory.total));
    println!("  Available: {:.1} GB", gib(shot.more_info.memory.available));

    #[cfg(feature = "host-info")]
    {
        println!();
        println!("Host:");
        println!("  Hostname: {}", shot.more_info.host.hostname);
        println!("  Processes: {}", shot.more_info.host.process_count);
        println!("  Disks: {}", shot.more_info.disks.len());
    }
}

fn gib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}
