//! `stride-collector` runs the telemetry task against simulated sensors and prints the encoded readings, one JSON
//! document per line, or decodes a previously captured document.

#![forbid(unsafe_code)]

mod sensors;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::{WrapErr, eyre};
use stride_osal_std::task::{Spawner, TaskConfig};
use stride_osal_std::time::{Duration, Time};
use stride_telemetry::codec::{self, decode_str};
use stride_telemetry::{LifecycleConfig, Tag, TaggedValueStore, TaskLifecycle, TelemetryTask};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use self::sensors::SimulatedSensors;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs the telemetry task and prints an encoded snapshot every publish interval.
    Run {
        /// Store name, used as the root key of every document.
        #[arg(long, env = "STRIDE_STORE_NAME", default_value = "wrist")]
        name: String,

        /// Seconds between printed snapshots.
        #[arg(long, env = "STRIDE_PUBLISH_INTERVAL", default_value_t = 5)]
        publish_interval: u64,

        /// Milliseconds between collections.
        #[arg(long, env = "STRIDE_COLLECT_INTERVAL_MS", default_value_t = 1000)]
        collect_interval_ms: u64,

        /// How often the simulated sensors fail setup before coming up.
        #[arg(long, env = "STRIDE_SETUP_FAILURES", default_value_t = 0)]
        setup_failures: u32,

        /// Stack size of the telemetry thread, in bytes.
        #[arg(long, env = "STRIDE_STACK_SIZE", default_value_t = TaskConfig::DEFAULT_STACK_SIZE)]
        stack_size: usize,

        /// Priority of the telemetry task. Ignored on hosted targets.
        #[arg(long, env = "STRIDE_PRIORITY", default_value_t = TaskConfig::DEFAULT_PRIORITY)]
        priority: u8,

        /// Stops after this many seconds instead of waiting for Ctrl-C.
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Decodes a telemetry document and prints its readings.
    Decode {
        /// Name of the store to read from the document.
        #[arg(long, env = "STRIDE_STORE_NAME", default_value = "wrist")]
        name: String,

        /// File holding the document, `-` for stdin.
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .with_env_var("STRIDE_LOG")
                    .from_env()?,
            )
            .with_writer(std::io::stderr)
            .compact()
            .finish(),
    )?;

    match cli.command {
        Command::Run {
            name,
            publish_interval,
            collect_interval_ms,
            setup_failures,
            stack_size,
            priority,
            duration,
        } => {
            let config = TaskConfig::new(TelemetryTask::<Time, SimulatedSensors>::DEFAULT_NAME)
                .with_stack_size(stack_size)
                .with_priority(priority);
            let lifecycle = LifecycleConfig::new()
                .with_collect_interval(Duration::from_millis(collect_interval_ms));
            run(
                name,
                std::time::Duration::from_secs(publish_interval.max(1)),
                lifecycle,
                setup_failures,
                config,
                duration.map(std::time::Duration::from_secs),
            )
            .await
        }
        Command::Decode { name, path } => decode(&name, &path).await,
    }
}

async fn run(
    name: String,
    publish_interval: std::time::Duration,
    lifecycle: LifecycleConfig,
    setup_failures: u32,
    config: TaskConfig,
    duration: Option<std::time::Duration>,
) -> eyre::Result<()> {
    let lifecycle = TaskLifecycle::<Time, _>::new(
        SimulatedSensors::new(setup_failures),
        TaggedValueStore::with_name(name),
    )
    .with_config(lifecycle);

    let mut task = TelemetryTask::new(lifecycle, config);
    let store = task.store();
    let stop = task
        .stop_handle()
        .ok_or_else(|| eyre!("stop handle already taken"))?;
    let handle = task
        .init(&Spawner)
        .wrap_err("starting the telemetry task")?;

    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    let mut deadline = std::pin::pin!(deadline);
    let mut publish = tokio::time::interval(publish_interval);
    publish.tick().await;

    loop {
        tokio::select! {
            _ = publish.tick() => {
                println!("{}", codec::encode_to_string(&store));
            }
            result = tokio::signal::ctrl_c() => {
                result.wrap_err("waiting for Ctrl-C")?;
                tracing::info!("received Ctrl-C, shutting down");
                break;
            }
            () = &mut deadline => {
                tracing::info!("run duration elapsed, shutting down");
                break;
            }
        }
    }

    stop.stop();
    tokio::task::spawn_blocking(move || handle.join())
        .await?
        .map_err(|_| eyre!("telemetry thread panicked"))?;

    // Final snapshot so short runs still produce output.
    println!("{}", codec::encode_to_string(&store));
    Ok(())
}

async fn decode(name: &str, path: &Path) -> eyre::Result<()> {
    let text = if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .wrap_err("reading document from stdin")?;
        text
    } else {
        tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("reading document from {}", path.display()))?
    };

    let store = decode_str(name, &text);
    if store.is_empty() {
        tracing::warn!(name, "document holds no readings for this store");
        return Ok(());
    }

    for tag in Tag::ALL {
        let reading = store.get(tag).unwrap_or_default();
        println!("{tag:<10} {:>12} {}", reading.timestamp().as_secs(), reading.value());
    }
    Ok(())
}
