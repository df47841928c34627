mod cli;
mod error_fmt;
mod run;

use std::fs;
use std::path::Path;

use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    let _ = color_eyre::install();

    match real_main(&args) {
        Ok(()) => {}
        Err(err) => {
            if JSON_MODE.get().copied().unwrap_or(false) {
                eprintln!("{}", format_error_json(&err));
            } else {
                eprintln!("Error: {}", humanize(&err));
            }
            std::process::exit(exit_code_for_error(&err));
        }
    }
}

fn real_main(args: &Cli) -> eyre::Result<()> {
    let text = fs::read_to_string(&args.config)
        .wrap_err_with(|| format!("read config {:?}", args.config))?;
    let cfg = binsort_config::load_toml(&text)
        .map_err(|e| eyre::eyre!("parse config {:?}: {}", args.config, e))?;
    cfg.validate().wrap_err("invalid configuration")?;

    init_logging(args, &cfg.logging);

    match &args.cmd {
        Commands::Run { max_cycles } => {
            let snapshot = run::run_loop(&cfg, *max_cycles)?;
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "wet_count": snapshot.wet_count,
                        "dry_count": snapshot.dry_count,
                        "wet_full": snapshot.wet_full,
                        "dry_full": snapshot.dry_full,
                    })
                );
            } else {
                println!(
                    "Sorted totals: wet={} dry={} (wet_full={}, dry_full={})",
                    snapshot.wet_count, snapshot.dry_count, snapshot.wet_full, snapshot.dry_full
                );
            }
        }
        Commands::SelfCheck => {
            run::self_check(&cfg)?;
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "self_check": "ok", "backend": run::backend_name() })
                );
            } else {
                println!("self-check: ok (backend={})", run::backend_name());
            }
        }
        Commands::Health => {
            // Config already parsed and validated above; report identity.
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "health": "ok",
                        "backend": run::backend_name(),
                        "bin_name": cfg.telemetry.bin_name,
                    })
                );
            } else {
                println!(
                    "health: ok (backend={}, bin={:?})",
                    run::backend_name(),
                    cfg.telemetry.bin_name
                );
            }
        }
    }
    Ok(())
}

/// Console layer honors `--log-level` (or RUST_LOG); an optional JSON-lines
/// file layer comes from `[logging]` in the config.
fn init_logging(args: &Cli, logging: &binsort_config::Logging) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    if args.json {
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed(),
        );
    } else {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed(),
        );
    }

    if let Some(file) = &logging.file {
        let path = Path::new(file);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path.file_name().unwrap_or_else(|| "binsort.log".as_ref());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .boxed(),
        );
    }

    let _ = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();
}
