use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use bookworm_core::config::Configuration;
use bookworm_core::report::catalog::ReportId;
use bookworm_core::report::render;
use bookworm_core::rules::catalog::RuleId;

mod args;

fn main() -> Result<()> {
    let args = args::Args::parse();

    if args.list_reports || args.list_rules {
        if args.list_reports {
            for report in ReportId::ALL {
                println!("{report}\t{}", report.description());
            }
        }
        if args.list_rules {
            for rule in RuleId::ALL {
                println!("{rule}\t{}", rule.description());
            }
        }
        return Ok(());
    }

    let Some(name) = args.report.as_deref() else {
        bail!("no report given; pass --report NAME (see --list-reports)");
    };
    let report: ReportId = name.parse()?;

    let log_level = init_tracing(args.verbose);
    let config = match &args.config {
        Some(path) => Configuration::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Configuration::load().context("loading configuration")?,
    };
    if config.debug && !args.verbose {
        if let Some(handle) = &log_level {
            handle
                .reload(EnvFilter::new("debug"))
                .context("raising log level")?;
        }
    }
    config.validate().context("invalid configuration")?;

    let output = bookworm_core::run_report(&config, report)
        .with_context(|| format!("building report {report}"))?;

    let rendered = match args.format {
        args::OutputFormat::Plain => render::render_plain(&output),
        args::OutputFormat::Json => render::render_json(&output)?,
    };

    match args.out {
        Some(path) => std::fs::write(&path, &rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

type LevelHandle = reload::Handle<EnvFilter, Registry>;

/// Logs go to stderr; `RUST_LOG` wins over the default level.
///
/// Returns a handle for raising the level once the configuration is known,
/// or `None` when `RUST_LOG` fixed it.
fn init_tracing(verbose: bool) -> Option<LevelHandle> {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(if verbose { "debug" } else { "info" }), false),
    };
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
    (!from_env).then_some(handle)
}
