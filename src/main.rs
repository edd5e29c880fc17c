mod logging;
mod model;
mod panels;
mod report;
mod session;
mod shell;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use clap::Parser;

use crate::model::seed::seed_inventory;
use crate::model::volume::{DEFAULT_CELL_COUNT_MILLIONS, MIN_CELL_COUNT_MILLIONS};
use crate::session::{Session, StockPolicy};
use crate::shell::{Shell, ShellConfig, ShellError, import_inventory, run_interactive, run_script};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("--cell-count must be at least 0.1, got {0}")]
    CellCount(f64),
    #[error("cannot open script {path}: {source}")]
    Script {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot load inventory {path}: {source}")]
    Inventory {
        path: PathBuf,
        source: ShellError,
    },
    #[error(transparent)]
    Shell(#[from] ShellError),
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "kira-abpanel",
    version,
    about = "Antibody inventory and panel builder for cytometry staining"
)]
struct Cli {
    /// Log in as NAME instead of prompting.
    #[arg(long, value_name = "NAME")]
    user: Option<String>,

    /// Seed the inventory from a CSV export instead of the built-in reagents.
    #[arg(long, value_name = "CSV")]
    inventory: Option<PathBuf>,

    /// Read commands from FILE instead of an interactive prompt.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Default directory for `export` and `export-history`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    out: PathBuf,

    /// Initial cell count (millions) for the build view.
    #[arg(long, default_value_t = DEFAULT_CELL_COUNT_MILLIONS)]
    cell_count: f64,

    #[arg(long, value_enum, default_value_t = StockPolicy::Allow)]
    stock_policy: StockPolicy,

    /// Log level for stderr output; RUST_LOG overrides it.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "session aborted");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut shell = build_shell(&cli)?;

    match &cli.script {
        Some(path) => {
            let file = File::open(path).map_err(|source| AppError::Script {
                path: path.clone(),
                source,
            })?;
            tracing::info!(script = %path.display(), "running script");
            run_script(&mut shell, BufReader::new(file), io::stdout().lock())?;
        }
        None => run_interactive(&mut shell)?,
    }
    tracing::info!(
        executed = shell.session().history().len(),
        saved = shell.session().saved_panels().len(),
        "session ended"
    );
    Ok(())
}

fn build_shell(cli: &Cli) -> Result<Shell, AppError> {
    if !cli.cell_count.is_finite() || cli.cell_count < MIN_CELL_COUNT_MILLIONS {
        return Err(AppError::CellCount(cli.cell_count));
    }

    let inventory = match &cli.inventory {
        Some(path) => import_inventory(path).map_err(|source| AppError::Inventory {
            path: path.clone(),
            source,
        })?,
        None => seed_inventory(),
    };
    tracing::info!(records = inventory.len(), "inventory ready");

    let mut session = Session::new(inventory, cli.stock_policy);
    if let Some(user) = &cli.user {
        if let Err(err) = session.login(user) {
            tracing::warn!(error = %err, "ignoring --user; prompting for a name");
        }
    }

    Ok(Shell::new(
        session,
        ShellConfig {
            out_dir: cli.out.clone(),
            cell_count: cli.cell_count,
        },
    ))
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
