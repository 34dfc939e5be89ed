// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Developer CLI for the instance-config core: validate a saved config
//! document, render it to HCL, or dump the document schema the editor
//! persists against.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use blueprint_config::{validate, InstanceConfig};
use clap::{Parser, Subcommand};
use slog::{info, o, warn, Drain, Level, Logger};

#[derive(Debug, Parser)]
#[clap(about, version)]
/// Inspect and render instance configuration documents
struct Opt {
    /// Enable debugging
    #[clap(short, long, action)]
    debug: bool,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check a config document against the pre-save rules
    Validate {
        /// Path to a JSON InstanceConfig document
        #[clap(short, long, action)]
        config: PathBuf,
    },

    /// Render a config document as an aws_instance resource block
    Emit {
        /// Path to a JSON InstanceConfig document
        #[clap(short, long, action)]
        config: PathBuf,

        /// Render even when validation fails (best-effort preview)
        #[clap(long, action)]
        force: bool,
    },

    /// Print the JSON schema for InstanceConfig documents
    Schema,
}

/// Create a top-level logger that outputs to stderr
fn create_logger(opt: &Opt) -> Logger {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let level = if opt.debug { Level::Debug } else { Level::Info };
    let drain = slog::LevelFilter(drain, level).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(drain, o!())
}

fn load_config(path: &Path) -> anyhow::Result<InstanceConfig> {
    let file = File::open(path)
        .with_context(|| format!("opening config file {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();
    let log = create_logger(&opt);

    match opt.cmd {
        Command::Validate { config } => {
            let config = load_config(&config)?;
            let errors = validate(&config);
            if errors.is_empty() {
                info!(log, "config is valid"; "name" => %config.name);
            } else {
                for error in &errors {
                    warn!(log, "{}", error);
                }
                bail!("{} validation error(s)", errors.len());
            }
        }
        Command::Emit { config, force } => {
            let config = load_config(&config)?;
            let errors = validate(&config);
            if !errors.is_empty() {
                for error in &errors {
                    warn!(log, "{}", error);
                }
                if !force {
                    bail!(
                        "refusing to render an invalid config \
                         (pass --force for a best-effort preview)"
                    );
                }
            }
            print!("{}", blueprint_hcl::serialize(&config));
        }
        Command::Schema => {
            let schema = schemars::schema_for!(InstanceConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}
