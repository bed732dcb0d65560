// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use tally::commands::bump::BumpCommand;
use tally::commands::current::CurrentCommand;
use tally::commands::init::InitCommand;
use tally::commands::stress::StressCommand;
use tally::config::new_tally_config;
use tally::error::{Result, format_error_chain, get_exit_code};
use tally::logging;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "File-backed counter coordination for worker fleets", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Increment a counter and print the committed value
    #[command(visible_alias = "b")]
    Bump {
        /// Counter name (relative names resolve under the counters directory)
        resource: String,

        /// Number of sequential increments to perform
        #[arg(long, default_value_t = 1)]
        count: u64,

        /// Override the configured lock retry count
        #[arg(long, value_name = "N")]
        retries: Option<u32>,

        /// Override the configured maximum backoff between retries
        #[arg(long, value_name = "MS")]
        max_backoff_ms: Option<u64>,
    },

    /// Show the committed value of a counter without incrementing it
    Current {
        /// Counter name
        resource: String,

        /// Show only the numeric value
        #[arg(short = 'q', long)]
        quiet: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Initialize a counter to 0
    Init {
        /// Counter name
        resource: String,

        /// Reinitialize even if the counter already exists
        #[arg(short, long)]
        force: bool,
    },

    /// Hammer a counter with concurrent workers and report consistency
    Stress {
        /// Counter name
        resource: String,

        /// Number of worker threads
        #[arg(long, default_value_t = 8)]
        workers: usize,

        /// Increments per worker
        #[arg(long, default_value_t = 25)]
        iterations: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let config = match new_tally_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error_chain(&e));
            std::process::exit(get_exit_code(&e));
        }
    };

    let result: Result<()> = (|| {
        match cli.command {
            Commands::Bump {
                resource,
                count,
                retries,
                max_backoff_ms,
            } => {
                let command = BumpCommand::new(&config)?;
                command.execute(&resource, count, retries, max_backoff_ms)
            }
            Commands::Current {
                resource,
                quiet,
                json,
            } => {
                let command = CurrentCommand::new(&config)?;
                command.execute(&resource, quiet, json)
            }
            Commands::Init { resource, force } => {
                let command = InitCommand::new(&config)?;
                command.execute(&resource, force)
            }
            Commands::Stress {
                resource,
                workers,
                iterations,
            } => {
                let command = StressCommand::new(&config)?;
                command.execute(&resource, workers, iterations)
            }
        }
    })();

    if let Err(e) = result {
        eprintln!("{}", format_error_chain(&e));
        std::process::exit(get_exit_code(&e));
    }
}
