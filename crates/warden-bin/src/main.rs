// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `wardend` entry point.

use clap::Parser;
use warden_bin::cli::{Cli, Commands};
use warden_bin::{commands, error, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.effective_command() {
        Commands::Run { secret, port } => {
            if let Err(err) = logging::init_logging(&cli.log_level, cli.log_format) {
                error::report_error_and_exit(err);
            }
            if let Err(err) = commands::run(&cli.config, secret, port).await {
                error::report_error_and_exit(err);
            }
        }
        Commands::GenSecret => commands::gen_secret(),
        Commands::Version => commands::version(),
    }
}
