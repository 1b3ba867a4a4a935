// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use pose_visibility::cli::args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict(args) => {
            if let Err(e) = pose_visibility::cli::predict::run_prediction(&args) {
                pose_visibility::error!("{e}");
                process::exit(1);
            }
        }
    }
}
