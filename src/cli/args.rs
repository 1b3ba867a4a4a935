// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use clap::{Args, Parser, Subcommand};

/// Default pose landmark model filename.
pub const DEFAULT_MODEL: &str = "pose_landmark_full.onnx";

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Examples:
    pose-visibility predict --model pose_landmark_full.onnx --source frame.jpg
    pose-visibility predict -s frame.jpg --json
    pose-visibility predict -s frame.jpg --verbose false"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run pose detection and visibility classification on an image
    Predict(PredictArgs),
}

/// Arguments for the predict command.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Path to the ONNX pose landmark model
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Input image file
    #[arg(short, long)]
    pub source: String,

    /// Print the full landmark payload as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_predict_args_defaults() {
        let args = Cli::parse_from(["app", "predict", "--source", "frame.jpg"]);
        match args.command {
            Commands::Predict(predict_args) => {
                assert_eq!(predict_args.model, DEFAULT_MODEL);
                assert_eq!(predict_args.source, "frame.jpg");
                assert!(!predict_args.json);
                assert!(predict_args.verbose);
            }
        }
    }

    #[test]
    fn test_predict_args_custom() {
        let args = Cli::parse_from([
            "app",
            "predict",
            "--model",
            "custom.onnx",
            "--source",
            "test.jpg",
            "--json",
            "--verbose",
            "false",
        ]);
        match args.command {
            Commands::Predict(predict_args) => {
                assert_eq!(predict_args.model, "custom.onnx");
                assert_eq!(predict_args.source, "test.jpg");
                assert!(predict_args.json);
                assert!(!predict_args.verbose);
            }
        }
    }
}
