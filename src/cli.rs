//! Command-line interface implementation for pyskel.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, Args as ClapArgs, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments structure for pyskel.
#[derive(Parser, Debug)]
#[command(author, version, about = "pyskel: post-generation resolution for python package skeletons", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a skeleton template and materialize the result
    Generate {
        /// Path to the skeleton template directory
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Directory where the generated project will be created
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Force overwrite of existing output directory
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        answers: AnswerArgs,
    },

    /// Materialize an already rendered project in place
    Materialize {
        /// Root of the rendered project
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,

        /// The project was materialized before; skip paths that are already gone
        #[arg(long)]
        again: bool,

        #[command(flatten)]
        answers: AnswerArgs,
    },

    /// Show the rules that would fire, without touching any files
    Plan {
        #[command(flatten)]
        answers: AnswerArgs,
    },

    /// Render and materialize every combination of options and check the results
    Matrix {
        /// Path to the skeleton template directory
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Vary only this option over the listed values (KEY=V1,V2). Repeatable.
        /// Without it, every closed-set option is varied over all its values.
        #[arg(long, value_name = "KEY=VALUES")]
        vary: Vec<String>,

        /// Run combinations in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Command to run inside every materialized project; must exit with 0
        #[arg(last = true, value_name = "COMMAND")]
        command: Vec<String>,
    },
}

/// Sources of option overrides shared by the subcommands.
#[derive(ClapArgs, Debug, Default)]
pub struct AnswerArgs {
    /// Answers file (JSON or YAML), or a directory containing one
    #[arg(short, long, value_name = "FILE")]
    pub answers: Option<PathBuf>,

    /// Read answers as JSON or YAML from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Override a single option (KEY=VALUE). Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Prompt for every option that was not supplied
    #[arg(short, long)]
    pub interactive: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if no subcommand or a required argument is missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::MissingSubcommand
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
