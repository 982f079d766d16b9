//! pyskel's main application entry point and orchestration logic.
//! Handles command-line argument parsing and coordinates the configuration
//! model, the skeleton renderer, the rule engine and the validation harness.

use std::path::{Path, PathBuf};

use pyskel::{
    answers::{load_answers_file, load_from_stdin, merge, parse_assignment},
    cli::{get_args, AnswerArgs, Args, Commands},
    config::{OptionModel, Overrides},
    error::{default_error_handler, Error, Result},
    harness::{full_space, CombinationSpace, ExternalCommand, Harness},
    logger::init_logger,
    materialize::Materializer,
    prompt::{prompt_missing, DialoguerPrompter},
    renderer::MiniJinjaRenderer,
    rules::RuleSet,
    skeleton::Skeleton,
    tree::ProjectTree,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to write to.
///
/// An existing directory is only accepted with `force`; its files are then
/// overwritten in place, nothing is removed.
///
/// # Errors
/// * `Error::TemplateError` if the directory exists and `force` is false
/// * `Error::TemplateError` if the directory is the template directory or lies inside it
pub fn get_output_dir<P: AsRef<Path>, T: AsRef<Path>>(
    output_dir: P,
    template: T,
    force: bool,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if std::path::absolute(output_dir)?.starts_with(std::path::absolute(template.as_ref())?) {
        return Err(Error::TemplateError(format!(
            "output directory '{}' must not be inside the template directory",
            output_dir.display()
        )));
    }
    if output_dir.exists() && !force {
        return Err(Error::TemplateError(format!(
            "output directory '{}' already exists, use --force to overwrite",
            output_dir.display()
        )));
    }
    Ok(output_dir.to_path_buf())
}

/// Collects overrides from every source given on the command line.
///
/// Precedence, lowest first: answers file, stdin, `--set` pairs, interactive prompts.
fn collect_overrides(args: &AnswerArgs, model: &OptionModel) -> Result<Overrides> {
    let mut overrides = match &args.answers {
        Some(path) => load_answers_file(path)?,
        None => Overrides::new(),
    };
    if args.stdin {
        overrides = merge(overrides, load_from_stdin()?);
    }
    for assignment in &args.set {
        let (key, value) = parse_assignment(assignment)?;
        overrides.insert(key, value);
    }
    if args.interactive {
        overrides = prompt_missing(&DialoguerPrompter::new(), model, overrides)?;
    }
    Ok(overrides)
}

/// Parses `--vary KEY=V1,V2` arguments into a combination space.
fn parse_space(vary: &[String]) -> Result<CombinationSpace> {
    let mut space = CombinationSpace::new();
    for entry in vary {
        let (key, values) = parse_assignment(entry)?;
        space.insert(key, values.split(',').map(|v| v.trim().to_string()).collect());
    }
    Ok(space)
}

/// Main application logic execution.
///
/// # Flow
/// 1. Builds the option model and rule table once
/// 2. Collects overrides from files, stdin, `--set` and prompts
/// 3. Dispatches to the selected subcommand
fn run(args: Args) -> Result<()> {
    let materializer = Materializer::new(OptionModel::standard(), RuleSet::standard());

    match args.command {
        Commands::Generate { template, output_dir, force, answers } => {
            let overrides = collect_overrides(&answers, materializer.model())?;
            let config = materializer.resolve(&overrides)?;
            let output_root = get_output_dir(output_dir, &template, force)?;

            let renderer = MiniJinjaRenderer::new();
            let skeleton = Skeleton::new(&renderer, &template)?;
            let mut tree = skeleton.render_into(&config, &output_root)?;
            let report = materializer.materialize_resolved(&mut tree, &config)?;

            for rule in &report.fired {
                println!("applied: '{rule}'");
            }
            println!("Project generation completed successfully in {}.", output_root.display());
        }
        Commands::Materialize { project_dir, again, answers } => {
            let overrides = collect_overrides(&answers, materializer.model())?;
            let config = materializer.resolve(&overrides)?;
            let mut tree = if again {
                ProjectTree::open_materialized(&project_dir)?
            } else {
                ProjectTree::open(&project_dir)?
            };
            let report = materializer.materialize_resolved(&mut tree, &config)?;

            for rule in &report.fired {
                println!("applied: '{rule}'");
            }
            println!(
                "Materialized {}: {} path(s) removed, {} file(s) rewritten.",
                project_dir.display(),
                report.removed,
                report.rewritten
            );
        }
        Commands::Plan { answers } => {
            let overrides = collect_overrides(&answers, materializer.model())?;
            for rule in materializer.plan(&overrides)? {
                let actions: Vec<String> = rule.actions.iter().map(|a| a.to_string()).collect();
                println!("{}: {}", rule.name, actions.join(", "));
            }
        }
        Commands::Matrix { template, vary, parallel, command } => {
            let space = if vary.is_empty() {
                full_space(materializer.model())
            } else {
                parse_space(&vary)?
            };

            let renderer = MiniJinjaRenderer::new();
            let mut harness = Harness::new(Skeleton::new(&renderer, &template)?, &materializer);
            if let Some((program, rest)) = command.split_first() {
                harness = harness.with_external(ExternalCommand::new(program.as_str(), rest.to_vec()));
            }

            let report = if parallel { harness.run_parallel(&space) } else { harness.run(&space) };
            for combination in &report.combinations {
                println!("{combination}");
            }

            let failed = report.failures().count();
            if failed > 0 {
                return Err(Error::CheckFailed(format!(
                    "{failed} of {} combination(s) failed",
                    report.combinations.len()
                )));
            }
            println!("All {} combination(s) passed.", report.combinations.len());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyskel::answers::parse_answers;

    #[test]
    fn test_get_output_dir_never_clears() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let template = temp_dir.path().join("skeleton");
        let output = temp_dir.path().join("out");
        std::fs::create_dir_all(&template).unwrap();
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("keep.txt"), "x").unwrap();

        assert!(get_output_dir(&output, &template, false).is_err());
        assert_eq!(get_output_dir(&output, &template, true).unwrap(), output);
        assert!(output.join("keep.txt").exists());
        assert!(get_output_dir(temp_dir.path().join("new"), &template, false).is_ok());
    }

    #[test]
    fn test_get_output_dir_refuses_template_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let template = temp_dir.path().join("skeleton");
        std::fs::create_dir_all(&template).unwrap();

        assert!(get_output_dir(&template, &template, true).is_err());
        assert!(get_output_dir(template.join("nested"), &template, true).is_err());
        assert!(template.is_dir());
    }

    #[test]
    fn test_parse_space() {
        let space = parse_space(&["license=MIT License, Other".to_string()]).unwrap();
        assert_eq!(space["license"], vec!["MIT License", "Other"]);
        assert!(parse_space(&["license".to_string()]).is_err());
    }

    #[test]
    fn test_answers_then_set_precedence() {
        let mut overrides = parse_answers("{\"license\": \"Other\", \"have_tests\": true}").unwrap();
        let (key, value) = parse_assignment("license=MIT License").unwrap();
        overrides.insert(key, value);
        assert_eq!(overrides["license"], "MIT License");
        assert_eq!(overrides["have_tests"], "y");
    }
}
