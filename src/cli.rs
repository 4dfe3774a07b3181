use crate::generator::{generate, GeneratorConfig, DEFAULT_ENTRY_FILE};
use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// swagdoc - Generate a Swagger 2.0 document from annotated Rust doc comments
#[derive(Parser, Debug)]
#[command(name = "swagdoc")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Rust project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// File holding the API metadata, relative to the project directory
    #[arg(short = 'm', long = "main", value_name = "FILE", default_value = DEFAULT_ENTRY_FILE)]
    pub entry_file: PathBuf,

    /// Path component to skip while scanning (repeatable); `target` and `vendor` are always skipped
    #[arg(short = 'e', long = "exclude", value_name = "NAME")]
    pub excludes: Vec<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Fail when any directive line could not be parsed
    #[arg(long = "strict")]
    pub strict: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Entry file: {}", args.entry_file.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) => info!("Output file: {}", output.display()),
        None => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting Swagger document generation...");

    let config = GeneratorConfig::new(args.project_path.clone())
        .with_entry_file(args.entry_file.clone())
        .with_excludes(args.excludes.clone());
    let generation = generate(&config).with_context(|| {
        format!(
            "Failed to generate documentation for {}",
            args.project_path.display()
        )
    })?;

    let diagnostics = &generation.diagnostics;
    for name in diagnostics.unresolved_references() {
        warn!("Unresolved reference: @{}", name);
    }
    if diagnostics.route_collisions() > 0 {
        warn!(
            "{} operations replaced an earlier one with the same route and method",
            diagnostics.route_collisions()
        );
    }
    if diagnostics.definition_collisions() > 0 {
        warn!(
            "{} definitions replaced an earlier one with the same name",
            diagnostics.definition_collisions()
        );
    }
    if args.strict && !diagnostics.is_empty() {
        anyhow::bail!(
            "{} directive lines could not be parsed (--strict)",
            diagnostics.entries().len()
        );
    }

    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&generation.specification)?,
        OutputFormat::Json => serialize_json(&generation.specification)?,
    };

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    let spec = &generation.specification;
    info!("Generation complete!");
    info!("Summary:");
    info!("  - Paths: {}", spec.paths.len());
    info!("  - Definitions: {}", spec.definitions.len());
    info!("  - Skipped directive lines: {}", diagnostics.entries().len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["swagdoc"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = args(&["./project"]);
        assert_eq!(args.project_path, PathBuf::from("./project"));
        assert_eq!(args.entry_file, PathBuf::from("src/main.rs"));
        assert!(args.excludes.is_empty());
        assert!(matches!(args.output_format, OutputFormat::Json));
        assert!(args.output_path.is_none());
        assert!(!args.strict);
    }

    #[test]
    fn test_all_options() {
        let args = args(&[
            "./project", "-m", "src/bin/api.rs", "-e", "generated", "--exclude", "fixtures",
            "-f", "yaml", "-o", "swagger.yaml", "-v", "--strict",
        ]);
        assert_eq!(args.entry_file, PathBuf::from("src/bin/api.rs"));
        assert_eq!(args.excludes, vec!["generated", "fixtures"]);
        assert!(matches!(args.output_format, OutputFormat::Yaml));
        assert_eq!(args.output_path, Some(PathBuf::from("swagger.yaml")));
        assert!(args.verbose);
        assert!(args.strict);
    }

    #[test]
    fn test_missing_project_path_is_rejected() {
        let args = args(&["/nonexistent/swagdoc/project"]);
        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_strict_fails_on_diagnostics() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/main.rs"),
            "/// @Router nowhere\nfn handler() {}\nfn main() {}",
        )
        .unwrap();
        let output = dir.path().join("out.json");
        let project = dir.path().to_str().unwrap();
        let output_arg = output.to_str().unwrap();

        assert!(run(args(&[project, "--strict", "-o", output_arg])).is_err());
        assert!(!output.exists());

        run(args(&[project, "-o", output_arg])).unwrap();
        assert!(output.exists());
    }
}
