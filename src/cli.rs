//! Command line surface: generate | check.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ------------------------------- Types ------------------------------------ //

/// render schema-evolution documents as Spark SQL ALTER TABLE statements
#[derive(Parser, Debug)]
#[command(name = "sparkddl", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate ALTER TABLE statements from evolution documents
    Generate(GenerateOut),
    /// parse and generate, report statement counts, discard the output
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer selecting the operation list inside each document
    /// (e.g. /spec/evolution)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// `;`-terminated statements separated by blank lines
    Sql,
    /// pretty-printed JSON array of statement strings
    Json,
}

#[derive(Args, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// substitute the {table_name} placeholder in every statement
    #[arg(long)]
    table_name: Option<String>,

    #[arg(long, value_enum, default_value = "sql")]
    format: OutputFormat,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ---------------------------- Implementation ------------------------------ //

impl InputSettings {
    /// Statements per resolved source file, in input order.
    fn load_statements(&self) -> anyhow::Result<Vec<(PathBuf, Vec<String>)>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut results = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let operations =
                crate::input::evolution_from_path(&source_path, self.json_pointer.as_deref())
                    .with_context(|| format!("failed to load {}", source_path.display()))?;
            let statements = crate::emit::generate_statements(&operations)
                .with_context(|| format!("failed to generate DDL for {}", source_path.display()))?;
            results.push((source_path, statements));
        }
        Ok(results)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let mut statements = Vec::new();
                for (_, batch) in target.input_settings.load_statements()? {
                    statements.extend(batch);
                }
                if let Some(table_name) = target.table_name.as_deref() {
                    statements = statements
                        .iter()
                        .map(|s| crate::emit::substitute_table_name(s, table_name))
                        .collect();
                }

                let rendered = match target.format {
                    OutputFormat::Sql => statements
                        .iter()
                        .map(|s| format!("{s};"))
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                    OutputFormat::Json => serde_json::to_string_pretty(&statements)?,
                };

                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {}", parent.display()))?;
                        }
                        std::fs::write(out, &rendered)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{rendered}"),
                }
            }
            Command::Check(target) => {
                for (source_path, statements) in target.input_settings.load_statements()? {
                    println!("{}: {} statement(s)", source_path.display(), statements.len());
                }
            }
        }
        Ok(())
    }
}

// --------------------------- Internal helpers ----------------------------- //

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            // A pattern that was explicitly a glob but matched nothing is
            // an error, not an empty run.
            anyhow::ensure!(matched_any, "glob pattern matched no files: {pattern}");
        } else {
            out.push(PathBuf::from(pattern));
        }
    }
    Ok(out)
}
