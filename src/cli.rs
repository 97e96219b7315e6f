//! Minimal CLI: schema file(s) → (go | json)
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use colored::Colorize;

use crate::record::Record;
use crate::resolve::{DEFAULT_MAX_DEPTH, Resolver, ResolverConfig};
use crate::schema::SchemaDocument;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate struct definitions from a JSON (Hyper-)Schema
#[derive(Parser, Debug)]
#[command(name = "schema2struct", version)]
pub struct CommandLineInterface {
    /// One or more schema files. May be literal paths or quoted glob patterns
    #[arg(short = 'f', long = "file", num_args = 1.., required = true, value_parser = NonEmptyStringValueParser::new())]
    files: Vec<String>,

    /// output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Go)]
    format: OutputFormat,

    /// expand `$ref`s to object schemas into nested structs
    #[arg(long, default_value_t = false)]
    expand_refs: bool,

    /// deepest struct nesting allowed before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Go,
    Json,
}

/// Whether every file and property made it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Partial,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            max_depth: self.max_depth,
            expand_refs: self.expand_refs,
        }
    }

    /// Resolve every input and write what succeeded. Failures are reported on
    /// stderr per file / per property and turn the outcome `Partial`.
    pub fn run(&self) -> Result<Outcome> {
        let source_paths = resolve_file_path_patterns(&self.files)
            .context("failed to resolve input file paths")?;

        let mut outcome = Outcome::Clean;
        let mut records = Vec::<Record>::new();
        for source_path in source_paths {
            let doc = match SchemaDocument::from_file(&source_path) {
                Ok(doc) => doc,
                Err(error) => {
                    report(&error.to_string());
                    outcome = Outcome::Partial;
                    continue;
                }
            };
            tracing::debug!(origin = doc.origin(), "loaded schema");
            let resolver = Resolver::with_config(&doc, self.resolver_config());
            for (key, result) in resolver.resolve_document() {
                match result {
                    Ok(record) => records.push(record),
                    Err(error) => {
                        report(&format!("{}: property `{key}`: {error}", doc.origin()));
                        outcome = Outcome::Partial;
                    }
                }
            }
        }

        let rendered = match self.format {
            OutputFormat::Go => crate::render::go(&records),
            OutputFormat::Json => {
                crate::render::json(&records).context("failed to serialize records")?
            }
        };

        if let Some(out) = self.out.as_ref() {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, &rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
        } else {
            print!("{rendered}");
        }
        Ok(outcome)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn report(message: &str) {
    eprintln!("{} {message}", "error:".red().bold());
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched: Vec<PathBuf> = glob::glob(pattern)
                .with_context(|| format!("invalid glob pattern: {pattern}"))?
                .collect::<Result<_, _>>()?;
            if matched.is_empty() {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
            matched.sort();
            out.append(&mut matched);
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_flag_is_required_and_non_empty() {
        assert!(CommandLineInterface::try_parse_from(["schema2struct"]).is_err());
        assert!(CommandLineInterface::try_parse_from(["schema2struct", "-f", ""]).is_err());
        assert!(CommandLineInterface::try_parse_from(["schema2struct", "-f"]).is_err());
    }

    #[test]
    fn flags_map_to_resolver_config() {
        let cli = CommandLineInterface::try_parse_from([
            "schema2struct", "-f", "a.json", "--expand-refs", "--max-depth", "4", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.resolver_config(), ResolverConfig { max_depth: 4, expand_refs: true });
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.files, ["a.json"]);
    }

    #[test]
    fn defaults() {
        let cli = CommandLineInterface::try_parse_from(["schema2struct", "-f", "a.json"]).unwrap();
        assert_eq!(cli.resolver_config(), ResolverConfig::default());
        assert_eq!(cli.format, OutputFormat::Go);
        assert!(!cli.verbose());
    }

    #[test]
    fn glob_patterns_expand_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "c.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        let pattern = format!("{}/*.json", dir.path().display());
        let paths = resolve_file_path_patterns([pattern.as_str(), "literal.json"]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.json", "b.json", "literal.json"]);

        let missing = format!("{}/*.yaml", dir.path().display());
        assert!(resolve_file_path_patterns([missing]).is_err());
    }
}
