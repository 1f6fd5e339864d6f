//! Filename Parser - command-line host
//!
//! Runs the parser against files given on the command line, much like a comic
//! library host would run it against selected books:
//!
//! - `parse FILES...` fills in-memory books from their file names and prints them as YAML
//! - `config show | path | test SAMPLE...` inspects the stored configuration
//! - `configure [options]` edits the stored configuration and saves it
//!
//! Messages meant for the user (update counts, parse errors) go to stderr; the
//! YAML output of `parse` and `config show` goes to stdout.

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use filename_parser::config::render_config_document;
use filename_parser::{
    APP_NAME, Book, ConfigEditor, ConfigStore, ConfigureOutcome, EditorAction, FilenameParser,
    MessageSink, VERSION,
};
use std::fs;

/// Fill comic metadata (series, number, title, year...) from file names
#[derive(Parser)]
#[command(name = "filename-parser")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding config.yaml
    #[arg(long, global = true, default_value = ".filename-parser")]
    config_dir: Utf8PathBuf,

    /// Debug-level logging, also echoed to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse file names and print the resulting book fields
    Parse {
        /// Book files (only the names are used)
        files: Vec<String>,
    },

    /// Inspect the stored configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Edit and save the stored configuration
    Configure(ConfigureArgs),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Show what each sample would match
    Test {
        samples: Vec<String>,
    },
}

#[derive(Args)]
struct ConfigureArgs {
    /// Replace all patterns with the lines of this file
    #[arg(long)]
    patterns_file: Option<Utf8PathBuf>,

    /// Append a pattern (repeatable)
    #[arg(long = "add-pattern")]
    add_patterns: Vec<String>,

    #[arg(long)]
    overwrite: Option<bool>,

    #[arg(long)]
    strip_extension: Option<bool>,

    #[arg(long)]
    normalize_underscores: Option<bool>,

    #[arg(long)]
    strip_leading_zeros: Option<bool>,

    /// Preview a sample against the edited configuration (repeatable)
    #[arg(long = "test")]
    tests: Vec<String>,

    /// Show previews without saving
    #[arg(long)]
    dry_run: bool,
}

/// Prints user-facing messages to stderr.
struct ConsoleSink;

impl MessageSink for ConsoleSink {
    fn show(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = ConfigStore::new(&cli.config_dir)
        .with_context(|| format!("Cannot use config directory {}", cli.config_dir))?;
    let _log_guard = filename_parser::logging::setup_logging(
        &store.config_dir().join("logs"),
        APP_NAME,
        cli.verbose,
        cli.verbose,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let parser = FilenameParser::new(store);
    match cli.command {
        Commands::Parse { files } => run_parse(&parser, files),
        Commands::Config(command) => run_config(&parser, command),
        Commands::Configure(args) => run_configure(&parser, args),
    }
}

fn run_parse(parser: &FilenameParser, files: Vec<String>) -> Result<()> {
    let mut books: Vec<Book> = files.into_iter().map(Book::from_path).collect();

    parser.parse(&mut books, &mut ConsoleSink);

    if !books.is_empty() {
        let yaml = serde_yaml_ng::to_string(&books).context("Failed to serialize books")?;
        print!("{}", yaml);
    }
    Ok(())
}

fn run_config(parser: &FilenameParser, command: ConfigCommand) -> Result<()> {
    let store = parser.store();
    match command {
        ConfigCommand::Show => {
            let yaml = render_config_document(&store.load())?;
            print!("{}", yaml);
        }
        ConfigCommand::Path => println!("{}", store.config_path()),
        ConfigCommand::Test { samples } => {
            let editor = ConfigEditor::from_config(&store.load());
            for sample in samples {
                println!("{}: {}", sample, editor.test(&sample));
            }
        }
    }
    Ok(())
}

fn run_configure(parser: &FilenameParser, args: ConfigureArgs) -> Result<()> {
    let pattern_text = args
        .patterns_file
        .as_ref()
        .map(|path| {
            fs::read_to_string(path).with_context(|| format!("Failed to read patterns file {}", path))
        })
        .transpose()?;

    let outcome = parser.configure(&mut ConsoleSink, |editor| {
        if let Some(text) = pattern_text {
            editor.set_pattern_text(text);
        }
        for pattern in &args.add_patterns {
            editor.add_pattern(pattern);
        }
        if let Some(value) = args.overwrite {
            editor.overwrite = value;
        }
        if let Some(value) = args.strip_extension {
            editor.strip_extension = value;
        }
        if let Some(value) = args.normalize_underscores {
            editor.normalize_underscores = value;
        }
        if let Some(value) = args.strip_leading_zeros {
            editor.strip_leading_zeros = value;
        }

        for (pattern, error) in editor.invalid_patterns() {
            eprintln!("Pattern will be skipped when matching: {}\n{}", pattern, error);
        }
        for sample in &args.tests {
            println!("{}: {}", sample, editor.test(sample));
        }

        if args.dry_run {
            EditorAction::Cancel
        } else {
            EditorAction::Save
        }
    });

    match outcome {
        ConfigureOutcome::Saved(config) => {
            println!(
                "Saved {} pattern(s) to {}",
                config.patterns.len(),
                parser.store().config_path()
            );
            Ok(())
        }
        ConfigureOutcome::Cancelled => Ok(()),
        ConfigureOutcome::SaveFailed => anyhow::bail!("Configuration was not saved"),
    }
}
