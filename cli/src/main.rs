//! word2backlog CLI - Word document to backlog item conversion
//!
//! Reads a heading-structured .docx file and writes the backlog items it
//! describes as JSON.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use word2backlog::{ConvertOptions, JsonFormat, LineEnding, WordParser};

/// Convert Word documents into backlog items
#[derive(Parser)]
#[command(
    name = "word2backlog",
    author = "iyulab",
    version,
    about = "Convert Word documents into backlog items",
    long_about = "word2backlog - split a Word document into backlog items.\n\n\
                  Each heading-styled paragraph starts an item; the paragraphs and\n\
                  pictures under it become the item's content."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document to backlog item JSON
    Convert {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Terminate content lines with CRLF
        #[arg(long)]
        crlf: bool,

        /// Emit the leading item even when nothing precedes the first heading
        #[arg(long)]
        keep_empty_preamble: bool,
    },

    /// List the styles a document defines
    Styles {
        /// Input file path
        input: PathBuf,

        /// Only show heading styles
        #[arg(long)]
        headings: bool,
    },

    /// Show item and picture counts for a document
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            compact,
            crlf,
            keep_empty_preamble,
        } => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let line_ending = if crlf { LineEnding::CrLf } else { LineEnding::Lf };
            let options = ConvertOptions::new()
                .with_json_format(format)
                .with_line_ending(line_ending)
                .with_keep_empty_preamble(keep_empty_preamble);

            let pb = create_spinner("Converting document...");
            let json = word2backlog::convert_file(&input, &options)?;
            pb.finish_and_clear();

            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Converted to backlog JSON: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Styles { input, headings } => {
            let parser = WordParser::open(&input)?;

            let mut styles: Vec<_> = parser
                .catalog()
                .iter()
                .filter(|(_, style)| !headings || style.is_heading())
                .collect();
            styles.sort_by(|a, b| a.0.cmp(b.0));

            println!("{}", "Styles".cyan().bold());
            println!("{}", "─".repeat(40));
            for (id, style) in styles {
                let marker = if style.is_heading() {
                    "heading".green().to_string()
                } else {
                    String::new()
                };
                println!(
                    "{:<24} {:<28} indent {} {}",
                    id.bold(),
                    style.display_name(),
                    style.indent_level(),
                    marker
                );
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing document...");
            let parser = WordParser::open(&input)?;
            let paragraphs = parser.paragraphs()?;
            let doc = parser.parse(&ConvertOptions::default())?;
            pb.finish_and_clear();

            println!("{}", "Document Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Main part".bold(), parser.main_document_path());
            println!("{}: {}", "Styles".bold(), parser.catalog().len());
            println!("{}: {}", "Paragraphs".bold(), paragraphs.len());

            println!("\n{}", "Backlog".cyan().bold());
            println!("{}", "─".repeat(40));
            println!("{}: {}", "Items".bold(), doc.items.len());
            println!("{}: {}", "Headings".bold(), doc.heading_count());
            println!("{}: {}", "Pictures".bold(), doc.picture_count());
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!(
        "{} {}",
        "word2backlog".green().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Word document to backlog item conversion");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            log::debug!("writing {} bytes to {}", content.len(), p.display());
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_args() {
        let cli = Cli::parse_from([
            "word2backlog",
            "-v",
            "convert",
            "in.docx",
            "-o",
            "out.json",
            "--compact",
            "--keep-empty-preamble",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Convert {
                input,
                output,
                compact,
                crlf,
                keep_empty_preamble,
            } => {
                assert_eq!(input, PathBuf::from("in.docx"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert!(compact);
                assert!(!crlf);
                assert!(keep_empty_preamble);
            }
            _ => panic!("expected convert"),
        }
    }
}
