//! Command-line tool for recovering unsaved Notepad text.
//!
//! # Usage
//!
//! Decode a single session file:
//! ```sh
//! tabstate /path/to/TabState/3f2a9c1e-....bin
//! ```
//!
//! Decode every main session file in a directory:
//! ```sh
//! tabstate /mnt/c/Users/me/AppData/Local/Packages/Microsoft.WindowsNotepad_8wekyb3d8bbwe/LocalState/TabState
//! ```
//!
//! Without a path, Notepad's TabState folder under `%LOCALAPPDATA%` is used.

use clap::{ArgAction, Parser};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabstate::batch::{FileOutcome, decode_all, process_directory};
use tabstate::notepad::detection::is_tabstate_candidate;
use tabstate::notepad::{DecodeOptions, DecodedDocument, decode_file, default_tabstate_dir, list_tabstate_files};
use tabstate::output::preview::truncate_chars;
use tabstate::output::{DEFAULT_OUTPUT_DIR, OutputWriter, Preview};
use tabstate::{Error, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Recover unsaved text from Windows Notepad TabState files
#[derive(Parser, Debug)]
#[command(
    name = "tabstate",
    about = "Recover unsaved text from Windows Notepad TabState files",
    long_about = "Scans Windows Notepad TabState session files (.bin) for UTF-16LE text and\n\
                  writes each recovered note to a Markdown file named after its first line.\n\
                  PATH may be a single .bin file or a TabState directory; numbered companion\n\
                  files (<guid>.0.bin, <guid>.1.bin, ...) are skipped.",
    version
)]
struct Args {
    /// TabState .bin file or directory
    ///
    /// Defaults to Notepad's TabState folder under %LOCALAPPDATA%.
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Directory decoded notes are written to
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// YAML file with decode options
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum characters in a text run
    #[arg(long, value_name = "CHARS")]
    min_run: Option<usize>,

    /// Printable ratio a whole-buffer fallback decode must exceed (0.0-1.0)
    #[arg(long, value_name = "RATIO")]
    min_ratio: Option<f64>,

    /// Also run the whole-buffer fallback when text runs were found
    #[arg(long)]
    exhaustive: bool,

    /// Do not fall back to single-byte ASCII strings
    #[arg(long)]
    strict: bool,

    /// Prepend a YAML block recording the source file
    #[arg(long)]
    front_matter: bool,

    /// Print recovered text instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Print the effective decode options as YAML and exit
    #[arg(long)]
    dump_config: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}

/// Install the stderr log subscriber; `RUST_LOG` overrides `-v`.
fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "tabstate=info",
        2 => "tabstate=debug",
        _ => "tabstate=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Decode options from the config file, overridden by command-line flags.
fn decode_options(args: &Args) -> Result<DecodeOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let yaml = fs::read_to_string(path).map_err(|e| Error::from_io(e, path))?;
            DecodeOptions::from_yaml_str(&yaml)?
        },
        None => DecodeOptions::default(),
    };

    if let Some(chars) = args.min_run {
        options = options.with_min_run_chars(chars);
    }
    if let Some(ratio) = args.min_ratio {
        options = options.with_min_printable_ratio(ratio);
    }
    if args.exhaustive {
        options = options.with_exhaustive(true);
    }
    if args.strict {
        options = options.with_ascii_fallback(false);
    }
    Ok(options)
}

fn run(args: &Args) -> Result<ExitCode> {
    let options = decode_options(args)?;

    if args.dump_config {
        print!("{}", options.to_yaml_string()?);
        return Ok(ExitCode::SUCCESS);
    }

    let target = match &args.path {
        Some(path) => path.clone(),
        None => default_tabstate_dir().ok_or_else(|| {
            Error::Other(
                "No PATH given and %LOCALAPPDATA% is not set; pass a TabState file or directory".to_string(),
            )
        })?,
    };

    let writer = OutputWriter::new(&args.output_dir).with_front_matter(args.front_matter);

    if target.is_file() {
        if !is_tabstate_candidate(&target) {
            return Err(Error::NotTabState(target));
        }
        decode_single(&target, &options, &writer, args.stdout)
    } else if target.is_dir() {
        if args.stdout {
            print_directory(&target, &options)
        } else {
            decode_directory(&target, &options, &writer)
        }
    } else if target.exists() {
        Err(Error::Other(format!("{} is not a valid file or directory.", target.display())))
    } else {
        Err(Error::NotFound(target))
    }
}

fn print_preview(content: &str, scan_lines: usize, max_lines: usize, char_budget: usize) {
    let preview = Preview::build(content, scan_lines, max_lines, char_budget);
    if preview.is_empty() {
        println!("[Content found but may contain non-English characters]");
    } else {
        for line in &preview.lines {
            println!("{}", line);
        }
    }
    if preview.omitted_chars > 0 {
        println!("\n[... {} more characters ...]", preview.omitted_chars);
    }
}

fn decode_single(
    path: &Path,
    options: &DecodeOptions,
    writer: &OutputWriter,
    to_stdout: bool,
) -> Result<ExitCode> {
    if !to_stdout {
        println!("Decoding: {}", path.display());
    }
    let doc = decode_file(path, options)?;

    if doc.is_empty() {
        println!("No readable content found in the file.");
        return Ok(ExitCode::SUCCESS);
    }

    if to_stdout {
        println!("{}", doc.text());
        return Ok(ExitCode::SUCCESS);
    }

    println!("\nExtracted Content ({}):", doc.strategy());
    println!("{}", "-".repeat(40));
    print_preview(doc.text(), 10, 5, 1000);

    let saved = writer.write(&doc, path)?;
    println!("\nSaved decoded content to: {}", saved.display());
    Ok(ExitCode::SUCCESS)
}

fn decode_directory(dir: &Path, options: &DecodeOptions, writer: &OutputWriter) -> Result<ExitCode> {
    let report = process_directory(dir, options, writer)?;

    let mut summary = format!("Found {} main .bin files", report.files.len());
    if report.companions_skipped > 0 {
        summary.push_str(&format!(" ({} numbered files excluded)", report.companions_skipped));
    }
    println!("{}. Processed:", summary);

    for file in &report.files {
        let name = file
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("\n{}", "=".repeat(60));
        println!("Processing: {}", truncate_chars(&name, 60));
        println!("{}", "=".repeat(60));

        match &file.outcome {
            FileOutcome::Saved { path, document } => {
                print_preview(document.text(), 5, 3, 500);
                println!("\nSaved decoded content to: {}", path.display());
            },
            FileOutcome::NoText => println!("No readable content found."),
            FileOutcome::Failed { error } => eprintln!("Error decoding {}: {}", file.source.display(), error),
        }
    }

    println!("\n=== Decoding Summary ===");
    println!("Saved:   {}", report.saved());
    println!("Empty:   {}", report.no_text());
    println!("Failed:  {}", report.failed());
    println!("Total:   {}", report.files.len());

    // Only fatal when nothing in the directory could be read at all
    if report.failed() == report.files.len() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_directory(dir: &Path, options: &DecodeOptions) -> Result<ExitCode> {
    let listing = list_tabstate_files(dir)?;
    if listing.is_empty() {
        return Err(Error::NoTargets(dir.to_path_buf()));
    }

    let mut failed = 0;
    for (path, result) in listing.files.iter().zip(decode_all(&listing.files, options)) {
        match result {
            Ok(doc) => print_document(path, &doc),
            Err(e) => {
                failed += 1;
                eprintln!("Error decoding {}: {}", path.display(), e);
            },
        }
    }

    if failed == listing.files.len() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_document(path: &Path, doc: &DecodedDocument) {
    println!("==> {} <==", path.display());
    if doc.is_empty() {
        println!("[no readable content]");
    } else {
        println!("{}", doc.text());
    }
    println!();
}
