use anyhow::{anyhow, Result};
use clap::Parser;
use gritcss_css::import::{flatten, location_from_arg, ExportedSheet, Fetcher, FileFetcher, ImportConfig};
use gritcss_css::tokenizer::Tokenizer;
use gritcss_css::{Css, ParserConfig};
use gritcss_shared::byte_stream::{ByteStream, Encoding, Location};
use gritcss_shared::errors::{CssError, CssResult};
use simple_logger::SimpleLogger;
use std::io::Read;
use std::process::ExitCode;
use url::Url;

/// Parses CSS stylesheets (with grit template constructs) and prints them in canonical form
#[derive(Parser, Debug)]
#[command(name = "gritcss", version)]
struct Args {
    /// Files or urls to parse
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Follow @import rules and print every imported sheet before its importer
    #[arg(short, long)]
    recursive: bool,

    /// Just print the tokens
    #[arg(long)]
    tokens: bool,

    /// Skip broken statements instead of stopping at the first error
    #[arg(long)]
    ignore_errors: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Fetches `file:` urls from disk and `http(s):` urls over the network
struct SourceFetcher;

impl Fetcher for SourceFetcher {
    fn fetch(&self, location: &Url) -> CssResult<String> {
        match location.scheme() {
            "file" => FileFetcher.fetch(location),
            "http" | "https" => fetch_remote(location),
            scheme => Err(CssError::import_resolution(
                location.as_str(),
                &format!("unsupported scheme '{scheme}'"),
            )),
        }
    }
}

fn fetch_remote(location: &Url) -> CssResult<String> {
    log::debug!("fetching {location}");

    let response = ureq::get(location.as_str())
        .call()
        .map_err(|e| CssError::import_resolution(location.as_str(), &e.to_string()))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| CssError::import_resolution(location.as_str(), &e.to_string()))?;

    let mut stream = ByteStream::new(Encoding::UNKNOWN);
    stream.read_from_bytes(&bytes);
    Ok(stream.text())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.debug {
        if let Err(e) = SimpleLogger::new().with_level(log::LevelFilter::Debug).init() {
            eprintln!("could not initialize logging: {e}");
        }
    }

    let mut failed = false;
    for input in &args.inputs {
        if let Err(e) = run(input, &args) {
            eprintln!("{input}: {e:#}");
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(input: &str, args: &Args) -> Result<()> {
    let location = location_from_arg(input)?;

    if args.tokens {
        let css = SourceFetcher.fetch(&location)?;
        print_tokens(&css);
        return Ok(());
    }

    let sheets = if args.recursive {
        let config = ImportConfig {
            ignore_errors: args.ignore_errors,
            ..Default::default()
        };
        flatten(&location, &SourceFetcher, &config)?
    } else {
        vec![parse_single(&location, args.ignore_errors)?]
    };

    for sheet in sheets {
        for diagnostic in &sheet.diagnostics {
            eprintln!("{}: {diagnostic}", sheet.location);
        }
        println!("/* {} */", sheet.location);
        print!("{}", sheet.stylesheet);
    }

    Ok(())
}

fn parse_single(location: &Url, ignore_errors: bool) -> Result<ExportedSheet> {
    let css = SourceFetcher.fetch(location)?;
    let config = ParserConfig {
        ignore_errors,
        ..ParserConfig::with_source(location.as_str())
    };

    let output = match Css::parse_with_diagnostics(&css, config) {
        Ok(output) => output,
        Err(err) => {
            if let Some(loc) = err.location() {
                display_snippet(&css, loc);
            }
            return Err(anyhow!(err));
        }
    };

    Ok(ExportedSheet {
        location: location.clone(),
        stylesheet: output.stylesheet,
        diagnostics: output.diagnostics,
    })
}

/// Prints the lines around an error with a marker under the column
fn display_snippet(css: &str, loc: &Location) {
    let lines: Vec<&str> = css.lines().collect();
    let line_nr = loc.line.saturating_sub(1);
    let col_nr = loc.column.saturating_sub(1);

    if col_nr > 1000 {
        eprintln!("Error is too far to the right to display.");
        return;
    }

    eprintln!();
    for n in line_nr.saturating_sub(5)..=line_nr + 5 {
        let Some(line) = lines.get(n) else {
            continue;
        };
        eprintln!("{:<5}|{}", n + 1, line);
        if n == line_nr {
            eprintln!("     |{}^", "-".repeat(col_nr));
        }
    }
    eprintln!();
}

fn print_tokens(css: &str) {
    let mut stream = ByteStream::from_text(css);
    let tokenizer = Tokenizer::new(&mut stream, Location::default());

    for token in tokenizer {
        match token {
            Ok(token) => println!("{}: {token}", token.location),
            Err(err) => println!("{err}"),
        }
    }
}
