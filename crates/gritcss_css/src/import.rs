//! Recursive `@import` flattening.
//!
//! Every imported sheet is fetched, parsed and exported on its own, imported sheets before the
//! sheet that imports them. The `@import` rules that were followed are removed from the
//! exported importer; grit `<include>` items are left alone.

use crate::node::{ImportItem, Stylesheet, Uri};
use crate::{Css, ParserConfig};
use gritcss_shared::byte_stream::{ByteStream, Encoding};
use gritcss_shared::errors::{CssError, CssResult};
use std::collections::HashSet;
use url::Url;

/// Produces the text of a stylesheet for a location
pub trait Fetcher {
    fn fetch(&self, location: &Url) -> CssResult<String>;
}

/// Reads `file:` urls from disk. The encoding is detected from the bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, location: &Url) -> CssResult<String> {
        let path = location
            .to_file_path()
            .map_err(|()| CssError::import_resolution(location.as_str(), "not a local file"))?;

        let bytes = std::fs::read(&path).map_err(|e| CssError::import_resolution(location.as_str(), &e.to_string()))?;

        let mut stream = ByteStream::new(Encoding::UNKNOWN);
        stream.read_from_bytes(&bytes);
        Ok(stream.text())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    /// Deepest allowed import nesting, the root sheet is at depth 0
    pub max_depth: usize,
    /// Keep going when an imported sheet cannot be fetched or parsed. The `@import` rule stays
    /// in the importer in that case.
    pub ignore_errors: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_depth: 16,
            ignore_errors: false,
        }
    }
}

/// A parsed sheet, where it came from and the non-fatal errors found while parsing it
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSheet {
    pub location: Url,
    pub stylesheet: Stylesheet,
    pub diagnostics: Vec<CssError>,
}

/// Resolves an import target against the location of the importing sheet
pub fn resolve_location(base: &Url, uri: &Uri) -> CssResult<Url> {
    base.join(uri.url())
        .map_err(|e| CssError::import_resolution(uri.url(), &e.to_string()))
}

/// Turns a command line argument into a location: absolute urls are kept, anything else is a
/// path relative to the current directory
pub fn location_from_arg(arg: &str) -> CssResult<Url> {
    if let Ok(url) = Url::parse(arg) {
        // A windows drive letter parses as a one letter scheme
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }

    let cwd = std::env::current_dir().map_err(|e| CssError::import_resolution(arg, &e.to_string()))?;
    Url::from_file_path(cwd.join(arg)).map_err(|()| CssError::import_resolution(arg, "not a valid path"))
}

/// Parses the sheet at `location` and, recursively, everything it imports
pub fn flatten(location: &Url, fetcher: &dyn Fetcher, config: &ImportConfig) -> CssResult<Vec<ExportedSheet>> {
    let mut flattener = Flattener {
        fetcher,
        config,
        chain: Vec::new(),
        visited: HashSet::new(),
        sheets: Vec::new(),
    };

    flattener.visit(location)?;
    Ok(flattener.sheets)
}

struct Flattener<'a> {
    fetcher: &'a dyn Fetcher,
    config: &'a ImportConfig,
    /// Sheets currently being flattened, outermost first
    chain: Vec<Url>,
    visited: HashSet<Url>,
    sheets: Vec<ExportedSheet>,
}

impl Flattener<'_> {
    fn visit(&mut self, location: &Url) -> CssResult<()> {
        if self.chain.contains(location) || self.chain.len() > self.config.max_depth {
            let mut path: Vec<String> = self.chain.iter().map(Url::to_string).collect();
            path.push(location.to_string());
            return Err(CssError::CyclicImport { path });
        }

        if !self.visited.insert(location.clone()) {
            log::debug!("{location} is already flattened");
            return Ok(());
        }

        log::debug!("flattening {location} at depth {}", self.chain.len());

        let text = self.fetcher.fetch(location)?;
        let parser_config = ParserConfig {
            ignore_errors: self.config.ignore_errors,
            ..ParserConfig::with_source(location.as_str())
        };
        let output = Css::parse_with_diagnostics(&text, parser_config)?;
        let (charset, imports, statements) = output.stylesheet.into_parts();

        self.chain.push(location.clone());

        let mut kept = Vec::new();
        for item in imports {
            let ImportItem::Import(import) = &item else {
                kept.push(item);
                continue;
            };

            match self.visit_import(location, import.source()) {
                Ok(()) => {}
                Err(err) if self.can_skip(&err) => {
                    log::warn!("keeping unresolved import in {location}: {err}");
                    kept.push(item);
                }
                Err(err) => {
                    self.chain.pop();
                    return Err(err);
                }
            }
        }

        self.chain.pop();
        self.sheets.push(ExportedSheet {
            location: location.clone(),
            stylesheet: Stylesheet::new(statements, kept, charset),
            diagnostics: output.diagnostics,
        });

        Ok(())
    }

    fn visit_import(&mut self, base: &Url, source: &Uri) -> CssResult<()> {
        let target = resolve_location(base, source)?;
        log::debug!("{base} imports {target}");
        self.visit(&target)
    }

    fn can_skip(&self, err: &CssError) -> bool {
        self.config.ignore_errors && !matches!(err, CssError::CyclicImport { .. })
    }
}
