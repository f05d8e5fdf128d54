//! Scanner, parser, syntax tree and canonical serializer for CSS2.1 stylesheets, extended with
//! `@-webkit-keyframes` and the grit template constructs `<if expr="...">...</if>` and
//! `<include src="...">`.
//!
//! ```
//! use gritcss_css::{Css, ParserConfig};
//!
//! let sheet = Css::parse_str("@media print { a { color: red } }", ParserConfig::default()).unwrap();
//! assert_eq!(sheet.to_string(), "@media print{a{color:red;}}\n");
//! ```

use crate::node::Stylesheet;
use crate::tokenizer::Tokenizer;
use gritcss_shared::byte_stream::ByteStream;
use gritcss_shared::errors::{CssError, CssResult};

pub mod import;
pub mod node;
pub mod parser;
pub mod parser_config;
pub mod serializer;
pub mod tokenizer;

pub use parser_config::ParserConfig;

/// The parser. Holds the tokenizer and everything found so far that is worth reporting.
pub struct Css<'stream> {
    /// The tokenizer is responsible for reading the input stream
    pub tokenizer: Tokenizer<'stream>,
    /// The parser configuration as given
    config: ParserConfig,
    /// Lexical errors and, when errors are ignored, the syntax errors that were skipped
    diagnostics: Vec<CssError>,
    /// Functions and grit blocks currently open
    depth: usize,
}

/// A parsed stylesheet together with the non-fatal errors found on the way
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub stylesheet: Stylesheet,
    pub diagnostics: Vec<CssError>,
}

impl<'stream> Css<'stream> {
    /// Creates a new parser with the given byte stream so only `parse()` needs to be called.
    fn new(stream: &'stream mut ByteStream, config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(stream, config.location.clone()),
            config,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    /// Parses a string into a stylesheet
    pub fn parse_str(data: &str, config: ParserConfig) -> CssResult<Stylesheet> {
        Ok(Css::parse_with_diagnostics(data, config)?.stylesheet)
    }

    /// Parses a decoded stream into a stylesheet
    pub fn parse_stream(stream: &mut ByteStream, config: ParserConfig) -> CssResult<Stylesheet> {
        Ok(Css::new(stream, config).parse()?.stylesheet)
    }

    /// Parses a string and also returns the lexical errors, plus the skipped syntax errors when
    /// the configuration ignores errors
    pub fn parse_with_diagnostics(data: &str, config: ParserConfig) -> CssResult<ParseOutput> {
        let mut stream = ByteStream::from_text(data);
        Css::parse_stream_with_diagnostics(&mut stream, config)
    }

    pub fn parse_stream_with_diagnostics(stream: &mut ByteStream, config: ParserConfig) -> CssResult<ParseOutput> {
        Css::new(stream, config).parse()
    }

    fn parse(&mut self) -> CssResult<ParseOutput> {
        log::debug!(
            "parsing stylesheet {}",
            self.config.source.as_deref().unwrap_or("<inline>")
        );

        let stylesheet = self.parse_stylesheet()?;
        self.collect_lexical_errors();

        Ok(ParseOutput {
            stylesheet,
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }
}

/// Parses a stylesheet with the default configuration
pub fn parse(data: &str) -> CssResult<Stylesheet> {
    Css::parse_str(data, ParserConfig::default())
}
