use gritcss_shared::byte_stream::Location;

/// ParserConfig holds the configuration for the parser
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Optional source filename or url, used in log messages
    pub source: Option<String>,
    /// Location of the first character of the data. Token locations are relative to this.
    pub location: Location,
    /// Skip over statements and declarations with syntax errors instead of failing
    pub ignore_errors: bool,
    /// Deepest allowed nesting of functions and grit `<if>` blocks
    pub max_nesting: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            source: None,
            location: Location::default(),
            ignore_errors: false,
            max_nesting: 64,
        }
    }
}

impl ParserConfig {
    /// Default configuration for the given source
    pub fn with_source(source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            ..Default::default()
        }
    }
}
