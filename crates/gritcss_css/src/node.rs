//! Syntax tree of a parsed stylesheet.
//!
//! Nodes are plain values owned by their parent. Constructors that can reject input return a
//! [`CssResult`]; everything else is infallible. Text is produced by the serializer, every node
//! implements `Display` through it.

use crate::tokenizer::escape::decode_escapes;
use cow_utils::CowUtils;
use gritcss_shared::errors::{CssError, CssResult};
use std::borrow::Cow;
use std::ops::Index;

/// An RGB color in hex notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hexcolor {
    /// Hex digits without the leading `#`, case preserved
    value: String,
}

impl Hexcolor {
    /// Creates a hex color from its `#rgb` or `#rrggbb` notation
    pub fn new(value: &str) -> CssResult<Self> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| CssError::construction("hex colors must start with #"))?;

        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CssError::construction(&format!(
                "hex colors must contain 3 or 6 hex digits, found '{value}'"
            )));
        }

        Ok(Self {
            value: digits.to_string(),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A term in functional notation, like `rgb(1,2,3)`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    name: String,
    parameters: Expr,
}

impl Function {
    pub fn new(name: &str, parameters: Expr) -> Self {
        Self {
            name: name.to_string(),
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &Expr {
        &self.parameters
    }
}

/// A `url(...)` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    url: String,
}

impl Uri {
    pub fn new(url: &str) -> Self {
        Self { url: url.to_string() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl From<&str> for Uri {
    fn from(url: &str) -> Self {
        Uri::new(url)
    }
}

impl From<CssString> for Uri {
    fn from(string: CssString) -> Self {
        Uri::from(&string)
    }
}

impl From<&CssString> for Uri {
    fn from(string: &CssString) -> Self {
        Uri::new(&decode_escapes(string.raw()))
    }
}

/// A quoted string.
///
/// The text between the quotes is kept as written, together with the quote character, so it can
/// be re-emitted verbatim where that matters (grit includes).
#[derive(Debug, Clone)]
pub struct CssString {
    raw: String,
    quote: char,
}

impl CssString {
    /// Creates a string from an unquoted value
    pub fn new(value: &str) -> Self {
        Self {
            raw: value.cow_replace("\"", "\\\"").into_owned(),
            quote: '"',
        }
    }

    /// Creates a string from a STRING lexeme, including its quotes
    pub fn from_lexeme(lexeme: &str) -> CssResult<Self> {
        let mut chars = lexeme.chars();
        let (Some(quote @ ('"' | '\'')), Some(last)) = (chars.next(), chars.next_back()) else {
            return Err(CssError::construction(&format!("not a quoted string: {lexeme}")));
        };
        if last != quote {
            return Err(CssError::construction(&format!("unterminated string: {lexeme}")));
        }

        Ok(Self {
            raw: chars.as_str().to_string(),
            quote,
        })
    }

    /// The string value with escaped quotes resolved. Other escapes are kept as written.
    pub fn value(&self) -> Cow<'_, str> {
        if !self.raw.contains('\\') {
            return Cow::Borrowed(&self.raw);
        }

        let mut out = String::with_capacity(self.raw.len());
        let mut chars = self.raw.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some(q @ ('"' | '\'')) => out.push(q),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        }
        Cow::Owned(out)
    }

    /// Text between the quotes, as written in the source
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn quote(&self) -> char {
        self.quote
    }
}

impl PartialEq for CssString {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

/// An identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
}

impl Ident {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A quantity like `12px`, `50%` or `-1.5em`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    value: String,
    unary_operator: Option<char>,
}

impl Term {
    /// Creates a new term. The unary operator, when given, must be `-` or `+`.
    pub fn new(value: &str, unary_operator: Option<char>) -> CssResult<Self> {
        if let Some(op) = unary_operator {
            if op != '-' && op != '+' {
                return Err(CssError::construction(&format!(
                    "unary operator must be - or +, found '{op}'"
                )));
            }
        }

        Ok(Self {
            value: value.to_string(),
            unary_operator,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn unary_operator(&self) -> Option<char> {
        self.unary_operator
    }
}

/// Operator between two terms of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Juxtaposition
    Space,
    Comma,
    Slash,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Space => " ",
            Operator::Comma => ",",
            Operator::Slash => "/",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Term(Term),
    Ident(Ident),
    Function(Function),
    Hexcolor(Hexcolor),
    Uri(Uri),
    String(CssString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprTerm {
    /// Operator that joins this term to the previous one. Always `None` for the first term.
    pub operator: Option<Operator>,
    pub value: Value,
}

/// A property value: terms joined by operators
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expr {
    terms: Vec<ExprTerm>,
}

impl Expr {
    pub fn new(first: Value) -> Self {
        Self {
            terms: vec![ExprTerm {
                operator: None,
                value: first,
            }],
        }
    }

    /// Returns a new expression with the value appended. The operator is dropped when the
    /// expression is still empty.
    #[must_use]
    pub fn with(mut self, operator: Operator, value: Value) -> Self {
        let operator = (!self.terms.is_empty()).then_some(operator);
        self.terms.push(ExprTerm { operator, value });
        self
    }

    pub fn terms(&self) -> &[ExprTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::new(value)
    }
}

/// A `property: value` pair with an optional important flag
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    property: Ident,
    value: Expr,
    important: bool,
}

impl Declaration {
    pub fn new(property: Ident, value: Expr, important: bool) -> Self {
        Self {
            property,
            value,
            important,
        }
    }

    pub fn property(&self) -> &Ident {
        &self.property
    }

    pub fn value(&self) -> &Expr {
        &self.value
    }

    pub fn important(&self) -> bool {
        self.important
    }
}

/// An entry in a declaration block
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationItem {
    Declaration(Declaration),
    Conditional(GritDeclarationList),
    Include(GritInclude),
}

/// A grit `<include src="...">` directive, passed through untouched
#[derive(Debug, Clone, PartialEq)]
pub struct GritInclude {
    source: Uri,
    quote: char,
}

impl GritInclude {
    pub fn new(source: impl Into<Uri>, quote: char) -> Self {
        Self {
            source: source.into(),
            quote,
        }
    }

    pub fn source(&self) -> &Uri {
        &self.source
    }

    /// Quote character used around the source attribute
    pub fn quote(&self) -> char {
        self.quote
    }
}

/// A grit `<if expr="...">` conditional around statements. The guard is never evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct GritStatementList {
    expr: String,
    statements: Vec<Statement>,
}

impl GritStatementList {
    pub fn new(expr: &str, statements: Vec<Statement>) -> Self {
        Self {
            expr: expr.to_string(),
            statements,
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

/// A grit `<if expr="...">` conditional inside a declaration block
#[derive(Debug, Clone, PartialEq)]
pub struct GritDeclarationList {
    expr: String,
    declarations: Vec<DeclarationItem>,
}

impl GritDeclarationList {
    pub fn new(expr: &str, declarations: Vec<DeclarationItem>) -> Self {
        Self {
            expr: expr.to_string(),
            declarations,
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn declarations(&self) -> &[DeclarationItem] {
        &self.declarations
    }
}

/// A grit `<if expr="...">` conditional inside an `@media` rule
#[derive(Debug, Clone, PartialEq)]
pub struct GritMediaList {
    expr: String,
    items: Vec<MediaItem>,
}

impl GritMediaList {
    pub fn new(expr: &str, items: Vec<MediaItem>) -> Self {
        Self {
            expr: expr.to_string(),
            items,
        }
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }
}

/// Declarations that apply to every element matched by one of the selectors.
///
/// Iterating a ruleset yields its declaration items in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    selectors: Vec<String>,
    declarations: Vec<DeclarationItem>,
}

impl Ruleset {
    pub fn new(selectors: Vec<String>, declarations: Vec<DeclarationItem>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn declarations(&self) -> &[DeclarationItem] {
        &self.declarations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeclarationItem> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl<'a> IntoIterator for &'a Ruleset {
    type Item = &'a DeclarationItem;
    type IntoIter = std::slice::Iter<'a, DeclarationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for Ruleset {
    type Output = DeclarationItem;

    fn index(&self, index: usize) -> &Self::Output {
        &self.declarations[index]
    }
}

/// `@charset "encoding";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    encoding: String,
}

impl Charset {
    pub fn new(encoding: &str) -> Self {
        Self {
            encoding: encoding.to_string(),
        }
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

/// An `@page` rule with an optional pseudo page like `:left`
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    declarations: Vec<DeclarationItem>,
    pseudo_page: Option<Ident>,
}

impl Page {
    pub fn new(declarations: Vec<DeclarationItem>, pseudo_page: Option<Ident>) -> Self {
        Self {
            declarations,
            pseudo_page,
        }
    }

    pub fn declarations(&self) -> &[DeclarationItem] {
        &self.declarations
    }

    pub fn pseudo_page(&self) -> Option<&Ident> {
        self.pseudo_page.as_ref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeclarationItem> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a DeclarationItem;
    type IntoIter = std::slice::Iter<'a, DeclarationItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An `@media` rule holding rulesets, and grit conditionals around rulesets, for the given
/// media types
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    media_types: Vec<String>,
    items: Vec<MediaItem>,
}

impl Media {
    pub fn new(media_types: Vec<String>, items: Vec<MediaItem>) -> Self {
        Self { media_types, items }
    }

    pub fn media_types(&self) -> &[String] {
        &self.media_types
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Rulesets directly inside the rule, conditionals are skipped
    pub fn rulesets(&self) -> impl Iterator<Item = &Ruleset> {
        self.items.iter().filter_map(|item| match item {
            MediaItem::Ruleset(ruleset) => Some(ruleset),
            MediaItem::Conditional(_) => None,
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Media {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaItem {
    Ruleset(Ruleset),
    Conditional(GritMediaList),
}

impl From<Ruleset> for MediaItem {
    fn from(ruleset: Ruleset) -> Self {
        MediaItem::Ruleset(ruleset)
    }
}

/// An `@import` rule
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    source: Uri,
    media_types: Vec<String>,
}

impl Import {
    /// Creates an import. A plain string source is wrapped into a [`Uri`].
    pub fn new(source: impl Into<Uri>, media_types: Vec<String>) -> Self {
        Self {
            source: source.into(),
            media_types,
        }
    }

    pub fn source(&self) -> &Uri {
        &self.source
    }

    pub fn media_types(&self) -> &[String] {
        &self.media_types
    }
}

/// One `from`, `to` or percentage block of a keyframes rule
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeBlock {
    selectors: Vec<String>,
    declarations: Vec<DeclarationItem>,
}

impl KeyframeBlock {
    pub fn new(selectors: Vec<String>, declarations: Vec<DeclarationItem>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    pub fn declarations(&self) -> &[DeclarationItem] {
        &self.declarations
    }
}

/// `@-webkit-keyframes name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    name: String,
    blocks: Vec<KeyframeBlock>,
}

impl KeyframesRule {
    pub fn new(name: &str, blocks: Vec<KeyframeBlock>) -> Self {
        Self {
            name: name.to_string(),
            blocks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[KeyframeBlock] {
        &self.blocks
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Ruleset(Ruleset),
    Media(Media),
    Page(Page),
    Keyframes(KeyframesRule),
    Conditional(GritStatementList),
    /// Only found inside a conditional; top level imports live in [`Stylesheet::imports`]
    Import(Import),
    /// Only found inside a conditional; top level includes live in [`Stylesheet::imports`]
    Include(GritInclude),
}

/// Entry in the import list of a stylesheet
#[derive(Debug, Clone, PartialEq)]
pub enum ImportItem {
    Import(Import),
    Include(GritInclude),
}

/// Borrowed view on a top level entry of a stylesheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StylesheetItem<'a> {
    Charset(&'a Charset),
    Import(&'a ImportItem),
    Statement(&'a Statement),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    charset: Option<Charset>,
    imports: Vec<ImportItem>,
    statements: Vec<Statement>,
}

impl Stylesheet {
    pub fn new(statements: Vec<Statement>, imports: Vec<ImportItem>, charset: Option<Charset>) -> Self {
        Self {
            charset,
            imports,
            statements,
        }
    }

    pub fn charset(&self) -> Option<&Charset> {
        self.charset.as_ref()
    }

    pub fn imports(&self) -> &[ImportItem] {
        &self.imports
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Iterates the charset (if any), then the imports, then the statements
    pub fn iter(&self) -> impl Iterator<Item = StylesheetItem<'_>> {
        self.charset
            .iter()
            .map(StylesheetItem::Charset)
            .chain(self.imports.iter().map(StylesheetItem::Import))
            .chain(self.statements.iter().map(StylesheetItem::Statement))
    }

    /// Number of top level entries, the charset included
    pub fn len(&self) -> usize {
        self.statements.len() + self.imports.len() + usize::from(self.charset.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of this stylesheet with a different import list
    #[must_use]
    pub fn with_imports(&self, imports: Vec<ImportItem>) -> Self {
        Self {
            charset: self.charset.clone(),
            imports,
            statements: self.statements.clone(),
        }
    }

    /// Splits the stylesheet into its parts
    pub fn into_parts(self) -> (Option<Charset>, Vec<ImportItem>, Vec<Statement>) {
        (self.charset, self.imports, self.statements)
    }
}
