//! Canonical serialization of the syntax tree.
//!
//! The output is compact: no indentation, no whitespace inside blocks, every declaration
//! terminated by `;` and every top level entry of a stylesheet followed by a newline. Parsing
//! the output again yields the same tree.
//!
//! All text goes through a [`Printer`], so the same walk can produce a `String`, bytes, or a
//! list of the emitted fragments.

use crate::node::{
    Charset, CssString, Declaration, DeclarationItem, Expr, Function, GritDeclarationList, GritInclude,
    GritMediaList, GritStatementList, Hexcolor, Ident, Import, ImportItem, KeyframeBlock, KeyframesRule, Media,
    MediaItem, Page, Ruleset, Statement, Stylesheet, StylesheetItem, Term, Uri, Value,
};
use crate::tokenizer::is_url_char;
use cow_utils::CowUtils;
use itertools::Itertools;
use std::fmt;

/// Sink for serialized text
pub trait Printer {
    fn print(&mut self, text: &str);
}

impl Printer for String {
    fn print(&mut self, text: &str) {
        self.push_str(text);
    }
}

impl Printer for Vec<u8> {
    fn print(&mut self, text: &str) {
        self.extend_from_slice(text.as_bytes());
    }
}

/// Printer that keeps every emitted fragment separately
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FragmentPrinter {
    fragments: Vec<String>,
}

impl FragmentPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Joins all fragments
    pub fn into_string(self) -> String {
        self.fragments.concat()
    }
}

impl Printer for FragmentPrinter {
    fn print(&mut self, text: &str) {
        self.fragments.push(text.to_string());
    }
}

/// Reference to any node that can be serialized. `Raw` text is handed to the printer as is.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Stylesheet(&'a Stylesheet),
    Charset(&'a Charset),
    ImportItem(&'a ImportItem),
    Import(&'a Import),
    Statement(&'a Statement),
    Ruleset(&'a Ruleset),
    Media(&'a Media),
    MediaItem(&'a MediaItem),
    Page(&'a Page),
    Keyframes(&'a KeyframesRule),
    KeyframeBlock(&'a KeyframeBlock),
    GritStatementList(&'a GritStatementList),
    GritDeclarationList(&'a GritDeclarationList),
    GritMediaList(&'a GritMediaList),
    GritInclude(&'a GritInclude),
    DeclarationItem(&'a DeclarationItem),
    Declaration(&'a Declaration),
    Expr(&'a Expr),
    Value(&'a Value),
    Term(&'a Term),
    Ident(&'a Ident),
    Function(&'a Function),
    Hexcolor(&'a Hexcolor),
    Uri(&'a Uri),
    String(&'a CssString),
    Raw(&'a str),
}

/// Serializes the node into the printer
pub fn serialize<P: Printer + ?Sized>(node: NodeRef<'_>, out: &mut P) {
    match node {
        NodeRef::Stylesheet(sheet) => {
            for item in sheet.iter() {
                serialize(item.into(), out);
                out.print("\n");
            }
        }
        NodeRef::Charset(charset) => {
            out.print("@charset ");
            serialize_string(charset.encoding(), out);
            out.print(";");
        }
        NodeRef::ImportItem(item) => match item {
            ImportItem::Import(import) => serialize(NodeRef::Import(import), out),
            ImportItem::Include(include) => serialize(NodeRef::GritInclude(include), out),
        },
        NodeRef::Import(import) => {
            out.print("@import ");
            serialize(NodeRef::Uri(import.source()), out);
            if !import.media_types().is_empty() {
                out.print(" ");
                out.print(&import.media_types().join(","));
            }
            out.print(";");
        }
        NodeRef::Statement(statement) => match statement {
            Statement::Ruleset(ruleset) => serialize(NodeRef::Ruleset(ruleset), out),
            Statement::Media(media) => serialize(NodeRef::Media(media), out),
            Statement::Page(page) => serialize(NodeRef::Page(page), out),
            Statement::Keyframes(keyframes) => serialize(NodeRef::Keyframes(keyframes), out),
            Statement::Conditional(list) => serialize(NodeRef::GritStatementList(list), out),
            Statement::Import(import) => serialize(NodeRef::Import(import), out),
            Statement::Include(include) => serialize(NodeRef::GritInclude(include), out),
        },
        NodeRef::Ruleset(ruleset) => {
            out.print(&ruleset.selectors().iter().join(","));
            serialize_block(ruleset.declarations(), out);
        }
        NodeRef::Media(media) => {
            out.print("@media ");
            out.print(&media.media_types().join(","));
            out.print("{");
            for item in media {
                serialize(NodeRef::MediaItem(item), out);
            }
            out.print("}");
        }
        NodeRef::MediaItem(item) => match item {
            MediaItem::Ruleset(ruleset) => serialize(NodeRef::Ruleset(ruleset), out),
            MediaItem::Conditional(list) => serialize(NodeRef::GritMediaList(list), out),
        },
        NodeRef::Page(page) => {
            out.print("@page");
            if let Some(pseudo) = page.pseudo_page() {
                out.print(":");
                serialize(NodeRef::Ident(pseudo), out);
            }
            serialize_block(page.declarations(), out);
        }
        NodeRef::Keyframes(keyframes) => {
            out.print("@-webkit-keyframes ");
            out.print(keyframes.name());
            out.print("{");
            for block in keyframes.blocks() {
                serialize(NodeRef::KeyframeBlock(block), out);
            }
            out.print("}");
        }
        NodeRef::KeyframeBlock(block) => {
            out.print(&block.selectors().iter().join(","));
            serialize_block(block.declarations(), out);
        }
        NodeRef::GritStatementList(list) => {
            serialize_grit_if(list.expr(), out);
            for statement in list.statements() {
                serialize(NodeRef::Statement(statement), out);
            }
            out.print("</if>");
        }
        NodeRef::GritDeclarationList(list) => {
            serialize_grit_if(list.expr(), out);
            for item in list.declarations() {
                serialize(NodeRef::DeclarationItem(item), out);
            }
            out.print("</if>");
        }
        NodeRef::GritMediaList(list) => {
            serialize_grit_if(list.expr(), out);
            for item in list.items() {
                serialize(NodeRef::MediaItem(item), out);
            }
            out.print("</if>");
        }
        NodeRef::GritInclude(include) => {
            let quote = include.quote().to_string();
            let escaped = format!("\\{quote}");

            out.print("<include src=");
            out.print(&quote);
            out.print(&include.source().url().cow_replace(quote.as_str(), escaped.as_str()));
            out.print(&quote);
            out.print(">");
        }
        NodeRef::DeclarationItem(item) => match item {
            DeclarationItem::Declaration(declaration) => {
                serialize(NodeRef::Declaration(declaration), out);
                out.print(";");
            }
            DeclarationItem::Conditional(list) => serialize(NodeRef::GritDeclarationList(list), out),
            DeclarationItem::Include(include) => serialize(NodeRef::GritInclude(include), out),
        },
        NodeRef::Declaration(declaration) => {
            serialize(NodeRef::Ident(declaration.property()), out);
            out.print(":");
            serialize(NodeRef::Expr(declaration.value()), out);
            if declaration.important() {
                out.print(" !important");
            }
        }
        NodeRef::Expr(expr) => {
            for term in expr.terms() {
                if let Some(operator) = term.operator {
                    out.print(operator.as_str());
                }
                serialize(NodeRef::Value(&term.value), out);
            }
        }
        NodeRef::Value(value) => match value {
            Value::Term(term) => serialize(NodeRef::Term(term), out),
            Value::Ident(ident) => serialize(NodeRef::Ident(ident), out),
            Value::Function(function) => serialize(NodeRef::Function(function), out),
            Value::Hexcolor(color) => serialize(NodeRef::Hexcolor(color), out),
            Value::Uri(uri) => serialize(NodeRef::Uri(uri), out),
            Value::String(string) => serialize(NodeRef::String(string), out),
        },
        NodeRef::Term(term) => {
            if let Some(op) = term.unary_operator() {
                out.print(op.encode_utf8(&mut [0; 4]));
            }
            out.print(term.value());
        }
        NodeRef::Ident(ident) => out.print(ident.name()),
        NodeRef::Function(function) => {
            out.print(function.name());
            out.print("(");
            serialize(NodeRef::Expr(function.parameters()), out);
            out.print(")");
        }
        NodeRef::Hexcolor(color) => {
            out.print("#");
            out.print(color.value());
        }
        NodeRef::Uri(uri) => {
            out.print("url(");
            if uri.url().chars().all(is_url_char) {
                out.print(uri.url());
            } else {
                serialize_url_string(uri.url(), out);
            }
            out.print(")");
        }
        NodeRef::String(string) => serialize_string(&string.value(), out),
        NodeRef::Raw(text) => out.print(text),
    }
}

/// Serializes the node into a new string
pub fn to_css_string<'a>(node: impl Into<NodeRef<'a>>) -> String {
    let mut out = String::new();
    serialize(node.into(), &mut out);
    out
}

fn serialize_block<P: Printer + ?Sized>(declarations: &[DeclarationItem], out: &mut P) {
    out.print("{");
    for item in declarations {
        serialize(NodeRef::DeclarationItem(item), out);
    }
    out.print("}");
}

fn serialize_grit_if<P: Printer + ?Sized>(expr: &str, out: &mut P) {
    out.print("<if expr=");
    serialize_string(expr, out);
    out.print(">");
}

/// Double quoted string with embedded double quotes escaped
fn serialize_string<P: Printer + ?Sized>(value: &str, out: &mut P) {
    out.print("\"");
    out.print(&value.cow_replace("\"", "\\\""));
    out.print("\"");
}

/// Double quoted url target. The target is stored decoded, so backslashes, quotes and
/// characters that cannot appear in a string are escaped again.
fn serialize_url_string<P: Printer + ?Sized>(url: &str, out: &mut P) {
    let mut quoted = String::with_capacity(url.len() + 2);
    quoted.push('"');
    for c in url.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push_str(&format!("\\{:x} ", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    out.print(&quoted);
}

macro_rules! node_ref {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for NodeRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    NodeRef::$variant(node)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&to_css_string(self))
                }
            }
        )*
    };
}

node_ref!(
    Stylesheet => Stylesheet,
    Charset => Charset,
    ImportItem => ImportItem,
    Import => Import,
    Statement => Statement,
    Ruleset => Ruleset,
    Media => Media,
    MediaItem => MediaItem,
    Page => Page,
    Keyframes => KeyframesRule,
    KeyframeBlock => KeyframeBlock,
    GritStatementList => GritStatementList,
    GritDeclarationList => GritDeclarationList,
    GritMediaList => GritMediaList,
    GritInclude => GritInclude,
    DeclarationItem => DeclarationItem,
    Declaration => Declaration,
    Expr => Expr,
    Value => Value,
    Term => Term,
    Ident => Ident,
    Function => Function,
    Hexcolor => Hexcolor,
    Uri => Uri,
    String => CssString,
);

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(text: &'a str) -> Self {
        NodeRef::Raw(text)
    }
}

impl<'a> From<StylesheetItem<'a>> for NodeRef<'a> {
    fn from(item: StylesheetItem<'a>) -> Self {
        match item {
            StylesheetItem::Charset(charset) => NodeRef::Charset(charset),
            StylesheetItem::Import(import) => NodeRef::ImportItem(import),
            StylesheetItem::Statement(statement) => NodeRef::Statement(statement),
        }
    }
}
