use gritcss_css::node::{Statement, StylesheetItem};
use gritcss_css::{parse, Css, ParserConfig};
use gritcss_shared::byte_stream::Location;
use gritcss_shared::errors::CssError;
use test_case::test_case;

fn canonical(input: &str) -> String {
    parse(input).unwrap().to_string()
}

#[test]
fn import_statements() {
    let input = "
@import 'file.css';
 @import \"file.css\";
  @import url(http://hostname/file.css);
   <include src='blah.css'>
    <include src=\"blah.css\">";

    assert_eq!(
        canonical(input),
        "@import url(file.css);\n\
         @import url(file.css);\n\
         @import url(http://hostname/file.css);\n\
         <include src='blah.css'>\n\
         <include src=\"blah.css\">\n"
    );
}

#[test]
fn media_statement() {
    let input = "
/* print only */
@media print {
  super {
    cool: story(bro);
  }
}";

    assert_eq!(canonical(input), "@media print{super{cool:story(bro);}}\n");
}

#[test]
fn keyframes_rule() {
    let input = "
@-webkit-keyframes name{
  from { some: value; }
  to {
    some: other(value);
  }
  0% {
    width: 0;
  }
  100% { width: 100px; }
}";

    assert_eq!(
        canonical(input),
        "@-webkit-keyframes name{from{some:value;}to{some:other(value);}0%{width:0;}100%{width:100px;}}\n"
    );
}

#[test_case("a{color:red}")]
#[test_case("@charset \"utf-8\";@import 'x.css' print, screen;h1 , h2 > em{font:12px/1.5 \"Helvetica Neue\",serif !important}")]
#[test_case("a:hover,a[href^='http']::after{content:'\\201C';background:url(a.png) #FFF no-repeat}")]
#[test_case("@media screen,print{.x{margin:-1em +2px;padding:0 .5ex}}")]
#[test_case("@page :first{margin:1in}")]
#[test_case("@-webkit-keyframes spin{from{-webkit-transform:rotate(0deg)}to{-webkit-transform:rotate(360deg)}}")]
#[test_case("a{<if expr=\"is_macosx\">b:c;</if>}")]
#[test_case("<if expr=\"lang == 'en'\">@import url(en.css);p:lang(en){quotes:'\\201C' '\\201D'}</if>")]
#[test_case("ul li:not(.first)~li+li{list-style:none}")]
#[test_case("div#main>p:first-child:nth-child(2n+1){color:rgb(0,128,255)}")]
#[test_case("body{background:url(\"a b.png\")}")]
#[test_case("<!-- a{b:c} --> <include src=\"x.css\"> svg|rect[xml|lang|=en]{}")]
#[test_case("a{b:url(\"x\\bc.png\")}")]
#[test_case("a{b:url('a\\\\b') url(\"a\\\"b\")}")]
#[test_case("a{b:url(a\\ b.png) url(a\\)b) url(a\\\"b)}")]
#[test_case("a{b:1\\28 x}")]
#[test_case("@media print{<if expr=\"is_win\">a{b:c}</if>d{}}")]
fn serialization_is_idempotent(input: &str) {
    let first = parse(input).unwrap();
    let printed = first.to_string();

    let second = parse(&printed).unwrap();
    assert_eq!(second, first);
    assert_eq!(second.to_string(), printed);
}

#[test]
fn canonical_forms() {
    assert_eq!(canonical("@import 'a.css';"), "@import url(a.css);\n");
    assert_eq!(
        canonical("@media print { a { color: red } }"),
        "@media print{a{color:red;}}\n"
    );
    assert_eq!(canonical("a{<if expr=\"c\">b:c;</if>}"), "a{<if expr=\"c\">b:c;</if>}\n");
    assert_eq!(canonical("A > B + C ~ D E{}"), "A>B+C~D E{}\n");
    assert_eq!(canonical("a { b : 12PX 1.5EM 10Hz 2S }"), "a{b:12px 1.5em 10hz 2s;}\n");
    assert_eq!(canonical("a{b:c!important;}"), "a{b:c !important;}\n");
    assert_eq!(canonical("a{b:c ! /* x */ IMPORTANT}"), "a{b:c !important;}\n");
    assert_eq!(canonical("a{b:\"say \\\"hi\\\"\"}"), "a{b:\"say \\\"hi\\\"\";}\n");
    assert_eq!(canonical("a{b:'it\"s'}"), "a{b:\"it\\\"s\";}\n");
}

#[test]
fn items_are_iterated_in_order() {
    let err = parse("a{} @charset \"x\";").unwrap_err();
    assert!(matches!(err, CssError::Syntax { .. }));

    let sheet = parse("@charset \"x\"; b{} @import 'y.css'; @media tv{}").unwrap();
    let kinds: Vec<_> = sheet
        .iter()
        .map(|item| match item {
            StylesheetItem::Charset(_) => "charset",
            StylesheetItem::Import(_) => "import",
            StylesheetItem::Statement(Statement::Ruleset(_)) => "ruleset",
            StylesheetItem::Statement(Statement::Media(_)) => "media",
            StylesheetItem::Statement(_) => "other",
        })
        .collect();

    assert_eq!(kinds, ["charset", "import", "ruleset", "media"]);
}

#[test]
fn lexical_errors_do_not_stop_parsing() {
    let output = Css::parse_with_diagnostics("a{b:c}\n$ d{e:f}", ParserConfig::default()).unwrap();

    assert_eq!(output.stylesheet.to_string(), "a{b:c;}\nd{e:f;}\n");
    assert_eq!(
        output.diagnostics,
        [CssError::Lexical {
            character: '$',
            location: Location::new(2, 1, 7),
        }]
    );
}

#[test]
fn ignore_errors_skips_broken_statements() {
    let config = ParserConfig {
        ignore_errors: true,
        ..ParserConfig::with_source("broken.css")
    };
    let input = "a{color:#12} b{color:red} @media {x{}} c, {d:e} <if expr=\"x\">f{g:h;i}</if>";

    let output = Css::parse_with_diagnostics(input, config).unwrap();

    assert_eq!(
        output.stylesheet.to_string(),
        "a{}\nb{color:red;}\n<if expr=\"x\">f{g:h;}</if>\n"
    );
    assert_eq!(output.diagnostics.len(), 4);
    assert!(output.diagnostics.iter().all(|d| !d.is_recoverable()));
}

#[test_case("a{b:#12}"; "bad color")]
#[test_case("a{b:+c}"; "sign before identifier")]
#[test_case("a{b:'unterminated}"; "unterminated string")]
#[test_case("a{b:c"; "unterminated block")]
#[test_case("@media print{"; "unterminated media")]
#[test_case("<if expr=\"x\">a{}"; "unterminated conditional")]
fn errors_abort_by_default(input: &str) {
    assert!(parse(input).is_err());
}
