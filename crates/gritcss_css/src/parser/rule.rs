use crate::node::Ruleset;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `selector (COMMA S* selector)* LBRACE S* declarations '}' S*`
    pub fn parse_ruleset(&mut self) -> CssResult<Ruleset> {
        log::trace!("parse_ruleset");

        let selectors = self.parse_selectors_group()?;
        let declarations = self.parse_declaration_block()?;

        Ok(Ruleset::new(selectors, declarations))
    }
}
