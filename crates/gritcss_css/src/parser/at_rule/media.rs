use crate::node::{Media, MediaItem};
use crate::tokenizer::TokenType;
use crate::Css;
use gritcss_shared::errors::CssResult;

impl Css<'_> {
    /// `MEDIA_SYM S* media_types LBRACE S* ruleset* '}' S*`
    ///
    /// Rulesets may be wrapped in grit `<if>` blocks.
    pub fn parse_media(&mut self) -> CssResult<Media> {
        log::trace!("parse_media");

        self.consume(TokenType::MediaSym)?;
        self.consume_whitespace();
        let media_types = self.parse_media_types()?;
        self.consume(TokenType::LBrace)?;

        let items = self.parse_media_items()?;

        self.consume_delim('}')?;
        self.consume_whitespace();

        Ok(Media::new(media_types, items))
    }

    /// Rulesets and grit blocks up to the closing `}` or `</if>`
    pub(crate) fn parse_media_items(&mut self) -> CssResult<Vec<MediaItem>> {
        let mut items = Vec::new();
        loop {
            self.consume_whitespace();

            let t = self.peek();
            if t.is_delim('}') || t.is(TokenType::GritIfEnd) || t.is_eof() {
                break;
            }

            let item = if t.is(TokenType::GritIf) {
                self.parse_recoverable(true, |p| p.parse_grit_media())?
                    .map(MediaItem::Conditional)
            } else {
                self.parse_recoverable(true, |p| p.parse_ruleset())?
                    .map(MediaItem::Ruleset)
            };
            items.extend(item);
        }

        Ok(items)
    }
}
