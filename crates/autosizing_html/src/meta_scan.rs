//! Meta tag extraction using the html5ever tokenizer.
//!
//! A full tree build is not needed to find `<meta>` elements, but the
//! tokenizer alone would read markup inside `<script>` or `<textarea>`. The
//! sink therefore switches the tokenizer into the raw text states the tree
//! builder would select for those elements, and tracks SVG and MathML
//! subtrees where those elements are ordinary foreign elements instead.

use autosizing::MetaTag;
use core::cell::{Cell, RefCell};
use html5ever::TokenizerResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use log::trace;

/// An open element that changes how its contents are tokenized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OpenScope {
    Svg,
    Math,
    /// An SVG or MathML element whose contents are parsed as HTML again.
    Integration,
}

/// HTML start tags that close every open SVG or MathML element.
const BREAKOUT_TAGS: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

/// Collects `<meta>` start tags outside template contents.
#[derive(Default)]
struct MetaSink {
    tags: RefCell<Vec<MetaTag>>,
    /// Number of currently open `<template>` elements.
    template_depth: Cell<usize>,
    /// SVG, MathML and integration point elements, innermost last.
    scopes: RefCell<Vec<OpenScope>>,
}

impl MetaSink {
    fn in_foreign_content(&self) -> bool {
        matches!(
            self.scopes.borrow().last(),
            Some(OpenScope::Svg | OpenScope::Math)
        )
    }

    fn is_breakout(tag: &Tag) -> bool {
        let name = &*tag.name;
        BREAKOUT_TAGS.contains(&name)
            || (name == "font"
                && tag
                    .attrs
                    .iter()
                    .any(|attr| matches!(&*attr.name.local, "color" | "face" | "size")))
    }

    /// Handles a start tag inside SVG or MathML. Returns `true` when the tag
    /// leaves foreign content and must be processed as HTML.
    fn foreign_start_tag(&self, tag: &Tag) -> bool {
        if Self::is_breakout(tag) {
            let mut scopes = self.scopes.borrow_mut();
            while matches!(scopes.last(), Some(OpenScope::Svg | OpenScope::Math)) {
                scopes.pop();
            }
            return true;
        }
        if tag.self_closing {
            return false;
        }
        let mut scopes = self.scopes.borrow_mut();
        match (scopes.last().copied(), &*tag.name) {
            (_, "svg") => scopes.push(OpenScope::Svg),
            (_, "math") => scopes.push(OpenScope::Math),
            (Some(OpenScope::Svg), "foreignobject" | "desc" | "title")
            | (Some(OpenScope::Math), "mi" | "mo" | "mn" | "ms" | "mtext") => {
                scopes.push(OpenScope::Integration);
            }
            _ => {}
        }
        false
    }

    fn start_tag(&self, tag: &Tag) -> TokenSinkResult<()> {
        if self.in_foreign_content() && !self.foreign_start_tag(tag) {
            return TokenSinkResult::Continue;
        }
        match &*tag.name {
            "meta" => {
                if self.template_depth.get() == 0 {
                    self.tags.borrow_mut().push(meta_tag_from(tag));
                }
                TokenSinkResult::Continue
            }
            "template" => {
                self.template_depth.set(self.template_depth.get() + 1);
                TokenSinkResult::Continue
            }
            "svg" | "math" if !tag.self_closing => {
                let scope = if &*tag.name == "svg" {
                    OpenScope::Svg
                } else {
                    OpenScope::Math
                };
                self.scopes.borrow_mut().push(scope);
                TokenSinkResult::Continue
            }
            // A trailing `/` does not close these elements in HTML.
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }

    fn end_tag(&self, tag: &Tag) {
        let name = &*tag.name;
        if name == "template" {
            self.template_depth
                .set(self.template_depth.get().saturating_sub(1));
            return;
        }
        let mut scopes = self.scopes.borrow_mut();
        let closes = match (scopes.last(), name) {
            (Some(OpenScope::Svg), "svg") | (Some(OpenScope::Math), "math") => true,
            (Some(OpenScope::Integration), _) => matches!(
                name,
                "foreignobject" | "desc" | "title" | "mi" | "mo" | "mn" | "ms" | "mtext"
            ),
            _ => false,
        };
        if closes {
            scopes.pop();
        }
    }
}

impl TokenSink for MetaSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => self.start_tag(&tag),
                TagKind::EndTag => {
                    self.end_tag(&tag);
                    TokenSinkResult::Continue
                }
            },
            _ => TokenSinkResult::Continue,
        }
    }

    fn adjusted_current_node_present_but_not_in_html_namespace(&self) -> bool {
        self.in_foreign_content()
    }
}

/// First value of the named attribute. The tokenizer has already lowercased
/// attribute names and dropped duplicates.
fn attribute(tag: &Tag, name: &str) -> Option<String> {
    tag.attrs
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

fn meta_tag_from(tag: &Tag) -> MetaTag {
    MetaTag {
        name: attribute(tag, "name"),
        content: attribute(tag, "content"),
    }
}

/// Returns every `<meta>` element of the document in source order.
///
/// Meta tags inside `<template>` contents are skipped because they do not
/// belong to the document's element collection. Markup appearing inside raw
/// text elements, RCDATA elements and comments is never reported.
pub fn extract_meta_tags(html: &str) -> Vec<MetaTag> {
    let tokenizer = Tokenizer::new(MetaSink::default(), TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from(html));
    // The sink never hands back a script, so a single feed consumes the input.
    let _done: TokenizerResult<()> = tokenizer.feed(&queue);
    tokenizer.end();

    let tags = tokenizer.sink.tags.take();
    trace!("found {} meta tags", tags.len());
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_in_source_order() {
        let html = r#"<!doctype html><html><head>
            <meta charset="utf-8">
            <meta name="description" content="page">
            <meta name="viewport" content="width=device-width">
            </head><body><meta name="late" content="1"></body></html>"#;
        let tags = extract_meta_tags(html);
        assert_eq!(
            tags,
            vec![
                MetaTag::new(None, None),
                MetaTag::named("description", "page"),
                MetaTag::named("viewport", "width=device-width"),
                MetaTag::named("late", "1"),
            ]
        );
    }

    #[test]
    fn attribute_names_are_case_insensitive() {
        let tags = extract_meta_tags(r#"<META NAME="viewport" CONTENT="width=320">"#);
        assert_eq!(tags, vec![MetaTag::named("viewport", "width=320")]);
    }

    #[test]
    fn values_are_kept_verbatim() {
        let tags = extract_meta_tags(r#"<meta name="VIEWPORT" content="">"#);
        assert_eq!(tags, vec![MetaTag::named("VIEWPORT", "")]);
    }

    #[test]
    fn unquoted_and_entity_values() {
        let tags = extract_meta_tags("<meta name=viewport content=width&#61;device-width>");
        assert_eq!(tags, vec![MetaTag::named("viewport", "width=device-width")]);
    }

    #[test]
    fn first_duplicate_attribute_wins() {
        let tags = extract_meta_tags(r#"<meta name="viewport" name="other" content="a">"#);
        assert_eq!(tags, vec![MetaTag::named("viewport", "a")]);
    }

    #[test]
    fn script_and_rcdata_contents_are_not_markup() {
        let html = concat!(
            r#"<script>document.write('<meta name="viewport" content="x">')</script>"#,
            r#"<textarea><meta name="viewport" content="x"></textarea>"#,
            r#"<title><meta name="viewport" content="x"></title>"#,
            r#"<style>/* <meta name="viewport" content="x"> */</style>"#,
            r#"<!-- <meta name="viewport" content="x"> -->"#,
            r#"<meta name="after" content="1">"#,
        );
        assert_eq!(extract_meta_tags(html), vec![MetaTag::named("after", "1")]);
    }

    #[test]
    fn template_contents_are_skipped() {
        let html = concat!(
            r#"<template><template></template><meta name="viewport" content="x"></template>"#,
            r#"<meta name="viewport" content="y">"#,
        );
        assert_eq!(
            extract_meta_tags(html),
            vec![MetaTag::named("viewport", "y")]
        );
    }

    #[test]
    fn svg_style_is_not_raw_text() {
        let html = concat!(
            r#"<body><svg><style><meta name="viewport" content="width=device-width">"#,
            r#"</style></svg>"#,
        );
        assert_eq!(
            extract_meta_tags(html),
            vec![MetaTag::named("viewport", "width=device-width")]
        );
    }

    #[test]
    fn svg_title_is_not_rcdata() {
        let html = concat!(
            r#"<body><svg><title><meta name="viewport" content="initial-scale=1">"#,
            r#"</title></svg>"#,
        );
        assert_eq!(
            extract_meta_tags(html),
            vec![MetaTag::named("viewport", "initial-scale=1")]
        );
    }

    #[test]
    fn math_contents_are_not_raw_text() {
        let html = concat!(
            r#"<math><mi><textarea></textarea></mi>"#,
            r#"<style><meta name="a" content="1"></style></math>"#,
        );
        assert_eq!(extract_meta_tags(html), vec![MetaTag::named("a", "1")]);
    }

    #[test]
    fn html_rules_resume_after_foreign_content() {
        let html = concat!(
            r#"<svg><g><style></style></g></svg>"#,
            r#"<style><meta name="viewport" content="x"></style>"#,
            r#"<svg><foreignObject><textarea><meta name="viewport" content="y"></textarea>"#,
            r#"</foreignObject></svg>"#,
        );
        assert!(extract_meta_tags(html).is_empty());
    }

    #[test]
    fn breakout_leaves_foreign_content() {
        let html = concat!(
            r#"<svg><p>text</p><style><meta name="viewport" content="x"></style>"#,
            r#"<meta name="after" content="1">"#,
        );
        assert_eq!(extract_meta_tags(html), vec![MetaTag::named("after", "1")]);
    }

    #[test]
    fn empty_input_has_no_tags() {
        assert!(extract_meta_tags("").is_empty());
    }
}
