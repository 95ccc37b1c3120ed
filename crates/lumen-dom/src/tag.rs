//! Element tags
//!
//! Fixed tag vocabulary. The discriminant doubles as the wire byte used by
//! render commands.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tag {
    Div = 0,
    Span = 1,
    P = 2,
    Img = 3,
    Text = 4,
    Style = 5,
    Unknown = 6,

    // Structural
    Body = 7,
    Section = 8,
    Header = 9,
    Footer = 10,
    Nav = 11,
    Main = 12,
    Article = 13,
    Aside = 14,
    Ul = 15,
    Ol = 16,
    Li = 17,

    // Text-level
    H1 = 18,
    H2 = 19,
    H3 = 20,
    H4 = 21,
    H5 = 22,
    H6 = 23,
    A = 24,
    Strong = 25,
    Em = 26,
    Label = 27,
    Pre = 28,
    Code = 29,

    // Interactive
    Button = 30,
    Input = 31,
    Textarea = 32,
    Select = 33,

    // Media
    Video = 34,
    Audio = 35,
    Canvas = 36,
    Svg = 37,
}

const ALL: [Tag; 38] = [
    Tag::Div, Tag::Span, Tag::P, Tag::Img, Tag::Text, Tag::Style, Tag::Unknown,
    Tag::Body, Tag::Section, Tag::Header, Tag::Footer, Tag::Nav, Tag::Main,
    Tag::Article, Tag::Aside, Tag::Ul, Tag::Ol, Tag::Li,
    Tag::H1, Tag::H2, Tag::H3, Tag::H4, Tag::H5, Tag::H6,
    Tag::A, Tag::Strong, Tag::Em, Tag::Label, Tag::Pre, Tag::Code,
    Tag::Button, Tag::Input, Tag::Textarea, Tag::Select,
    Tag::Video, Tag::Audio, Tag::Canvas, Tag::Svg,
];

impl Tag {
    /// Resolve a tag name (case-insensitive). Unrecognized names map to
    /// [`Tag::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        ALL.iter()
            .copied()
            .find(|t| *t != Tag::Unknown && t.name() == lower)
            .unwrap_or(Tag::Unknown)
    }

    /// Lowercase tag name as used by type selectors.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::P => "p",
            Tag::Img => "img",
            Tag::Text => "#text",
            Tag::Style => "style",
            Tag::Unknown => "unknown",
            Tag::Body => "body",
            Tag::Section => "section",
            Tag::Header => "header",
            Tag::Footer => "footer",
            Tag::Nav => "nav",
            Tag::Main => "main",
            Tag::Article => "article",
            Tag::Aside => "aside",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::A => "a",
            Tag::Strong => "strong",
            Tag::Em => "em",
            Tag::Label => "label",
            Tag::Pre => "pre",
            Tag::Code => "code",
            Tag::Button => "button",
            Tag::Input => "input",
            Tag::Textarea => "textarea",
            Tag::Select => "select",
            Tag::Video => "video",
            Tag::Audio => "audio",
            Tag::Canvas => "canvas",
            Tag::Svg => "svg",
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(byte: u8) -> Option<Self> {
        ALL.get(byte as usize).copied()
    }

    #[inline]
    pub fn is_text(self) -> bool {
        self == Tag::Text
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Div
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_byte_matches_table() {
        for (i, tag) in ALL.iter().enumerate() {
            assert_eq!(tag.as_u8() as usize, i);
            assert_eq!(Tag::from_u8(i as u8), Some(*tag));
        }
        assert_eq!(Tag::from_u8(ALL.len() as u8), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Tag::from_name("DIV"), Tag::Div);
        assert_eq!(Tag::from_name("button"), Tag::Button);
        assert_eq!(Tag::from_name("marquee"), Tag::Unknown);
        assert_eq!(Tag::from_name("unknown"), Tag::Unknown);
    }
}
