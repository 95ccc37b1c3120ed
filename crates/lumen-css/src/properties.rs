//! CSS Properties
//!
//! The supported property set. Declarations for anything outside this
//! enumeration are dropped during cascade.

/// Supported property identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyId {
    // Display & positioning
    Display,
    Position,
    Overflow,
    Top,
    Right,
    Bottom,
    Left,
    ZIndex,

    // Box model
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderWidth,

    // Flexbox
    FlexDirection,
    FlexWrap,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    JustifyContent,
    AlignItems,
    AlignSelf,
    AlignContent,
    RowGap,
    ColumnGap,

    // Paint
    Color,
    BackgroundColor,
    Opacity,

    // Text
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    LineHeight,
    TextAlign,
    LetterSpacing,
    WordSpacing,
    WhiteSpace,
    Direction,

    // Interaction
    Visibility,
    Cursor,
}

/// Properties copied from the parent when a node has no own value
pub const INHERITED_PROPERTIES: &[PropertyId] = &[
    PropertyId::Color,
    PropertyId::FontFamily,
    PropertyId::FontSize,
    PropertyId::FontWeight,
    PropertyId::FontStyle,
    PropertyId::LineHeight,
    PropertyId::TextAlign,
    PropertyId::Visibility,
    PropertyId::Cursor,
    PropertyId::Direction,
    PropertyId::LetterSpacing,
    PropertyId::WordSpacing,
    PropertyId::WhiteSpace,
];

/// Initial values for non-inherited properties left unset after cascade
pub const INITIAL_VALUES: &[(PropertyId, &str)] = &[
    (PropertyId::Display, "block"),
    (PropertyId::MarginTop, "0"),
    (PropertyId::MarginRight, "0"),
    (PropertyId::MarginBottom, "0"),
    (PropertyId::MarginLeft, "0"),
    (PropertyId::PaddingTop, "0"),
    (PropertyId::PaddingRight, "0"),
    (PropertyId::PaddingBottom, "0"),
    (PropertyId::PaddingLeft, "0"),
    (PropertyId::BorderWidth, "0"),
    (PropertyId::BackgroundColor, "transparent"),
    (PropertyId::Width, "auto"),
    (PropertyId::Height, "auto"),
    (PropertyId::Opacity, "1"),
    (PropertyId::Overflow, "visible"),
    (PropertyId::Position, "static"),
];

const NAMES: &[(PropertyId, &str)] = &[
    (PropertyId::Display, "display"),
    (PropertyId::Position, "position"),
    (PropertyId::Overflow, "overflow"),
    (PropertyId::Top, "top"),
    (PropertyId::Right, "right"),
    (PropertyId::Bottom, "bottom"),
    (PropertyId::Left, "left"),
    (PropertyId::ZIndex, "z-index"),
    (PropertyId::Width, "width"),
    (PropertyId::Height, "height"),
    (PropertyId::MinWidth, "min-width"),
    (PropertyId::MinHeight, "min-height"),
    (PropertyId::MaxWidth, "max-width"),
    (PropertyId::MaxHeight, "max-height"),
    (PropertyId::MarginTop, "margin-top"),
    (PropertyId::MarginRight, "margin-right"),
    (PropertyId::MarginBottom, "margin-bottom"),
    (PropertyId::MarginLeft, "margin-left"),
    (PropertyId::PaddingTop, "padding-top"),
    (PropertyId::PaddingRight, "padding-right"),
    (PropertyId::PaddingBottom, "padding-bottom"),
    (PropertyId::PaddingLeft, "padding-left"),
    (PropertyId::BorderWidth, "border-width"),
    (PropertyId::FlexDirection, "flex-direction"),
    (PropertyId::FlexWrap, "flex-wrap"),
    (PropertyId::FlexGrow, "flex-grow"),
    (PropertyId::FlexShrink, "flex-shrink"),
    (PropertyId::FlexBasis, "flex-basis"),
    (PropertyId::JustifyContent, "justify-content"),
    (PropertyId::AlignItems, "align-items"),
    (PropertyId::AlignSelf, "align-self"),
    (PropertyId::AlignContent, "align-content"),
    (PropertyId::RowGap, "row-gap"),
    (PropertyId::ColumnGap, "column-gap"),
    (PropertyId::Color, "color"),
    (PropertyId::BackgroundColor, "background-color"),
    (PropertyId::Opacity, "opacity"),
    (PropertyId::FontFamily, "font-family"),
    (PropertyId::FontSize, "font-size"),
    (PropertyId::FontWeight, "font-weight"),
    (PropertyId::FontStyle, "font-style"),
    (PropertyId::LineHeight, "line-height"),
    (PropertyId::TextAlign, "text-align"),
    (PropertyId::LetterSpacing, "letter-spacing"),
    (PropertyId::WordSpacing, "word-spacing"),
    (PropertyId::WhiteSpace, "white-space"),
    (PropertyId::Direction, "direction"),
    (PropertyId::Visibility, "visibility"),
    (PropertyId::Cursor, "cursor"),
];

impl PropertyId {
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, n)| *n)
            .unwrap_or("")
    }

    pub fn is_inherited(self) -> bool {
        INHERITED_PROPERTIES.contains(&self)
    }

    pub fn initial_value(self) -> Option<&'static str> {
        INITIAL_VALUES
            .iter()
            .find(|(id, _)| *id == self)
            .map(|(_, v)| *v)
    }

    /// Whether the property feeds the layout engine
    pub fn affects_layout(self) -> bool {
        !matches!(
            self,
            PropertyId::Color
                | PropertyId::BackgroundColor
                | PropertyId::Opacity
                | PropertyId::FontFamily
                | PropertyId::FontStyle
                | PropertyId::TextAlign
                | PropertyId::Visibility
                | PropertyId::Cursor
                | PropertyId::ZIndex
        )
    }

    pub fn all() -> impl Iterator<Item = PropertyId> {
        NAMES.iter().map(|(id, _)| *id)
    }
}

/// Expand one declaration into longhand (property, value) pairs.
///
/// Handles the `margin`, `padding`, `gap` and `flex` shorthands. Unknown
/// properties produce nothing.
pub fn expand_declaration(name: &str, value: &str) -> Vec<(PropertyId, String)> {
    let name = name.trim().to_ascii_lowercase();
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    match name.as_str() {
        "margin" => expand_box(value, [
            PropertyId::MarginTop,
            PropertyId::MarginRight,
            PropertyId::MarginBottom,
            PropertyId::MarginLeft,
        ]),
        "padding" => expand_box(value, [
            PropertyId::PaddingTop,
            PropertyId::PaddingRight,
            PropertyId::PaddingBottom,
            PropertyId::PaddingLeft,
        ]),
        "gap" => {
            let parts: Vec<&str> = value.split_whitespace().collect();
            match parts.as_slice() {
                [both] => vec![
                    (PropertyId::RowGap, both.to_string()),
                    (PropertyId::ColumnGap, both.to_string()),
                ],
                [row, column] => vec![
                    (PropertyId::RowGap, row.to_string()),
                    (PropertyId::ColumnGap, column.to_string()),
                ],
                _ => Vec::new(),
            }
        }
        "flex" => expand_flex(value),
        _ => PropertyId::from_name(&name)
            .map(|id| vec![(id, value.to_string())])
            .unwrap_or_default(),
    }
}

fn expand_box(value: &str, sides: [PropertyId; 4]) -> Vec<(PropertyId, String)> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    // top, right, bottom, left
    let [t, r, b, l] = match parts.as_slice() {
        [a] => [*a, *a, *a, *a],
        [v, h] => [*v, *h, *v, *h],
        [t, h, b] => [*t, *h, *b, *h],
        [t, r, b, l] => [*t, *r, *b, *l],
        _ => return Vec::new(),
    };
    sides
        .into_iter()
        .zip([t, r, b, l])
        .map(|(id, v)| (id, v.to_string()))
        .collect()
}

fn expand_flex(value: &str) -> Vec<(PropertyId, String)> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let (grow, shrink, basis) = match parts.as_slice() {
        ["none"] => ("0", "0", "auto"),
        ["auto"] => ("1", "1", "auto"),
        [g] if g.parse::<f32>().is_ok() => (*g, "1", "0%"),
        [basis] => ("1", "1", *basis),
        [g, s] if s.parse::<f32>().is_ok() => (*g, *s, "0%"),
        [g, basis] => (*g, "1", *basis),
        [g, s, basis] => (*g, *s, *basis),
        _ => return Vec::new(),
    };
    vec![
        (PropertyId::FlexGrow, grow.to_string()),
        (PropertyId::FlexShrink, shrink.to_string()),
        (PropertyId::FlexBasis, basis.to_string()),
    ]
}
