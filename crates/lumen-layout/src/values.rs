//! CSS value parsing for taffy styles
//!
//! Every parser returns `None` for values it does not understand so the
//! caller can leave the previous engine value in place.

use taffy::{
    AlignContent, AlignItems, AlignSelf, Dimension, Display, FlexDirection, FlexWrap,
    JustifyContent, LengthPercentage, LengthPercentageAuto, Overflow, Position,
};

/// A parsed length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Auto,
    Px(f32),
    /// Fraction in 0..=1
    Percent(f32),
}

pub fn parse_length(value: &str) -> Option<CssLength> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
        return Some(CssLength::Auto);
    }
    if let Some(num) = value.strip_suffix('%') {
        return num.trim().parse::<f32>().ok().map(|p| CssLength::Percent(p / 100.0));
    }
    let num = value.strip_suffix("px").unwrap_or(value);
    num.trim().parse::<f32>().ok().filter(|n| n.is_finite()).map(CssLength::Px)
}

pub fn parse_number(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|n| n.is_finite())
}

pub fn dimension(value: &str) -> Option<Dimension> {
    Some(match parse_length(value)? {
        CssLength::Auto => Dimension::Auto,
        CssLength::Px(px) => Dimension::Length(px),
        CssLength::Percent(p) => Dimension::Percent(p),
    })
}

pub fn length_percentage_auto(value: &str) -> Option<LengthPercentageAuto> {
    Some(match parse_length(value)? {
        CssLength::Auto => LengthPercentageAuto::Auto,
        CssLength::Px(px) => LengthPercentageAuto::Length(px),
        CssLength::Percent(p) => LengthPercentageAuto::Percent(p),
    })
}

/// Padding, border and gap do not accept `auto`
pub fn length_percentage(value: &str) -> Option<LengthPercentage> {
    match parse_length(value)? {
        CssLength::Auto => None,
        CssLength::Px(px) => Some(LengthPercentage::Length(px)),
        CssLength::Percent(p) => Some(LengthPercentage::Percent(p)),
    }
}

pub fn display(value: &str) -> Option<Display> {
    match value.trim() {
        "none" => Some(Display::None),
        "flex" | "inline-flex" => Some(Display::Flex),
        "grid" | "inline-grid" => Some(Display::Grid),
        "block" | "inline" | "inline-block" => Some(Display::Block),
        _ => None,
    }
}

pub fn position(value: &str) -> Option<Position> {
    match value.trim() {
        "absolute" | "fixed" => Some(Position::Absolute),
        "static" | "relative" | "sticky" => Some(Position::Relative),
        _ => None,
    }
}

pub fn overflow(value: &str) -> Option<Overflow> {
    match value.trim() {
        "visible" => Some(Overflow::Visible),
        "hidden" => Some(Overflow::Hidden),
        "clip" => Some(Overflow::Clip),
        "scroll" | "auto" => Some(Overflow::Scroll),
        _ => None,
    }
}

pub fn flex_direction(value: &str) -> Option<FlexDirection> {
    match value.trim() {
        "row" => Some(FlexDirection::Row),
        "row-reverse" => Some(FlexDirection::RowReverse),
        "column" => Some(FlexDirection::Column),
        "column-reverse" => Some(FlexDirection::ColumnReverse),
        _ => None,
    }
}

pub fn flex_wrap(value: &str) -> Option<FlexWrap> {
    match value.trim() {
        "nowrap" => Some(FlexWrap::NoWrap),
        "wrap" => Some(FlexWrap::Wrap),
        "wrap-reverse" => Some(FlexWrap::WrapReverse),
        _ => None,
    }
}

/// `Some(None)` means the keyword resets to the engine default
pub fn justify_content(value: &str) -> Option<Option<JustifyContent>> {
    Some(Some(match value.trim() {
        "normal" => return Some(None),
        "flex-start" | "start" | "left" => JustifyContent::FlexStart,
        "flex-end" | "end" | "right" => JustifyContent::FlexEnd,
        "center" => JustifyContent::Center,
        "space-between" => JustifyContent::SpaceBetween,
        "space-around" => JustifyContent::SpaceAround,
        "space-evenly" => JustifyContent::SpaceEvenly,
        "stretch" => JustifyContent::Stretch,
        _ => return None,
    }))
}

pub fn align_items(value: &str) -> Option<Option<AlignItems>> {
    Some(Some(match value.trim() {
        "normal" => return Some(None),
        "stretch" => AlignItems::Stretch,
        "flex-start" | "start" => AlignItems::FlexStart,
        "flex-end" | "end" => AlignItems::FlexEnd,
        "center" => AlignItems::Center,
        "baseline" => AlignItems::Baseline,
        _ => return None,
    }))
}

pub fn align_self(value: &str) -> Option<Option<AlignSelf>> {
    if value.trim() == "auto" {
        return Some(None);
    }
    align_items(value)
}

pub fn align_content(value: &str) -> Option<Option<AlignContent>> {
    Some(Some(match value.trim() {
        "normal" => return Some(None),
        "stretch" => AlignContent::Stretch,
        "flex-start" | "start" => AlignContent::FlexStart,
        "flex-end" | "end" => AlignContent::FlexEnd,
        "center" => AlignContent::Center,
        "space-between" => AlignContent::SpaceBetween,
        "space-around" => AlignContent::SpaceAround,
        "space-evenly" => AlignContent::SpaceEvenly,
        _ => return None,
    }))
}
