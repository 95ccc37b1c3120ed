//! `style` attribute parsing

/// Inline declarations in source order.
///
/// Order matters when a shorthand and one of its longhands are both present:
/// whichever comes later wins. Setting a property moves it to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    entries: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set `name`, replacing any earlier entry and moving it to the end
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, value.into()));
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Parse `prop: value; prop2: value2` into ordered declarations.
///
/// Property names are lowercased. Entries without a colon, or with an empty
/// name or value, are skipped. A repeated property keeps its last position.
pub fn parse_inline_style(text: &str) -> InlineStyle {
    let mut out = InlineStyle::new();
    for decl in text.split(';') {
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        out.set(name, value);
    }
    out
}
