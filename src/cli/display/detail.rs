//! Detail view builder for key-value display of entity details.

use console::style;

use super::colors::label;

/// A builder for detail views (key-value display).
pub struct DetailView {
    title: String,
    sections: Vec<DetailSection>,
}

struct DetailSection {
    header: Option<String>,
    fields: Vec<(String, String)>,
    items: Vec<String>,
}

impl DetailSection {
    fn new(header: Option<String>) -> Self {
        Self {
            header,
            fields: vec![],
            items: vec![],
        }
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.items.is_empty()
    }
}

impl DetailView {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            sections: vec![DetailSection::new(None)],
        }
    }

    /// Add a key-value field to the current section.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.fields.push((key.to_string(), value.into()));
        }
        self
    }

    /// Add a field only if the value is Some.
    pub fn field_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self,
        }
    }

    /// Start a new named section. Sections left empty are not rendered.
    pub fn section(mut self, header: &str) -> Self {
        self.sections
            .push(DetailSection::new(Some(header.to_string())));
        self
    }

    /// Add a bullet-point item to the current section.
    pub fn item(mut self, text: impl Into<String>) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.items.push(text.into());
        }
        self
    }

    pub fn items<I, S>(self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        items.into_iter().fold(self, |view, item| view.item(item))
    }

    pub fn render(&self) -> String {
        let mut lines = vec![format!("{}", style(&self.title).bold())];
        let key_width = self
            .sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .map(|(k, _)| k.chars().count())
            .max()
            .unwrap_or(12);

        for section in self.sections.iter().filter(|s| !s.is_empty()) {
            if let Some(header) = &section.header {
                lines.push(String::new());
                lines.push(format!("{}", style(header).bold().underlined()));
            }
            for (key, value) in &section.fields {
                let padding = " ".repeat(key_width - key.chars().count());
                lines.push(format!("  {}{}  {}", label(key), padding, value));
            }
            for item in &section.items {
                lines.push(format!("  {} {}", style("\u{2022}").dim(), item));
            }
        }
        lines.join("\n")
    }
}
