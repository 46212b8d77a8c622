//! Detail view builder for key-value display of entity details.

use console::style;

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

impl DetailView {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            sections: vec![DetailSection {
                header: None,
                fields: vec![],
                items: vec![],
            }],
        }
    }

    /// Add a key-value field to the current section.
    pub fn field(mut self, key: &str, value: &str) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.fields.push((key.to_string(), value.to_string()));
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

    /// Start a new named section with a header.
    pub fn section(mut self, header: &str) -> Self {
        self.sections.push(DetailSection {
            header: Some(header.to_string()),
            fields: vec![],
            items: vec![],
        });
        self
    }

    /// Add a bullet-point item to the current section.
    pub fn item(mut self, text: &str) -> Self {
        if let Some(section) = self.sections.last_mut() {
            section.items.push(text.to_string());
        }
        self
    }

    pub fn render(&self) -> String {
        let mut lines = vec![style(&self.title).bold().to_string()];
        let key_width = self
            .sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .map(|(k, _)| k.len())
            .max()
            .unwrap_or(12);

        for section in &self.sections {
            if let Some(header) = &section.header {
                lines.push(String::new());
                lines.push(style(header).bold().underlined().to_string());
                if section.fields.is_empty() && section.items.is_empty() {
                    lines.push(format!("  {}", style("None").dim()));
                }
            }
            for (key, value) in &section.fields {
                // Pad before styling so escape codes don't skew alignment.
                let key = format!("{:<width$}", format!("{key}:"), width = key_width + 1);
                lines.push(format!("  {}  {}", style(key).dim(), value));
            }
            for item in &section.items {
                lines.push(format!("  {} {}", style("\u{2022}").dim(), item));
            }
        }
        lines.join("\n")
    }
}
