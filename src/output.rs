//! HTML and text output
//!
//! Components describe themselves as an ordered list of label/value pairs.
//! The renderers here turn such a list into HTML `meta` tags or plain text.

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// When list positions are appended to output labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexLevel {
    /// Never number repeated entries
    #[default]
    Never,
    /// Number entries only when a list holds more than one
    WhenMultiple,
    /// Always number list entries
    Always,
}

impl IndexLevel {
    /// The suffix for item `index` (0-based) of a list of `total`
    pub fn suffix(&self, index: usize, total: usize) -> String {
        let numbered = match self {
            IndexLevel::Never => false,
            IndexLevel::WhenMultiple => total > 1,
            IndexLevel::Always => true,
        };
        if numbered {
            format!("[{}]", index + 1)
        } else {
            String::new()
        }
    }
}

/// Options applied when producing output entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Numbering of repeated entries
    pub index_level: IndexLevel,
}

/// One label/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    /// Dotted label, e.g. `subjectCoverage.keyword`
    pub name: String,
    /// Rendered value
    pub value: String,
}

/// Accumulates entries under a common dotted label
#[derive(Debug)]
pub struct OutputWriter<'a> {
    base: String,
    options: &'a OutputOptions,
    entries: Vec<OutputEntry>,
}

impl<'a> OutputWriter<'a> {
    /// Start a writer whose labels begin with `base`
    pub fn new(base: impl Into<String>, options: &'a OutputOptions) -> Self {
        Self {
            base: base.into(),
            options,
            entries: Vec::new(),
        }
    }

    /// The options in effect
    pub fn options(&self) -> &'a OutputOptions {
        self.options
    }

    /// The full label of `name` under this writer
    pub fn label(&self, name: &str) -> String {
        if self.base.is_empty() {
            name.to_string()
        } else if name.is_empty() {
            self.base.clone()
        } else {
            format!("{}.{}", self.base, name)
        }
    }

    /// Add an entry labelled with the base itself, skipping empty values
    pub fn add_value(&mut self, value: impl AsRef<str>) {
        self.add("", value);
    }

    /// Add an entry, skipping empty values
    pub fn add(&mut self, name: &str, value: impl AsRef<str>) {
        let value = value.as_ref();
        if !value.is_empty() {
            self.entries.push(OutputEntry {
                name: self.label(name),
                value: value.to_string(),
            });
        }
    }

    /// Add one entry per value, numbered per the index level
    pub fn add_list<S: AsRef<str>>(&mut self, name: &str, values: &[S]) {
        for (i, value) in values.iter().enumerate() {
            let suffix = self.options.index_level.suffix(i, values.len());
            self.add(&format!("{}{}", name, suffix), value);
        }
    }

    /// Append entries produced by a nested component
    pub fn extend(&mut self, entries: Vec<OutputEntry>) {
        self.entries.extend(entries);
    }

    /// Finish and return the entries
    pub fn finish(self) -> Vec<OutputEntry> {
        self.entries
    }
}

/// Render entries as HTML `meta` tags inside a minimal document
pub fn render_html(entries: &[OutputEntry]) -> String {
    let mut out = String::from("<html><head><title>DDMS Metadata</title>\n");
    out.push_str(&render_html_meta(entries));
    out.push_str("</head><body></body></html>\n");
    out
}

/// Render entries as bare HTML `meta` tags
pub fn render_html_meta(entries: &[OutputEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            format!(
                "<meta name=\"{}\" content=\"{}\" />\n",
                escape(e.name.as_str()),
                escape(e.value.as_str())
            )
        })
        .collect()
}

/// Render entries as `name: value` lines
pub fn render_text(entries: &[OutputEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}: {}\n", e.name, e.value))
        .collect()
}
