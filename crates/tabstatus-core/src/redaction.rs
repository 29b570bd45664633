use std::collections::HashMap;

/// Hosts whose page titles are never mirrored. Any tab on one of these hosts
/// is reported only by the label.
const BUILTIN: &[(&str, &str)] = &[
    ("mail.google.com", "Gmail"),
    ("calendar.google.com", "Google Calendar"),
    ("outlook.live.com", "Outlook"),
    ("outlook.office.com", "Outlook"),
    ("outlook.office365.com", "Outlook"),
    ("mail.proton.me", "Proton Mail"),
    ("app.fastmail.com", "Fastmail"),
    ("mail.yahoo.com", "Yahoo Mail"),
];

/// Exact-host → label lookup consulted by the sanitizer.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionTable {
    entries: HashMap<String, String>,
}

impl RedactionTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(host, label)| (host.to_string(), label.to_string()))
                .collect(),
        }
    }

    /// Built-in entries with `extra` layered on top. Later entries win.
    pub fn with_extra<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::builtin();
        for (host, label) in extra {
            table
                .entries
                .insert(host.as_ref().to_ascii_lowercase(), label.into());
        }
        table
    }

    pub fn label_for(&self, host: &str) -> Option<&str> {
        self.entries.get(host).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RedactionTable {
    fn default() -> Self {
        Self::builtin()
    }
}
