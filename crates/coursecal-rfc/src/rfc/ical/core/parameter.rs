//! Property parameters (RFC 5545 §3.2).

/// A parameter such as `LANGUAGE=zh-CN`. Multiple values are comma-joined
/// on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Uppercased on construction.
    pub name: String,
    pub values: Vec<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}
