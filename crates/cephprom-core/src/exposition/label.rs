use std::fmt;

/// Escape a label value for the text format.
///
/// Backslash first, so the quote and newline substitutions are not escaped twice.
pub fn escape(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// One `name="value"` pair. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    name: String,
    value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, escape(&self.value))
    }
}
