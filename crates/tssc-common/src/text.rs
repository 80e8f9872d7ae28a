//! Text helpers for line-oriented sclang output.
//!
//! Converters return multi-line strings and nest them by re-indenting whole
//! blocks, so indentation is applied per line instead of being threaded
//! through a writer.

/// One level of indentation in generated sclang.
pub const INDENT_UNIT: &str = "    ";

pub trait Indent {
    /// Prefix every line with `level` indentation units.
    ///
    /// Empty input and level 0 are returned unchanged.
    fn indent(&self, level: usize) -> String;
}

impl Indent for str {
    fn indent(&self, level: usize) -> String {
        if self.is_empty() || level == 0 {
            return self.to_string();
        }
        let prefix = INDENT_UNIT.repeat(level);
        let mut out = String::with_capacity(self.len() + prefix.len() * 4);
        for (i, line) in self.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&prefix);
            out.push_str(line);
        }
        out
    }
}

impl Indent for String {
    fn indent(&self, level: usize) -> String {
        self.as_str().indent(level)
    }
}

#[cfg(test)]
#[path = "../tests/text.rs"]
mod tests;
