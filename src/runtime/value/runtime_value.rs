//! Runtime value type for scratch-vm
//!
//! A `Value` is either a number or a piece of text. Text is either an
//! exclusively owned buffer or a literal shared with the block graph.
//!
//! Ownership rules:
//! - Assigning into a value drops whatever it held before; an owned buffer is
//!   therefore released exactly once, on overwrite or destruction.
//! - A literal is never released by the holder, dropping it only decrements
//!   the graph's reference count.
//! - Values produced by expression evaluation are fresh temporaries; the
//!   consumer drops them after use.
//! - A variable always owns its text: storing a literal duplicates it.

use std::fmt;
use std::sync::Arc;

/// Number representation used by every numeric block.
pub type Number = f64;

/// Text payload of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    /// Exclusively owned buffer, released when the holder drops it.
    Owned(String),
    /// Literal constant borrowed from the block graph.
    Literal(Arc<str>),
}

impl Text {
    /// Borrow the text contents.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Text::Owned(s) => s,
            Text::Literal(s) => s,
        }
    }

    /// Whether the holder owns (and will release) the buffer.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self, Text::Owned(_))
    }
}

/// Dynamically-typed runtime value.
///
/// Exactly one representation is active at a time. Reading a value through
/// the "wrong" accessor never converts: [`Value::read_number`] on text is `0`
/// and [`Value::read_text`] on a number is the empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Numeric state
    Number(Number),
    /// Textual state
    Text(Text),
}

impl Default for Value {
    fn default() -> Self {
        Value::bare()
    }
}

// ============================================================================
// Construction
// ============================================================================

impl Value {
    /// Bare value: numeric zero, no text buffer.
    #[inline]
    pub fn bare() -> Self {
        Value::Number(0.0)
    }

    /// Numeric value.
    #[inline]
    pub fn number(n: Number) -> Self {
        Value::Number(n)
    }

    /// Text value owning a fresh copy of `s`.
    #[inline]
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Text::Owned(s.into()))
    }

    /// Text value borrowing a literal; the holder never frees it.
    #[inline]
    pub fn literal(s: impl Into<Arc<str>>) -> Self {
        Value::Text(Text::Literal(s.into()))
    }

    /// Construct text in either ownership mode.
    pub fn from_text(
        s: &str,
        owned: bool,
    ) -> Self {
        if owned {
            Value::text(s)
        } else {
            Value::literal(s)
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

impl Value {
    /// Numeric contents, `0` when the value holds text.
    #[inline]
    pub fn read_number(&self) -> Number {
        match self {
            Value::Number(n) => *n,
            Value::Text(_) => 0.0,
        }
    }

    /// Text contents, `""` when the value holds a number.
    ///
    /// Numbers are deliberately not stringified: joining a numeric variable
    /// contributes nothing.
    #[inline]
    pub fn read_text(&self) -> &str {
        match self {
            Value::Number(_) => "",
            Value::Text(t) => t.as_str(),
        }
    }

    /// Whether the value is in numeric state.
    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Whether the value is in text state.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Whether the value holds an owned text buffer.
    #[inline]
    pub fn owns_buffer(&self) -> bool {
        matches!(self, Value::Text(t) if t.is_owned())
    }

    /// Condition truthiness.
    ///
    /// Numbers are truthy when non-zero and not NaN. Text is truthy unless it
    /// is empty, `"0"`, or `"false"` in any case.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(t) => {
                let s = t.as_str();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
        }
    }
}

// ============================================================================
// Assignment
// ============================================================================

impl Value {
    /// Move `new` in, returning `true` when an owned buffer was released.
    ///
    /// Used to store evaluation temporaries without copying them again.
    pub fn assign(
        &mut self,
        new: Value,
    ) -> bool {
        let released = self.owns_buffer();
        *self = new;
        released
    }

    /// Store an evaluation temporary.
    ///
    /// Owned text and numbers move in; a literal is duplicated into a fresh
    /// buffer so a variable always owns the text it holds.
    pub fn assign_owned(
        &mut self,
        new: Value,
    ) -> bool {
        match new {
            Value::Text(Text::Literal(s)) => self.assign_text(&s),
            other => self.assign(other),
        }
    }

    /// Switch to numeric state.
    ///
    /// Releases a previously owned text buffer (reported by the return value);
    /// a literal is dropped without being freed.
    pub fn assign_number(
        &mut self,
        n: Number,
    ) -> bool {
        self.assign(Value::Number(n))
    }

    /// Duplicate `s` into a freshly owned buffer.
    pub fn assign_text(
        &mut self,
        s: &str,
    ) -> bool {
        self.assign(Value::text(s))
    }

    /// Copy the active representation of `other`, duplicating text.
    pub fn assign_from(
        &mut self,
        other: &Value,
    ) -> bool {
        match other {
            Value::Number(n) => self.assign_number(*n),
            Value::Text(t) => self.assign_text(t.as_str()),
        }
    }

    /// Release an owned buffer and reset to the bare numeric-zero state.
    pub fn release(&mut self) -> bool {
        self.assign(Value::bare())
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for Value {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(t) => write!(f, "\"{}\"", t.as_str()),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(Text::Owned(s))
    }
}
