//! Named variable bindings
//!
//! Each target owns one [`VariableStore`]. Variables are declared once at
//! build time, keep their declaration order, and are addressed at run time by
//! slot index.

use indexmap::IndexMap;

use super::runtime_value::Value;

/// Variables of one scope (a stage or sprite).
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    /// Owning scope name, e.g. `"Stage"` or a sprite name
    scope: String,
    /// Declared variables in declaration order
    vars: IndexMap<String, Value>,
}

impl VariableStore {
    /// Create an empty store for `scope`.
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            vars: IndexMap::new(),
        }
    }

    /// Owning scope name.
    #[inline]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Declare a variable and return its slot.
    ///
    /// Returns `None` if the name is already declared in this scope.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        initial: Value,
    ) -> Option<usize> {
        let name = name.into();
        if self.vars.contains_key(&name) {
            return None;
        }
        let (slot, _) = self.vars.insert_full(name, initial);
        Some(slot)
    }

    /// Slot of a declared variable.
    #[inline]
    pub fn slot_of(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.vars.get_index_of(name)
    }

    /// Look up a variable by name.
    #[inline]
    pub fn find(
        &self,
        name: &str,
    ) -> Option<&Value> {
        self.vars.get(name)
    }

    #[inline]
    pub fn get(
        &self,
        slot: usize,
    ) -> Option<&Value> {
        self.vars.get_index(slot).map(|(_, v)| v)
    }

    #[inline]
    pub fn get_mut(
        &mut self,
        slot: usize,
    ) -> Option<&mut Value> {
        self.vars.get_index_mut(slot).map(|(_, v)| v)
    }

    /// Name declared at `slot`.
    #[inline]
    pub fn name_of(
        &self,
        slot: usize,
    ) -> Option<&str> {
        self.vars.get_index(slot).map(|(k, _)| k.as_str())
    }

    /// Number of declared variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Duplicate the store for a clone of its target, under a new scope name.
    ///
    /// Text is copied into freshly owned buffers, like a variable assignment.
    pub fn duplicate(
        &self,
        scope: impl Into<String>,
    ) -> Self {
        let vars = self
            .vars
            .iter()
            .map(|(name, value)| {
                let mut copy = Value::bare();
                copy.assign_from(value);
                (name.clone(), copy)
            })
            .collect();
        Self {
            scope: scope.into(),
            vars,
        }
    }
}
