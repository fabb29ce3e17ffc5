//! Read-only boundary with the external symbol table.
//!
//! The tokenizer never resolves symbols or builds scopes; it only asks
//! "is this name a known macro?", reads the macro's parameter list and
//! replacement text, and reports emitted identifier tokens back so a
//! documentation-capture collaborator can attach preceding doc comments.

/// Lightweight handle identifying a macro definition inside its table.
///
/// Identity (`==`) on this handle is the recursion guard: a macro whose
/// id is already on the active-expansion list is not expanded again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MacroId(pub u32);

/// Read-only view of one macro definition, owned by the symbol table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroDef {
    /// Macro name as written in the `#define`.
    pub name: String,
    /// `true` for function-like macros (`#define F(a) ...`), which
    /// require a parenthesized argument list at the usage site.
    pub function_like: bool,
    /// Parameter names, in declaration order. Empty for object-like
    /// macros and for `#define F() ...`.
    pub params: Vec<String>,
    /// Replacement text, verbatim from the definition body.
    pub replacement: String,
}

impl MacroDef {
    /// Object-like macro: direct text substitution.
    #[must_use]
    pub fn object_like(name: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function_like: false,
            params: Vec::new(),
            replacement: replacement.into(),
        }
    }

    /// Function-like macro with named parameters.
    #[must_use]
    pub fn function_like(
        name: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            function_like: true,
            params: params.into_iter().map(Into::into).collect(),
            replacement: replacement.into(),
        }
    }
}

/// The symbol-table collaborator, as seen from the tokenizer.
///
/// Implementations must be consistent for the duration of one lexing
/// session: the tokenizer treats the table as immutable while it runs.
pub trait MacroTable {
    /// Is `name` a known macro? Returns its handle if so.
    fn lookup(&self, name: &str) -> Option<MacroId>;

    /// Definition behind a handle previously returned by [`lookup`](Self::lookup).
    fn definition(&self, id: MacroId) -> Option<&MacroDef>;

    /// Called for every emitted identifier-shaped token.
    ///
    /// `documentation` carries doc comments collected since the previous
    /// token when the tokenizer runs with `store_documentation` enabled.
    /// The default implementation ignores the report.
    fn note_token(&self, name: &str, line: u32, documentation: Option<&str>) {
        let _ = (name, line, documentation);
    }
}

/// Trivial `Vec`-backed macro table for tests and embedders that do not
/// carry a full symbol table.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMacroTable {
    defs: Vec<MacroDef>,
}

impl InMemoryMacroTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, returning its handle. A redefinition of an
    /// existing name replaces the old body in place.
    pub fn define(&mut self, def: MacroDef) -> MacroId {
        if let Some(pos) = self.defs.iter().position(|d| d.name == def.name) {
            self.defs[pos] = def;
            return MacroId(pos as u32);
        }
        self.defs.push(def);
        MacroId((self.defs.len() - 1) as u32)
    }
}

impl MacroTable for InMemoryMacroTable {
    fn lookup(&self, name: &str) -> Option<MacroId> {
        self.defs
            .iter()
            .position(|d| d.name == name)
            .map(|pos| MacroId(pos as u32))
    }

    fn definition(&self, id: MacroId) -> Option<&MacroDef> {
        self.defs.get(id.0 as usize)
    }
}

/// Table with no macros at all; lexing degrades to plain tokenization.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyMacroTable;

impl MacroTable for EmptyMacroTable {
    fn lookup(&self, _name: &str) -> Option<MacroId> {
        None
    }

    fn definition(&self, _id: MacroId) -> Option<&MacroDef> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_defined_macro() {
        let mut table = InMemoryMacroTable::new();
        let id = table.define(MacroDef::object_like("AAA", "BBBB"));
        assert_eq!(table.lookup("AAA"), Some(id));
        assert_eq!(table.definition(id).map(|d| d.replacement.as_str()), Some("BBBB"));
    }

    #[test]
    fn lookup_misses_unknown_name() {
        let table = InMemoryMacroTable::new();
        assert_eq!(table.lookup("nope"), None);
    }

    #[test]
    fn redefinition_keeps_the_handle() {
        let mut table = InMemoryMacroTable::new();
        let first = table.define(MacroDef::object_like("X", "1"));
        let second = table.define(MacroDef::object_like("X", "2"));
        assert_eq!(first, second);
        assert_eq!(table.definition(first).map(|d| d.replacement.as_str()), Some("2"));
    }
}
