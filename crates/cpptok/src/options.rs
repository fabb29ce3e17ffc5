//! Tokenizer configuration: the plain options struct and the skip-state
//! capability flags.

use bitflags::bitflags;

/// Behavioral options consumed read-only by the tokenizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Evaluate `#if`-family conditional directives and keep only the
    /// live branch. When `false`, directives lex as ordinary text.
    pub want_preprocessor: bool,
    /// Capture doc-style comments and deliver them with the next emitted
    /// identifier token via [`MacroTable::note_token`](crate::MacroTable::note_token).
    pub store_documentation: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            want_preprocessor: true,
            store_documentation: true,
        }
    }
}

bitflags! {
    /// Capability flags selecting which constructs the tokenizer skips
    /// wholesale between tokens.
    ///
    /// Flags combine with bitwise OR; the named preset constructors
    /// cover the combinations the downstream parser actually uses.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TokenizerState: u16 {
        /// Skip the right-hand side of an assignment (`= ...` up to the
        /// next top-level `,` or `;`).
        const SKIP_EQUAL = 1 << 0;
        /// Skip the branches of a ternary conditional (`? ... : ...`).
        const SKIP_QUESTION = 1 << 1;
        /// Skip array-subscript contents (`[...]`).
        const SKIP_SUBSCRIPT = 1 << 2;
        /// Lex a balanced `<...>` as one token (template-argument mode).
        const SINGLE_ANGLE_BRACE = 1 << 3;
        /// Raw-expression capture: only whitespace and comments are
        /// skipped; everything else reaches the caller as tokens.
        const READ_RAW_EXPRESSION = 1 << 4;
    }
}

impl TokenizerState {
    /// No skipping at all: every construct reaches the caller.
    #[must_use]
    pub const fn skip_none() -> Self {
        Self::empty()
    }

    /// Skip initializers, ternary branches, and subscripts — the default
    /// when only declaration shapes matter.
    #[must_use]
    pub const fn skip_unwanted() -> Self {
        Self::SKIP_EQUAL
            .union(Self::SKIP_QUESTION)
            .union(Self::SKIP_SUBSCRIPT)
    }

    /// Template-argument parsing: skip unwanted constructs and read
    /// `<...>` as a single token.
    #[must_use]
    pub const fn template_argument() -> Self {
        Self::skip_unwanted().union(Self::SINGLE_ANGLE_BRACE)
    }
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self::skip_unwanted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_none_is_empty() {
        assert!(TokenizerState::skip_none().is_empty());
    }

    #[test]
    fn skip_unwanted_combines_three_flags() {
        let s = TokenizerState::skip_unwanted();
        assert!(s.contains(TokenizerState::SKIP_EQUAL));
        assert!(s.contains(TokenizerState::SKIP_QUESTION));
        assert!(s.contains(TokenizerState::SKIP_SUBSCRIPT));
        assert!(!s.contains(TokenizerState::SINGLE_ANGLE_BRACE));
    }

    #[test]
    fn template_argument_adds_angle_mode() {
        let s = TokenizerState::template_argument();
        assert!(s.contains(TokenizerState::skip_unwanted()));
        assert!(s.contains(TokenizerState::SINGLE_ANGLE_BRACE));
    }

    #[test]
    fn default_options_enable_both() {
        let opts = TokenizerOptions::default();
        assert!(opts.want_preprocessor);
        assert!(opts.store_documentation);
    }
}
