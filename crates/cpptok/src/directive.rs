//! Classification of C-preprocessor directive lines.

/// Kind of a preprocessor directive, as far as branch selection cares.
///
/// `Other` covers every directive irrelevant to conditional branch
/// selection (`#include`, `#define`, `#pragma`, ...). Those are not
/// consumed by the tokenizer; the `#` is emitted as an ordinary token
/// for the downstream parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreprocessorType {
    /// `#if`
    If,
    /// `#ifdef`
    Ifdef,
    /// `#ifndef`
    Ifndef,
    /// `#elif`
    Elif,
    /// `#elifdef`
    Elifdef,
    /// `#elifndef`
    Elifndef,
    /// `#else`
    Else,
    /// `#endif`
    Endif,
    /// Any other directive.
    Other,
}

impl PreprocessorType {
    /// Classify the directive keyword following the `#`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "if" => Self::If,
            "ifdef" => Self::Ifdef,
            "ifndef" => Self::Ifndef,
            "elif" => Self::Elif,
            "elifdef" => Self::Elifdef,
            "elifndef" => Self::Elifndef,
            "else" => Self::Else,
            "endif" => Self::Endif,
            _ => Self::Other,
        }
    }

    /// Does this directive open a new conditional block?
    #[must_use]
    pub fn opens_block(self) -> bool {
        matches!(self, Self::If | Self::Ifdef | Self::Ifndef)
    }

    /// Is this a sibling branch head (`#elif`-family or `#else`)?
    #[must_use]
    pub fn is_branch_head(self) -> bool {
        matches!(
            self,
            Self::Elif | Self::Elifdef | Self::Elifndef | Self::Else
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_conditional_keywords() {
        assert_eq!(PreprocessorType::from_keyword("if"), PreprocessorType::If);
        assert_eq!(PreprocessorType::from_keyword("ifdef"), PreprocessorType::Ifdef);
        assert_eq!(PreprocessorType::from_keyword("ifndef"), PreprocessorType::Ifndef);
        assert_eq!(PreprocessorType::from_keyword("elif"), PreprocessorType::Elif);
        assert_eq!(PreprocessorType::from_keyword("elifdef"), PreprocessorType::Elifdef);
        assert_eq!(PreprocessorType::from_keyword("elifndef"), PreprocessorType::Elifndef);
        assert_eq!(PreprocessorType::from_keyword("else"), PreprocessorType::Else);
        assert_eq!(PreprocessorType::from_keyword("endif"), PreprocessorType::Endif);
    }

    #[test]
    fn non_conditional_directives_are_other() {
        for kw in ["include", "define", "pragma", "undef", "error", ""] {
            assert_eq!(PreprocessorType::from_keyword(kw), PreprocessorType::Other);
        }
    }

    #[test]
    fn block_and_branch_queries() {
        assert!(PreprocessorType::Ifdef.opens_block());
        assert!(!PreprocessorType::Elif.opens_block());
        assert!(PreprocessorType::Else.is_branch_head());
        assert!(!PreprocessorType::Endif.is_branch_head());
    }
}
