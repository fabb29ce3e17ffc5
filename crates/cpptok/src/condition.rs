//! Evaluation of `#if`/`#elif` boolean expressions.
//!
//! A restricted integer expression grammar is supported: literals,
//! `defined(X)` / `defined X`, unary `!` and `-`, multiplicative and
//! additive arithmetic, comparisons, equality, `&&`, `||`, and
//! parentheses. Operator precedence is applied via the shunting-yard
//! algorithm; the value stack accumulates the result left to right.
//!
//! Malformed expressions evaluate to `false` permissively — a broken
//! `#if` line must not abort the lexing pass.

use cpptok_core::{is_ident_continue, is_ident_start};

/// Resolves identifiers encountered inside a condition expression.
///
/// The tokenizer implements this against the symbol table: `value_of`
/// performs a one-level macro expansion of `name` and classifies the
/// result as a number, with undefined identifiers evaluating to 0 as a
/// real preprocessor does.
pub trait SymbolResolver {
    /// Is `name` a known macro? (`defined(name)`)
    fn is_defined(&self, name: &str) -> bool;
    /// Numeric value of `name` after one-level expansion; 0 if unknown.
    fn value_of(&self, name: &str) -> i64;
}

/// Binary and unary operators recognized in condition expressions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Not,
    Neg,
}

impl Op {
    /// Binding strength; higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Rem => 6,
            Self::Not | Self::Neg => 7,
        }
    }

    fn is_unary(self) -> bool {
        matches!(self, Self::Not | Self::Neg)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum CondToken {
    Value(i64),
    Op(Op),
    LParen,
    RParen,
}

/// Evaluate a condition expression to its truth value.
///
/// Returns `false` for empty or malformed input.
pub fn evaluate(expr: &str, resolver: &dyn SymbolResolver) -> bool {
    tokenize(expr, resolver)
        .and_then(|tokens| eval_tokens(&tokens))
        .map(|v| v != 0)
        .unwrap_or(false)
}

/// Lex the expression into values and operators, resolving `defined`
/// and identifiers on the fly. `None` on malformed input.
fn tokenize(expr: &str, resolver: &dyn SymbolResolver) -> Option<Vec<CondToken>> {
    let bytes = expr.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    // Tracks whether the next `-`/`!` is unary (expression start, after
    // an operator, or after an opening parenthesis).
    let mut expect_operand = true;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'(' => {
                tokens.push(CondToken::LParen);
                expect_operand = true;
                i += 1;
            }
            b')' => {
                tokens.push(CondToken::RParen);
                expect_operand = false;
                i += 1;
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && (is_ident_continue(bytes[i]) || bytes[i] == b'.') {
                    i += 1;
                }
                tokens.push(CondToken::Value(parse_number(&expr[start..i])?));
                expect_operand = false;
            }
            b'!' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(CondToken::Op(Op::Ne));
                    expect_operand = true;
                    i += 2;
                } else {
                    tokens.push(CondToken::Op(Op::Not));
                    expect_operand = true;
                    i += 1;
                }
            }
            b'&' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'&' {
                    tokens.push(CondToken::Op(Op::And));
                    expect_operand = true;
                    i += 2;
                } else {
                    return None; // bitwise ops not supported
                }
            }
            b'|' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'|' {
                    tokens.push(CondToken::Op(Op::Or));
                    expect_operand = true;
                    i += 2;
                } else {
                    return None;
                }
            }
            b'=' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(CondToken::Op(Op::Eq));
                    expect_operand = true;
                    i += 2;
                } else {
                    return None;
                }
            }
            b'<' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(CondToken::Op(Op::Le));
                    i += 2;
                } else {
                    tokens.push(CondToken::Op(Op::Lt));
                    i += 1;
                }
                expect_operand = true;
            }
            b'>' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'=' {
                    tokens.push(CondToken::Op(Op::Ge));
                    i += 2;
                } else {
                    tokens.push(CondToken::Op(Op::Gt));
                    i += 1;
                }
                expect_operand = true;
            }
            b'+' => {
                tokens.push(CondToken::Op(Op::Add));
                expect_operand = true;
                i += 1;
            }
            b'-' => {
                tokens.push(CondToken::Op(if expect_operand { Op::Neg } else { Op::Sub }));
                expect_operand = true;
                i += 1;
            }
            b'*' => {
                tokens.push(CondToken::Op(Op::Mul));
                expect_operand = true;
                i += 1;
            }
            b'/' => {
                tokens.push(CondToken::Op(Op::Div));
                expect_operand = true;
                i += 1;
            }
            b'%' => {
                tokens.push(CondToken::Op(Op::Rem));
                expect_operand = true;
                i += 1;
            }
            _ if is_ident_start(b) => {
                let start = i;
                while i < bytes.len() && is_ident_continue(bytes[i]) {
                    i += 1;
                }
                let ident = &expr[start..i];
                if ident == "defined" {
                    let (name, rest) = parse_defined_operand(&expr[i..])?;
                    tokens.push(CondToken::Value(i64::from(resolver.is_defined(name))));
                    i += rest;
                } else {
                    tokens.push(CondToken::Value(resolver.value_of(ident)));
                }
                expect_operand = false;
            }
            _ => return None,
        }
    }

    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

/// Parse the operand of `defined`: either `(NAME)` or a bare `NAME`.
/// Returns the name and the number of bytes consumed.
fn parse_defined_operand(rest: &str) -> Option<(&str, usize)> {
    let bytes = rest.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    let parenthesized = i < bytes.len() && bytes[i] == b'(';
    if parenthesized {
        i += 1;
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
    }
    let start = i;
    while i < bytes.len() && is_ident_continue(bytes[i]) {
        i += 1;
    }
    if start == i {
        return None;
    }
    let name = &rest[start..i];
    if parenthesized {
        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b')' {
            return None;
        }
        i += 1;
    }
    Some((name, i))
}

/// Parse a C integer literal: decimal, `0x` hex, or leading-zero octal.
/// Suffixes (`U`, `L`, ...) and a trailing float part are tolerated by
/// truncating at the first non-digit.
pub(crate) fn parse_number(text: &str) -> Option<i64> {
    let lower = text.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if lower.len() > 1 && lower.starts_with('0') && lower[1..].bytes().all(|b| b.is_ascii_digit()) {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_hexdigit() && b != b'.')
        .unwrap_or(digits.len());
    let core = &digits[..end];
    let core = core.split('.').next().unwrap_or("");
    if core.is_empty() {
        // "0" alone hits the octal branch with empty digits
        return if lower == "0" || lower.starts_with('0') {
            Some(0)
        } else {
            None
        };
    }
    i64::from_str_radix(core, radix).ok()
}

/// Shunting-yard evaluation of the token stream.
///
/// Operators are shunted through a stack by precedence; values reduce
/// eagerly, so no explicit postfix vector is materialized.
fn eval_tokens(tokens: &[CondToken]) -> Option<i64> {
    let mut values: Vec<i64> = Vec::new();
    let mut ops: Vec<CondToken> = Vec::new();

    for token in tokens {
        match token {
            CondToken::Value(v) => values.push(*v),
            CondToken::LParen => ops.push(CondToken::LParen),
            CondToken::RParen => {
                loop {
                    match ops.pop()? {
                        CondToken::LParen => break,
                        CondToken::Op(op) => apply(op, &mut values)?,
                        _ => return None,
                    }
                }
            }
            CondToken::Op(op) => {
                while let Some(CondToken::Op(top)) = ops.last() {
                    // Unary operators are right-associative: stop at equal
                    // precedence so `!!x` applies innermost first.
                    let reduce = if op.is_unary() {
                        top.precedence() > op.precedence()
                    } else {
                        top.precedence() >= op.precedence()
                    };
                    if !reduce {
                        break;
                    }
                    let top = *top;
                    ops.pop();
                    apply(top, &mut values)?;
                }
                ops.push(CondToken::Op(*op));
            }
        }
    }

    while let Some(token) = ops.pop() {
        match token {
            CondToken::Op(op) => apply(op, &mut values)?,
            _ => return None, // unbalanced parenthesis
        }
    }

    if values.len() == 1 {
        values.pop()
    } else {
        None
    }
}

/// Apply one operator to the value stack.
fn apply(op: Op, values: &mut Vec<i64>) -> Option<()> {
    if op.is_unary() {
        let v = values.pop()?;
        values.push(match op {
            Op::Not => i64::from(v == 0),
            Op::Neg => v.wrapping_neg(),
            _ => unreachable!(),
        });
        return Some(());
    }
    let rhs = values.pop()?;
    let lhs = values.pop()?;
    let result = match op {
        Op::Or => i64::from(lhs != 0 || rhs != 0),
        Op::And => i64::from(lhs != 0 && rhs != 0),
        Op::Eq => i64::from(lhs == rhs),
        Op::Ne => i64::from(lhs != rhs),
        Op::Lt => i64::from(lhs < rhs),
        Op::Le => i64::from(lhs <= rhs),
        Op::Gt => i64::from(lhs > rhs),
        Op::Ge => i64::from(lhs >= rhs),
        Op::Add => lhs.wrapping_add(rhs),
        Op::Sub => lhs.wrapping_sub(rhs),
        Op::Mul => lhs.wrapping_mul(rhs),
        Op::Div => lhs.checked_div(rhs)?,
        Op::Rem => lhs.checked_rem(rhs)?,
        Op::Not | Op::Neg => unreachable!(),
    };
    values.push(result);
    Some(())
}
