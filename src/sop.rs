//! Parser for sum-of-products expressions like `x1.x3 + ~x1.x2`.

use crate::formula::{Clause, Literal, Variable};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SopParseError {
    /// The input contains a character outside `[ \r\n.~+x0-9]`.
    InvalidSyntax { character: char, position: usize },
}

impl Display for SopParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SopParseError::InvalidSyntax { character, position } => {
                write!(f, "invalid character {:?} at offset {}", character, position)
            }
        }
    }
}

impl std::error::Error for SopParseError {}

/// Parses an SOP expression into its product terms, one `Clause` per term,
/// with polarities exactly as written.
///
/// Only the character set is validated. Within the allowed alphabet the parser
/// is deliberately lenient: fragments that do not form a `~?x<digits>` literal
/// (a dangling `~`, an `x` with no digits, bare digits) are silently dropped,
/// and terms left with no literals produce no clause. That leniency is a
/// documented contract of this parser, not an accident. Duplicate literals in a
/// term collapse; a contradictory pair like `x1.~x1` is kept and left for the
/// solver to refute.
pub fn parse(input: &str) -> Result<Vec<Clause>, SopParseError> {
    for (position, character) in input.char_indices() {
        match character {
            ' ' | '\r' | '\n' | '.' | '~' | '+' | 'x' | 'X' | '0'..='9' => {}
            _ => return Err(SopParseError::InvalidSyntax { character, position }),
        }
    }

    let mut terms = vec![];
    for term in input.split('+') {
        let literals = scan_term(term);
        if !literals.is_empty() {
            terms.push(Clause::new(literals));
        }
    }
    Ok(terms)
}

// Within a term, '.' separators and whitespace carry no meaning, so the scan
// runs over the compacted `~`/`x`/digit characters only.
fn scan_term(term: &str) -> Vec<Literal> {
    let chars: Vec<char> = term
        .chars()
        .filter(|c| !matches!(c, ' ' | '\r' | '\n' | '.'))
        .collect();

    let mut literals = vec![];
    let mut i = 0;
    while i < chars.len() {
        let negative = chars[i] == '~';
        let mut j = if negative { i + 1 } else { i };

        if j < chars.len() && (chars[j] == 'x' || chars[j] == 'X') {
            j += 1;
            let digits_start = j;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            if j > digits_start {
                let index: String = chars[digits_start..j].iter().collect();
                // x0 and overflowing indices are malformed fragments: dropped
                match index.parse::<usize>() {
                    Ok(index) if index > 0 => {
                        let variable = Variable(index);
                        literals.push(if negative {
                            Literal::Negative(variable)
                        } else {
                            Literal::Positive(variable)
                        });
                    }
                    _ => {}
                }
                i = j;
                continue;
            }
        }

        // not a literal here; skip one character and keep scanning
        i += 1;
    }
    literals
}
