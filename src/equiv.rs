//! Semantic equivalence of two boolean functions via an XOR construction:
//! two AND gates (`~a.b` and `a.~b`) feed one OR gate, whose output is forced
//! true. The combined formula is satisfiable exactly when some input makes the
//! functions disagree, so UNSAT means equivalent and any model is a concrete
//! counter-example.

use crate::formula::{Clause, Formula, Literal, Variable};
use crate::gcf::{self, GateCnf, GcfError};
use crate::solver::{Assignment, Solver};
use crate::sop::{self, SopParseError};
use crate::SatResult;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Equivalence {
    Equivalent,
    /// Assignments distinguishing the two functions. Holds a single entry
    /// unless every counter-example was requested. Gate variables are
    /// included, like every assignment this crate returns.
    CounterExamples(Vec<Assignment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivalenceError {
    Parse(SopParseError),
    Encode(GcfError),
}

impl From<SopParseError> for EquivalenceError {
    fn from(e: SopParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<GcfError> for EquivalenceError {
    fn from(e: GcfError) -> Self {
        Self::Encode(e)
    }
}

impl Display for EquivalenceError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            EquivalenceError::Parse(e) => write!(f, "{}", e),
            EquivalenceError::Encode(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for EquivalenceError {}

/// Compares two gate-encoded functions over shared input variables. Both sides
/// must be gates-only encodings ([`gcf::encode_gates`]) with disjoint gate
/// variable ranges, so their outputs are free to disagree.
pub fn check_equivalence(a: &GateCnf, b: &GateCnf, find_all: bool) -> Equivalence {
    let max = a
        .formula
        .num_variables()
        .max(b.formula.num_variables())
        .max(a.output.0)
        .max(b.output.0);
    let a_not_b = Variable(max + 1);
    let b_not_a = Variable(max + 2);
    let differ = Variable(max + 3);

    let mut clauses: Vec<Clause> = a.formula.clauses().chain(b.formula.clauses()).cloned().collect();
    clauses.extend(gcf::and_gate(
        &Clause::new(vec![Literal::Negative(a.output), Literal::Positive(b.output)]),
        b_not_a,
    ));
    clauses.extend(gcf::and_gate(
        &Clause::new(vec![Literal::Positive(a.output), Literal::Negative(b.output)]),
        a_not_b,
    ));
    clauses.extend(gcf::or_gate(&[a_not_b, b_not_a], differ));
    clauses.push(Clause::new(vec![Literal::Positive(differ)]));

    let mut solver = Solver::new(Formula::new(clauses));
    if find_all {
        let models = solver.solve_all();
        if models.is_empty() {
            Equivalence::Equivalent
        } else {
            Equivalence::CounterExamples(models)
        }
    } else {
        match solver.solve() {
            SatResult::Satisfiable(model) => Equivalence::CounterExamples(vec![model]),
            SatResult::Unsatisfiable => Equivalence::Equivalent,
        }
    }
}

/// Parses and encodes two SOP expressions over a shared input space, then
/// checks them for equivalence.
pub fn check_sop_equivalence(
    a: &str,
    b: &str,
    find_all: bool,
) -> Result<Equivalence, EquivalenceError> {
    let terms_a = sop::parse(a)?;
    let terms_b = sop::parse(b)?;

    // gate variables for both sides go above the shared input space
    let max_input = terms_a
        .iter()
        .chain(terms_b.iter())
        .filter_map(Clause::max_variable)
        .max()
        .ok_or(GcfError::EmptyFormula)?;

    let gates_a = gcf::encode_gates(&terms_a, Variable(max_input.0 + 1))?;
    let gates_b = gcf::encode_gates(&terms_b, Variable(gates_a.output.0 + 1))?;
    Ok(check_equivalence(&gates_a, &gates_b, find_all))
}
