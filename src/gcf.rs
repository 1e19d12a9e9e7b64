//! Gate-consistency-function (Tseitin) encoding of SOP terms into CNF.
//!
//! Each product term gets one fresh AND-gate output variable, and one final
//! fresh variable carries the OR of all terms. The clause count is linear in
//! the input size, which is the whole point of encoding gates instead of
//! multiplying the expression out.

use crate::formula::{Clause, Formula, Literal, Variable};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GcfError {
    /// The term list holds no variables, so there is no index to allocate
    /// gate variables above.
    EmptyFormula,
}

impl Display for GcfError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            GcfError::EmptyFormula => write!(f, "cannot encode an empty formula"),
        }
    }
}

impl std::error::Error for GcfError {}

/// A CNF formula produced by gate encoding, together with the variable that
/// carries the encoded function's output.
#[derive(Debug, Clone)]
pub struct GateCnf {
    pub formula: Formula,
    pub output: Variable,
}

/// Encodes SOP terms into an equisatisfiable CNF formula.
///
/// With inputs spanning `[1, m]` and `k` terms, gate variables occupy
/// `[m+1, m+k]` and the output lands on `m+k+1` — always the maximum index of
/// the result — with a trailing unit clause forcing it true. Downstream code
/// relies on exactly that contract to locate the answer variable.
pub fn encode(terms: &[Clause]) -> Result<GateCnf, GcfError> {
    let max_input = terms
        .iter()
        .filter_map(Clause::max_variable)
        .max()
        .ok_or(GcfError::EmptyFormula)?;

    let mut gates = encode_gates(terms, Variable(max_input.0 + 1))?;
    let output = gates.output;
    gates.formula.add_clause(Clause::new(vec![Literal::Positive(output)]));
    Ok(gates)
}

/// Emits only the gate-consistency clauses, leaving the output variable free,
/// with gate variables allocated from `first_fresh` upward. The equivalence
/// check uses this form so that the two functions' outputs can be compared
/// rather than both being forced true.
pub fn encode_gates(terms: &[Clause], first_fresh: Variable) -> Result<GateCnf, GcfError> {
    if terms.is_empty() {
        return Err(GcfError::EmptyFormula);
    }

    let mut clauses = vec![];
    let mut gate_outputs = vec![];
    for (i, term) in terms.iter().enumerate() {
        let z = Variable(first_fresh.0 + i);
        clauses.extend(and_gate(term, z));
        gate_outputs.push(z);
    }

    let output = Variable(first_fresh.0 + terms.len());
    clauses.extend(or_gate(&gate_outputs, output));

    Ok(GateCnf {
        formula: Formula::new(clauses),
        output,
    })
}

/// Consistency clauses for `z = AND(term literals)`: each input literal is
/// implied by the gate firing, and all inputs together imply the gate.
pub(crate) fn and_gate(term: &Clause, z: Variable) -> Vec<Clause> {
    let mut clauses = vec![];
    let mut all_inputs = vec![];
    for literal in term.literals() {
        clauses.push(Clause::new(vec![literal.clone(), Literal::Negative(z)]));
        all_inputs.push(literal.negated());
    }
    all_inputs.push(Literal::Positive(z));
    clauses.push(Clause::new(all_inputs));
    clauses
}

/// Consistency clauses for `y = OR(inputs)`.
pub(crate) fn or_gate(inputs: &[Variable], y: Variable) -> Vec<Clause> {
    let mut clauses = vec![];
    let mut any_input = vec![];
    for z in inputs {
        clauses.push(Clause::new(vec![Literal::Negative(*z), Literal::Positive(y)]));
        any_input.push(Literal::Positive(*z));
    }
    any_input.push(Literal::Negative(y));
    clauses.push(Clause::new(any_input));
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};
    use crate::solver::Value;
    use crate::{sop, SatResult, Solver};

    #[test]
    fn encode_two_terms() {
        // x1.x3 + ~x1.x2: inputs 1..3, gates 4 and 5, output 6
        let terms = sop::parse("x1.x3 + ~x1.x2").unwrap();
        let gcf = encode(&terms).unwrap();

        assert_eq!(gcf.output, Variable(6));
        assert_eq!(gcf.formula.max_variable(), Some(Variable(6)));

        let clauses: Vec<_> = gcf.formula.clauses().cloned().collect();
        assert_eq!(
            clauses,
            vec![
                Clause::new(vec![p(1), n(4)]),
                Clause::new(vec![p(3), n(4)]),
                Clause::new(vec![n(1), n(3), p(4)]),
                Clause::new(vec![n(1), n(5)]),
                Clause::new(vec![p(2), n(5)]),
                Clause::new(vec![p(1), n(2), p(5)]),
                Clause::new(vec![n(4), p(6)]),
                Clause::new(vec![n(5), p(6)]),
                Clause::new(vec![p(4), p(5), n(6)]),
                Clause::new(vec![p(6)]),
            ]
        );
    }

    #[test]
    fn encode_is_linear_in_input() {
        let terms = sop::parse("x1.x2.x3 + x4 + ~x2.x5").unwrap();
        let gcf = encode(&terms).unwrap();
        // sum(|t| + 1) per AND gate, k + 1 for the OR gate, 1 output unit
        let expected = (3 + 1) + (1 + 1) + (2 + 1) + (3 + 1) + 1;
        assert_eq!(gcf.formula.len(), expected);
    }

    #[test]
    fn encode_empty_is_an_error() {
        match encode(&[]) {
            Err(GcfError::EmptyFormula) => {}
            Ok(_) => panic!("empty term list must not encode"),
        }
        match encode_gates(&[], Variable(1)) {
            Err(GcfError::EmptyFormula) => {}
            Ok(_) => panic!("empty term list must not encode"),
        }
    }

    #[test]
    fn encode_gates_leaves_output_free() {
        let terms = sop::parse("x1").unwrap();
        let gates = encode_gates(&terms, Variable(2)).unwrap();
        assert_eq!(gates.output, Variable(3));
        // no unit clause on the output: ~x1 with the output low must be a model
        let mut solver = Solver::new(gates.formula);
        match solver.solve() {
            SatResult::Satisfiable(_) => {}
            SatResult::Unsatisfiable => panic!("gates alone must be satisfiable"),
        }
    }

    // Evaluates the SOP terms directly under the model's input projection.
    fn sop_holds(terms: &[Clause], model: &crate::solver::Assignment) -> bool {
        terms.iter().any(|term| {
            term.literals().all(|l| {
                let value = model.value(*l.variable());
                value == Value::True && l.is_positive()
                    || value == Value::False && !l.is_positive()
            })
        })
    }

    #[test]
    fn satisfying_model_projects_onto_sop() {
        let terms = sop::parse("x1.x3 + ~x1.x2").unwrap();
        let gcf = encode(&terms).unwrap();
        let mut solver = Solver::new(gcf.formula);
        match solver.solve() {
            SatResult::Satisfiable(model) => assert!(sop_holds(&terms, &model)),
            SatResult::Unsatisfiable => panic!("satisfiable SOP encoded to UNSAT"),
        }
    }

    #[test]
    fn contradictory_term_alone_is_unsat() {
        // x1.~x1 survives parsing; its AND gate can never fire
        let terms = sop::parse("x1.~x1").unwrap();
        let gcf = encode(&terms).unwrap();
        let mut solver = Solver::new(gcf.formula);
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
    }

    #[test]
    fn contradictory_term_beside_real_term_is_ignored() {
        let terms = sop::parse("x1.~x1 + x2").unwrap();
        let gcf = encode(&terms).unwrap();
        let mut solver = Solver::new(gcf.formula);
        match solver.solve() {
            SatResult::Satisfiable(model) => assert_eq!(model.value(Variable(2)), Value::True),
            SatResult::Unsatisfiable => panic!("x2 should satisfy the OR"),
        }
    }
}
