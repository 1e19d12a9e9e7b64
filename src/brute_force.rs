use crate::formula::Formula;
use crate::solver::{Assignment, Value};

// Brute-force reference implementations for cross-validating the search
// engine on small formulas.

pub(crate) fn brute_force_satisfiable(f: &Formula) -> bool {
    !brute_force_models(f).is_empty()
}

// Every satisfying total assignment over [1, num_variables], by exhaustion.
pub(crate) fn brute_force_models(f: &Formula) -> Vec<Assignment> {
    let num_variables = f.num_variables();
    assert!(num_variables <= 20); // just for safety

    let mut models = vec![];
    for bits in 0..(1u32 << num_variables) {
        let mut assignment = Assignment::new(num_variables);
        for i in 1..=num_variables {
            let value = if bits & (1 << (i - 1)) == 0 {
                Value::False
            } else {
                Value::True
            };
            assignment.set(crate::formula::Variable(i), value);
        }
        if assignment.satisfies(f.clauses()) {
            models.push(assignment);
        }
    }
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p, Clause};

    #[test]
    fn counts_models_of_a_disjunction() {
        let f = Formula::new(vec![Clause::new(vec![p(1), p(2)])]);
        assert_eq!(brute_force_models(&f).len(), 3);
        assert!(brute_force_satisfiable(&f));
    }

    #[test]
    fn unsat_has_no_models() {
        let f = Formula::new(vec![Clause::new(vec![p(1)]), Clause::new(vec![n(1)])]);
        assert_eq!(brute_force_models(&f), vec![]);
        assert!(!brute_force_satisfiable(&f));
    }

    #[test]
    fn empty_formula_has_the_empty_model() {
        let f = Formula::new(vec![]);
        assert_eq!(brute_force_models(&f), vec![Assignment::new(0)]);
    }
}
