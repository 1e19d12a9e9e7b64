use crate::formula::{Clause, Formula, Literal, Variable};
use crate::SatResult;
use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

/// Tri-state value of a variable under a partial assignment.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub enum Value {
    True,
    False,
    Undecided,
}

/// A (possibly partial) assignment over variables `[1, num_variables]`.
#[derive(Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Assignment {
    // slot 0 is unused; variables are 1-based
    values: Vec<Value>,
}

impl Assignment {
    pub fn new(num_variables: usize) -> Self {
        Self {
            values: vec![Value::Undecided; num_variables + 1],
        }
    }

    pub fn num_variables(&self) -> usize {
        self.values.len() - 1
    }

    pub fn value(&self, variable: Variable) -> Value {
        self.values[variable.0]
    }

    /// The value this literal contributes: `True` when its variable's value
    /// matches the literal's polarity, `Undecided` when unassigned.
    pub fn literal_value(&self, literal: &Literal) -> Value {
        match self.value(*literal.variable()) {
            Value::True => {
                if literal.is_positive() {
                    Value::True
                } else {
                    Value::False
                }
            }
            Value::False => {
                if literal.is_positive() {
                    Value::False
                } else {
                    Value::True
                }
            }
            Value::Undecided => Value::Undecided,
        }
    }

    pub(crate) fn set(&mut self, variable: Variable, value: Value) {
        self.values[variable.0] = value;
    }

    pub(crate) fn clear(&mut self, variable: Variable) {
        self.values[variable.0] = Value::Undecided;
    }

    // Makes the literal true. The variable must be undecided.
    pub(crate) fn assign_literal(&mut self, literal: &Literal) {
        assert_eq!(self.literal_value(literal), Value::Undecided);
        let value = if literal.is_positive() {
            Value::True
        } else {
            Value::False
        };
        self.set(*literal.variable(), value);
    }

    // Totalizes the assignment; any value works for a variable no active
    // clause constrains, so undecided ones default to false.
    pub(crate) fn complete(&mut self) {
        for value in self.values.iter_mut().skip(1) {
            if *value == Value::Undecided {
                *value = Value::False;
            }
        }
    }

    pub fn satisfies<'a>(&self, clauses: impl IntoIterator<Item = &'a Clause>) -> bool {
        clauses
            .into_iter()
            .all(|c| c.literals().any(|l| self.literal_value(l) == Value::True))
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for (i, value) in self.values.iter().enumerate().skip(1) {
            if first {
                first = false;
            } else {
                f.write_str(" ")?;
            }
            match value {
                Value::True => write!(f, "x{}=1", i)?,
                Value::False => write!(f, "x{}=0", i)?,
                Value::Undecided => write!(f, "x{}=?", i)?,
            }
        }
        Ok(())
    }
}

/// Status of one clause under a partial assignment, computed on demand rather
/// than cached on the clause.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClauseStatus {
    Satisfied,
    Falsified,
    Undecided,
    /// Exactly one literal is undecided and none is true.
    Unit(Literal),
}

pub fn clause_status(clause: &Clause, assignment: &Assignment) -> ClauseStatus {
    let mut undecided = None;
    let mut undecided_count = 0;
    for literal in clause.literals() {
        match assignment.literal_value(literal) {
            Value::True => return ClauseStatus::Satisfied,
            // only literals actually assigned false count toward falsification
            Value::False => {}
            Value::Undecided => {
                undecided_count += 1;
                if undecided.is_none() {
                    undecided = Some(literal.clone());
                }
            }
        }
    }
    match undecided {
        Some(literal) if undecided_count == 1 => ClauseStatus::Unit(literal),
        Some(_) => ClauseStatus::Undecided,
        None => ClauseStatus::Falsified,
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum Propagation {
    Stable,
    Conflict,
}

// Drops the clause if satisfied, otherwise strikes its false literals.
fn reduce_clause(clause: Clause, assignment: &Assignment) -> Option<Clause> {
    let mut kept = vec![];
    for literal in clause.literals() {
        match assignment.literal_value(literal) {
            Value::True => return None,
            Value::False => {}
            Value::Undecided => kept.push(literal.clone()),
        }
    }
    Some(Clause::new(kept))
}

/// Unit propagation. Repeatedly assigns the sole undecided literal of a unit
/// clause, then rebuilds the working clause list with satisfied clauses
/// removed and false literals struck (collected and applied in one pass, so
/// nothing is deleted mid-iteration). Assigned variables are pushed onto
/// `trail` so the recursive search can restore them on backtrack.
///
/// This mutates `clauses` irreversibly; callers hand it a working copy.
pub(crate) fn propagate(
    clauses: &mut Vec<Clause>,
    assignment: &mut Assignment,
    trail: &mut Vec<Variable>,
) -> Propagation {
    loop {
        let mut unit = None;
        for clause in clauses.iter() {
            match clause_status(clause, assignment) {
                ClauseStatus::Falsified => {
                    trace!("conflict on {}", clause);
                    return Propagation::Conflict;
                }
                ClauseStatus::Unit(literal) => {
                    if unit.is_none() {
                        unit = Some(literal);
                    }
                }
                ClauseStatus::Satisfied | ClauseStatus::Undecided => {}
            }
        }

        let stable = match unit {
            Some(literal) => {
                trace!("implied {}", literal);
                assignment.assign_literal(&literal);
                trail.push(*literal.variable());
                false
            }
            None => true,
        };

        let kept: Vec<Clause> = clauses
            .drain(..)
            .filter_map(|c| reduce_clause(c, assignment))
            .collect();
        *clauses = kept;

        if stable {
            return Propagation::Stable;
        }
    }
}

/// Naive DPLL engine: unit propagation plus branching on a randomly chosen
/// undecided variable. The explicit-stack [`Solver::solve`] is the default
/// (its search depth does not consume the native call stack); the recursive
/// form is kept for small inputs and as a semantic cross-check.
pub struct Solver {
    clauses: Vec<Clause>,
    num_variables: usize,
    rng: StdRng,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        let num_variables = formula.num_variables();
        Self {
            clauses: formula.into_clauses(),
            num_variables,
            rng: StdRng::from_entropy(),
        }
    }

    /// Like [`Solver::new`] but with a deterministic branching order.
    pub fn with_seed(formula: Formula, seed: u64) -> Self {
        let num_variables = formula.num_variables();
        Self {
            clauses: formula.into_clauses(),
            num_variables,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Explicit-stack search. Each work item is a self-contained snapshot of
    /// (working clauses, partial assignment), so sibling branches never share
    /// mutable state.
    pub fn solve(&mut self) -> SatResult {
        let clauses = self.clauses.clone();
        self.search(clauses)
    }

    /// Recursive variant of [`Solver::solve`]. Same result, branch order may
    /// differ; bounded by native call-stack depth.
    pub fn solve_recursive(&mut self) -> SatResult {
        let clauses = self.clauses.clone();
        let mut assignment = Assignment::new(self.num_variables);
        if self.dpll(clauses, &mut assignment) {
            assignment.complete();
            debug_assert!(assignment.satisfies(self.clauses.iter()));
            SatResult::Satisfiable(assignment)
        } else {
            SatResult::Unsatisfiable
        }
    }

    /// Enumerates every satisfying total assignment by re-solving with a
    /// blocking clause appended per model found. Assignments range over all
    /// variables in the formula, gate variables included.
    pub fn solve_all(&mut self) -> Vec<Assignment> {
        let mut found = vec![];
        let mut clauses = self.clauses.clone();
        loop {
            match self.search(clauses.clone()) {
                SatResult::Satisfiable(model) => {
                    let blocking = blocking_clause(&model);
                    trace!("model {}; blocking with {}", model, blocking);
                    clauses.push(blocking);
                    found.push(model);
                }
                SatResult::Unsatisfiable => return found,
            }
        }
    }

    fn search(&mut self, clauses: Vec<Clause>) -> SatResult {
        let mut stack = vec![(clauses, Assignment::new(self.num_variables))];

        while let Some((mut clauses, mut assignment)) = stack.pop() {
            let mut trail = vec![];
            if propagate(&mut clauses, &mut assignment, &mut trail) == Propagation::Conflict {
                continue;
            }
            if clauses.is_empty() {
                assignment.complete();
                debug_assert!(assignment.satisfies(self.clauses.iter()));
                return SatResult::Satisfiable(assignment);
            }

            let variable = self.decide(&clauses, &assignment);
            trace!("decision x{} at depth {}", variable.0, stack.len());
            // false first, so the branch popped (and explored) next tries true
            for &value in [Value::False, Value::True].iter() {
                let mut branch = assignment.clone();
                branch.set(variable, value);
                stack.push((clauses.clone(), branch));
            }
        }

        SatResult::Unsatisfiable
    }

    fn dpll(&mut self, mut clauses: Vec<Clause>, assignment: &mut Assignment) -> bool {
        let mut trail = vec![];
        if propagate(&mut clauses, assignment, &mut trail) == Propagation::Conflict {
            restore(assignment, &trail);
            return false;
        }
        if clauses.is_empty() {
            return true;
        }

        let variable = self.decide(&clauses, assignment);
        for &value in [Value::True, Value::False].iter() {
            assignment.set(variable, value);
            if self.dpll(clauses.clone(), assignment) {
                return true;
            }
            assignment.clear(variable);
        }

        restore(assignment, &trail);
        false
    }

    // Random choice among the undecided variables still mentioned by an
    // active clause. No activity heuristic: an arbitrary pick is the
    // documented behavior.
    fn decide(&mut self, clauses: &[Clause], assignment: &Assignment) -> Variable {
        let candidates: BTreeSet<Variable> = clauses
            .iter()
            .flat_map(|c| c.literals().map(|l| *l.variable()))
            .filter(|v| assignment.value(*v) == Value::Undecided)
            .collect();
        let candidates: Vec<Variable> = candidates.into_iter().collect();
        *candidates
            .choose(&mut self.rng)
            .expect("an active clause always has an undecided literal")
    }
}

fn restore(assignment: &mut Assignment, trail: &[Variable]) {
    for &variable in trail {
        assignment.clear(variable);
    }
}

// Negates every decided literal of the model: false exactly for that model.
fn blocking_clause(model: &Assignment) -> Clause {
    Clause::new((1..=model.num_variables()).filter_map(|i| {
        let variable = Variable(i);
        match model.value(variable) {
            Value::True => Some(Literal::Negative(variable)),
            Value::False => Some(Literal::Positive(variable)),
            Value::Undecided => None,
        }
    }))
}
