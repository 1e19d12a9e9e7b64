pub mod dimacs;

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// A propositional variable, identified by a 1-based index (DIMACS-compatible).
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

#[derive(Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn idx(&self) -> usize {
        self.variable().0
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(Variable(x)) => write!(f, "x{}", x),
            Literal::Negative(Variable(x)) => write!(f, "~x{}", x),
        }
    }
}

/// A disjunction of literals. Literals are kept sorted by variable index and
/// exact duplicates are collapsed. An empty clause is always false.
///
/// The plain constructor is lenient: a variable may appear with both polarities
/// (a tautology in CNF, an impossible product term in SOP — both are accepted
/// and resolved downstream, never rejected here). Use [`Clause::checked`] to
/// reject contradictory literal sets at construction time.
#[derive(Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Clause {
    literals: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// Both polarities of the same variable were requested in one clause.
    ContradictoryLiteralSet(Variable),
}

impl Display for ClauseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ClauseError::ContradictoryLiteralSet(v) => {
                write!(f, "contradictory literal set: both x{} and ~x{}", v.0, v.0)
            }
        }
    }
}

impl std::error::Error for ClauseError {}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        let mut literals: Vec<Literal> = disjuncts.into_iter().collect();
        literals.sort_by_key(|l| (l.idx(), l.is_positive()));
        literals.dedup();
        Self { literals }
    }

    /// Like [`Clause::new`], but fails if the same variable is requested with
    /// both polarities.
    pub fn checked(disjuncts: impl IntoIterator<Item = Literal>) -> Result<Self, ClauseError> {
        let mut polarities: BTreeMap<Variable, bool> = BTreeMap::new();
        for literal in disjuncts {
            let variable = *literal.variable();
            if let Some(prev) = polarities.insert(variable, literal.is_positive()) {
                if prev != literal.is_positive() {
                    return Err(ClauseError::ContradictoryLiteralSet(variable));
                }
            }
        }
        Ok(Self::new(polarities.into_iter().map(|(v, positive)| {
            if positive {
                Literal::Positive(v)
            } else {
                Literal::Negative(v)
            }
        })))
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn max_variable(&self) -> Option<Variable> {
        self.literals.iter().map(|l| *l.variable()).max()
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.literals.len() > 1 {
            f.write_str("(")?;
        }
        let mut first = true;
        for literal in &self.literals {
            if first {
                first = false;
            } else {
                f.write_str(" + ")?;
            }
            write!(f, "{}", literal)?;
        }
        if self.literals.len() > 1 {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A CNF formula: a conjunction of clauses. Clause order does not affect
/// satisfiability but does affect which unit clause propagates first, hence
/// which concrete model a satisfiable formula yields.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Formula {
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            clauses: conjuncts.into_iter().collect(),
        }
    }

    pub fn max_variable(&self) -> Option<Variable> {
        self.clauses.iter().filter_map(|c| c.max_variable()).max()
    }

    // The variable space is [1, num_variables]; indices need not be dense.
    pub fn num_variables(&self) -> usize {
        self.max_variable().map_or(0, |v| v.0)
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub(crate) fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for clause in &self.clauses {
            if first {
                first = false;
            } else {
                f.write_str(" . ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

#[cfg(test)]
pub(crate) fn formula_strategy() -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    let literal =
        (1usize..=8, any::<bool>()).prop_map(|(v, positive)| if positive { p(v) } else { n(v) });
    let clause = proptest::collection::vec(literal, 1..=3).prop_map(Clause::new);
    proptest::collection::vec(clause, 1..=12).prop_map(Formula::new)
}
