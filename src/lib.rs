pub mod equiv;
pub mod formula;
pub mod gcf;
pub mod solver;
pub mod sop;

#[cfg(test)]
mod brute_force;

pub use formula::{Clause, ClauseError, Formula, Literal, Variable};
pub use solver::{Assignment, Solver, Value};

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Assignment),
    Unsatisfiable,
}
