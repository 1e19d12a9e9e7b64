use crate::formula::{Clause, Formula, Literal, Variable};
use std::fmt::{self, Display, Formatter};
use std::io::{BufRead, BufReader, Read, Write};

#[derive(Debug)]
pub enum DimacsParseError {
    Io(std::io::Error),
    Format(String),
    /// The header's clause count does not match the number of clause lines.
    ClauseCountMismatch { declared: usize, actual: usize },
    /// A literal references a variable beyond the header's variable count.
    VariableOutOfRange { declared: usize, found: usize },
}

impl From<std::io::Error> for DimacsParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for DimacsParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DimacsParseError::Io(e) => write!(f, "io error: {}", e),
            DimacsParseError::Format(msg) => write!(f, "malformed DIMACS: {}", msg),
            DimacsParseError::ClauseCountMismatch { declared, actual } => write!(
                f,
                "malformed DIMACS: header declares {} clauses but found {}",
                declared, actual
            ),
            DimacsParseError::VariableOutOfRange { declared, found } => write!(
                f,
                "malformed DIMACS: header declares {} variables but found x{}",
                declared, found
            ),
        }
    }
}

impl std::error::Error for DimacsParseError {}

pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut header: Option<(usize, usize)> = None;

    for line in reader.lines() {
        let line = line?;
        let mut line = line.split_whitespace().peekable();

        match line.peek() {
            Some(&"c") | None => continue,
            Some(&"p") => {
                let _ = line.next();

                if line.next() != Some("cnf") {
                    return Err(DimacsParseError::Format("missing 'cnf'".into()));
                }

                let num_variables = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format("invalid num_variables".into()))?;

                let num_clauses = line
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| DimacsParseError::Format("invalid num_clauses".into()))?;

                header = Some((num_variables, num_clauses));
            }
            Some(_) => {
                if header.is_none() {
                    return Err(DimacsParseError::Format("missing 'p' line before clauses".into()));
                }

                let mut clause = vec![];
                for x in line {
                    match parse_literal(x)? {
                        Some(l) => clause.push(l),
                        None => break,
                    }
                }
                clauses.push(Clause::new(clause));
            }
        }
    }

    let (num_variables, num_clauses) = header
        .ok_or_else(|| DimacsParseError::Format("missing 'p' line before clauses".into()))?;

    if clauses.len() != num_clauses {
        return Err(DimacsParseError::ClauseCountMismatch {
            declared: num_clauses,
            actual: clauses.len(),
        });
    }

    let formula = Formula::new(clauses);
    if let Some(Variable(found)) = formula.max_variable() {
        if found > num_variables {
            return Err(DimacsParseError::VariableOutOfRange {
                declared: num_variables,
                found,
            });
        }
    }

    Ok(formula)
}

fn parse_literal(s: &str) -> Result<Option<Literal>, DimacsParseError> {
    let l = s
        .parse::<isize>()
        .map_err(|_| DimacsParseError::Format("invalid literal".into()))?;
    if l > 0 {
        Ok(Some(Literal::Positive(Variable(l as usize))))
    } else if l < 0 {
        Ok(Some(Literal::Negative(Variable(-l as usize))))
    } else {
        Ok(None)
    }
}

/// Emits `formula` in DIMACS CNF format. Literals within a clause come out in
/// increasing variable order (clauses store them sorted), and the header counts
/// match the emitted content exactly.
pub fn emit<W: Write>(formula: &Formula, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "p cnf {} {}", formula.num_variables(), formula.len())?;
    for clause in formula.clauses() {
        for literal in clause.literals() {
            let signed = literal.idx() as isize;
            if literal.is_positive() {
                write!(writer, "{} ", signed)?;
            } else {
                write!(writer, "{} ", -signed)?;
            }
        }
        writeln!(writer, "0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};
    use crate::{SatResult, Solver};

    #[test]
    fn parse_cnf_basic() {
        let cnf = "c  simple_v3_c2.cnf
c
p cnf 3 2
1 -3 0
2 3 -1 0";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.clauses().count(), 2);

        assert_eq!(
            f.clauses().nth(0).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![p(1), n(3)]
        );
        // literals come back sorted by variable index
        assert_eq!(
            f.clauses().nth(1).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![n(1), p(2), p(3)]
        );
    }

    #[test]
    fn parse_rejects_clause_count_mismatch() {
        let cnf = "p cnf 2 3\n1 2 0\n-1 0";
        match parse(cnf.as_bytes()) {
            Err(DimacsParseError::ClauseCountMismatch { declared: 3, actual: 2 }) => {}
            other => panic!("expected clause count mismatch, got {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_variable_out_of_range() {
        let cnf = "p cnf 2 1\n1 5 0";
        match parse(cnf.as_bytes()) {
            Err(DimacsParseError::VariableOutOfRange { declared: 2, found: 5 }) => {}
            other => panic!("expected variable out of range, got {:?}", other),
        }
    }

    #[test]
    fn parse_requires_header() {
        assert!(matches!(
            parse("1 2 0".as_bytes()),
            Err(DimacsParseError::Format(_))
        ));
    }

    #[test]
    fn emit_basic() {
        let f = Formula::new(vec![
            Clause::new(vec![p(2), n(1)]),
            Clause::new(vec![p(3)]),
        ]);
        let mut out = Vec::new();
        emit(&f, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "p cnf 3 2\n-1 2 0\n3 0\n");
    }

    #[test]
    fn round_trip_preserves_clause_set() {
        let f = Formula::new(vec![
            Clause::new(vec![p(1), n(3), p(4)]),
            Clause::new(vec![n(2)]),
            Clause::new(vec![p(2), p(3)]),
        ]);
        let mut out = Vec::new();
        emit(&f, &mut out).unwrap();
        let parsed = parse(out.as_slice()).expect("failed to parse emitted DIMACS");

        let mut before: Vec<_> = f.clauses().cloned().collect();
        let mut after: Vec<_> = parsed.clauses().cloned().collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn solve_cnf_quinn() {
        let cnf = "c  quinn.cnf
c
p cnf 16 18
  1    2  0
 -2   -4  0
  3    4  0
 -4   -5  0
  5   -6  0
  6   -7  0
  6    7  0
  7  -16  0
  8   -9  0
 -8  -14  0
  9   10  0
  9  -10  0
-10  -11  0
 10   12  0
 11   12  0
 13   14  0
 14  -15  0
 15   16  0
";

        let f = parse(cnf.as_bytes()).expect("failed to parse");

        let mut solver = Solver::new(f);
        match solver.solve() {
            SatResult::Satisfiable(_) => {}
            SatResult::Unsatisfiable => panic!("quinn.cnf should be satisfiable"),
        }
    }
}
