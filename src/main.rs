use clap::{App, Arg};
use sopsat::equiv::{check_sop_equivalence, Equivalence};
use sopsat::formula::dimacs;
use sopsat::{gcf, sop, Formula, SatResult, Solver};
use std::fs::File;
use std::io::Read;

fn main() {
    env_logger::init();

    let matches = App::new("sopsat")
        .about("decides satisfiability of boolean functions (SOP or DIMACS CNF)")
        .arg(Arg::with_name("INPUT").help("input file; stdin when omitted").index(1))
        .arg(
            Arg::with_name("sop")
                .long("sop")
                .help("treat the input as a sum-of-products expression instead of DIMACS"),
        )
        .arg(
            Arg::with_name("all")
                .long("all")
                .help("enumerate every satisfying assignment"),
        )
        .arg(
            Arg::with_name("recursive")
                .long("recursive")
                .help("use the recursive search instead of the explicit stack"),
        )
        .arg(
            Arg::with_name("dimacs-out")
                .long("dimacs-out")
                .help("print the CNF in DIMACS format instead of solving"),
        )
        .arg(
            Arg::with_name("equiv")
                .long("equiv")
                .takes_value(true)
                .value_name("FILE")
                .help("check SOP equivalence against a second expression file"),
        )
        .get_matches();

    let input = match read_input(matches.value_of("INPUT")) {
        Ok(input) => input,
        Err(e) => fail(&format!("cannot read input: {}", e)),
    };

    if let Some(path) = matches.value_of("equiv") {
        let other = match read_input(Some(path)) {
            Ok(other) => other,
            Err(e) => fail(&format!("cannot read {}: {}", path, e)),
        };
        let result = match check_sop_equivalence(&input, &other, matches.is_present("all")) {
            Ok(result) => result,
            Err(e) => fail(&format!("equivalence check failed: {}", e)),
        };
        match result {
            Equivalence::Equivalent => {
                println!("equivalent");
                std::process::exit(0);
            }
            Equivalence::CounterExamples(models) => {
                for model in models {
                    println!("counter-example: {}", model);
                }
                std::process::exit(1);
            }
        }
    }

    let formula = if matches.is_present("sop") {
        match parse_sop(&input) {
            Ok(formula) => formula,
            Err(e) => fail(&e),
        }
    } else {
        match dimacs::parse(input.as_bytes()) {
            Ok(formula) => formula,
            Err(e) => fail(&format!("parse error: {}", e)),
        }
    };

    if matches.is_present("dimacs-out") {
        if let Err(e) = dimacs::emit(&formula, std::io::stdout()) {
            fail(&format!("cannot write DIMACS: {}", e));
        }
        std::process::exit(0);
    }

    let mut solver = Solver::new(formula);

    if matches.is_present("all") {
        let models = solver.solve_all();
        for model in &models {
            println!("{}", model);
        }
        let exit_code = if models.is_empty() {
            println!("UNSAT");
            1
        } else {
            0
        };
        std::process::exit(exit_code);
    }

    let result = if matches.is_present("recursive") {
        solver.solve_recursive()
    } else {
        solver.solve()
    };
    let exit_code = match result {
        SatResult::Satisfiable(model) => {
            println!("SAT");
            println!("{}", model);
            0
        }
        SatResult::Unsatisfiable => {
            println!("UNSAT");
            1
        }
    };
    std::process::exit(exit_code);
}

fn parse_sop(input: &str) -> Result<Formula, String> {
    let terms = sop::parse(input).map_err(|e| format!("parse error: {}", e))?;
    let encoded = gcf::encode(&terms).map_err(|e| format!("encode error: {}", e))?;
    Ok(encoded.formula)
}

fn read_input(path: Option<&str>) -> Result<String, std::io::Error> {
    let mut input = String::new();
    match path {
        Some(path) => {
            File::open(path)?.read_to_string(&mut input)?;
        }
        None => {
            std::io::stdin().read_to_string(&mut input)?;
        }
    }
    Ok(input)
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(-1);
}
