// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use local_ssa::{DynamicObjectAllocation, LocalSsa};
use tracing::debug;

use crate::args::{check_is_valid, DumpArgs};
use crate::input::DumpInput;

mod args;
mod input;
mod session;

/// The main function for `ssa-dump`: print the SSA form of the function in the input file.
fn main() -> ExitCode {
    let args = DumpArgs::parse();
    check_is_valid(&args);
    let result = session::init_logger(&args).and_then(|()| {
        let stdout = std::io::stdout();
        run(&args, &mut stdout.lock())
    });

    if let Err(error) = result {
        debug!(?error, "main_failure");
        eprintln!("error: {error:#}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run<W: Write>(args: &DumpArgs, out: &mut W) -> Result<()> {
    let input = DumpInput::read(&args.input)?;
    let symbol_table = input.symbol_table()?;
    let points_to = input.points_to();
    let name = input.function.name;

    let mut ssa = LocalSsa::with_collaborators(
        &input.function,
        &symbol_table,
        &points_to,
        &DynamicObjectAllocation,
        args.ssa_options(),
    )
    .with_context(|| format!("failed to analyse `{name}`"))?;
    ssa.build_all().with_context(|| format!("failed to build the SSA form of `{name}`"))?;

    let written = if args.verbose { ssa.output_verbose(out) } else { ssa.output(out) };
    written.and_then(|()| out.flush()).context("failed to write the SSA form")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use goto_ir::goto_program::{
        Expr, GotoFunction, GotoProgram, Instruction, Loc, Location, Symbol, Type,
    };
    use std::collections::BTreeMap;
    use tempfile::NamedTempFile;

    fn int() -> Type {
        Type::c_int()
    }

    /// `0: if !c goto 3; 1: x = 1; 2: goto 4; 3: *p = 2; 4: assert(x > 0); 5: END`
    fn diamond_input() -> DumpInput {
        let l = Location::none();
        let x = Expr::symbol_expression("x", int());
        let c = Expr::symbol_expression("c", Type::bool());
        let p = Expr::symbol_expression("p", int().to_pointer());
        let one = Expr::int_constant(1, int());
        let body = GotoProgram::new(vec![
            Instruction::goto(c.not(), Loc::new(3), l),
            Instruction::assign(x.clone(), one, l),
            Instruction::goto(Expr::bool_true(), Loc::new(4), l),
            Instruction::assign(p.dereference(), Expr::int_constant(2, int()), l),
            Instruction::assert(x.gt(Expr::int_constant(0, int())), Some("x positive"), l),
            Instruction::end_function(l),
        ]);
        DumpInput {
            symbols: vec![
                Symbol::variable("x", "x", int(), l),
                Symbol::variable("c", "c", Type::bool(), l),
                Symbol::variable("p", "p", int().to_pointer(), l),
            ],
            function: GotoFunction::new("main", body),
            points_to: BTreeMap::from([("p".to_string(), vec!["x".to_string()])]),
        }
    }

    fn write_input(input: &DumpInput) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        serde_json::to_writer(&mut file, input).unwrap();
        file
    }

    fn dump(input: &DumpInput, extra: &[&str]) -> Result<String> {
        let file = write_input(input);
        let path = file.path().to_str().unwrap();
        let args = DumpArgs::parse_from(["ssa-dump", path].iter().chain(extra));
        let mut out = vec![];
        run(&args, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn dump_a_function() {
        let expected = "\
(E) ssa::$cond#0 == (!c#in)
(E) ssa::$guard#0 == true

(E) x#1 == 1
(E) ssa::$guard#1 == (ssa::$guard#0 && (!ssa::$cond#0))

(E) ssa::$cond#2 == true

(E) x#3 == 2
(E) ssa::$guard#3 == (ssa::$guard#0 && ssa::$cond#0)

(E) x#phi4 == (ssa::$guard#3 ? x#3 : x#1)
(E) ssa::$guard#4 == ((ssa::$guard#1 && ssa::$cond#2) || ssa::$guard#3)
(C) ssa::$guard#4 ==> (x#phi4 > 0)
(A) ssa::$guard#4 ==> (x#phi4 > 0)

";
        let out = dump(&diamond_input(), &["--assertions-as-constraints"]).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn verbose_dump_and_suffix() {
        let out = dump(&diamond_input(), &["--verbose", "--suffix", "%2"]).unwrap();
        assert!(out.starts_with("*** 0 <none>\n(E) ssa::$cond#0%2 == (!c#in%2)\n"));
        assert!(out.contains("*** 5 <none>\n\n"));
        assert!(out.contains("(A) ssa::$guard#4%2 ==> (x#phi4%2 > 0)\n"));
        assert!(!out.contains("(C)"));
    }

    #[test]
    fn input_round_trips_through_json() {
        let input = diamond_input();
        let json = serde_json::to_string(&input).unwrap();
        let read: DumpInput = serde_json::from_str(&json).unwrap();
        assert_eq!(read.function, input.function);
        assert_eq!(read.symbols.len(), 3);
        assert_eq!(read.points_to, input.points_to);
    }

    #[test]
    fn errors_carry_their_context() {
        let args = DumpArgs::parse_from(["ssa-dump", "/nonexistent/input.json"]);
        let error = run(&args, &mut vec![]).unwrap_err();
        assert!(format!("{error:#}").starts_with("failed to open `/nonexistent/input.json`"));

        let mut input = diamond_input();
        let l = Location::none();
        input.function = GotoFunction::new(
            "broken",
            GotoProgram::new(vec![Instruction::goto(Expr::bool_true(), Loc::new(9), l)]),
        );
        let error = dump(&input, &[]).unwrap_err();
        let message = format!("{error:#}");
        assert!(message.starts_with("failed to analyse `broken`: malformed program"), "{message}");

        let mut input = diamond_input();
        input.symbols.push(Symbol::variable("x", "x", int(), l));
        assert!(format!("{:#}", dump(&input, &[]).unwrap_err()).contains("defined twice"));
    }
}
