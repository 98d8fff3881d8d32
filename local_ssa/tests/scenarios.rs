// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end checks of the SSA form of small functions.

use goto_ir::goto_program::{
    DatatypeComponent, Expr, GotoFunction, GotoProgram, Instruction, Loc, Location, Symbol,
    SymbolTable, Type,
};
use local_ssa::domain::Def;
use local_ssa::{
    DynamicObjectAllocation, LocalSsa, Phase, PointsToMap, SsaError, SsaObject, SsaOptions,
};

fn int() -> Type {
    Type::c_int()
}

fn int_const(i: i64) -> Expr {
    Expr::int_constant(i, int())
}

fn x() -> Expr {
    Expr::symbol_expression("x", int())
}

fn y() -> Expr {
    Expr::symbol_expression("y", int())
}

fn c() -> Expr {
    Expr::symbol_expression("c", Type::bool())
}

fn symbol_table() -> SymbolTable {
    let l = Location::none();
    let mut st = SymbolTable::new();
    st.insert(Symbol::aggregate_type(Type::struct_type(
        "point",
        vec![DatatypeComponent::field("x", int()), DatatypeComponent::field("y", int())],
    )));
    st.insert(Symbol::static_variable("g", "g", int(), l));
    st.insert(Symbol::variable("x", "x", int(), l));
    st.insert(Symbol::variable("y", "y", int(), l));
    st.insert(Symbol::variable("c", "c", Type::bool(), l));
    st
}

fn function(instructions: Vec<Instruction>) -> GotoFunction {
    GotoFunction::new("f", GotoProgram::new(instructions))
}

fn equalities(ssa: &LocalSsa, loc: usize) -> Vec<String> {
    ssa.node_at(Loc::new(loc))
        .map(|node| node.equalities.iter().map(ToString::to_string).collect())
        .unwrap_or_default()
}

fn stream(ssa: &LocalSsa) -> Vec<String> {
    let mut out: Vec<Expr> = vec![];
    ssa.emit_to(&mut out);
    out.iter().map(ToString::to_string).collect()
}

/// `0: if !c goto 3; 1: x = 1; 2: goto 4; 3: x = 2; 4: skip; 5: END`
fn diamond() -> GotoFunction {
    let l = Location::none();
    function(vec![
        Instruction::goto(c().not(), Loc::new(3), l),
        Instruction::assign(x(), int_const(1), l),
        Instruction::goto(Expr::bool_true(), Loc::new(4), l),
        Instruction::assign(x(), int_const(2), l),
        Instruction::skip(l),
        Instruction::end_function(l),
    ])
}

/// `0: if !c goto 3; 1: x = x + 1; 2: goto 0; 3: END`
fn counting_loop() -> GotoFunction {
    let l = Location::none();
    function(vec![
        Instruction::goto(c().not(), Loc::new(3), l),
        Instruction::assign(x(), x().plus(int_const(1)), l),
        Instruction::goto(Expr::bool_true(), Loc::new(0), l),
        Instruction::end_function(l),
    ])
}

#[test]
fn straight_line_code() {
    let st = symbol_table();
    let l = Location::none();
    let f = function(vec![
        Instruction::assign(x(), int_const(1), l),
        Instruction::assign(y(), x().plus(int_const(1)), l),
        Instruction::end_function(l),
    ]);
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(stream(&ssa), vec!["x#0 == 1", "ssa::$guard#0 == true", "y#1 == (x#0 + 1)"]);
    for loc in 0..3 {
        assert_eq!(ssa.analysis().phis_at(Loc::new(loc)).count(), 0);
    }
    // The whole function shares the entry guard.
    assert_eq!(ssa.guard_symbol(Loc::new(1)).to_string(), "ssa::$guard#0");
    assert_eq!(ssa.phase(), Phase::Assertions);
}

#[test]
fn branches_merge_in_a_phi() {
    let st = symbol_table();
    let f = diamond();
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(
        equalities(&ssa, 0),
        vec!["ssa::$cond#0 == (!c#in)", "ssa::$guard#0 == true"]
    );
    assert_eq!(
        equalities(&ssa, 1),
        vec!["x#1 == 1", "ssa::$guard#1 == (ssa::$guard#0 && (!ssa::$cond#0))"]
    );
    assert_eq!(equalities(&ssa, 2), vec!["ssa::$cond#2 == true"]);
    assert_eq!(
        equalities(&ssa, 3),
        vec!["x#3 == 2", "ssa::$guard#3 == (ssa::$guard#0 && ssa::$cond#0)"]
    );
    assert_eq!(
        equalities(&ssa, 4),
        vec![
            "x#phi4 == (ssa::$guard#3 ? x#3 : x#1)",
            "ssa::$guard#4 == ((ssa::$guard#1 && ssa::$cond#2) || ssa::$guard#3)",
        ]
    );
    assert!(ssa.node_at(Loc::new(5)).is_none());
}

#[test]
fn goto_to_the_next_location_falls_through() {
    let mut st = symbol_table();
    let l = Location::none();
    st.insert(Symbol::variable("d", "d", Type::bool(), l));
    let d = Expr::symbol_expression("d", Type::bool());
    // 0: if c goto 3; 1: x = 1; 2: if d goto 3; 3: y = x; 4: END
    let f = function(vec![
        Instruction::goto(c(), Loc::new(3), l),
        Instruction::assign(x(), int_const(1), l),
        Instruction::goto(d, Loc::new(3), l),
        Instruction::assign(y(), x(), l),
        Instruction::end_function(l),
    ]);
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(equalities(&ssa, 2), vec!["ssa::$cond#2 == d#in"]);
    // Location 3 is reached from 2 whatever the value of `d`, so the phi must not depend on it.
    assert_eq!(
        equalities(&ssa, 3),
        vec![
            "x#phi3 == (ssa::$guard#1 ? x#1 : x#in)",
            "y#3 == x#phi3",
            "ssa::$guard#3 == ((ssa::$guard#0 && ssa::$cond#0) || ssa::$guard#1)",
        ]
    );
    assert_eq!(ssa.edge_guard(Loc::new(2), Loc::new(3)).to_string(), "ssa::$guard#1");
    assert_eq!(
        ssa.edge_guard(Loc::new(0), Loc::new(3)).to_string(),
        "ssa::$guard#0 && ssa::$cond#0"
    );
    assert_eq!(ssa.edge_guard(Loc::new(1), Loc::new(3)).to_string(), "false");
}

#[test]
fn loops_select_their_back_edge() {
    let st = symbol_table();
    let f = counting_loop();
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(
        equalities(&ssa, 0),
        vec![
            "x#phi0 == (ssa::$guard#ls2 ? x#lb2 : x#in)",
            "ssa::$cond#0 == (!c#in)",
            "ssa::$guard#0 == (true || ssa::$guard#ls2)",
        ]
    );
    assert_eq!(
        equalities(&ssa, 1),
        vec!["x#1 == (x#phi0 + 1)", "ssa::$guard#1 == (ssa::$guard#0 && (!ssa::$cond#0))"]
    );
    assert_eq!(equalities(&ssa, 3), vec!["ssa::$guard#3 == (ssa::$guard#0 && ssa::$cond#0)"]);

    // The value leaving the loop is the merged one.
    let x_index = ssa.objects().index_of("x".into()).unwrap();
    assert_eq!(ssa.analysis().def(Loc::new(3), x_index), Def::Phi(Loc::new(0)));
    let object = SsaObject::new(&x(), &st).unwrap();
    assert_eq!(ssa.read_node_in(&object, Loc::new(0)).to_string(), "x#lb0");
    assert_eq!(ssa.read_node_in(&object, Loc::new(1)).to_string(), "x#phi0");
}

#[test]
fn assertions_become_constraints() {
    let st = symbol_table();
    let l = Location::none();
    let f = function(vec![
        Instruction::assign(x(), int_const(1), l),
        Instruction::assert(x().gt(int_const(0)), Some("positive"), l),
        Instruction::end_function(l),
    ]);
    let options = SsaOptions::default().with_assertions_to_constraints(true);
    let ssa = LocalSsa::build(&f, &st, options).unwrap();
    let assertion = "ssa::$guard#0 ==> (x#0 > 0)";
    assert_eq!(ssa.assertion(Loc::new(1)).unwrap().to_string(), assertion);
    assert!(ssa.assertion(Loc::new(0)).is_none());
    assert!(stream(&ssa).contains(&assertion.to_string()));
    assert_eq!(ssa.phase(), Phase::AssertionConstraints);

    // Without the option the assertion stays out of the stream.
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(ssa.assertion(Loc::new(1)).unwrap().to_string(), assertion);
    assert!(!stream(&ssa).contains(&assertion.to_string()));
}

#[test]
fn unreachable_locations_are_guarded_by_false() {
    let st = symbol_table();
    let l = Location::none();
    let f = function(vec![
        Instruction::goto(Expr::bool_true(), Loc::new(2), l),
        Instruction::assign(y(), x(), l),
        Instruction::end_function(l),
    ]);
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(equalities(&ssa, 1), vec!["y#1 == x#in", "ssa::$guard#1 == false"]);
    assert!(!ssa.analysis().is_reachable(Loc::new(1)));
}

#[test]
fn reaching_definitions_are_total() {
    let st = symbol_table();
    let f = diamond();
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    let x = ssa.objects().index_of("x".into()).unwrap();
    let c = ssa.objects().index_of("c".into()).unwrap();
    let expected = [
        Def::Input,
        Def::Input,
        Def::Assignment(Loc::new(1)),
        Def::Input,
        Def::Phi(Loc::new(4)),
        Def::Phi(Loc::new(4)),
    ];
    for (loc, def) in expected.into_iter().enumerate() {
        assert_eq!(ssa.analysis().def(Loc::new(loc), x), def, "x at {loc}");
        assert_eq!(ssa.analysis().def(Loc::new(loc), c), Def::Input, "c at {loc}");
    }
    // Only the join has a phi, and only for the object written on both sides.
    for loc in 0..6 {
        let phis: Vec<usize> = ssa.analysis().phis_at(Loc::new(loc)).map(|(o, _)| o).collect();
        assert_eq!(phis, if loc == 4 { vec![x] } else { vec![] });
    }
}

#[test]
fn calls_clobber_globals() {
    let st = symbol_table();
    let l = Location::none();
    let h = Expr::symbol_expression("h", Type::code(vec![], int()));
    let g = Expr::symbol_expression("g", int());
    let f = function(vec![
        Instruction::function_call(Some(x()), h, vec![], l),
        Instruction::assign(y(), g.plus(x()), l),
        Instruction::end_function(l),
    ]);
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    assert_eq!(equalities(&ssa, 0), vec!["x#0 == ssa::return_value0", "ssa::$guard#0 == true"]);
    assert_eq!(
        equalities(&ssa, 1),
        vec!["y#1 == (g#0 + x#0)", "ssa::$guard#1 == (ssa::$guard#0 && ssa::$cond#0)"]
    );
}

#[test]
fn suffixes_separate_instances() {
    let st = symbol_table();
    let f = counting_loop();
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default().with_suffix("%1")).unwrap();
    assert_eq!(
        equalities(&ssa, 0)[0],
        "x#phi0%1 == (ssa::$guard#ls2 ? x#lb2%1 : x#in%1)"
    );
    assert_eq!(equalities(&ssa, 1)[0], "x#1%1 == (x#phi0%1 + 1)");

    let invalid = LocalSsa::build(&f, &st, SsaOptions::default().with_suffix("#"));
    assert!(matches!(invalid, Err(SsaError::InvalidOption(_))));
}

#[test]
fn renaming_is_idempotent() {
    let st = symbol_table();
    let f = diamond();
    let ssa = LocalSsa::build(&f, &st, SsaOptions::default()).unwrap();
    let loc = Loc::new(4);
    let read = ssa.read_rhs(&x().plus(y()), loc).unwrap();
    assert_eq!(read.to_string(), "x#phi4 + y#in");
    assert_eq!(ssa.read_rhs(&read, loc).unwrap(), read);
    for node in ssa.nodes().values() {
        for equality in &node.equalities {
            assert_eq!(&ssa.read_rhs(equality, loc).unwrap(), equality);
        }
    }
}

#[test]
fn pointers_resolve_to_their_targets() {
    let st = symbol_table();
    let l = Location::none();
    let p = Expr::symbol_expression("p", int().to_pointer());
    let f = function(vec![
        Instruction::assign(p.clone().dereference(), int_const(3), l),
        Instruction::assign(y(), p.dereference(), l),
        Instruction::end_function(l),
    ]);
    let targets: PointsToMap = [("p", vec!["x", "g"])].into_iter().collect();
    let mut ssa = LocalSsa::with_collaborators(
        &f,
        &st,
        &targets,
        &DynamicObjectAllocation,
        SsaOptions::default(),
    )
    .unwrap();
    ssa.build_all().unwrap();
    assert_eq!(
        equalities(&ssa, 0),
        vec![
            "x#0 == ((p#in == &x) ? 3 : x#in)",
            "g#0 == ((!(p#in == &x)) ? 3 : g#in)",
            "ssa::$guard#0 == true",
        ]
    );
    assert_eq!(equalities(&ssa, 1), vec!["y#1 == ((p#in == &x) ? x#0 : g#0)"]);
}

#[test]
fn passes_run_in_order() {
    let st = symbol_table();
    let f = diamond();
    let mut ssa = LocalSsa::new(&f, &st, SsaOptions::default()).unwrap();
    assert!(ssa.nodes().is_empty());
    assert!(matches!(ssa.build_transfer(), Err(SsaError::PhaseOrder { .. })));
    ssa.build_phi_nodes().unwrap();
    ssa.build_transfer().unwrap();
    assert!(matches!(ssa.build_phi_nodes(), Err(SsaError::PhaseOrder { .. })));
    ssa.build_all().unwrap();
    assert_eq!(ssa.phase(), Phase::Assertions);
    assert!(matches!(ssa.build_all(), Ok(())));
}

#[test]
fn malformed_programs_are_rejected() {
    let st = symbol_table();
    let l = Location::none();
    let f = function(vec![
        Instruction::goto(c(), Loc::new(7), l),
        Instruction::end_function(l),
    ]);
    let result = LocalSsa::build(&f, &st, SsaOptions::default());
    assert!(matches!(result, Err(SsaError::MalformedProgram(_))));
}
