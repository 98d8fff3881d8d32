// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The SSA form of one function body.
//!
//! Construction runs in five passes over all locations, strictly in this order:
//!
//! 1. phi nodes for every object with merging definitions;
//! 2. transfer equalities for assignments and call results;
//! 3. condition symbols for gotos and assumptions;
//! 4. reachability guards;
//! 5. assertions.
//!
//! The renaming of expressions lives in `rename.rs`, the decomposition of assignment targets in
//! `assign.rs`; both are further `impl` blocks of [LocalSsa].

use crate::assignments::Assignments;
use crate::dereference::{AliasResolver, NoAliasing};
use crate::domain::{Def, PhiEntries, PhiSource, ReachingDefinitions};
use crate::error::{Result, SsaError};
use crate::guard_map::{Edge, EdgeKind, GuardMap};
use crate::malloc::{AllocationModel, DynamicObjectAllocation};
use crate::naming::{SsaNaming, VersionKind};
use crate::objects::{SsaObject, SsaObjects};
use crate::options::SsaOptions;
use goto_ir::goto_program::{
    Expr, GotoFunction, GotoProgram, InstructionBody, InstructionKind, Loc, SymbolTable, Type,
};
use std::collections::BTreeMap;
use tracing::{debug, debug_span, trace};

/// Everything emitted for one location.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub equalities: Vec<Expr>,
    pub constraints: Vec<Expr>,
    pub assertion: Option<Expr>,
}

impl Node {
    pub fn is_empty(&self) -> bool {
        self.equalities.is_empty() && self.constraints.is_empty() && self.assertion.is_none()
    }
}

/// How far the construction has got. Each pass requires the previous one to be complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Analysed,
    PhiNodes,
    Transfer,
    Conditions,
    Guards,
    Assertions,
    /// Assertions were also copied into the constraints.
    AssertionConstraints,
}

impl Phase {
    fn next(self) -> Option<Phase> {
        match self {
            Phase::Analysed => Some(Phase::PhiNodes),
            Phase::PhiNodes => Some(Phase::Transfer),
            Phase::Transfer => Some(Phase::Conditions),
            Phase::Conditions => Some(Phase::Guards),
            Phase::Guards => Some(Phase::Assertions),
            Phase::Assertions => Some(Phase::AssertionConstraints),
            Phase::AssertionConstraints => None,
        }
    }
}

/// Receives the formula of a function, one conjunct at a time.
pub trait ConstraintSink {
    fn add(&mut self, constraint: Expr);
}

impl ConstraintSink for Vec<Expr> {
    fn add(&mut self, constraint: Expr) {
        self.push(constraint);
    }
}

pub struct LocalSsa<'a> {
    pub(crate) function: &'a GotoFunction,
    pub(crate) symbol_table: &'a SymbolTable,
    pub(crate) resolver: &'a dyn AliasResolver,
    pub(crate) allocation: &'a dyn AllocationModel,
    options: SsaOptions,
    pub(crate) objects: SsaObjects,
    pub(crate) assignments: Assignments,
    pub(crate) analysis: ReachingDefinitions,
    guard_map: GuardMap,
    pub(crate) naming: SsaNaming,
    nodes: BTreeMap<Loc, Node>,
    phase: Phase,
}

/// Construction
impl<'a> LocalSsa<'a> {
    /// Build the complete SSA form of `function` with the default collaborators.
    pub fn build(
        function: &'a GotoFunction,
        symbol_table: &'a SymbolTable,
        options: SsaOptions,
    ) -> Result<LocalSsa<'a>> {
        let mut ssa = LocalSsa::new(function, symbol_table, options)?;
        ssa.build_all()?;
        Ok(ssa)
    }

    /// Analyse `function`, assuming nothing about pointers. No pass has run yet.
    pub fn new(
        function: &'a GotoFunction,
        symbol_table: &'a SymbolTable,
        options: SsaOptions,
    ) -> Result<LocalSsa<'a>> {
        LocalSsa::with_collaborators(
            function,
            symbol_table,
            &NoAliasing,
            &DynamicObjectAllocation,
            options,
        )
    }

    /// Analyse `function` with the given alias resolution and allocation model.
    pub fn with_collaborators(
        function: &'a GotoFunction,
        symbol_table: &'a SymbolTable,
        resolver: &'a dyn AliasResolver,
        allocation: &'a dyn AllocationModel,
        options: SsaOptions,
    ) -> Result<LocalSsa<'a>> {
        let _span = debug_span!("local_ssa", function = %function.name).entered();
        options.validate()?;
        let program = &function.body;
        if let Some((loc, target)) = program.invalid_target() {
            return Err(SsaError::MalformedProgram(format!(
                "goto at location {loc} of `{}` jumps to missing location {target}",
                function.name
            )));
        }
        let objects = SsaObjects::collect(program, symbol_table, resolver)?;
        let assignments = Assignments::build(program, &objects, symbol_table, resolver)?;
        let analysis = ReachingDefinitions::compute(program, &objects, &assignments);
        let guard_map = GuardMap::build(program);
        let naming = SsaNaming::new(options.suffix.clone());
        debug!(
            locations = program.len(),
            objects = objects.len(),
            iterations = analysis.iterations(),
            "analysed"
        );
        Ok(LocalSsa {
            function,
            symbol_table,
            resolver,
            allocation,
            options,
            objects,
            assignments,
            analysis,
            guard_map,
            naming,
            nodes: BTreeMap::new(),
            phase: Phase::Analysed,
        })
    }

    /// Run the passes that did not run yet, and copy the assertions into the constraints if
    /// the options ask for it.
    pub fn build_all(&mut self) -> Result<()> {
        let _span = debug_span!("local_ssa", function = %self.function.name).entered();
        while self.phase < Phase::Assertions {
            match self.phase {
                Phase::Analysed => self.build_phi_nodes()?,
                Phase::PhiNodes => self.build_transfer()?,
                Phase::Transfer => self.build_conditions()?,
                Phase::Conditions => self.build_guards()?,
                Phase::Guards => self.build_assertions()?,
                Phase::Assertions | Phase::AssertionConstraints => unreachable!(),
            }
        }
        if self.options.assertions_to_constraints && self.phase == Phase::Assertions {
            self.assertions_to_constraints()?;
        }
        Ok(())
    }

    fn start(&self, requested: Phase) -> Result<()> {
        if self.phase.next() == Some(requested) {
            debug!(pass = ?requested, "start");
            Ok(())
        } else {
            Err(SsaError::PhaseOrder {
                current: format!("{:?}", self.phase),
                requested: format!("{requested:?}"),
            })
        }
    }

    fn node(&mut self, loc: Loc) -> &mut Node {
        self.nodes.entry(loc).or_default()
    }

    pub fn build_phi_nodes(&mut self) -> Result<()> {
        self.start(Phase::PhiNodes)?;
        for loc in self.program().locs() {
            let equalities = self.phi_nodes(loc);
            if !equalities.is_empty() {
                self.node(loc).equalities.extend(equalities);
            }
        }
        self.phase = Phase::PhiNodes;
        Ok(())
    }

    pub fn build_transfer(&mut self) -> Result<()> {
        self.start(Phase::Transfer)?;
        for loc in self.program().locs() {
            let equalities = self.transfer(loc)?;
            if !equalities.is_empty() {
                self.node(loc).equalities.extend(equalities);
            }
        }
        self.phase = Phase::Transfer;
        Ok(())
    }

    pub fn build_conditions(&mut self) -> Result<()> {
        self.start(Phase::Conditions)?;
        for loc in self.program().locs() {
            let instruction = self.program().instruction(loc);
            if !matches!(instruction.kind(), InstructionKind::Goto | InstructionKind::Assume) {
                continue;
            }
            if let Some(cond) = instruction.guard() {
                let equality = self.cond_symbol(loc).eq(self.read_rhs(cond, loc)?);
                self.node(loc).equalities.push(equality);
            }
        }
        self.phase = Phase::Conditions;
        Ok(())
    }

    pub fn build_guards(&mut self) -> Result<()> {
        self.start(Phase::Guards)?;
        for loc in self.program().locs() {
            if let Some(equality) = self.guard(loc) {
                self.node(loc).equalities.push(equality);
            }
        }
        self.phase = Phase::Guards;
        Ok(())
    }

    pub fn build_assertions(&mut self) -> Result<()> {
        self.start(Phase::Assertions)?;
        for loc in self.program().locs() {
            if let InstructionBody::Assert { cond, .. } = self.program().instruction(loc).body() {
                let assertion = self.guard_symbol(loc).implies(self.read_rhs(cond, loc)?);
                self.node(loc).assertion = Some(assertion);
            }
        }
        self.phase = Phase::Assertions;
        Ok(())
    }

    /// Add every assertion to the constraints of its location.
    pub fn assertions_to_constraints(&mut self) -> Result<()> {
        self.start(Phase::AssertionConstraints)?;
        for node in self.nodes.values_mut() {
            if let Some(assertion) = &node.assertion {
                node.constraints.push(assertion.clone());
            }
        }
        self.phase = Phase::AssertionConstraints;
        Ok(())
    }
}

/// The passes, per location
impl LocalSsa<'_> {
    fn phi_nodes(&self, loc: Loc) -> Vec<Expr> {
        self.analysis
            .phis_at(loc)
            .map(|(index, entries)| self.phi_node(loc, self.objects.get(index), entries))
            .collect()
    }

    /// `PHI(loc) == c_n ? v_n : (... : v_1)`. Forward edges are folded in first, which gives
    /// them the lowest priority; values along back edges are selected by the loop selector of
    /// the back edge.
    fn phi_node(&self, loc: Loc, object: &SsaObject, entries: &PhiEntries) -> Expr {
        let guard = self.guard_object();
        let is_forward = |source: &PhiSource, def: &Def| {
            def.is_input() || source.from().is_none_or(|from| from < loc)
        };
        let forward = entries.iter().filter(|(s, d)| is_forward(s, d)).map(|(source, def)| {
            let edge_guard = match source.from() {
                Some(from) => self.edge_guard(from, loc),
                None => Expr::bool_true(),
            };
            (edge_guard, self.naming.name_def(object, *def))
        });
        let backward = entries.iter().filter(|(s, d)| !is_forward(s, d)).filter_map(|(s, _)| {
            let from = s.from()?;
            let select = self.naming.name(&guard, VersionKind::LoopSelect, from);
            Some((select, self.naming.name(object, VersionKind::LoopBack, from)))
        });
        let mut alternatives = forward.chain(backward);
        let first = match alternatives.next() {
            Some((_, value)) => value,
            None => self.naming.name_input(object),
        };
        let rhs = alternatives.fold(first, |rhs, (select, value)| select.ternary(value, rhs));
        trace!(%loc, object = %object.identifier(), "phi");
        self.naming.name(object, VersionKind::Phi, loc).eq(rhs)
    }

    fn transfer(&self, loc: Loc) -> Result<Vec<Expr>> {
        let mut equalities = vec![];
        match self.program().instruction(loc).body() {
            InstructionBody::Assign { lhs, rhs } => {
                let lhs = self.resolver.resolve(lhs.clone(), loc, self.symbol_table)?;
                let rhs = self.resolver.resolve(rhs.clone(), loc, self.symbol_table)?;
                self.assign_rec(&lhs, rhs, Expr::bool_true(), loc, &mut equalities)?;
            }
            InstructionBody::FunctionCall { lhs: Some(lhs), .. } => {
                let lhs = self.resolver.resolve(lhs.clone(), loc, self.symbol_table)?;
                let rhs = self.naming.return_value(loc, lhs.typ().clone());
                self.assign_rec(&lhs, rhs, Expr::bool_true(), loc, &mut equalities)?;
            }
            _ => {}
        }
        Ok(equalities)
    }

    fn guard(&self, loc: Loc) -> Option<Expr> {
        let entry = self.guard_map.entry(loc);
        if !entry.has_guard {
            return None;
        }
        let guard = self.guard_object();
        let mut sources = vec![];
        if loc == self.program().entry() {
            sources.push(Expr::bool_true());
        }
        for edge in &entry.incoming {
            let source = if edge.is_loop_back(self.program()) {
                // Stands for the whole path through the loop; the branch condition is not
                // constrained.
                self.naming.name(&guard, VersionKind::LoopSelect, edge.from)
            } else {
                self.taken(edge)
            };
            sources.push(source);
        }
        Some(self.guard_symbol(loc).eq(Expr::disjunction(sources)))
    }
}

/// Queries
impl<'a> LocalSsa<'a> {
    pub(crate) fn program(&self) -> &'a GotoProgram {
        &self.function.body
    }

    pub fn function(&self) -> &'a GotoFunction {
        self.function
    }

    pub fn objects(&self) -> &SsaObjects {
        &self.objects
    }

    pub fn analysis(&self) -> &ReachingDefinitions {
        &self.analysis
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn nodes(&self) -> &BTreeMap<Loc, Node> {
        &self.nodes
    }

    pub fn node_at(&self, loc: Loc) -> Option<&Node> {
        self.nodes.get(&loc)
    }

    fn guard_object(&self) -> SsaObject {
        SsaObject::reserved("$guard", Type::bool())
    }

    fn cond_object(&self) -> SsaObject {
        SsaObject::reserved("$cond", Type::bool())
    }

    /// The value of the branch or assumption condition at `loc`.
    pub fn cond_symbol(&self, loc: Loc) -> Expr {
        self.naming.name(&self.cond_object(), VersionKind::Out, loc)
    }

    /// Is `loc` reached?
    pub fn guard_symbol(&self, loc: Loc) -> Expr {
        let source = self.guard_map.guard_source(loc);
        self.naming.name(&self.guard_object(), VersionKind::Out, source)
    }

    /// Is the edge `from -> to` taken? `false` if there is no such edge.
    pub fn edge_guard(&self, from: Loc, to: Loc) -> Expr {
        self.guard_map
            .entry(to)
            .incoming
            .iter()
            .find(|edge| edge.from == from)
            .map_or_else(Expr::bool_false, |edge| self.taken(edge))
    }

    fn taken(&self, edge: &Edge) -> Expr {
        let guard = self.guard_object();
        let from_guard = self.naming.name(&guard, VersionKind::Out, edge.guard_source);
        match edge.kind {
            EdgeKind::BranchTaken | EdgeKind::Assume | EdgeKind::FunctionCall => {
                from_guard.and(self.cond_symbol(edge.from))
            }
            EdgeKind::BranchNotTaken => {
                from_guard.and(self.cond_symbol(edge.from).boolean_negate())
            }
            EdgeKind::Successor => from_guard,
        }
    }

    /// The assertion obligation at `loc`, if it is an assertion.
    pub fn assertion(&self, loc: Loc) -> Option<&Expr> {
        self.nodes.get(&loc).and_then(|node| node.assertion.as_ref())
    }

    /// Stream the equalities, then the constraints, of every location in program order.
    pub fn emit_to<S: ConstraintSink + ?Sized>(&self, sink: &mut S) {
        for node in self.nodes.values() {
            node.equalities.iter().chain(&node.constraints).for_each(|e| sink.add(e.clone()));
        }
    }

    /// The whole formula as one conjunction.
    pub fn conjunction(&self) -> Expr {
        let mut conjuncts = vec![];
        self.emit_to(&mut conjuncts);
        Expr::conjunction(conjuncts)
    }
}
