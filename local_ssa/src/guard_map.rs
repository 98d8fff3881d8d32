// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification of control flow edges for the reachability guards.
//!
//! Only locations entered along something other than plain fallthrough need a guard of their
//! own. Straight-line runs share the guard of the location that starts them, their
//! `guard_source`.

use goto_ir::goto_program::{GotoProgram, InstructionKind, Loc};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// The jump of a goto.
    BranchTaken,
    /// The fallthrough of a conditional goto.
    BranchNotTaken,
    /// Out of an assumption, which only continues if the assumption holds.
    Assume,
    /// Out of a function call, which may not return.
    FunctionCall,
    /// Plain fallthrough.
    Successor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: Loc,
    pub kind: EdgeKind,
    /// The location whose guard is the guard of `from`.
    pub guard_source: Loc,
}

impl Edge {
    /// Does the edge enter its target from a goto that jumps backwards?
    pub fn is_loop_back(&self, program: &GotoProgram) -> bool {
        self.kind == EdgeKind::BranchTaken && program.is_backwards_goto(self.from)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardEntry {
    /// Incoming edges, in program order of their sources.
    pub incoming: Vec<Edge>,
    /// Does this location define a guard of its own?
    pub has_guard: bool,
    pub guard_source: Loc,
}

#[derive(Clone, Debug, Default)]
pub struct GuardMap {
    entries: Vec<GuardEntry>,
}

impl GuardMap {
    pub fn build(program: &GotoProgram) -> GuardMap {
        let predecessors = program.predecessors();
        let mut entries: Vec<GuardEntry> = Vec::with_capacity(program.len());
        for loc in program.locs() {
            let incoming: Vec<Edge> = predecessors[loc.number()]
                .iter()
                .map(|&from| Edge {
                    from,
                    kind: classify(program, from, loc),
                    // Predecessors after `loc` are fixed up below.
                    guard_source: entries.get(from.number()).map_or(from, |e| e.guard_source),
                })
                .collect();
            let has_guard = loc == program.entry()
                || incoming.is_empty()
                || incoming.iter().any(|e| e.kind != EdgeKind::Successor);
            let guard_source =
                if has_guard { loc } else { entries[incoming[0].from.number()].guard_source };
            entries.push(GuardEntry { incoming, has_guard, guard_source });
        }
        // Back edges refer to locations that were not classified yet when their target was.
        let sources: Vec<Loc> = entries.iter().map(|e| e.guard_source).collect();
        for entry in &mut entries {
            for edge in &mut entry.incoming {
                edge.guard_source = sources[edge.from.number()];
            }
        }
        let guarded = entries.iter().filter(|e| e.has_guard).count();
        debug!(locations = entries.len(), guarded, "guard map");
        GuardMap { entries }
    }

    /// Panics if `loc` is not a location of the program the map was built for.
    pub fn entry(&self, loc: Loc) -> &GuardEntry {
        &self.entries[loc.number()]
    }

    pub fn has_guard(&self, loc: Loc) -> bool {
        self.entry(loc).has_guard
    }

    pub fn guard_source(&self, loc: Loc) -> Loc {
        self.entry(loc).guard_source
    }
}

fn classify(program: &GotoProgram, from: Loc, to: Loc) -> EdgeKind {
    let instruction = program.instruction(from);
    match instruction.kind() {
        InstructionKind::Goto => {
            if instruction.target() != Some(to) {
                EdgeKind::BranchNotTaken
            } else if to.number() == from.number() + 1 {
                // A jump to the next location is indistinguishable from falling through.
                EdgeKind::Successor
            } else {
                EdgeKind::BranchTaken
            }
        }
        InstructionKind::Assume => EdgeKind::Assume,
        InstructionKind::FunctionCall => EdgeKind::FunctionCall,
        _ => EdgeKind::Successor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use goto_ir::goto_program::{Expr, Instruction, Location, Type};

    fn edge(from: usize, kind: EdgeKind, guard_source: usize) -> Edge {
        Edge { from: Loc::new(from), kind, guard_source: Loc::new(guard_source) }
    }

    #[test]
    fn loop_edges() {
        let l = Location::none();
        let x = var("x", int());
        let c = var("c", Type::bool());
        // 0: if !c goto 3; 1: x = 1; 2: goto 0; 3: END
        let program = GotoProgram::new(vec![
            Instruction::goto(c.not(), Loc::new(3), l),
            Instruction::assign(x, int_const(1), l),
            Instruction::goto(Expr::bool_true(), Loc::new(0), l),
            Instruction::end_function(l),
        ]);
        let map = GuardMap::build(&program);
        let header = map.entry(Loc::new(0));
        assert!(header.has_guard);
        assert_eq!(header.incoming, vec![edge(2, EdgeKind::BranchTaken, 1)]);
        assert!(header.incoming[0].is_loop_back(&program));
        assert_eq!(map.entry(Loc::new(1)).incoming, vec![edge(0, EdgeKind::BranchNotTaken, 0)]);
        assert!(map.has_guard(Loc::new(1)));
        // Straight-line code shares its guard.
        assert!(!map.has_guard(Loc::new(2)));
        assert_eq!(map.guard_source(Loc::new(2)), Loc::new(1));
        assert_eq!(map.entry(Loc::new(3)).incoming, vec![edge(0, EdgeKind::BranchTaken, 0)]);
        assert!(!map.entry(Loc::new(3)).incoming[0].is_loop_back(&program));
    }

    #[test]
    fn assumptions_calls_and_unreachable_code() {
        let l = Location::none();
        let c = var("c", Type::bool());
        // 0: assume c; 1: f(); 2: goto 4; 3: skip; 4: goto 5; 5: END
        let program = GotoProgram::new(vec![
            Instruction::assume(c, l),
            Instruction::function_call(None, function("f"), vec![], l),
            Instruction::goto(Expr::bool_true(), Loc::new(4), l),
            Instruction::skip(l),
            Instruction::goto(Expr::bool_true(), Loc::new(5), l),
            Instruction::end_function(l),
        ]);
        let map = GuardMap::build(&program);
        assert_eq!(map.entry(Loc::new(1)).incoming, vec![edge(0, EdgeKind::Assume, 0)]);
        assert_eq!(map.entry(Loc::new(2)).incoming, vec![edge(1, EdgeKind::FunctionCall, 1)]);
        let unreachable = map.entry(Loc::new(3));
        assert!(unreachable.incoming.is_empty());
        assert!(unreachable.has_guard);
        assert_eq!(
            map.entry(Loc::new(4)).incoming,
            vec![edge(2, EdgeKind::BranchTaken, 2), edge(3, EdgeKind::Successor, 3)]
        );
        // A goto to the next location is fallthrough.
        assert_eq!(map.entry(Loc::new(5)).incoming, vec![edge(4, EdgeKind::Successor, 4)]);
        assert!(!map.has_guard(Loc::new(5)));
        assert_eq!(map.guard_source(Loc::new(5)), Loc::new(4));
    }
}
