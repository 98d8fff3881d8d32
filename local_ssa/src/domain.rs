// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reaching definitions with phi placement.
//!
//! For every location and every tracked object this computes where the value the object holds
//! on entry to the location was defined:
//!
//! - [Def::Input]: no write to the object reaches the location; the value is the one the
//!   object had when the function was entered.
//! - [Def::Assignment]: the value was last written at one specific location.
//! - [Def::Phi]: the location merges control flow and different definitions reach it along
//!   different paths.
//!
//! # Algorithm
//!
//! A forward worklist iteration over the locations of the function:
//!
//! - `OUT[L]` = `Assignment(L)` for the objects `L` writes, `IN[L]` for the others.
//! - A location reached along a single source (the function entry, or one predecessor that has
//!   been reached so far) copies that source's state.
//! - A location reached along two or more sources is a merge point. Per object, equal incoming
//!   definitions are kept; differing ones turn the definition into `Phi(L)`. Once an object has
//!   a phi at `L` it keeps it, so the iteration is monotone and terminates.
//!
//! The worklist is ordered by location number: forward edges are processed before the back
//! edges of the loops they enter.
//!
//! Locations that are never reached keep `Input` for every object.

use crate::assignments::Assignments;
use crate::objects::{ObjectIndex, SsaObjects};
use goto_ir::goto_program::{GotoProgram, Loc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Where the value of an object at a location comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Def {
    Input,
    Assignment(Loc),
    Phi(Loc),
}

impl Def {
    pub fn is_input(&self) -> bool {
        matches!(self, Def::Input)
    }
}

/// Where control enters a merge point from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhiSource {
    /// The entry of the function (only for the first location).
    FunctionEntry,
    /// The edge from a predecessor location.
    Edge(Loc),
}

impl PhiSource {
    /// The predecessor, if this is not the function entry.
    pub fn from(&self) -> Option<Loc> {
        match self {
            PhiSource::FunctionEntry => None,
            PhiSource::Edge(loc) => Some(*loc),
        }
    }
}

/// The definition reaching a phi along each of its sources.
pub type PhiEntries = BTreeMap<PhiSource, Def>;

type State = Vec<Def>;

#[derive(Clone, Debug)]
pub struct ReachingDefinitions {
    /// `IN` state per location; `None` if the location was not reached.
    states: Vec<Option<State>>,
    phi_nodes: Vec<BTreeMap<ObjectIndex, PhiEntries>>,
    iterations: usize,
}

impl ReachingDefinitions {
    pub fn compute(
        program: &GotoProgram,
        objects: &SsaObjects,
        assignments: &Assignments,
    ) -> ReachingDefinitions {
        let predecessors = program.predecessors();
        let mut states: Vec<Option<State>> = vec![None; program.len()];
        let mut phi_nodes = vec![BTreeMap::new(); program.len()];
        let mut iterations = 0;

        let out = |loc: Loc, state: &State| -> State {
            let mut out = state.clone();
            for object in assignments.assigned_at(loc) {
                out[object] = Def::Assignment(loc);
            }
            out
        };

        let mut worklist: BTreeSet<Loc> = BTreeSet::new();
        if !program.is_empty() {
            worklist.insert(program.entry());
        }
        while let Some(loc) = worklist.pop_first() {
            iterations += 1;

            let mut incoming: Vec<(PhiSource, State)> = vec![];
            if loc == program.entry() {
                incoming.push((PhiSource::FunctionEntry, vec![Def::Input; objects.len()]));
            }
            for &pred in &predecessors[loc.number()] {
                if let Some(state) = &states[pred.number()] {
                    incoming.push((PhiSource::Edge(pred), out(pred, state)));
                }
            }

            let new_state = match incoming.as_slice() {
                [] => continue,
                [(_, state)] => state.clone(),
                _ => {
                    let old = states[loc.number()].as_ref();
                    let phis: &mut BTreeMap<ObjectIndex, PhiEntries> =
                        &mut phi_nodes[loc.number()];
                    (0..objects.len())
                        .map(|object| {
                            let entries: PhiEntries = incoming
                                .iter()
                                .map(|(source, state)| (*source, state[object]))
                                .collect();
                            let first = incoming[0].1[object];
                            let sticky = old.is_some_and(|s| s[object] == Def::Phi(loc));
                            let def = if sticky || entries.values().any(|d| *d != first) {
                                Def::Phi(loc)
                            } else {
                                first
                            };
                            phis.insert(object, entries);
                            def
                        })
                        .collect()
                }
            };

            if states[loc.number()].as_ref() != Some(&new_state) {
                trace!(%loc, "reaching definitions changed");
                states[loc.number()] = Some(new_state);
                worklist.extend(program.successors(loc));
            }
        }

        // Only keep the entries of objects that really merge.
        for (loc, phis) in phi_nodes.iter_mut().enumerate() {
            let state = &states[loc];
            phis.retain(|object, _| {
                state.as_ref().is_some_and(|s| s[*object] == Def::Phi(Loc::new(loc)))
            });
        }
        let unreachable = states.iter().filter(|s| s.is_none()).count();
        debug!(iterations, unreachable, "reaching definitions");
        ReachingDefinitions { states, phi_nodes, iterations }
    }

    /// The definition of `object` reaching `loc`.
    pub fn def(&self, loc: Loc, object: ObjectIndex) -> Def {
        self.states
            .get(loc.number())
            .and_then(Option::as_ref)
            .map_or(Def::Input, |state| state[object])
    }

    pub fn is_reachable(&self, loc: Loc) -> bool {
        self.states.get(loc.number()).is_some_and(Option::is_some)
    }

    /// The phi entries of `object` at `loc`, if `object` has a phi there.
    pub fn phi_entries(&self, loc: Loc, object: ObjectIndex) -> Option<&PhiEntries> {
        self.phi_nodes.get(loc.number()).and_then(|phis| phis.get(&object))
    }

    /// The objects with a phi at `loc`, in object order.
    pub fn phis_at(&self, loc: Loc) -> impl Iterator<Item = (ObjectIndex, &PhiEntries)> + '_ {
        self.phi_nodes.get(loc.number()).into_iter().flatten().map(|(o, e)| (*o, e))
    }

    /// How many locations the fixpoint iteration visited.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}
