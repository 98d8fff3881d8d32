// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use self::InstructionBody::*;
use super::{Expr, Location};
use crate::InternedString;
use serde::{Deserialize, Serialize};
use std::fmt;

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// A program point: the index of an instruction in its [GotoProgram].
///
/// The number doubles as CBMC's `location_number`: it is unique within a function and its order
/// is program order, so a goto whose target number is not greater than its own is a back-edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Loc(usize);

/// The instructions of a goto program, after goto-conversion.
/// Based off the CBMC definition here:
/// <https://github.com/diffblue/cbmc/blob/develop/src/goto-programs/goto_program.h>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionBody {
    /// `lhs = rhs;`
    Assign { lhs: Expr, rhs: Expr },
    /// `__CPROVER_assume(cond);`
    Assume { cond: Expr },
    /// `assert(cond);`, with an optional property description.
    Assert {
        cond: Expr,
        #[serde(default)]
        property: Option<InternedString>,
    },
    /// `typ symbol;`
    Decl { symbol: Expr },
    /// End of the lifetime of `symbol`.
    Dead { symbol: Expr },
    /// The single exit point of the function.
    EndFunction,
    /// `lhs = function(arguments);` or `function(arguments);`
    FunctionCall {
        #[serde(default)]
        lhs: Option<Expr>,
        function: Expr,
        arguments: Vec<Expr>,
    },
    /// `if (cond) goto target;`. An unconditional goto has a `true` condition.
    Goto { cond: Expr, target: Loc },
    /// `;`
    Skip,
}

/// The classification of instructions the SSA construction cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionKind {
    Assert,
    Assignment,
    Assume,
    FunctionCall,
    Goto,
    Other,
}

/// An instruction together with the source location it was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    body: InstructionBody,
    #[serde(default)]
    location: Location,
}

/// The body of a function: instructions in program order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GotoProgram {
    instructions: Vec<Instruction>,
}

/// A named function body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotoFunction {
    pub name: InternedString,
    pub body: GotoProgram,
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

impl Loc {
    pub fn new(number: usize) -> Self {
        Loc(number)
    }

    /// The `location_number`.
    pub fn number(&self) -> usize {
        self.0
    }

    fn next(&self) -> Loc {
        Loc(self.0 + 1)
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constructors
impl Instruction {
    pub fn new(body: InstructionBody, location: Location) -> Self {
        Instruction { body, location }
    }

    pub fn assign(lhs: Expr, rhs: Expr, loc: Location) -> Self {
        assert_eq!(lhs.typ(), rhs.typ(), "Assignment of {rhs:?} to {lhs:?}");
        Instruction::new(Assign { lhs, rhs }, loc)
    }

    pub fn assume(cond: Expr, loc: Location) -> Self {
        assert!(cond.typ().is_bool(), "Assumption of non-boolean {cond:?}");
        Instruction::new(Assume { cond }, loc)
    }

    pub fn assert<T: Into<InternedString>>(cond: Expr, property: Option<T>, loc: Location) -> Self {
        assert!(cond.typ().is_bool(), "Assertion of non-boolean {cond:?}");
        Instruction::new(Assert { cond, property: property.map(Into::into) }, loc)
    }

    pub fn decl(symbol: Expr, loc: Location) -> Self {
        assert!(symbol.is_symbol(), "Declaration of non-symbol {symbol:?}");
        Instruction::new(Decl { symbol }, loc)
    }

    pub fn dead(symbol: Expr, loc: Location) -> Self {
        assert!(symbol.is_symbol(), "Dead of non-symbol {symbol:?}");
        Instruction::new(Dead { symbol }, loc)
    }

    pub fn end_function(loc: Location) -> Self {
        Instruction::new(EndFunction, loc)
    }

    pub fn function_call(
        lhs: Option<Expr>,
        function: Expr,
        arguments: Vec<Expr>,
        loc: Location,
    ) -> Self {
        assert!(function.typ().is_code(), "Call of non-function {function:?}");
        Instruction::new(FunctionCall { lhs, function, arguments }, loc)
    }

    pub fn goto(cond: Expr, target: Loc, loc: Location) -> Self {
        assert!(cond.typ().is_bool(), "Goto with non-boolean condition {cond:?}");
        Instruction::new(Goto { cond, target }, loc)
    }

    pub fn skip(loc: Location) -> Self {
        Instruction::new(Skip, loc)
    }
}

/// Getters
impl Instruction {
    pub fn body(&self) -> &InstructionBody {
        &self.body
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn kind(&self) -> InstructionKind {
        match self.body {
            Assert { .. } => InstructionKind::Assert,
            Assign { .. } => InstructionKind::Assignment,
            Assume { .. } => InstructionKind::Assume,
            FunctionCall { .. } => InstructionKind::FunctionCall,
            Goto { .. } => InstructionKind::Goto,
            Decl { .. } | Dead { .. } | EndFunction | Skip => InstructionKind::Other,
        }
    }

    /// The condition of a goto, assumption or assertion.
    pub fn guard(&self) -> Option<&Expr> {
        match &self.body {
            Assert { cond, .. } | Assume { cond } | Goto { cond, .. } => Some(cond),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<Loc> {
        match self.body {
            Goto { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Every expression the instruction is made of.
    pub fn expressions(&self) -> Vec<&Expr> {
        match &self.body {
            Assign { lhs, rhs } => vec![lhs, rhs],
            Assert { cond, .. } | Assume { cond } | Goto { cond, .. } => vec![cond],
            Decl { symbol } | Dead { symbol } => vec![symbol],
            FunctionCall { lhs, function, arguments } => {
                lhs.iter().chain(std::iter::once(function)).chain(arguments.iter()).collect()
            }
            EndFunction | Skip => vec![],
        }
    }

    /// Does control continue with the next instruction in program order?
    fn falls_through(&self) -> bool {
        match &self.body {
            Goto { cond, .. } => !cond.is_true(),
            EndFunction => false,
            _ => true,
        }
    }
}

impl GotoProgram {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        GotoProgram { instructions }
    }

    /// The first location. Only meaningful for non-empty programs.
    pub fn entry(&self) -> Loc {
        Loc(0)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, loc: Loc) -> Option<&Instruction> {
        self.instructions.get(loc.0)
    }

    /// The instruction at `loc`. Panics if `loc` is not a location of this program.
    pub fn instruction(&self, loc: Loc) -> &Instruction {
        &self.instructions[loc.0]
    }

    /// Locations and instructions, in program order.
    pub fn iter(&self) -> impl Iterator<Item = (Loc, &Instruction)> + '_ {
        self.instructions.iter().enumerate().map(|(i, instr)| (Loc(i), instr))
    }

    pub fn locs(&self) -> impl Iterator<Item = Loc> + '_ {
        (0..self.instructions.len()).map(Loc)
    }

    /// The next location in program order, if there is one.
    pub fn fallthrough(&self, loc: Loc) -> Option<Loc> {
        let instr = self.get(loc)?;
        Some(loc.next()).filter(|next| instr.falls_through() && next.0 < self.len())
    }

    /// Control flow successors: the fallthrough location first, then the goto target.
    pub fn successors(&self, loc: Loc) -> Vec<Loc> {
        let Some(instr) = self.get(loc) else { return vec![] };
        let mut succs: Vec<Loc> = self.fallthrough(loc).into_iter().collect();
        if let Some(target) = instr.target().filter(|t| t.0 < self.len()) {
            if !succs.contains(&target) {
                succs.push(target);
            }
        }
        succs
    }

    /// Control flow predecessors of every location, each list in program order.
    pub fn predecessors(&self) -> Vec<Vec<Loc>> {
        let mut preds = vec![vec![]; self.len()];
        for from in self.locs() {
            for to in self.successors(from) {
                preds[to.0].push(from);
            }
        }
        preds
    }

    /// A goto that jumps to itself or to an earlier location.
    pub fn is_backwards_goto(&self, loc: Loc) -> bool {
        self.get(loc).and_then(Instruction::target).is_some_and(|target| target <= loc)
    }

    /// The first goto whose target is not a location of this program, if any.
    pub fn invalid_target(&self) -> Option<(Loc, Loc)> {
        self.iter().find_map(|(loc, instr)| {
            instr.target().filter(|target| target.0 >= self.len()).map(|target| (loc, target))
        })
    }
}

impl GotoFunction {
    pub fn new<T: Into<InternedString>>(name: T, body: GotoProgram) -> Self {
        GotoFunction { name: name.into(), body }
    }
}
