// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! This module contains typesafe representations of CBMC's goto programs, restricted to the
//! constructs the SSA construction consumes.

// There are a fair number of constructs in this module that are better maintained as
// explicit pattern matching versus using the `matches!` macro.
#![allow(clippy::match_like_matches_macro)]

mod expr;
mod location;
mod pretty;
mod program;
mod symbol;
mod symbol_table;
mod typ;

pub use expr::{BinaryOperator, Endianness, Expr, ExprValue, UnaryOperator, WithDesignator};
pub use location::Location;
pub use program::{GotoFunction, GotoProgram, Instruction, InstructionBody, InstructionKind, Loc};
pub use symbol::Symbol;
pub use symbol_table::SymbolTable;
pub use typ::{DatatypeComponent, Parameter, Type, aggr_tag};
