// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! This module contains the representations of CBMC's goto programs used by the local SSA
//! construction.
//!
//! The encoding follows the one in CBMC, and thus one might find it clearer in CBMC's
//! documentation. In short, a goto model has three levels:
//! 1. [goto_program::SymbolTable] holds the variables, functions and type definitions.
//! 2. [goto_program::GotoFunction] is a function body: a [goto_program::GotoProgram], i.e. a
//!    sequence of [goto_program::Instruction]s connected by fallthrough and goto edges.
//! 3. [goto_program::Expr] and [goto_program::Type] are the typed expression trees instructions
//!    are made of.
//!
//! Every part of the model can be (de)serialized with serde, which is how tools outside the
//! Rust world hand programs over.

pub mod goto_program;
mod cbmc_string;
pub use cbmc_string::{InternString, InternStringOption, InternedString};
