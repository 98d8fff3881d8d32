// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while building the SSA form of a function.
//!
//! All of these are internal-consistency failures: the input program was malformed or not
//! normalized enough. They abort the construction for the current function; whether that aborts
//! a whole verification run is up to the caller.

use goto_ir::goto_program::Loc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SsaError {
    /// An assignment target none of the decomposition rules applies to.
    #[error("unrecognized assignment target at location {loc}: `{target}`")]
    UnrecognizedAssignmentTarget { loc: Loc, target: String },

    /// A side effect that survived side effect elimination.
    #[error("unexpected side effect at location {loc}: `{expr}`")]
    UnexpectedSideEffect { loc: Loc, expr: String },

    /// A dereference that survived alias resolution.
    #[error("unexpected dereference at location {loc}: `{expr}`")]
    UnexpectedDereference { loc: Loc, expr: String },

    /// A side effect kind that cannot be eliminated from an expression (e.g. a call).
    #[error("unsupported side effect at location {loc}: `{expr}`")]
    UnsupportedSideEffect { loc: Loc, expr: String },

    /// A type the construction needs to look into, but which has no usable definition.
    #[error("unknown type `{typ}` at location {loc}")]
    UnknownType { loc: Loc, typ: String },

    #[error("unknown member `{member}` of `{typ}` at location {loc}")]
    UnknownMember { loc: Loc, typ: String, member: String },

    #[error("malformed program: {0}")]
    MalformedProgram(String),

    /// The passes of the construction were run out of order.
    #[error("SSA pass `{requested}` cannot run after `{current}`")]
    PhaseOrder { current: String, requested: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, SsaError>;
