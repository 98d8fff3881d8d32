// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Local SSA construction for goto functions.
//!
//! [LocalSsa] turns the body of one [goto_ir::goto_program::GotoFunction] into a set of
//! equalities over versioned symbols: every location gets the equalities of the values it
//! defines (phi nodes, assignments), the branch conditions it tests and the guard under which
//! it is reached, plus the assertion it checks. Loops are cut at their back edges: the values
//! flowing back into a loop header are free `lb` symbols chosen by a free `ls` selector, so the
//! formula of a function is acyclic and can be unwound or abstracted by the caller.
//!
//! The construction relies on two collaborators that callers can replace: an
//! [AliasResolver] that removes pointer dereferences and an [AllocationModel] that turns heap
//! allocations into objects.

mod assign;
pub mod assignments;
pub mod dereference;
pub mod domain;
mod error;
pub mod float;
pub mod guard_map;
mod local_ssa;
pub mod malloc;
pub mod naming;
pub mod objects;
mod options;
mod output;
mod rename;

pub use crate::local_ssa::{ConstraintSink, LocalSsa, Node, Phase};
pub use dereference::{AliasResolver, NoAliasing, PointsToMap};
pub use error::{Result, SsaError};
pub use malloc::{AllocationModel, DynamicObjectAllocation};
pub use naming::{SsaNaming, VersionKind};
pub use objects::{SsaObject, SsaObjects};
pub use options::SsaOptions;
