// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which tracked objects each location writes.

use crate::dereference::AliasResolver;
use crate::error::Result;
use crate::objects::{has_static_lifetime, leaves, ObjectIndex, SsaObject, SsaObjects};
use goto_ir::goto_program::{Expr, ExprValue, GotoProgram, InstructionBody, Loc, SymbolTable};
use std::collections::BTreeSet;
use tracing::trace;

#[derive(Clone, Debug, Default)]
pub struct Assignments {
    assigned: Vec<BTreeSet<ObjectIndex>>,
}

impl Assignments {
    pub fn build(
        program: &GotoProgram,
        objects: &SsaObjects,
        symbol_table: &SymbolTable,
        resolver: &dyn AliasResolver,
    ) -> Result<Assignments> {
        let mut assigned = vec![BTreeSet::new(); program.len()];
        for (loc, instruction) in program.iter() {
            let targets = &mut assigned[loc.number()];
            let mut assign = |lhs: &Expr| -> Result<()> {
                let lhs = resolver.resolve(lhs.clone(), loc, symbol_table)?;
                assigned_objects(&lhs, objects, symbol_table, targets);
                Ok(())
            };
            match instruction.body() {
                InstructionBody::Assign { lhs, .. } => assign(lhs)?,
                InstructionBody::Decl { symbol } => assign(symbol)?,
                InstructionBody::FunctionCall { lhs, .. } => {
                    if let Some(lhs) = lhs {
                        assign(lhs)?;
                    }
                    // The callee may write any global.
                    let globals = objects
                        .iter()
                        .enumerate()
                        .filter(|(_, o)| has_static_lifetime(o.expr(), symbol_table))
                        .map(|(i, _)| i);
                    targets.extend(globals);
                }
                _ => {}
            }
            trace!(%loc, assigned = targets.len(), "assignments");
        }
        Ok(Assignments { assigned })
    }

    /// The objects written at `loc`.
    pub fn assigned_at(&self, loc: Loc) -> impl Iterator<Item = ObjectIndex> + '_ {
        self.assigned.get(loc.number()).into_iter().flatten().copied()
    }

    pub fn assigns(&self, loc: Loc, object: ObjectIndex) -> bool {
        self.assigned.get(loc.number()).is_some_and(|s| s.contains(&object))
    }
}

/// The tracked objects a write to `lhs` changes.
fn assigned_objects(
    lhs: &Expr,
    objects: &SsaObjects,
    symbol_table: &SymbolTable,
    out: &mut BTreeSet<ObjectIndex>,
) {
    if let Some(object) = SsaObject::new(lhs, symbol_table) {
        let tracked = leaves(object, symbol_table)
            .into_iter()
            .filter_map(|leaf| objects.index_of(leaf.identifier()));
        out.extend(tracked);
        return;
    }
    match lhs.value() {
        ExprValue::ByteExtract { e: base, .. }
        | ExprValue::ComplexImag(base)
        | ExprValue::ComplexReal(base)
        | ExprValue::Index { array: base, .. }
        | ExprValue::Member { lhs: base, .. } => {
            assigned_objects(base, objects, symbol_table, out)
        }
        ExprValue::If { t, e, .. } => {
            assigned_objects(t, objects, symbol_table, out);
            assigned_objects(e, objects, symbol_table, out);
        }
        _ => {}
    }
}
