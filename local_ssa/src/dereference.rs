// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolution of pointer dereferences.
//!
//! The SSA construction only tracks named objects, so every `*p` has to be replaced by the
//! objects `p` may point to before renaming. Which objects those are is the business of an
//! alias analysis; this module defines the interface to it and two simple implementations.

use crate::error::Result;
use crate::objects::SSA_NAMESPACE;
use goto_ir::goto_program::{Expr, ExprValue, Loc, SymbolTable, Type};
use goto_ir::InternedString;
use std::collections::BTreeMap;
use std::convert::Infallible;
use tracing::trace;

/// Replaces the dereferences in an expression by the objects they may refer to.
pub trait AliasResolver {
    /// Rewrite `expr`, as evaluated at `loc`, so that it contains no dereference outside of
    /// address-of expressions. `&*p` is canonicalized to `p`.
    fn resolve(&self, expr: Expr, loc: Loc, symbol_table: &SymbolTable) -> Result<Expr>;
}

/// Assumes nothing about pointers: only `*&x` is resolved (to `x`). Any other dereference
/// becomes an unconstrained placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAliasing;

impl AliasResolver for NoAliasing {
    fn resolve(&self, expr: Expr, loc: Loc, _symbol_table: &SymbolTable) -> Result<Expr> {
        Ok(dereference_rec(expr, &|pointer, typ| unknown_target(pointer, typ, loc)))
    }
}

/// Points-to sets given per pointer variable. A dereference of a pointer `p` with targets
/// `c1 .. cn` becomes `p == &c1 ? c1 : (... : cn)`. The last candidate is not tested: `p` is
/// assumed to point into its set.
#[derive(Clone, Debug, Default)]
pub struct PointsToMap {
    targets: BTreeMap<InternedString, Vec<InternedString>>,
}

impl PointsToMap {
    pub fn new() -> Self {
        PointsToMap::default()
    }

    pub fn insert<T, U>(&mut self, pointer: T, targets: Vec<U>)
    where
        T: Into<InternedString>,
        U: Into<InternedString>,
    {
        self.targets.insert(pointer.into(), targets.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The candidate objects of `pointer` whose type is `typ`.
    fn candidates(&self, pointer: &Expr, typ: &Type, symbol_table: &SymbolTable) -> Vec<Expr> {
        let Some(targets) = pointer.identifier().and_then(|id| self.targets.get(&id)) else {
            return vec![];
        };
        targets
            .iter()
            .filter_map(|target| symbol_table.lookup(*target))
            .map(|symbol| symbol.to_expr())
            .filter(|candidate| {
                let fits = candidate.typ() == typ;
                if !fits {
                    trace!(%pointer, %candidate, "points-to candidate of the wrong type");
                }
                fits
            })
            .collect()
    }
}

impl<T: Into<InternedString>, U: Into<InternedString>> FromIterator<(T, Vec<U>)> for PointsToMap {
    fn from_iter<I: IntoIterator<Item = (T, Vec<U>)>>(iter: I) -> Self {
        let mut map = PointsToMap::new();
        iter.into_iter().for_each(|(pointer, targets)| map.insert(pointer, targets));
        map
    }
}

impl AliasResolver for PointsToMap {
    fn resolve(&self, expr: Expr, loc: Loc, symbol_table: &SymbolTable) -> Result<Expr> {
        Ok(dereference_rec(expr, &|pointer, typ| {
            let candidates = self.candidates(pointer, typ, symbol_table);
            let Some((last, rest)) = candidates.split_last() else {
                return unknown_target(pointer, typ, loc);
            };
            rest.iter().rev().fold(last.clone(), |otherwise, candidate| {
                let points_here = pointer.clone().eq(candidate.clone().address_of());
                points_here.ternary(candidate.clone(), otherwise)
            })
        }))
    }
}

/// The value behind a pointer nothing is known about. Reading the same pointer twice at one
/// location gives the same placeholder.
fn unknown_target(pointer: &Expr, typ: &Type, loc: Loc) -> Expr {
    Expr::symbol_expression(format!("{SSA_NAMESPACE}deref#{loc}({pointer})"), typ.clone())
}

type Deref<'a> = dyn Fn(&Expr, &Type) -> Expr + 'a;

fn dereference_rec(expr: Expr, deref: &Deref) -> Expr {
    match expr.value() {
        ExprValue::AddressOf(object) => {
            if let ExprValue::Dereference(pointer) = object.value() {
                return dereference_rec(pointer.clone(), deref);
            }
            expr.map_operands(|object| address_rec(object, deref))
        }
        _ => {
            let expr = expr.map_operands(|op| dereference_rec(op, deref));
            match expr.value() {
                ExprValue::Dereference(pointer) => match pointer.value() {
                    ExprValue::AddressOf(object) => object.clone(),
                    _ => deref(pointer, expr.typ()),
                },
                _ => expr,
            }
        }
    }
}

/// The operand of an address-of: the addressed path stays, pointers and indices in it are
/// resolved.
fn address_rec(expr: Expr, deref: &Deref) -> Expr {
    match expr.value() {
        ExprValue::Dereference(_) => expr.map_operands(|pointer| dereference_rec(pointer, deref)),
        ExprValue::Member { .. } => expr.map_operands(|lhs| address_rec(lhs, deref)),
        ExprValue::Index { .. } => map_indexed(expr, |i, op| {
            if i == 0 { address_rec(op, deref) } else { dereference_rec(op, deref) }
        }),
        ExprValue::If { .. } => map_indexed(expr, |i, op| {
            if i == 0 { dereference_rec(op, deref) } else { address_rec(op, deref) }
        }),
        _ => expr,
    }
}

/// [Expr::map_operands], also passing the position of each operand.
pub(crate) fn map_indexed<F>(expr: Expr, mut f: F) -> Expr
where
    F: FnMut(usize, Expr) -> Expr,
{
    match try_map_indexed::<Infallible, _>(expr, |i, op| Ok(f(i, op))) {
        Ok(e) => e,
        Err(never) => match never {},
    }
}

/// [Expr::try_map_operands], also passing the position of each operand.
pub(crate) fn try_map_indexed<E, F>(expr: Expr, mut f: F) -> std::result::Result<Expr, E>
where
    F: FnMut(usize, Expr) -> std::result::Result<Expr, E>,
{
    let mut position = 0;
    expr.try_map_operands(|op| {
        let op = f(position, op);
        position += 1;
        op
    })
}
