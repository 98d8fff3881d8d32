// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renaming of expressions into SSA form.
//!
//! Reading an expression at a location replaces every tracked object in it by the version
//! that reaches the location. Before that, side effects become fresh placeholders and
//! dereferences are resolved, so the renamed expression is a plain value.

use crate::dereference::try_map_indexed;
use crate::error::{Result, SsaError};
use crate::float::adjust_float_expressions;
use crate::local_ssa::LocalSsa;
use crate::naming::{is_versioned, VersionKind};
use crate::objects::{SsaObject, SSA_NAMESPACE};
use goto_ir::goto_program::{Expr, ExprValue, Loc, Type};
use tracing::trace;

impl LocalSsa<'_> {
    /// The value of `expr` when read at `loc`.
    pub fn read_rhs(&self, expr: &Expr, loc: Loc) -> Result<Expr> {
        let expr = adjust_float_expressions(expr.clone());
        let mut counter = 0;
        let expr = self.replace_side_effects(expr, loc, &mut counter)?;
        let expr = self.resolver.resolve(expr, loc, self.symbol_table)?;
        let renamed = self.read_rhs_rec(expr, loc)?;
        trace!(%loc, %renamed, "read_rhs");
        Ok(renamed)
    }

    /// The version of `object` that reaches `loc`.
    pub fn read_rhs_object(&self, object: &SsaObject, loc: Loc) -> Expr {
        match self.objects.index_of(object.identifier()) {
            Some(index) => self.naming.name_def(object, self.analysis.def(loc, index)),
            None => self.naming.name_input(object),
        }
    }

    /// Like [LocalSsa::read_rhs], but an object written at `loc` reads as the value written
    /// there.
    pub fn read_lhs(&self, expr: &Expr, loc: Loc) -> Result<Expr> {
        let expr = self.resolver.resolve(expr.clone(), loc, self.symbol_table)?;
        let tracked = SsaObject::new(&expr, self.symbol_table)
            .and_then(|object| Some((self.objects.index_of(object.identifier())?, object)));
        match tracked {
            Some((index, object)) if self.assignments.assigns(loc, index) => {
                Ok(self.naming.name(&object, VersionKind::Out, loc))
            }
            Some((_, object)) => Ok(self.read_rhs_object(&object, loc)),
            None => self.read_rhs(&expr, loc),
        }
    }

    /// The value of `object` on entry to `loc`. At a loop header this is the value coming
    /// around the loop, before the phi selects between it and the value entering the loop.
    pub fn read_node_in(&self, object: &SsaObject, loc: Loc) -> Expr {
        let Some(index) = self.objects.index_of(object.identifier()) else {
            return self.naming.name_input(object);
        };
        let loops_back = self.analysis.phi_entries(loc, index).is_some_and(|entries| {
            entries.keys().any(|source| source.from().is_some_and(|from| from > loc))
        });
        if loops_back {
            self.naming.name(object, VersionKind::LoopBack, loc)
        } else {
            self.read_rhs_object(object, loc)
        }
    }

    /// Replace nondeterministic values and allocations, innermost first, by side effect free
    /// expressions. `counter` numbers the side effects of one read.
    pub(crate) fn replace_side_effects(
        &self,
        expr: Expr,
        loc: Loc,
        counter: &mut usize,
    ) -> Result<Expr> {
        let expr = expr.try_map_operands(|op| self.replace_side_effects(op, loc, counter))?;
        match expr.value() {
            ExprValue::Nondet => {
                *counter += 1;
                let placeholder = self.naming.nondet_symbol(loc, *counter, expr.typ().clone());
                Ok(placeholder.with_location(*expr.location()))
            }
            ExprValue::Malloc { .. } => {
                *counter += 1;
                let suffix = self.naming.side_effect_suffix(loc, *counter);
                self.allocation.lower(&expr, &suffix, loc, self.symbol_table)
            }
            ExprValue::FunctionCall { .. } => {
                Err(SsaError::UnsupportedSideEffect { loc, expr: expr.to_string() })
            }
            _ => Ok(expr),
        }
    }

    pub(crate) fn read_rhs_rec(&self, expr: Expr, loc: Loc) -> Result<Expr> {
        match expr.value() {
            _ if expr.is_side_effect_root() => {
                return Err(SsaError::UnexpectedSideEffect { loc, expr: expr.to_string() });
            }
            ExprValue::AddressOf(_) => {
                let address = expr.try_map_operands(|object| self.address_of_rec(object, loc))?;
                return Ok(canonical_address(address));
            }
            ExprValue::Dereference(_) => {
                return Err(SsaError::UnexpectedDereference { loc, expr: expr.to_string() });
            }
            // Already renamed, or generated by the construction itself.
            ExprValue::Symbol { identifier }
                if is_versioned(*identifier) || identifier.starts_with(SSA_NAMESPACE) =>
            {
                return Ok(expr);
            }
            _ => {}
        }

        let Some(object) = SsaObject::new(&expr, self.symbol_table) else {
            return expr.try_map_operands(|op| self.read_rhs_rec(op, loc));
        };
        // Struct-typed objects are not tracked, their members are.
        if let Type::Struct { components, .. } = self.symbol_table.follow(expr.typ()) {
            let values = components
                .iter()
                .map(|c| self.read_rhs_rec(expr.clone().member(c.name(), self.symbol_table), loc))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Expr::struct_expr_from_values(
                expr.typ().clone(),
                values,
                self.symbol_table,
            ));
        }
        Ok(self.read_rhs_object(&object, loc))
    }

    /// The operand of an address-of. The addressed path stays as it is; the pointers, indices
    /// and conditions that select it are read.
    fn address_of_rec(&self, expr: Expr, loc: Loc) -> Result<Expr> {
        match expr.value() {
            ExprValue::Dereference(_) => {
                expr.try_map_operands(|pointer| self.read_rhs_rec(pointer, loc))
            }
            ExprValue::Member { .. } => {
                expr.try_map_operands(|compound| self.address_of_rec(compound, loc))
            }
            ExprValue::Index { .. } => try_map_indexed(expr, |i, op| {
                if i == 0 { self.address_of_rec(op, loc) } else { self.read_rhs_rec(op, loc) }
            }),
            ExprValue::If { .. } => try_map_indexed(expr, |i, op| {
                if i == 0 { self.read_rhs_rec(op, loc) } else { self.address_of_rec(op, loc) }
            }),
            _ => Ok(expr),
        }
    }
}

/// `&*p` is `p`.
fn canonical_address(address: Expr) -> Expr {
    if let ExprValue::AddressOf(object) = address.value() {
        if let ExprValue::Dereference(pointer) = object.value() {
            return pointer.clone().cast_to(address.typ().clone());
        }
    }
    address
}
