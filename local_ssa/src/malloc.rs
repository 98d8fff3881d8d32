// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::error::{Result, SsaError};
use crate::objects::SSA_NAMESPACE;
use goto_ir::goto_program::{Expr, ExprValue, Loc, SymbolTable, Type};

/// Lowers a dynamic allocation side effect into a side effect free expression.
pub trait AllocationModel {
    /// `malloc` is the allocation expression; `suffix` is unique among the side effects of the
    /// current location and SSA instance.
    fn lower(&self, malloc: &Expr, suffix: &str, loc: Loc, symbol_table: &SymbolTable)
    -> Result<Expr>;
}

/// Each allocation site creates one fresh object `ssa::dynamic_object$<suffix>`; the allocation
/// evaluates to its address.
#[derive(Clone, Copy, Debug, Default)]
pub struct DynamicObjectAllocation;

impl AllocationModel for DynamicObjectAllocation {
    fn lower(
        &self,
        malloc: &Expr,
        suffix: &str,
        loc: Loc,
        _symbol_table: &SymbolTable,
    ) -> Result<Expr> {
        if !matches!(malloc.value(), ExprValue::Malloc { .. }) {
            return Err(SsaError::UnsupportedSideEffect { loc, expr: malloc.to_string() });
        }
        let pointer_type = malloc.typ();
        let object_type = match pointer_type.base_type() {
            // `void*` allocations are byte buffers.
            Some(Type::Empty) | None => Type::unsigned_int(8),
            Some(typ) => typ.clone(),
        };
        let object =
            Expr::symbol_expression(format!("{SSA_NAMESPACE}dynamic_object${suffix}"), object_type);
        Ok(object.address_of().cast_to(pointer_type.clone()).with_location(*malloc.location()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn allocation_is_the_address_of_a_fresh_object() {
        let st = point_table();
        let m = Expr::malloc(int_const(4).cast_to(Type::size_t()), int().to_pointer());
        let lowered = DynamicObjectAllocation.lower(&m, "3.1", Loc::new(3), &st).unwrap();
        assert_eq!(lowered.to_string(), "&ssa::dynamic_object$3.1");
        assert_eq!(lowered.typ(), &int().to_pointer());
        assert!(!lowered.is_side_effect());
    }

    #[test]
    fn void_allocations_are_cast() {
        let st = point_table();
        let m = Expr::malloc(int_const(4).cast_to(Type::size_t()), Type::void_pointer());
        let lowered = DynamicObjectAllocation.lower(&m, "0.1", Loc::new(0), &st).unwrap();
        assert_eq!(lowered.to_string(), "(void*) &ssa::dynamic_object$0.1");
    }

    #[test]
    fn only_allocations_are_lowered() {
        let st = point_table();
        let n = Expr::nondet(int().to_pointer());
        assert!(DynamicObjectAllocation.lower(&n, "0.1", Loc::new(0), &st).is_err());
    }
}
