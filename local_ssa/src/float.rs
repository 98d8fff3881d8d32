// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Makes the rounding of floating point operations explicit.

use goto_ir::goto_program::{BinaryOperator, Expr, ExprValue, Type};

/// The global that holds the current rounding mode.
pub const ROUNDING_MODE: &str = "__CPROVER_rounding_mode";

/// IEEE 754 round toward zero, the rounding of float to integer conversions in C.
const ROUND_TO_ZERO: i64 = 3;

fn rounding_mode() -> Expr {
    Expr::symbol_expression(ROUNDING_MODE, Type::c_int())
}

/// Replace floating point arithmetic and conversions by their `floatbv` variants, which carry
/// the rounding mode as an operand.
pub fn adjust_float_expressions(expr: Expr) -> Expr {
    let expr = expr.map_operands(adjust_float_expressions);
    let location = *expr.location();
    let adjusted = match expr.value() {
        ExprValue::BinOp { op, lhs, rhs }
            if expr.typ().is_floating_point()
                && matches!(
                    op,
                    BinaryOperator::Plus
                        | BinaryOperator::Minus
                        | BinaryOperator::Mult
                        | BinaryOperator::Div
                ) =>
        {
            lhs.clone().floatbv_binop(*op, rhs.clone(), rounding_mode())
        }
        ExprValue::Typecast(e) if e.typ() != expr.typ() => {
            let (from, to) = (e.typ(), expr.typ());
            if to.is_floating_point() && (from.is_floating_point() || from.is_integer()) {
                e.clone().floatbv_typecast(to.clone(), rounding_mode())
            } else if from.is_floating_point() && to.is_integer() {
                let toward_zero = Expr::int_constant(ROUND_TO_ZERO, Type::c_int());
                e.clone().floatbv_typecast(to.clone(), toward_zero)
            } else {
                return expr;
            }
        }
        _ => return expr,
    };
    adjusted.with_location(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn float_arithmetic_gets_a_rounding_mode() {
        let f = var("f", Type::double());
        let e = f.clone().plus(f.clone()).mul(f);
        let adjusted = adjust_float_expressions(e);
        assert_eq!(
            adjusted.to_string(),
            "(f +[__CPROVER_rounding_mode] f) *[__CPROVER_rounding_mode] f"
        );
        let g = var("g", Type::float());
        let quotient = adjust_float_expressions(g.clone().div(g));
        assert_eq!(quotient.to_string(), "g /[__CPROVER_rounding_mode] g");
    }

    #[test]
    fn conversions() {
        let f = var("f", Type::float());
        let to_double = adjust_float_expressions(f.clone().cast_to(Type::double()));
        assert!(matches!(to_double.value(), ExprValue::FloatbvTypecast { .. }));
        let to_int = adjust_float_expressions(f.cast_to(int()));
        assert_eq!(to_int.to_string(), "(int32_t)[3] f");
    }

    #[test]
    fn integer_expressions_are_untouched() {
        let x = var("x", int());
        let e = x.clone().plus(int_const(1)).cast_to(Type::unsigned_int(8));
        assert_eq!(adjust_float_expressions(e.clone()), e);
        let test = x.neq(int_const(0));
        assert_eq!(test.to_string(), "x != 0");
        assert_eq!(adjust_float_expressions(test.clone()), test);
    }
}
