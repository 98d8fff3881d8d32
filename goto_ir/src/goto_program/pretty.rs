// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A C-like rendering of expressions, used by textual dumps and log messages.
//!
//! The output is meant to be read by people: operator precedence is not modelled, every
//! compound operand is parenthesized instead.

use super::{BinaryOperator, Endianness, Expr, ExprValue, UnaryOperator, WithDesignator};
use std::fmt::{self, Display, Formatter};

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Ashr => ">>",
            BinaryOperator::Bitand => "&",
            BinaryOperator::Bitor => "|",
            BinaryOperator::Bitxor => "^",
            BinaryOperator::Div => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Implies => "==>",
            BinaryOperator::Le => "<=",
            BinaryOperator::Lshr => ">>>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Minus => "-",
            BinaryOperator::Mod => "%",
            BinaryOperator::Mult => "*",
            BinaryOperator::Notequal => "!=",
            BinaryOperator::Or => "||",
            BinaryOperator::Plus => "+",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Xor => "xor",
        }
    }
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::Bitnot => "~",
            UnaryOperator::Not => "!",
            UnaryOperator::UnaryMinus => "-",
        }
    }
}

/// An operand, wrapped in parentheses unless it is atomic.
struct Operand<'a>(&'a Expr);

impl Display for Operand<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0.value() {
            ExprValue::BinOp { .. }
            | ExprValue::FloatbvBinOp { .. }
            | ExprValue::FloatbvTypecast { .. }
            | ExprValue::If { .. }
            | ExprValue::Typecast(_)
            | ExprValue::UnOp { .. }
            | ExprValue::With { .. } => write!(f, "({})", self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}

/// Comma separated list.
struct List<'a>(&'a [Expr]);

impl Display for List<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.value() {
            ExprValue::AddressOf(e) => write!(f, "&{}", Operand(e)),
            ExprValue::Array { elems } => write!(f, "{{ {} }}", List(elems)),
            ExprValue::BinOp { op, lhs, rhs } => {
                write!(f, "{} {} {}", Operand(lhs), op.symbol(), Operand(rhs))
            }
            ExprValue::BoolConstant(b) => write!(f, "{b}"),
            ExprValue::ByteExtract { e, offset, endianness } => {
                let order = match endianness {
                    Endianness::Little => "little",
                    Endianness::Big => "big",
                };
                write!(f, "byte_extract_{order}_endian({e}, {offset}, {})", self.typ())
            }
            ExprValue::Complex { real, imag } => write!(f, "complex({real}, {imag})"),
            ExprValue::ComplexImag(e) => write!(f, "__imag__ {}", Operand(e)),
            ExprValue::ComplexReal(e) => write!(f, "__real__ {}", Operand(e)),
            ExprValue::Dereference(e) => write!(f, "*{}", Operand(e)),
            ExprValue::DoubleConstant(c) => write!(f, "{c:?}"),
            ExprValue::FloatConstant(c) => write!(f, "{c:?}f"),
            ExprValue::FloatbvBinOp { op, lhs, rhs, rounding_mode } => {
                write!(f, "{} {}[{rounding_mode}] {}", Operand(lhs), op.symbol(), Operand(rhs))
            }
            ExprValue::FloatbvTypecast { e, rounding_mode } => {
                write!(f, "({})[{rounding_mode}] {}", self.typ(), Operand(e))
            }
            ExprValue::FunctionCall { function, arguments } => {
                write!(f, "{function}({})", List(arguments))
            }
            ExprValue::If { c, t, e } => {
                write!(f, "{} ? {} : {}", Operand(c), Operand(t), Operand(e))
            }
            ExprValue::Index { array, index } => write!(f, "{}[{index}]", Operand(array)),
            ExprValue::IntConstant(i) => write!(f, "{i}"),
            ExprValue::Malloc { size } => write!(f, "malloc({size})"),
            ExprValue::Member { lhs, field } => write!(f, "{}.{field}", Operand(lhs)),
            ExprValue::Nondet => write!(f, "nondet<{}>()", self.typ()),
            ExprValue::NondetSymbol { identifier } => write!(f, "{identifier}"),
            ExprValue::PointerConstant(0) => write!(f, "NULL"),
            ExprValue::PointerConstant(c) => write!(f, "({}) {c:#x}", self.typ()),
            ExprValue::Struct { values } => write!(f, "{{ {} }}", List(values)),
            ExprValue::Symbol { identifier } => write!(f, "{identifier}"),
            ExprValue::Typecast(e) => write!(f, "({}) {}", self.typ(), Operand(e)),
            ExprValue::Union { value, field } => write!(f, "{{ .{field}={value} }}"),
            ExprValue::UnOp { op, e } => write!(f, "{}{}", op.symbol(), Operand(e)),
            ExprValue::With { old, designator: WithDesignator::Index(i), new_value } => {
                write!(f, "{} WITH [{i}:={new_value}]", Operand(old))
            }
            ExprValue::With { old, designator: WithDesignator::Member(m), new_value } => {
                write!(f, "{} WITH [.{m}:={new_value}]", Operand(old))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::goto_program::{Expr, Type};

    #[test]
    fn print_nested_expressions() {
        let x = Expr::symbol_expression("x#0", Type::c_int());
        let c = Expr::symbol_expression("ssa::$cond#1", Type::bool());
        let e = c.ternary(x.clone().plus(Expr::int_constant(1, Type::c_int())), x);
        assert_eq!(e.to_string(), "ssa::$cond#1 ? (x#0 + 1) : x#0");
    }

    #[test]
    fn print_updates_and_implications() {
        let a = Expr::symbol_expression("a", Type::c_int().array_of(2));
        let zero = Expr::int_constant(0, Type::size_t());
        let w = a.with_index(zero, Expr::int_constant(7, Type::c_int()));
        assert_eq!(w.to_string(), "a WITH [0:=7]");
        let g = Expr::symbol_expression("g", Type::bool());
        assert_eq!(g.clone().implies(g.not()).to_string(), "g ==> (!g)");
        assert_eq!(Expr::pointer_constant(0, Type::void_pointer()).to_string(), "NULL");
    }
}
