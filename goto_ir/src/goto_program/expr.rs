// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// This file has a lot of function with names like "div"
#![allow(clippy::should_implement_trait)]

use self::BinaryOperator::*;
use self::ExprValue::*;
use self::UnaryOperator::*;
use super::{Location, SymbolTable, Type};
use crate::InternedString;
use num::bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// An `Expr` represents an expression type: i.e. a computation that returns a value.
/// Every expression has a type, a value, and a location (which may be `None`).
///
/// The fields of `Expr` are kept private, and there are no getters that return mutable references.
/// This means that the only way to create and update `Expr`s is using the constructors and setters.
/// In a few cases, there are properties, such as the existence of a field on a struct type,
/// which can only be checked given a symbol table.
///
/// In general, expressions are constructed in a "chained" style:
///     ` *(&x + i);` would translate to `x.address_of().plus(i).dereference()`
/// By default, these expressions have no location: to add a location, use the `.with_location()`
/// fluent builder to add locations when desired.
///
/// Rewriting passes take expressions apart with [Expr::try_map_operands], which rebuilds an
/// expression of the same kind, type and location from rewritten operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    value: Box<ExprValue>,
    typ: Type,
    #[serde(default)]
    location: Location,
}

/// The different kinds of values an expression can have.
/// The names are chosen to map directly onto the IrepID used by CBMC.
/// Each expression is described by reference to the corresponding C code that would generate it.
/// When an expression makes most sense in a broader statement context,
/// the characters >>> e <<< are used to mark the part described by the enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprValue {
    /// `&self`
    AddressOf(Expr),
    /// `typ x[] = >>> {elems0, elems1 ...} <<<`
    Array {
        elems: Vec<Expr>,
    },
    /// `lhs op rhs`.  E.g. `lhs + rhs` if `op == BinaryOperator::Plus`
    BinOp {
        op: BinaryOperator,
        lhs: Expr,
        rhs: Expr,
    },
    /// `(__CPROVER_bool) >>> true/false <<<`. True/False as a single bit boolean.
    BoolConstant(bool),
    /// Reinterpret the bytes of `e`, starting at `offset`, as a value of type self.typ.
    /// As an assignment target this is a byte-level aliased write into `e`.
    ByteExtract {
        e: Expr,
        offset: Expr,
        endianness: Endianness,
    },
    /// `real + imag * I`
    Complex {
        real: Expr,
        imag: Expr,
    },
    /// `__imag__ self`
    ComplexImag(Expr),
    /// `__real__ self`
    ComplexReal(Expr),
    /// `*self`
    Dereference(Expr),
    /// `1.0`
    DoubleConstant(f64),
    /// `1.0f`
    FloatConstant(f32),
    /// IEEE arithmetic with an explicit rounding mode.
    FloatbvBinOp {
        op: BinaryOperator,
        lhs: Expr,
        rhs: Expr,
        rounding_mode: Expr,
    },
    /// `(typ) self` between floating point (or integer and floating point) types, with an
    /// explicit rounding mode.
    FloatbvTypecast {
        e: Expr,
        rounding_mode: Expr,
    },
    /// `function(arguments)`
    FunctionCall {
        function: Expr,
        arguments: Vec<Expr>,
    },
    /// `c ? t : e`
    If {
        c: Expr,
        t: Expr,
        e: Expr,
    },
    /// `array[index]`
    Index {
        array: Expr,
        index: Expr,
    },
    /// `123`
    IntConstant(BigInt),
    /// `malloc(size)`
    Malloc {
        size: Expr,
    },
    /// `lhs.field`
    Member {
        lhs: Expr,
        field: InternedString,
    },
    /// `__nondet()`
    Nondet,
    /// A placeholder that stands for a nondeterministic value. Unlike `Nondet` this has no side
    /// effect: two occurrences of the same identifier denote the same value.
    NondetSymbol {
        identifier: InternedString,
    },
    /// `NULL`
    PointerConstant(u64),
    /// Struct initializer
    /// `struct foo the_foo = >>> {field1, field2, ... } <<<`
    Struct {
        values: Vec<Expr>,
    },
    /// `self`
    Symbol {
        identifier: InternedString,
    },
    /// `(typ) self`. Target type is in the outer `Expr` struct.
    Typecast(Expr),
    /// Union initializer
    /// `union foo the_foo = >>> {.field = value } <<<`
    Union {
        value: Expr,
        field: InternedString,
    },
    // `op self` eg `! self` if `op == UnaryOperator::Not`
    UnOp {
        op: UnaryOperator,
        e: Expr,
    },
    /// Functional update: `old` with the element or member named by `designator` replaced by
    /// `new_value`.
    With {
        old: Expr,
        designator: WithDesignator,
        new_value: Expr,
    },
}

/// Binary operators. The names are the same as in the Irep representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    And,
    Ashr,
    Bitand,
    Bitor,
    Bitxor,
    Div,
    Equal,
    Ge,
    Gt,
    Implies,
    Le,
    Lshr,
    Lt,
    Minus,
    Mod,
    Mult,
    Notequal,
    Or,
    Plus,
    Shl,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// `~self`
    Bitnot,
    /// `!self`
    Not,
    /// `-self`
    UnaryMinus,
}

/// Byte order of a byte extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endianness {
    Little,
    Big,
}

/// What a `With` expression updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WithDesignator {
    /// `old WITH [index := new_value]`
    Index(Expr),
    /// `old WITH [.field := new_value]`
    Member(InternedString),
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

/// Getters
impl Expr {
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }

    pub fn value(&self) -> &ExprValue {
        &self.value
    }

    /// The identifier of a `Symbol` or `NondetSymbol`.
    pub fn identifier(&self) -> Option<InternedString> {
        match &*self.value {
            Symbol { identifier } | NondetSymbol { identifier } => Some(*identifier),
            _ => None,
        }
    }

    /// The direct sub-expressions, in evaluation order.
    pub fn operands(&self) -> Vec<&Expr> {
        match &*self.value {
            AddressOf(e) | ComplexImag(e) | ComplexReal(e) | Dereference(e) | Typecast(e) => {
                vec![e]
            }
            Array { elems } | Struct { values: elems } => elems.iter().collect(),
            BinOp { lhs, rhs, .. } => vec![lhs, rhs],
            ByteExtract { e, offset, .. } => vec![e, offset],
            Complex { real, imag } => vec![real, imag],
            FloatbvBinOp { lhs, rhs, rounding_mode, .. } => vec![lhs, rhs, rounding_mode],
            FloatbvTypecast { e, rounding_mode } => vec![e, rounding_mode],
            FunctionCall { function, arguments } => {
                std::iter::once(function).chain(arguments.iter()).collect()
            }
            If { c, t, e } => vec![c, t, e],
            Index { array, index } => vec![array, index],
            Malloc { size } => vec![size],
            Member { lhs, .. } => vec![lhs],
            Union { value, .. } => vec![value],
            UnOp { e, .. } => vec![e],
            With { old, designator: WithDesignator::Index(index), new_value } => {
                vec![old, index, new_value]
            }
            With { old, designator: WithDesignator::Member(_), new_value } => vec![old, new_value],
            BoolConstant(_)
            | DoubleConstant(_)
            | FloatConstant(_)
            | IntConstant(_)
            | Nondet
            | NondetSymbol { .. }
            | PointerConstant(_)
            | Symbol { .. } => vec![],
        }
    }
}

/// Predicates
impl Expr {
    pub fn is_int_constant(&self) -> bool {
        matches!(*self.value, IntConstant(_))
    }

    pub fn is_true(&self) -> bool {
        matches!(*self.value, BoolConstant(true))
    }

    pub fn is_false(&self) -> bool {
        matches!(*self.value, BoolConstant(false))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(*self.value, Symbol { .. })
    }

    pub fn is_dereference(&self) -> bool {
        matches!(*self.value, Dereference(_))
    }

    /// Is this expression itself a side effect (not counting its operands)?
    pub fn is_side_effect_root(&self) -> bool {
        matches!(*self.value, FunctionCall { .. } | Malloc { .. } | Nondet)
    }

    /// Returns whether an expression causes side effects or not
    pub fn is_side_effect(&self) -> bool {
        self.is_side_effect_root() || self.operands().into_iter().any(Expr::is_side_effect)
    }

    /// Does a dereference occur anywhere in this expression?
    pub fn has_dereference(&self) -> bool {
        self.is_dereference() || self.operands().into_iter().any(Expr::has_dereference)
    }

    pub fn can_take_address_of(&self) -> bool {
        matches!(
            *self.value,
            Dereference(_) | If { .. } | Index { .. } | Member { .. } | Symbol { .. }
        )
    }
}

/// Setters
impl Expr {
    pub fn with_location(mut self, loc: Location) -> Self {
        self.location = loc;
        self
    }
}

/// Private constructor. Making this a macro allows multiple reference to self in the same call.
macro_rules! expr {
    ( $value:expr,  $typ:expr) => {{
        let typ = $typ;
        let value = Box::new($value);
        Expr { value, typ, location: Location::none() }
    }};
}

/// Operand traversal
impl Expr {
    /// Rebuild this expression with every direct operand replaced by `f(operand)`.
    /// The kind, type and location of the expression are kept; operands are visited in the
    /// order returned by [Expr::operands].
    pub fn try_map_operands<E, F>(self, mut f: F) -> Result<Expr, E>
    where
        F: FnMut(Expr) -> Result<Expr, E>,
    {
        let Expr { value, typ, location } = self;
        let value = match *value {
            AddressOf(e) => AddressOf(f(e)?),
            Array { elems } => {
                Array { elems: elems.into_iter().map(&mut f).collect::<Result<_, _>>()? }
            }
            BinOp { op, lhs, rhs } => {
                let lhs = f(lhs)?;
                BinOp { op, lhs, rhs: f(rhs)? }
            }
            ByteExtract { e, offset, endianness } => {
                let e = f(e)?;
                ByteExtract { e, offset: f(offset)?, endianness }
            }
            Complex { real, imag } => {
                let real = f(real)?;
                Complex { real, imag: f(imag)? }
            }
            ComplexImag(e) => ComplexImag(f(e)?),
            ComplexReal(e) => ComplexReal(f(e)?),
            Dereference(e) => Dereference(f(e)?),
            FloatbvBinOp { op, lhs, rhs, rounding_mode } => {
                let lhs = f(lhs)?;
                let rhs = f(rhs)?;
                FloatbvBinOp { op, lhs, rhs, rounding_mode: f(rounding_mode)? }
            }
            FloatbvTypecast { e, rounding_mode } => {
                let e = f(e)?;
                FloatbvTypecast { e, rounding_mode: f(rounding_mode)? }
            }
            FunctionCall { function, arguments } => {
                let function = f(function)?;
                let arguments = arguments.into_iter().map(&mut f).collect::<Result<_, _>>()?;
                FunctionCall { function, arguments }
            }
            If { c, t, e } => {
                let c = f(c)?;
                let t = f(t)?;
                If { c, t, e: f(e)? }
            }
            Index { array, index } => {
                let array = f(array)?;
                Index { array, index: f(index)? }
            }
            Malloc { size } => Malloc { size: f(size)? },
            Member { lhs, field } => Member { lhs: f(lhs)?, field },
            Struct { values } => {
                Struct { values: values.into_iter().map(&mut f).collect::<Result<_, _>>()? }
            }
            Typecast(e) => Typecast(f(e)?),
            Union { value, field } => Union { value: f(value)?, field },
            UnOp { op, e } => UnOp { op, e: f(e)? },
            With { old, designator, new_value } => {
                let old = f(old)?;
                let designator = match designator {
                    WithDesignator::Index(index) => WithDesignator::Index(f(index)?),
                    member @ WithDesignator::Member(_) => member,
                };
                With { old, designator, new_value: f(new_value)? }
            }
            leaf @ (BoolConstant(_)
            | DoubleConstant(_)
            | FloatConstant(_)
            | IntConstant(_)
            | Nondet
            | NondetSymbol { .. }
            | PointerConstant(_)
            | Symbol { .. }) => leaf,
        };
        Ok(Expr { value: Box::new(value), typ, location })
    }

    /// Infallible version of [Expr::try_map_operands].
    pub fn map_operands<F>(self, mut f: F) -> Expr
    where
        F: FnMut(Expr) -> Expr,
    {
        match self.try_map_operands::<Infallible, _>(|e| Ok(f(e))) {
            Ok(e) => e,
            Err(never) => match never {},
        }
    }
}

/// Constructors for the main types
impl Expr {
    /// `&self`
    pub fn address_of(self) -> Self {
        assert!(self.can_take_address_of(), "Can't take address of {self:?}");
        expr!(AddressOf(self), self.typ.clone().to_pointer())
    }

    /// `(__CPROVER_bool) >>> true/false <<<`. True/False as a single bit boolean.
    pub fn bool_constant(c: bool) -> Self {
        expr!(BoolConstant(c), Type::bool())
    }

    /// `(__CPROVER_bool) false`. False as a single bit boolean.
    pub fn bool_false() -> Self {
        Expr::bool_constant(false)
    }

    /// `(__CPROVER_bool) true`. True as a single bit boolean.
    pub fn bool_true() -> Self {
        Expr::bool_constant(true)
    }

    /// Reinterpret the bytes of `self` starting at `offset` as a `typ`.
    pub fn byte_extract(self, offset: Expr, endianness: Endianness, typ: Type) -> Self {
        assert!(offset.typ.is_integer(), "Byte offset must be an integer: {offset:?}");
        expr!(ByteExtract { e: self, offset, endianness }, typ)
    }

    /// `(typ) self`.
    pub fn cast_to(self, typ: Type) -> Self {
        if self.typ == typ { self } else { expr!(Typecast(self), typ) }
    }

    /// `real + imag * I`
    pub fn complex(real: Expr, imag: Expr, typ: Type) -> Self {
        assert!(typ.is_complex(), "Complex value of non-complex type {typ:?}");
        assert_eq!(Some(real.typ()), typ.base_type());
        assert_eq!(real.typ, imag.typ);
        expr!(Complex { real, imag }, typ)
    }

    /// `__real__ self`
    pub fn complex_real(self) -> Self {
        let typ = self.typ.base_type().filter(|_| self.typ.is_complex()).cloned();
        let typ = typ.unwrap_or_else(|| panic!("__real__ of non-complex {self:?}"));
        expr!(ComplexReal(self), typ)
    }

    /// `__imag__ self`
    pub fn complex_imag(self) -> Self {
        let typ = self.typ.base_type().filter(|_| self.typ.is_complex()).cloned();
        let typ = typ.unwrap_or_else(|| panic!("__imag__ of non-complex {self:?}"));
        expr!(ComplexImag(self), typ)
    }

    /// *self: t
    pub fn dereference(self) -> Self {
        assert!(self.typ.is_pointer(), "Dereference of non-pointer {self:?}");
        expr!(Dereference(self), self.typ.base_type().unwrap().clone())
    }

    /// `1.0`
    pub fn double_constant(c: f64) -> Self {
        expr!(DoubleConstant(c), Type::double())
    }

    /// `1.0f`
    pub fn float_constant(c: f32) -> Self {
        expr!(FloatConstant(c), Type::float())
    }

    /// IEEE `self op rhs` under `rounding_mode`.
    pub fn floatbv_binop(self, op: BinaryOperator, rhs: Expr, rounding_mode: Expr) -> Self {
        assert!(matches!(op, Plus | Minus | Mult | Div), "Not a floatbv operation: {op:?}");
        assert!(self.typ.is_floating_point() && self.typ == rhs.typ);
        let typ = self.typ.clone();
        expr!(FloatbvBinOp { op, lhs: self, rhs, rounding_mode }, typ)
    }

    /// `(typ) self` under `rounding_mode`.
    pub fn floatbv_typecast(self, typ: Type, rounding_mode: Expr) -> Self {
        expr!(FloatbvTypecast { e: self, rounding_mode }, typ)
    }

    /// `function(arguments)` in expression context. This is a side effect.
    pub fn call(self, arguments: Vec<Expr>) -> Self {
        let typ = self
            .typ
            .return_type()
            .cloned()
            .unwrap_or_else(|| panic!("Call of non-function {self:?}"));
        expr!(FunctionCall { function: self, arguments }, typ)
    }

    /// `self[index]`
    pub fn index(self, index: Expr) -> Self {
        assert!(index.typ.is_integer(), "Index must be an integer: {index:?}");
        assert!(self.typ.is_array(), "Can't index {self:?}");
        let typ = self.typ().base_type().unwrap().clone();
        expr!(Index { array: self, index }, typ)
    }

    /// `123`
    pub fn int_constant<T>(i: T, typ: Type) -> Self
    where
        T: Into<BigInt>,
    {
        assert!(typ.is_integer(), "Integer constant of type {typ:?}");
        expr!(IntConstant(i.into()), typ)
    }

    /// `(typ*) malloc(size)`
    pub fn malloc(size: Expr, typ: Type) -> Self {
        assert!(typ.is_pointer(), "malloc must return a pointer, not {typ:?}");
        expr!(Malloc { size }, typ)
    }

    /// `self.field`
    pub fn member<T>(self, field: T, symbol_table: &SymbolTable) -> Self
    where
        T: Into<InternedString>,
    {
        let field: InternedString = field.into();
        assert!(
            self.typ.is_aggregate(),
            "Can't apply .member operation to\n\t{self:?}\n\t{field}",
        );
        if let Some(ty) = self.typ.lookup_field_type(field, symbol_table) {
            expr!(Member { lhs: self, field }, ty)
        } else {
            unreachable!("unable to find field {} for type {:?}", field, self.typ())
        }
    }

    /// `__nondet_typ()`
    pub fn nondet(typ: Type) -> Self {
        expr!(Nondet, typ)
    }

    /// A side-effect free placeholder for a nondeterministic value.
    pub fn nondet_symbol<T: Into<InternedString>>(identifier: T, typ: Type) -> Self {
        expr!(NondetSymbol { identifier: identifier.into() }, typ)
    }

    /// `e.g. NULL`
    pub fn pointer_constant(c: u64, typ: Type) -> Self {
        assert!(typ.is_pointer());
        expr!(PointerConstant(c), typ)
    }

    /// Struct initializer
    /// `struct foo the_foo = >>> {field1, field2, ... } <<<`
    pub fn struct_expr_from_values(
        typ: Type,
        values: Vec<Expr>,
        symbol_table: &SymbolTable,
    ) -> Self {
        let components = typ
            .lookup_components(symbol_table)
            .filter(|_| symbol_table.follow(&typ).is_struct())
            .unwrap_or_else(|| panic!("Struct initializer of non-struct type {typ:?}"));
        assert_eq!(components.len(), values.len(), "Wrong number of fields for {typ:?}");
        assert!(
            components.iter().zip(values.iter()).all(|(c, v)| c.typ() == v.typ()),
            "Struct field types don't match: \n{typ:?}\n{values:?}"
        );
        let typ = typ.to_tag().unwrap();
        expr!(Struct { values }, typ)
    }

    /// `identifier`
    pub fn symbol_expression<T: Into<InternedString>>(identifier: T, typ: Type) -> Self {
        let identifier = identifier.into();
        expr!(Symbol { identifier }, typ)
    }

    /// `self ? t : e`
    pub fn ternary(self, t: Expr, e: Expr) -> Expr {
        assert!(self.typ.is_bool(), "Condition must be boolean: {self:?}");
        assert_eq!(t.typ, e.typ, "Branches of a conditional must have the same type");
        let typ = t.typ.clone();
        expr!(If { c: self, t, e }, typ)
    }

    /// Union initializer
    /// `union foo the_foo = >>> {.field = value } <<<`
    pub fn union_expr<T: Into<InternedString>>(
        typ: Type,
        field: T,
        value: Expr,
        symbol_table: &SymbolTable,
    ) -> Self {
        let field = field.into();
        assert!(typ.is_union_tag() || typ.is_union());
        assert_eq!(typ.lookup_field_type(field, symbol_table).as_ref(), Some(value.typ()));
        let typ = typ.to_tag().unwrap();
        expr!(Union { value, field }, typ)
    }

    /// `self WITH [index := value]`
    pub fn with_index(self, index: Expr, value: Expr) -> Self {
        assert!(self.typ.is_array(), "Indexed update of non-array {self:?}");
        let typ = self.typ.clone();
        expr!(With { old: self, designator: WithDesignator::Index(index), new_value: value }, typ)
    }

    /// `self WITH [.field := value]`
    pub fn with_member<T: Into<InternedString>>(self, field: T, value: Expr) -> Self {
        assert!(self.typ.is_aggregate(), "Member update of non-aggregate {self:?}");
        let typ = self.typ.clone();
        let designator = WithDesignator::Member(field.into());
        expr!(With { old: self, designator, new_value: value }, typ)
    }
}

/// Constructors for Binary Operations
impl Expr {
    fn typecheck_binop_args(op: BinaryOperator, lhs: &Expr, rhs: &Expr) -> bool {
        match op {
            // Arithmetic which can include pointers
            Minus | Plus => {
                (lhs.typ == rhs.typ && lhs.typ.is_numeric())
                    || (lhs.typ.is_pointer() && rhs.typ.is_integer())
            }
            // Arithmetic
            Div | Mod | Mult => lhs.typ == rhs.typ && lhs.typ.is_numeric(),
            // Bitshifts
            Ashr | Lshr | Shl => lhs.typ.is_integer() && rhs.typ.is_integer(),
            // Boolean ops
            And | Implies | Or | Xor => lhs.typ.is_bool() && rhs.typ.is_bool(),
            // Bitwise ops
            Bitand | Bitor | Bitxor => lhs.typ == rhs.typ && lhs.typ.is_integer(),
            // Comparisons
            Ge | Gt | Le | Lt => {
                lhs.typ == rhs.typ && (lhs.typ.is_numeric() || lhs.typ.is_pointer())
            }
            // Equalities are used between values of any type in SSA equations
            Equal | Notequal => lhs.typ == rhs.typ,
        }
    }

    fn binop_return_type(op: BinaryOperator, lhs: &Expr) -> Type {
        match op {
            Div | Minus | Mod | Mult | Plus => lhs.typ.clone(),
            Ashr | Lshr | Shl => lhs.typ.clone(),
            Bitand | Bitor | Bitxor => lhs.typ.clone(),
            And | Implies | Or | Xor => Type::bool(),
            Ge | Gt | Le | Lt | Equal | Notequal => Type::bool(),
        }
    }

    /// self op right;
    pub fn binop(self, op: BinaryOperator, rhs: Expr) -> Expr {
        assert!(
            Expr::typecheck_binop_args(op, &self, &rhs),
            "BinaryOperation Expression does not typecheck {op:?} {self:?} {rhs:?}"
        );
        let typ = Expr::binop_return_type(op, &self);
        expr!(BinOp { op, lhs: self, rhs }, typ)
    }

    /// `self / e`
    pub fn div(self, e: Expr) -> Expr {
        self.binop(Div, e)
    }

    /// `self && e`
    pub fn and(self, e: Expr) -> Expr {
        self.binop(And, e)
    }

    /// `self ==> e`;
    pub fn implies(self, e: Expr) -> Expr {
        self.binop(Implies, e)
    }

    /// `self || e`
    pub fn or(self, e: Expr) -> Expr {
        self.binop(Or, e)
    }

    /// `self + e`
    pub fn plus(self, e: Expr) -> Expr {
        self.binop(Plus, e)
    }

    /// `self - e`
    pub fn sub(self, e: Expr) -> Expr {
        self.binop(Minus, e)
    }

    /// self * e
    pub fn mul(self, e: Expr) -> Expr {
        self.binop(Mult, e)
    }

    /// self <= e
    pub fn le(self, e: Expr) -> Expr {
        self.binop(Le, e)
    }

    /// self < e
    pub fn lt(self, e: Expr) -> Expr {
        self.binop(Lt, e)
    }

    /// self >= e
    pub fn ge(self, e: Expr) -> Expr {
        self.binop(Ge, e)
    }

    /// self > e
    pub fn gt(self, e: Expr) -> Expr {
        self.binop(Gt, e)
    }

    /// self == e
    pub fn eq(self, e: Expr) -> Expr {
        self.binop(Equal, e)
    }

    /// self != e
    pub fn neq(self, e: Expr) -> Expr {
        self.binop(Notequal, e)
    }
}

/// Constructors for unary operators
impl Expr {
    fn typecheck_unop_arg(op: UnaryOperator, arg: &Expr) -> bool {
        match op {
            Bitnot => arg.typ.is_integer(),
            Not => arg.typ.is_bool(),
            UnaryMinus => arg.typ().is_numeric(),
        }
    }

    /// Private helper function to make unary operators
    fn unop(self, op: UnaryOperator) -> Expr {
        assert!(Expr::typecheck_unop_arg(op, &self), "{op:?} does not typecheck {self:?}");
        let typ = self.typ.clone();
        expr!(ExprValue::UnOp { op, e: self }, typ)
    }

    /// `!self`
    pub fn not(self) -> Expr {
        self.unop(Not)
    }
}

/// Boolean formula helpers
impl Expr {
    /// `!self`, folding constants and double negation.
    pub fn boolean_negate(self) -> Expr {
        match &*self.value {
            BoolConstant(b) => Expr::bool_constant(!b).with_location(self.location),
            UnOp { op: Not, e } => e.clone(),
            _ => self.not(),
        }
    }

    /// `ops[0] && ops[1] && ...`; `true` when there are no operands.
    pub fn conjunction(ops: Vec<Expr>) -> Expr {
        ops.into_iter().reduce(Expr::and).unwrap_or_else(Expr::bool_true)
    }

    /// `ops[0] || ops[1] || ...`; `false` when there are no operands.
    pub fn disjunction(ops: Vec<Expr>) -> Expr {
        ops.into_iter().reduce(Expr::or).unwrap_or_else(Expr::bool_false)
    }
}
