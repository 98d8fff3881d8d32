// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use self::Type::*;
use super::{Expr, SymbolTable};
use crate::cbmc_string::InternedString;
use serde::{Deserialize, Serialize};

///////////////////////////////////////////////////////////////////////////////////////////////
/// Datatypes
///////////////////////////////////////////////////////////////////////////////////////////////

/// Represents the different types that can be used in a goto-program.
/// The names are directly taken from the CBMC IrepIds.
/// In the examples below, `x` is used as a placeholder showing how the a variable of that
/// type would be declared.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum Type {
    /// `typ x[size]`. E.g. `unsigned int x[3]`
    Array { typ: Box<Type>, size: u64 },
    /// CBMC specific. `__CPROVER_bool x`. A single bit boolean
    Bool,
    /// `return_type x(parameters)`
    Code { parameters: Vec<Parameter>, return_type: Box<Type> },
    /// `typ _Complex x`
    Complex { typ: Box<Type> },
    /// `double`
    Double,
    /// `void`
    Empty,
    /// `float`
    Float,
    /// `typ*`
    Pointer { typ: Box<Type> },
    /// `int<width>_t`. e.g. `int32_t`
    Signedbv { width: u64 },
    /// `struct tag {component1.typ component1.name; component2.typ component2.name ... }`
    Struct { tag: InternedString, components: Vec<DatatypeComponent> },
    /// CBMC specific. A reference into the symbol table, where the tag is the name of the symbol.
    StructTag(InternedString),
    /// `union tag {component1.typ component1.name; component2.typ component2.name ... }`
    Union { tag: InternedString, components: Vec<DatatypeComponent> },
    /// CBMC specific. A reference into the symbol table, where the tag is the name of the symbol.
    UnionTag(InternedString),
    /// `uint<width>_t`. e.g. `uint32_t`
    Unsignedbv { width: u64 },
}

/// A field of a struct or union
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct DatatypeComponent {
    name: InternedString,
    typ: Type,
}

/// The formal parameters of a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    typ: Type,
    /// The unique identifier that refers to this symbol (qualified by function name, module, etc)
    identifier: Option<InternedString>,
}

/// The name of the symbol that defines the struct or union `tag`.
pub fn aggr_tag<T: Into<InternedString>>(tag: T) -> InternedString {
    let tag = tag.into();
    format!("tag-{tag}").into()
}

///////////////////////////////////////////////////////////////////////////////////////////////
/// Implementations
///////////////////////////////////////////////////////////////////////////////////////////////

impl DatatypeComponent {
    pub fn field<T: Into<InternedString>>(name: T, typ: Type) -> Self {
        DatatypeComponent { name: name.into(), typ }
    }

    pub fn name(&self) -> InternedString {
        self.name
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }
}

/// Parameters are equal regardless of the names given to them.
impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.typ == other.typ
    }
}

impl Parameter {
    pub fn new<T: Into<InternedString>>(identifier: Option<T>, typ: Type) -> Self {
        Parameter { typ, identifier: identifier.map(Into::into) }
    }

    pub fn identifier(&self) -> Option<InternedString> {
        self.identifier
    }

    pub fn typ(&self) -> &Type {
        &self.typ
    }
}

/// Getters
impl Type {
    /// The base type of this type, if one exists.
    /// `typ*` | `typ x[width]` | `typ _Complex` => `typ`
    pub fn base_type(&self) -> Option<&Type> {
        match self {
            Array { typ, .. } | Complex { typ } | Pointer { typ } => Some(typ),
            _ => None,
        }
    }

    /// The fields of a struct or union, following tags through the symbol table.
    pub fn lookup_components<'a>(&'a self, st: &'a SymbolTable) -> Option<&'a [DatatypeComponent]> {
        match st.follow(self) {
            Struct { components, .. } | Union { components, .. } => Some(components),
            _ => None,
        }
    }

    /// The type of the field `field` of a struct or union.
    pub fn lookup_field_type<T: Into<InternedString>>(
        &self,
        field: T,
        st: &SymbolTable,
    ) -> Option<Type> {
        let field = field.into();
        self.lookup_components(st)?.iter().find(|c| c.name == field).map(|c| c.typ.clone())
    }

    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Code { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<InternedString> {
        match self {
            Struct { tag, .. } | StructTag(tag) | Union { tag, .. } | UnionTag(tag) => Some(*tag),
            _ => None,
        }
    }

    pub fn width(&self) -> Option<u64> {
        match self {
            Signedbv { width } | Unsignedbv { width } => Some(*width),
            _ => None,
        }
    }
}

/// Predicates
impl Type {
    pub fn is_array(&self) -> bool {
        matches!(self, Array { .. })
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Bool)
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Code { .. })
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Complex { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Empty)
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, Double | Float)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Signedbv { .. } | Unsignedbv { .. })
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating_point()
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Pointer { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Struct { .. })
    }

    pub fn is_struct_tag(&self) -> bool {
        matches!(self, StructTag(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Union { .. })
    }

    pub fn is_union_tag(&self) -> bool {
        matches!(self, UnionTag(_))
    }

    /// Struct or union, either defined inline or referred to by tag.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Struct { .. } | StructTag(_) | Union { .. } | UnionTag(_))
    }
}

/// Constructors
impl Type {
    /// `typ x[size]`
    pub fn array_of(self, size: u64) -> Self {
        Array { typ: Box::new(self), size }
    }

    pub fn bool() -> Self {
        Bool
    }

    pub fn code(parameters: Vec<Parameter>, return_type: Type) -> Self {
        Code { parameters, return_type: Box::new(return_type) }
    }

    /// `typ _Complex`
    pub fn complex_of(self) -> Self {
        assert!(self.is_floating_point() || self.is_integer(), "Complex of {self:?}");
        Complex { typ: Box::new(self) }
    }

    pub fn double() -> Self {
        Double
    }

    pub fn empty() -> Self {
        Empty
    }

    pub fn float() -> Self {
        Float
    }

    pub fn signed_int(width: u64) -> Self {
        Signedbv { width }
    }

    pub fn unsigned_int(width: u64) -> Self {
        Unsignedbv { width }
    }

    /// `int` with 32 bits.
    pub fn c_int() -> Self {
        Signedbv { width: 32 }
    }

    pub fn size_t() -> Self {
        Unsignedbv { width: 64 }
    }

    pub fn struct_type<T: Into<InternedString>>(
        tag: T,
        components: Vec<DatatypeComponent>,
    ) -> Self {
        Struct { tag: tag.into(), components }
    }

    pub fn struct_tag<T: Into<InternedString>>(tag: T) -> Self {
        StructTag(tag.into())
    }

    pub fn union_type<T: Into<InternedString>>(tag: T, components: Vec<DatatypeComponent>) -> Self {
        Union { tag: tag.into(), components }
    }

    pub fn union_tag<T: Into<InternedString>>(tag: T) -> Self {
        UnionTag(tag.into())
    }

    /// `typ*`
    pub fn to_pointer(self) -> Self {
        Pointer { typ: Box::new(self) }
    }

    /// `void*`
    pub fn void_pointer() -> Self {
        Empty.to_pointer()
    }

    /// The tag type that refers to this struct or union definition.
    pub fn to_tag(&self) -> Option<Type> {
        match self {
            Struct { tag, .. } | StructTag(tag) => Some(StructTag(*tag)),
            Union { tag, .. } | UnionTag(tag) => Some(UnionTag(*tag)),
            _ => None,
        }
    }

    /// `0` of this type, for numeric and pointer types.
    pub fn zero(&self) -> Expr {
        match self {
            Signedbv { .. } | Unsignedbv { .. } => Expr::int_constant(0, self.clone()),
            Float => Expr::float_constant(0.0),
            Double => Expr::double_constant(0.0),
            Pointer { .. } => Expr::pointer_constant(0, self.clone()),
            Bool => Expr::bool_false(),
            _ => unreachable!("Can't convert {self:?} to a zero value"),
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Array { typ, size } => write!(f, "{typ}[{size}]"),
            Bool => write!(f, "bool"),
            Code { return_type, .. } => write!(f, "{return_type}()"),
            Complex { typ } => write!(f, "{typ} _Complex"),
            Double => write!(f, "double"),
            Empty => write!(f, "void"),
            Float => write!(f, "float"),
            Pointer { typ } => write!(f, "{typ}*"),
            Signedbv { width } => write!(f, "int{width}_t"),
            Struct { tag, .. } | StructTag(tag) => write!(f, "struct {tag}"),
            Union { tag, .. } | UnionTag(tag) => write!(f, "union {tag}"),
            Unsignedbv { width } => write!(f, "uint{width}_t"),
        }
    }
}
