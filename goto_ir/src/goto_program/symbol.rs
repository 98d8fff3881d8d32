// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use super::typ::aggr_tag;
use super::{Expr, Location, Type};
use crate::{InternStringOption, InternedString};
use serde::{Deserialize, Serialize};

/// Based off the CBMC symbol implementation here:
/// <https://github.com/diffblue/cbmc/blob/develop/src/util/symbol.h>
///
/// Only the properties that the SSA construction consults are kept.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique identifier. Mangled name from compiler `foo12_bar17_x@1`
    pub name: InternedString,
    #[serde(default)]
    pub location: Location,
    pub typ: Type,

    /// Local name `x`
    #[serde(default)]
    pub base_name: Option<InternedString>,
    /// Type definitions (`tag-foo`) are symbols too.
    #[serde(default)]
    pub is_type: bool,
    #[serde(default)]
    pub is_parameter: bool,
    /// Globals and function-local statics.
    #[serde(default)]
    pub is_static_lifetime: bool,
}

/// Constructors
impl Symbol {
    fn new<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        location: Location,
        typ: Type,
        base_name: Option<U>,
    ) -> Self {
        Symbol {
            name: name.into(),
            location,
            typ,
            base_name: base_name.intern(),
            is_type: false,
            is_parameter: false,
            is_static_lifetime: false,
        }
    }

    /// A local variable.
    pub fn variable<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        base_name: U,
        typ: Type,
        location: Location,
    ) -> Self {
        Symbol::new(name, location, typ, Some(base_name))
    }

    /// A global (or function-local static) variable.
    pub fn static_variable<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        base_name: U,
        typ: Type,
        location: Location,
    ) -> Self {
        Symbol::variable(name, base_name, typ, location).with_is_static_lifetime(true)
    }

    /// A formal parameter of a function.
    pub fn parameter<T: Into<InternedString>, U: Into<InternedString>>(
        name: T,
        base_name: U,
        typ: Type,
        location: Location,
    ) -> Self {
        Symbol::variable(name, base_name, typ, location).with_is_parameter(true)
    }

    pub fn function<T: Into<InternedString>>(name: T, typ: Type, location: Location) -> Self {
        assert!(typ.is_code(), "Function symbol with non-code type {typ:?}");
        Symbol::new(name, location, typ, None::<InternedString>).with_is_static_lifetime(true)
    }

    /// The definition of a struct or union type, named `tag-<tag>`.
    pub fn aggregate_type(typ: Type) -> Self {
        assert!(typ.is_struct() || typ.is_union(), "Not a type definition {typ:?}");
        let tag = typ.tag().unwrap();
        let mut sym = Symbol::new(aggr_tag(tag), Location::none(), typ, Some(tag));
        sym.is_type = true;
        sym
    }
}

/// Setters
impl Symbol {
    pub fn with_is_static_lifetime(mut self, v: bool) -> Self {
        self.is_static_lifetime = v;
        self
    }

    pub fn with_is_parameter(mut self, v: bool) -> Self {
        self.is_parameter = v;
        self
    }

    pub fn with_location(mut self, loc: Location) -> Self {
        self.location = loc;
        self
    }
}

/// Conversions
impl Symbol {
    /// `self`, as an expression. Aggregates are referred to by their tag type.
    pub fn to_expr(&self) -> Expr {
        let typ = self.typ.to_tag().unwrap_or_else(|| self.typ.clone());
        Expr::symbol_expression(self.name, typ).with_location(self.location)
    }
}
