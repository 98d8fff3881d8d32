// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The memory objects whose values the SSA form tracks.

use crate::dereference::AliasResolver;
use crate::error::Result;
use fxhash::FxHashMap;
use goto_ir::goto_program::{Expr, ExprValue, GotoProgram, SymbolTable, Type};
use goto_ir::InternedString;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Identifiers in this namespace are generated by the SSA construction itself (placeholders for
/// nondeterministic values, return values, guards, ...). They are never tracked.
pub const SSA_NAMESPACE: &str = "ssa::";

/// Separates a struct object from its members in member object identifiers: `s..f`.
const MEMBER_SEPARATOR: &str = "..";

/// An addressable memory location with a stable identifier: a symbol, or a chain of struct
/// member accesses on a symbol.
///
/// Objects compare by identifier only.
#[derive(Clone, Debug)]
pub struct SsaObject {
    expr: Expr,
    identifier: InternedString,
}

impl SsaObject {
    /// The object `expr` denotes, if any. Index expressions, dereferences, union members and
    /// conditionals do not denote objects; arrays, unions and complex values are atomic.
    pub fn new(expr: &Expr, symbol_table: &SymbolTable) -> Option<SsaObject> {
        object_identifier(expr, symbol_table)
            .map(|identifier| SsaObject { expr: expr.clone(), identifier })
    }

    /// One of the construction's own objects, `ssa::<name>`.
    pub(crate) fn reserved(name: &str, typ: Type) -> SsaObject {
        let identifier: InternedString = format!("{SSA_NAMESPACE}{name}").into();
        SsaObject { expr: Expr::symbol_expression(identifier, typ), identifier }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn identifier(&self) -> InternedString {
        self.identifier
    }

    pub fn typ(&self) -> &Type {
        self.expr.typ()
    }

    /// Is this one of the symbols generated by the SSA construction?
    pub fn is_placeholder(&self) -> bool {
        self.identifier.starts_with(SSA_NAMESPACE)
    }
}

fn object_identifier(expr: &Expr, symbol_table: &SymbolTable) -> Option<InternedString> {
    match expr.value() {
        ExprValue::Symbol { identifier } if !expr.typ().is_code() => Some(*identifier),
        ExprValue::Member { lhs, field } if symbol_table.follow(lhs.typ()).is_struct() => {
            let base = object_identifier(lhs, symbol_table)?;
            Some(format!("{base}{MEMBER_SEPARATOR}{field}").into())
        }
        _ => None,
    }
}

impl PartialEq for SsaObject {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for SsaObject {}

impl PartialOrd for SsaObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SsaObject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifier.cmp(&other.identifier)
    }
}

/// Index of an object in its [SsaObjects] set.
pub type ObjectIndex = usize;

/// The fixed set of objects tracked for one function, in identifier order.
#[derive(Clone, Debug, Default)]
pub struct SsaObjects {
    objects: Vec<SsaObject>,
    index: FxHashMap<InternedString, ObjectIndex>,
}

impl SsaObjects {
    /// Collect every object that appears in `program` once dereferences are resolved.
    /// Struct-typed objects are replaced by their leaf members.
    pub fn collect(
        program: &GotoProgram,
        symbol_table: &SymbolTable,
        resolver: &dyn AliasResolver,
    ) -> Result<SsaObjects> {
        let mut found = BTreeMap::new();
        for (loc, instruction) in program.iter() {
            for expr in instruction.expressions() {
                let resolved = resolver.resolve(expr.clone(), loc, symbol_table)?;
                collect_rec(&resolved, symbol_table, &mut found);
            }
        }
        let objects = SsaObjects::from_objects(found.into_values());
        debug!(objects = objects.len(), "collected SSA objects");
        Ok(objects)
    }

    pub fn from_objects<I: IntoIterator<Item = SsaObject>>(objects: I) -> SsaObjects {
        let mut objects: Vec<SsaObject> = objects.into_iter().collect();
        objects.sort();
        objects.dedup();
        let index = objects.iter().enumerate().map(|(i, o)| (o.identifier, i)).collect();
        SsaObjects { objects, index }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SsaObject> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, index: ObjectIndex) -> &SsaObject {
        &self.objects[index]
    }

    pub fn index_of(&self, identifier: InternedString) -> Option<ObjectIndex> {
        self.index.get(&identifier).copied()
    }

    pub fn contains(&self, object: &SsaObject) -> bool {
        self.index.contains_key(&object.identifier)
    }
}

fn collect_rec(
    expr: &Expr,
    symbol_table: &SymbolTable,
    found: &mut BTreeMap<InternedString, SsaObject>,
) {
    if let Some(object) = SsaObject::new(expr, symbol_table) {
        if !object.is_placeholder() {
            for leaf in leaves(object, symbol_table) {
                found.entry(leaf.identifier).or_insert(leaf);
            }
        }
    }
    for op in expr.operands() {
        collect_rec(op, symbol_table, found);
    }
}

/// The non-struct objects making up `object`: itself, or its members, recursively.
pub fn leaves(object: SsaObject, symbol_table: &SymbolTable) -> Vec<SsaObject> {
    match symbol_table.follow(object.typ()) {
        Type::Struct { components, .. } => components
            .iter()
            .flat_map(|c| {
                let member = object.expr.clone().member(c.name(), symbol_table);
                SsaObject::new(&member, symbol_table)
                    .map(|m| leaves(m, symbol_table))
                    .unwrap_or_default()
            })
            .collect(),
        _ => vec![object],
    }
}

/// Does the value `expr` refers to outlive the function? Anything behind a pointer might.
pub fn has_static_lifetime(expr: &Expr, symbol_table: &SymbolTable) -> bool {
    match expr.value() {
        ExprValue::Dereference(_) => true,
        ExprValue::Index { array, .. } => has_static_lifetime(array, symbol_table),
        ExprValue::Member { lhs, .. } => has_static_lifetime(lhs, symbol_table),
        ExprValue::Symbol { identifier } => {
            symbol_table.lookup(*identifier).is_some_and(|s| s.is_static_lifetime)
        }
        _ => false,
    }
}
