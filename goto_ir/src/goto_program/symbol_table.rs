// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use super::typ::aggr_tag;
use super::{Symbol, Type};
use crate::InternedString;
use std::collections::BTreeMap;

/// The symbol table of a goto model: variables, functions and type definitions by name.
///
/// This is the resolution context the SSA construction needs: it follows struct and union tags
/// to their definitions and tells which variables have static lifetime.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbol_table: BTreeMap<InternedString, Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }
}

/// Setters
impl SymbolTable {
    pub fn insert(&mut self, symbol: Symbol) {
        tracing::trace!(name = %symbol.name, "insert symbol");
        self.symbol_table.insert(symbol.name, symbol);
    }
}

/// Getters
impl SymbolTable {
    pub fn contains(&self, name: InternedString) -> bool {
        self.symbol_table.contains_key(&name)
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, InternedString, Symbol> {
        self.symbol_table.iter()
    }

    pub fn len(&self) -> usize {
        self.symbol_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_table.is_empty()
    }

    pub fn lookup<T: Into<InternedString>>(&self, name: T) -> Option<&Symbol> {
        let name = name.into();
        self.symbol_table.get(&name)
    }

    /// Resolve a struct or union tag to its definition. Any other type, and tags without a
    /// definition, are returned as is.
    pub fn follow<'a>(&'a self, typ: &'a Type) -> &'a Type {
        match typ {
            Type::StructTag(tag) | Type::UnionTag(tag) => {
                self.lookup(aggr_tag(*tag)).map(|s| &s.typ).unwrap_or(typ)
            }
            _ => typ,
        }
    }
}

impl FromIterator<Symbol> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut st = SymbolTable::new();
        iter.into_iter().for_each(|s| st.insert(s));
        st
    }
}
