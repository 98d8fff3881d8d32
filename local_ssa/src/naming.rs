// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Versioned names.
//!
//! A version of object `o` is the symbol `o#<kind><n><suffix>`, where `<n>` is the number of
//! the defining location, `<kind>` is empty for the value a location produces, `phi` for a
//! merge, `lb` for the value flowing back into a loop and `ls` for the loop selector. The
//! value on function entry is `o#in<suffix>`. Loop selectors carry no suffix.
//!
//! Object identifiers never contain `#` and neither may the suffix, so the text after the last
//! `#` identifies the version.

use crate::domain::Def;
use crate::objects::{SsaObject, SSA_NAMESPACE};
use goto_ir::goto_program::{Expr, Loc, Type};
use goto_ir::InternedString;

pub const VERSION_SEPARATOR: char = '#';

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionKind {
    /// The value written at the location.
    Out,
    /// The merged value at a join.
    Phi,
    /// The value arriving at a loop header along the back edge from the location.
    LoopBack,
    /// Is the back edge from the location taken?
    LoopSelect,
}

impl VersionKind {
    fn tag(&self) -> &'static str {
        match self {
            VersionKind::Out => "",
            VersionKind::Phi => "phi",
            VersionKind::LoopBack => "lb",
            VersionKind::LoopSelect => "ls",
        }
    }
}

/// Does `identifier` name a version (or a placeholder derived from one) rather than a program
/// object?
pub fn is_versioned(identifier: InternedString) -> bool {
    identifier.map(|s| s.contains(VERSION_SEPARATOR))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SsaNaming {
    suffix: String,
}

impl SsaNaming {
    pub fn new<T: Into<String>>(suffix: T) -> Self {
        SsaNaming { suffix: suffix.into() }
    }

    pub fn name(&self, object: &SsaObject, kind: VersionKind, loc: Loc) -> Expr {
        let suffix = if kind == VersionKind::LoopSelect { "" } else { &self.suffix };
        let name = format!("{}{VERSION_SEPARATOR}{}{loc}{suffix}", object.identifier(), kind.tag());
        version(object, name)
    }

    pub fn name_input(&self, object: &SsaObject) -> Expr {
        let name = format!("{}{VERSION_SEPARATOR}in{}", object.identifier(), self.suffix);
        version(object, name)
    }

    /// The version a definition denotes.
    pub fn name_def(&self, object: &SsaObject, def: Def) -> Expr {
        match def {
            Def::Input => self.name_input(object),
            Def::Assignment(loc) => self.name(object, VersionKind::Out, loc),
            Def::Phi(loc) => self.name(object, VersionKind::Phi, loc),
        }
    }

    /// The `counter`-th nondeterministic value chosen at `loc`.
    pub fn nondet_symbol(&self, loc: Loc, counter: usize, typ: Type) -> Expr {
        Expr::nondet_symbol(format!("{SSA_NAMESPACE}nondet{loc}.{counter}{}", self.suffix), typ)
    }

    /// Unique among the side effects of one location and the instances of one function.
    pub fn side_effect_suffix(&self, loc: Loc, counter: usize) -> String {
        format!("{loc}.{counter}{}", self.suffix)
    }

    /// The value returned by the call at `loc`.
    pub fn return_value(&self, loc: Loc, typ: Type) -> Expr {
        Expr::symbol_expression(format!("{SSA_NAMESPACE}return_value{loc}{}", self.suffix), typ)
    }
}

fn version(object: &SsaObject, name: String) -> Expr {
    Expr::symbol_expression(name, object.typ().clone()).with_location(*object.expr().location())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use std::collections::BTreeSet;

    const KINDS: [VersionKind; 4] =
        [VersionKind::Out, VersionKind::Phi, VersionKind::LoopBack, VersionKind::LoopSelect];

    #[test]
    fn name_formats() {
        let naming = SsaNaming::new("%2");
        let x = SsaObject::new(&var("x", int()), &point_table()).unwrap();
        assert_eq!(naming.name(&x, VersionKind::Out, Loc::new(3)).to_string(), "x#3%2");
        assert_eq!(naming.name(&x, VersionKind::Phi, Loc::new(3)).to_string(), "x#phi3%2");
        assert_eq!(naming.name(&x, VersionKind::LoopBack, Loc::new(3)).to_string(), "x#lb3%2");
        assert_eq!(naming.name(&x, VersionKind::LoopSelect, Loc::new(3)).to_string(), "x#ls3");
        assert_eq!(naming.name_input(&x).to_string(), "x#in%2");
        assert_eq!(naming.name_def(&x, Def::Phi(Loc::new(1))).to_string(), "x#phi1%2");
        assert_eq!(naming.name_def(&x, Def::Input), naming.name_input(&x));
        assert_eq!(naming.name(&x, VersionKind::Out, Loc::new(3)).typ(), &int());
    }

    #[test]
    fn names_are_injective() {
        let st = point_table();
        let objects: Vec<SsaObject> = ["x", "x1", "p..x", "in", "ssa::$guard"]
            .iter()
            .map(|n| SsaObject::new(&var(n, int()), &st).unwrap())
            .collect();
        for suffix in ["", "1", "%1", "in"] {
            let naming = SsaNaming::new(suffix);
            let mut names = BTreeSet::new();
            let mut count = 0;
            for object in &objects {
                for kind in KINDS {
                    for loc in 0..25 {
                        names.insert(naming.name(object, kind, Loc::new(loc)).to_string());
                        count += 1;
                    }
                }
                names.insert(naming.name_input(object).to_string());
                count += 1;
            }
            assert_eq!(names.len(), count, "collision with suffix `{suffix}`");
        }
    }

    #[test]
    fn placeholders() {
        let naming = SsaNaming::new("");
        let n = naming.nondet_symbol(Loc::new(4), 2, int());
        assert_eq!(n.to_string(), "ssa::nondet4.2");
        assert_eq!(naming.side_effect_suffix(Loc::new(4), 3), "4.3");
        assert_eq!(naming.return_value(Loc::new(7), int()).to_string(), "ssa::return_value7");
        assert!(is_versioned("x#in".into()));
        assert!(!is_versioned("x".into()));
    }
}
