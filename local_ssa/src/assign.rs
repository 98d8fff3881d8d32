// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposition of assignment targets.
//!
//! An assignment to anything but a tracked object is rewritten into an assignment of a whole
//! object: `a[i] = v` assigns `a WITH [i:=v]` to `a`, `s.f = v` assigns `s WITH [.f:=v]` to `s`,
//! and so on until the target is an object. Struct objects are split into their members.

use crate::error::{Result, SsaError};
use crate::local_ssa::LocalSsa;
use crate::naming::VersionKind;
use crate::objects::SsaObject;
use goto_ir::goto_program::{Expr, ExprValue, Loc, Type};
use tracing::trace;

impl LocalSsa<'_> {
    /// Push the equalities for `lhs = rhs` at `loc` onto `equalities`. The assignment only
    /// happens if `guard` holds; both `guard` and `rhs` are read at `loc`.
    pub(crate) fn assign_rec(
        &self,
        lhs: &Expr,
        rhs: Expr,
        guard: Expr,
        loc: Loc,
        equalities: &mut Vec<Expr>,
    ) -> Result<()> {
        let st = self.symbol_table;
        if let Some(object) = SsaObject::new(lhs, st) {
            if let Type::Struct { components, .. } = st.follow(lhs.typ()) {
                if let ExprValue::Struct { values } = rhs.value() {
                    if values.len() != components.len() {
                        return Err(SsaError::MalformedProgram(format!(
                            "struct literal with {} values assigned to `{lhs}` of type `{}` \
                             with {} components at location {loc}",
                            values.len(),
                            lhs.typ(),
                            components.len(),
                        )));
                    }
                }
                for (i, component) in components.iter().enumerate() {
                    let member_lhs = lhs.clone().member(component.name(), st);
                    let member_rhs = match rhs.value() {
                        ExprValue::Struct { values } => values[i].clone(),
                        _ => rhs.clone().member(component.name(), st),
                    };
                    self.assign_rec(&member_lhs, member_rhs, guard.clone(), loc, equalities)?;
                }
                return Ok(());
            }
            return self.assign_object(&object, rhs, guard, loc, equalities);
        }

        match lhs.value() {
            ExprValue::Index { array, index } => {
                let update = array.clone().with_index(index.clone(), rhs);
                self.assign_rec(array, update, guard, loc, equalities)
            }
            ExprValue::Member { lhs: compound, field } => {
                let compound_type = st.follow(compound.typ());
                let update = if compound_type.is_union() {
                    if compound_type.lookup_field_type(*field, st).is_none() {
                        return Err(SsaError::UnknownMember {
                            loc,
                            typ: compound.typ().to_string(),
                            member: field.to_string(),
                        });
                    }
                    Expr::union_expr(compound.typ().clone(), *field, rhs, st)
                } else if compound_type.is_struct() {
                    compound.clone().with_member(*field, rhs)
                } else {
                    return Err(SsaError::UnknownType { loc, typ: compound.typ().to_string() });
                };
                self.assign_rec(compound, update, guard, loc, equalities)
            }
            ExprValue::ComplexReal(complex) => {
                let imag = complex.clone().complex_imag();
                let update = Expr::complex(rhs, imag, complex.typ().clone());
                self.assign_rec(complex, update, guard, loc, equalities)
            }
            ExprValue::ComplexImag(complex) => {
                let real = complex.clone().complex_real();
                let update = Expr::complex(real, rhs, complex.typ().clone());
                self.assign_rec(complex, update, guard, loc, equalities)
            }
            ExprValue::If { c, t, e } => {
                let (then_guard, else_guard) = if guard.is_true() {
                    (c.clone(), c.clone().boolean_negate())
                } else {
                    (guard.clone().and(c.clone()), guard.and(c.clone().boolean_negate()))
                };
                self.assign_rec(t, rhs.clone(), then_guard, loc, equalities)?;
                self.assign_rec(e, rhs, else_guard, loc, equalities)
            }
            ExprValue::ByteExtract { e, offset, endianness } => {
                let update = rhs.byte_extract(offset.clone(), *endianness, e.typ().clone());
                self.assign_rec(e, update, guard, loc, equalities)
            }
            _ => Err(SsaError::UnrecognizedAssignmentTarget { loc, target: lhs.to_string() }),
        }
    }

    /// `OUT(loc) == rhs`, or `OUT(loc) == (guard ? rhs : <reaching value>)` under a guard.
    /// Objects that `loc` does not write get nothing.
    fn assign_object(
        &self,
        object: &SsaObject,
        rhs: Expr,
        guard: Expr,
        loc: Loc,
        equalities: &mut Vec<Expr>,
    ) -> Result<()> {
        let written = self
            .objects
            .index_of(object.identifier())
            .is_some_and(|index| self.assignments.assigns(loc, index));
        if !written {
            trace!(%loc, object = %object.identifier(), "not assigned here");
            return Ok(());
        }
        let mut value = self.read_rhs(&rhs, loc)?;
        if !guard.is_true() {
            let guard = self.read_rhs(&guard, loc)?;
            value = guard.ternary(value, self.read_rhs_object(object, loc));
        }
        equalities.push(self.naming.name(object, VersionKind::Out, loc).eq(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::dereference::PointsToMap;
    use crate::error::SsaError;
    use crate::local_ssa::LocalSsa;
    use crate::malloc::DynamicObjectAllocation;
    use crate::options::SsaOptions;
    use crate::test_utils::*;
    use goto_ir::goto_program::{
        DatatypeComponent, Endianness, Expr, GotoFunction, GotoProgram, Instruction, Loc,
        Location, Symbol, Type,
    };

    fn single(lhs: Expr, rhs: Expr) -> GotoFunction {
        let l = Location::none();
        GotoFunction::new(
            "f",
            GotoProgram::new(vec![Instruction::assign(lhs, rhs, l), Instruction::end_function(l)]),
        )
    }

    fn equalities(function: &GotoFunction) -> Vec<String> {
        let st = point_table();
        let ssa = LocalSsa::build(function, &st, SsaOptions::default()).unwrap();
        let node = ssa.node_at(Loc::new(0)).unwrap();
        node.equalities
            .iter()
            .map(ToString::to_string)
            .filter(|e| !e.starts_with("ssa::$guard"))
            .collect()
    }

    #[test]
    fn struct_assignment_splits_into_members() {
        let p = var("p", Type::struct_tag("point"));
        let q = var("q", Type::struct_tag("point"));
        let eqs = equalities(&single(p, q));
        assert_eq!(eqs, vec!["p..x#0 == q..x#in", "p..y#0 == q..y#in"]);
    }

    #[test]
    fn struct_literals_are_projected() {
        let st = point_table();
        let p = var("p", Type::struct_tag("point"));
        let literal = Expr::struct_expr_from_values(
            Type::struct_tag("point"),
            vec![int_const(1), int_const(2)],
            &st,
        );
        assert_eq!(equalities(&single(p, literal)), vec!["p..x#0 == 1", "p..y#0 == 2"]);
    }

    #[test]
    fn indexed_and_member_updates() {
        let st = point_table();
        let a = var("a", int().array_of(3));
        let eqs = equalities(&single(a.index(int_const(1)), int_const(5)));
        assert_eq!(eqs, vec!["a#0 == (a#in WITH [1:=5])"]);

        let u = var("u", Type::union_tag("bits"));
        let eqs = equalities(&single(u.member("i", &st), int_const(5)));
        assert_eq!(eqs, vec!["u#0 == { .i=5 }"]);

        let points = var("ps", Type::struct_tag("point").array_of(2));
        let target = points.index(int_const(0)).member("y", &st);
        let eqs = equalities(&single(target, int_const(5)));
        assert_eq!(eqs, vec!["ps#0 == (ps#in WITH [0:=ps#in[0] WITH [.y:=5]])"]);
    }

    #[test]
    fn complex_components_keep_the_other_half() {
        let z = var("z", Type::double().complex_of());
        let eqs = equalities(&single(z.complex_real(), Expr::double_constant(1.0)));
        assert_eq!(eqs, vec!["z#0 == complex(1.0, __imag__ z#in)"]);
    }

    #[test]
    fn byte_extract_targets_reinterpret_the_value() {
        let x = var("x", int());
        let target = x.byte_extract(int_const(0), Endianness::Little, Type::unsigned_int(8));
        let eqs = equalities(&single(target, Expr::int_constant(7, Type::unsigned_int(8))));
        assert_eq!(eqs, vec!["x#0 == byte_extract_little_endian(7, 0, int32_t)"]);
    }

    #[test]
    fn conditional_targets_are_guarded() {
        let st = point_table();
        let l = Location::none();
        let ptr = var("ptr", int().to_pointer());
        let function = GotoFunction::new(
            "f",
            GotoProgram::new(vec![
                Instruction::assign(ptr.dereference(), int_const(1), l),
                Instruction::end_function(l),
            ]),
        );
        let resolver: PointsToMap = [("ptr", vec!["x", "g"])].into_iter().collect();
        let mut ssa = LocalSsa::with_collaborators(
            &function,
            &st,
            &resolver,
            &DynamicObjectAllocation,
            SsaOptions::default(),
        )
        .unwrap();
        ssa.build_all().unwrap();
        let eqs: Vec<String> =
            ssa.node_at(Loc::new(0)).unwrap().equalities.iter().map(ToString::to_string).collect();
        assert_eq!(
            eqs,
            vec![
                "x#0 == ((ptr#in == &x) ? 1 : x#in)",
                "g#0 == ((!(ptr#in == &x)) ? 1 : g#in)",
                "ssa::$guard#0 == true",
            ]
        );
    }

    #[test]
    fn struct_literals_must_match_the_target() {
        let mut st = point_table();
        st.insert(Symbol::aggregate_type(Type::struct_type(
            "cell",
            vec![DatatypeComponent::field("v", int())],
        )));
        let p = var("p", Type::struct_tag("point"));
        let cell = Expr::struct_expr_from_values(Type::struct_tag("cell"), vec![int_const(1)], &st);
        let function = single(p, cell);
        let ssa = LocalSsa::build(&function, &st, SsaOptions::default());
        let Err(SsaError::MalformedProgram(message)) = ssa else { panic!("expected an error") };
        assert!(message.contains("1 values"), "{message}");
    }

    #[test]
    fn unknown_targets_are_errors() {
        let st = point_table();
        let x = var("x", int());
        let function = single(x.clone().plus(int_const(1)), int_const(1));
        let ssa = LocalSsa::build(&function, &st, SsaOptions::default());
        assert!(matches!(ssa, Err(SsaError::UnrecognizedAssignmentTarget { .. })));
    }
}
