// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{Expr, print_eqn};
use crate::common::Result;
use crate::expr_err;
use crate::indices::{Idx, remove_repeated};

/// SymmetryMap records a sign (+1/-1) for an ordered pair of outer indices
/// with a known symmetry or antisymmetry relation.
///
/// Discovery of these relations is unfinished upstream of this crate's
/// lineage: maps are merged and propagated through products and sums, but
/// nothing in the resolver ever populates one.
pub type SymmetryMap = BTreeMap<(Idx, Idx), i32>;

/// OuterIndices is the resolver's result: the outer (non-summed) indices of
/// an expression plus whatever symmetry annotations survived propagation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OuterIndices {
    pub indices: BTreeSet<Idx>,
    pub symmetries: SymmetryMap,
}

impl OuterIndices {
    fn empty() -> Self {
        Default::default()
    }

    /// An expression with no outer indices evaluates to a scalar.
    pub fn is_scalar(&self) -> bool {
        self.indices.is_empty()
    }
}

/// get_indices determines the outer indices of an expression.
///
/// By "outer" we mean indices that are not summation indices.  Repeated
/// indices imply a summation: the trace `A[i, i]` has no outer indices at
/// all.  The concept applies recursively from the deepest level up, so
/// dummies inside parentheses are treated as already summed:
/// `(x[i] + A[i, j]*y[j])*x[j]` has outer indices `{i, j}`.
///
/// Fails when a sum's terms disagree on their outer indices, when an index
/// is repeated more than twice in one multiplicative scope, or when an
/// opaque node contains indexed leaves the resolver has no rule for.
pub fn get_indices(expr: &Expr) -> Result<OuterIndices> {
    match expr {
        Expr::Indexed(indexed, loc) => {
            // dummies internal to a single leaf (a trace) are summed right
            // here and not reported to the caller
            let (outer, _dummies) =
                remove_repeated(indexed.indices()).map_err(|err| err.with_loc(*loc))?;
            Ok(OuterIndices {
                indices: outer,
                symmetries: SymmetryMap::new(),
            })
        }
        Expr::Const(_, _, _) | Expr::Var(_, _) => Ok(OuterIndices::empty()),
        Expr::Mul(_, _) => indices_of_product(expr).map(|(outer, _dummies)| outer),
        Expr::Add(terms, _) => indices_of_sum(terms, expr),
        Expr::App(_, _, loc) => {
            // the containment scan is the expensive test, so it runs only
            // after every recognized variant has been ruled out; an opaque
            // node hiding indexed leaves must fail rather than report an
            // empty index set
            if expr.contains_indexed() {
                expr_err!(
                    UnsupportedExpression,
                    *loc,
                    format!("no index handling for {}", print_eqn(expr))
                )
            } else {
                Ok(OuterIndices::empty())
            }
        }
    }
}

/// indices_of_product resolves a product node: each factor's outer indices
/// are concatenated and deduplicated, so an index outer to two sibling
/// factors becomes a contraction dummy (`x[i, k]*y[j, k]` contracts `k`).
/// Returns the product's outer indices together with its dummy tuple.
pub(crate) fn indices_of_product(expr: &Expr) -> Result<(OuterIndices, Vec<Idx>)> {
    let (_coeff, factors) = expr.as_coeff_factors();

    let per_factor = factors
        .iter()
        .map(get_indices)
        .collect::<Result<Vec<OuterIndices>>>()?;

    let mut combined: Vec<Idx> = Vec::new();
    for factor in per_factor.iter() {
        combined.extend(factor.indices.iter().cloned());
    }
    let (outer, dummies) =
        remove_repeated(&combined).map_err(|err| err.with_loc(expr.get_loc()))?;

    // factors reporting a symmetry for the same pair combine by sign
    // multiplication; everything else passes through untouched
    let mut symmetries = SymmetryMap::new();
    for factor in per_factor {
        for (pair, sign) in factor.symmetries {
            symmetries
                .entry(pair)
                .and_modify(|s| *s *= sign)
                .or_insert(sign);
        }
    }

    Ok((
        OuterIndices {
            indices: outer,
            symmetries,
        },
        dummies,
    ))
}

/// indices_of_sum resolves a sum node.  Every term must expose the same
/// outer indices, except that scalar terms broadcast silently:
/// `x[i] + A[i, k]*y[k]` is fine, `x[i] + y[j]` is not.
fn indices_of_sum(terms: &[Expr], expr: &Expr) -> Result<OuterIndices> {
    let per_term = terms
        .iter()
        .map(get_indices)
        .collect::<Result<Vec<OuterIndices>>>()?;

    let non_scalars: Vec<&OuterIndices> =
        per_term.iter().filter(|term| !term.is_scalar()).collect();
    let Some(first) = non_scalars.first() else {
        return Ok(OuterIndices::empty());
    };

    if non_scalars.iter().any(|term| term.indices != first.indices) {
        return expr_err!(
            InconsistentIndices,
            expr.get_loc(),
            format!("indices are not consistent: {}", print_eqn(expr))
        );
    }

    // propagate symmetries only when every term reports the same map;
    // searching for symmetries across heterogeneous terms is unimplemented
    let symmetries = if per_term
        .iter()
        .all(|term| term.symmetries == per_term[0].symmetries)
    {
        per_term[0].symmetries.clone()
    } else {
        SymmetryMap::new()
    };

    Ok(OuterIndices {
        indices: first.indices.clone(),
        symmetries,
    })
}
