// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{Expr, print_eqn};
use crate::common::Result;
use crate::expr_err;
use crate::indices::{Idx, remove_repeated};
use crate::resolve::indices_of_product;

/// DummyKey identifies one summation profile: `None` means no summation at
/// this level, `Some(dummies)` lists the indices summed over, in the order
/// their second occurrence was first seen.
pub type DummyKey = Option<Vec<Idx>>;

/// ContractionStructure describes, bottom-up, how the summations in an
/// expression nest.
///
/// Terms are grouped under the dummy indices relevant to them.  A product
/// with sum-valued factors additionally carries a nested entry keyed by the
/// product itself: those inner sums must be fully contracted before the
/// product's own indices mean anything, so an evaluator walks nested
/// entries first and then performs the keyed summations outward.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ContractionStructure {
    groups: BTreeMap<DummyKey, BTreeSet<Expr>>,
    nested: BTreeMap<Expr, Vec<ContractionStructure>>,
}

impl ContractionStructure {
    pub fn new() -> Self {
        Default::default()
    }

    fn singleton(key: DummyKey, expr: Expr) -> Self {
        let mut result = ContractionStructure::new();
        result.groups.insert(key, BTreeSet::from([expr]));
        result
    }

    /// The terms grouped under a given summation profile.
    pub fn terms(&self, key: &DummyKey) -> Option<&BTreeSet<Expr>> {
        self.groups.get(key)
    }

    /// The terms requiring no summation at this level.
    pub fn outer_terms(&self) -> Option<&BTreeSet<Expr>> {
        self.groups.get(&None)
    }

    /// The structures of the sum-valued factors of `expr`, which must be
    /// contracted before `expr` itself, in factor order.
    pub fn nested_for(&self, expr: &Expr) -> Option<&[ContractionStructure]> {
        self.nested.get(expr).map(|structures| structures.as_slice())
    }

    pub fn groups(&self) -> &BTreeMap<DummyKey, BTreeSet<Expr>> {
        &self.groups
    }

    pub fn nested(&self) -> &BTreeMap<Expr, Vec<ContractionStructure>> {
        &self.nested
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.nested.is_empty()
    }

    /// merged folds `other` into this structure, unioning the term sets of
    /// any shared summation profile.  Takes and returns ownership so two
    /// parents can never end up aliasing one accumulator.
    pub fn merged(mut self, other: ContractionStructure) -> ContractionStructure {
        for (key, terms) in other.groups {
            self.groups.entry(key).or_default().extend(terms);
        }
        for (key, structures) in other.nested {
            self.nested.entry(key).or_default().extend(structures);
        }
        self
    }

    fn insert_nested(&mut self, expr: Expr, structures: Vec<ContractionStructure>) {
        self.nested.entry(expr).or_default().extend(structures);
    }
}

/// get_contraction_structure determines the dummy indices of an expression
/// and how its summations nest.
///
/// Terms of a conforming sum are grouped under the dummy indices relevant
/// to them: `x[i]*y[i] + A[j, j]` yields one group keyed `(i,)` and one
/// keyed `(j,)`.  When a product has a sum-valued factor the sum is
/// resolved recursively and recorded under the product expression itself,
/// signalling that the deepest summations must be calculated first.
pub fn get_contraction_structure(expr: &Expr) -> Result<ContractionStructure> {
    match expr {
        Expr::Indexed(indexed, loc) => {
            // a repeated index within one leaf (a trace) is summed at the
            // leaf itself
            let (_outer, dummies) =
                remove_repeated(indexed.indices()).map_err(|err| err.with_loc(*loc))?;
            let key = if dummies.is_empty() { None } else { Some(dummies) };
            Ok(ContractionStructure::singleton(key, expr.clone()))
        }
        Expr::Const(_, _, _) | Expr::Var(_, _) => {
            Ok(ContractionStructure::singleton(None, expr.clone()))
        }
        Expr::Mul(factors, _) => {
            let (_outer, dummies) = indices_of_product(expr)?;
            let key = if dummies.is_empty() { None } else { Some(dummies) };
            let mut result = ContractionStructure::singleton(key, expr.clone());

            // sum-valued factors must be contracted before this product's
            // result is usable
            let inner = factors
                .iter()
                .filter(|factor| matches!(factor, Expr::Add(_, _)))
                .map(get_contraction_structure)
                .collect::<Result<Vec<ContractionStructure>>>()?;
            if !inner.is_empty() {
                result.insert_nested(expr.clone(), inner);
            }
            Ok(result)
        }
        Expr::Add(terms, _) => {
            // collect terms with identical summation profiles; no attempt
            // is made to identify structurally equivalent terms, that would
            // require substitution over expressions of unknown complexity
            let mut result = ContractionStructure::new();
            for term in terms {
                result = result.merged(get_contraction_structure(term)?);
            }
            Ok(result)
        }
        Expr::App(_, _, loc) => {
            // cheap variant checks above, the containment scan last
            if expr.contains_indexed() {
                expr_err!(
                    UnsupportedExpression,
                    *loc,
                    format!("no contraction handling for {}", print_eqn(expr))
                )
            } else {
                Ok(ContractionStructure::singleton(None, expr.clone()))
            }
        }
    }
}
