// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Property-based tests for the index analyses using proptest.
//!
//! These tests verify that:
//! 1. The repeated-index partition is exact: once-set and repeated-tuple
//!    are disjoint and together cover the input sequence
//! 2. Both analyses are referentially transparent (pure functions of the
//!    input tree)
//! 3. A sum's contraction structure is the merge of its terms' structures

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use crate::ast::{Expr, Loc};
use crate::common::ErrorCode;
use crate::contraction::{ContractionStructure, get_contraction_structure};
use crate::indices::{Idx, Indexed, remove_repeated};
use crate::resolve::get_indices;

fn idx_strategy() -> impl Strategy<Value = Idx> {
    prop_oneof![
        Just(Idx::new("i")),
        Just(Idx::new("j")),
        Just(Idx::new("k")),
        Just(Idx::new("l")),
    ]
}

fn index_seq_strategy() -> impl Strategy<Value = Vec<Idx>> {
    proptest::collection::vec(idx_strategy(), 0..8)
}

fn leaf_strategy() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (1i32..5).prop_map(|n| {
            Expr::Const(n.to_string(), ordered_float::OrderedFloat(n as f64), Loc::default())
        }),
        "[a-c]".prop_map(|name| Expr::Var(name, Loc::default())),
        ("[w-z]", proptest::collection::vec(idx_strategy(), 1..3)).prop_map(|(base, indices)| {
            Expr::Indexed(Indexed::new(&base, indices), Loc::default())
        }),
    ]
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    leaf_strategy().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 2..4)
                .prop_map(|terms| Expr::Add(terms, Loc::default())),
            proptest::collection::vec(inner, 2..4)
                .prop_map(|factors| Expr::Mul(factors, Loc::default())),
        ]
    })
}

proptest! {
    #[test]
    fn remove_repeated_is_an_exact_partition(seq in index_seq_strategy()) {
        let mut counts: HashMap<&Idx, usize> = HashMap::new();
        for idx in seq.iter() {
            *counts.entry(idx).or_default() += 1;
        }

        match remove_repeated(&seq) {
            Ok((once, repeated)) => {
                prop_assert!(counts.values().all(|&n| n <= 2));

                let mut union: BTreeSet<Idx> = once.clone();
                union.extend(repeated.iter().cloned());
                let input: BTreeSet<Idx> = seq.iter().cloned().collect();
                prop_assert_eq!(union, input);

                for idx in repeated.iter() {
                    prop_assert!(!once.contains(idx));
                }
            }
            Err(err) => {
                prop_assert_eq!(ErrorCode::IndexRepeatedMoreThanTwice, err.code);
                prop_assert!(counts.values().any(|&n| n >= 3));
            }
        }
    }

    #[test]
    fn analyses_are_referentially_transparent(expr in expr_strategy()) {
        prop_assert_eq!(get_indices(&expr), get_indices(&expr));
        prop_assert_eq!(
            get_contraction_structure(&expr),
            get_contraction_structure(&expr)
        );
    }

    #[test]
    fn sum_structure_is_merge_of_term_structures(
        terms in proptest::collection::vec(expr_strategy(), 1..4)
    ) {
        let sum = Expr::Add(terms.clone(), Loc::default());
        let whole = get_contraction_structure(&sum);
        let parts: Result<Vec<ContractionStructure>, _> =
            terms.iter().map(get_contraction_structure).collect();

        match (whole, parts) {
            (Ok(whole), Ok(parts)) => {
                let merged = parts
                    .into_iter()
                    .fold(ContractionStructure::new(), |acc, part| acc.merged(part));
                prop_assert_eq!(whole, merged);
            }
            (Err(_), Err(_)) => {
                // a sum fails to analyze exactly when one of its terms does
            }
            (whole, parts) => {
                prop_assert!(
                    false,
                    "sum and terms disagree on analyzability: {:?} vs {:?}",
                    whole,
                    parts
                );
            }
        }
    }
}
