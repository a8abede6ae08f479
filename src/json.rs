// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! JSON rendering of analysis results.
//!
//! Produces stable, human-readable summaries for downstream tooling:
//! expressions render through the pretty printer, indices by name, and map
//! iteration order is the deterministic `BTreeMap` order, so output is
//! reproducible run to run.

use serde_json::{Value, json};

use crate::ast::print_eqn;
use crate::contraction::ContractionStructure;
use crate::indices::Idx;
use crate::resolve::OuterIndices;

fn index_names(indices: &[Idx]) -> Vec<String> {
    indices.iter().map(|idx| idx.name().to_owned()).collect()
}

pub fn outer_indices_to_json(outer: &OuterIndices) -> Value {
    let indices: Vec<String> = outer
        .indices
        .iter()
        .map(|idx| idx.name().to_owned())
        .collect();
    let symmetries: Vec<Value> = outer
        .symmetries
        .iter()
        .map(|((a, b), sign)| {
            json!({
                "pair": [a.name(), b.name()],
                "sign": sign,
            })
        })
        .collect();

    json!({
        "indices": indices,
        "symmetries": symmetries,
    })
}

pub fn contraction_to_json(structure: &ContractionStructure) -> Value {
    let groups: Vec<Value> = structure
        .groups()
        .iter()
        .map(|(key, terms)| {
            json!({
                "sum_over": key.as_ref().map(|dummies| index_names(dummies)),
                "terms": terms.iter().map(print_eqn).collect::<Vec<String>>(),
            })
        })
        .collect();
    let nested: Vec<Value> = structure
        .nested()
        .iter()
        .map(|(expr, inner)| {
            json!({
                "expr": print_eqn(expr),
                "inner": inner.iter().map(contraction_to_json).collect::<Vec<Value>>(),
            })
        })
        .collect();

    json!({
        "groups": groups,
        "nested": nested,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contraction::get_contraction_structure;
    use crate::resolve::get_indices;
    use crate::testutils::{add, mul, x};

    #[test]
    fn test_outer_indices_to_json() {
        let i = Idx::new("i");
        let j = Idx::new("j");

        let expr = mul(vec![x("A", &[i.clone(), j.clone()]), x("y", &[j])]);
        let outer = get_indices(&expr).unwrap();
        assert_eq!(
            json!({"indices": ["i"], "symmetries": []}),
            outer_indices_to_json(&outer)
        );
    }

    #[test]
    fn test_contraction_to_json() {
        let i = Idx::new("i");
        let j = Idx::new("j");

        // x[i]*y[i] + A[j, j]
        let expr = add(vec![
            mul(vec![x("x", &[i.clone()]), x("y", &[i])]),
            x("A", &[j.clone(), j]),
        ]);
        let structure = get_contraction_structure(&expr).unwrap();
        assert_eq!(
            json!({
                "groups": [
                    {"sum_over": ["i"], "terms": ["x[i]*y[i]"]},
                    {"sum_over": ["j"], "terms": ["A[j, j]"]},
                ],
                "nested": [],
            }),
            contraction_to_json(&structure)
        );
    }

    #[test]
    fn test_nested_contraction_to_json() {
        let i = Idx::new("i");

        // x[i]*(y[i] + z[i])
        let inner_sum = add(vec![x("y", &[i.clone()]), x("z", &[i.clone()])]);
        let expr = mul(vec![x("x", &[i]), inner_sum]);
        let structure = get_contraction_structure(&expr).unwrap();
        assert_eq!(
            json!({
                "groups": [
                    {"sum_over": ["i"], "terms": ["x[i]*(y[i] + z[i])"]},
                ],
                "nested": [
                    {
                        "expr": "x[i]*(y[i] + z[i])",
                        "inner": [
                            {
                                "groups": [
                                    {"sum_over": null, "terms": ["y[i]", "z[i]"]},
                                ],
                                "nested": [],
                            },
                        ],
                    },
                ],
            }),
            contraction_to_json(&structure)
        );
    }
}
