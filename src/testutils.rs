// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use ordered_float::OrderedFloat;

use crate::ast::{Expr, Loc};
use crate::indices::{Idx, Indexed};

pub(crate) fn x(base: &str, indices: &[Idx]) -> Expr {
    Expr::Indexed(Indexed::new(base, indices.iter().cloned()), Loc::default())
}

pub(crate) fn var(name: &str) -> Expr {
    Expr::Var(name.to_owned(), Loc::default())
}

pub(crate) fn num(n: f64) -> Expr {
    Expr::Const(n.to_string(), OrderedFloat(n), Loc::default())
}

pub(crate) fn add(terms: Vec<Expr>) -> Expr {
    Expr::Add(terms, Loc::default())
}

pub(crate) fn mul(factors: Vec<Expr>) -> Expr {
    Expr::Mul(factors, Loc::default())
}

pub(crate) fn app(func: &str, args: Vec<Expr>) -> Expr {
    Expr::App(func.to_owned(), args, Loc::default())
}
