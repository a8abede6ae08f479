// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;

use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::common::Ident;
use crate::indices::Indexed;

/// Loc describes a location in an equation by the starting point and ending point.
/// Equations are strings typed by humans for a single variable -- u16 is long enough.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Default, Hash, Serialize)]
pub struct Loc {
    pub start: u16,
    pub end: u16,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl Loc {
    pub fn new(start: usize, end: usize) -> Self {
        Loc {
            start: start as u16,
            end: end as u16,
        }
    }

    /// union takes a second Loc and returns the inclusive range from the
    /// start of the earlier token to the end of the later token.
    pub fn union(&self, rhs: &Self) -> Self {
        Loc {
            start: self.start.min(rhs.start),
            end: self.end.max(rhs.end),
        }
    }
}

#[test]
fn test_loc_basics() {
    let a = Loc { start: 3, end: 7 };
    assert_eq!(a, Loc::new(3, 7));

    let b = Loc { start: 4, end: 11 };
    assert_eq!(Loc::new(3, 11), a.union(&b));

    let c = Loc { start: 1, end: 5 };
    assert_eq!(Loc::new(1, 7), a.union(&c));
}

/// Expr is a fully built tensor expression.  The index analyses dispatch on
/// these variants: `Const` and `Var` are opaque scalar atoms, `Indexed` is a
/// tensor-component leaf, `Add` and `Mul` are n-ary sums and products, and
/// `App` is an opaque function application that may or may not transitively
/// contain indexed leaves.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub enum Expr {
    Const(String, OrderedFloat<f64>, Loc),
    Var(Ident, Loc),
    Indexed(Indexed, Loc),
    Add(Vec<Expr>, Loc),
    Mul(Vec<Expr>, Loc),
    App(Ident, Vec<Expr>, Loc),
}

impl Expr {
    pub fn get_loc(&self) -> Loc {
        match self {
            Expr::Const(_, _, loc) => *loc,
            Expr::Var(_, loc) => *loc,
            Expr::Indexed(_, loc) => *loc,
            Expr::Add(_, loc) => *loc,
            Expr::Mul(_, loc) => *loc,
            Expr::App(_, _, loc) => *loc,
        }
    }

    /// contains_indexed reports whether any `Indexed` leaf occurs in this
    /// subtree.  This scan is linear in the subtree size, so the analyses
    /// only reach for it after the cheap variant checks have failed.
    pub fn contains_indexed(&self) -> bool {
        match self {
            Expr::Const(_, _, _) | Expr::Var(_, _) => false,
            Expr::Indexed(_, _) => true,
            Expr::Add(children, _) | Expr::Mul(children, _) | Expr::App(_, children, _) => {
                children.iter().any(Expr::contains_indexed)
            }
        }
    }

    /// as_coeff_factors splits a product into its leading numeric
    /// coefficient and the remaining factors.  Non-products are a
    /// coefficient of 1 applied to the expression itself.
    pub fn as_coeff_factors(&self) -> (f64, &[Expr]) {
        match self {
            Expr::Mul(factors, _) => match factors.split_first() {
                Some((Expr::Const(_, n, _), rest)) => (n.0, rest),
                _ => (1.0, factors.as_slice()),
            },
            _ => (1.0, std::slice::from_ref(self)),
        }
    }

    #[cfg(test)]
    pub(crate) fn strip_loc(self) -> Self {
        let loc = Loc::default();
        match self {
            Expr::Const(s, n, _loc) => Expr::Const(s, n, loc),
            Expr::Var(v, _loc) => Expr::Var(v, loc),
            Expr::Indexed(indexed, _loc) => Expr::Indexed(indexed, loc),
            Expr::Add(terms, _loc) => {
                Expr::Add(terms.into_iter().map(|t| t.strip_loc()).collect(), loc)
            }
            Expr::Mul(factors, _loc) => {
                Expr::Mul(factors.into_iter().map(|f| f.strip_loc()).collect(), loc)
            }
            Expr::App(func, args, _loc) => {
                Expr::App(func, args.into_iter().map(|a| a.strip_loc()).collect(), loc)
            }
        }
    }
}

fn paren_if_necessary(parent: &Expr, child: &Expr, eqn: String) -> String {
    let needs_parens = match parent {
        // no children, or children are bracket/comma delimited already
        Expr::Const(_, _, _) | Expr::Var(_, _) | Expr::Indexed(_, _) | Expr::App(_, _, _) => false,
        Expr::Add(_, _) => false,
        // `x[i]*(a + b)` needs the parens to survive printing
        Expr::Mul(_, _) => matches!(child, Expr::Add(_, _)),
    };
    if needs_parens { format!("({})", eqn) } else { eqn }
}

struct PrintVisitor {}

impl PrintVisitor {
    fn walk(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Const(s, _, _) => s.clone(),
            Expr::Var(id, _) => id.clone(),
            Expr::Indexed(indexed, _) => indexed.to_string(),
            Expr::Add(terms, _) => terms
                .iter()
                .map(|t| self.walk(t))
                .collect::<Vec<String>>()
                .join(" + "),
            Expr::Mul(factors, _) => factors
                .iter()
                .map(|f| paren_if_necessary(expr, f, self.walk(f)))
                .collect::<Vec<String>>()
                .join("*"),
            Expr::App(func, args, _) => {
                let args: Vec<String> = args.iter().map(|a| self.walk(a)).collect();
                format!("{}({})", func, args.join(", "))
            }
        }
    }
}

pub fn print_eqn(expr: &Expr) -> String {
    let mut visitor = PrintVisitor {};
    visitor.walk(expr)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", print_eqn(self))
    }
}
