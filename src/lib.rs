// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

#![forbid(unsafe_code)]

//! Index-contraction analysis for tensor expressions built from indexed
//! symbols.
//!
//! Expressions are trees whose leaves may carry named indices, like
//! `A[i, j]`.  Under the summation convention an index repeated within one
//! multiplicative scope is summed over implicitly; the rest are "outer" and
//! label the axes of the result.  This crate answers two questions about
//! such an expression without evaluating it:
//!
//! - [`get_indices`]: which indices are outer, and which symmetry
//!   annotations (if any) survive to the top level?
//! - [`get_contraction_structure`]: which sub-expressions must be summed
//!   over which dummy indices, and in what nesting order?
//!
//! ```
//! use einsum_engine::{Expr, Idx, Indexed, Loc, get_indices};
//!
//! let i = Idx::new("i");
//! let j = Idx::new("j");
//!
//! // A[i, j]*y[j]: j is contracted away, i labels the result
//! let expr = Expr::Mul(
//!     vec![
//!         Expr::Indexed(Indexed::new("A", [i.clone(), j.clone()]), Loc::default()),
//!         Expr::Indexed(Indexed::new("y", [j]), Loc::default()),
//!     ],
//!     Loc::default(),
//! );
//!
//! let outer = get_indices(&expr)?;
//! assert_eq!(1, outer.indices.len());
//! assert!(outer.indices.contains(&i));
//! # Ok::<(), einsum_engine::Error>(())
//! ```
//!
//! Both analyses are pure functions of the input tree: nothing is mutated,
//! memoized, or persisted, and errors (nonconforming sums, an index
//! repeated more than twice, opaque nodes hiding indexed leaves) abort the
//! whole call.

pub mod ast;
pub mod common;
mod contraction;
mod indices;
pub mod json;
mod resolve;

#[cfg(test)]
mod analysis_proptest;
#[cfg(test)]
mod testutils;

pub use self::ast::{Expr, Loc, print_eqn};
pub use self::common::{Error, ErrorCode, ErrorKind, Ident, Result};
pub use self::contraction::{ContractionStructure, DummyKey, get_contraction_structure};
pub use self::indices::{Idx, Indexed, remove_repeated};
pub use self::resolve::{OuterIndices, SymmetryMap, get_indices};
