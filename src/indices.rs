// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::collections::BTreeSet;
use std::fmt;

use smallvec::SmallVec;

use crate::common::{Ident, Result};
use crate::index_err;

/// Idx labels one axis of an indexed object, optionally with declared
/// integer bounds.  Two indices are the same index exactly when their name
/// and bounds agree.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Idx {
    name: Ident,
    range: Option<(i64, i64)>,
}

impl Idx {
    pub fn new(name: &str) -> Self {
        Idx {
            name: name.to_owned(),
            range: None,
        }
    }

    pub fn with_range(name: &str, lower: i64, upper: i64) -> Self {
        Idx {
            name: name.to_owned(),
            range: Some((lower, upper)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> Option<(i64, i64)> {
        self.range
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Indexed is a single tensor-component reference: a base symbol applied to
/// an ordered list of indices, one per axis, like `A[i, j]`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Indexed {
    base: Ident,
    indices: SmallVec<[Idx; 4]>,
}

impl Indexed {
    pub fn new(base: &str, indices: impl IntoIterator<Item = Idx>) -> Self {
        Indexed {
            base: base.to_owned(),
            indices: indices.into_iter().collect(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn indices(&self) -> &[Idx] {
        &self.indices
    }

    pub fn rank(&self) -> usize {
        self.indices.len()
    }
}

impl fmt::Display for Indexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices: Vec<String> = self.indices.iter().map(|idx| idx.to_string()).collect();
        write!(f, "{}[{}]", self.base, indices.join(", "))
    }
}

/// remove_repeated partitions an index sequence into the indices occurring
/// exactly once (the outer candidates) and those occurring twice (the dummy
/// candidates, in the order their second occurrence is first seen).
///
/// An index occurring three or more times has no meaning under the
/// summation convention, so it fails rather than guessing.
pub fn remove_repeated(indices: &[Idx]) -> Result<(BTreeSet<Idx>, Vec<Idx>)> {
    let mut counts: Vec<(&Idx, u8)> = Vec::with_capacity(indices.len());
    let mut repeated: Vec<Idx> = Vec::new();

    for idx in indices {
        match counts.iter_mut().find(|(seen, _)| *seen == idx) {
            Some((_, n)) => {
                *n += 1;
                if *n > 2 {
                    return index_err!(
                        IndexRepeatedMoreThanTwice,
                        format!("index {} repeated more than twice", idx)
                    );
                }
                repeated.push(idx.clone());
            }
            None => {
                counts.push((idx, 1));
            }
        }
    }

    let once = counts
        .iter()
        .filter(|(_, n)| *n == 1)
        .map(|(idx, _)| (*idx).clone())
        .collect();

    Ok((once, repeated))
}
