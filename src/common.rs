// Copyright 2026 The Einsum Engine Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

use serde::Serialize;

use crate::ast::Loc;

pub type Ident = String;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NoError, // will never be produced
    Generic,
    IndexRepeatedMoreThanTwice,
    InconsistentIndices,
    UnsupportedExpression,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            Generic => "generic",
            IndexRepeatedMoreThanTwice => "index_repeated_more_than_twice",
            InconsistentIndices => "inconsistent_indices",
            UnsupportedExpression => "unsupported_expression",
        };

        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Index,
    Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Error {
    pub kind: ErrorKind,
    pub code: ErrorCode,
    pub loc: Option<Loc>,
    pub details: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, code: ErrorCode, details: Option<String>) -> Self {
        Error {
            kind,
            code,
            loc: None,
            details,
        }
    }

    pub fn with_loc(mut self, loc: Loc) -> Self {
        self.loc = Some(loc);
        self
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.kind {
            ErrorKind::Index => "IndexError",
            ErrorKind::Expression => "ExpressionError",
        };
        match (&self.loc, &self.details) {
            (Some(loc), Some(details)) => write!(f, "{}{{{}:{}: {}}}", kind, loc, self.code, details),
            (Some(loc), None) => write!(f, "{}{{{}:{}}}", kind, loc, self.code),
            (None, Some(details)) => write!(f, "{}{{{}: {}}}", kind, self.code, details),
            (None, None) => write!(f, "{}{{{}}}", kind, self.code),
        }
    }
}

impl error::Error for Error {}

pub type Result<T> = result::Result<T, Error>;

#[macro_export]
macro_rules! index_err {
    ($code:tt, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Index, ErrorCode::$code, Some($str)))
    }};
    ($code:tt) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Index, ErrorCode::$code, None))
    }};
}

#[macro_export]
macro_rules! expr_err {
    ($code:tt, $loc:expr, $str:expr) => {{
        use $crate::common::{Error, ErrorCode, ErrorKind};
        Err(Error::new(ErrorKind::Expression, ErrorCode::$code, Some($str)).with_loc($loc))
    }};
}

#[test]
fn test_error_display() {
    let err = Error::new(
        ErrorKind::Index,
        ErrorCode::IndexRepeatedMoreThanTwice,
        Some("index i repeated more than twice".to_owned()),
    );
    assert_eq!(
        "IndexError{index_repeated_more_than_twice: index i repeated more than twice}",
        format!("{}", err)
    );

    let err = Error::new(ErrorKind::Expression, ErrorCode::InconsistentIndices, None)
        .with_loc(Loc::new(3, 9));
    assert_eq!(
        "ExpressionError{3:9:inconsistent_indices}",
        format!("{}", err)
    );
}

#[test]
fn test_error_code_serialization() {
    let code = serde_json::to_value(ErrorCode::UnsupportedExpression).unwrap();
    assert_eq!(serde_json::json!("unsupported_expression"), code);
}
