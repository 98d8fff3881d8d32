// Copyright Kani Contributors
// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::cbmc_string::{InternStringOption, InternedString};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A `Location` represents a source location.
///
/// Source locations are carried along for diagnostics only: they are copied onto the SSA
/// symbols generated for an object, but never influence what is generated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Location {
    /// Unknown source location
    #[default]
    None,
    /// Location in user code.
    /// `function` is `None` for global, `Some(function_name)` for function local.
    Loc {
        file: InternedString,
        function: Option<InternedString>,
        start_line: u64,
        start_col: Option<u64>,
        end_line: u64,
        end_col: Option<u64>,
    },
    /// Location of a property (assertion) with its description.
    Property {
        file: InternedString,
        function: Option<InternedString>,
        line: u64,
        col: Option<u64>,
        comment: InternedString,
        property_class: InternedString,
    },
}

/// Getters and predicates
impl Location {
    pub fn is_none(&self) -> bool {
        matches!(self, Location::None)
    }

    pub fn start_line(&self) -> Option<u64> {
        match self {
            Location::Loc { start_line, .. } => Some(*start_line),
            Location::Property { line, .. } => Some(*line),
            Location::None => None,
        }
    }

    /// The property description, if this location describes a property.
    pub fn comment(&self) -> Option<InternedString> {
        match self {
            Location::Property { comment, .. } => Some(*comment),
            _ => None,
        }
    }

    /// Convert a location to a short string suitable for (e.g.) logging.
    /// Goal is to return just "file:line" as clearly as possible.
    pub fn short_string(&self) -> String {
        match self {
            Location::None => "<none>".to_string(),
            Location::Loc { file, start_line: line, .. } => format!("{file}:{line}"),
            Location::Property { file, line, .. } => format!("{file}:{line}"),
        }
    }
}

/// Constructors
impl Location {
    pub fn new<T, U: Into<InternedString>, V: Into<InternedString>>(
        file: U,
        function: Option<V>,
        start_line: T,
        start_col: Option<T>,
        end_line: T,
        end_col: Option<T>,
    ) -> Location
    where
        T: TryInto<u64>,
        T::Error: Debug,
    {
        Location::Loc {
            file: file.into(),
            function: function.intern(),
            start_line: start_line.try_into().unwrap(),
            start_col: start_col.map(|x| x.try_into().unwrap()),
            end_line: end_line.try_into().unwrap(),
            end_col: end_col.map(|x| x.try_into().unwrap()),
        }
    }

    /// A single-line location, the common case for instructions.
    pub fn line<U: Into<InternedString>>(file: U, line: u64) -> Location {
        Location::Loc {
            file: file.into(),
            function: None,
            start_line: line,
            start_col: None,
            end_line: line,
            end_col: None,
        }
    }

    /// Create a Property type Location from an already existing Location type
    pub fn with_property<T: Into<InternedString>>(self, comment: T, property_class: T) -> Self {
        match self {
            Location::Loc { file, function, start_line, start_col, .. } => Location::Property {
                file,
                function,
                line: start_line,
                col: start_col,
                comment: comment.into(),
                property_class: property_class.into(),
            },
            Location::Property { .. } | Location::None => self,
        }
    }

    pub fn none() -> Location {
        Location::None
    }
}
