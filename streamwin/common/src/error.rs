// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! streamwin error types

use std::error;
use std::fmt::{Display, Formatter};
use std::result;

use arrow::error::ArrowError;

/// Result type for operations that could result in an [StreamWinError]
pub type Result<T, E = StreamWinError> = result::Result<T, E>;

/// Error type for generic operations that could result in StreamWinError::External
pub type GenericError = Box<dyn error::Error + Send + Sync>;

/// streamwin error
#[derive(Debug)]
pub enum StreamWinError {
    /// Error returned by arrow.
    ArrowError(ArrowError),
    /// Error returned on a branch that we know it is possible
    /// but to which we still have no implementation for.
    NotImplemented(String),
    /// Error returned as a consequence of an error in streamwin.
    /// This error should not happen in normal usage.
    Internal(String),
    /// This error happens whenever a window function call is not valid:
    /// wrong number of arguments or argument types a function cannot compare.
    /// It is raised when the function is initialized, before any row is seen.
    Plan(String),
    /// Error returned while rows are being evaluated.
    Execution(String),
    /// Invalid or unknown configuration value.
    Configuration(String),
    /// Errors originating from outside streamwin's codebase.
    External(GenericError),
    /// Error with additional context
    Context(String, Box<StreamWinError>),
}

impl From<ArrowError> for StreamWinError {
    fn from(e: ArrowError) -> Self {
        StreamWinError::ArrowError(e)
    }
}

impl From<StreamWinError> for ArrowError {
    fn from(e: StreamWinError) -> Self {
        match e {
            StreamWinError::ArrowError(e) => e,
            StreamWinError::External(e) => ArrowError::ExternalError(e),
            other => ArrowError::ExternalError(Box::new(other)),
        }
    }
}

impl From<GenericError> for StreamWinError {
    fn from(err: GenericError) -> Self {
        StreamWinError::External(err)
    }
}

impl Display for StreamWinError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match *self {
            StreamWinError::ArrowError(ref desc) => write!(f, "Arrow error: {desc}"),
            StreamWinError::NotImplemented(ref desc) => {
                write!(f, "This feature is not implemented: {desc}")
            }
            StreamWinError::Internal(ref desc) => {
                write!(f, "Internal error: {desc}. This was likely caused by a bug in streamwin's \
                    code and we would welcome that you file an bug report in our issue tracker")
            }
            StreamWinError::Plan(ref desc) => {
                write!(f, "Error during planning: {desc}")
            }
            StreamWinError::Execution(ref desc) => {
                write!(f, "Execution error: {desc}")
            }
            StreamWinError::Configuration(ref desc) => {
                write!(f, "Invalid or Unsupported Configuration: {desc}")
            }
            StreamWinError::External(ref desc) => {
                write!(f, "External error: {desc}")
            }
            StreamWinError::Context(ref desc, ref err) => {
                write!(f, "{desc}\ncaused by\n{err}")
            }
        }
    }
}

impl error::Error for StreamWinError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            StreamWinError::ArrowError(e) => Some(e),
            StreamWinError::External(e) => Some(e.as_ref()),
            StreamWinError::Context(_, e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl StreamWinError {
    /// Wraps this error with a description of what was being attempted
    pub fn context(self, description: impl Into<String>) -> Self {
        Self::Context(description.into(), Box::new(self))
    }

    /// Strips any [`StreamWinError::Context`] layers and returns the innermost error
    pub fn find_root(&self) -> &Self {
        let mut last = self;
        while let StreamWinError::Context(_, inner) = last {
            last = inner.as_ref();
        }
        last
    }
}

/// Returns `Err(StreamWinError::Plan(..))` built from a format string
#[macro_export]
macro_rules! plan_err {
    ($($arg:tt)*) => {
        Err($crate::StreamWinError::Plan(format!($($arg)*)))
    };
}

/// Returns `Err(StreamWinError::Execution(..))` built from a format string
#[macro_export]
macro_rules! exec_err {
    ($($arg:tt)*) => {
        Err($crate::StreamWinError::Execution(format!($($arg)*)))
    };
}

/// Returns `Err(StreamWinError::Internal(..))` built from a format string
#[macro_export]
macro_rules! internal_err {
    ($($arg:tt)*) => {
        Err($crate::StreamWinError::Internal(format!($($arg)*)))
    };
}

/// Returns `Err(StreamWinError::Configuration(..))` built from a format string
#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        Err($crate::StreamWinError::Configuration(format!($($arg)*)))
    };
}

/// Returns `Err(StreamWinError::NotImplemented(..))` built from a format string
#[macro_export]
macro_rules! not_impl_err {
    ($($arg:tt)*) => {
        Err($crate::StreamWinError::NotImplemented(format!($($arg)*)))
    };
}
