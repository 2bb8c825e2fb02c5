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

//! [`StatefulWindowUDF`]: stateful window functions evaluated one row at a time

use crate::{RowEvaluator, RowEvaluatorArgs, Signature};
use arrow::datatypes::DataType;
use log::debug;
use std::{
    any::Any,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};
use streamwin_common::config::WindowOptions;
use streamwin_common::Result;

/// Logical representation of a stateful window function.
///
/// A `StatefulWindowUDF` is a shareable definition: its name, its
/// [`Signature`] and a way to create [`RowEvaluator`]s. The running state
/// lives in the evaluators, so one definition can serve any number of
/// concurrent scans, each with its own evaluator.
///
/// See [`StatefulWindowUDFImpl`] for how to define one.
#[derive(Debug, Clone)]
pub struct StatefulWindowUDF {
    inner: Arc<dyn StatefulWindowUDFImpl>,
}

/// Defines how the StatefulWindowUDF is shown to users
impl Display for StatefulWindowUDF {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl PartialEq for StatefulWindowUDF {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.signature() == other.signature()
    }
}

impl Eq for StatefulWindowUDF {}

impl Hash for StatefulWindowUDF {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.signature().hash(state);
    }
}

impl StatefulWindowUDF {
    /// Create a new `StatefulWindowUDF` from a `[StatefulWindowUDFImpl]` trait object
    ///
    /// Note this is the same as using the `From` impl (`StatefulWindowUDF::from`)
    pub fn new_from_impl<F>(fun: F) -> StatefulWindowUDF
    where
        F: StatefulWindowUDFImpl + 'static,
    {
        Self {
            inner: Arc::new(fun),
        }
    }

    /// Return the underlying [`StatefulWindowUDFImpl`] trait object for this function
    pub fn inner(&self) -> &Arc<dyn StatefulWindowUDFImpl> {
        &self.inner
    }

    /// Returns this function's name
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the label used for this function in diagnostics
    pub fn display_name(&self) -> &str {
        self.inner.display_name()
    }

    /// Returns the aliases for this function.
    pub fn aliases(&self) -> &[String] {
        self.inner.aliases()
    }

    /// Returns this function's signature (what input types are accepted)
    pub fn signature(&self) -> &Signature {
        self.inner.signature()
    }

    /// Validate `arg_types` and return the type of the function's output.
    ///
    /// Wrong arity and argument types the function cannot compare are
    /// reported here, before any row is evaluated.
    pub fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        self.signature().check_arg_types(self.name(), arg_types)?;
        self.inner.return_type(arg_types)
    }

    /// Validate `arg_types` and create a fresh [`RowEvaluator`] for one scan
    /// whose rows have exactly those types.
    pub fn initialize(
        &self,
        arg_types: &[DataType],
        options: &WindowOptions,
    ) -> Result<Box<dyn RowEvaluator>> {
        let return_type = self.return_type(arg_types)?;
        debug!(
            "Initializing {} with {} argument(s) returning {return_type}",
            self.display_name(),
            arg_types.len()
        );
        self.inner
            .row_evaluator(RowEvaluatorArgs::new(arg_types, &return_type, options))
    }
}

impl<F> From<F> for StatefulWindowUDF
where
    F: StatefulWindowUDFImpl + 'static,
{
    fn from(fun: F) -> Self {
        Self::new_from_impl(fun)
    }
}

/// Trait for implementing [`StatefulWindowUDF`].
///
/// # Basic Example
/// ```
/// # use std::any::Any;
/// # use arrow::datatypes::DataType;
/// # use streamwin_common::{Result, ScalarValue};
/// # use streamwin_expr::{RowEvaluator, RowEvaluatorArgs, Signature, Volatility};
/// # use streamwin_expr::{StatefulWindowUDF, StatefulWindowUDFImpl};
/// #[derive(Debug)]
/// struct CountNulls {
///   signature: Signature,
/// }
///
/// #[derive(Debug)]
/// struct CountNullsEvaluator {
///   nulls: u64,
/// }
///
/// impl RowEvaluator for CountNullsEvaluator {
///   fn evaluate(&mut self, row: &[ScalarValue]) -> Result<ScalarValue> {
///     self.nulls += row.iter().filter(|v| v.is_null()).count() as u64;
///     Ok(ScalarValue::UInt64(Some(self.nulls)))
///   }
///   fn return_type(&self) -> &DataType { &DataType::UInt64 }
/// }
///
/// impl StatefulWindowUDFImpl for CountNulls {
///   fn as_any(&self) -> &dyn Any { self }
///   fn name(&self) -> &str { "count_nulls" }
///   fn display_name(&self) -> &str { "CountNulls" }
///   fn signature(&self) -> &Signature { &self.signature }
///   fn return_type(&self, _arg_types: &[DataType]) -> Result<DataType> {
///     Ok(DataType::UInt64)
///   }
///   fn row_evaluator(&self, _args: RowEvaluatorArgs) -> Result<Box<dyn RowEvaluator>> {
///     Ok(Box::new(CountNullsEvaluator { nulls: 0 }))
///   }
/// }
///
/// let count_nulls = StatefulWindowUDF::from(CountNulls {
///   signature: Signature::variadic_comparable(1, Volatility::Volatile),
/// });
/// assert_eq!(count_nulls.return_type(&[DataType::Utf8]).unwrap(), DataType::UInt64);
/// ```
pub trait StatefulWindowUDFImpl: Debug + Send + Sync {
    /// Returns this object as an [`Any`] trait object
    fn as_any(&self) -> &dyn Any;

    /// Returns this function's name
    fn name(&self) -> &str;

    /// Returns a static label for this function used in diagnostics
    fn display_name(&self) -> &str;

    /// Returns any aliases (alternate names) for this function.
    fn aliases(&self) -> &[String] {
        &[]
    }

    /// Returns the function's [`Signature`] for information about what input
    /// types are accepted and the function's Volatility.
    fn signature(&self) -> &Signature;

    /// What [`DataType`] will be returned by this function, given the types of
    /// the arguments. Called after the arguments passed the [`Signature`] check.
    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType>;

    /// Create the [`RowEvaluator`] instance for one scan
    fn row_evaluator(&self, args: RowEvaluatorArgs) -> Result<Box<dyn RowEvaluator>>;
}
