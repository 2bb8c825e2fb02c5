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

//! Signature module contains foundational types that are used to represent
//! the argument types a window function accepts

use arrow::datatypes::DataType;
use streamwin_common::{plan_err, Result, ScalarValue};

/// How a function's output changes with respect to a fixed input
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Volatility {
    /// Always returns the same output when given the same input.
    Immutable,
    /// May return different values given the same input across different
    /// queries but must return the same value for a given input within a query.
    Stable,
    /// May change the return value from evaluation to evaluation.
    ///
    /// Every stateful window function is volatile: its output for a row
    /// depends on the rows evaluated before it.
    Volatile,
}

/// The types of arguments for which a function has implementations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// The function takes no arguments
    Nullary,
    /// The given number or more arguments, each of any type that has a
    /// [`ScalarValue`] representation and can therefore be compared for
    /// equality with a value of the same type
    VariadicComparable(usize),
}

/// Provides information necessary for calling a function.
///
/// - [`TypeSignature`] defines the argument types that a function has implementations
///   for.
///
/// - [`Volatility`] defines how the output of the function changes with the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// The data types that the function accepts. See [TypeSignature] for more information.
    pub type_signature: TypeSignature,
    /// The volatility of the function. See [Volatility] for more information.
    pub volatility: Volatility,
}

impl Signature {
    /// Creates a new Signature from a given type signature and volatility.
    pub fn new(type_signature: TypeSignature, volatility: Volatility) -> Self {
        Signature {
            type_signature,
            volatility,
        }
    }

    /// No arguments
    pub fn nullary(volatility: Volatility) -> Self {
        Self::new(TypeSignature::Nullary, volatility)
    }

    /// `min_args` or more arguments of comparable types
    pub fn variadic_comparable(min_args: usize, volatility: Volatility) -> Self {
        Self::new(TypeSignature::VariadicComparable(min_args), volatility)
    }

    /// Checks `arg_types` against this signature, returning a
    /// [`StreamWinError::Plan`] naming `function_name` when they do not fit
    ///
    /// [`StreamWinError::Plan`]: streamwin_common::StreamWinError::Plan
    pub fn check_arg_types(&self, function_name: &str, arg_types: &[DataType]) -> Result<()> {
        match self.type_signature {
            TypeSignature::Nullary => {
                if !arg_types.is_empty() {
                    return plan_err!(
                        "{function_name} does not accept arguments, got {}",
                        arg_types.len()
                    );
                }
            }
            TypeSignature::VariadicComparable(min_args) => {
                if arg_types.len() < min_args {
                    return plan_err!(
                        "{function_name} expects at least {min_args} argument(s), got {}",
                        arg_types.len()
                    );
                }
                for (idx, data_type) in arg_types.iter().enumerate() {
                    if ScalarValue::try_from(data_type).is_err() {
                        return plan_err!(
                            "{function_name} cannot compare argument {idx} of type {data_type}"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
