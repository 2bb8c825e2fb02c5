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

//! Row evaluation module

use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use std::fmt::Debug;
use streamwin_common::config::WindowOptions;
use streamwin_common::{get_row_at_idx, Result, ScalarValue};

/// Row evaluator for stateful window functions
///
/// # Background
///
/// An implementation of this trait is created once per scan by
/// [`StatefulWindowUDF::initialize`] and is fed every row of the scan, in
/// order, one row at a time. The rows arrive sorted so that each partition is
/// a contiguous run, ordered by the ranking key. The evaluator never sees the
/// partition as a whole; it only remembers what it needs from the previous
/// row.
///
/// For example, evaluating `window_func(val, col)` on the following data:
///
/// ```text
/// val | col
/// --- + ----
///  10 |  A
///  20 |  A
///  20 |  A
///   5 |  B
/// ```
///
/// calls [`Self::evaluate`] four times, with `[10, A]`, `[20, A]`, `[20, A]`
/// and `[5, B]`. The evaluator notices that partition `B` starts on the
/// fourth call because `B` differs from the `A` it kept from the third.
///
/// An evaluator must not be shared between two row streams; each stream
/// initializes its own.
///
/// [`StatefulWindowUDF::initialize`]: crate::StatefulWindowUDF::initialize
pub trait RowEvaluator: Debug + Send {
    /// Evaluate the window function for the next row of the stream.
    ///
    /// Rows are read from dictionary encoded columns as plain values, so the
    /// returned scalar has the value type even when [`Self::return_type`] is a
    /// dictionary type. [`Self::evaluate_all`] produces the declared type.
    fn evaluate(&mut self, row: &[ScalarValue]) -> Result<ScalarValue>;

    /// The type of every value returned by [`Self::evaluate`]
    fn return_type(&self) -> &DataType;

    /// Evaluate the window function for the next `num_rows` rows, given as
    /// columns.
    ///
    /// The default implementation reads the rows one by one and calls
    /// [`Self::evaluate`], so state carries over between calls exactly as it
    /// does between rows: a stream split into several batches produces the
    /// same output as the same stream in one batch.
    ///
    /// `num_rows` is required to correctly compute the output in case
    /// `values.len() == 0`
    fn evaluate_all(&mut self, values: &[ArrayRef], num_rows: usize) -> Result<ArrayRef> {
        let results = (0..num_rows)
            .map(|idx| {
                let row = get_row_at_idx(values, idx)?;
                self.evaluate(&row)
            })
            .collect::<Result<Vec<_>>>()?;
        ScalarValue::iter_to_array(results, self.return_type())
    }
}

/// Arguments passed to [`StatefulWindowUDFImpl::row_evaluator`]
///
/// [`StatefulWindowUDFImpl::row_evaluator`]: crate::StatefulWindowUDFImpl::row_evaluator
#[derive(Debug, Clone, Copy)]
pub struct RowEvaluatorArgs<'a> {
    input_types: &'a [DataType],
    return_type: &'a DataType,
    options: &'a WindowOptions,
}

impl<'a> RowEvaluatorArgs<'a> {
    /// Create new [`RowEvaluatorArgs`]
    pub fn new(
        input_types: &'a [DataType],
        return_type: &'a DataType,
        options: &'a WindowOptions,
    ) -> Self {
        Self {
            input_types,
            return_type,
            options,
        }
    }

    /// The declared types of the row values, in argument order
    pub fn input_types(&self) -> &'a [DataType] {
        self.input_types
    }

    /// The validated return type of the function
    pub fn return_type(&self) -> &'a DataType {
        self.return_type
    }

    /// Window function options in effect for this scan
    pub fn options(&self) -> &'a WindowOptions {
        self.options
    }
}
