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

//! [`RowSnapshot`] and helpers to read rows out of columnar input

use arrow::array::ArrayRef;

use crate::error::Result;
use crate::scalar::ScalarValue;

/// An owned copy of one row, kept as "the previous row" by stateful
/// window functions.
///
/// The copy is taken when the snapshot is captured, so the caller is free to
/// reuse or mutate its row buffer afterwards. A snapshot is never updated in
/// place: the next row replaces it entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    values: Vec<ScalarValue>,
}

impl RowSnapshot {
    /// Deep copies `row`
    pub fn capture(row: &[ScalarValue]) -> Self {
        Self {
            values: row.to_vec(),
        }
    }

    /// All values of the captured row
    pub fn values(&self) -> &[ScalarValue] {
        &self.values
    }

    /// Number of values in the captured row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the captured row had no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Get a row of values at `idx` from `columns`
pub fn get_row_at_idx(columns: &[ArrayRef], idx: usize) -> Result<Vec<ScalarValue>> {
    columns
        .iter()
        .map(|arr| ScalarValue::try_from_array(arr.as_ref(), idx))
        .collect()
}
