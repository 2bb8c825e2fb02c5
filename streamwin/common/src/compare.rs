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

//! Equality of single values and of whole tuples of values

use crate::null_equality::NullEquality;
use crate::scalar::ScalarValue;

/// Compares values and tuples of values taken from adjacent rows.
///
/// Tuples are equal when they have the same, non-zero arity and every pair
/// of corresponding values is equal. An empty or mismatched-arity comparison
/// is never equal, so a malformed pair of rows cannot pass for a duplicate.
/// Two absent tuples are equal, which lets the first row of a stream be
/// handled like any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TupleComparator {
    null_equality: NullEquality,
}

impl TupleComparator {
    /// Create a comparator with the given NULL handling
    pub fn new(null_equality: NullEquality) -> Self {
        Self { null_equality }
    }

    /// How NULLs of the same type are compared
    pub fn null_equality(&self) -> NullEquality {
        self.null_equality
    }

    /// Whether two single values are equal
    pub fn values_equal(&self, left: &ScalarValue, right: &ScalarValue) -> bool {
        left.eq_with_nulls(right, self.null_equality)
    }

    /// Whether two optional tuples are equal
    pub fn tuples_equal(
        &self,
        left: Option<&[ScalarValue]>,
        right: Option<&[ScalarValue]>,
    ) -> bool {
        match (left, right) {
            (None, None) => true,
            (Some(left), Some(right)) => {
                !left.is_empty()
                    && left.len() == right.len()
                    && left
                        .iter()
                        .zip(right)
                        .all(|(l, r)| self.values_equal(l, r))
            }
            _ => false,
        }
    }
}
