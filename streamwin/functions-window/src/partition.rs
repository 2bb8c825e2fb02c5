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

//! Detecting partition and value boundaries between adjacent rows

use log::warn;
use streamwin_common::config::WindowOptions;
use streamwin_common::{exec_err, Result, RowSnapshot, ScalarValue, TupleComparator};

/// Decides, from two adjacent rows only, whether a new partition starts.
///
/// Value 0 of a row is the value column; values `1..` are the partition
/// columns. Only the partition columns decide group membership. Partitions
/// are chains of equal adjacent keys: every row is compared against the row
/// immediately before it, never against the first row of its partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionBoundaryDetector {
    comparator: TupleComparator,
}

impl PartitionBoundaryDetector {
    /// Create a detector comparing values with `comparator`
    pub fn new(comparator: TupleComparator) -> Self {
        Self { comparator }
    }

    /// Whether `current` belongs to the same partition as `previous`.
    ///
    /// Without a previous row this is `true`; callers tell the first row
    /// apart through their own state. Rows of different arity are never in
    /// the same group. Rows that have no partition columns all belong to one
    /// stream-wide group.
    pub fn is_same_group(
        &self,
        current: &[ScalarValue],
        previous: Option<&RowSnapshot>,
    ) -> bool {
        let Some(previous) = previous else {
            return true;
        };
        let previous = previous.values();
        if current.is_empty() || current.len() != previous.len() {
            return false;
        }
        if current.len() == 1 {
            return true;
        }
        self.comparator
            .tuples_equal(Some(&current[1..]), Some(&previous[1..]))
    }

    /// Whether the value column of `current` equals the one of `previous`.
    /// Rows of different arity never have the same value.
    pub fn is_same_value(&self, current: &[ScalarValue], previous: &RowSnapshot) -> bool {
        let previous = previous.values();
        match (current.first(), previous.first()) {
            (Some(c), Some(p)) if current.len() == previous.len() => {
                self.comparator.values_equal(c, p)
            }
            _ => false,
        }
    }
}

/// Watches the arity of incoming rows against the arity a function was
/// initialized with. A mismatch is reported once per evaluator: as a warning,
/// or as an error when `fail_on_arity_mismatch` is set.
#[derive(Debug)]
pub(crate) struct ArityCheck {
    function: &'static str,
    expected: usize,
    fail_on_mismatch: bool,
    reported: bool,
}

impl ArityCheck {
    pub(crate) fn new(function: &'static str, expected: usize, options: &WindowOptions) -> Self {
        Self {
            function,
            expected,
            fail_on_mismatch: options.fail_on_arity_mismatch,
            reported: false,
        }
    }

    pub(crate) fn check(&mut self, row: &[ScalarValue]) -> Result<()> {
        if row.len() == self.expected {
            return Ok(());
        }
        if self.fail_on_mismatch {
            return exec_err!(
                "{} was initialized with {} argument(s) but received a row of {} value(s)",
                self.function,
                self.expected,
                row.len()
            );
        }
        if !self.reported {
            warn!(
                "{} was initialized with {} argument(s) but received a row of {} value(s); \
                 treating it as the start of a new partition",
                self.function,
                self.expected,
                row.len()
            );
            self.reported = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamwin_common::{NullEquality, StreamWinError};

    fn row(value: i64, partition: &[&str]) -> Vec<ScalarValue> {
        std::iter::once(ScalarValue::Int64(Some(value)))
            .chain(partition.iter().map(|p| ScalarValue::Utf8(Some(p.to_string()))))
            .collect()
    }

    #[test]
    fn first_row_is_same_group() {
        let detector = PartitionBoundaryDetector::default();
        assert!(detector.is_same_group(&row(1, &["A"]), None));
    }

    #[test]
    fn value_column_is_not_a_grouping_key() {
        let detector = PartitionBoundaryDetector::default();
        let previous = RowSnapshot::capture(&row(1, &["A", "x"]));
        assert!(detector.is_same_group(&row(2, &["A", "x"]), Some(&previous)));
        assert!(!detector.is_same_group(&row(1, &["A", "y"]), Some(&previous)));
        assert!(!detector.is_same_value(&row(2, &["A", "x"]), &previous));
        assert!(detector.is_same_value(&row(1, &["B", "z"]), &previous));
    }

    #[test]
    fn arity_mismatch_is_a_different_group() {
        let detector = PartitionBoundaryDetector::default();
        let previous = RowSnapshot::capture(&row(1, &["A"]));
        assert!(!detector.is_same_group(&row(1, &["A", "B"]), Some(&previous)));
        assert!(!detector.is_same_value(&row(1, &["A", "B"]), &previous));
        assert!(!detector.is_same_group(&[], Some(&previous)));
    }

    #[test]
    fn no_partition_columns_is_one_group() {
        let detector = PartitionBoundaryDetector::default();
        let previous = RowSnapshot::capture(&row(1, &[]));
        assert!(detector.is_same_group(&row(2, &[]), Some(&previous)));
    }

    #[test]
    fn null_partition_keys() {
        let null_row = vec![ScalarValue::Int64(Some(1)), ScalarValue::Utf8(None)];
        let previous = RowSnapshot::capture(&null_row);

        let detector = PartitionBoundaryDetector::default();
        assert!(detector.is_same_group(&null_row, Some(&previous)));

        let detector = PartitionBoundaryDetector::new(TupleComparator::new(
            NullEquality::NullEqualsNothing,
        ));
        assert!(!detector.is_same_group(&null_row, Some(&previous)));
    }

    #[test]
    fn arity_check_warns_once_or_fails() {
        let mut check = ArityCheck::new("f", 2, &WindowOptions::default());
        assert!(check.check(&row(1, &["A"])).is_ok());
        assert!(check.check(&row(1, &[])).is_ok());
        assert!(check.reported);

        let mut options = WindowOptions::default();
        options.fail_on_arity_mismatch = true;
        let mut check = ArityCheck::new("f", 2, &options);
        assert!(check.check(&row(1, &["A"])).is_ok());
        let err = check.check(&row(1, &[])).unwrap_err();
        assert!(matches!(err, StreamWinError::Execution(_)));
    }
}
