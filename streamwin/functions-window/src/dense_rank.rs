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

//! Defines the physical `dense_rank` stateful window function

use crate::partition::{ArityCheck, PartitionBoundaryDetector};
use log::trace;
use std::any::Any;
use std::mem;
use streamwin_common::arrow::datatypes::DataType;
use streamwin_common::{internal_err, Result, RowSnapshot, ScalarValue, TupleComparator};
use streamwin_expr::{
    RowEvaluator, RowEvaluatorArgs, Signature, StatefulWindowUDFImpl, Volatility,
};

get_or_init_udwf!(
    DenseRank,
    dense_rank,
    "Returns the rank of each row within its partition, without gaps."
);

/// Ranks rows within a partition by their value column. Equal adjacent
/// values share a rank and the next distinct value gets the next integer.
#[derive(Debug)]
pub struct DenseRank {
    signature: Signature,
}

impl DenseRank {
    /// Create a new `dense_rank` function
    pub fn new() -> Self {
        Self {
            signature: Signature::variadic_comparable(2, Volatility::Volatile),
        }
    }
}

impl Default for DenseRank {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulWindowUDFImpl for DenseRank {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "dense_rank"
    }

    fn display_name(&self) -> &str {
        "DenseRank"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn return_type(&self, _arg_types: &[DataType]) -> Result<DataType> {
        Ok(DataType::UInt64)
    }

    fn row_evaluator(&self, args: RowEvaluatorArgs) -> Result<Box<dyn RowEvaluator>> {
        let options = args.options();
        Ok(Box::new(DenseRankEvaluator {
            detector: PartitionBoundaryDetector::new(TupleComparator::new(
                options.null_equality(),
            )),
            arity: ArityCheck::new("DenseRank", args.input_types().len(), options),
            state: DenseRankState::Uninitialized,
        }))
    }
}

/// State for the `dense_rank` evaluator
#[derive(Debug, Default)]
enum DenseRankState {
    #[default]
    Uninitialized,
    Active {
        previous: RowSnapshot,
        /// Rank of the previous row
        rank: u64,
    },
}

#[derive(Debug)]
struct DenseRankEvaluator {
    detector: PartitionBoundaryDetector,
    arity: ArityCheck,
    state: DenseRankState,
}

impl RowEvaluator for DenseRankEvaluator {
    fn evaluate(&mut self, row: &[ScalarValue]) -> Result<ScalarValue> {
        self.arity.check(row)?;
        if row.is_empty() {
            return internal_err!("DenseRank received a row without a value column");
        }
        let rank = match mem::take(&mut self.state) {
            DenseRankState::Uninitialized => 1,
            DenseRankState::Active { previous, rank } => {
                if !self.detector.is_same_group(row, Some(&previous)) {
                    trace!("DenseRank: new partition, rank restarts at 1");
                    1
                } else if self.detector.is_same_value(row, &previous) {
                    rank
                } else {
                    rank + 1
                }
            }
        };
        self.state = DenseRankState::Active {
            previous: RowSnapshot::capture(row),
            rank,
        };
        Ok(ScalarValue::UInt64(Some(rank)))
    }

    fn return_type(&self) -> &DataType {
        &DataType::UInt64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use streamwin_common::config::WindowOptions;
    use streamwin_common::StreamWinError;

    fn row(value: Option<i64>, partition: &str) -> Vec<ScalarValue> {
        vec![
            ScalarValue::Int64(value),
            ScalarValue::Utf8(Some(partition.to_string())),
        ]
    }

    fn ranks(rows: &[Vec<ScalarValue>], options: &WindowOptions) -> Vec<u64> {
        let mut evaluator = dense_rank_udwf()
            .initialize(&[DataType::Int64, DataType::Utf8], options)
            .unwrap();
        rows.iter()
            .map(|row| match evaluator.evaluate(row).unwrap() {
                ScalarValue::UInt64(Some(rank)) => rank,
                other => panic!("unexpected rank {other:?}"),
            })
            .collect()
    }

    #[rstest]
    #[case::ties_and_partition_change(
        vec![row(Some(1), "A"), row(Some(1), "A"), row(Some(2), "A"), row(Some(2), "B")],
        vec![1, 1, 2, 1]
    )]
    #[case::no_gaps(
        vec![row(Some(3), "A"), row(Some(3), "A"), row(Some(3), "A"), row(Some(9), "A")],
        vec![1, 1, 1, 2]
    )]
    #[case::every_value_distinct(
        vec![row(Some(1), "A"), row(Some(2), "A"), row(Some(3), "A")],
        vec![1, 2, 3]
    )]
    #[case::single_row_partitions(
        vec![row(Some(1), "A"), row(Some(1), "B"), row(Some(1), "C")],
        vec![1, 1, 1]
    )]
    #[case::partition_reappears(
        vec![row(Some(1), "A"), row(Some(2), "A"), row(Some(5), "B"), row(Some(7), "A")],
        vec![1, 2, 1, 1]
    )]
    #[case::null_values_tie(
        vec![row(None, "A"), row(None, "A"), row(Some(1), "A")],
        vec![1, 1, 2]
    )]
    fn dense_rank_cases(#[case] rows: Vec<Vec<ScalarValue>>, #[case] expected: Vec<u64>) {
        assert_eq!(ranks(&rows, &WindowOptions::default()), expected);
    }

    #[test]
    fn null_values_distinct_when_configured() {
        let mut options = WindowOptions::default();
        options.null_equals_null = false;
        let rows = vec![row(None, "A"), row(None, "A")];
        assert_eq!(ranks(&rows, &options), vec![1, 2]);
    }

    #[test]
    fn multi_column_partition() {
        let mut evaluator = dense_rank_udwf()
            .initialize(
                &[DataType::Int64, DataType::Utf8, DataType::Int32],
                &WindowOptions::default(),
            )
            .unwrap();
        let rows = [
            (1, "A", 1),
            (1, "A", 1),
            (1, "A", 2),
            (2, "A", 2),
        ];
        let output: Vec<_> = rows
            .iter()
            .map(|(v, p1, p2)| {
                evaluator
                    .evaluate(&[
                        ScalarValue::Int64(Some(*v)),
                        ScalarValue::Utf8(Some(p1.to_string())),
                        ScalarValue::Int32(Some(*p2)),
                    ])
                    .unwrap()
            })
            .collect();
        let expected: Vec<_> = [1, 1, 1, 2]
            .into_iter()
            .map(|r| ScalarValue::UInt64(Some(r)))
            .collect();
        assert_eq!(output, expected);
    }

    #[test]
    fn requires_a_partition_column() {
        let err = dense_rank_udwf()
            .initialize(&[DataType::Int64], &WindowOptions::default())
            .unwrap_err();
        assert!(matches!(err, StreamWinError::Plan(_)));
    }

    #[test]
    fn arity_mismatch_resets_rank() {
        let mut evaluator = dense_rank_udwf()
            .initialize(&[DataType::Int64, DataType::Utf8], &WindowOptions::default())
            .unwrap();
        evaluator.evaluate(&row(Some(1), "A")).unwrap();
        evaluator.evaluate(&row(Some(2), "A")).unwrap();
        let mut wide = row(Some(3), "A");
        wide.push(ScalarValue::Int32(Some(0)));
        assert_eq!(
            evaluator.evaluate(&wide).unwrap(),
            ScalarValue::UInt64(Some(1))
        );
    }

    #[test]
    fn names() {
        let udwf = dense_rank_udwf();
        assert_eq!(udwf.name(), "dense_rank");
        assert_eq!(udwf.display_name(), "DenseRank");
        assert_eq!(
            udwf.return_type(&[DataType::Utf8, DataType::Utf8]).unwrap(),
            DataType::UInt64
        );
    }
}
