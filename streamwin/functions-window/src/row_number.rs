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

//! Defines the physical `row_number` stateful window function

use std::any::Any;
use std::sync::Arc;
use streamwin_common::arrow::array::{ArrayRef, UInt64Array};
use streamwin_common::arrow::datatypes::DataType;
use streamwin_common::{Result, ScalarValue};
use streamwin_expr::{
    RowEvaluator, RowEvaluatorArgs, Signature, StatefulWindowUDFImpl, Volatility,
};

get_or_init_udwf!(
    RowNumber,
    row_number,
    "Returns a running count of the rows seen so far, starting at 1."
);

/// Numbers rows in the order they arrive. The counter never resets: it
/// does not look at partitions.
#[derive(Debug)]
pub struct RowNumber {
    signature: Signature,
}

impl RowNumber {
    /// Create a new `row_number` function
    pub fn new() -> Self {
        Self {
            signature: Signature::nullary(Volatility::Volatile),
        }
    }
}

impl Default for RowNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulWindowUDFImpl for RowNumber {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        "row_number"
    }

    fn display_name(&self) -> &str {
        "RowNumber"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn return_type(&self, _arg_types: &[DataType]) -> Result<DataType> {
        Ok(DataType::UInt64)
    }

    fn row_evaluator(&self, _args: RowEvaluatorArgs) -> Result<Box<dyn RowEvaluator>> {
        Ok(Box::<NumRowsEvaluator>::default())
    }
}

#[derive(Debug, Default)]
struct NumRowsEvaluator {
    n_rows: u64,
}

impl RowEvaluator for NumRowsEvaluator {
    fn evaluate(&mut self, _row: &[ScalarValue]) -> Result<ScalarValue> {
        self.n_rows += 1;
        Ok(ScalarValue::UInt64(Some(self.n_rows)))
    }

    fn return_type(&self) -> &DataType {
        &DataType::UInt64
    }

    fn evaluate_all(&mut self, _values: &[ArrayRef], num_rows: usize) -> Result<ArrayRef> {
        let start = self.n_rows;
        self.n_rows += num_rows as u64;
        Ok(Arc::new(UInt64Array::from_iter_values(
            start + 1..=self.n_rows,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamwin_common::arrow::array::Array;
    use streamwin_common::config::WindowOptions;
    use streamwin_common::StreamWinError;

    #[test]
    fn row_number_all_rows() -> Result<()> {
        let mut evaluator = row_number_udwf().initialize(&[], &WindowOptions::default())?;
        let output = (0..5)
            .map(|_| evaluator.evaluate(&[]))
            .collect::<Result<Vec<_>>>()?;
        let expected: Vec<_> = (1..=5).map(|n| ScalarValue::UInt64(Some(n))).collect();
        assert_eq!(output, expected);
        Ok(())
    }

    #[test]
    fn ignores_partition_values() -> Result<()> {
        let mut evaluator = row_number_udwf().initialize(&[], &WindowOptions::default())?;
        evaluator.evaluate(&[ScalarValue::Utf8(Some("A".to_string()))])?;
        let second = evaluator.evaluate(&[ScalarValue::Utf8(Some("B".to_string()))])?;
        assert_eq!(second, ScalarValue::UInt64(Some(2)));
        Ok(())
    }

    #[test]
    fn evaluate_all_continues_the_count() -> Result<()> {
        let mut evaluator = row_number_udwf().initialize(&[], &WindowOptions::default())?;
        evaluator.evaluate(&[])?;
        let result = evaluator.evaluate_all(&[], 3)?;
        let result = result.as_any().downcast_ref::<UInt64Array>().unwrap();
        assert_eq!(result.values().to_vec(), vec![2, 3, 4]);
        assert_eq!(result.null_count(), 0);

        let empty = evaluator.evaluate_all(&[], 0)?;
        assert_eq!(empty.len(), 0);
        assert_eq!(evaluator.evaluate(&[])?, ScalarValue::UInt64(Some(5)));
        Ok(())
    }

    #[test]
    fn rejects_arguments() {
        let err = row_number_udwf()
            .initialize(&[DataType::Int64], &WindowOptions::default())
            .unwrap_err();
        assert!(matches!(err, StreamWinError::Plan(_)));
    }

    #[test]
    fn names() {
        let udwf = row_number_udwf();
        assert_eq!(udwf.name(), "row_number");
        assert_eq!(udwf.display_name(), "RowNumber");
    }
}
