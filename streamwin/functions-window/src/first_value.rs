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

//! Defines the physical `first_value` stateful window function

use crate::partition::{ArityCheck, PartitionBoundaryDetector};
use log::trace;
use std::any::Any;
use std::mem;
use streamwin_common::arrow::datatypes::DataType;
use streamwin_common::{
    internal_err, plan_err, Result, RowSnapshot, ScalarValue, TupleComparator,
};
use streamwin_expr::{
    RowEvaluator, RowEvaluatorArgs, Signature, StatefulWindowUDFImpl, Volatility,
};

get_or_init_udwf!(
    FirstValue,
    first_value,
    "Returns the first value of the current partition, resolving dictionary \
     encoded input to its value type.",
    FirstValue::resolved_type
);
get_or_init_udwf!(
    FirstValue,
    first_value_fixed,
    "Returns the first value of the current partition, typed exactly as the \
     declared value column.",
    FirstValue::fixed_type
);

/// How [`FirstValue`] derives its output type from the value column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirstValueKind {
    /// Output keeps the declared type of the value column. Only batch output
    /// is re-encoded: per row, a dictionary encoded column still yields
    /// scalars of its value type
    FixedType,
    /// Output is the value type resolved from the value column, so that
    /// values of a dictionary encoded column come out as plain values
    ResolvedType,
}

/// Emits, for every row, the value column of the first row of its partition
#[derive(Debug)]
pub struct FirstValue {
    signature: Signature,
    kind: FirstValueKind,
}

impl FirstValue {
    /// Create a new `first_value` function
    pub fn new(kind: FirstValueKind) -> Self {
        Self {
            signature: Signature::variadic_comparable(1, Volatility::Volatile),
            kind,
        }
    }

    pub fn fixed_type() -> Self {
        Self::new(FirstValueKind::FixedType)
    }

    pub fn resolved_type() -> Self {
        Self::new(FirstValueKind::ResolvedType)
    }

    pub fn kind(&self) -> FirstValueKind {
        self.kind
    }
}

impl Default for FirstValue {
    fn default() -> Self {
        Self::resolved_type()
    }
}

fn resolve_value_type(data_type: &DataType) -> DataType {
    match data_type {
        DataType::Dictionary(_, value_type) => resolve_value_type(value_type),
        other => other.clone(),
    }
}

impl StatefulWindowUDFImpl for FirstValue {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn name(&self) -> &str {
        match self.kind {
            FirstValueKind::FixedType => "first_value_fixed",
            FirstValueKind::ResolvedType => "first_value",
        }
    }

    fn display_name(&self) -> &str {
        "FirstValue"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn return_type(&self, arg_types: &[DataType]) -> Result<DataType> {
        let Some(value_type) = arg_types.first() else {
            return plan_err!("{} requires a value argument", self.name());
        };
        Ok(match self.kind {
            FirstValueKind::FixedType => value_type.clone(),
            FirstValueKind::ResolvedType => resolve_value_type(value_type),
        })
    }

    fn row_evaluator(&self, args: RowEvaluatorArgs) -> Result<Box<dyn RowEvaluator>> {
        if args.input_types().is_empty() {
            return internal_err!("{} initialized without arguments", self.name());
        }
        let options = args.options();
        Ok(Box::new(FirstValueEvaluator {
            detector: PartitionBoundaryDetector::new(TupleComparator::new(
                options.null_equality(),
            )),
            arity: ArityCheck::new("FirstValue", args.input_types().len(), options),
            return_type: args.return_type().clone(),
            state: FirstValueState::Uninitialized,
        }))
    }
}

#[derive(Debug, Default)]
enum FirstValueState {
    #[default]
    Uninitialized,
    Active {
        previous: RowSnapshot,
        first: ScalarValue,
    },
}

#[derive(Debug)]
struct FirstValueEvaluator {
    detector: PartitionBoundaryDetector,
    arity: ArityCheck,
    return_type: DataType,
    state: FirstValueState,
}

impl RowEvaluator for FirstValueEvaluator {
    fn evaluate(&mut self, row: &[ScalarValue]) -> Result<ScalarValue> {
        self.arity.check(row)?;
        let Some(value) = row.first() else {
            return internal_err!("FirstValue received a row without a value column");
        };
        let first = match mem::take(&mut self.state) {
            FirstValueState::Active { previous, first }
                if self.detector.is_same_group(row, Some(&previous)) =>
            {
                first
            }
            FirstValueState::Active { .. } => {
                trace!("FirstValue: new partition starts at {value}");
                value.clone()
            }
            FirstValueState::Uninitialized => value.clone(),
        };
        self.state = FirstValueState::Active {
            previous: RowSnapshot::capture(row),
            first: first.clone(),
        };
        Ok(first)
    }

    fn return_type(&self) -> &DataType {
        &self.return_type
    }
}
