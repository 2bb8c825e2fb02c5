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

//! Common functionality shared by the streamwin crates: the [`ScalarValue`]
//! rows are made of, the [`TupleComparator`] and [`RowSnapshot`] stateful
//! window functions use to detect boundaries between adjacent rows, and the
//! error and configuration types.

pub mod compare;
pub mod config;
pub mod error;
pub mod null_equality;
pub mod row;
pub mod scalar;

/// Reexport arrow crate
pub use arrow;
pub use compare::TupleComparator;
pub use error::{GenericError, Result, StreamWinError};
pub use null_equality::NullEquality;
pub use row::{get_row_at_idx, RowSnapshot};
pub use scalar::ScalarValue;

/// Downcast an Arrow Array to a concrete type, return an `StreamWinError::Internal` if the cast is
/// not possible. In normal usage the downcast should always succeed.
///
/// Example: `let array = downcast_value!(values, Int32Array)`
#[macro_export]
macro_rules! downcast_value {
    ($Value: expr, $Type: ident) => {{
        use std::any::type_name;
        $Value.as_any().downcast_ref::<$Type>().ok_or_else(|| {
            $crate::StreamWinError::Internal(format!(
                "could not cast value to {}",
                type_name::<$Type>()
            ))
        })?
    }};
}
