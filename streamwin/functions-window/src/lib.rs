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

//! Stateful window functions evaluated in a single pass over sorted rows.
//!
//! Each function keeps only what it needs from the previous row and decides
//! partition boundaries by comparing adjacent rows. The rows of a scan must
//! arrive with every partition as a contiguous run.
//!
//! [`register_all`] adds every function of this crate to a
//! [`FunctionRegistry`].

use log::debug;
use std::sync::Arc;
use streamwin_common::Result;
use streamwin_expr::{FunctionRegistry, StatefulWindowUDF};

#[macro_use]
pub mod macros;

pub mod dense_rank;
pub mod first_value;
pub mod partition;
pub mod row_number;

/// Fluent-style API for creating the stateful window functions
pub mod expr_fn {
    pub use super::dense_rank::dense_rank_udwf;
    pub use super::first_value::{first_value_fixed_udwf, first_value_udwf};
    pub use super::row_number::row_number_udwf;
}

/// Returns all default stateful window functions
pub fn all_default_window_functions() -> Vec<Arc<StatefulWindowUDF>> {
    vec![
        first_value::first_value_udwf(),
        first_value::first_value_fixed_udwf(),
        dense_rank::dense_rank_udwf(),
        row_number::row_number_udwf(),
    ]
}

/// Registers all enabled packages with a [`FunctionRegistry`]
pub fn register_all(registry: &mut dyn FunctionRegistry) -> Result<()> {
    let functions = all_default_window_functions();
    functions.into_iter().try_for_each(|fun| {
        let existing_udwf = registry.register_udwf(fun)?;
        if let Some(existing_udwf) = existing_udwf {
            debug!("Overwrite existing UDWF: {}", existing_udwf.name());
        }
        Ok(()) as Result<()>
    })?;
    Ok(())
}
