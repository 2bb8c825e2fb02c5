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

//! Definitions of stateful window functions for streamwin: the
//! [`StatefulWindowUDF`] a function is registered as, the [`Signature`] its
//! arguments are checked against, and the [`RowEvaluator`] that carries its
//! running state from one row to the next.

pub mod registry;
mod row_evaluator;
pub mod signature;
mod udwf;

pub use registry::{FunctionRegistry, MemoryFunctionRegistry};
pub use row_evaluator::{RowEvaluator, RowEvaluatorArgs};
pub use signature::{Signature, TypeSignature, Volatility};
pub use udwf::{StatefulWindowUDF, StatefulWindowUDFImpl};
