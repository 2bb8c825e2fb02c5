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

//! Convenience macros for defining a stateful window function
//!
//! See [`get_or_init_udwf!`] for usage examples.
//!
//! [`get_or_init_udwf!`]: crate::get_or_init_udwf!

/// Lazily initializes a stateful window function exactly once
/// when called concurrently. Repeated calls return a reference
/// to the same instance.
///
/// # Parameters
///
/// * `$UDWF`: The struct which defines the [`StatefulWindowUDFImpl`]
///   of the stateful window function.
/// * `$OUT_FN_NAME`: The basename to generate a unique function name like
///   `$OUT_FN_NAME_udwf`.
/// * `$DOC`: Doc comments for the accessor.
/// * (optional) `$CTOR`: Pass a custom constructor. When omitted it
///   automatically resolves to `$UDWF::default()`.
///
/// # Example
///
/// ```
/// # use std::any::Any;
/// # use streamwin_common::arrow::datatypes::DataType;
/// # use streamwin_common::{Result, ScalarValue};
/// # use streamwin_expr::{RowEvaluator, RowEvaluatorArgs, Signature, Volatility};
/// # use streamwin_expr::StatefulWindowUDFImpl;
/// # use streamwin_functions_window::get_or_init_udwf;
/// #
/// /// Defines the `simple_udwf()` accessor which returns a singleton
/// /// instance of the `SimpleUDWF` function.
/// get_or_init_udwf!(
///     SimpleUDWF,
///     simple,
///     "Simple stateful window function doc comment string."
/// );
///
/// #[derive(Debug)]
/// pub struct SimpleUDWF {
///     signature: Signature,
/// }
///
/// impl Default for SimpleUDWF {
///     fn default() -> Self {
///         Self {
///             signature: Signature::nullary(Volatility::Volatile),
///         }
///     }
/// }
///
/// impl StatefulWindowUDFImpl for SimpleUDWF {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///     fn name(&self) -> &str {
///         "simple"
///     }
///     fn display_name(&self) -> &str {
///         "Simple"
///     }
///     fn signature(&self) -> &Signature {
///         &self.signature
///     }
///     fn return_type(&self, _arg_types: &[DataType]) -> Result<DataType> {
///         Ok(DataType::Null)
///     }
///     fn row_evaluator(
///         &self,
///         _args: RowEvaluatorArgs,
///     ) -> Result<Box<dyn RowEvaluator>> {
///         unimplemented!()
///     }
/// }
///
/// assert_eq!(simple_udwf().name(), "simple");
/// ```
///
/// [`StatefulWindowUDFImpl`]: streamwin_expr::StatefulWindowUDFImpl
#[macro_export]
macro_rules! get_or_init_udwf {
    ($UDWF:ident, $OUT_FN_NAME:ident, $DOC:expr) => {
        get_or_init_udwf!($UDWF, $OUT_FN_NAME, $DOC, $UDWF::default);
    };

    ($UDWF:ident, $OUT_FN_NAME:ident, $DOC:expr, $CTOR:path) => {
        paste::paste! {
            #[doc = concat!(" Singleton instance of [`", stringify!($OUT_FN_NAME), "`], ensures the")]
            #[doc = concat!(" stateful window function is only created once.")]
            #[allow(non_upper_case_globals)]
            static [<STATIC_ $OUT_FN_NAME:upper>]: std::sync::OnceLock<std::sync::Arc<streamwin_expr::StatefulWindowUDF>> =
                std::sync::OnceLock::new();

            #[doc = concat!(" Returns a [`StatefulWindowUDF`](streamwin_expr::StatefulWindowUDF) for [`", stringify!($OUT_FN_NAME), "`].")]
            #[doc = ""]
            #[doc = concat!(" ", $DOC)]
            pub fn [<$OUT_FN_NAME _udwf>]() -> std::sync::Arc<streamwin_expr::StatefulWindowUDF> {
                [<STATIC_ $OUT_FN_NAME:upper>]
                    .get_or_init(|| {
                        std::sync::Arc::new(streamwin_expr::StatefulWindowUDF::from($CTOR()))
                    })
                    .clone()
            }
        }
    };
}
