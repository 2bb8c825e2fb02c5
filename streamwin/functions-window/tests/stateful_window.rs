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

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use streamwin_common::arrow::array::{
    Array, ArrayRef, DictionaryArray, Int64Array, StringArray, UInt64Array,
};
use streamwin_common::arrow::datatypes::{DataType, Int32Type};
use streamwin_common::config::ConfigOptions;
use streamwin_common::Result;
use streamwin_expr::{FunctionRegistry, MemoryFunctionRegistry, StatefulWindowUDF};
use streamwin_functions_window::register_all;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    // enable logging so RUST_LOG works
    let _ = env_logger::try_init();
}

fn registry() -> Result<MemoryFunctionRegistry> {
    let mut registry = MemoryFunctionRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

fn data_types(columns: &[ArrayRef]) -> Vec<DataType> {
    columns.iter().map(|c| c.data_type().clone()).collect()
}

/// Evaluates `udwf` over `columns` in batches of `batch_size` rows
fn evaluate_batched(
    udwf: &Arc<StatefulWindowUDF>,
    columns: &[ArrayRef],
    num_rows: usize,
    batch_size: usize,
) -> Result<Vec<ArrayRef>> {
    let options = ConfigOptions::new();
    let mut evaluator = udwf.initialize(&data_types(columns), &options.window)?;
    let mut results = vec![];
    let mut offset = 0;
    while offset < num_rows {
        let len = batch_size.min(num_rows - offset);
        let batch: Vec<ArrayRef> = columns.iter().map(|c| c.slice(offset, len)).collect();
        results.push(evaluator.evaluate_all(&batch, len)?);
        offset += len;
    }
    Ok(results)
}

fn u64_values(arrays: &[ArrayRef]) -> Vec<u64> {
    arrays
        .iter()
        .flat_map(|a| {
            a.as_any()
                .downcast_ref::<UInt64Array>()
                .unwrap()
                .values()
                .to_vec()
        })
        .collect()
}

fn i64_values(arrays: &[ArrayRef]) -> Vec<Option<i64>> {
    arrays
        .iter()
        .flat_map(|a| {
            a.as_any()
                .downcast_ref::<Int64Array>()
                .unwrap()
                .iter()
                .collect::<Vec<_>>()
        })
        .collect()
}

fn sample_columns() -> Vec<ArrayRef> {
    vec![
        Arc::new(Int64Array::from(vec![10, 20, 20, 5, 5, 8])),
        Arc::new(StringArray::from(vec!["A", "A", "A", "B", "B", "B"])),
    ]
}

#[test]
fn registry_lookup() -> Result<()> {
    let registry = registry()?;
    let mut names: Vec<_> = registry.udwfs().into_iter().collect();
    names.sort();
    assert_eq!(
        names,
        vec!["dense_rank", "first_value", "first_value_fixed", "row_number"]
    );
    assert_eq!(registry.udwf("dense_rank")?.display_name(), "DenseRank");
    let err = registry.udwf("lag").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error during planning: There is no UDWF named \"lag\" in the registry"
    );
    Ok(())
}

#[test]
fn register_all_twice_overwrites() -> Result<()> {
    let mut registry = registry()?;
    register_all(&mut registry)?;
    assert_eq!(registry.udwfs().len(), 4);
    assert!(registry.deregister_udwf("row_number")?.is_some());
    assert!(registry.udwf("row_number").is_err());
    Ok(())
}

#[test]
fn first_value_over_arrays() -> Result<()> {
    let registry = registry()?;
    let columns = sample_columns();
    let output = evaluate_batched(&registry.udwf("first_value")?, &columns, 6, 6)?;
    assert_eq!(
        i64_values(&output),
        vec![Some(10), Some(10), Some(10), Some(5), Some(5), Some(5)]
    );
    Ok(())
}

#[test]
fn dense_rank_over_arrays() -> Result<()> {
    let registry = registry()?;
    let columns = sample_columns();
    let output = evaluate_batched(&registry.udwf("dense_rank")?, &columns, 6, 6)?;
    assert_eq!(u64_values(&output), vec![1, 2, 2, 1, 1, 2]);
    Ok(())
}

#[test]
fn row_number_over_arrays() -> Result<()> {
    let registry = registry()?;
    let output = evaluate_batched(&registry.udwf("row_number")?, &[], 5, 2)?;
    assert_eq!(output.len(), 3);
    assert_eq!(u64_values(&output), vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[test]
fn batch_boundaries_do_not_reset_state() -> Result<()> {
    let registry = registry()?;
    let columns = sample_columns();
    for name in ["first_value", "dense_rank"] {
        let udwf = registry.udwf(name)?;
        let whole = evaluate_batched(&udwf, &columns, 6, 6)?;
        for batch_size in 1..6 {
            let split = evaluate_batched(&udwf, &columns, 6, batch_size)?;
            let whole_values: Vec<_> = whole.iter().flat_map(scalar_strings).collect();
            let split_values: Vec<_> = split.iter().flat_map(scalar_strings).collect();
            assert_eq!(whole_values, split_values, "{name} with batch size {batch_size}");
        }
    }
    Ok(())
}

fn scalar_strings(array: &ArrayRef) -> Vec<String> {
    (0..array.len())
        .map(|i| {
            streamwin_common::ScalarValue::try_from_array(array.as_ref(), i)
                .unwrap()
                .to_string()
        })
        .collect()
}

#[test]
fn dictionary_value_column() -> Result<()> {
    let registry = registry()?;
    let values: DictionaryArray<Int32Type> = vec!["x", "y", "y", "z"].into_iter().collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(values),
        Arc::new(StringArray::from(vec!["A", "A", "B", "B"])),
    ];

    let resolved = evaluate_batched(&registry.udwf("first_value")?, &columns, 4, 4)?;
    assert_eq!(resolved[0].data_type(), &DataType::Utf8);
    let resolved = resolved[0].as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(
        resolved.iter().collect::<Vec<_>>(),
        vec![Some("x"), Some("x"), Some("y"), Some("y")]
    );

    let fixed = evaluate_batched(&registry.udwf("first_value_fixed")?, &columns, 4, 4)?;
    assert_eq!(fixed[0].data_type(), columns[0].data_type());
    assert_eq!(fixed[0].len(), 4);
    Ok(())
}

#[test]
fn null_partition_keys_from_config() -> Result<()> {
    let registry = registry()?;
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(vec![1, 1, 2])),
        Arc::new(StringArray::from(vec![None::<&str>, None, None])),
    ];
    let dense_rank = registry.udwf("dense_rank")?;

    let mut options = ConfigOptions::new();
    let mut evaluator = dense_rank.initialize(&data_types(&columns), &options.window)?;
    let output = evaluator.evaluate_all(&columns, 3)?;
    assert_eq!(u64_values(&[output]), vec![1, 1, 2]);

    options.set("streamwin.window.null_equals_null", "false")?;
    let mut evaluator = dense_rank.initialize(&data_types(&columns), &options.window)?;
    let output = evaluator.evaluate_all(&columns, 3)?;
    assert_eq!(u64_values(&[output]), vec![1, 1, 1]);
    Ok(())
}

#[test]
fn arity_mismatch_fails_when_configured() -> Result<()> {
    let registry = registry()?;
    let mut options = ConfigOptions::new();
    options.set("streamwin.window.fail_on_arity_mismatch", "true")?;
    let columns = sample_columns();
    let mut evaluator = registry
        .udwf("first_value")?
        .initialize(&data_types(&columns), &options.window)?;
    let err = evaluator.evaluate_all(&columns[..1], 1).unwrap_err();
    assert!(err
        .to_string()
        .contains("FirstValue was initialized with 2 argument(s) but received a row of 1 value(s)"));
    Ok(())
}

/// Sorted rows of `(partition, value)` with a few NULL values
fn random_rows(rng: &mut StdRng, num_rows: usize) -> Vec<(i64, Option<i64>)> {
    let mut rows: Vec<_> = (0..num_rows)
        .map(|_| {
            let partition = rng.gen_range(0..8);
            let value = if rng.gen_range(0..10) == 0 {
                None
            } else {
                Some(rng.gen_range(-5..5))
            };
            (partition, value)
        })
        .collect();
    rows.sort();
    rows
}

/// Computes first_value and dense_rank with each partition in hand
fn reference(rows: &[(i64, Option<i64>)]) -> (Vec<Option<i64>>, Vec<u64>) {
    let mut first_values = vec![];
    let mut ranks = vec![];
    let mut start = 0;
    while start < rows.len() {
        let partition = rows[start].0;
        let end = rows[start..]
            .iter()
            .position(|(p, _)| *p != partition)
            .map_or(rows.len(), |len| start + len);
        let group = &rows[start..end];
        let mut distinct: Vec<_> = group.iter().map(|(_, v)| *v).collect();
        distinct.dedup();
        for (_, value) in group {
            first_values.push(group[0].1);
            let rank = distinct.iter().position(|d| d == value).unwrap_or(0) as u64 + 1;
            ranks.push(rank);
        }
        start = end;
    }
    (first_values, ranks)
}

#[test]
fn randomized_against_whole_partition_reference() -> Result<()> {
    let registry = registry()?;
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let num_rows = rng.gen_range(1..200);
        let batch_size = rng.gen_range(1..=num_rows);
        let rows = random_rows(&mut rng, num_rows);
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(
                rows.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            )),
        ];
        let (expected_first, expected_rank) = reference(&rows);

        let first =
            evaluate_batched(&registry.udwf("first_value")?, &columns, num_rows, batch_size)?;
        assert_eq!(i64_values(&first), expected_first);

        let rank =
            evaluate_batched(&registry.udwf("dense_rank")?, &columns, num_rows, batch_size)?;
        assert_eq!(u64_values(&rank), expected_rank);

        let row_number =
            evaluate_batched(&registry.udwf("row_number")?, &[], num_rows, batch_size)?;
        assert_eq!(
            u64_values(&row_number),
            (1..=num_rows as u64).collect::<Vec<_>>()
        );
    }
    Ok(())
}
