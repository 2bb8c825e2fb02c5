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

//! FunctionRegistry trait

use crate::StatefulWindowUDF;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use streamwin_common::{plan_err, Result};

/// A registry knows how to look up stateful window functions by name
pub trait FunctionRegistry {
    /// Set of all available window functions
    fn udwfs(&self) -> HashSet<String>;

    /// Returns a reference to the window function named `name`.
    fn udwf(&self, name: &str) -> Result<Arc<StatefulWindowUDF>>;

    /// Registers a new [`StatefulWindowUDF`], returning any previously registered
    /// implementation.
    ///
    /// Returns an error if this registry does not support registering
    /// functions.
    fn register_udwf(
        &mut self,
        udwf: Arc<StatefulWindowUDF>,
    ) -> Result<Option<Arc<StatefulWindowUDF>>>;

    /// Deregisters a [`StatefulWindowUDF`], returning the implementation that
    /// was deregistered.
    fn deregister_udwf(&mut self, name: &str) -> Result<Option<Arc<StatefulWindowUDF>>>;
}

/// A  [`FunctionRegistry`] that uses in memory [`HashMap`]s
#[derive(Default, Debug)]
pub struct MemoryFunctionRegistry {
    /// Window functions, keyed by name and by every alias
    udwfs: HashMap<String, Arc<StatefulWindowUDF>>,
}

impl MemoryFunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

impl FunctionRegistry for MemoryFunctionRegistry {
    fn udwfs(&self) -> HashSet<String> {
        self.udwfs.keys().cloned().collect()
    }

    fn udwf(&self, name: &str) -> Result<Arc<StatefulWindowUDF>> {
        match self.udwfs.get(name) {
            Some(udwf) => Ok(Arc::clone(udwf)),
            None => plan_err!("There is no UDWF named \"{name}\" in the registry"),
        }
    }

    fn register_udwf(
        &mut self,
        udwf: Arc<StatefulWindowUDF>,
    ) -> Result<Option<Arc<StatefulWindowUDF>>> {
        udwf.aliases().iter().for_each(|alias| {
            self.udwfs.insert(alias.clone(), Arc::clone(&udwf));
        });
        Ok(self.udwfs.insert(udwf.name().to_string(), udwf))
    }

    fn deregister_udwf(&mut self, name: &str) -> Result<Option<Arc<StatefulWindowUDF>>> {
        let removed = self.udwfs.remove(name);
        if let Some(udwf) = &removed {
            for alias in udwf.aliases() {
                self.udwfs.remove(alias);
            }
            self.udwfs.remove(udwf.name());
        }
        Ok(removed)
    }
}
