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

//! Runtime configuration, via [`ConfigOptions`]

use std::collections::HashMap;
use std::fmt::Display;

use log::debug;

use crate::error::{Result, StreamWinError};
use crate::null_equality::NullEquality;
use crate::config_err;

/// A macro that wraps a configuration struct and automatically derives
/// [`Default`] and [`ConfigField`] for it, allowing it to be used
/// in the [`ConfigOptions`] configuration tree
///
/// For example,
///
/// ```ignore
/// config_namespace! {
///    /// Amazing config
///    pub struct MyConfig {
///        /// Field 1 doc
///        field1: String, default = "".to_string()
///
///        /// Field 2 doc
///        field2: usize, default = 232
///    }
///}
/// ```
///
/// NB: Misplaced commas may result in nonsensical errors
macro_rules! config_namespace {
    (
     $(#[doc = $struct_d:tt])*
     $vis:vis struct $struct_name:ident {
        $(
        $(#[doc = $d:tt])*
        $field_vis:vis $field_name:ident : $field_type:ty, default = $default:expr
        )*$(,)*
    }
    ) => {

        $(#[doc = $struct_d])*
        #[derive(Debug, Clone, PartialEq)]
        #[non_exhaustive]
        $vis struct $struct_name{
            $(
            $(#[doc = $d])*
            $field_vis $field_name : $field_type,
            )*
        }

        impl ConfigField for $struct_name {
            fn set(&mut self, key: &str, value: &str) -> Result<()> {
                let (key, rem) = key.split_once('.').unwrap_or((key, ""));
                match key {
                    $(
                       stringify!($field_name) => self.$field_name.set(rem, value),
                    )*
                    _ => config_err!(
                        "Config value \"{}\" not found on {}", key, stringify!($struct_name)
                    )
                }
            }

            fn visit<V: Visit>(&self, v: &mut V, key_prefix: &str, _description: &'static str) {
                $(
                let key = format!(concat!("{}.", stringify!($field_name)), key_prefix);
                let desc = concat!($($d),*).trim();
                self.$field_name.visit(v, key.as_str(), desc);
                )*
            }
        }

        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field_name: $default),*
                }
            }
        }
    }
}

config_namespace! {
    /// Options that change how stateful window functions compare rows
    pub struct WindowOptions {
        /// When set to true, two NULLs of the same type are considered equal when
        /// partition and value columns of adjacent rows are compared, so a run of
        /// NULL partition keys forms one partition
        pub null_equals_null: bool, default = true

        /// When set to true, a row whose number of values differs from the number the
        /// function was initialized with fails the evaluation. When false, the row is
        /// treated as the start of a new partition and a warning is logged once
        pub fail_on_arity_mismatch: bool, default = false
    }
}

impl WindowOptions {
    /// The [`NullEquality`] selected by `null_equals_null`
    pub fn null_equality(&self) -> NullEquality {
        self.null_equals_null.into()
    }
}

/// A key value pair, with a corresponding description
#[derive(Debug)]
pub struct ConfigEntry {
    /// A unique string to identify this config value
    pub key: String,

    /// The value if any
    pub value: Option<String>,

    /// A description of this configuration entry
    pub description: &'static str,
}

/// Configuration options struct, holding every built-in namespace
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct ConfigOptions {
    /// Window function options
    pub window: WindowOptions,
}

impl ConfigField for ConfigOptions {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let (key, rem) = key.split_once('.').unwrap_or((key, ""));
        match key {
            "window" => self.window.set(rem, value),
            _ => config_err!("Config value \"{key}\" not found on ConfigOptions"),
        }
    }

    fn visit<V: Visit>(&self, v: &mut V, _key_prefix: &str, _description: &'static str) {
        self.window.visit(v, "streamwin.window", "");
    }
}

impl ConfigOptions {
    /// Creates a new [`ConfigOptions`] with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration option
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some((prefix, key)) = key.split_once('.') else {
            return config_err!("could not find config namespace for key \"{key}\"");
        };

        if prefix == "streamwin" {
            return ConfigField::set(self, key, value);
        }

        config_err!("Could not find config namespace \"{prefix}\"")
    }

    /// Create new ConfigOptions struct, taking values from
    /// environment variables where possible.
    ///
    /// For example, setting `STREAMWIN_WINDOW_NULL_EQUALS_NULL` will
    /// control `streamwin.window.null_equals_null`.
    pub fn from_env() -> Result<Self> {
        let mut ret = Self::default();
        for key in Self::keys() {
            let env = key.to_uppercase().replace('.', "_");
            if let Some(var) = std::env::var_os(&env) {
                debug!("Setting {key} from environment variable {env}");
                ret.set(&key, var.to_string_lossy().as_ref())?;
            }
        }

        Ok(ret)
    }

    /// Create new ConfigOptions struct, taking values from a string hash map.
    ///
    /// Only the built-in configurations will be extracted from the hash map
    /// and other key value pairs will be ignored.
    pub fn from_string_hash_map(settings: &HashMap<String, String>) -> Result<Self> {
        let mut ret = Self::default();
        for key in Self::keys() {
            if let Some(var) = settings.get(&key) {
                ret.set(&key, var)?;
            }
        }

        Ok(ret)
    }

    /// Returns the [`ConfigEntry`] stored within this [`ConfigOptions`]
    pub fn entries(&self) -> Vec<ConfigEntry> {
        struct Visitor(Vec<ConfigEntry>);

        impl Visit for Visitor {
            fn some<V: Display>(
                &mut self,
                key: &str,
                value: V,
                description: &'static str,
            ) {
                self.0.push(ConfigEntry {
                    key: key.to_string(),
                    value: Some(value.to_string()),
                    description,
                })
            }
        }

        let mut v = Visitor(vec![]);
        self.visit(&mut v, "streamwin", "");
        v.0
    }

    /// The fully qualified names of all built-in options.
    ///
    /// Walking the tree avoids the ambiguity between `a.b` and `a_b`, which
    /// would both correspond to an environment variable of `A_B`
    fn keys() -> Vec<String> {
        struct Visitor(Vec<String>);

        impl Visit for Visitor {
            fn some<V: Display>(&mut self, key: &str, _: V, _: &'static str) {
                self.0.push(key.to_string())
            }
        }

        let mut keys = Visitor(vec![]);
        Self::default().visit(&mut keys, "streamwin", "");
        keys.0
    }
}

/// A trait implemented by every node of the configuration tree, providing
/// the ability to walk and mutate the configuration tree
trait ConfigField {
    fn visit<V: Visit>(&self, v: &mut V, key: &str, description: &'static str);

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

macro_rules! config_field {
    ($t:ty) => {
        impl ConfigField for $t {
            fn visit<V: Visit>(&self, v: &mut V, key: &str, description: &'static str) {
                v.some(key, self, description)
            }

            fn set(&mut self, _: &str, value: &str) -> Result<()> {
                *self = value.parse().map_err(|e| {
                    StreamWinError::Context(
                        format!(concat!("Error parsing {} as ", stringify!($t),), value),
                        Box::new(StreamWinError::External(Box::new(e))),
                    )
                })?;
                Ok(())
            }
        }
    };
}

config_field!(bool);

/// An implementation trait used to recursively walk configuration
trait Visit {
    fn some<V: Display>(&mut self, key: &str, value: V, description: &'static str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ConfigOptions::new();
        assert!(options.window.null_equals_null);
        assert!(!options.window.fail_on_arity_mismatch);
        assert_eq!(options.window.null_equality(), NullEquality::NullEqualsNull);
    }

    #[test]
    fn set_known_key() -> Result<()> {
        let mut options = ConfigOptions::new();
        options.set("streamwin.window.null_equals_null", "false")?;
        assert_eq!(options.window.null_equality(), NullEquality::NullEqualsNothing);
        Ok(())
    }

    #[test]
    fn set_unknown_key_or_bad_value() {
        let mut options = ConfigOptions::new();
        let err = options.set("streamwin.window.nope", "true").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid or Unsupported Configuration: Config value \"nope\" not found on WindowOptions"
        );
        assert!(options.set("other.window.null_equals_null", "true").is_err());
        assert!(options.set("streamwin", "true").is_err());

        let err = options
            .set("streamwin.window.fail_on_arity_mismatch", "maybe")
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Error parsing maybe as bool"));
    }

    #[test]
    fn from_hash_map() -> Result<()> {
        let settings = HashMap::from([
            ("streamwin.window.fail_on_arity_mismatch".to_string(), "true".to_string()),
            ("unrelated.key".to_string(), "1".to_string()),
        ]);
        let options = ConfigOptions::from_string_hash_map(&settings)?;
        assert!(options.window.fail_on_arity_mismatch);
        assert!(options.window.null_equals_null);
        Ok(())
    }

    #[test]
    fn from_env_reads_and_validates() -> Result<()> {
        // no other test touches the STREAMWIN_WINDOW_* variables
        std::env::set_var("STREAMWIN_WINDOW_FAIL_ON_ARITY_MISMATCH", "true");
        let options = ConfigOptions::from_env()?;
        assert!(options.window.fail_on_arity_mismatch);
        assert!(options.window.null_equals_null);

        std::env::set_var("STREAMWIN_WINDOW_NULL_EQUALS_NULL", "maybe");
        let err = ConfigOptions::from_env().unwrap_err();
        assert!(matches!(err, StreamWinError::Context(_, _)));
        assert!(err.to_string().starts_with("Error parsing maybe as bool"));

        std::env::remove_var("STREAMWIN_WINDOW_NULL_EQUALS_NULL");
        std::env::remove_var("STREAMWIN_WINDOW_FAIL_ON_ARITY_MISMATCH");
        assert_eq!(ConfigOptions::from_env()?, ConfigOptions::new());
        Ok(())
    }

    #[test]
    fn entries_describe_every_option() {
        let entries = ConfigOptions::new().entries();
        let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "streamwin.window.null_equals_null",
                "streamwin.window.fail_on_arity_mismatch"
            ]
        );
        assert_eq!(entries[0].value.as_deref(), Some("true"));
        assert!(entries[1].description.starts_with("When set to true, a row"));
    }
}
