use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Option and positional values of one command line, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    values: BTreeMap<String, String>,
}

impl ParsedArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The value of `name`, treating an empty value as absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParsedArgs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ParsedArgs {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Shared handle on the arguments of the command being run.
///
/// Empty until the dispatcher has parsed the command line; clones observe the same values.
#[derive(Debug, Clone, Default)]
pub struct Argv {
    inner: Arc<RwLock<ParsedArgs>>,
}

impl Argv {
    #[must_use]
    pub fn new(args: ParsedArgs) -> Self {
        Argv {
            inner: Arc::new(RwLock::new(args)),
        }
    }

    pub fn set(&self, args: ParsedArgs) {
        *self.inner.write() = args;
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.inner.read().get(name).map(str::to_string)
    }
}
