use alloc::string::String;

use hashbrown::HashMap;

/// An owned mapping from variable name to value.
///
/// A snapshot never shares storage with another snapshot. [`Snapshot::duplicate`]
/// performs an eager deep copy, so mutating either side afterwards is
/// invisible to the other.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    vars: HashMap<String, String>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name -> value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Current value of `name`, or `None` when it is unset.
    ///
    /// An unset variable and a variable holding the empty string are
    /// different: the latter returns `Some("")`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Remove `name`. Absent names are a no-op.
    pub fn unset(&mut self, name: &str) {
        self.vars.remove(name);
    }

    /// Number of variables currently mapped to exactly `value`.
    #[must_use]
    pub fn count_equal_to(&self, value: &str) -> usize {
        self.vars.values().filter(|v| v.as_str() == value).count()
    }

    /// A fully detached copy of every entry.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            vars: self
                .vars
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
