use crate::error::{Result, WedlotError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Names used when nothing has been persisted yet.
pub const DEFAULT_NAMES: [&str; 20] = [
    "张三", "李四", "王五", "赵六", "钱七", "孙八", "周九", "吴十", "郑十一", "王十二",
    "冯十三", "陈十四", "褚十五", "卫十六", "蒋十七", "沈十八", "韩十九", "杨二十",
    "朱二十一", "秦二十二",
];

/// Where a loaded list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Persisted,
    Default,
    Error,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Persisted => "persisted",
            DataSource::Default => "default",
            DataSource::Error => "error",
        }
    }
}

/// Trims every entry and drops blanks and repeats, keeping first occurrences.
fn normalize<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Ordered, unique participant names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamePool(Vec<String>);

impl NamePool {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn defaults() -> Self {
        Self::from_raw(DEFAULT_NAMES)
    }

    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(normalize(raw))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    fn checked_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WedlotError::invalid_input("Name cannot be blank"));
        }
        Ok(name.to_string())
    }

    /// Appends a new name, returning the stored (trimmed) form.
    pub fn add(&mut self, name: &str) -> Result<String> {
        let name = Self::checked_name(name)?;
        if self.contains(&name) {
            return Err(WedlotError::DuplicateName { name });
        }
        self.0.push(name.clone());
        Ok(name)
    }

    /// Replaces the name at `index`, returning the previous value.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<String> {
        let len = self.0.len();
        if index >= len {
            return Err(WedlotError::IndexOutOfRange { index, len });
        }

        let name = Self::checked_name(name)?;
        let clashes = self
            .0
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && *existing == name);
        if clashes {
            return Err(WedlotError::DuplicateName { name });
        }

        Ok(std::mem::replace(&mut self.0[index], name))
    }

    pub fn remove(&mut self, index: usize) -> Result<String> {
        let len = self.0.len();
        if index >= len {
            return Err(WedlotError::IndexOutOfRange { index, len });
        }
        Ok(self.0.remove(index))
    }

    /// Case-insensitive substring search; yields original positions.
    pub fn search(&self, term: &str) -> Vec<(usize, &str)> {
        let needle = term.trim().to_lowercase();
        self.0
            .iter()
            .enumerate()
            .filter(|(_, name)| name.to_lowercase().contains(&needle))
            .map(|(i, name)| (i, name.as_str()))
            .collect()
    }

    /// Pool entries that have not won yet, in pool order.
    pub fn eligible(&self, ledger: &WinnerLedger) -> Vec<String> {
        let won: HashSet<&str> = ledger.iter().map(String::as_str).collect();
        self.0
            .iter()
            .filter(|name| !won.contains(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Ordered history of names that already won. Never holds a name twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinnerLedger(Vec<String>);

impl WinnerLedger {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(normalize(raw))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    /// Appends the names not already present, in submitted order.
    /// Returns the names that were actually added.
    pub fn merge<I, S>(&mut self, new_winners: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added: Vec<String> = normalize(new_winners)
            .into_iter()
            .filter(|name| !self.contains(name))
            .collect();
        self.0.extend(added.iter().cloned());
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_has_twenty_unique_names() {
        let pool = NamePool::defaults();
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.names()[0], "张三");
        assert_eq!(pool.names()[19], "秦二十二");
    }

    #[test]
    fn test_from_raw_trims_and_dedupes() {
        let pool = NamePool::from_raw(["  Alice ", "", "Bob", "   ", "Alice", "Carol"]);
        assert_eq!(pool.names(), ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_add_rejects_blank_and_duplicate() {
        let mut pool = NamePool::from_raw(["Alice"]);

        assert!(matches!(pool.add("  "), Err(WedlotError::InvalidInput(_))));
        assert!(matches!(
            pool.add(" Alice "),
            Err(WedlotError::DuplicateName { .. })
        ));
        // Uniqueness is case-sensitive.
        assert_eq!(pool.add("alice").unwrap(), "alice");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut pool = NamePool::from_raw(["Alice", "Bob", "Carol"]);

        let old = pool.rename(1, " Bobby ").unwrap();
        assert_eq!(old, "Bob");
        assert_eq!(pool.names(), ["Alice", "Bobby", "Carol"]);

        // Renaming to itself is fine, renaming onto another entry is not.
        assert!(pool.rename(1, "Bobby").is_ok());
        assert!(matches!(
            pool.rename(1, "Carol"),
            Err(WedlotError::DuplicateName { .. })
        ));
        assert!(matches!(
            pool.rename(5, "Dave"),
            Err(WedlotError::IndexOutOfRange { index: 5, len: 3 })
        ));
    }

    #[test]
    fn test_remove() {
        let mut pool = NamePool::from_raw(["Alice", "Bob"]);
        assert_eq!(pool.remove(0).unwrap(), "Alice");
        assert_eq!(pool.names(), ["Bob"]);
        assert!(pool.remove(1).is_err());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let pool = NamePool::from_raw(["Alice", "Bob", "alicia", "王五"]);

        let hits = pool.search("ALI");
        assert_eq!(hits, vec![(0, "Alice"), (2, "alicia")]);
        assert_eq!(pool.search("五"), vec![(3, "王五")]);
        assert_eq!(pool.search("").len(), 4);
    }

    #[test]
    fn test_eligible_preserves_pool_order() {
        let pool = NamePool::from_raw(["A", "B", "C", "D"]);
        let ledger = WinnerLedger::from_raw(["C", "A", "Z"]);
        assert_eq!(pool.eligible(&ledger), vec!["B", "D"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut ledger = WinnerLedger::new();

        let added = ledger.merge(["a", "b"]);
        assert_eq!(added, vec!["a", "b"]);

        let added = ledger.merge(["a", "b"]);
        assert!(added.is_empty());
        assert_eq!(ledger.len(), 2);

        let added = ledger.merge(["b", " c "]);
        assert_eq!(added, vec!["c"]);
        assert_eq!(ledger.names(), ["a", "b", "c"]);
    }
}
