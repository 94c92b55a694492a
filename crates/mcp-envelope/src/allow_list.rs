//! Allow-list filtering of the advertised operation catalog.

use std::collections::BTreeSet;

/// Which operations `list_operations` advertises.
///
/// This only narrows the listing. It is not an authorization check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowList {
    #[default]
    Unrestricted,
    Only(BTreeSet<String>),
}

impl AllowList {
    /// Parse a comma-separated list of operation names. Entries are trimmed
    /// and empty entries dropped; nothing left means no filtering.
    pub fn parse(raw: Option<&str>) -> Self {
        let names: BTreeSet<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            AllowList::Unrestricted
        } else {
            AllowList::Only(names)
        }
    }

    pub fn permits(&self, name: &str) -> bool {
        match self {
            AllowList::Unrestricted => true,
            AllowList::Only(names) => names.contains(name),
        }
    }

    /// Keep the items whose name is permitted.
    pub fn filter<'a, T, I, F>(&self, items: I, name_of: F) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        F: Fn(&T) -> &str,
        T: 'a,
    {
        items
            .into_iter()
            .filter(|item| self.permits(name_of(*item)))
            .collect()
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, AllowList::Unrestricted)
    }
}

impl std::fmt::Display for AllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllowList::Unrestricted => f.write_str("*"),
            AllowList::Only(names) => {
                let joined: Vec<&str> = names.iter().map(String::as_str).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}
