// SPDX-License-Identifier: MIT
// Copyright (c) 2026 FleetTools Contributors

//! Shared helper functions for state event handlers.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Get a value by exact id or unique suffix match.
///
/// Lets a caller-supplied short id (displayed without its type prefix, or
/// simply truncated) resolve back to the one full entry it identifies. If
/// more than one key matches, the lookup is ambiguous and returns `None`
/// rather than guessing.
pub(crate) fn find_by_prefix<'a, K, V>(map: &'a HashMap<K, V>, id: &str) -> Option<&'a V>
where
    K: Borrow<str> + Hash + Eq,
{
    if let Some(v) = map.get(id) {
        return Some(v);
    }
    let mut matches = map.iter().filter(|(k, _)| (*k).borrow().ends_with(id));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first.1)
    }
}
