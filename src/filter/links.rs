use crate::filter::TypeGroup;
use std::collections::{BTreeSet, HashSet};

/// Filters candidate links against the excluded content type groups
///
/// The excluded groups are flattened into one set of extensions and every
/// link whose text ends with one of them is dropped. This is a plain string
/// check: no network access, no parsing of the link.
///
/// # Arguments
///
/// * `links` - Absolute link strings extracted from a page
/// * `excluded` - Content type groups that should not be queued
///
/// # Returns
///
/// The de-duplicated set of links worth queuing
///
/// # Example
///
/// ```
/// use ripple_crawl::filter::{filter_links, TypeGroup};
/// use std::collections::HashSet;
///
/// let excluded = HashSet::from([TypeGroup::images()]);
/// let kept = filter_links(["http://h/a.png", "http://h/b.html"], &excluded);
/// assert_eq!(kept.into_iter().collect::<Vec<_>>(), vec!["http://h/b.html"]);
/// ```
pub fn filter_links<I, S>(links: I, excluded: &HashSet<TypeGroup>) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let suffixes: HashSet<&str> = excluded.iter().flat_map(TypeGroup::extensions).collect();

    links
        .into_iter()
        .map(|link| link.as_ref().to_string())
        .filter(|link| !suffixes.iter().any(|suffix| link.ends_with(suffix)))
        .collect()
}
