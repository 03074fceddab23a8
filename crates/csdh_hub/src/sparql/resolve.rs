use std::collections::{HashSet, VecDeque};

use csdh_rdf::iri::is_safe;

use super::{queries, SparqlStore};

/// The outcome of dereferencing a URI into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// `false` if the root URI itself could not be loaded.
    pub success: bool,
    /// Every URI that was loaded, root first.
    pub visited: Vec<String>,
}

/// Load `uri` into the store and follow the IRIs it links to, breadth first,
/// until `depth` levels have been loaded.
///
/// A depth of 0 or 1 loads only `uri`. Failures on linked resources are
/// logged and skipped, as are linked values that are not safe IRIs. An unsafe
/// `uri` is not loaded at all.
pub async fn resolve(store: &dyn SparqlStore, uri: &str, depth: usize) -> Resolution {
    if uri.is_empty() || !is_safe(uri) {
        tracing::warn!("Refusing to load {:?}", uri);
        return Resolution {
            success: false,
            visited: Vec::new(),
        };
    }
    let depth = depth.max(1);
    let mut visited = Vec::new();
    let mut seen: HashSet<String> = HashSet::from([uri.to_string()]);
    let mut queue = VecDeque::from([(uri.to_string(), 1usize)]);

    while let Some((current, level)) = queue.pop_front() {
        if let Err(e) = store.update(&queries::load(&current)).await {
            if current == uri {
                tracing::warn!("Could not load <{}>: {}", current, e);
                return Resolution {
                    success: false,
                    visited,
                };
            }
            tracing::debug!("Skipping <{}>: {}", current, e);
            continue;
        }
        visited.push(current.clone());

        if level >= depth {
            continue;
        }
        let linked = match store.select(&queries::linked_resources(&current)).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Could not list resources linked from <{}>: {}", current, e);
                continue;
            }
        };
        for next in linked.into_iter().filter_map(|mut row| row.shift_remove("o")) {
            if !is_safe(&next) {
                tracing::debug!("Not following {:?} from <{}>", next, current);
                continue;
            }
            if seen.insert(next.clone()) {
                queue.push_back((next, level + 1));
            }
        }
    }

    tracing::debug!("Resolved <{}>: {:?}", uri, visited);
    Resolution {
        success: true,
        visited,
    }
}
