use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

/// A package name. Arbitrary bytes, opaque to the store — the only
/// bytes the wire protocol refuses are the framing delimiters, and the
/// store never inspects even those; it just stores and compares.
///
/// `Arc<[u8]>` rather than `Vec<u8>` because one name routinely lives in
/// `indexed`, one `forward` entry, and N `reverse` entries at once —
/// cloning a name to insert it into another set should not reallocate.
pub type PackageName = Arc<[u8]>;

/// Outcome of [`GraphStore::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The package was indexed (or re-indexed). `newly_indexed` is true
    /// iff the package was not already a member of `indexed` —
    /// the dispatcher uses this to drive the `packages_indexed` counter.
    Ok { newly_indexed: bool },
    /// At least one dependency was not indexed at the time of the call.
    /// No state changed.
    Fail,
}

/// Outcome of [`GraphStore::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The package was removed (or was already absent).
    Ok,
    /// The package was not indexed. Mapped to `OK` at the protocol
    /// surface (idempotent success) but kept distinct here so callers
    /// can tell the no-op apart from an actual removal if they care.
    NotIndexed,
    /// The package still has dependents; nothing changed.
    Blocked,
}

/// Consistent snapshot of the store's size counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub indexed_count: usize,
    pub forward_count: usize,
    pub reverse_count: usize,
}

#[derive(Default)]
struct Inner {
    indexed: HashSet<PackageName>,
    forward: HashMap<PackageName, HashSet<PackageName>>,
    reverse: HashMap<PackageName, HashSet<PackageName>>,
}

/// The dependency graph: the only shared mutable state in the service.
///
/// A single `RwLock` guards all three maps together. The invariants
/// (spec §3) tie `indexed`, `forward`, and `reverse` to each other, so
/// splitting them across separate locks or shards would just move the
/// TOCTOU hazard between `index`/`remove` into the store itself — a
/// single critical section per operation is what makes "check deps
/// then commit" atomic. Readers (`query`, `stats`) take the shared
/// side of the lock and run concurrently with each other; `index` and
/// `remove` take the exclusive side.
#[derive(Default)]
pub struct GraphStore {
    inner: RwLock<Inner>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `name` with dependency set `deps`, or fail if any element
    /// of `deps` is not currently indexed. See spec §4.1 for the full
    /// contract, including re-index cleanup of dropped dependencies.
    pub fn index<I>(&self, name: &[u8], deps: I) -> IndexOutcome
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let deps: HashSet<PackageName> = deps.into_iter().map(Arc::from).collect();

        let mut inner = self.inner.write();

        if !deps.iter().all(|d| inner.indexed.contains(d)) {
            return IndexOutcome::Fail;
        }

        let name: PackageName = Arc::from(name);
        let newly_indexed = inner.indexed.insert(Arc::clone(&name));

        let prior = inner.forward.insert(Arc::clone(&name), deps.clone());
        if let Some(prior_deps) = prior {
            for dropped in prior_deps.difference(&deps) {
                if let Some(dependents) = inner.reverse.get_mut(dropped) {
                    dependents.remove(&name);
                    if dependents.is_empty() {
                        inner.reverse.remove(dropped);
                    }
                }
            }
        }

        for dep in &deps {
            inner
                .reverse
                .entry(Arc::clone(dep))
                .or_default()
                .insert(Arc::clone(&name));
        }

        IndexOutcome::Ok { newly_indexed }
    }

    /// Remove `name`, or refuse if it still has dependents. See spec
    /// §4.1.
    pub fn remove(&self, name: &[u8]) -> RemoveOutcome {
        let mut inner = self.inner.write();

        if !inner.indexed.contains(name) {
            return RemoveOutcome::NotIndexed;
        }

        if inner.reverse.get(name).is_some_and(|r| !r.is_empty()) {
            return RemoveOutcome::Blocked;
        }

        inner.indexed.remove(name);
        if let Some(deps) = inner.forward.remove(name) {
            for dep in deps {
                if let Some(dependents) = inner.reverse.get_mut(&dep) {
                    dependents.remove(name);
                    if dependents.is_empty() {
                        inner.reverse.remove(&dep);
                    }
                }
            }
        }

        RemoveOutcome::Ok
    }

    /// Whether `name` is currently indexed. Never fails.
    pub fn query(&self, name: &[u8]) -> bool {
        self.inner.read().indexed.contains(name)
    }

    /// Consistent snapshot of the store's sizes.
    pub fn stats(&self) -> GraphStats {
        let inner = self.inner.read();
        GraphStats {
            indexed_count: inner.indexed.len(),
            forward_count: inner.forward.len(),
            reverse_count: inner.reverse.len(),
        }
    }
}

// `HashSet<PackageName>`/`HashMap<PackageName, _>` need to be looked up
// by `&[u8]` without allocating an `Arc<[u8]>` just to probe. `Borrow`
// makes that work because `Arc<[u8]>: Borrow<[u8]>` already, so the
// `.contains(name)` / `.get(name)` calls above with `name: &[u8]` work
// as written — no custom `Borrow` impl needed here.
