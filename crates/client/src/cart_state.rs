//! Shared optimistic cart state.
//!
//! This is the single cart container every surface observes: it holds the
//! last-confirmed server cart plus an optimistic overlay keyed by variant,
//! and a per-variant indicator (Idle / Pending / Added / Failed). Observers
//! subscribe via a `tokio::sync::watch` channel and receive an immutable
//! snapshot on every change.
//!
//! Rapid add/remove on the same variant is last-write-wins: the newer
//! optimistic write replaces the older one, and the later server confirmation
//! settles the final value. Added and Failed indicators auto-revert to Idle
//! after [`INDICATOR_TTL`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;

use clementine_core::{ErrorCode, VariantId};

/// How long Added/Failed indicators stay visible before reverting to Idle.
pub const INDICATOR_TTL: Duration = Duration::from_secs(2);

/// Per-variant add indicator shown next to the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// A mutation is in flight; the overlay shows the hoped-for quantity.
    Pending,
    /// The last mutation succeeded.
    Added,
    /// The last mutation was rejected with this code.
    Failed(ErrorCode),
}

/// Immutable view of the cart published to observers.
///
/// `quantities` is the effective view: server state with the optimistic
/// overlay applied on top.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    pub quantities: BTreeMap<VariantId, i32>,
    pub indicators: HashMap<VariantId, IndicatorStatus>,
}

impl CartSnapshot {
    /// Effective quantity of a variant (zero when absent).
    #[must_use]
    pub fn quantity(&self, variant_id: VariantId) -> i32 {
        self.quantities.get(&variant_id).copied().unwrap_or(0)
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.quantities.values().map(|&q| i64::from(q)).sum()
    }

    /// Indicator for a variant (Idle when none recorded).
    #[must_use]
    pub fn status(&self, variant_id: VariantId) -> IndicatorStatus {
        self.indicators
            .get(&variant_id)
            .copied()
            .unwrap_or_default()
    }
}

struct Inner {
    /// Last-confirmed server quantities.
    server: BTreeMap<VariantId, i32>,
    /// Optimistic absolute quantities; an entry overrides the server value,
    /// zero meaning "removed".
    overlay: BTreeMap<VariantId, i32>,
    indicators: HashMap<VariantId, IndicatorStatus>,
    /// Bumped on every indicator change so a stale revert timer is a no-op.
    generations: HashMap<VariantId, u64>,
}

impl Inner {
    fn effective(&self) -> BTreeMap<VariantId, i32> {
        let mut view = self.server.clone();
        for (&variant_id, &quantity) in &self.overlay {
            if quantity == 0 {
                view.remove(&variant_id);
            } else {
                view.insert(variant_id, quantity);
            }
        }
        view
    }

    fn effective_quantity(&self, variant_id: VariantId) -> i32 {
        self.overlay
            .get(&variant_id)
            .or_else(|| self.server.get(&variant_id))
            .copied()
            .unwrap_or(0)
    }

    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            quantities: self.effective(),
            indicators: self.indicators.clone(),
        }
    }

    fn bump(&mut self, variant_id: VariantId) -> u64 {
        let generation = self.generations.entry(variant_id).or_insert(0);
        *generation += 1;
        *generation
    }
}

/// The one shared optimistic cart container.
#[derive(Clone)]
pub struct CartState {
    inner: Arc<Mutex<Inner>>,
    tx: watch::Sender<CartSnapshot>,
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

impl CartState {
    /// Create an empty cart state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(CartSnapshot::default());
        Self {
            inner: Arc::new(Mutex::new(Inner {
                server: BTreeMap::new(),
                overlay: BTreeMap::new(),
                indicators: HashMap::new(),
                generations: HashMap::new(),
            })),
            tx,
        }
    }

    /// Subscribe to snapshots. The receiver immediately holds the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.tx.subscribe()
    }

    /// The current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.tx.borrow().clone()
    }

    /// Replace the confirmed server state with a fresh cart read.
    ///
    /// Overlay entries for in-flight mutations are kept; they settle when
    /// their mutation confirms or fails.
    pub fn set_server(&self, quantities: impl IntoIterator<Item = (VariantId, i32)>) {
        let mut inner = self.lock();
        inner.server = quantities.into_iter().filter(|&(_, q)| q > 0).collect();
        self.publish(&inner);
    }

    /// Apply an optimistic add: bump the effective quantity by `quantity` and
    /// flip the indicator to Pending. Returns the hoped-for quantity.
    pub fn begin_add(&self, variant_id: VariantId, quantity: i32) -> i32 {
        let mut inner = self.lock();
        let target = inner.effective_quantity(variant_id).saturating_add(quantity);
        inner.overlay.insert(variant_id, target);
        inner.indicators.insert(variant_id, IndicatorStatus::Pending);
        inner.bump(variant_id);
        self.publish(&inner);
        target
    }

    /// Apply an optimistic absolute write (zero removes the line) and flip
    /// the indicator to Pending.
    pub fn begin_set(&self, variant_id: VariantId, quantity: i32) {
        let mut inner = self.lock();
        inner.overlay.insert(variant_id, quantity.max(0));
        inner.indicators.insert(variant_id, IndicatorStatus::Pending);
        inner.bump(variant_id);
        self.publish(&inner);
    }

    /// Promote the overlay to confirmed server state and show Added.
    pub fn confirm(&self, variant_id: VariantId) {
        let generation;
        {
            let mut inner = self.lock();
            if let Some(quantity) = inner.overlay.remove(&variant_id) {
                if quantity == 0 {
                    inner.server.remove(&variant_id);
                } else {
                    inner.server.insert(variant_id, quantity);
                }
            }
            inner.indicators.insert(variant_id, IndicatorStatus::Added);
            generation = inner.bump(variant_id);
            self.publish(&inner);
        }
        self.schedule_revert(variant_id, generation);
    }

    /// Roll the overlay back to the server state and show Failed.
    pub fn fail(&self, variant_id: VariantId, code: ErrorCode) {
        let generation;
        {
            let mut inner = self.lock();
            inner.overlay.remove(&variant_id);
            inner
                .indicators
                .insert(variant_id, IndicatorStatus::Failed(code));
            generation = inner.bump(variant_id);
            self.publish(&inner);
        }
        self.schedule_revert(variant_id, generation);
    }

    /// Drop everything, optimistically and confirmed. Used by clear-cart.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.server.clear();
        inner.overlay.clear();
        self.publish(&inner);
    }

    fn schedule_revert(&self, variant_id: VariantId, generation: u64) {
        let state = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(INDICATOR_TTL).await;
            let mut inner = state.lock();
            // A newer write owns the indicator now; leave it alone.
            if inner.generations.get(&variant_id) == Some(&generation) {
                inner.indicators.insert(variant_id, IndicatorStatus::Idle);
                state.publish(&inner);
            }
        });
    }

    // A poisoned lock propagates the original panic.
    #[allow(clippy::unwrap_used)]
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn publish(&self, inner: &Inner) {
        self.tx.send_replace(inner.snapshot());
    }
}
