//! Refresh broadcasting and stale-result guards for list views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// Change counter list views key their loading on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RefreshToken(u64);

impl RefreshToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Publishes a monotonically increasing [`RefreshToken`].
///
/// Every successful pin create/update/delete and every session change bumps
/// it once; subscribers reload their data when they see a new value.
#[derive(Debug)]
pub struct RefreshBroadcaster {
    sender: watch::Sender<u64>,
}

impl Default for RefreshBroadcaster {
    fn default() -> Self {
        let (sender, _receiver) = watch::channel(0);
        Self { sender }
    }
}

impl RefreshBroadcaster {
    pub fn current(&self) -> RefreshToken {
        RefreshToken(*self.sender.borrow())
    }

    /// Increment the token and wake every subscriber.
    pub fn bump(&self) -> RefreshToken {
        self.sender.send_modify(|value| *value += 1);
        let token = self.current();
        tracing::debug!(token = token.value(), "refresh token bumped");
        token
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }
}

/// Liveness flag owned by a view; cleared when the view is torn down.
#[derive(Debug)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl Default for MountGuard {
    fn default() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl MountGuard {
    /// Issue a ticket for a fetch started under `generation`.
    pub fn ticket(&self, generation: RefreshToken) -> FetchTicket {
        FetchTicket {
            generation,
            mounted: Arc::clone(&self.mounted),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Carried by an in-flight fetch so its result can be dropped if the view
/// went away in the meantime.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: RefreshToken,
    mounted: Arc<AtomicBool>,
}

impl FetchTicket {
    pub const fn generation(&self) -> RefreshToken {
        self.generation
    }

    pub fn is_live(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

/// Data of one list view, tagged with the refresh generation it was loaded
/// under.
#[derive(Debug)]
pub struct ListSlot<T> {
    items: Vec<T>,
    loaded: Option<RefreshToken>,
    mount: MountGuard,
}

impl<T> Default for ListSlot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: None,
            mount: MountGuard::default(),
        }
    }
}

impl<T> ListSlot<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub const fn loaded_generation(&self) -> Option<RefreshToken> {
        self.loaded
    }

    /// True when the slot has never loaded or loaded under an older token.
    pub fn needs_reload(&self, current: RefreshToken) -> bool {
        self.loaded.map_or(true, |loaded| loaded < current)
    }

    pub fn begin_load(&self, current: RefreshToken) -> FetchTicket {
        self.mount.ticket(current)
    }

    /// Store fetched items unless the view is gone or a newer load already
    /// landed. Returns whether the items were applied.
    pub fn apply(&mut self, ticket: &FetchTicket, items: Vec<T>) -> bool {
        if !ticket.is_live() {
            tracing::debug!("discarding list result for an unmounted view");
            return false;
        }
        if self.loaded.is_some_and(|loaded| loaded > ticket.generation) {
            tracing::debug!(
                generation = ticket.generation.value(),
                "discarding stale list result"
            );
            return false;
        }
        self.items = items;
        self.loaded = Some(ticket.generation);
        true
    }

    /// Mark the owning view as torn down; in-flight results will be dropped.
    pub fn unmount(&self) {
        self.mount.unmount();
    }
}
