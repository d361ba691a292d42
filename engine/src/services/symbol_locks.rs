// Per-symbol async locks so only one range fetch/merge runs per symbol at a time.
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

#[derive(Default)]
pub struct SymbolLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl SymbolLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder has `symbol`, then returns the guard.
    pub async fn acquire(&self, symbol: &str) -> OwnedMutexGuard<()> {
        self.get_or_create_lock(symbol).await.lock_owned().await
    }

    async fn get_or_create_lock(&self, symbol: &str) -> Arc<Mutex<()>> {
        let locks = self.locks.read().await;
        if let Some(lock) = locks.get(symbol) {
            return lock.clone();
        }
        drop(locks);

        let mut locks = self.locks.write().await;
        locks
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
