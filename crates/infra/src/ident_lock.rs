//! Per-identifier locks serializing overlapping identify calls.
//!
//! Two concurrent calls carrying the same previously-unseen identifier
//! would otherwise both see "no matches" and both create a primary. The
//! resolver takes the locks for every identifier in the request before its
//! first store read and holds them through the final re-read.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lock table keyed by normalized identifier value.
///
/// Keys are prefixed by identifier kind so an email and a phone with the
/// same literal value do not contend. Entries are never evicted; the table
/// grows with the number of distinct identifiers seen by this process.
#[derive(Debug, Default)]
pub struct IdentifierLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl IdentifierLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the locks for the given identifiers, in sorted key order so
    /// overlapping requests cannot deadlock. The returned guards must be
    /// held for the whole read-decide-write sequence.
    pub async fn acquire(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Vec<OwnedMutexGuard<()>> {
        let mut keys: Vec<String> = Vec::with_capacity(2);
        if let Some(email) = email {
            keys.push(format!("email:{email}"));
        }
        if let Some(phone) = phone {
            keys.push(format!("phone:{phone}"));
        }
        keys.sort();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let entry = {
                let mut table = self.inner.lock().unwrap();
                table
                    .entry(key)
                    .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                    .clone()
            };
            guards.push(entry.lock_owned().await);
        }
        guards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn same_identifier_is_mutually_exclusive() {
        let locks = Arc::new(IdentifierLocks::new());
        let in_section = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let in_section = in_section.clone();
            handles.push(tokio::spawn(async move {
                let _guards = locks.acquire(Some("a@x"), None).await;
                let now = in_section.fetch_add(1, Ordering::SeqCst);
                assert_eq!(now, 0, "two tasks inside the same critical section");
                tokio::task::yield_now().await;
                in_section.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
    }

    #[tokio::test]
    async fn opposite_identifier_order_does_not_deadlock() {
        let locks = Arc::new(IdentifierLocks::new());

        let a = {
            let locks = locks.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let _g = locks.acquire(Some("a@x"), Some("111")).await;
                }
            })
        };
        let b = tokio::spawn(async move {
            for _ in 0..50 {
                // Same pair, roles swapped: phone value equals the other
                // task's email key ordering-wise.
                let _g = locks.acquire(Some("111"), Some("a@x")).await;
            }
        });

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            a.await.unwrap();
            b.await.unwrap();
        })
        .await
        .expect("lock acquisition deadlocked");
    }

    #[tokio::test]
    async fn distinct_identifiers_do_not_contend() {
        let locks = IdentifierLocks::new();
        let _g1 = locks.acquire(Some("a@x"), None).await;
        // Phone lock with the same literal value must still be free.
        let _g2 = locks.acquire(None, Some("a@x")).await;
    }
}
