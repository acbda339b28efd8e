//! Generic coalescing loader
//!
//! A call to [`BatchLoader::load`] registers its key and a waiter, then
//! yields to the scheduler once. Sibling futures polled in the same round
//! register their keys before anyone resumes. The first caller to resume
//! takes the whole pending batch and runs exactly one fetch for it; every
//! waiter of that batch is answered from the grouped result.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::error::ApiError;

/// Grouped fetch for a set of keys
///
/// Keys with no related rows may be left out of the returned map; the
/// loader answers them with an empty list.
pub trait BatchFetch: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Send + Sync + 'static;
    type Value: Clone + Send + 'static;
    type Error: Clone + Send + 'static;

    fn fetch(
        &self,
        keys: &[Self::Key],
    ) -> impl Future<Output = Result<HashMap<Self::Key, Vec<Self::Value>>, Self::Error>> + Send;
}

/// Failure delivered to a waiter
#[derive(Debug, Clone, Error)]
pub enum LoadError<E> {
    /// The batch fetch failed; every waiter of the batch gets the same error
    #[error("batch fetch failed: {0}")]
    Fetch(E),

    /// The task dispatching the batch was dropped before answering
    #[error("batch was abandoned before it was dispatched")]
    Abandoned,
}

impl<E: std::fmt::Display> From<LoadError<E>> for ApiError {
    fn from(err: LoadError<E>) -> Self {
        ApiError::BatchLoad(err.to_string())
    }
}

type Reply<F> = Result<Vec<<F as BatchFetch>::Value>, <F as BatchFetch>::Error>;
type Waiter<F> = (<F as BatchFetch>::Key, oneshot::Sender<Reply<F>>);

struct BatchState<F: BatchFetch> {
    /// Distinct keys of the open batch in first-seen order
    pending: Vec<F::Key>,
    /// One entry per `load` call, duplicates included
    waiters: Vec<Waiter<F>>,
}

/// Per-request loader coalescing key lookups into grouped fetches
pub struct BatchLoader<F: BatchFetch> {
    fetcher: F,
    state: Mutex<BatchState<F>>,
}

impl<F: BatchFetch> BatchLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            state: Mutex::new(BatchState {
                pending: Vec::new(),
                waiters: Vec::new(),
            }),
        }
    }

    /// Load the related values of one key
    ///
    /// Resolves to an empty list when the key has no related rows.
    pub async fn load(&self, key: F::Key) -> Result<Vec<F::Value>, LoadError<F::Error>> {
        let receiver = {
            let mut state = self.lock_state();
            let (sender, receiver) = oneshot::channel();
            if !state.pending.contains(&key) {
                state.pending.push(key.clone());
            }
            state.waiters.push((key, sender));
            receiver
        };

        tokio::task::yield_now().await;

        let batch = {
            let mut state = self.lock_state();
            if state.pending.is_empty() {
                None
            } else {
                Some((
                    std::mem::take(&mut state.pending),
                    std::mem::take(&mut state.waiters),
                ))
            }
        };

        if let Some((keys, waiters)) = batch {
            self.dispatch(keys, waiters).await;
        }

        match receiver.await {
            Ok(reply) => reply.map_err(LoadError::Fetch),
            Err(_) => Err(LoadError::Abandoned),
        }
    }

    /// Load several keys at once; results are aligned with `keys`
    pub async fn load_many<I>(&self, keys: I) -> Result<Vec<Vec<F::Value>>, LoadError<F::Error>>
    where
        I: IntoIterator<Item = F::Key>,
    {
        join_all(keys.into_iter().map(|key| self.load(key)))
            .await
            .into_iter()
            .collect()
    }

    async fn dispatch(&self, keys: Vec<F::Key>, waiters: Vec<Waiter<F>>) {
        tracing::debug!(
            keys = keys.len(),
            waiters = waiters.len(),
            "Dispatching batched load"
        );

        match self.fetcher.fetch(&keys).await {
            Ok(grouped) => {
                for (key, sender) in waiters {
                    let values = grouped.get(&key).cloned().unwrap_or_default();
                    // The waiter may have been dropped meanwhile
                    let _ = sender.send(Ok(values));
                }
            }
            Err(err) => {
                for (_, sender) in waiters {
                    let _ = sender.send(Err(err.clone()));
                }
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BatchState<F>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fetcher returning `key * 10` and `key * 10 + 1` for every key below
    /// 100; keys of 100 and above have no related rows
    #[derive(Clone, Default)]
    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
        batches: Arc<Mutex<Vec<Vec<u32>>>>,
        fail: bool,
    }

    impl BatchFetch for CountingFetcher {
        type Key = u32;
        type Value = u32;
        type Error = String;

        async fn fetch(&self, keys: &[u32]) -> Result<HashMap<u32, Vec<u32>>, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches.lock().unwrap().push(keys.to_vec());
            if self.fail {
                return Err("connection reset".to_string());
            }
            Ok(keys
                .iter()
                .filter(|k| **k < 100)
                .map(|k| (*k, vec![k * 10, k * 10 + 1]))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_single_load() {
        let fetcher = CountingFetcher::default();
        let loader = BatchLoader::new(fetcher.clone());

        assert_eq!(loader.load(4).await.unwrap(), vec![40, 41]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_many_dedups_and_keeps_input_order() {
        let fetcher = CountingFetcher::default();
        let loader = BatchLoader::new(fetcher.clone());

        let results = loader.load_many(vec![3, 1, 3, 500, 2]).await.unwrap();

        assert_eq!(
            results,
            vec![vec![30, 31], vec![10, 11], vec![30, 31], vec![], vec![20, 21]]
        );
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*fetcher.batches.lock().unwrap(), vec![vec![3, 1, 500, 2]]);
    }

    #[tokio::test]
    async fn test_concurrent_loads_share_one_fetch() {
        let fetcher = CountingFetcher::default();
        let loader = BatchLoader::new(fetcher.clone());

        let (a, b, c) = tokio::join!(loader.load(1), loader.load(2), loader.load(1));

        assert_eq!(a.unwrap(), vec![10, 11]);
        assert_eq!(b.unwrap(), vec![20, 21]);
        assert_eq!(c.unwrap(), vec![10, 11]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sequential_loads_start_new_batches() {
        let fetcher = CountingFetcher::default();
        let loader = BatchLoader::new(fetcher.clone());

        loader.load(1).await.unwrap();
        loader.load(2).await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(*fetcher.batches.lock().unwrap(), vec![vec![1], vec![2]]);
    }

    #[tokio::test]
    async fn test_failure_reaches_every_waiter() {
        let fetcher = CountingFetcher {
            fail: true,
            ..Default::default()
        };
        let loader = BatchLoader::new(fetcher.clone());

        let (a, b) = tokio::join!(loader.load(1), loader.load(2));

        assert_matches!(a, Err(LoadError::Fetch(ref e)) if e == "connection reset");
        assert_matches!(b, Err(LoadError::Fetch(ref e)) if e == "connection reset");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_many_empty_input() {
        let fetcher = CountingFetcher::default();
        let loader = BatchLoader::new(fetcher.clone());

        let results = loader.load_many(Vec::new()).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_load_error_converts_to_storage_failure() {
        let err: ApiError = LoadError::Fetch("timeout".to_string()).into();
        assert_eq!(err.error_code(), "STORAGE_FAILURE");
    }
}
