//! In-memory collaborators for testing.
//!
//! Every mock counts its calls and can be told to fail, which is what tests
//! of the caching and enrichment layers assert against.

use async_trait::async_trait;
use reel_catalog::models::Configuration;
use reel_catalog::{Filter, Item, ItemId, PageKey};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::{ErrorKind, Result};
use crate::{ConfigurationProvider, RemoteSource, SecondaryProvider};

fn locked<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory remote source.
///
/// Pages that were never configured are empty, like a page past the end of
/// a real list.
pub struct MockSource<F, I> {
    name: String,
    pages: Mutex<HashMap<PageKey<F>, std::result::Result<Vec<I>, ErrorKind>>>,
    failure: Mutex<Option<ErrorKind>>,
    requests: Mutex<Vec<PageKey<F>>>,
    delay: Option<Duration>,
}

impl<F: Filter, I: Item> MockSource<F, I> {
    pub fn with_page(self, filter: Option<F>, page: u32, items: Vec<I>) -> Self {
        self.set_page(filter, page, items);
        self
    }

    /// Make one page fail with `kind`.
    pub fn with_error(self, filter: Option<F>, page: u32, kind: ErrorKind) -> Self {
        locked(&self.pages).insert(PageKey::new(filter, page), Err(kind));
        self
    }

    /// Wait this long (on the tokio clock) before answering any request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace what one page returns from now on.
    pub fn set_page(&self, filter: Option<F>, page: u32, items: Vec<I>) {
        locked(&self.pages).insert(PageKey::new(filter, page), Ok(items));
    }

    /// Make every request fail with `kind` (or stop doing so with `None`).
    pub fn fail(&self, kind: Option<ErrorKind>) {
        *locked(&self.failure) = kind;
    }

    /// Number of page requests received so far.
    pub fn calls(&self) -> usize {
        locked(&self.requests).len()
    }

    /// Every page requested so far, in order.
    pub fn requests(&self) -> Vec<PageKey<F>> {
        locked(&self.requests).clone()
    }
}
impl<F: Filter, I: Item> Default for MockSource<F, I> {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            pages: Mutex::default(),
            failure: Mutex::default(),
            requests: Mutex::default(),
            delay: None,
        }
    }
}

#[async_trait]
impl<F: Filter, I: Item> RemoteSource for MockSource<F, I> {
    type Filter = F;
    type Item = I;

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_page(&self, filter: Option<&F>, page: u32) -> Result<Vec<I>> {
        let key = PageKey::new(filter.cloned(), page);
        locked(&self.requests).push(key.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failure = locked(&self.failure).clone();
        if let Some(kind) = failure {
            exn::bail!(kind);
        }
        let answer = locked(&self.pages).get(&key).cloned();
        match answer {
            Some(Ok(items)) => Ok(items),
            Some(Err(kind)) => exn::bail!(kind),
            None => Ok(Vec::new()),
        }
    }
}

/// Decrements the in-flight counter however the fetch ends.
struct InFlight<'a>(&'a AtomicUsize);
impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// In-memory enrichment provider.
///
/// Ids without data answer [`ErrorKind::NotFound`]. Tracks the highest number
/// of concurrent fetches seen, for asserting on bounded fan-out.
pub struct MockProvider<D> {
    data: HashMap<ItemId, D>,
    failing: HashSet<ItemId>,
    panicking: HashSet<ItemId>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<ItemId, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl<D: Clone + Debug + Send + Sync + 'static> MockProvider<D> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            failing: HashSet::new(),
            panicking: HashSet::new(),
            delay: None,
            calls: Mutex::default(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, id: ItemId, data: D) -> Self {
        self.data.insert(id, data);
        self
    }

    /// Make fetches of `id` fail with an unknown remote error.
    pub fn failing(mut self, id: ItemId) -> Self {
        self.failing.insert(id);
        self
    }

    /// Make fetches of `id` panic.
    pub fn panicking(mut self, id: ItemId) -> Self {
        self.panicking.insert(id);
        self
    }

    /// Wait this long (on the tokio clock) inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total number of fetches started.
    pub fn calls(&self) -> usize {
        locked(&self.calls).values().sum()
    }

    pub fn calls_for(&self, id: ItemId) -> usize {
        locked(&self.calls).get(&id).copied().unwrap_or(0)
    }

    /// Highest number of fetches that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}
impl<D: Clone + Debug + Send + Sync + 'static> Default for MockProvider<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Clone + Debug + Send + Sync + 'static> SecondaryProvider for MockProvider<D> {
    type Data = D;

    async fn fetch(&self, id: ItemId) -> Result<D> {
        *locked(&self.calls).entry(id).or_default() += 1;
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panicking.contains(&id) {
            // The panic here is DELIBERATE, it exercises task failure handling.
            panic!("MockProvider: configured to panic for item {id}");
        }
        if self.failing.contains(&id) {
            exn::bail!(ErrorKind::unknown(format!("configured to fail for item {id}")));
        }
        match self.data.get(&id) {
            Some(data) => Ok(data.clone()),
            None => exn::bail!(ErrorKind::NotFound),
        }
    }
}

/// Configuration provider whose value and availability can be changed.
pub struct MockConfiguration {
    configuration: Mutex<Configuration>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl MockConfiguration {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration: Mutex::new(configuration),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, configuration: Configuration) {
        *locked(&self.configuration) = configuration;
    }

    /// Make every subsequent request fail (or succeed again).
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigurationProvider for MockConfiguration {
    async fn current(&self) -> Result<Configuration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::unknown("configuration unavailable"));
        }
        Ok(locked(&self.configuration).clone())
    }
}
