//! Cached, retrying queries over a [`CatalogueSource`].
//!
//! Results are cached per [`QueryKey`] and served from memory while fresh.
//! A failed fetch is retried with doubling back-off when
//! [`ClientError::is_retryable`] holds.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::client::CatalogueSource;
use crate::error::ClientError;
use crate::model::Benefit;

/// How long a cached result is served without refetching.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Additional attempts after a retryable failure.
pub const DEFAULT_RETRIES: u32 = 2;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Cache key of a catalogue query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full benefits list.
    Benefits,
    /// A single benefit.
    Benefit(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Benefits => f.write_str("benefits"),
            Self::Benefit(id) => write!(f, "benefit:{id}"),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Cache {
    list: Option<Entry<Vec<Benefit>>>,
    items: HashMap<String, Entry<Benefit>>,
}

/// Query layer with per-key caching and bounded retries.
pub struct CatalogueQueries<S> {
    source: Arc<S>,
    clock: Arc<dyn Clock>,
    stale_time: Duration,
    retries: u32,
    retry_delay: Duration,
    cache: Mutex<Cache>,
}

impl<S> CatalogueQueries<S>
where
    S: CatalogueSource,
{
    /// Wrap `source` with the default stale time and retry policy.
    pub fn new(source: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            stale_time: DEFAULT_STALE_TIME,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Override how long results stay fresh.
    #[must_use]
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Override the number of additional attempts after a retryable failure.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Override the delay before the first retry; later retries double it.
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Return the benefits list, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the last [`ClientError`] once retries are exhausted or the
    /// failure is not retryable.
    pub async fn list_benefits(&self) -> Result<Vec<Benefit>, ClientError> {
        let key = QueryKey::Benefits;
        let now = self.clock.utc();
        if let Some(entry) = self.cache.lock().await.list.as_ref() {
            if self.is_fresh(entry.fetched_at, now) {
                debug!(key = %key, "cache hit");
                return Ok(entry.value.clone());
            }
        }

        let benefits = self
            .fetch_with_retry(&key, || self.source.list_benefits())
            .await?;
        self.cache.lock().await.list = Some(Entry {
            value: benefits.clone(),
            fetched_at: self.clock.utc(),
        });
        Ok(benefits)
    }

    /// Return one benefit, from cache when fresh.
    ///
    /// A blank `id` is rejected without contacting the source.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyId`] for a blank identifier, otherwise the
    /// last [`ClientError`] once retries are exhausted or the failure is not
    /// retryable.
    pub async fn get_benefit(&self, id: &str) -> Result<Benefit, ClientError> {
        if id.trim().is_empty() {
            return Err(ClientError::EmptyId);
        }
        let key = QueryKey::Benefit(id.to_owned());
        let now = self.clock.utc();
        if let Some(entry) = self.cache.lock().await.items.get(id) {
            if self.is_fresh(entry.fetched_at, now) {
                debug!(key = %key, "cache hit");
                return Ok(entry.value.clone());
            }
        }

        let benefit = self
            .fetch_with_retry(&key, || self.source.get_benefit(id))
            .await?;
        self.cache.lock().await.items.insert(
            id.to_owned(),
            Entry {
                value: benefit.clone(),
                fetched_at: self.clock.utc(),
            },
        );
        Ok(benefit)
    }

    /// Drop every cached result so the next query refetches.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        cache.list = None;
        cache.items.clear();
        debug!("query cache invalidated");
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        // A clock that moved backwards counts as zero elapsed time.
        let elapsed = (now - fetched_at).to_std().unwrap_or(Duration::ZERO);
        elapsed < self.stale_time
    }

    async fn fetch_with_retry<T, F, Fut>(&self, key: &QueryKey, fetch: F) -> Result<T, ClientError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut attempt = 0;
        let mut delay = self.retry_delay;
        loop {
            debug!(key = %key, attempt, "fetching");
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!(key = %key, attempt, error = %err, "query failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2).min(MAX_RETRY_DELAY);
                }
                Err(err) => {
                    warn!(key = %key, attempt, error = %err, "query failed");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Local, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;

    /// Clock whose time only moves when a test advances it.
    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().expect("clock lock");
            *now += chrono::Duration::from_std(by).expect("representable duration");
        }
    }

    impl Clock for ManualClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.0.lock().expect("clock lock")
        }
    }

    /// Source replaying scripted results and counting calls.
    #[derive(Default)]
    struct ScriptedSource {
        lists: StdMutex<VecDeque<Result<Vec<Benefit>, ClientError>>>,
        items: StdMutex<VecDeque<Result<Benefit, ClientError>>>,
        list_calls: AtomicUsize,
        item_calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn with_lists(results: Vec<Result<Vec<Benefit>, ClientError>>) -> Self {
            Self {
                lists: StdMutex::new(results.into()),
                ..Self::default()
            }
        }

        fn with_items(results: Vec<Result<Benefit, ClientError>>) -> Self {
            Self {
                items: StdMutex::new(results.into()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl CatalogueSource for ScriptedSource {
        async fn list_benefits(&self) -> Result<Vec<Benefit>, ClientError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.lists
                .lock()
                .expect("script lock")
                .pop_front()
                .expect("scripted list result")
        }

        async fn get_benefit(&self, _id: &str) -> Result<Benefit, ClientError> {
            self.item_calls.fetch_add(1, Ordering::SeqCst);
            self.items
                .lock()
                .expect("script lock")
                .pop_front()
                .expect("scripted item result")
        }
    }

    fn benefit(id: i64) -> Benefit {
        Benefit {
            id,
            merchant: format!("merchant {id}"),
            description: "10% off".to_owned(),
            clarification: String::new(),
            accepts_card: false,
            accepts_cash: false,
            expiration: String::new(),
            category: "Sin categoría".to_owned(),
            image_url: String::new(),
        }
    }

    fn transport() -> ClientError {
        ClientError::Transport {
            message: "connection refused".to_owned(),
        }
    }

    #[fixture]
    fn clock() -> Arc<ManualClock> {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        Arc::new(ManualClock(StdMutex::new(start)))
    }

    fn build_queries(
        source: &Arc<ScriptedSource>,
        clock: &Arc<ManualClock>,
    ) -> CatalogueQueries<ScriptedSource> {
        let shared_clock: Arc<dyn Clock> = clock.clone();
        CatalogueQueries::new(Arc::clone(source), shared_clock).with_retry_delay(Duration::ZERO)
    }

    #[rstest]
    #[case::benefits(QueryKey::Benefits, "benefits")]
    #[case::benefit(QueryKey::Benefit("42".to_owned()), "benefit:42")]
    fn query_keys_render_as_cache_labels(#[case] key: QueryKey, #[case] expected: &str) {
        assert_eq!(key.to_string(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn fresh_results_are_served_from_cache(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_lists(vec![Ok(vec![benefit(1)])]));
        let queries = build_queries(&source, &clock);

        let first = queries.list_benefits().await.expect("first fetch");
        clock.advance(Duration::from_secs(4 * 60));
        let second = queries.list_benefits().await.expect("cached");

        assert_eq!(first, second);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn stale_results_are_refetched(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_lists(vec![
            Ok(vec![benefit(1)]),
            Ok(vec![benefit(1), benefit(2)]),
        ]));
        let queries = build_queries(&source, &clock);

        queries.list_benefits().await.expect("first fetch");
        clock.advance(DEFAULT_STALE_TIME);
        let refreshed = queries.list_benefits().await.expect("refetch");

        assert_eq!(refreshed.len(), 2);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn retryable_failures_are_retried_twice(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_lists(vec![
            Err(transport()),
            Err(ClientError::Api {
                status: 502,
                message: "Bad Gateway".to_owned(),
            }),
            Ok(vec![benefit(1)]),
        ]));
        let queries = build_queries(&source, &clock);

        let benefits = queries.list_benefits().await.expect("third attempt succeeds");

        assert_eq!(benefits, vec![benefit(1)]);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn retries_are_bounded(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_lists(vec![
            Err(transport()),
            Err(transport()),
            Err(transport()),
        ]));
        let queries = build_queries(&source, &clock);

        let err = queries.list_benefits().await.expect_err("gives up");

        assert_eq!(err, transport());
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn client_errors_are_not_retried(clock: Arc<ManualClock>) {
        let not_found = ClientError::Api {
            status: 404,
            message: "Benefit with ID 9 not found".to_owned(),
        };
        let source = Arc::new(ScriptedSource::with_items(vec![Err(not_found.clone())]));
        let queries = build_queries(&source, &clock);

        let err = queries.get_benefit("9").await.expect_err("not found");

        assert_eq!(err, not_found);
        assert_eq!(source.item_calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_not_cached(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_items(vec![
            Err(ClientError::Api {
                status: 404,
                message: "missing".to_owned(),
            }),
            Ok(benefit(9)),
        ]));
        let queries = build_queries(&source, &clock);

        queries.get_benefit("9").await.expect_err("first attempt fails");
        let found = queries.get_benefit("9").await.expect("second attempt");

        assert_eq!(found, benefit(9));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("  ")]
    #[tokio::test]
    async fn blank_id_skips_the_source(clock: Arc<ManualClock>, #[case] id: &str) {
        let source = Arc::new(ScriptedSource::default());
        let queries = build_queries(&source, &clock);

        let err = queries.get_benefit(id).await.expect_err("blank id");

        assert_eq!(err, ClientError::EmptyId);
        assert_eq!(source.item_calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn items_are_cached_per_identifier(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_items(vec![
            Ok(benefit(1)),
            Ok(benefit(2)),
        ]));
        let queries = build_queries(&source, &clock);

        queries.get_benefit("1").await.expect("first");
        queries.get_benefit("2").await.expect("second");
        let cached = queries.get_benefit("1").await.expect("cached");

        assert_eq!(cached, benefit(1));
        assert_eq!(source.item_calls.load(Ordering::SeqCst), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn invalidate_forces_a_refetch(clock: Arc<ManualClock>) {
        let source = Arc::new(ScriptedSource::with_lists(vec![
            Ok(vec![benefit(1)]),
            Ok(vec![benefit(3)]),
        ]));
        let queries = build_queries(&source, &clock);

        queries.list_benefits().await.expect("first fetch");
        queries.invalidate().await;
        let refreshed = queries.list_benefits().await.expect("refetch");

        assert_eq!(refreshed, vec![benefit(3)]);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 2);
    }
}
