//! Reading service — read-only use-cases over the stored series.

use hygrolog_domain::error::{HygroError, NotFoundError};
use hygrolog_domain::query::HistoryQuery;
use hygrolog_domain::reading::SensorReading;

use crate::ports::ReadingRepository;

/// Application service backing the history and latest-reading queries.
pub struct ReadingService<R> {
    repo: R,
}

impl<R: ReadingRepository> ReadingService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// List readings according to `query`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn history(&self, query: HistoryQuery) -> Result<Vec<SensorReading>, HygroError> {
        self.repo.list(query).await
    }

    /// Fetch the most recent reading.
    ///
    /// # Errors
    ///
    /// Returns [`HygroError::NotFound`] when nothing has been recorded yet,
    /// or a storage error from the repository.
    pub async fn latest(&self) -> Result<SensorReading, HygroError> {
        self.repo
            .latest()
            .await?
            .ok_or_else(|| NotFoundError { entity: "Reading" }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hygrolog_domain::query::SortOrder;
    use hygrolog_domain::time::now;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryReadingRepo {
        readings: Vec<SensorReading>,
        queries: Mutex<Vec<HistoryQuery>>,
    }

    impl ReadingRepository for InMemoryReadingRepo {
        async fn list(&self, query: HistoryQuery) -> Result<Vec<SensorReading>, HygroError> {
            self.queries.lock().unwrap().push(query);
            let mut rows = self.readings.clone();
            rows.sort_by_key(|reading| reading.observed_at);
            if query.order == SortOrder::Desc {
                rows.reverse();
            }
            if let Some(limit) = query.limit {
                rows.truncate(limit as usize);
            }
            Ok(rows)
        }

        async fn latest(&self) -> Result<Option<SensorReading>, HygroError> {
            Ok(self.readings.iter().max_by_key(|r| r.observed_at).cloned())
        }
    }

    #[tokio::test]
    async fn should_return_not_found_when_store_is_empty() {
        let service = ReadingService::new(InMemoryReadingRepo::default());
        let result = service.latest().await;
        assert!(matches!(result, Err(HygroError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_latest_reading() {
        let older = SensorReading::new(19.0, 40, now() - chrono::Duration::minutes(15));
        let newer = SensorReading::new(20.0, 41, now());
        let service = ReadingService::new(InMemoryReadingRepo {
            readings: vec![newer.clone(), older],
            ..InMemoryReadingRepo::default()
        });

        assert_eq!(service.latest().await.unwrap(), newer);
    }

    #[tokio::test]
    async fn should_pass_query_through_to_repository() {
        let service = ReadingService::new(InMemoryReadingRepo::default());
        let query = HistoryQuery::new(Some(5), SortOrder::Asc);

        let rows = service.history(query).await.unwrap();

        assert!(rows.is_empty());
        assert_eq!(*service.repo.queries.lock().unwrap(), vec![query]);
    }
}
