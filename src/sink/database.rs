use async_trait::async_trait;

use super::{validate, FeedbackSink, SinkError};
use crate::db::Database;
use crate::models::AnswerSet;

/// Shown when the database write fails. The underlying error is only logged.
pub const STORAGE_FAILURE_MESSAGE: &str =
    "Could not connect to the database. Please try again later.";

/// Appends submissions to the local database.
#[derive(Clone)]
pub struct DatabaseSink {
    db: Database,
}

impl DatabaseSink {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackSink for DatabaseSink {
    async fn submit(&self, identity: &str, answers: &AnswerSet) -> Result<(), SinkError> {
        validate(identity, answers)?;

        match self.db.insert_submission(identity, answers) {
            Ok(submission) => {
                tracing::info!(
                    "Stored submission {} ({} answers)",
                    submission.id,
                    submission.answers.len()
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error writing submission: {:#}", e);
                Err(SinkError::Unavailable(STORAGE_FAILURE_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> AnswerSet {
        [("q1", "chill")].into_iter().collect()
    }

    #[tokio::test]
    async fn writes_one_record() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let sink = DatabaseSink::new(db.clone());

        sink.submit("fox", &answers()).await.unwrap();

        let stored = db.list_submissions().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].identity, "fox");
    }

    #[tokio::test]
    async fn invalid_input_writes_nothing() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let sink = DatabaseSink::new(db.clone());

        let result = sink.submit("", &answers()).await;

        assert!(matches!(result, Err(SinkError::InvalidInput(_))));
        assert_eq!(db.count_submissions().unwrap(), 0);
    }

    #[tokio::test]
    async fn storage_failure_is_unavailable() {
        // Not migrated, so the table is missing and the insert fails.
        let db = Database::open_memory().unwrap();
        let sink = DatabaseSink::new(db);

        let result = sink.submit("fox", &answers()).await;

        assert_eq!(
            result,
            Err(SinkError::Unavailable(STORAGE_FAILURE_MESSAGE.to_string()))
        );
    }
}
