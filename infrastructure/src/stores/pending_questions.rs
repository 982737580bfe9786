//! PendingQuestionStore in-memory implementation.

use async_trait::async_trait;
use council_application::ports::trigger_state::{PendingQuestionStore, StoreError};
use council_domain::{PendingQuestion, UserId};
use std::collections::HashMap;
use std::sync::RwLock;

/// One pending question per user, held in process memory.
#[derive(Default)]
pub struct InMemoryPendingQuestions {
    questions: RwLock<HashMap<UserId, PendingQuestion>>,
}

impl InMemoryPendingQuestions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingQuestionStore for InMemoryPendingQuestions {
    async fn current(&self, user_id: &UserId) -> Result<Option<PendingQuestion>, StoreError> {
        let questions = self
            .questions
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(questions.get(user_id).cloned())
    }

    async fn put(&self, question: PendingQuestion) -> Result<(), StoreError> {
        let mut questions = self
            .questions
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        questions.insert(question.user_id.clone(), question);
        Ok(())
    }

    async fn clear_if(&self, question: &PendingQuestion) -> Result<bool, StoreError> {
        let mut questions = self
            .questions
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if questions.get(&question.user_id) != Some(question) {
            return Ok(false);
        }
        questions.remove(&question.user_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_replaces_previous_question() {
        let store = InMemoryPendingQuestions::new();
        let user = UserId::new("u1");
        store
            .put(PendingQuestion::new("u1", "Send the report?", "send_report"))
            .await
            .unwrap();
        store
            .put(PendingQuestion::new("u1", "Search for leads?", "lead_search"))
            .await
            .unwrap();

        let current = store.current(&user).await.unwrap().unwrap();
        assert_eq!(current.action_ref.as_str(), "lead_search");
        assert!(store.current(&UserId::new("u2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_if_only_removes_matching_question() {
        let store = InMemoryPendingQuestions::new();
        let old = PendingQuestion::new("u1", "Send the report?", "send_report");
        let newer = PendingQuestion::new("u1", "Search for leads?", "lead_search");
        store.put(old.clone()).await.unwrap();
        store.put(newer.clone()).await.unwrap();

        assert!(!store.clear_if(&old).await.unwrap());
        assert_eq!(
            store.current(&UserId::new("u1")).await.unwrap(),
            Some(newer.clone())
        );
        assert!(store.clear_if(&newer).await.unwrap());
        assert!(store.current(&UserId::new("u1")).await.unwrap().is_none());
    }
}
