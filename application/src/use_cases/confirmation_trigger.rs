//! Confirmation Trigger use case
//!
//! Turns a user's "yes" into the action their last pending question
//! offered, exactly once per inbound message:
//!
//! 1. Ignore anything that is not an affirmation.
//! 2. Skip messages whose execution record already exists.
//! 3. Look up the user's pending question; without one there is nothing to do.
//! 4. Claim the message (atomic), then execute the action.
//! 5. Record the result, remember what was learned, clear the question, notify.

use crate::config::TriggerParams;
use crate::memory::SharedMemoryBank;
use crate::ports::action_executor::{ActionExecutor, ActionRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::notifier::NotificationDispatcher;
use crate::ports::trigger_state::{ExecutionRecordStore, PendingQuestionStore, StoreError};
use council_domain::memory::{TAG_ACTION, TAG_SUCCESS};
use council_domain::{
    ActionOutcome, ActionRef, AffirmationMatcher, Contributor, InboundMessage, PendingQuestion,
    UserId,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Trigger state store error: {0}")]
    Store(#[from] StoreError),
}

/// What happened to one inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// The text is not an affirmation; no state was touched
    NotAffirmative,
    /// This message id was handled before (or is being handled concurrently)
    AlreadyExecuted,
    /// Affirmative, but the user has no open question to confirm
    NoPendingQuestion,
    /// The action ran; `outcome` says whether it succeeded
    Executed {
        action_ref: ActionRef,
        outcome: ActionOutcome,
        fragments_added: usize,
    },
}

pub struct ConfirmationTriggerUseCase {
    matcher: AffirmationMatcher,
    params: TriggerParams,
    pending: Arc<dyn PendingQuestionStore>,
    records: Arc<dyn ExecutionRecordStore>,
    actions: Arc<dyn ActionExecutor>,
    notifier: Arc<dyn NotificationDispatcher>,
    memory: Arc<SharedMemoryBank>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ConfirmationTriggerUseCase {
    pub fn new(
        pending: Arc<dyn PendingQuestionStore>,
        records: Arc<dyn ExecutionRecordStore>,
        actions: Arc<dyn ActionExecutor>,
        notifier: Arc<dyn NotificationDispatcher>,
        memory: Arc<SharedMemoryBank>,
    ) -> Self {
        let params = TriggerParams::default();
        Self {
            matcher: params.matcher(),
            params,
            pending,
            records,
            actions,
            notifier,
            memory,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: TriggerParams) -> Self {
        self.matcher = params.matcher();
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Handle one inbound message. Safe to call again for redeliveries.
    pub async fn on_message(
        &self,
        message: &InboundMessage,
    ) -> Result<TriggerOutcome, TriggerError> {
        if !self.matcher.is_affirmative(&message.text) {
            return Ok(TriggerOutcome::NotAffirmative);
        }

        if let Some(record) = self.records.get(&message.message_id).await?
            && record.executed
        {
            debug!(message_id = %message.message_id, "Message already executed, skipping");
            return Ok(TriggerOutcome::AlreadyExecuted);
        }

        let Some(question) = self.pending.current(&message.user_id).await? else {
            debug!(user_id = %message.user_id, "Affirmation without a pending question");
            return Ok(TriggerOutcome::NoPendingQuestion);
        };

        if !self.records.claim(&message.message_id).await? {
            debug!(message_id = %message.message_id, "Lost claim race, another delivery is executing");
            return Ok(TriggerOutcome::AlreadyExecuted);
        }

        info!(
            user_id = %message.user_id,
            action = %question.action_ref,
            "Confirmed, executing action"
        );
        let outcome = self.execute(message, &question).await;

        if let Err(e) = self
            .records
            .record_result(&message.message_id, &outcome.result_ref())
            .await
        {
            // The claim already guarantees single execution
            warn!(message_id = %message.message_id, "Could not store result reference: {}", e);
        }

        let fragments_added = self.remember(&question.action_ref, &outcome);
        self.clear_question(&question).await;
        self.notify(&message.user_id, &question.action_ref, &outcome)
            .await;

        self.conversation_logger.log(ConversationEvent::new(
            "action_executed",
            json!({
                "user_id": message.user_id.as_str(),
                "message_id": message.message_id.as_str(),
                "action": question.action_ref.as_str(),
                "success": outcome.is_success(),
                "result": outcome.result_ref(),
                "fragments_added": fragments_added,
            }),
        ));

        Ok(TriggerOutcome::Executed {
            action_ref: question.action_ref,
            outcome,
            fragments_added,
        })
    }

    async fn execute(&self, message: &InboundMessage, question: &PendingQuestion) -> ActionOutcome {
        let request = ActionRequest {
            action_ref: question.action_ref.clone(),
            user_id: message.user_id.clone(),
            message_id: message.message_id.clone(),
            question_text: question.question_text.clone(),
            memory_context: self
                .memory
                .insight_context(self.params.memory_context_limit),
        };

        match self.actions.execute(&request).await {
            Ok(result) => ActionOutcome::Succeeded { result },
            Err(e) => {
                warn!(action = %question.action_ref, "Action failed: {}", e);
                ActionOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Store what a successful action produced; failures add nothing
    fn remember(&self, action_ref: &ActionRef, outcome: &ActionOutcome) -> usize {
        let ActionOutcome::Succeeded { result } = outcome else {
            return 0;
        };
        result
            .memory_contents()
            .into_iter()
            .filter(|content| {
                self.memory
                    .add(
                        Contributor::Action(action_ref.as_str().to_string()),
                        content.as_str(),
                        vec![TAG_ACTION.to_string(), TAG_SUCCESS.to_string()],
                    )
                    .is_added()
            })
            .count()
    }

    async fn clear_question(&self, question: &PendingQuestion) {
        match self.pending.clear_if(question).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %question.user_id, "Pending question replaced meanwhile, keeping the newer one")
            }
            Err(e) => warn!(user_id = %question.user_id, "Could not clear pending question: {}", e),
        }
    }

    async fn notify(&self, user_id: &UserId, action_ref: &ActionRef, outcome: &ActionOutcome) {
        let (title, body) = match outcome {
            ActionOutcome::Succeeded { result } => {
                (format!("{} completed", action_ref), result.summary.clone())
            }
            ActionOutcome::Failed { error } => {
                if !self.params.notify_on_failure {
                    return;
                }
                (format!("{} failed", action_ref), error.clone())
            }
        };

        if let Err(e) = self.notifier.send(user_id, &title, &body).await {
            warn!(user_id = %user_id, "Notification failed: {}", e);
            self.conversation_logger.log(ConversationEvent::new(
                "notification_failed",
                json!({
                    "user_id": user_id.as_str(),
                    "title": title,
                    "error": e.to_string(),
                }),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::action_executor::ActionError;
    use crate::ports::notifier::NotificationError;
    use async_trait::async_trait;
    use council_domain::{ActionExecutionRecord, ActionResult, MessageId};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemPending {
        questions: Mutex<HashMap<UserId, PendingQuestion>>,
    }

    #[async_trait]
    impl PendingQuestionStore for MemPending {
        async fn current(&self, user_id: &UserId) -> Result<Option<PendingQuestion>, StoreError> {
            Ok(self.questions.lock().unwrap().get(user_id).cloned())
        }

        async fn put(&self, question: PendingQuestion) -> Result<(), StoreError> {
            self.questions
                .lock()
                .unwrap()
                .insert(question.user_id.clone(), question);
            Ok(())
        }

        async fn clear_if(&self, question: &PendingQuestion) -> Result<bool, StoreError> {
            let mut questions = self.questions.lock().unwrap();
            if questions.get(&question.user_id) == Some(question) {
                questions.remove(&question.user_id);
                return Ok(true);
            }
            Ok(false)
        }
    }

    #[derive(Default)]
    struct MemRecords {
        records: Mutex<HashMap<MessageId, ActionExecutionRecord>>,
    }

    #[async_trait]
    impl ExecutionRecordStore for MemRecords {
        async fn get(
            &self,
            message_id: &MessageId,
        ) -> Result<Option<ActionExecutionRecord>, StoreError> {
            Ok(self.records.lock().unwrap().get(message_id).cloned())
        }

        async fn claim(&self, message_id: &MessageId) -> Result<bool, StoreError> {
            let mut records = self.records.lock().unwrap();
            if records.contains_key(message_id) {
                return Ok(false);
            }
            records.insert(
                message_id.clone(),
                ActionExecutionRecord::claimed(message_id.clone()),
            );
            Ok(true)
        }

        async fn record_result(
            &self,
            message_id: &MessageId,
            result_ref: &str,
        ) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .get_mut(message_id)
                .ok_or_else(|| StoreError::NotFound(message_id.to_string()))?;
            record.result_ref = Some(result_ref.to_string());
            Ok(())
        }
    }

    /// Action executor returning a fixed result and recording requests
    struct ScriptedActions {
        result: Result<ActionResult, String>,
        requests: Mutex<Vec<ActionRequest>>,
        /// Question to put into the store while the action runs
        replace_with: Option<(Arc<MemPending>, PendingQuestion)>,
    }

    impl ScriptedActions {
        fn succeeding(result: ActionResult) -> Self {
            Self {
                result: Ok(result),
                requests: Mutex::new(Vec::new()),
                replace_with: None,
            }
        }

        fn failing(error: &str) -> Self {
            Self {
                result: Err(error.to_string()),
                requests: Mutex::new(Vec::new()),
                replace_with: None,
            }
        }

        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ActionExecutor for ScriptedActions {
        async fn execute(&self, request: &ActionRequest) -> Result<ActionResult, ActionError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some((store, question)) = &self.replace_with {
                store.put(question.clone()).await.unwrap();
            }
            tokio::task::yield_now().await;
            self.result.clone().map_err(ActionError::Failed)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationDispatcher for RecordingNotifier {
        async fn send(
            &self,
            _user_id: &UserId,
            title: &str,
            body: &str,
        ) -> Result<(), NotificationError> {
            if self.fail {
                return Err(NotificationError::DeliveryFailed("push token expired".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct Harness {
        pending: Arc<MemPending>,
        records: Arc<MemRecords>,
        actions: Arc<ScriptedActions>,
        notifier: Arc<RecordingNotifier>,
        memory: Arc<SharedMemoryBank>,
    }

    impl Harness {
        fn new(actions: ScriptedActions) -> Self {
            Self::with_notifier(actions, RecordingNotifier::default())
        }

        fn with_notifier(actions: ScriptedActions, notifier: RecordingNotifier) -> Self {
            Self {
                pending: Arc::new(MemPending::default()),
                records: Arc::new(MemRecords::default()),
                actions: Arc::new(actions),
                notifier: Arc::new(notifier),
                memory: Arc::new(SharedMemoryBank::default()),
            }
        }

        fn use_case(&self) -> ConfirmationTriggerUseCase {
            ConfirmationTriggerUseCase::new(
                self.pending.clone(),
                self.records.clone(),
                self.actions.clone(),
                self.notifier.clone(),
                self.memory.clone(),
            )
        }

        async fn ask(&self, user: &str, action: &str) -> PendingQuestion {
            let question = PendingQuestion::new(user, "Shall I send the report?", action);
            self.pending.put(question.clone()).await.unwrap();
            question
        }
    }

    fn report_result() -> ActionResult {
        ActionResult::new("Report delivered").with_items(["Board prefers weekly summaries"])
    }

    #[tokio::test]
    async fn test_affirmation_executes_pending_action() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        harness.ask("u1", "send_report").await;
        let trigger = harness.use_case();

        let outcome = trigger
            .on_message(&InboundMessage::new("u1", "m1", "Kör"))
            .await
            .unwrap();

        match outcome {
            TriggerOutcome::Executed {
                action_ref,
                outcome,
                fragments_added,
            } => {
                assert_eq!(action_ref.as_str(), "send_report");
                assert!(outcome.is_success());
                assert_eq!(fragments_added, 1);
            }
            other => panic!("expected execution, got {:?}", other),
        }
        assert_eq!(harness.actions.count(), 1);
        assert!(
            harness
                .pending
                .current(&UserId::new("u1"))
                .await
                .unwrap()
                .is_none()
        );

        let record = harness
            .records
            .get(&MessageId::new("m1"))
            .await
            .unwrap()
            .unwrap();
        assert!(record.executed);
        assert_eq!(
            record.result_ref.as_deref(),
            Some("succeeded: Report delivered")
        );

        let fragments = harness.memory.recent(10);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].content, "Board prefers weekly summaries");
        assert!(fragments[0].has_tag(TAG_SUCCESS));
        assert_eq!(
            fragments[0].contributor,
            Contributor::Action("send_report".into())
        );

        let sent = harness.notifier.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![(
                "send_report completed".to_string(),
                "Report delivered".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_redelivered_message_is_not_executed_twice() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        harness.ask("u1", "send_report").await;
        let trigger = harness.use_case();
        let message = InboundMessage::new("u1", "m1", "yes");

        trigger.on_message(&message).await.unwrap();
        // The agent asks again; the old message id must still not fire
        harness.ask("u1", "send_report").await;
        let second = trigger.on_message(&message).await.unwrap();

        assert_eq!(second, TriggerOutcome::AlreadyExecuted);
        assert_eq!(harness.actions.count(), 1);
        assert_eq!(harness.memory.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicates_execute_once() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        harness.ask("u1", "send_report").await;
        let trigger = Arc::new(harness.use_case());
        let message = InboundMessage::new("u1", "m1", "yes");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let trigger = Arc::clone(&trigger);
            let message = message.clone();
            handles.push(tokio::spawn(
                async move { trigger.on_message(&message).await },
            ));
        }
        let mut executed = 0;
        for handle in handles {
            if let TriggerOutcome::Executed { .. } = handle.await.unwrap().unwrap() {
                executed += 1;
            }
        }

        assert_eq!(executed, 1);
        assert_eq!(harness.actions.count(), 1);
    }

    #[tokio::test]
    async fn test_affirmation_without_pending_question() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        let trigger = harness.use_case();

        let outcome = trigger
            .on_message(&InboundMessage::new("u2", "m9", "yes"))
            .await
            .unwrap();

        assert_eq!(outcome, TriggerOutcome::NoPendingQuestion);
        assert_eq!(harness.actions.count(), 0);
        assert!(
            harness
                .records
                .get(&MessageId::new("m9"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_non_affirmative_message_touches_nothing() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        harness.ask("u1", "send_report").await;
        let trigger = harness.use_case();

        for (id, text) in [("m1", "no thanks"), ("m2", "yes, but later")] {
            let outcome = trigger
                .on_message(&InboundMessage::new("u1", id, text))
                .await
                .unwrap();
            assert_eq!(outcome, TriggerOutcome::NotAffirmative);
        }
        assert_eq!(harness.actions.count(), 0);
        assert!(
            harness
                .pending
                .current(&UserId::new("u1"))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_failed_action_adds_no_memory_but_notifies() {
        let harness = Harness::new(ScriptedActions::failing("CRM unreachable"));
        harness.ask("u1", "lead_search").await;
        let trigger = harness.use_case();

        let outcome = trigger
            .on_message(&InboundMessage::new("u1", "m1", "do it"))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            TriggerOutcome::Executed {
                outcome: ActionOutcome::Failed { .. },
                fragments_added: 0,
                ..
            }
        ));
        assert!(harness.memory.is_empty());
        let record = harness
            .records
            .get(&MessageId::new("m1"))
            .await
            .unwrap()
            .unwrap();
        assert!(record.result_ref.unwrap().starts_with("failed:"));
        let sent = harness.notifier.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "lead_search failed");
    }

    #[tokio::test]
    async fn test_failure_notification_can_be_disabled() {
        let harness = Harness::new(ScriptedActions::failing("CRM unreachable"));
        harness.ask("u1", "lead_search").await;
        let trigger = harness
            .use_case()
            .with_params(TriggerParams::default().with_notify_on_failure(false));

        trigger
            .on_message(&InboundMessage::new("u1", "m1", "yes"))
            .await
            .unwrap();

        assert!(harness.notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_fail_trigger() {
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let harness =
            Harness::with_notifier(ScriptedActions::succeeding(report_result()), notifier);
        harness.ask("u1", "send_report").await;
        let trigger = harness.use_case();

        let outcome = trigger
            .on_message(&InboundMessage::new("u1", "m1", "yes"))
            .await
            .unwrap();

        assert!(matches!(outcome, TriggerOutcome::Executed { .. }));
        assert_eq!(harness.memory.len(), 1);
    }

    #[tokio::test]
    async fn test_newer_question_survives_clear() {
        let pending = Arc::new(MemPending::default());
        let newer = PendingQuestion::new("u1", "Want the lead list too?", "lead_search");
        let actions = ScriptedActions {
            replace_with: Some((Arc::clone(&pending), newer.clone())),
            ..ScriptedActions::succeeding(report_result())
        };
        let mut harness = Harness::new(actions);
        harness.pending = pending;
        harness.ask("u1", "send_report").await;
        let trigger = harness.use_case();

        trigger
            .on_message(&InboundMessage::new("u1", "m1", "yes"))
            .await
            .unwrap();

        assert_eq!(
            harness.pending.current(&UserId::new("u1")).await.unwrap(),
            Some(newer)
        );
    }

    #[tokio::test]
    async fn test_action_receives_memory_context() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        harness.memory.add(
            Contributor::Action("lead_search".into()),
            "Oslo Marketing AS",
            vec![TAG_SUCCESS.to_string()],
        );
        harness.ask("u1", "send_report").await;
        let trigger = harness.use_case();

        trigger
            .on_message(&InboundMessage::new("u1", "m1", "ja"))
            .await
            .unwrap();

        let requests = harness.actions.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].question_text, "Shall I send the report?");
        assert!(
            requests[0]
                .memory_context
                .as_deref()
                .unwrap()
                .contains("Oslo Marketing AS")
        );
    }

    #[tokio::test]
    async fn test_custom_affirmations() {
        let harness = Harness::new(ScriptedActions::succeeding(report_result()));
        harness.ask("u1", "send_report").await;
        let trigger = harness
            .use_case()
            .with_params(TriggerParams::default().with_affirmations(["make it so"]));

        let yes = trigger
            .on_message(&InboundMessage::new("u1", "m1", "yes"))
            .await
            .unwrap();
        let custom = trigger
            .on_message(&InboundMessage::new("u1", "m2", "Make it so!"))
            .await
            .unwrap();

        assert_eq!(yes, TriggerOutcome::NotAffirmative);
        assert!(matches!(custom, TriggerOutcome::Executed { .. }));
    }
}
