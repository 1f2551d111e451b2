use super::traits::{ConversationStore, Feedback};
use crate::agent::ConversationState;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    states: Mutex<HashMap<String, ConversationState>>,
    feedback: Mutex<Vec<Feedback>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feedback(&self) -> Vec<Feedback> {
        self.feedback
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ConversationStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ConversationState> + Send + 'a>> {
        let state = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| ConversationState::empty(user_id));
        Box::pin(async move { state })
    }

    fn put<'a>(
        &'a self,
        user_id: &'a str,
        state: &'a ConversationState,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        self.states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(user_id.to_string(), state.clone());
        Box::pin(async move { true })
    }

    fn store_feedback<'a>(
        &'a self,
        feedback: &'a Feedback,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        self.feedback
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(feedback.clone());
        Box::pin(async move { true })
    }
}
