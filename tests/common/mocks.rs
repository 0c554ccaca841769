use async_trait::async_trait;
use concierge_relay::{
    Error, Result,
    llm::{GenerateContentRequest, GenerateContentResponse, LlmClient, ModelInfo},
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted upstream outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(GenerateContentResponse),
    Fail(String),
}

/// Mock LLM client for testing. Records every request it receives.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<MockReply>>,
    repeat: Option<MockReply>,
    requests: Mutex<Vec<GenerateContentRequest>>,
    models: Vec<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies in order, one per call.
    pub fn with_replies(self, replies: Vec<MockReply>) -> Self {
        *self.replies.lock().unwrap() = replies.into();
        self
    }

    /// Reply used once the scripted replies run out.
    pub fn always(mut self, reply: MockReply) -> Self {
        self.repeat = Some(reply);
        self
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn get_requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .or_else(|| self.repeat.clone());

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Fail(message)) => Err(Error::internal(message)),
            None => Err(Error::llm("No more mock responses available")),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        if self.models.is_empty() {
            return Err(Error::internal("model listing unavailable"));
        }

        Ok(self
            .models
            .iter()
            .map(|name| ModelInfo {
                name: name.clone(),
                display_name: None,
                supported_generation_methods: vec!["generateContent".to_string()],
            })
            .collect())
    }
}
