use async_trait::async_trait;
use copen_qa::{
    GatewayError,
    gateway::{Answer, QuestionAnswerer},
};
use std::sync::{Arc, Mutex};

/// Mock answerer for driving the chat loop without HTTP
#[derive(Debug, Clone)]
pub struct MockAnswerer {
    pub responses: Arc<Mutex<Vec<Result<Answer, GatewayError>>>>,
    pub questions: Arc<Mutex<Vec<String>>>,
}

impl MockAnswerer {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_responses(self, responses: Vec<Result<Answer, GatewayError>>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn get_questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Default for MockAnswerer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionAnswerer for MockAnswerer {
    async fn ask(&self, question: &str) -> Result<Answer, GatewayError> {
        self.questions.lock().unwrap().push(question.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            panic!(
                "MockAnswerer asked {:?} but no scripted responses are left",
                question
            );
        }

        responses.remove(0)
    }
}

pub fn answer(text: &str, source_url: Option<&str>) -> Answer {
    Answer {
        text: text.to_string(),
        source_url: source_url.map(str::to_string),
    }
}
