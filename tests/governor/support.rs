use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde_json::{Value, json};

use accord::{
    governor::{
        AdaptiveContext, AdaptiveContextPort, DeviationLearnerPort, EmbedderPort, Exchange,
        GenerationRequest, GovernorError, MemoryChannel, MemoryFragment, MemoryStorePort,
        PostureScorerPort, ResponseGeneratorPort, SpeakerRole, ThreadId,
        error::generation_failed,
    },
    posture::{PostureScore, PostureTriad},
};

pub fn neutral_score(rationale: &str) -> PostureScore {
    PostureScore::new(1.0, 1.0, 1.0, rationale)
}

pub fn score_from(triad: PostureTriad) -> PostureScore {
    PostureScore::new(triad.care, triad.autonomy, triad.accuracy, "scripted")
}

/// Returns scripted texts in order; the last one repeats. Records every
/// request it saw.
pub struct ScriptedGenerator {
    responses: Vec<String>,
    fail: bool,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(responses: &[&str]) -> Self {
        assert!(!responses.is_empty(), "generator needs at least one response");
        Self {
            responses: responses.iter().map(|text| text.to_string()).collect(),
            fail: false,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            responses: vec![String::new()],
            fail: true,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ResponseGeneratorPort for ScriptedGenerator {
    async fn generate(&self, req: GenerationRequest) -> Result<String, GovernorError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(req);
        if self.fail {
            return Err(generation_failed("scripted generator failure"));
        }
        let index = index.min(self.responses.len() - 1);
        Ok(self.responses[index].clone())
    }
}

/// Fixed requester posture; responder postures served in order with the
/// last one repeating.
pub struct ScriptedScorer {
    requester_posture: PostureScore,
    responder_postures: Vec<PostureScore>,
    responder_calls: AtomicUsize,
    pub requester_texts: Mutex<Vec<String>>,
}

impl ScriptedScorer {
    pub fn new(requester_posture: PostureScore, responder_triads: &[PostureTriad]) -> Self {
        assert!(
            !responder_triads.is_empty(),
            "scorer needs at least one responder posture"
        );
        Self {
            requester_posture,
            responder_postures: responder_triads.iter().copied().map(score_from).collect(),
            responder_calls: AtomicUsize::new(0),
            requester_texts: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_requester_texts(&self) -> Vec<String> {
        self.requester_texts.lock().expect("requester lock").clone()
    }
}

#[async_trait]
impl PostureScorerPort for ScriptedScorer {
    async fn score(&self, text: &str, role: SpeakerRole) -> Result<PostureScore, GovernorError> {
        match role {
            SpeakerRole::Requester => {
                self.requester_texts
                    .lock()
                    .expect("requester lock")
                    .push(text.to_string());
                Ok(self.requester_posture.clone())
            }
            SpeakerRole::Responder => {
                let index = self.responder_calls.fetch_add(1, Ordering::SeqCst);
                let index = index.min(self.responder_postures.len() - 1);
                Ok(self.responder_postures[index].clone())
            }
        }
    }
}

#[derive(Default)]
pub struct FixedEmbedder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmbedderPort for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, GovernorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.25, 0.5, 0.75])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistCall {
    pub exchange: Exchange,
    pub channel: MemoryChannel,
    pub thread_id: Option<String>,
}

/// Serves preset fragments and records every mutation.
#[derive(Default)]
pub struct RecordingMemory {
    pub fragments: Vec<MemoryFragment>,
    pub persisted: Mutex<Vec<PersistCall>>,
    pub created_threads: Mutex<Vec<String>>,
    pub touched_threads: Mutex<Vec<String>>,
}

impl RecordingMemory {
    pub fn with_fragments(fragments: Vec<MemoryFragment>) -> Self {
        Self {
            fragments,
            ..Self::default()
        }
    }

    pub fn persisted_calls(&self) -> Vec<PersistCall> {
        self.persisted.lock().expect("persist lock").clone()
    }

    pub fn touched(&self) -> Vec<String> {
        self.touched_threads.lock().expect("touch lock").clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.created_threads.lock().expect("create lock").clone()
    }
}

#[async_trait]
impl MemoryStorePort for RecordingMemory {
    async fn retrieve(
        &self,
        _query: &str,
        _embedding: &[f32],
    ) -> Result<Vec<MemoryFragment>, GovernorError> {
        Ok(self.fragments.clone())
    }

    async fn persist(
        &self,
        exchange: Exchange,
        channel: MemoryChannel,
        _embedding: &[f32],
        thread_id: Option<&str>,
    ) -> Result<(), GovernorError> {
        self.persisted.lock().expect("persist lock").push(PersistCall {
            exchange,
            channel,
            thread_id: thread_id.map(str::to_string),
        });
        Ok(())
    }

    async fn create_thread(&self, user_key: &str) -> Result<ThreadId, GovernorError> {
        let thread_id = format!("thread-{user_key}");
        self.created_threads
            .lock()
            .expect("create lock")
            .push(thread_id.clone());
        Ok(thread_id)
    }

    async fn touch_thread(&self, thread_id: &str) -> Result<(), GovernorError> {
        self.touched_threads
            .lock()
            .expect("touch lock")
            .push(thread_id.to_string());
        Ok(())
    }

    async fn thread_messages(
        &self,
        _thread_id: &str,
        limit: usize,
    ) -> Result<Vec<Exchange>, GovernorError> {
        let calls = self.persisted_calls();
        Ok(calls
            .into_iter()
            .map(|call| call.exchange)
            .take(limit)
            .collect())
    }

    async fn user_threads(&self, _user_key: &str) -> Result<Vec<ThreadId>, GovernorError> {
        Ok(self.created())
    }

    fn statistics(&self) -> Value {
        json!({ "fragments": self.fragments.len() })
    }
}

/// Fixed target; counts adaptation updates.
pub struct StubContextProvider {
    pub target: PostureTriad,
    pub updates: Mutex<Vec<(PostureScore, PostureScore)>>,
}

impl StubContextProvider {
    pub fn with_target(target: PostureTriad) -> Self {
        Self {
            target,
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().expect("updates lock").len()
    }
}

#[async_trait]
impl AdaptiveContextPort for StubContextProvider {
    async fn compute_context(
        &self,
        _input_posture: &PostureScore,
        _memories: &[MemoryFragment],
    ) -> Result<AdaptiveContext, GovernorError> {
        Ok(AdaptiveContext {
            target_triad: self.target,
            extra: Value::Null,
        })
    }

    async fn update_from_interaction(
        &self,
        input_posture: &PostureScore,
        output_posture: &PostureScore,
    ) -> Result<(), GovernorError> {
        self.updates
            .lock()
            .expect("updates lock")
            .push((input_posture.clone(), output_posture.clone()));
        Ok(())
    }

    fn state_summary(&self) -> Value {
        json!({ "updates": self.update_count() })
    }

    fn trajectory(&self) -> String {
        "steady".to_string()
    }
}

/// Records every deviation and dialogue it is handed.
#[derive(Default)]
pub struct CountingLearner {
    pub deviations: Mutex<Vec<PostureTriad>>,
    pub dialogues: Mutex<Vec<String>>,
}

impl CountingLearner {
    pub fn absorbed(&self) -> Vec<PostureTriad> {
        self.deviations.lock().expect("deviations lock").clone()
    }

    pub fn observed_dialogues(&self) -> Vec<String> {
        self.dialogues.lock().expect("dialogues lock").clone()
    }
}

#[async_trait]
impl DeviationLearnerPort for CountingLearner {
    async fn absorb(&self, deviation: PostureTriad, _memory: Arc<dyn MemoryStorePort>) {
        self.deviations
            .lock()
            .expect("deviations lock")
            .push(deviation);
    }

    async fn observe_dialogue(&self, text: &str) {
        self.dialogues
            .lock()
            .expect("dialogues lock")
            .push(text.to_string());
    }
}
