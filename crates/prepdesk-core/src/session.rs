//! Session state machine, session store, and the interview engine.
//!
//! A session is `Active` while the cursor points inside the question list
//! and `Finished` once it reaches the end; a finished session never
//! mutates again. The store is an explicit, injected component so tests
//! get isolated state instead of ambient globals.
//!
//! Consistency contract: one client is expected to drive submissions for
//! a session serially, while telemetry samples may arrive concurrently
//! over a persistent connection. Telemetry writes and submission-driven
//! reads for the same question may race; the snapshot taken at submission
//! time is best-effort by design.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::evaluate::{evaluate, EvaluationDetail};
use crate::model::{AnswerRecord, Question, Section};
use crate::report::Report;
use crate::telemetry::{SampleUpdate, TelemetrySample};

/// The question bank seam. Selection must be deterministic given its
/// inputs; see `prepdesk-bank` for the shipped implementation.
pub trait QuestionSource: Send + Sync {
    fn select(&self, role: &str, requested_types: &[String], count: usize) -> Vec<Question>;
}

/// One interview instance. Owned exclusively by its session id until
/// process end; sessions are never explicitly destroyed.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub role: String,
    /// Fixed at creation, immutable afterwards.
    pub questions: Vec<Question>,
    /// Index of the current question; `cursor == questions.len()` is terminal.
    pub cursor: usize,
    /// One record per consumed question, in question order.
    /// Invariant: `answers.len() == cursor`.
    pub answers: Vec<AnswerRecord>,
    /// Per-question delivery telemetry, created lazily on first sample.
    pub telemetry: HashMap<String, TelemetrySample>,
    /// Single-slot prompt for the transport; setting overwrites, reading clears.
    pub pending_prompt: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// A minimal session created when the telemetry stream connects
    /// before `start` was called for this id.
    fn detached(id: &str) -> Self {
        Self {
            id: id.to_string(),
            role: String::new(),
            questions: Vec::new(),
            cursor: 0,
            answers: Vec::new(),
            telemetry: HashMap::new(),
            pending_prompt: None,
            started_at: Utc::now(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    /// The question the cursor currently points at, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }
}

/// In-memory session table keyed by session id. Create/read/update only,
/// no deletion; storage lives until process end.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock only means another thread panicked mid-update;
    /// the table itself is still usable, so recover instead of spreading
    /// the panic.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, session: Session) {
        self.lock().insert(session.id.clone(), session);
    }

    /// Run `f` against the named session, if it exists.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        self.lock().get_mut(id).map(f)
    }

    /// Like [`with_session`](Self::with_session), but creates a detached
    /// session when the id is unknown.
    pub fn with_session_or_detached<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> T {
        let mut sessions = self.lock();
        let session = sessions
            .entry(id.to_string())
            .or_insert_with(|| Session::detached(id));
        f(session)
    }

    /// Clone the named session out of the table (for report building).
    pub fn snapshot(&self, id: &str) -> Option<Session> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Parameters for starting an interview session.
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// Caller-supplied opaque token, unique per concurrent interview.
    pub session_id: String,
    pub role: String,
    /// Requested question types; normalization hints for the bank.
    pub topics: Vec<String>,
    pub question_count: usize,
}

/// Response to `start`: the first question and its classification.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub session_id: String,
    pub question: Option<Question>,
    pub question_count: usize,
    pub section: Option<Section>,
}

/// Response to `advance`: the next question, or the terminal signal.
#[derive(Debug, Clone)]
pub struct AdvanceOutcome {
    pub done: bool,
    pub question: Option<Question>,
    pub section: Option<Section>,
}

impl AdvanceOutcome {
    fn terminal() -> Self {
        Self {
            done: true,
            question: None,
            section: None,
        }
    }
}

/// The sole owner of session identity and progression. All scoring
/// components are pure functions over data the engine hands them.
pub struct InterviewEngine {
    store: Arc<SessionStore>,
    bank: Arc<dyn QuestionSource>,
}

impl InterviewEngine {
    pub fn new(store: Arc<SessionStore>, bank: Arc<dyn QuestionSource>) -> Self {
        Self { store, bank }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Start a session: draw the question list from the bank, reset
    /// progression, and queue the welcome prompt.
    pub fn start(&self, req: StartRequest) -> StartOutcome {
        let questions = self
            .bank
            .select(&req.role, &req.topics, req.question_count);
        let first = questions.first().cloned();
        let pending_prompt = first.as_ref().map(|q| {
            format!(
                "Good evening. Welcome to your mock interview for the {} position. \
                 We'll begin with a {} question. Please tell me a bit about yourself.",
                req.role,
                q.kind.label()
            )
        });

        let session = Session {
            id: req.session_id.clone(),
            role: req.role,
            cursor: 0,
            answers: Vec::new(),
            telemetry: HashMap::new(),
            pending_prompt,
            started_at: Utc::now(),
            questions,
        };
        let question_count = session.questions.len();
        tracing::info!(session = %session.id, role = %session.role, questions = question_count, "session started");
        self.store.insert(session);

        let section = first.as_ref().and_then(|q| q.kind.section());
        StartOutcome {
            session_id: req.session_id,
            question: first,
            question_count,
            section,
        }
    }

    /// Evaluate the current question, snapshot its delivery telemetry,
    /// append the answer record, and move the cursor.
    ///
    /// Unknown or already-finished sessions get the terminal response
    /// without mutation; the call is idempotent once terminal.
    pub fn advance(
        &self,
        session_id: &str,
        text: Option<&str>,
        choice: Option<&str>,
    ) -> AdvanceOutcome {
        self.store
            .with_session(session_id, |session| {
                if session.is_finished() {
                    return AdvanceOutcome::terminal();
                }
                let question = session.questions[session.cursor].clone();
                let eval = evaluate(&question, text, choice);
                let delivery_score = session
                    .telemetry
                    .get(&question.id)
                    .map(TelemetrySample::delivery_score)
                    .unwrap_or(0.0);
                let correct = match eval.detail {
                    EvaluationDetail::Mcq { correct } => Some(correct),
                    EvaluationDetail::Overlap { .. } => None,
                };
                let text_score = if question.kind.is_mcq() {
                    None
                } else {
                    Some(eval.score)
                };

                session.answers.push(AnswerRecord {
                    question_id: question.id.clone(),
                    kind: question.kind.clone(),
                    question_text: question.prompt.clone(),
                    answer_text: text.map(str::to_string),
                    chosen: choice.map(str::to_string),
                    score: eval.score,
                    text_score,
                    delivery_score,
                    correct,
                });
                session.cursor += 1;
                debug_assert_eq!(session.answers.len(), session.cursor);
                tracing::debug!(
                    session = %session.id,
                    question = %question.id,
                    score = eval.score,
                    delivery = delivery_score,
                    "answer recorded"
                );

                let Some(next) = session.current_question().cloned() else {
                    return AdvanceOutcome::terminal();
                };
                session.pending_prompt =
                    Some(format!("We'll proceed with a {} question.", next.kind.label()));
                let section = next.kind.section();
                AdvanceOutcome {
                    done: false,
                    question: Some(next),
                    section,
                }
            })
            .unwrap_or_else(AdvanceOutcome::terminal)
    }

    /// Fold a partial telemetry update into the current question's sample.
    ///
    /// Never fails: an unknown session id gets a detached session (the
    /// stream may connect before `start`), and an update with no current
    /// question is dropped.
    pub fn record_telemetry(&self, session_id: &str, update: &SampleUpdate) {
        self.store.with_session_or_detached(session_id, |session| {
            let Some(question_id) = session.current_question().map(|q| q.id.clone()) else {
                tracing::debug!(session = %session.id, "telemetry with no current question, dropped");
                return;
            };
            session
                .telemetry
                .entry(question_id)
                .or_default()
                .apply(update);
        });
    }

    /// Read-and-clear the pending prompt. The transport delivers it at
    /// most once per unit of work.
    pub fn take_prompt(&self, session_id: &str) -> Option<String> {
        self.store
            .with_session(session_id, |session| session.pending_prompt.take())
            .flatten()
    }

    /// Build the final report from the full answer history. Repeatable:
    /// nothing is consumed. Unknown sessions get the zeroed report.
    pub fn finish(&self, session_id: &str) -> Report {
        match self.store.snapshot(session_id) {
            Some(session) => Report::build(&session),
            None => {
                tracing::warn!(session = %session_id, "finish for unknown session");
                Report::not_found(session_id)
            }
        }
    }
}
