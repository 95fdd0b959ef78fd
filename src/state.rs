//! Application state: the read-only catalog and its derived lookups, the
//! loaded settings, and the single learner session.
//!
//! This module owns:
//!   - the catalog (seeds + optional TOML extras), classifier and matcher
//!   - settings and reply templates (from TOML or defaults)
//!   - the session: progress, its backing store, the quiz flow and the
//!     quiz request gate, behind one async lock

use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::{sync::RwLock, time::Instant};
use tracing::{error, info, instrument};

use crate::catalog::Catalog;
use crate::config::{load_config_from_env, AppConfig, Responses, Settings};
use crate::error::StoreError;
use crate::gamification::Progress;
use crate::intent::IntentClassifier;
use crate::matcher::QuizMatcher;
use crate::quiz::{QuizFlow, QuizRequestGate};
use crate::store::LocalStore;

/// Everything that changes while the learner chats.
#[derive(Debug)]
pub struct Session {
    pub progress: Progress,
    pub store: LocalStore,
    pub quiz: QuizFlow,
    pub gate: QuizRequestGate,
    /// When the current question was shown; feeds the answer's elapsed time.
    pub question_started: Option<Instant>,
}

impl Session {
    pub fn new(store: LocalStore, settings: &Settings) -> Self {
        Self {
            progress: Progress::load(&store),
            store,
            quiz: QuizFlow::new(Duration::from_secs(settings.question_seconds), settings.pass_threshold),
            gate: QuizRequestGate::default(),
            question_started: None,
        }
    }

    /// Save progress. Failures are logged; the chat keeps going on the
    /// in-memory copy.
    pub fn persist(&mut self) {
        if let Err(e) = self.progress.save(&mut self.store) {
            error!(target: "learnquest", error = %e, "Failed to persist progress");
        }
    }

    pub fn elapsed_on_question(&self) -> Duration {
        self.question_started.map(|t| t.elapsed()).unwrap_or_default()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub classifier: IntentClassifier,
    pub matcher: Arc<QuizMatcher>,
    pub settings: Settings,
    pub responses: Responses,
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Build state from env: load config, build the catalog, open the store
    /// named by LEARNQUEST_STATE_PATH (memory-only when unset).
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Result<Self, StoreError> {
        let cfg = load_config_from_env().unwrap_or_default();
        let store = match std::env::var("LEARNQUEST_STATE_PATH") {
            Ok(p) if !p.trim().is_empty() => LocalStore::open(PathBuf::from(p))?,
            _ => {
                info!(target: "learnquest", "LEARNQUEST_STATE_PATH not set; progress is kept in memory only.");
                LocalStore::in_memory()
            }
        };
        Ok(Self::new(&cfg, store))
    }

    pub fn new(cfg: &AppConfig, store: LocalStore) -> Self {
        let catalog = Catalog::with_config(cfg);
        let classifier = IntentClassifier::new(catalog.vocabulary().to_vec());
        let matcher = QuizMatcher::new(&catalog);
        let session = Session::new(store, &cfg.settings);
        info!(
            target: "learnquest",
            quizzes = catalog.quizzes().len(),
            store = %session.store.path().map_or("memory".into(), |p| p.display().to_string()),
            stored_keys = session.store.len(),
            xp = session.progress.xp,
            level = session.progress.level,
            "Session ready"
        );

        Self {
            catalog: Arc::new(catalog),
            classifier,
            matcher: Arc::new(matcher),
            settings: cfg.settings.clone(),
            responses: cfg.responses.clone(),
            session: Arc::new(RwLock::new(session)),
        }
    }

    /// Built-in content, default settings, memory-only store.
    pub fn in_memory() -> Self {
        Self::new(&AppConfig::default(), LocalStore::in_memory())
    }
}
