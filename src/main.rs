use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devlingo::config::{self, Settings};
use devlingo::db::{self, SqliteStore};
use devlingo::handlers;
use devlingo::llm::gemini::GeminiClient;
use devlingo::notice::Notices;
use devlingo::prompts::PromptComposer;
use devlingo::state::AppState;
use devlingo::store::ProgressStore;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "devlingo=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();
  tracing::debug!("Loaded settings: {:?}", settings);

  let pool = db::init_db(&settings.database_path).expect("Failed to initialize database");
  let progress = Arc::new(ProgressStore::load(Arc::new(SqliteStore::new(pool))));

  let current = progress.get();
  tracing::info!(
    "Learner at level {} ({} / {} XP, {} exercises completed)",
    current.level,
    current.experience,
    current.experience_to_next_level,
    current.history.len()
  );

  if settings.llm.api_key.is_none() {
    tracing::warn!("GEMINI_API_KEY is not set; exercise generation will fail until it is configured");
  }
  let llm = Arc::new(GeminiClient::new(&settings.llm));
  tracing::info!("Using model {}", settings.llm.model);

  let composer = PromptComposer::new(settings.explanation_language.clone());
  tracing::info!("Explanations and feedback in {}", composer.explanation_language());

  let notices = Arc::new(Notices::new(chrono::Duration::seconds(config::NOTICE_TTL_SECS)));
  let state = AppState::new(progress.clone(), notices, llm, composer);

  // Log level changes as they happen
  let mut changes = progress.subscribe();
  tokio::spawn(async move {
    let mut level = changes.borrow_and_update().level;
    while changes.changed().await.is_ok() {
      let next = changes.borrow_and_update().level;
      if next != level {
        tracing::info!("Learner advanced from level {} to {}", level, next);
        level = next;
      }
    }
  });

  let app = handlers::router(state);

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.server_port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
