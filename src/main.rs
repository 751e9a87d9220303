use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::{Extension, Json, Router};
use serde_json::{Value, json};
use std::sync::Arc;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use studyspark::auth::handlers::{
    handle_login, handle_logout, handle_me, handle_refresh, handle_register,
};
use studyspark::auth::service::AuthService;
use studyspark::capability::extractors::HttpExtractor;
use studyspark::capability::imagegen::OpenAiImageGenerator;
use studyspark::capability::speech::{OpenAiSpeech, SpeechSynthesizer, TtsWorker};
use studyspark::capability::textgen::OpenAiTextGenerator;
use studyspark::config::{Settings, SpeechBackend};
use studyspark::doubts::handlers::{
    handle_ask, handle_delete_conversation, handle_get_conversation, handle_list_conversations,
};
use studyspark::doubts::service::DoubtService;
use studyspark::flashcards::handlers::{
    handle_create_flashcard, handle_delete_flashcard, handle_generate_flashcards,
    handle_get_flashcard, handle_list_decks, handle_list_flashcards, handle_review_flashcard,
    handle_update_flashcard,
};
use studyspark::flashcards::service::FlashcardService;
use studyspark::notes::handlers::{
    handle_create_from_pdf, handle_create_from_url, handle_create_from_youtube, handle_create_note,
    handle_delete_note, handle_get_note, handle_list_notes, handle_update_note,
};
use studyspark::notes::service::NoteService;
use studyspark::podcasts::handlers::{
    handle_delete_podcast, handle_download_podcast, handle_generate_podcast, handle_get_podcast,
    handle_list_podcasts, handle_list_voices,
};
use studyspark::podcasts::service::PodcastService;
use studyspark::store::blobs::{BlobStore, S3BlobStore};
use studyspark::store::documents::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let settings = Settings::from_env()?;
    tracing::info!("Starting StudySpark API on {}", settings.bind_addr);

    // 1. Collaborators:
    let store = Store::new();
    let http_client = reqwest::Client::new();

    let auth = AuthService::new(
        &settings.jwt_secret,
        settings.jwt_access_ttl_minutes,
        settings.jwt_refresh_ttl_days,
    );

    let blobs: Arc<dyn BlobStore> = Arc::new(
        S3BlobStore::new(settings.s3_bucket.clone(), settings.s3_region.clone()).await,
    );

    let extractor = Arc::new(HttpExtractor::new(http_client.clone()));
    let textgen = Arc::new(OpenAiTextGenerator::new(
        http_client.clone(),
        settings.openai_api_key.clone(),
    ));
    let imagegen = Arc::new(OpenAiImageGenerator::new(
        http_client.clone(),
        settings.openai_api_key.clone(),
    ));

    // The two synthesis strategies are alternatives, never composed. The
    // local strategy owns a worker resource that must be shut down.
    let mut tts_worker: Option<Arc<TtsWorker>> = None;
    let synthesizer: Arc<dyn SpeechSynthesizer> = match settings.speech_backend {
        SpeechBackend::Local => {
            let endpoint = settings
                .tts_endpoint
                .clone()
                .expect("validated by Settings::from_env");
            let worker = TtsWorker::start(endpoint, http_client.clone());
            tts_worker = Some(worker.clone());
            worker
        }
        SpeechBackend::Hosted => Arc::new(OpenAiSpeech::new(
            http_client.clone(),
            settings.openai_api_key.clone(),
        )),
    };

    // 2. Pipeline services:
    let notes = NoteService::new(store.clone(), extractor, textgen.clone());
    let flashcards = FlashcardService::new(store.clone(), textgen.clone(), imagegen);
    let podcasts = PodcastService::new(store.clone(), synthesizer, blobs);
    let doubts = DoubtService::new(store.clone(), textgen);

    // 3. HTTP router:
    let auth_routes = Router::new()
        .route("/register", post(handle_register))
        .route("/login", post(handle_login))
        .route("/me", get(handle_me))
        .route("/refresh", post(handle_refresh))
        .route("/logout", post(handle_logout));

    let note_routes = Router::new()
        .route("/", post(handle_create_note).get(handle_list_notes))
        .route("/from-pdf", post(handle_create_from_pdf))
        .route("/from-youtube", post(handle_create_from_youtube))
        .route("/from-url", post(handle_create_from_url))
        .route(
            "/:id",
            get(handle_get_note)
                .put(handle_update_note)
                .delete(handle_delete_note),
        );

    let flashcard_routes = Router::new()
        .route(
            "/",
            post(handle_create_flashcard).get(handle_list_flashcards),
        )
        .route("/generate", post(handle_generate_flashcards))
        .route("/decks", get(handle_list_decks))
        .route(
            "/:id",
            get(handle_get_flashcard)
                .put(handle_update_flashcard)
                .delete(handle_delete_flashcard),
        )
        .route("/:id/review", post(handle_review_flashcard));

    let podcast_routes = Router::new()
        .route("/", get(handle_list_podcasts))
        .route("/generate", post(handle_generate_podcast))
        .route("/voices", get(handle_list_voices))
        .route("/:id", get(handle_get_podcast).delete(handle_delete_podcast))
        .route("/:id/download", get(handle_download_podcast));

    let doubt_routes = Router::new()
        .route("/ask", post(handle_ask))
        .route("/conversations", get(handle_list_conversations))
        .route(
            "/conversations/:id",
            get(handle_get_conversation).delete(handle_delete_conversation),
        );

    let cors_origins: Vec<HeaderValue> = settings
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true);

    let app = Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .nest("/api/auth", auth_routes)
        .nest("/api/notes", note_routes)
        .nest("/api/flashcards", flashcard_routes)
        .nest("/api/podcasts", podcast_routes)
        .nest("/api/doubts", doubt_routes)
        .layer(Extension(store))
        .layer(Extension(auth))
        .layer(Extension(notes))
        .layer(Extension(flashcards))
        .layer(Extension(podcasts))
        .layer(Extension(doubts))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // 4. Serve until interrupted:
    let listener = tokio::net::TcpListener::bind(settings.bind_addr).await?;
    tracing::info!("HTTP server listening on {}", settings.bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // 5. Tear down the TTS worker after the last request has drained.
    if let Some(worker) = tts_worker {
        worker.shutdown().await;
    }

    Ok(())
}

async fn handle_root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the StudySpark API" }))
}

async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
