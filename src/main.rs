use twilio_transcribe::handlers;
use twilio_transcribe::media::TwilioMediaFetcher;
use twilio_transcribe::openai::OpenAiClient;
use twilio_transcribe::summarize::TranscriptSummarizer;
use twilio_transcribe::transcription::TranscriptionService;
use twilio_transcribe::types::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(true)
                .with_line_number(true),
        )
        .with(tracing_subscriber::filter::Targets::new().with_targets([
            ("hyper", tracing_subscriber::filter::LevelFilter::OFF),
            (
                "twilio_transcribe",
                tracing_subscriber::filter::LevelFilter::DEBUG,
            ),
        ]));
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let openai_api_key = env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set!");
    let twilio_account_sid = env::var("TWILIO_ACCOUNT_SID").expect("TWILIO_ACCOUNT_SID not set!");
    let twilio_auth_token = env::var("TWILIO_AUTH_TOKEN").expect("TWILIO_AUTH_TOKEN not set!");

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("failed to build http client");
    let openai_client = Arc::new(OpenAiClient::new(http_client.clone(), openai_api_key));
    let media_fetcher = Arc::new(TwilioMediaFetcher::new(
        http_client,
        twilio_account_sid,
        twilio_auth_token,
    ));
    let transcription = TranscriptionService::new(
        openai_client.clone(),
        TranscriptSummarizer::new(openai_client),
    );

    let app_state = Arc::new(AppState {
        media_fetcher,
        transcription,
    });

    let app = Router::new()
        .route("/whatsapp", post(handlers::whatsapp_webhook))
        .route("/", get(handlers::index))
        .with_state(app_state);

    axum::Server::bind(&"0.0.0.0:3000".parse().unwrap())
        .serve(app.into_make_service())
        .await
        .unwrap();
}
