use crate::consts::GUIDANCE_REPLY;
use crate::error::AppError;
use crate::twilio_types::{message_response, wrap_twiml, TwilioWebhookPayload};
use crate::types::{AppState, InboundEvent};
use crate::utils::transient_audio_path;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, trace};

pub async fn index() -> impl IntoResponse {
    Json(serde_json::json!({ "hello": "world" }))
}

pub async fn whatsapp_webhook(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> impl IntoResponse {
    trace!(body=%body, "webhook request body");
    let payload = match serde_urlencoded::from_str::<TwilioWebhookPayload>(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(error=%e, "failed to deserialize Twilio webhook payload");
            return (
                StatusCode::BAD_REQUEST,
                HeaderMap::new(),
                "Bad request".to_string(),
            );
        }
    };
    let event = InboundEvent::from(payload);
    let reply = handle_incoming(&event, &app_state).await;

    let twiml = wrap_twiml(xmlserde::xml_serialize(message_response(reply)));
    trace!("twiml: '{}'", twiml);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "application/xml".parse().unwrap());
    (StatusCode::OK, headers, twiml)
}

/// The decision tree for one inbound event.  Every pipeline failure is
/// converted to reply text here; nothing escapes as a protocol-level error.
pub async fn handle_incoming(event: &InboundEvent, app_state: &AppState) -> String {
    if event.num_media == 0 {
        return GUIDANCE_REPLY.to_string();
    }
    let media_type = event.media_content_type.as_deref().unwrap_or_default();
    if !media_type.contains("audio") {
        return format!("Invalid media type: {media_type}.");
    }
    match process_audio(event, media_type, app_state).await {
        Ok(text) => text,
        Err(e) => {
            error!(error=%e, "audio pipeline failed");
            format!("Error processing audio: {e}")
        }
    }
}

/// fetch -> persist -> transcribe (+ optional summarize).  The transient
/// file is removed by the transcription service on every exit path.
async fn process_audio(
    event: &InboundEvent,
    media_type: &str,
    app_state: &AppState,
) -> Result<String, AppError> {
    let media_url = event.media_url.as_deref().ok_or_else(|| {
        AppError::Transcription("media url missing from webhook payload".to_string())
    })?;
    let audio = app_state.media_fetcher.fetch_media(media_url).await?;
    info!(len = audio.len(), media_type, "downloaded audio attachment");

    let path = transient_audio_path(media_type);
    fs::write(&path, &audio).await.map_err(AppError::Io)?;
    debug!(path=%path.display(), "persisted transient audio payload");

    app_state.transcription.transcribe_and_summarize(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaFetcher;
    use crate::openai_types::OpenAIMessage;
    use crate::summarize::{ChatCompletion, TranscriptSummarizer};
    use crate::transcription::{SpeechToText, TranscriptionService};

    use async_trait::async_trait;
    use std::path::Path;

    struct FakeFetcher;

    #[async_trait]
    impl MediaFetcher for FakeFetcher {
        async fn fetch_media(&self, _url: &str) -> Result<Vec<u8>, AppError> {
            Ok(b"fake audio bytes".to_vec())
        }
    }

    struct FakeStt {
        result: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl SpeechToText for FakeStt {
        async fn transcribe_file(&self, path: &Path) -> Result<String, AppError> {
            assert!(path.exists(), "transient payload should be on disk");
            match self.result {
                Ok(text) => Ok(text.to_string()),
                Err(msg) => Err(AppError::Transcription(msg.to_string())),
            }
        }
    }

    struct UnusedChat;

    #[async_trait]
    impl ChatCompletion for UnusedChat {
        async fn complete(&self, _: Vec<OpenAIMessage>) -> Result<String, AppError> {
            panic!("chat completion should not be reached in these tests");
        }
    }

    fn state(stt_result: Result<&'static str, &'static str>) -> AppState {
        AppState {
            media_fetcher: Arc::new(FakeFetcher),
            transcription: TranscriptionService::new(
                Arc::new(FakeStt { result: stt_result }),
                TranscriptSummarizer::new(Arc::new(UnusedChat)),
            ),
        }
    }

    fn event(
        num_media: u32,
        media_url: Option<&str>,
        media_content_type: Option<&str>,
    ) -> InboundEvent {
        InboundEvent {
            body: "hi".to_string(),
            num_media,
            media_url: media_url.map(String::from),
            media_content_type: media_content_type.map(String::from),
        }
    }

    #[tokio::test]
    async fn no_media_returns_guidance() {
        let reply = handle_incoming(&event(0, None, None), &state(Ok("unused"))).await;
        assert_eq!(
            reply,
            "I'm sorry, I didn't understand that. Send an audio, please. \
             This bot will transcribe it."
        );
    }

    #[tokio::test]
    async fn non_audio_media_is_rejected_by_type() {
        let reply = handle_incoming(
            &event(1, Some("https://example.com/pic"), Some("image/png")),
            &state(Ok("unused")),
        )
        .await;
        assert_eq!(reply, "Invalid media type: image/png.");
    }

    #[tokio::test]
    async fn short_audio_replies_with_raw_transcript() {
        let reply = handle_incoming(
            &event(
                1,
                Some("https://example.com/audio.ogg"),
                Some("audio/ogg"),
            ),
            &state(Ok("hello from a voice note")),
        )
        .await;
        assert_eq!(reply, "hello from a voice note");
    }

    #[tokio::test]
    async fn backend_rejection_is_prefixed() {
        let reply = handle_incoming(
            &event(
                1,
                Some("https://example.com/audio.ogg"),
                Some("audio/ogg"),
            ),
            &state(Err("Invalid file format")),
        )
        .await;
        assert_eq!(reply, "Error processing audio: Invalid file format");
    }

    #[tokio::test]
    async fn missing_media_url_becomes_error_reply() {
        let reply =
            handle_incoming(&event(1, None, Some("audio/ogg")), &state(Ok("unused"))).await;
        assert_eq!(
            reply,
            "Error processing audio: media url missing from webhook payload"
        );
    }

    // 41 tokens with no detectable script.
    const DIGIT_TRANSCRIPT: &str = "7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 \
                                    7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7 7";

    #[tokio::test]
    async fn undetectable_transcript_language_is_reported() {
        let reply = handle_incoming(
            &event(
                1,
                Some("https://example.com/audio.ogg"),
                Some("audio/ogg"),
            ),
            &state(Ok(DIGIT_TRANSCRIPT)),
        )
        .await;
        assert_eq!(
            reply,
            "Error processing audio: unable to detect transcript language"
        );
    }

    #[tokio::test]
    async fn malformed_webhook_body_returns_bad_request() {
        let resp = whatsapp_webhook(
            State(Arc::new(state(Ok("unused")))),
            "NumMedia=0".to_string(),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], b"Bad request");
    }

    #[tokio::test]
    async fn webhook_wraps_reply_in_message_twiml() {
        let resp = whatsapp_webhook(
            State(Arc::new(state(Ok("unused")))),
            "Body=hi&NumMedia=0".to_string(),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/xml");
        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        let twiml = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            twiml,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Response><Message><Body>{GUIDANCE_REPLY}</Body></Message></Response>"
            )
        );
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_reply() {
        struct BrokenFetcher;
        #[async_trait]
        impl MediaFetcher for BrokenFetcher {
            async fn fetch_media(&self, _url: &str) -> Result<Vec<u8>, AppError> {
                Err(AppError::Transcription("connection reset".to_string()))
            }
        }
        let app_state = AppState {
            media_fetcher: Arc::new(BrokenFetcher),
            transcription: TranscriptionService::new(
                Arc::new(FakeStt { result: Ok("unused") }),
                TranscriptSummarizer::new(Arc::new(UnusedChat)),
            ),
        };
        let reply = handle_incoming(
            &event(1, Some("https://example.com/a.ogg"), Some("audio/ogg")),
            &app_state,
        )
        .await;
        assert_eq!(reply, "Error processing audio: connection reset");
    }
}
