use crate::media::MediaFetcher;
use crate::transcription::TranscriptionService;
use crate::twilio_types::TwilioWebhookPayload;

use std::sync::Arc;
use tracing::warn;

/// Shared per-process state.  Every external collaborator is injected here at
/// construction time so tests can swap in fakes without global mutation.
pub struct AppState {
    pub media_fetcher: Arc<dyn MediaFetcher>,
    pub transcription: TranscriptionService,
}

/// The semantic view of one inbound webhook call, decoded from the raw
/// Twilio form fields.  Read-only for the duration of one request.
#[derive(Debug)]
pub struct InboundEvent {
    pub body: String,
    pub num_media: u32,
    pub media_url: Option<String>,
    pub media_content_type: Option<String>,
}

impl From<TwilioWebhookPayload> for InboundEvent {
    fn from(payload: TwilioWebhookPayload) -> Self {
        let num_media = match payload.num_media.parse::<u32>() {
            Ok(n) => n,
            Err(e) => {
                warn!(num_media=%payload.num_media, error=%e, "unparseable NumMedia field");
                0
            }
        };
        Self {
            body: payload.body,
            num_media,
            media_url: payload.media_url0,
            media_content_type: payload.media_content_type0,
        }
    }
}
