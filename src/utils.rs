use std::path::PathBuf;
use uuid::Uuid;

/// Pick a whisper-friendly file extension for a media content type.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type.split(';').next().unwrap_or_default().trim() {
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/ogg" => "ogg",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/flac" => "flac",
        "audio/webm" => "webm",
        _ => "mp3",
    }
}

/// A per-request unique location for the downloaded audio, so concurrent
/// webhook invocations never collide on a shared path.
pub fn transient_audio_path(content_type: &str) -> PathBuf {
    let ext = extension_for_content_type(content_type);
    std::env::temp_dir().join(format!("incoming-audio-{}.{ext}", Uuid::new_v4()))
}
