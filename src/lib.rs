pub mod error;
pub mod handlers;
pub mod media;
pub mod openai;
pub mod openai_types;
pub mod summarize;
pub mod transcription;
pub mod twilio_types;
pub mod types;
pub mod utils;

pub mod consts {
    pub const GUIDANCE_REPLY: &str =
        "I'm sorry, I didn't understand that. Send an audio, please. This bot will transcribe it.";
    pub const SUMMARY_TOKEN_THRESHOLD: usize = 40;
    pub const SUMMARY_WORD_LIMIT: usize = 41;
    pub const WHISPER_MODEL: &str = "whisper-1";
    pub const CHAT_MODEL: &str = "gpt-3.5-turbo";
}
