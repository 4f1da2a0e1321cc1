//! Hinglish Subs - Subtitle transcription and Hinglish translation
//! 
//! Transcribes audio/video with whisper.cpp, normalizes media with ffmpeg and
//! rewrites SRT/WebVTT dialogue into Hinglish through an LLM: English words
//! stay in Latin script, Hindi/Urdu words are written in Devanagari.

pub mod cli;
pub mod config;
pub mod workflow;
pub mod transcribe;
pub mod translate;
pub mod subtitle;
pub mod pipeline;
pub mod media;
pub mod server;
pub mod error;
