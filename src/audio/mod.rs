// Audio processing module
// Handles WAV file ingestion and sample normalization

pub mod ingest;

pub use ingest::{load_wav, AudioData, AudioError};
