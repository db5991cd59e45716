// Cadenza - Batched feature extraction for music transcription datasets
// Module declarations

pub mod audio;
pub mod chunk;
pub mod dataset;
pub mod export;
pub mod feature;
pub mod label;
pub mod paths;
pub mod processor;
