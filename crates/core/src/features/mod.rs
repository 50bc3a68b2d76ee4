//! Features module - the versioned feature pipeline.
//!
//! Turns a raw [`Entry`](crate::entries::Entry) into a fixed-schema numeric
//! feature vector: frequency-weighted text features over the note field,
//! scaled numeric features (amount, day-of-week, day-of-month), and a
//! historical note-frequency feature keyed by normalized note text.
//!
//! The pipeline is fitted only during training and serialized alongside the
//! classifier so inference always uses the exact fitting that training did.
//! `FEATURE_SCHEMA_VERSION` travels with the persisted blob and is enforced
//! at load time; a mismatch is treated as "no model".

mod pipeline;
mod scaler;
mod vectorizer;

pub use pipeline::{FeaturePipeline, NoteFrequencyTable, FEATURE_SCHEMA_VERSION};
pub use scaler::NumericScaler;
pub use vectorizer::{normalize_note, TextVectorizer};
