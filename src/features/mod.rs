//! Sequence feature extraction.

pub mod tfidf;

pub use tfidf::{FeatureError, KmerVectorizer};
