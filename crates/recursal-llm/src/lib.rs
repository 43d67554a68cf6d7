//! Recursal LLM - external classifier boundary and adapters

pub mod classifier;
pub mod openai;

pub use classifier::{
    Classification, Classifier, ClassifierError, ClassifierResult, ClassifyRequest,
};
pub use openai::OpenAiClassifier;
pub use tokio_util::sync::CancellationToken;
