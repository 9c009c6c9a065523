//! Column type inference.

mod typing;

pub use typing::{InferenceConfig, InferredType, TypeInferrer};
