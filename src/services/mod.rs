pub mod catalog;
pub mod catalog_loader;
pub mod geometry_normalizer;
pub mod path_classifier;
pub mod path_extractor;
pub mod pattern_matcher;
pub mod reference_model;
pub mod signature_cache;

pub use catalog_loader::{load_reference_model, parse_reference_model};
pub use geometry_normalizer::{compute_signature, GeometryNormalizer};
pub use path_classifier::{PathClassifier, PathKind};
pub use path_extractor::PathExtractor;
pub use pattern_matcher::{MatchWeights, PatternMatcher};
pub use reference_model::{ReferenceEntry, ReferenceModel, ReferenceModelBuilder};
pub use signature_cache::{CacheStats, SignatureCache};
