pub mod loaders;
pub mod match_result;
pub mod signature;
pub mod svg;

pub use loaders::{load_captcha_files, CaptchaFile};
pub use match_result::{MatchResult, SolveOutcome};
pub use signature::{BoundingBox, Complexity, PathSignature};
pub use svg::{PathElement, SvgDocument};
