pub mod composer;
pub mod session;
pub mod validation;

pub use composer::{score_line, ImageTarget, QuestionComposer, QuestionPreview, TextField};
pub use session::{AuthoringSession, SaveRequest, SessionKind, SessionPhase};
pub use validation::is_submittable;
