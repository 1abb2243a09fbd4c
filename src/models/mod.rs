pub mod choice;
pub mod classification;
pub mod loaders;
pub mod question;
pub mod session;
pub mod solution;

pub use choice::{choice_label, Choice, ChoiceField, ChoiceSet};
pub use classification::{years, Classification, DepartmentCode, YearOrType};
pub use loaders::{load_all_drafts, load_draft_from_toml, DraftFile};
pub use question::{Mode, QuestionDraft, QuestionRecord};
pub use session::{AdminRole, Department, Operator, SessionContext, SubjectEntry};
pub use solution::{SolutionField, SolutionRecord};
