pub mod codec;
pub mod equation;
pub mod typeset;

pub use codec::{MarkupCodec, MarkupFragment, BLANK_MARKER, BLANK_RUN, EQUATION_PREFIX};
pub use equation::{append_fragment, blank_fragment, equation_fragment, EquationInserter, EquationOutcome};
pub use typeset::{LatexTypesetter, MathStyle, TypesetError, Typesetter};
