pub mod field;
pub mod form;
pub mod rule;

pub use field::{FieldKind, FieldSpec};
pub use form::{FormSpec, SpecError};
pub use rule::{FieldRule, Format, Guard, Required, RuleSet};
