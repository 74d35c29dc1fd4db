#![allow(missing_docs)]

pub mod expr;
pub mod forms;
pub mod message;
pub mod questions;
pub mod record;
pub mod result;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use expr::Expr;
pub use questions::{CatalogError, QuestionCatalog, QuestionsResponse, SubmitResponse};
pub use record::{FieldValue, Record};
pub use result::{ErrorCode, FieldError, ValidationResult};
pub use spec::{
    FieldKind, FieldRule, FieldSpec, Format, FormSpec, Guard, Required, RuleSet, SpecError,
};
pub use validate::validate;
pub use visibility::{VisibilityMap, visible_fields};
