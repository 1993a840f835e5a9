//! Dynamic form composition: descriptors, assembly and validation.

pub mod assembly;
pub mod field;
pub mod validation;

pub use assembly::build_form;
pub use field::{
    CleanedField, CleanedForm, CleanedValue, FieldDescriptor, FieldKind, FieldProvenance,
    RawFields,
};
pub use validation::{clean, FieldError, FormErrors};
