//! Concrete widget types.
//!
//! Each widget owns its own wire value semantics: how its current value is
//! serialized into the render description and how it is read back out of
//! the host's result payload. The engine itself only sees the generic
//! "did it change" contract through the
//! [`Interactive`](crate::widget::Interactive) capability.

mod button;
mod checkbox;
mod collapse_group;
mod label;
mod number_field;
mod selection_list;
mod text_field;
mod tree;

pub use button::Button;
pub use checkbox::Checkbox;
pub use collapse_group::CollapseGroup;
pub use label::Label;
pub use number_field::NumberField;
pub use selection_list::{ListEntry, SelectionList};
pub use text_field::TextField;
pub use tree::{NodeKey, TreeChange, TreeChecklist};
