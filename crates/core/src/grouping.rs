//! Group labels for the message list.

use crate::form::FieldDescriptor;

/// Separator between the levels of a composed label.
pub const GROUP_SEPARATOR: &str = " - ";

/// A label needs at least the form title and a section title.
const MIN_CHAIN_DEPTH: usize = 2;

/// Composes "Form Title - Section Title" from a field's precomputed group
/// chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResolver;

impl GroupResolver {
    /// Returns `None` when the field is not attached to a section.
    pub fn resolve(&self, field: &FieldDescriptor) -> Option<String> {
        let chain = field.group_chain();
        if chain.len() < MIN_CHAIN_DEPTH {
            return None;
        }
        Some(chain.join(GROUP_SEPARATOR))
    }
}
