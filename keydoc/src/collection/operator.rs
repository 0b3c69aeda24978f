use crate::collection::Document;
use crate::common::{Value, OP_SET, OP_UNSET};

/// The update operators understood by [apply_modifier].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `$set`: assign every defined, named field of the payload.
    Set,
    /// `$unset`: remove every field of the payload whose value is exactly `1`.
    Unset,
}

impl UpdateOperator {
    pub fn from_name(name: &str) -> Option<UpdateOperator> {
        match name {
            OP_SET => Some(UpdateOperator::Set),
            OP_UNSET => Some(UpdateOperator::Unset),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpdateOperator::Set => OP_SET,
            UpdateOperator::Unset => OP_UNSET,
        }
    }

    fn apply(&self, target: &mut Document, payload: &Document) {
        match self {
            UpdateOperator::Set => {
                for (field, value) in payload.iter() {
                    if field.is_empty() {
                        log::warn!("Ignoring {} of an empty field name", OP_SET);
                    } else if !value.is_undefined() {
                        target.insert_unchecked(field.clone(), value.clone());
                    }
                }
            }
            UpdateOperator::Unset => {
                for (field, value) in payload.iter() {
                    if value.is_exactly_one() {
                        target.remove(field);
                    }
                }
            }
        }
    }
}

/// Applies a modifier to a document and returns that same document.
///
/// Operators run in the modifier's own field order, so when `$set` and `$unset`
/// touch the same field the one that appears last wins. Unknown operators and
/// payloads that are not documents are ignored. Only top-level fields are
/// touched. This never fails.
///
/// ```rust
/// use keydoc::collection::apply_modifier;
/// use keydoc::doc;
///
/// let original = doc! { _id: "a", test: 1, stale: true };
/// let modifier = doc! { "$set": { test: 9 }, "$unset": { stale: 1 } };
/// let updated = apply_modifier(original, &modifier);
/// assert_eq!(updated, doc! { _id: "a", test: 9 });
/// ```
pub fn apply_modifier(mut original: Document, modifier: &Document) -> Document {
    for (name, payload) in modifier.iter() {
        let operator = match UpdateOperator::from_name(name) {
            Some(operator) => operator,
            None => {
                log::warn!("Ignoring unsupported update operator {}", name);
                continue;
            }
        };

        match payload {
            Value::Document(payload) => operator.apply(&mut original, payload),
            other => {
                log::warn!(
                    "Ignoring {} with a {} payload",
                    operator.name(),
                    other.type_name()
                );
            }
        }
    }
    original
}
