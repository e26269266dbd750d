//! Schema traits for typed field selection.
//!
//! These traits are implemented by the `#[derive(Document)]` macro. The
//! derive builds the field → column table once per model type, so the typed
//! builder never inspects the model at runtime.

/// One entry of a document's field → column table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// The Rust field name.
    pub field: &'static str,
    /// The column name stored in the document.
    pub column: &'static str,
}

/// Trait for document metadata.
pub trait Document {
    /// Field → column table, in declaration order.
    const FIELDS: &'static [FieldMapping];

    /// Resolves a logical field name to its column name.
    ///
    /// Names without a mapping are returned unchanged.
    fn resolve(logical: &str) -> &str {
        resolve(Self::FIELDS, logical)
    }
}

/// Looks up `logical` in `fields`, falling back to `logical` itself.
#[must_use]
pub fn resolve<'a>(fields: &'static [FieldMapping], logical: &'a str) -> &'a str {
    fields
        .iter()
        .find(|mapping| mapping.field == logical)
        .map_or(logical, |mapping| mapping.column)
}

/// Trait for field selectors.
///
/// Implemented by the marker types generated from `#[derive(Document)]`.
pub trait Field {
    /// The document this field belongs to.
    type Document: Document;

    /// The Rust type of the field.
    type Type;

    /// The column name.
    const NAME: &'static str;
}

/// Trait for selecting several fields of a document at once.
///
/// Implemented for single fields and for tuples of fields.
pub trait Selectable<D: Document> {
    /// Returns the column names to select.
    fn column_names() -> &'static [&'static str];
}

impl<D: Document, F: Field<Document = D>> Selectable<D> for F {
    fn column_names() -> &'static [&'static str] {
        &[F::NAME]
    }
}

macro_rules! impl_selectable_tuple {
    ($($field:ident),+) => {
        impl<D: Document, $($field: Field<Document = D>),+> Selectable<D> for ($($field,)+) {
            fn column_names() -> &'static [&'static str] {
                &[$($field::NAME),+]
            }
        }
    };
}

impl_selectable_tuple!(F0);
impl_selectable_tuple!(F0, F1);
impl_selectable_tuple!(F0, F1, F2);
impl_selectable_tuple!(F0, F1, F2, F3);
impl_selectable_tuple!(F0, F1, F2, F3, F4);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5, F6);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5, F6, F7);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5, F6, F7, F8);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5, F6, F7, F8, F9);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5, F6, F7, F8, F9, F10);
impl_selectable_tuple!(F0, F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11);
