//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two `Money`
/// amounts of the same number of cents are the same amount, two normalized
/// barcodes with the same characters are the same barcode. To "modify" a
/// value object, construct a new one.
///
/// The bounds keep value objects cheap to pass around and easy to assert on:
/// - `Clone`: values copy; they are not shared by reference.
/// - `PartialEq`: compared attribute-by-attribute.
/// - `Debug`: printable in logs and test failures.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Barcode(String);
///
/// impl ValueObject for Barcode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
