//! Persistence-boundary repositories, one module per entity.
//!
//! Entities stay plain data; every create, update and delete flows through
//! these functions. They validate input, check that referenced rows exist,
//! and map store-level constraint violations into typed errors. Cleanup on
//! delete is left entirely to the store's cascade and set-null rules.

pub mod attendance;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod invoices;
pub mod payments;
pub mod students;
pub mod users;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::RepositoryError;

/// Current UTC date, used to stamp `enrolled_on`, `graded_on` and `paid_on`
/// at creation.
pub(crate) fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Check that a fixed-point value fits the declared column precision of
/// `max_digits` total digits with `decimal_places` of them fractional.
///
/// The SQLite backend does not enforce declared decimal width, so the
/// check lives at the repository boundary.
pub(crate) fn check_decimal_precision(
    field: &str,
    value: Decimal,
    max_digits: u32,
    decimal_places: u32,
) -> Result<(), RepositoryError> {
    if value.normalize().scale() > decimal_places {
        return Err(RepositoryError::Validation(format!(
            "{field} has more than {decimal_places} decimal places"
        )));
    }

    let integer_limit = Decimal::from(10i64.pow(max_digits - decimal_places));
    if value.abs() >= integer_limit {
        return Err(RepositoryError::Validation(format!(
            "{field} does not fit {max_digits} digits with {decimal_places} decimal places"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_values_inside_declared_precision() {
        // Grade column is (5, 2): up to 999.99
        assert!(check_decimal_precision("value", Decimal::new(99999, 2), 5, 2).is_ok());
        assert!(check_decimal_precision("value", Decimal::new(0, 0), 5, 2).is_ok());
        // Trailing zeros beyond the scale still fit after normalization
        assert!(check_decimal_precision("value", Decimal::new(87500, 3), 5, 2).is_ok());
    }

    #[test]
    fn rejects_too_many_decimal_places() {
        let err = check_decimal_precision("value", Decimal::new(12345, 3), 5, 2).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[test]
    fn rejects_too_many_integer_digits() {
        // 1000.00 needs four integer digits; (5, 2) allows three
        let err = check_decimal_precision("value", Decimal::new(100000, 2), 5, 2).unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));

        // Invoice column is (8, 2): up to 999999.99
        assert!(check_decimal_precision("amount", Decimal::new(99999999, 2), 8, 2).is_ok());
        assert!(check_decimal_precision("amount", Decimal::new(100000000, 2), 8, 2).is_err());
    }

    #[test]
    fn negative_values_use_the_same_bounds() {
        assert!(check_decimal_precision("value", Decimal::new(-99999, 2), 5, 2).is_ok());
        assert!(check_decimal_precision("value", Decimal::new(-100000, 2), 5, 2).is_err());
    }
}
