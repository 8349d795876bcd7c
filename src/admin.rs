//! Administrative listing projection.
//!
//! For each entity, the ordered list of columns a generic tabular admin
//! view shows. This is pure static configuration mapping entity name to
//! attribute names; it computes nothing. The registry is checked against
//! the entity column metadata at startup so that a typo here fails
//! initialization instead of surfacing while a listing renders.

use anyhow::{bail, Result};
use model::entities::{attendance, course, enrollment, grade, invoice, payment, student, user};
use sea_orm::{IdenStatic, Iterable};

/// Columns shown for one entity in the admin list view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDisplay {
    pub entity: &'static str,
    pub columns: &'static [&'static str],
}

/// One entry per entity, mirroring the schema.
pub const REGISTRY: &[ListDisplay] = &[
    ListDisplay {
        entity: "users",
        columns: &["username", "email", "role", "is_staff"],
    },
    ListDisplay {
        entity: "students",
        columns: &["user_id", "enrollment_date"],
    },
    ListDisplay {
        entity: "courses",
        columns: &["course_code", "title", "teacher_id"],
    },
    ListDisplay {
        entity: "enrollments",
        columns: &["student_id", "course_id", "enrolled_on"],
    },
    ListDisplay {
        entity: "attendance",
        columns: &["student_id", "course_id", "date", "status"],
    },
    ListDisplay {
        entity: "grades",
        columns: &["student_id", "course_id", "value", "graded_on"],
    },
    ListDisplay {
        entity: "invoices",
        columns: &["student_id", "amount", "due_date", "is_paid"],
    },
    ListDisplay {
        entity: "payments",
        columns: &["invoice_id", "amount", "paid_on"],
    },
];

/// Look up the column list for an entity, by table name.
pub fn list_display(entity: &str) -> Option<&'static ListDisplay> {
    REGISTRY.iter().find(|d| d.entity == entity)
}

/// Column names an entity actually has, from its SeaORM column enum.
fn schema_columns(entity: &str) -> Option<Vec<String>> {
    let columns = match entity {
        "users" => user::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "students" => student::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "courses" => course::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "enrollments" => enrollment::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "attendance" => attendance::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "grades" => grade::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "invoices" => invoice::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        "payments" => payment::Column::iter().map(|c| c.as_str().to_owned()).collect(),
        _ => return None,
    };
    Some(columns)
}

/// Check every registry entry against the entity schema.
pub fn validate_registry() -> Result<()> {
    for display in REGISTRY {
        let Some(known) = schema_columns(display.entity) else {
            bail!("admin registry references unknown entity '{}'", display.entity);
        };
        for column in display.columns {
            if !known.iter().any(|k| k.as_str() == *column) {
                bail!(
                    "admin registry for '{}' references unknown column '{}'",
                    display.entity,
                    column
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_matches_entity_schema() {
        validate_registry().expect("registry should reference existing columns only");
    }

    #[test]
    fn registry_covers_every_entity() {
        let entities = [
            "users",
            "students",
            "courses",
            "enrollments",
            "attendance",
            "grades",
            "invoices",
            "payments",
        ];
        for entity in entities {
            assert!(list_display(entity).is_some(), "missing registry entry for {entity}");
        }
        assert_eq!(REGISTRY.len(), entities.len());
    }

    #[test]
    fn unknown_entity_is_rejected() {
        assert!(schema_columns("report_cards").is_none());
    }

    #[test]
    fn columns_preserve_display_order() {
        let users = list_display("users").unwrap();
        assert_eq!(users.columns, ["username", "email", "role", "is_staff"]);
    }
}
