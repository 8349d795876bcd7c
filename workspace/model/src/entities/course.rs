use sea_orm::entity::prelude::*;

use super::user;

/// A course offering.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Human-readable key, e.g. "CS101".
    #[sea_orm(unique)]
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    /// Opaque handle to an externally stored document, `syllabi/...` by
    /// convention.
    pub syllabus: Option<String>,
    /// The user teaching this course. Cleared when that user is deleted;
    /// the course itself survives without a teacher.
    pub teacher_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::TeacherId",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    Teacher,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollment,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendance,
    #[sea_orm(has_many = "super::grade::Entity")]
    Grade,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

// Students are reached through the enrollments join entity.
impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::enrollment::Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::enrollment::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
