//! This file serves as the root for all SeaORM entity modules.
//! The data models for the school administration domain live here: login
//! accounts, student profiles, course offerings, and the enrollment,
//! attendance, grading and billing records that hang off them.

pub mod attendance;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod invoice;
pub mod payment;
pub mod student;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::attendance::Entity as Attendance;
    pub use super::course::Entity as Course;
    pub use super::enrollment::Entity as Enrollment;
    pub use super::grade::Entity as Grade;
    pub use super::invoice::Entity as Invoice;
    pub use super::payment::Entity as Payment;
    pub use super::student::Entity as Student;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, QuerySelect, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create users
        let teacher = user::ActiveModel {
            username: Set("msmith".to_string()),
            email: Set("msmith@example.edu".to_string()),
            password_hash: Set("argon2:teacher".to_string()),
            role: Set(user::Role::Teacher),
            is_staff: Set(true),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let learner = user::ActiveModel {
            username: Set("jdoe".to_string()),
            email: Set("jdoe@example.edu".to_string()),
            password_hash: Set("argon2:student".to_string()),
            role: Set(user::Role::Student),
            is_staff: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create the student profile
        let student1 = student::ActiveModel {
            user_id: Set(learner.id),
            date_of_birth: Set(NaiveDate::from_ymd_opt(2005, 4, 2)),
            enrollment_date: Set(NaiveDate::from_ymd_opt(2023, 9, 1)),
            profile_photo: Set(Some("profiles/jdoe.jpg".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create courses
        let course1 = course::ActiveModel {
            course_code: Set("CS101".to_string()),
            title: Set("Introduction to Computer Science".to_string()),
            description: Set(Some("Foundations course".to_string())),
            credits: Set(5),
            syllabus: Set(Some("syllabi/cs101.pdf".to_string())),
            teacher_id: Set(Some(teacher.id)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let course2 = course::ActiveModel {
            course_code: Set("MA201".to_string()),
            title: Set("Linear Algebra".to_string()),
            description: Set(None),
            credits: Set(4),
            syllabus: Set(None),
            teacher_id: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Enroll the student
        let enrollment1 = enrollment::ActiveModel {
            student_id: Set(student1.id),
            course_id: Set(course1.id),
            enrolled_on: Set(NaiveDate::from_ymd_opt(2023, 9, 4).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Record attendance
        let attendance1 = attendance::ActiveModel {
            student_id: Set(student1.id),
            course_id: Set(course1.id),
            date: Set(NaiveDate::from_ymd_opt(2023, 9, 5).unwrap()),
            status: Set(attendance::AttendanceStatus::Present),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Record a grade
        let grade1 = grade::ActiveModel {
            student_id: Set(student1.id),
            course_id: Set(course1.id),
            value: Set(Decimal::new(8750, 2)), // 87.50
            graded_on: Set(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Bill the student and record a payment
        let invoice1 = invoice::ActiveModel {
            student_id: Set(student1.id),
            amount: Set(Decimal::new(120000, 2)), // 1200.00
            due_date: Set(NaiveDate::from_ymd_opt(2023, 10, 1).unwrap()),
            is_paid: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let payment1 = payment::ActiveModel {
            invoice_id: Set(invoice1.id),
            amount: Set(Decimal::new(60000, 2)), // 600.00
            paid_on: Set(NaiveDate::from_ymd_opt(2023, 9, 20).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data

        // Verify users
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.username == "msmith" && u.role == user::Role::Teacher));
        assert!(users.iter().any(|u| u.username == "jdoe" && u.role == user::Role::Student));

        // Verify the student profile points at its user
        let students = Student::find().all(&db).await?;
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].user_id, learner.id);
        assert_eq!(students[0].profile_photo.as_deref(), Some("profiles/jdoe.jpg"));

        // Verify courses
        let courses = Course::find().all(&db).await?;
        assert_eq!(courses.len(), 2);
        assert!(courses.iter().any(|c| c.course_code == "CS101" && c.teacher_id == Some(teacher.id)));
        assert!(courses.iter().any(|c| c.id == course2.id && c.teacher_id.is_none()));

        // Verify the enrollment
        let enrollments = Enrollment::find().all(&db).await?;
        assert_eq!(enrollments.len(), 1);
        assert_eq!(enrollments[0].student_id, student1.id);
        assert_eq!(enrollments[0].course_id, course1.id);
        assert_eq!(enrollments[0].enrolled_on, NaiveDate::from_ymd_opt(2023, 9, 4).unwrap());
        assert_eq!(enrollments[0].id, enrollment1.id);

        // Verify the attendance record
        let attendance_rows = Attendance::find().all(&db).await?;
        assert_eq!(attendance_rows.len(), 1);
        assert_eq!(attendance_rows[0].status, attendance::AttendanceStatus::Present);
        assert_eq!(attendance_rows[0].id, attendance1.id);

        // Verify the grade
        let grades = Grade::find().all(&db).await?;
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].value, Decimal::new(8750, 2));
        assert_eq!(grades[0].id, grade1.id);

        // Verify invoice and payment
        let invoices = Invoice::find().all(&db).await?;
        assert_eq!(invoices.len(), 1);
        assert!(!invoices[0].is_paid);

        let payments = Payment::find()
            .filter(payment::Column::InvoiceId.eq(invoice1.id))
            .all(&db)
            .await?;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, Decimal::new(60000, 2));
        assert_eq!(payments[0].id, payment1.id);

        // Test relationships using Related trait

        // Courses the student is enrolled in, through the join entity
        let student1_courses = Course::find()
            .join_as(
                sea_orm::JoinType::InnerJoin,
                course::Entity::belongs_to(enrollment::Entity)
                    .from(course::Column::Id)
                    .to(enrollment::Column::CourseId)
                    .into(),
                enrollment::Entity,
            )
            .filter(enrollment::Column::StudentId.eq(student1.id))
            .all(&db)
            .await?;

        assert_eq!(student1_courses.len(), 1);
        assert_eq!(student1_courses[0].id, course1.id);

        // Courses taught by the teacher
        let taught = Course::find()
            .filter(course::Column::TeacherId.eq(teacher.id))
            .all(&db)
            .await?;

        assert_eq!(taught.len(), 1);
        assert_eq!(taught[0].course_code, "CS101");

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_constraints() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let u = user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice@example.edu".to_string()),
            password_hash: Set("argon2:x".to_string()),
            role: Set(user::Role::Student),
            is_staff: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Duplicate username is rejected
        let dup = user::ActiveModel {
            username: Set("alice".to_string()),
            email: Set("alice2@example.edu".to_string()),
            password_hash: Set("argon2:y".to_string()),
            role: Set(user::Role::Student),
            is_staff: Set(false),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(dup.is_err());

        // A second profile for the same user is rejected
        student::ActiveModel {
            user_id: Set(u.id),
            date_of_birth: Set(None),
            enrollment_date: Set(None),
            profile_photo: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let second_profile = student::ActiveModel {
            user_id: Set(u.id),
            date_of_birth: Set(None),
            enrollment_date: Set(None),
            profile_photo: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await;
        assert!(second_profile.is_err());

        Ok(())
    }
}
