#[cfg(test)]
pub mod test_utils {
    use migration::{Migrator, MigratorTrait};
    use model::entities::{course, student, user};
    use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use crate::repository::{courses, students, users};

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Cascade and set-null behavior depends on this pragma
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create a user with the given role through the repository.
    pub async fn seed_user(db: &DatabaseConnection, username: &str, role: user::Role) -> user::Model {
        users::create(
            db,
            users::CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.edu"),
                password_hash: format!("argon2:{username}"),
                role: Some(role),
                is_staff: false,
            },
        )
        .await
        .expect("Failed to create test user")
    }

    /// Create a user plus its student profile.
    pub async fn seed_student(db: &DatabaseConnection, username: &str) -> student::Model {
        let account = seed_user(db, username, user::Role::Student).await;
        students::create(
            db,
            students::CreateStudentRequest {
                user_id: account.id,
                date_of_birth: None,
                enrollment_date: None,
                profile_photo: None,
            },
        )
        .await
        .expect("Failed to create test student")
    }

    /// Create a course, optionally taught by the given user.
    pub async fn seed_course(
        db: &DatabaseConnection,
        code: &str,
        teacher_id: Option<i32>,
    ) -> course::Model {
        courses::create(
            db,
            courses::CreateCourseRequest {
                course_code: code.to_string(),
                title: format!("Course {code}"),
                description: None,
                credits: 5,
                syllabus: None,
                teacher_id,
            },
        )
        .await
        .expect("Failed to create test course")
    }
}
