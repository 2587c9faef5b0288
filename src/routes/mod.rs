pub mod attendance;

pub mod classes;

pub mod conversations;

pub mod notifications;

pub mod performance;

pub mod resources;

pub mod subjects;

pub mod system;

pub mod users;

pub use attendance::configure_attendance_routes;
pub use classes::configure_classes_routes;
pub use conversations::configure_conversation_routes;
pub use notifications::configure_notification_routes;
pub use performance::configure_performance_routes;
pub use resources::configure_resource_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use crate::models::users::entities::{User, UserRole};
    use crate::models::users::requests::UpdateUserRequest;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    pub(crate) struct Directory {
        pub storage: Arc<dyn Storage>,
        pub student: User,
        pub teacher: User,
        pub retired: User,
    }

    /// 学生、教师各一名，外加一名已停用的教师
    pub(crate) async fn directory() -> Directory {
        let storage: Arc<dyn Storage> =
            Arc::new(SeaOrmStorage::in_memory().await.expect("storage"));
        let student = storage
            .create_user(new_user("Asha", UserRole::Student, None))
            .await
            .expect("student");
        let teacher = storage
            .create_user(new_user("Bram", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let retired = storage
            .create_user(new_user("Cato", UserRole::Teacher, None))
            .await
            .expect("retired teacher");
        let retired = storage
            .update_user(
                retired.id,
                UpdateUserRequest {
                    name: None,
                    email: None,
                    role: None,
                    class_id: None,
                    roll_number: None,
                    is_active: Some(false),
                },
            )
            .await
            .expect("deactivate")
            .expect("user exists");
        Directory {
            storage,
            student,
            teacher,
            retired,
        }
    }

    pub(crate) fn bearer(user: &User) -> (&'static str, String) {
        let token = user.generate_access_token().expect("token");
        ("Authorization", format!("Bearer {token}"))
    }
}
