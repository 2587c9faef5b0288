//! 按角色收窄读取范围
//!
//! 所有按角色区分的读取范围都在 `read_scope` 表中定义，
//! 处理函数只根据返回的 `ReadScope` 收窄查询，不直接判断角色。

use crate::config::PolicyConfig;
use crate::errors::Result;
use crate::models::classes::{
    entities::Class,
    requests::{ClassListQuery, ClassQueryParams},
    responses::ClassListResponse,
};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

/// 受范围控制的实体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Class,
    Performance,
    Attendance,
    Resource,
}

/// 读取范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadScope {
    /// 不收窄，只应用显式过滤
    Unrestricted,
    /// 只能读取本人的记录，忽略其他学生过滤
    OwnRecords,
    /// 只列出本人执教的班级（班主任、任课或课表教师）
    TaughtClasses,
    /// 只列出本人上传的资料
    OwnUploads,
}

/// 角色 × 实体 的读取范围表
pub fn read_scope(role: UserRole, kind: EntityKind) -> ReadScope {
    use EntityKind as K;
    use ReadScope as S;

    match (role, kind) {
        (UserRole::Student, K::Class | K::Resource) => S::Unrestricted,
        (UserRole::Student, K::Performance | K::Attendance) => S::OwnRecords,
        (UserRole::Teacher, K::Class) => S::TaughtClasses,
        (UserRole::Teacher, K::Resource) => S::OwnUploads,
        (UserRole::Teacher, K::Performance | K::Attendance) => S::Unrestricted,
        (UserRole::Management, _) => S::Unrestricted,
    }
}

/// 教师按范围查询班级为空时的回退策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyClassFallback {
    /// 改为返回全部在用班级
    AllActiveClasses,
    /// 保持空结果
    Disabled,
}

impl From<&PolicyConfig> for EmptyClassFallback {
    fn from(config: &PolicyConfig) -> Self {
        if config.teacher_empty_class_fallback {
            EmptyClassFallback::AllActiveClasses
        } else {
            EmptyClassFallback::Disabled
        }
    }
}

/// 学生只能看自己的记录；其他角色使用请求中的学生过滤
pub fn scoped_student_id(caller: &User, kind: EntityKind, requested: Option<i64>) -> Option<i64> {
    match read_scope(caller.role, kind) {
        ReadScope::OwnRecords => Some(caller.id),
        _ => requested,
    }
}

/// 按学生过滤时忽略班级过滤（学生本人视角）
pub fn scoped_class_id(caller: &User, kind: EntityKind, requested: Option<i64>) -> Option<i64> {
    match read_scope(caller.role, kind) {
        ReadScope::OwnRecords => None,
        _ => requested,
    }
}

/// 教师只看自己上传的资料；其他角色使用请求中的上传者过滤
pub fn scoped_owner_id(caller: &User, requested: Option<i64>) -> Option<i64> {
    match read_scope(caller.role, EntityKind::Resource) {
        ReadScope::OwnUploads => Some(caller.id),
        _ => requested,
    }
}

/// 是否可以读取某个学生的记录
pub fn can_read_student_record(caller: &User, kind: EntityKind, student_id: i64) -> bool {
    match read_scope(caller.role, kind) {
        ReadScope::OwnRecords => caller.id == student_id,
        _ => true,
    }
}

/// 资料只能由上传者或管理层删除
pub fn can_delete_resource(caller: &User, owner_id: i64) -> bool {
    caller.id == owner_id || caller.role == UserRole::Management
}

/// 按角色筛选可见班级
///
/// `all=true` 时教师不收窄。教师的结果为空且启用回退时（无论是否 `all=true`）返回全部在用班级。
pub async fn select_visible_classes(
    storage: &dyn Storage,
    caller: &User,
    params: &ClassQueryParams,
    fallback: EmptyClassFallback,
) -> Result<ClassListResponse> {
    let classes = storage.list_classes(ClassListQuery::from(params)).await?;

    let teacher_scoped = read_scope(caller.role, EntityKind::Class) == ReadScope::TaughtClasses;
    if !teacher_scoped {
        return Ok(ClassListResponse {
            items: classes,
            fallback_applied: false,
        });
    }

    let visible: Vec<Class> = if params.all.unwrap_or(false) {
        classes
    } else {
        classes
            .into_iter()
            .filter(|c| c.is_taught_by(caller.id))
            .collect()
    };

    if visible.is_empty() && fallback == EmptyClassFallback::AllActiveClasses {
        tracing::debug!(
            "No classes matched for teacher {}, falling back to all active classes",
            caller.id
        );
        let active = storage
            .list_classes(ClassListQuery {
                is_active: Some(true),
                ..Default::default()
            })
            .await?;
        return Ok(ClassListResponse {
            items: active,
            fallback_applied: true,
        });
    }

    Ok(ClassListResponse {
        items: visible,
        fallback_applied: false,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::classes::requests::CreateClassRequest;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    pub(crate) fn caller(id: i64, role: UserRole, class_id: Option<i64>) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            name: format!("User {id}"),
            email: format!("user{id}@school.test"),
            role,
            class_id,
            roll_number: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn class_request(section: &str, class_teacher_id: Option<i64>) -> CreateClassRequest {
        CreateClassRequest {
            name: None,
            grade: "10".to_string(),
            section: section.to_string(),
            academic_year: Some("2026-2027".to_string()),
            class_teacher_id,
            subject_teachers: None,
            schedule: None,
            room_number: None,
            max_strength: None,
        }
    }

    #[test]
    fn test_read_scope_table() {
        assert_eq!(
            read_scope(UserRole::Student, EntityKind::Performance),
            ReadScope::OwnRecords
        );
        assert_eq!(
            read_scope(UserRole::Student, EntityKind::Class),
            ReadScope::Unrestricted
        );
        assert_eq!(
            read_scope(UserRole::Teacher, EntityKind::Class),
            ReadScope::TaughtClasses
        );
        assert_eq!(
            read_scope(UserRole::Teacher, EntityKind::Resource),
            ReadScope::OwnUploads
        );
        assert_eq!(
            read_scope(UserRole::Teacher, EntityKind::Attendance),
            ReadScope::Unrestricted
        );
        assert_eq!(
            read_scope(UserRole::Management, EntityKind::Resource),
            ReadScope::Unrestricted
        );
    }

    #[test]
    fn test_student_forced_to_own_id() {
        let student = caller(5, UserRole::Student, Some(1));
        assert_eq!(
            scoped_student_id(&student, EntityKind::Performance, Some(99)),
            Some(5)
        );
        assert_eq!(scoped_class_id(&student, EntityKind::Performance, Some(3)), None);
        assert!(!can_read_student_record(&student, EntityKind::Performance, 99));

        let teacher = caller(6, UserRole::Teacher, None);
        assert_eq!(
            scoped_student_id(&teacher, EntityKind::Performance, Some(99)),
            Some(99)
        );
        assert_eq!(scoped_owner_id(&teacher, Some(1)), Some(6));
        assert_eq!(
            scoped_owner_id(&caller(7, UserRole::Management, None), Some(1)),
            Some(1)
        );
    }

    #[test]
    fn test_resource_deletion_rights() {
        assert!(can_delete_resource(&caller(1, UserRole::Teacher, None), 1));
        assert!(!can_delete_resource(&caller(2, UserRole::Teacher, None), 1));
        assert!(can_delete_resource(&caller(3, UserRole::Management, None), 1));
    }

    #[tokio::test]
    async fn test_teacher_sees_taught_classes() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let teacher = storage
            .create_user(new_user("Mr Rao", UserRole::Teacher, None))
            .await
            .expect("teacher");
        storage
            .create_class(class_request("A", Some(teacher.id)))
            .await
            .expect("class");
        storage
            .create_class(class_request("B", None))
            .await
            .expect("class");

        let result = select_visible_classes(
            &storage,
            &teacher,
            &ClassQueryParams::default(),
            EmptyClassFallback::AllActiveClasses,
        )
        .await
        .expect("classes");
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].section, "A");
        assert!(!result.fallback_applied);

        let all = select_visible_classes(
            &storage,
            &teacher,
            &ClassQueryParams {
                all: Some(true),
                ..Default::default()
            },
            EmptyClassFallback::AllActiveClasses,
        )
        .await
        .expect("classes");
        assert_eq!(all.items.len(), 2);
    }

    #[tokio::test]
    async fn test_unassigned_teacher_falls_back_to_active_classes() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage
            .create_class(class_request("A", None))
            .await
            .expect("class");
        storage
            .create_class(class_request("B", None))
            .await
            .expect("class");
        let teacher = caller(42, UserRole::Teacher, None);

        let result = select_visible_classes(
            &storage,
            &teacher,
            &ClassQueryParams::default(),
            EmptyClassFallback::AllActiveClasses,
        )
        .await
        .expect("classes");
        assert_eq!(result.items.len(), 2);
        assert!(result.fallback_applied);

        let strict = select_visible_classes(
            &storage,
            &teacher,
            &ClassQueryParams::default(),
            EmptyClassFallback::Disabled,
        )
        .await
        .expect("classes");
        assert!(strict.items.is_empty());
    }

    #[tokio::test]
    async fn test_empty_filtered_all_listing_falls_back_for_teachers() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        storage
            .create_class(class_request("A", None))
            .await
            .expect("class");
        let params = ClassQueryParams {
            grade: Some("12".to_string()),
            all: Some(true),
            ..Default::default()
        };

        let teacher = caller(42, UserRole::Teacher, None);
        let result = select_visible_classes(
            &storage,
            &teacher,
            &params,
            EmptyClassFallback::AllActiveClasses,
        )
        .await
        .expect("classes");
        assert_eq!(result.items.len(), 1);
        assert!(result.fallback_applied);

        let management = caller(7, UserRole::Management, None);
        let unscoped = select_visible_classes(
            &storage,
            &management,
            &params,
            EmptyClassFallback::AllActiveClasses,
        )
        .await
        .expect("classes");
        assert!(unscoped.items.is_empty());
        assert!(!unscoped.fallback_applied);
    }
}
