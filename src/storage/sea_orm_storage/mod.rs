//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod classes;
mod conversations;
mod notifications;
mod performance;
mod quizzes;
mod resources;
mod subjects;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use crate::models::{PaginatedResponse, PaginationInfo, common::pagination::page_window};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;

#[cfg(test)]
pub(crate) use classes::tests::new_class;
#[cfg(test)]
pub(crate) use quizzes::tests::new_result;
#[cfg(test)]
pub(crate) use users::tests::new_user;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接（测试用）
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1, 5).await
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        // 内存库每个连接都是独立的数据库，只能用单连接
        let max_connections = if in_memory { 1 } else { pool_size };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 分页查询：返回当前页与分页信息
pub(crate) async fn fetch_paginated<E, M, T>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: Option<i64>,
    size: Option<i64>,
    what: &str,
    convert: impl Fn(M) -> T,
) -> Result<PaginatedResponse<T>>
where
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync + 'static,
    T: ts_rs::TS,
{
    let (page, size) = page_window(page, size);

    let paginator = select.paginate(db, size);
    let total = paginator
        .num_items()
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询{what}总数失败: {e}")))?;

    let pages = paginator
        .num_pages()
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询{what}页数失败: {e}")))?;

    let items = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询{what}列表失败: {e}")))?;

    Ok(PaginatedResponse {
        items: items.into_iter().map(convert).collect(),
        pagination: PaginationInfo::from_counts(page, size, total, pages),
    })
}

// Storage trait 实现
use crate::models::{
    attendance::{
        entities::{AttendanceRecord, AttendanceSummary},
        requests::{AttendanceListQuery, AttendanceRangeQuery, NewAttendance},
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    },
    conversations::{
        entities::Conversation,
        requests::{ConversationListQuery, NewConversation},
    },
    notifications::{entities::Notification, requests::NewNotification},
    performance::{
        entities::PerformanceRecord,
        requests::{NewPerformanceRecord, PerformanceRecordListQuery},
    },
    quizzes::{
        entities::QuizResult,
        requests::{NewQuizResult, QuizResultListQuery},
    },
    resources::{
        entities::Resource,
        requests::{NewResource, ResourceListQuery},
    },
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn list_users(&self, query: UserListQuery) -> Result<PaginatedResponse<User>> {
        self.list_users_impl(query).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>> {
        self.list_class_students_impl(class_id).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>> {
        self.list_classes_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 课程资料模块
    async fn create_resource(&self, resource: NewResource) -> Result<Resource> {
        self.create_resource_impl(resource).await
    }

    async fn get_resource_by_id(&self, id: i64) -> Result<Option<Resource>> {
        self.get_resource_by_id_impl(id).await
    }

    async fn get_resource_text(&self, id: i64) -> Result<Option<String>> {
        self.get_resource_text_impl(id).await
    }

    async fn list_resources(
        &self,
        query: ResourceListQuery,
    ) -> Result<PaginatedResponse<Resource>> {
        self.list_resources_impl(query).await
    }

    async fn set_resource_generated_content(&self, id: i64, content: String) -> Result<bool> {
        self.set_resource_generated_content_impl(id, content).await
    }

    async fn delete_resource(&self, id: i64) -> Result<bool> {
        self.delete_resource_impl(id).await
    }

    // 测验成绩模块
    async fn create_quiz_result(&self, result: NewQuizResult) -> Result<QuizResult> {
        self.create_quiz_result_impl(result).await
    }

    async fn list_quiz_results(
        &self,
        query: QuizResultListQuery,
    ) -> Result<PaginatedResponse<QuizResult>> {
        self.list_quiz_results_impl(query).await
    }

    async fn find_quiz_results(
        &self,
        student_id: Option<i64>,
        class_id: Option<i64>,
        limit: Option<u64>,
    ) -> Result<Vec<QuizResult>> {
        self.find_quiz_results_impl(student_id, class_id, limit)
            .await
    }

    // 学期成绩模块
    async fn create_performance_record(
        &self,
        record: NewPerformanceRecord,
    ) -> Result<PerformanceRecord> {
        self.create_performance_record_impl(record).await
    }

    async fn get_performance_record(&self, id: i64) -> Result<Option<PerformanceRecord>> {
        self.get_performance_record_impl(id).await
    }

    async fn list_performance_records(
        &self,
        query: PerformanceRecordListQuery,
    ) -> Result<Vec<PerformanceRecord>> {
        self.list_performance_records_impl(query).await
    }

    async fn save_performance_record(
        &self,
        record: &PerformanceRecord,
    ) -> Result<PerformanceRecord> {
        self.save_performance_record_impl(record).await
    }

    // 考勤模块
    async fn create_attendance(&self, attendance: NewAttendance) -> Result<AttendanceRecord> {
        self.create_attendance_impl(attendance).await
    }

    async fn get_attendance(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_attendance_impl(id).await
    }

    async fn list_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> Result<PaginatedResponse<AttendanceRecord>> {
        self.list_attendance_impl(query).await
    }

    async fn attendance_in_range(
        &self,
        query: AttendanceRangeQuery,
    ) -> Result<Vec<AttendanceRecord>> {
        self.attendance_in_range_impl(query).await
    }

    async fn attendance_summaries_in_range(
        &self,
        query: AttendanceRangeQuery,
    ) -> Result<Vec<AttendanceSummary>> {
        self.attendance_summaries_in_range_impl(query).await
    }

    async fn save_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord> {
        self.save_attendance_impl(record).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    // 通知模块
    async fn create_notifications(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>> {
        self.create_notifications_impl(notifications).await
    }

    async fn get_notification(&self, id: i64, now: i64) -> Result<Option<Notification>> {
        self.get_notification_impl(id, now).await
    }

    async fn list_notifications(
        &self,
        recipient_id: i64,
        unread_only: bool,
        page: Option<i64>,
        size: Option<i64>,
        now: i64,
    ) -> Result<PaginatedResponse<Notification>> {
        self.list_notifications_impl(recipient_id, unread_only, page, size, now)
            .await
    }

    async fn count_unread_notifications(&self, recipient_id: i64, now: i64) -> Result<i64> {
        self.count_unread_notifications_impl(recipient_id, now)
            .await
    }

    async fn mark_notification_read(&self, id: i64, now: i64) -> Result<bool> {
        self.mark_notification_read_impl(id, now).await
    }

    async fn mark_all_notifications_read(&self, recipient_id: i64, now: i64) -> Result<i64> {
        self.mark_all_notifications_read_impl(recipient_id, now)
            .await
    }

    async fn delete_notification(&self, id: i64) -> Result<bool> {
        self.delete_notification_impl(id).await
    }

    async fn purge_expired_notifications(&self, recipient_id: i64, now: i64) -> Result<u64> {
        self.purge_expired_notifications_impl(recipient_id, now)
            .await
    }

    // AI 会话模块
    async fn create_conversation(&self, conversation: NewConversation) -> Result<Conversation> {
        self.create_conversation_impl(conversation).await
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        self.get_conversation_impl(id).await
    }

    async fn list_conversations(
        &self,
        query: ConversationListQuery,
    ) -> Result<PaginatedResponse<Conversation>> {
        self.list_conversations_impl(query).await
    }

    async fn save_conversation(&self, conversation: &Conversation) -> Result<Conversation> {
        self.save_conversation_impl(conversation).await
    }
}
