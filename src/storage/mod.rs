use std::sync::Arc;

use crate::models::{
    PaginatedResponse,
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 内容存储
///
/// 唯一索引冲突统一返回 `SchoolHubError::Conflict`。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户目录
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 列出用户
    async fn list_users(&self, query: UserListQuery) -> Result<PaginatedResponse<User>>;
    // 班级的在读学生
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 科目
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// 班级
    // 创建班级（请求需已规范化）
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes(&self, query: ClassListQuery) -> Result<Vec<Class>>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 课程资料
    async fn create_resource(&self, resource: NewResource) -> Result<Resource>;
    async fn get_resource_by_id(&self, id: i64) -> Result<Option<Resource>>;
    // 提取出的全文，只在生成时读取
    async fn get_resource_text(&self, id: i64) -> Result<Option<String>>;
    async fn list_resources(&self, query: ResourceListQuery)
    -> Result<PaginatedResponse<Resource>>;
    // 保存 AI 生成内容（JSON 文本）
    async fn set_resource_generated_content(&self, id: i64, content: String) -> Result<bool>;
    async fn delete_resource(&self, id: i64) -> Result<bool>;

    /// 测验成绩
    async fn create_quiz_result(&self, result: NewQuizResult) -> Result<QuizResult>;
    async fn list_quiz_results(
        &self,
        query: QuizResultListQuery,
    ) -> Result<PaginatedResponse<QuizResult>>;
    // 统计用：按学生或班级匹配，最新在前，可限制条数
    async fn find_quiz_results(
        &self,
        student_id: Option<i64>,
        class_id: Option<i64>,
        limit: Option<u64>,
    ) -> Result<Vec<QuizResult>>;

    /// 学期成绩
    async fn create_performance_record(
        &self,
        record: NewPerformanceRecord,
    ) -> Result<PerformanceRecord>;
    async fn get_performance_record(&self, id: i64) -> Result<Option<PerformanceRecord>>;
    async fn list_performance_records(
        &self,
        query: PerformanceRecordListQuery,
    ) -> Result<Vec<PerformanceRecord>>;
    // 评估列表与汇总一次写入
    async fn save_performance_record(&self, record: &PerformanceRecord)
    -> Result<PerformanceRecord>;

    /// 考勤
    async fn create_attendance(&self, attendance: NewAttendance) -> Result<AttendanceRecord>;
    async fn get_attendance(&self, id: i64) -> Result<Option<AttendanceRecord>>;
    async fn list_attendance(
        &self,
        query: AttendanceListQuery,
    ) -> Result<PaginatedResponse<AttendanceRecord>>;
    async fn attendance_in_range(&self, query: AttendanceRangeQuery)
    -> Result<Vec<AttendanceRecord>>;
    // 班级统计：直接读取保存的汇总列
    async fn attendance_summaries_in_range(
        &self,
        query: AttendanceRangeQuery,
    ) -> Result<Vec<AttendanceSummary>>;
    // 条目、汇总、锁定状态与备注一次写入
    async fn save_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;

    /// 通知
    async fn create_notifications(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>>;
    async fn get_notification(&self, id: i64, now: i64) -> Result<Option<Notification>>;
    async fn list_notifications(
        &self,
        recipient_id: i64,
        unread_only: bool,
        page: Option<i64>,
        size: Option<i64>,
        now: i64,
    ) -> Result<PaginatedResponse<Notification>>;
    async fn count_unread_notifications(&self, recipient_id: i64, now: i64) -> Result<i64>;
    async fn mark_notification_read(&self, id: i64, now: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, recipient_id: i64, now: i64) -> Result<i64>;
    async fn delete_notification(&self, id: i64) -> Result<bool>;
    // 清理已过期通知
    async fn purge_expired_notifications(&self, recipient_id: i64, now: i64) -> Result<u64>;

    /// AI 会话
    async fn create_conversation(&self, conversation: NewConversation) -> Result<Conversation>;
    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>>;
    async fn list_conversations(
        &self,
        query: ConversationListQuery,
    ) -> Result<PaginatedResponse<Conversation>>;
    // 消息、计数与标题一次写入
    async fn save_conversation(&self, conversation: &Conversation) -> Result<Conversation>;
}

/// 创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
