use serde::Serialize;
use ts_rs::TS;

/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误；2xxx 用户；3xxx 班级与科目；4xxx 课程资料与文件；
/// 5xxx 服务端与外部协作方；6xxx 成绩；7xxx 考勤；8xxx 通知；9xxx AI 会话。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error_code.ts")]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,

    UserNotFound = 2000,
    UserEmailAlreadyExists = 2001,
    CanNotDeleteCurrentUser = 2003,

    ClassNotFound = 3000,
    ClassAlreadyExists = 3001,
    SubjectNotFound = 3100,
    SubjectAlreadyExists = 3101,

    ResourceNotFound = 4000,
    ResourcePermissionDenied = 4001,
    ResourceTextMissing = 4002,
    FileNotFound = 4003,
    FileTypeNotAllowed = 4004,
    FileSizeExceeded = 4005,
    FileUploadFailed = 4006,
    MultifileUploadNotAllowed = 4007,

    InternalServerError = 5000,
    GenerationFailed = 5001,
    ExtractionFailed = 5002,

    PerformanceRecordNotFound = 6000,
    PerformanceRecordAlreadyExists = 6001,
    AssessmentNotFound = 6002,

    AttendanceNotFound = 7000,
    AttendanceAlreadyMarked = 7001,
    AttendanceLocked = 7002,

    NotificationNotFound = 8000,

    ConversationNotFound = 9000,
}
