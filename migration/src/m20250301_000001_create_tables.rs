use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户目录表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::ClassId).big_integer().null())
                    .col(ColumnDef::new(Users::RollNumber).string().null())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(
                        ColumnDef::new(Subjects::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(ColumnDef::new(Subjects::SubjectType).string().not_null())
                    .col(ColumnDef::new(Subjects::MaxMarks).integer().not_null())
                    .col(ColumnDef::new(Subjects::PassingMarks).integer().not_null())
                    .col(
                        ColumnDef::new(Subjects::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Grade).string().not_null())
                    .col(ColumnDef::new(Classes::Section).string().not_null())
                    .col(ColumnDef::new(Classes::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Classes::ClassTeacherId).big_integer().null())
                    .col(ColumnDef::new(Classes::SubjectTeachers).text().not_null())
                    .col(ColumnDef::new(Classes::Schedule).text().not_null())
                    .col(ColumnDef::new(Classes::RoomNumber).string().null())
                    .col(ColumnDef::new(Classes::MaxStrength).integer().not_null())
                    .col(
                        ColumnDef::new(Classes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::ClassTeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程资料表
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resources::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resources::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Resources::Subject).string().not_null())
                    .col(ColumnDef::new(Resources::Title).string().not_null())
                    .col(ColumnDef::new(Resources::Description).text().null())
                    .col(ColumnDef::new(Resources::ResourceType).string().not_null())
                    .col(ColumnDef::new(Resources::ClassId).big_integer().null())
                    .col(ColumnDef::new(Resources::FilePath).string().null())
                    .col(ColumnDef::new(Resources::FileName).string().null())
                    .col(ColumnDef::new(Resources::FileSize).big_integer().null())
                    .col(ColumnDef::new(Resources::MimeType).string().null())
                    .col(ColumnDef::new(Resources::ExtractedText).text().null())
                    .col(ColumnDef::new(Resources::GeneratedContent).text().null())
                    .col(ColumnDef::new(Resources::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Resources::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Resources::Table, Resources::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建测验成绩表（每次作答一条）
        manager
            .create_table(
                Table::create()
                    .table(QuizResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuizResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuizResults::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizResults::ClassId).big_integer().null())
                    .col(ColumnDef::new(QuizResults::ResourceId).big_integer().null())
                    .col(ColumnDef::new(QuizResults::QuizTopic).string().null())
                    .col(ColumnDef::new(QuizResults::Subject).string().not_null())
                    .col(ColumnDef::new(QuizResults::Score).big_integer().not_null())
                    .col(
                        ColumnDef::new(QuizResults::TotalMarks)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuizResults::Percentage)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuizResults::Answers).text().not_null())
                    .col(ColumnDef::new(QuizResults::AiFeedback).text().not_null())
                    .col(
                        ColumnDef::new(QuizResults::AttemptedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuizResults::Table, QuizResults::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学期成绩表
        manager
            .create_table(
                Table::create()
                    .table(Performances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Performances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Performances::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Performances::ClassId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Performances::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Performances::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Performances::Term).string().not_null())
                    .col(ColumnDef::new(Performances::Assessments).text().not_null())
                    .col(
                        ColumnDef::new(Performances::TotalMaxMarks)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Performances::TotalObtainedMarks)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Performances::Percentage)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Performances::Grade).string().not_null())
                    .col(ColumnDef::new(Performances::TeacherRemarks).text().null())
                    .col(
                        ColumnDef::new(Performances::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Performances::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Performances::Table, Performances::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Performances::Table, Performances::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Performances::Table, Performances::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attendances::Date).string().not_null())
                    .col(ColumnDef::new(Attendances::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::SubjectId).big_integer().null())
                    .col(ColumnDef::new(Attendances::Session).string().not_null())
                    .col(ColumnDef::new(Attendances::Entries).text().not_null())
                    .col(
                        ColumnDef::new(Attendances::TotalStudents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendances::Present).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::Absent).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::Late).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::Excused).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::HalfDay).big_integer().not_null())
                    .col(ColumnDef::new(Attendances::MarkedBy).big_integer().not_null())
                    .col(
                        ColumnDef::new(Attendances::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Attendances::Notes).text().null())
                    .col(
                        ColumnDef::new(Attendances::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendances::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Notifications::RecipientId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(ColumnDef::new(Notifications::Priority).string().not_null())
                    .col(ColumnDef::new(Notifications::RelatedModel).string().null())
                    .col(ColumnDef::new(Notifications::RelatedId).big_integer().null())
                    .col(ColumnDef::new(Notifications::SenderId).big_integer().null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::ReadAt).big_integer().null())
                    .col(ColumnDef::new(Notifications::BulkId).string().null())
                    .col(ColumnDef::new(Notifications::ExpiresAt).big_integer().null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::RecipientId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 AI 会话表
        manager
            .create_table(
                Table::create()
                    .table(AiConversations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AiConversations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::ConversationType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::ContextClassId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::ContextSubjectId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::ContextStudentId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AiConversations::Title).string().not_null())
                    .col(ColumnDef::new(AiConversations::Messages).text().not_null())
                    .col(
                        ColumnDef::new(AiConversations::TotalMessages)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::TotalTokensUsed)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::VoiceQueries)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AiConversations::LastActivity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AiConversations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AiConversations::Table, AiConversations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 用户表索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_class_id")
                    .table(Users::Table)
                    .col(Users::ClassId)
                    .to_owned(),
            )
            .await?;

        // 班级唯一约束：年级 + 班别 + 学年
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_classes_grade_section_year")
                    .table(Classes::Table)
                    .col(Classes::Grade)
                    .col(Classes::Section)
                    .col(Classes::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 课程资料索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_resources_owner_id")
                    .table(Resources::Table)
                    .col(Resources::OwnerId)
                    .to_owned(),
            )
            .await?;

        // 测验成绩索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_quiz_results_student_attempted")
                    .table(QuizResults::Table)
                    .col(QuizResults::StudentId)
                    .col(QuizResults::AttemptedAt)
                    .to_owned(),
            )
            .await?;

        // 学期成绩唯一约束
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_performances_term_key")
                    .table(Performances::Table)
                    .col(Performances::StudentId)
                    .col(Performances::ClassId)
                    .col(Performances::SubjectId)
                    .col(Performances::AcademicYear)
                    .col(Performances::Term)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 考勤唯一约束：日期 + 班级 + 时段
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendances_date_class_session")
                    .table(Attendances::Table)
                    .col(Attendances::Date)
                    .col(Attendances::ClassId)
                    .col(Attendances::Session)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 通知索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_recipient_read")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        // AI 会话索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ai_conversations_user_activity")
                    .table(AiConversations::Table)
                    .col(AiConversations::UserId)
                    .col(AiConversations::LastActivity)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(AiConversations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Performances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuizResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    Role,
    ClassId,
    RollNumber,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Name,
    Code,
    Description,
    SubjectType,
    MaxMarks,
    PassingMarks,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    Name,
    Grade,
    Section,
    AcademicYear,
    ClassTeacherId,
    SubjectTeachers,
    Schedule,
    RoomNumber,
    MaxStrength,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Resources {
    #[sea_orm(iden = "resources")]
    Table,
    Id,
    OwnerId,
    Subject,
    Title,
    Description,
    ResourceType,
    ClassId,
    FilePath,
    FileName,
    FileSize,
    MimeType,
    ExtractedText,
    GeneratedContent,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QuizResults {
    #[sea_orm(iden = "quiz_results")]
    Table,
    Id,
    StudentId,
    ClassId,
    ResourceId,
    QuizTopic,
    Subject,
    Score,
    TotalMarks,
    Percentage,
    Answers,
    AiFeedback,
    AttemptedAt,
}

#[derive(DeriveIden)]
enum Performances {
    #[sea_orm(iden = "performances")]
    Table,
    Id,
    StudentId,
    ClassId,
    SubjectId,
    AcademicYear,
    Term,
    Assessments,
    TotalMaxMarks,
    TotalObtainedMarks,
    Percentage,
    Grade,
    TeacherRemarks,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendances {
    #[sea_orm(iden = "attendances")]
    Table,
    Id,
    Date,
    ClassId,
    SubjectId,
    Session,
    Entries,
    TotalStudents,
    Present,
    Absent,
    Late,
    Excused,
    HalfDay,
    MarkedBy,
    IsLocked,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    RecipientId,
    NotificationType,
    Title,
    Message,
    Priority,
    RelatedModel,
    RelatedId,
    SenderId,
    IsRead,
    ReadAt,
    BulkId,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AiConversations {
    #[sea_orm(iden = "ai_conversations")]
    Table,
    Id,
    UserId,
    ConversationType,
    ContextClassId,
    ContextSubjectId,
    ContextStudentId,
    Title,
    Messages,
    TotalMessages,
    TotalTokensUsed,
    VoiceQueries,
    IsActive,
    LastActivity,
    CreatedAt,
    UpdatedAt,
}
