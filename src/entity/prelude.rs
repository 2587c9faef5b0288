//! 预导入模块，方便使用

pub use super::ai_conversations::{
    ActiveModel as AiConversationActiveModel, Entity as AiConversations,
    Model as AiConversationModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::performances::{
    ActiveModel as PerformanceActiveModel, Entity as Performances, Model as PerformanceModel,
};
pub use super::quiz_results::{
    ActiveModel as QuizResultActiveModel, Entity as QuizResults, Model as QuizResultModel,
};
pub use super::resources::{
    ActiveModel as ResourceActiveModel, Entity as Resources, Model as ResourceModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
