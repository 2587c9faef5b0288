//! 测验成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quiz_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: Option<i64>,
    pub resource_id: Option<i64>,
    pub quiz_topic: Option<String>,
    pub subject: String,
    pub score: i64,
    pub total_marks: i64,
    pub percentage: i64,
    // JSON: 批改明细
    #[sea_orm(column_type = "Text")]
    pub answers: String,
    #[sea_orm(column_type = "Text")]
    pub ai_feedback: String,
    pub attempted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_quiz_result(self) -> crate::models::quizzes::entities::QuizResult {
        use crate::models::quizzes::entities::QuizResult;

        QuizResult {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            resource_id: self.resource_id,
            quiz_topic: self.quiz_topic,
            subject: self.subject,
            score: self.score as i32,
            total_marks: self.total_marks as i32,
            percentage: self.percentage,
            answers: super::from_json_column(&self.answers),
            ai_feedback: self.ai_feedback,
            attempted_at: super::to_datetime(self.attempted_at),
        }
    }
}
