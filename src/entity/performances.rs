//! 学期成绩实体
//!
//! 汇总列与评估列表在同一次写入中保存，读取时由评估列表重新推导汇总。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "performances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub academic_year: String,
    pub term: String,
    // JSON: 评估列表
    #[sea_orm(column_type = "Text")]
    pub assessments: String,
    #[sea_orm(column_type = "Double")]
    pub total_max_marks: f64,
    #[sea_orm(column_type = "Double")]
    pub total_obtained_marks: f64,
    pub percentage: i64,
    pub grade: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub teacher_remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_performance_record(self) -> crate::models::performance::entities::PerformanceRecord {
        use crate::models::performance::entities::{AssessmentBook, PerformanceRecord, Term};

        PerformanceRecord {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            academic_year: self.academic_year,
            term: self.term.parse::<Term>().unwrap_or(Term::Annual),
            book: AssessmentBook::from_assessments(super::from_json_column(&self.assessments)),
            teacher_remarks: self.teacher_remarks,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
