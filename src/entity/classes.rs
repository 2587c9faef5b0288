//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub grade: String,
    pub section: String,
    pub academic_year: String,
    pub class_teacher_id: Option<i64>,
    // JSON: [{subject_id, teacher_id}]
    #[sea_orm(column_type = "Text")]
    pub subject_teachers: String,
    // JSON: [{day, periods: [...]}]
    #[sea_orm(column_type = "Text")]
    pub schedule: String,
    pub room_number: Option<String>,
    pub max_strength: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClassTeacherId",
        to = "super::users::Column::Id"
    )]
    ClassTeacher,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
    #[sea_orm(has_many = "super::performances::Entity")]
    Performances,
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl Related<super::performances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_class(self) -> crate::models::classes::entities::Class {
        use crate::models::classes::entities::Class;

        Class {
            id: self.id,
            name: self.name,
            grade: self.grade,
            section: self.section,
            academic_year: self.academic_year,
            class_teacher_id: self.class_teacher_id,
            subject_teachers: super::from_json_column(&self.subject_teachers),
            schedule: super::from_json_column(&self.schedule),
            room_number: self.room_number,
            max_strength: self.max_strength,
            is_active: self.is_active,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
