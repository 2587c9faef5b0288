//! 课程资料实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub subject: String,
    pub title: String,
    pub description: Option<String>,
    pub resource_type: String,
    pub class_id: Option<i64>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub extracted_text: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub generated_content: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为业务模型，提取文本不随之返回
    pub fn into_resource(self) -> crate::models::resources::entities::Resource {
        use crate::models::resources::entities::{Resource, ResourceType};

        Resource {
            id: self.id,
            owner_id: self.owner_id,
            subject: self.subject,
            title: self.title,
            description: self.description,
            resource_type: self.resource_type.parse::<ResourceType>().unwrap_or_default(),
            class_id: self.class_id,
            file_path: self.file_path,
            file_name: self.file_name,
            file_size: self.file_size,
            mime_type: self.mime_type,
            has_extracted_text: self
                .extracted_text
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty()),
            generated_content: self
                .generated_content
                .and_then(|raw| serde_json::from_str(&raw).ok()),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
