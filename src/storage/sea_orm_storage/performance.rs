//! 学期成绩存储操作

use super::SeaOrmStorage;
use crate::entity::performances::{ActiveModel, Column, Entity as Performances};
use crate::errors::{Result, SchoolHubError, map_write_error};
use crate::models::performance::{
    entities::{AssessmentBook, PerformanceRecord},
    requests::{NewPerformanceRecord, PerformanceRecordListQuery},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

const DUPLICATE_RECORD: &str =
    "Performance record already exists for this student, class, subject and term";

/// 评估列表与汇总列一起写入
fn apply_book(model: &mut ActiveModel, book: &AssessmentBook) -> Result<()> {
    let aggregate = book.aggregate();
    model.assessments = Set(serde_json::to_string(book.assessments())?);
    model.total_max_marks = Set(aggregate.total_max_marks);
    model.total_obtained_marks = Set(aggregate.total_obtained_marks);
    model.percentage = Set(aggregate.percentage);
    model.grade = Set(aggregate.grade.as_str().to_string());
    Ok(())
}

impl SeaOrmStorage {
    /// 创建学期成绩记录（评估列表为空）
    pub async fn create_performance_record_impl(
        &self,
        req: NewPerformanceRecord,
    ) -> Result<PerformanceRecord> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            student_id: Set(req.student_id),
            class_id: Set(req.class_id),
            subject_id: Set(req.subject_id),
            academic_year: Set(req.academic_year),
            term: Set(req.term.to_string()),
            teacher_remarks: Set(req.teacher_remarks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_book(&mut model, &AssessmentBook::default())?;

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_error(e, "创建学期成绩失败", DUPLICATE_RECORD))?;

        Ok(result.into_performance_record())
    }

    /// 通过 ID 获取学期成绩
    pub async fn get_performance_record_impl(&self, id: i64) -> Result<Option<PerformanceRecord>> {
        let result = Performances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_performance_record()))
    }

    /// 按条件列出学期成绩
    pub async fn list_performance_records_impl(
        &self,
        query: PerformanceRecordListQuery,
    ) -> Result<Vec<PerformanceRecord>> {
        let mut select = Performances::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        if let Some(year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(year));
        }

        if let Some(term) = query.term {
            select = select.filter(Column::Term.eq(term.as_str()));
        }

        let records = select
            .order_by_desc(Column::Percentage)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学期成绩列表失败: {e}")))?;

        Ok(records
            .into_iter()
            .map(|m| m.into_performance_record())
            .collect())
    }

    /// 保存评估列表、汇总与评语
    pub async fn save_performance_record_impl(
        &self,
        record: &PerformanceRecord,
    ) -> Result<PerformanceRecord> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(record.id),
            teacher_remarks: Set(record.teacher_remarks.clone()),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_book(&mut model, &record.book)?;

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存学期成绩失败: {e}")))?;

        Ok(result.into_performance_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::performance::entities::{LetterGrade, Term, tests::assessment};
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{classes::tests::new_class, users::tests::new_user};

    async fn fixture(storage: &SeaOrmStorage) -> NewPerformanceRecord {
        let class = storage
            .create_class(new_class("9", "C"))
            .await
            .expect("class");
        let student = storage
            .create_user(new_user("Kiran", UserRole::Student, Some(class.id)))
            .await
            .expect("student");
        let subject = storage
            .create_subject(CreateSubjectRequest {
                name: "Chemistry".to_string(),
                code: "chem".to_string(),
                description: None,
                subject_type: Default::default(),
                max_marks: 100,
                passing_marks: 33,
            })
            .await
            .expect("subject");
        NewPerformanceRecord {
            student_id: student.id,
            class_id: class.id,
            subject_id: subject.id,
            academic_year: "2026-2027".to_string(),
            term: Term::Term1,
            teacher_remarks: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_term_record_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let new_record = fixture(&storage).await;

        let record = storage
            .create_performance_record(new_record.clone())
            .await
            .expect("insert");
        assert_eq!(record.book.aggregate().grade, LetterGrade::NotAvailable);

        let err = storage
            .create_performance_record(new_record)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_saved_aggregate_matches_assessments() {
        let storage = SeaOrmStorage::in_memory().await.expect("storage");
        let new_record = fixture(&storage).await;
        let mut record = storage
            .create_performance_record(new_record)
            .await
            .expect("insert");

        record.book.add_assessment(assessment(50.0, 45.0));
        record.book.add_assessment(assessment(50.0, 40.0));
        storage
            .save_performance_record(&record)
            .await
            .expect("save");

        let reloaded = storage
            .get_performance_record(record.id)
            .await
            .expect("query")
            .expect("exists");
        assert_eq!(reloaded.book.assessments().len(), 2);
        assert_eq!(reloaded.book.aggregate().percentage, 85);
        assert_eq!(reloaded.book.aggregate().grade, LetterGrade::A);
    }
}
