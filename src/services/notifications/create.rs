use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::requests::CreateNotificationRequest;
use crate::services::current_user;
use crate::utils::{error_response, validation_response};

/// 批量发送在一个事务中写入，任一失败则全部回滚
pub async fn create_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    body: CreateNotificationRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if let Err(errors) = body.validate() {
        return Ok(validation_response(errors));
    }
    let storage = service.get_storage(request)?;

    match storage
        .create_notifications(body.into_new_notifications(caller.id))
        .await
    {
        Ok(created) => {
            info!("{} notifications sent by {}", created.len(), caller.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(created, "Notifications sent")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;

    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::notifications::count::get_unread_count;
    use crate::services::notifications::delete::delete_notification;
    use crate::services::notifications::list::list_notifications;
    use crate::services::notifications::read::{mark_all_read, mark_read};
    use crate::services::tests::{authed_request, body_json};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, new_user};

    fn announcement(recipients: &[i64]) -> CreateNotificationRequest {
        serde_json::from_value(serde_json::json!({
            "recipient_ids": recipients,
            "notification_type": "announcement",
            "title": "Sports day",
            "message": "Friday, 9am",
        }))
        .expect("valid request")
    }

    #[tokio::test]
    async fn test_send_read_and_delete_flow() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let teacher = storage
            .create_user(new_user("Sen", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let ravi = storage
            .create_user(new_user("Ravi", UserRole::Student, None))
            .await
            .expect("student");
        let sana = storage
            .create_user(new_user("Sana", UserRole::Student, None))
            .await
            .expect("student");
        let service = NotificationService::new_lazy();

        let staff_request = authed_request(&teacher, storage.clone(), None, None);
        let response = create_notifications(&service, &staff_request, announcement(&[ravi.id, sana.id]))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"][0]["bulk_id"], json["data"][1]["bulk_id"]);

        let ravi_request = authed_request(&ravi, storage.clone(), None, None);
        let listed = body_json(
            list_notifications(&service, &ravi_request, Default::default())
                .await
                .expect("handled"),
        )
        .await;
        let ravi_id = listed["data"]["items"][0]["id"].as_i64().expect("id");

        // 别人的通知不可见
        let sana_request = authed_request(&sana, storage.clone(), None, None);
        let foreign = mark_read(&service, &sana_request, ravi_id).await.expect("handled");
        assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

        let first = mark_read(&service, &ravi_request, ravi_id).await.expect("handled");
        assert_eq!(first.status(), StatusCode::OK);
        let again = mark_read(&service, &ravi_request, ravi_id).await.expect("handled");
        assert_eq!(again.status(), StatusCode::OK);

        let count = body_json(get_unread_count(&service, &ravi_request).await.expect("handled")).await;
        assert_eq!(count["data"]["unread_count"], 0);
        let marked = body_json(mark_all_read(&service, &sana_request).await.expect("handled")).await;
        assert_eq!(marked["data"]["marked_count"], 1);

        let deleted = delete_notification(&service, &ravi_request, ravi_id)
            .await
            .expect("handled");
        assert_eq!(deleted.status(), StatusCode::OK);
        let gone = delete_notification(&service, &ravi_request, ravi_id)
            .await
            .expect("handled");
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_recipient_list_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.expect("db"));
        let teacher = storage
            .create_user(new_user("Sen", UserRole::Teacher, None))
            .await
            .expect("teacher");
        let request = authed_request(&teacher, storage, None, None);
        let response = create_notifications(&NotificationService::new_lazy(), &request, announcement(&[]))
            .await
            .expect("handled");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
