use std::fs;
use std::path::Path;
use std::sync::Arc;

use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::ResourceService;
use crate::config::UploadConfig;
use crate::errors::SchoolHubError;
use crate::extraction::TextExtractor;
use crate::models::common::{FieldError, FieldErrors};
use crate::models::resources::entities::ResourceType;
use crate::models::resources::requests::NewResource;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::{error_response, validate_magic_bytes, validation_response};

/// 文本表单字段的最大字节数
const TEXT_FIELD_MAX: usize = 64 * 1024;

/// 上传的文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 解析后的上传表单
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub resource_type: Option<String>,
    pub class_id: Option<String>,
}

/// 校验通过的表单字段
struct ResourceFields {
    subject: String,
    title: String,
    description: Option<String>,
    resource_type: ResourceType,
    class_id: Option<i64>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl UploadForm {
    fn validate(&self) -> Result<ResourceFields, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let subject = non_blank(&self.subject);
        let title = non_blank(&self.title);
        errors.check(subject.is_some(), "subject", "Subject is required");
        errors.check(title.is_some(), "title", "Title is required");

        let resource_type = match non_blank(&self.resource_type) {
            Some(raw) => raw.parse::<ResourceType>().unwrap_or_else(|msg| {
                errors.push("type", msg);
                ResourceType::default()
            }),
            None => ResourceType::default(),
        };
        let class_id = match non_blank(&self.class_id) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push("class_id", "Class id must be a number");
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;
        Ok(ResourceFields {
            subject: subject.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description: non_blank(&self.description),
            resource_type,
            class_id,
        })
    }
}

fn bad_request(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 带点号的小写扩展名，如 ".pdf"
fn dotted_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

async fn read_text_field(field: &mut Field) -> ActixResult<Result<String, HttpResponse>> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk?;
        if buffer.len() + data.len() > TEXT_FIELD_MAX {
            return Ok(Err(bad_request(
                ErrorCode::BadRequest,
                "Form field is too large",
            )));
        }
        buffer.extend_from_slice(&data);
    }
    Ok(Ok(String::from_utf8_lossy(&buffer).into_owned()))
}

/// 读取 multipart：只允许一个文件，边读边校验扩展名与大小
async fn read_form(
    mut payload: Multipart,
    config: &UploadConfig,
) -> ActixResult<Result<UploadForm, HttpResponse>> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name == "file" {
            if form.file.is_some() {
                return Ok(Err(bad_request(
                    ErrorCode::MultifileUploadNotAllowed,
                    "Only one file can be uploaded at a time",
                )));
            }
            let file_name = content_disposition
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string())
                .unwrap_or_default();
            let extension = dotted_extension(&file_name);
            if !config
                .allowed_types
                .iter()
                .any(|t| t.to_lowercase() == extension)
            {
                return Ok(Err(bad_request(
                    ErrorCode::FileTypeNotAllowed,
                    "File type not allowed",
                )));
            }
            let mime_type = field.content_type().map(|ct| ct.to_string());

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk?;
                if bytes.len() + data.len() > config.max_size {
                    return Ok(Err(bad_request(
                        ErrorCode::FileSizeExceeded,
                        "File size exceeds the limit",
                    )));
                }
                bytes.extend_from_slice(&data);
            }
            form.file = Some(UploadedFile {
                file_name,
                mime_type,
                bytes,
            });
            continue;
        }

        let value = match read_text_field(&mut field).await? {
            Ok(value) => value,
            Err(response) => return Ok(Err(response)),
        };
        match name.as_str() {
            "subject" => form.subject = Some(value),
            "title" => form.title = Some(value),
            "description" => form.description = Some(value),
            "type" => form.resource_type = Some(value),
            "class_id" => form.class_id = Some(value),
            _ => {}
        }
    }

    Ok(Ok(form))
}

fn remove_stored_file(path: &Path) {
    if let Err(e) = fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

/// 保存文件、提取文本并写入记录；任一步失败都会删除已保存的文件
pub(crate) async fn store_upload(
    storage: &dyn crate::storage::Storage,
    extractor: Arc<dyn TextExtractor>,
    caller: &User,
    form: UploadForm,
    config: &UploadConfig,
) -> HttpResponse {
    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return validation_response(errors),
    };
    let Some(file) = form.file else {
        return bad_request(ErrorCode::FileNotFound, "No file found in upload payload");
    };
    let extension = dotted_extension(&file.file_name);
    if !validate_magic_bytes(&file.bytes, &extension) {
        return bad_request(
            ErrorCode::FileTypeNotAllowed,
            "File content does not match its extension",
        );
    }

    if let Err(e) = fs::create_dir_all(&config.dir) {
        error!("{}", SchoolHubError::file_operation(format!("{e}")));
        return HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to create upload directory",
        ));
    }
    let stored_name = format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp(),
        Uuid::new_v4(),
        extension
    );
    let stored_path = Path::new(&config.dir).join(stored_name);
    if let Err(e) = fs::write(&stored_path, &file.bytes) {
        error!("{}", SchoolHubError::file_operation(format!("{e}")));
        return HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to store uploaded file",
        ));
    }

    let file_size = file.bytes.len() as i64;
    let file_name = file.file_name.clone();
    let bytes = file.bytes;
    // pdf 解析是阻塞操作，放入阻塞线程池
    let extracted = web::block(move || extractor.extract_text(&bytes, &file_name))
        .await
        .unwrap_or_else(|_| {
            Err(SchoolHubError::extraction(
                "Text extraction aborted unexpectedly",
            ))
        });
    let extracted_text = match extracted {
        Ok(text) => text,
        Err(e) => {
            remove_stored_file(&stored_path);
            return error_response(&e);
        }
    };

    let resource = NewResource {
        owner_id: caller.id,
        subject: fields.subject,
        title: fields.title,
        description: fields.description,
        resource_type: fields.resource_type,
        class_id: fields.class_id,
        file_path: Some(stored_path.to_string_lossy().into_owned()),
        file_name: Some(file.file_name),
        file_size: Some(file_size),
        mime_type: file.mime_type,
        extracted_text: Some(extracted_text),
        generated_content: None,
    };
    match storage.create_resource(resource).await {
        Ok(resource) => {
            info!(
                "Resource {} ({} bytes) uploaded by {}",
                resource.id, file_size, caller.id
            );
            HttpResponse::Created().json(ApiResponse::success(resource, "Resource uploaded"))
        }
        Err(e) => {
            remove_stored_file(&stored_path);
            error_response(&e)
        }
    }
}

pub async fn upload_resource(
    service: &ResourceService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;
    let extractor = service.get_extractor(request)?;
    let config = service.upload_config();

    let form = match read_form(payload, &config).await? {
        Ok(form) => form,
        Err(response) => return Ok(response),
    };
    Ok(store_upload(storage.as_ref(), extractor, &caller, form, &config).await)
}
