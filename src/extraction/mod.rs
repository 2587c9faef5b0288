//! 上传文件的文本提取
//!
//! PDF 使用 pdf-extract，.txt / .md 按 UTF-8 读取，其余类型拒绝。
//! 提取是阻塞操作，调用方需放入阻塞线程池执行。

use std::path::Path;

use crate::errors::{Result, SchoolHubError};

pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8], file_name: &str) -> Result<String>;
}

/// 默认实现
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, bytes: &[u8], file_name: &str) -> Result<String> {
        let text = match extension(file_name).as_deref() {
            Some("pdf") => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                SchoolHubError::extraction(format!("Failed to extract text from PDF: {e}"))
            })?,
            Some("txt") | Some("md") => String::from_utf8(bytes.to_vec()).map_err(|_| {
                SchoolHubError::extraction("Text file is not valid UTF-8")
            })?,
            _ => {
                return Err(SchoolHubError::extraction(format!(
                    "Unsupported file type for text extraction: {file_name}"
                )));
            }
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(SchoolHubError::extraction(
                "No text could be extracted from the file",
            ));
        }
        Ok(text)
    }
}
