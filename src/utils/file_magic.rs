/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// 只接受可以提取文本的课程资料：PDF 与纯文本。
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".pdf"）
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => data.starts_with(b"%PDF"),
        // 文本格式：不含 NUL，且不是常见的二进制容器
        ".txt" | ".md" => !data.contains(&0) && !looks_like_binary_container(data),
        // 未知格式 - 默认拒绝
        _ => false,
    }
}

fn looks_like_binary_container(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
        || data.starts_with(&[0x50, 0x4B, 0x03, 0x04])
        || data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.4";
        assert!(validate_magic_bytes(pdf_header, ".pdf"));
        assert!(validate_magic_bytes(pdf_header, ".PDF"));
        assert!(!validate_magic_bytes(b"hello", ".pdf"));
    }

    #[test]
    fn test_text_files() {
        let text_content = b"# Photosynthesis\nPlants convert light.";
        assert!(validate_magic_bytes(text_content, ".txt"));
        assert!(validate_magic_bytes(text_content, ".md"));
        assert!(!validate_magic_bytes(b"%PDF-1.7", ".txt"));
        assert!(!validate_magic_bytes(&[0x50, 0x4B, 0x03, 0x04, 0x00], ".md"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(&[], ".txt"));
    }

    #[test]
    fn test_unknown_extension() {
        let data = [0x00, 0x01, 0x02, 0x03];
        assert!(!validate_magic_bytes(&data, ".exe"));
        assert!(!validate_magic_bytes(b"%PDF", ".docx"));
    }
}
