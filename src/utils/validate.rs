use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("Invalid academic year regex"));

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 学年格式 YYYY-YYYY，且后一年紧接前一年
pub fn validate_academic_year(year: &str) -> Result<(), &'static str> {
    let Some(caps) = ACADEMIC_YEAR_RE.captures(year) else {
        return Err("Academic year must be in format YYYY-YYYY");
    };
    let start: i32 = caps[1].parse().map_err(|_| "Academic year is invalid")?;
    let end: i32 = caps[2].parse().map_err(|_| "Academic year is invalid")?;
    if end != start + 1 {
        return Err("Academic year must span two consecutive years");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("teacher@school.edu").is_ok());
        assert!(validate_email("teacher.school.edu").is_err());
        assert!(validate_email("teacher@school").is_err());
    }

    #[test]
    fn test_academic_year() {
        assert!(validate_academic_year("2026-2027").is_ok());
        assert!(validate_academic_year("2026").is_err());
        assert!(validate_academic_year("26-27").is_err());
        assert!(validate_academic_year("2026-2028").is_err());
        assert!(validate_academic_year("2026/2027").is_err());
    }
}
