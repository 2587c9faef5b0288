use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考核类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub enum AssessmentType {
    Quiz,
    Assignment,
    UnitTest,
    MidTerm,
    FinalExam,
    Practical,
    Project,
    Viva,
}

// 学期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub enum Term {
    #[serde(rename = "term-1")]
    Term1,
    #[serde(rename = "term-2")]
    Term2,
    #[serde(rename = "term-3")]
    Term3,
    #[serde(rename = "semester-1")]
    Semester1,
    #[serde(rename = "semester-2")]
    Semester2,
    #[serde(rename = "annual")]
    Annual,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Term1 => "term-1",
            Term::Term2 => "term-2",
            Term::Term3 => "term-3",
            Term::Semester1 => "semester-1",
            Term::Semester2 => "semester-2",
            Term::Annual => "annual",
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "term-1" => Ok(Term::Term1),
            "term-2" => Ok(Term::Term2),
            "term-3" => Ok(Term::Term3),
            "semester-1" => Ok(Term::Semester1),
            "semester-2" => Ok(Term::Semester2),
            "annual" => Ok(Term::Annual),
            _ => Err(format!("Invalid term: {s}")),
        }
    }
}

/// 等级
///
/// 分段：>=90 A+，>=80 A，>=70 B+，>=60 B，>=50 C+，>=40 C，>=33 D，其余 F。
/// NA 只用于没有任何考核的记录。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
    #[serde(rename = "NA")]
    NotAvailable,
}

impl LetterGrade {
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 90.0 => LetterGrade::APlus,
            p if p >= 80.0 => LetterGrade::A,
            p if p >= 70.0 => LetterGrade::BPlus,
            p if p >= 60.0 => LetterGrade::B,
            p if p >= 50.0 => LetterGrade::CPlus,
            p if p >= 40.0 => LetterGrade::C,
            p if p >= 33.0 => LetterGrade::D,
            _ => LetterGrade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
            LetterGrade::NotAvailable => "NA",
        }
    }
}

/// 判定 .5 时容忍的浮点误差
const HALF_UP_EPSILON: f64 = 1e-9;

/// 百分比，四舍五入（.5 进位）到整数；分母为 0 时为 0
///
/// 先乘 100 再除，整数分值时结果精确；小数分值加上容差后再取整。
pub fn rounded_percentage(obtained: f64, max: f64) -> i64 {
    if max <= 0.0 {
        return 0;
    }
    (obtained * 100.0 / max + HALF_UP_EPSILON).round() as i64
}

/// 整数计数的百分比，纯整数运算保证 .5 进位；总数为 0 时为 0
pub fn count_percentage(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    (200 * count + total) / (2 * total)
}

// 单次考核结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct AssessmentResult {
    pub assessment_type: AssessmentType,
    pub title: String,
    pub max_marks: f64,
    pub obtained_marks: f64,
    pub percentage: i64,
    pub grade: LetterGrade,
    pub date: chrono::NaiveDate,
    pub feedback: Option<String>,
}

impl AssessmentResult {
    /// 按得分推导百分比与等级
    pub fn new(
        assessment_type: AssessmentType,
        title: String,
        max_marks: f64,
        obtained_marks: f64,
        date: chrono::NaiveDate,
        feedback: Option<String>,
    ) -> Self {
        let percentage = rounded_percentage(obtained_marks, max_marks);
        Self {
            assessment_type,
            title,
            max_marks,
            obtained_marks,
            percentage,
            grade: LetterGrade::from_percentage(percentage as f64),
            date,
            feedback,
        }
    }
}

// 学期汇总
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct AggregateScore {
    pub total_max_marks: f64,
    pub total_obtained_marks: f64,
    pub percentage: i64,
    pub grade: LetterGrade,
    pub rank: Option<i64>,
}

impl AggregateScore {
    fn compute(assessments: &[AssessmentResult]) -> Self {
        if assessments.is_empty() {
            return Self {
                total_max_marks: 0.0,
                total_obtained_marks: 0.0,
                percentage: 0,
                grade: LetterGrade::NotAvailable,
                rank: None,
            };
        }
        let total_max_marks: f64 = assessments.iter().map(|a| a.max_marks).sum();
        let total_obtained_marks: f64 = assessments.iter().map(|a| a.obtained_marks).sum();
        let percentage = rounded_percentage(total_obtained_marks, total_max_marks);
        Self {
            total_max_marks,
            total_obtained_marks,
            percentage,
            grade: LetterGrade::from_percentage(percentage as f64),
            rank: None,
        }
    }
}

/// 考核列表与汇总
///
/// 汇总只能通过 `add_assessment` / `remove_assessment` 随列表一起变化。
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct AssessmentBook {
    assessments: Vec<AssessmentResult>,
    aggregate: AggregateScore,
}

impl Default for AssessmentBook {
    fn default() -> Self {
        Self::from_assessments(Vec::new())
    }
}

impl AssessmentBook {
    pub fn from_assessments(assessments: Vec<AssessmentResult>) -> Self {
        let aggregate = AggregateScore::compute(&assessments);
        Self {
            assessments,
            aggregate,
        }
    }

    pub fn assessments(&self) -> &[AssessmentResult] {
        &self.assessments
    }

    pub fn aggregate(&self) -> &AggregateScore {
        &self.aggregate
    }

    pub fn add_assessment(&mut self, assessment: AssessmentResult) {
        self.assessments.push(assessment);
        self.recompute();
    }

    /// 按下标移除，下标越界时返回 None
    pub fn remove_assessment(&mut self, index: usize) -> Option<AssessmentResult> {
        if index >= self.assessments.len() {
            return None;
        }
        let removed = self.assessments.remove(index);
        self.recompute();
        Some(removed)
    }

    /// 排名只在同班同科同学期列表中有意义，不持久化
    pub fn set_rank(&mut self, rank: i64) {
        self.aggregate.rank = Some(rank);
    }

    fn recompute(&mut self) {
        let rank = self.aggregate.rank;
        self.aggregate = AggregateScore::compute(&self.assessments);
        self.aggregate.rank = rank;
    }
}

// 学期成绩记录：每个 (学生, 班级, 科目, 学年, 学期) 一条
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/performance.ts")]
pub struct PerformanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub academic_year: String,
    pub term: Term,
    #[serde(flatten)]
    pub book: AssessmentBook,
    pub teacher_remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
