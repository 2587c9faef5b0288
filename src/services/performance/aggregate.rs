//! 测验成绩统计与学期排名

use std::cmp::Ordering;

use crate::models::performance::entities::PerformanceRecord;
use crate::models::performance::responses::{
    OverallStats, PerformanceStatsResponse, SubjectStats, TrendPoint,
};
use crate::models::quizzes::entities::QuizResult;

/// 趋势中保留的最近测验数
pub const RECENT_TREND_LEN: usize = 10;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: impl Iterator<Item = i64>) -> f64 {
    let (sum, count) = values.fold((0i64, 0i64), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

pub fn overall_stats(results: &[QuizResult]) -> OverallStats {
    OverallStats {
        total_quizzes: results.len() as i64,
        average_percentage: round2(mean(results.iter().map(|r| r.percentage))),
        total_score: results.iter().map(|r| i64::from(r.score)).sum(),
        total_possible: results.iter().map(|r| i64::from(r.total_marks)).sum(),
    }
}

/// 按科目分组，平均分降序；平均分相同时保持科目首次出现的顺序
pub fn subject_stats(results: &[QuizResult]) -> Vec<SubjectStats> {
    let mut groups: Vec<(&str, Vec<i64>)> = Vec::new();
    for result in results {
        match groups.iter_mut().find(|(s, _)| *s == result.subject) {
            Some((_, percentages)) => percentages.push(result.percentage),
            None => groups.push((result.subject.as_str(), vec![result.percentage])),
        }
    }

    let mut stats: Vec<(f64, SubjectStats)> = groups
        .into_iter()
        .map(|(subject, percentages)| {
            let avg = mean(percentages.iter().copied());
            let stat = SubjectStats {
                subject: subject.to_string(),
                attempts: percentages.len() as i64,
                average_percentage: round2(avg),
                max_percentage: percentages.iter().copied().max().unwrap_or(0),
                min_percentage: percentages.iter().copied().min().unwrap_or(0),
            };
            (avg, stat)
        })
        .collect();
    stats.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    stats.into_iter().map(|(_, s)| s).collect()
}

/// 最近的测验，最新在前（输入已按时间倒序）
pub fn recent_trend(results: &[QuizResult]) -> Vec<TrendPoint> {
    results
        .iter()
        .take(RECENT_TREND_LEN)
        .map(|r| TrendPoint {
            subject: r.subject.clone(),
            percentage: r.percentage,
            date: r.attempted_at,
            topic: r.quiz_topic.clone(),
        })
        .collect()
}

pub fn performance_stats(results: &[QuizResult]) -> PerformanceStatsResponse {
    PerformanceStatsResponse {
        overall: overall_stats(results),
        by_subject: subject_stats(results),
        recent_trend: recent_trend(results),
    }
}

/// 竞争排名（1, 2, 2, 4），按学期汇总百分比降序
pub fn assign_ranks(records: &mut [PerformanceRecord]) {
    records.sort_by(|a, b| {
        b.book
            .aggregate()
            .percentage
            .cmp(&a.book.aggregate().percentage)
    });
    let mut previous: Option<(i64, i64)> = None;
    for (index, record) in records.iter_mut().enumerate() {
        let percentage = record.book.aggregate().percentage;
        let rank = match previous {
            Some((p, r)) if p == percentage => r,
            _ => index as i64 + 1,
        };
        record.book.set_rank(rank);
        previous = Some((percentage, rank));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::performance::entities::tests::assessment;
    use crate::models::performance::entities::{AssessmentBook, Term};

    fn result(subject: &str, percentage: i64, minutes_ago: i64) -> QuizResult {
        QuizResult {
            id: minutes_ago,
            student_id: 1,
            class_id: None,
            resource_id: None,
            quiz_topic: Some(format!("{subject} topic")),
            subject: subject.to_string(),
            score: (percentage / 10) as i32,
            total_marks: 10,
            percentage,
            answers: vec![],
            ai_feedback: String::new(),
            attempted_at: chrono::Utc::now() - chrono::Duration::minutes(minutes_ago),
        }
    }

    fn record(id: i64, obtained: f64) -> PerformanceRecord {
        PerformanceRecord {
            id,
            student_id: id,
            class_id: 1,
            subject_id: 1,
            academic_year: "2026-2027".into(),
            term: Term::Term1,
            book: AssessmentBook::from_assessments(vec![assessment(100.0, obtained)]),
            teacher_remarks: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        let stats = performance_stats(&[]);
        assert_eq!(
            stats.overall,
            OverallStats {
                total_quizzes: 0,
                average_percentage: 0.0,
                total_score: 0,
                total_possible: 0,
            }
        );
        assert!(stats.by_subject.is_empty());
        assert!(stats.recent_trend.is_empty());
    }

    #[test]
    fn test_overall_and_subject_means() {
        let results = vec![
            result("Math", 80, 1),
            result("Science", 90, 2),
            result("Math", 65, 3),
            result("Math", 70, 4),
        ];
        let overall = overall_stats(&results);
        assert_eq!(overall.total_quizzes, 4);
        assert_eq!(overall.average_percentage, 76.25);
        assert_eq!(overall.total_score, 30);
        assert_eq!(overall.total_possible, 40);

        let by_subject = subject_stats(&results);
        assert_eq!(by_subject[0].subject, "Science");
        assert_eq!(by_subject[1].subject, "Math");
        assert_eq!(by_subject[1].attempts, 3);
        assert_eq!(by_subject[1].average_percentage, 71.67);
        assert_eq!(by_subject[1].max_percentage, 80);
        assert_eq!(by_subject[1].min_percentage, 65);
    }

    #[test]
    fn test_subject_ties_keep_first_appearance() {
        let results = vec![
            result("History", 60, 1),
            result("Art", 60, 2),
            result("Music", 75, 3),
        ];
        let names: Vec<String> = subject_stats(&results)
            .into_iter()
            .map(|s| s.subject)
            .collect();
        assert_eq!(names, vec!["Music", "History", "Art"]);
    }

    #[test]
    fn test_trend_keeps_ten_newest() {
        let results: Vec<QuizResult> = (0..12).map(|i| result("Math", 50 + i, i)).collect();
        let trend = recent_trend(&results);
        assert_eq!(trend.len(), RECENT_TREND_LEN);
        assert_eq!(trend[0].percentage, 50);
        assert_eq!(trend[0].topic.as_deref(), Some("Math topic"));
    }

    #[test]
    fn test_competition_ranking() {
        let mut records = vec![record(1, 70.0), record(2, 90.0), record(3, 80.0), record(4, 80.0)];
        assign_ranks(&mut records);
        let ranks: Vec<(i64, Option<i64>)> = records
            .iter()
            .map(|r| (r.id, r.book.aggregate().rank))
            .collect();
        assert_eq!(
            ranks,
            vec![(2, Some(1)), (3, Some(2)), (4, Some(2)), (1, Some(4))]
        );
    }
}
