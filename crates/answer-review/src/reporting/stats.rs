use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::domain::{ClassResults, ExamQuestion, RttiCategory, StudentResult};
use super::sort::{sort_students, SortState};

/// Lowest grade that counts as a pass.
pub const PASS_GRADE: f64 = 5.5;

/// Dutch 1-10 grade for `total` out of `max`, rounded to one decimal.
pub fn grade(total: u32, max: u32) -> f64 {
    if max == 0 {
        return 1.0;
    }

    let percentage = f64::from(total) / f64::from(max) * 100.0;
    round_to_tenth((percentage / 100.0 * 9.0 + 1.0).clamp(1.0, 10.0))
}

/// Share of the category's questions the student answered fully, as a whole percent.
pub fn category_percentage(
    student: &StudentResult,
    results: &ClassResults,
    category: RttiCategory,
) -> u32 {
    let questions: Vec<&ExamQuestion> = results.questions_in(category).collect();
    if questions.is_empty() {
        return 0;
    }

    let correct = questions
        .iter()
        .filter(|question| {
            student
                .score_for(&question.id)
                .is_some_and(|score| score.is_correct())
        })
        .count();

    (correct as f64 / questions.len() as f64 * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percentage: f64,
    pub grade: f64,
    pub passed: bool,
    pub category_percentages: BTreeMap<RttiCategory, u32>,
}

impl StudentRow {
    pub fn new(student: &StudentResult, results: &ClassResults) -> Self {
        let total_score = student.total_score();
        let max_possible_score = student.max_possible_score();
        let grade = grade(total_score, max_possible_score);
        let category_percentages = RttiCategory::ordered()
            .into_iter()
            .map(|category| (category, category_percentage(student, results, category)))
            .collect();

        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            total_score,
            max_possible_score,
            percentage: round_to_tenth(student.percentage()),
            grade,
            passed: grade >= PASS_GRADE,
            category_percentages,
        }
    }

    pub fn category_percentage(&self, category: RttiCategory) -> u32 {
        self.category_percentages
            .get(&category)
            .copied()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RttiStat {
    pub category: RttiCategory,
    pub full_name: &'static str,
    pub question_count: usize,
    pub max_possible_score: u32,
    pub average_score: f64,
    pub average_percentage: f64,
}

pub fn rtti_stats(results: &ClassResults) -> Vec<RttiStat> {
    RttiCategory::ordered()
        .into_iter()
        .map(|category| {
            let questions: Vec<&ExamQuestion> = results.questions_in(category).collect();
            let max_possible_score: u32 = questions.iter().map(|question| question.max_score).sum();

            let class_total: u32 = results
                .students
                .iter()
                .flat_map(|student| {
                    questions
                        .iter()
                        .filter_map(|question| student.score_for(&question.id))
                })
                .map(|score| score.score)
                .sum();
            let average_score = average(f64::from(class_total), results.students.len());
            let average_percentage = if max_possible_score > 0 {
                average_score / f64::from(max_possible_score) * 100.0
            } else {
                0.0
            };

            RttiStat {
                category,
                full_name: category.full_name(),
                question_count: questions.len(),
                max_possible_score,
                average_score: round_to_tenth(average_score),
                average_percentage: round_to_tenth(average_percentage),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub student_count: usize,
    pub average_grade: f64,
    /// Percentage of students at or above [`PASS_GRADE`].
    pub pass_rate: f64,
    pub average_total_score: f64,
    pub max_total_score: u32,
    pub average_percentage: f64,
    pub highest_percentage: f64,
}

pub fn class_summary(results: &ClassResults) -> ClassSummary {
    let rows: Vec<StudentRow> = results
        .students
        .iter()
        .map(|student| StudentRow::new(student, results))
        .collect();
    summarize(&rows, results)
}

fn summarize(rows: &[StudentRow], results: &ClassResults) -> ClassSummary {
    let count = rows.len();
    let max_total_score: u32 = results.questions.iter().map(|question| question.max_score).sum();
    let average_grade = average(rows.iter().map(|row| row.grade).sum(), count);
    let passed = rows.iter().filter(|row| row.passed).count();
    let average_total_score = average(
        rows.iter().map(|row| f64::from(row.total_score)).sum(),
        count,
    );
    let average_percentage = if max_total_score > 0 {
        average_total_score / f64::from(max_total_score) * 100.0
    } else {
        0.0
    };
    let highest_percentage = rows
        .iter()
        .map(|row| row.percentage)
        .fold(0.0_f64, f64::max);

    ClassSummary {
        student_count: count,
        average_grade: round_to_tenth(average_grade),
        pass_rate: round_to_tenth(average(passed as f64 * 100.0, count)),
        average_total_score: round_to_tenth(average_total_score),
        max_total_score,
        average_percentage: round_to_tenth(average_percentage),
        highest_percentage,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionStat {
    pub question_id: String,
    pub title: String,
    pub category: RttiCategory,
    pub max_score: u32,
    pub average_score: f64,
    /// Class average score relative to the maximum, as a whole percent.
    pub score_percentage: u32,
    /// Share of students with a full score, as a whole percent.
    pub correct_percentage: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_given_answer: Option<String>,
}

pub fn question_stats(results: &ClassResults) -> Vec<QuestionStat> {
    let student_count = results.students.len();

    results
        .questions
        .iter()
        .map(|question| {
            let scores: Vec<_> = results
                .students
                .iter()
                .filter_map(|student| student.score_for(&question.id))
                .collect();
            let total: u32 = scores.iter().map(|score| score.score).sum();
            let correct = scores.iter().filter(|score| score.is_correct()).count();
            let average_score = average(f64::from(total), student_count);
            let score_percentage = if question.max_score > 0 {
                (average_score / f64::from(question.max_score) * 100.0).round() as u32
            } else {
                0
            };

            QuestionStat {
                question_id: question.id.clone(),
                title: question.title.clone(),
                category: question.category,
                max_score: question.max_score,
                average_score: round_to_tenth(average_score),
                score_percentage,
                correct_percentage: average(correct as f64 * 100.0, student_count).round() as u32,
                most_given_answer: question
                    .most_given_answer
                    .clone()
                    .or_else(|| most_common(scores.iter().map(|score| score.answer.as_str()))),
            }
        })
        .collect()
}

/// Everything the reporting dashboard renders for one exam.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassReport {
    pub summary: ClassSummary,
    pub categories: Vec<RttiStat>,
    pub questions: Vec<QuestionStat>,
    pub sort: SortState,
    pub students: Vec<StudentRow>,
}

impl ClassReport {
    pub fn build(results: &ClassResults, sort: SortState) -> Self {
        let mut students: Vec<StudentRow> = results
            .students
            .iter()
            .map(|student| StudentRow::new(student, results))
            .collect();
        let summary = summarize(&students, results);
        sort_students(&mut students, sort.key, sort.direction);

        Self {
            summary,
            categories: rtti_stats(results),
            questions: question_stats(results),
            sort,
            students,
        }
    }
}

fn most_common<'a, I>(answers: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, answer) in answers.into_iter().enumerate() {
        let answer = answer.trim();
        if answer.is_empty() {
            continue;
        }
        counts.entry(answer).or_insert((0, position)).0 += 1;
    }

    // Ties go to the answer seen first.
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(answer, _)| answer.to_string())
}

fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::domain::QuestionScore;

    fn question(id: &str, category: RttiCategory, max_score: u32) -> ExamQuestion {
        ExamQuestion {
            id: id.to_string(),
            title: format!("Vraag {id}"),
            category,
            max_score,
            most_given_answer: None,
        }
    }

    fn student(id: &str, scores: &[(&str, u32, u32, &str)]) -> StudentResult {
        StudentResult {
            id: id.to_string(),
            name: format!("Leerling {id}"),
            scores: scores
                .iter()
                .map(|(question_id, score, max_score, answer)| QuestionScore {
                    question_id: question_id.to_string(),
                    score: *score,
                    max_score: *max_score,
                    answer: answer.to_string(),
                })
                .collect(),
        }
    }

    fn results() -> ClassResults {
        ClassResults {
            questions: vec![
                question("q1", RttiCategory::R, 2),
                question("q2", RttiCategory::R, 2),
                question("q3", RttiCategory::I, 4),
            ],
            students: vec![
                student("s1", &[("q1", 2, 2, "water"), ("q2", 2, 2, "A"), ("q3", 4, 4, "B")]),
                student("s2", &[("q1", 1, 2, "lucht"), ("q2", 0, 2, "A"), ("q3", 2, 4, "C")]),
            ],
        }
    }

    #[test]
    fn grade_scales_linearly_and_clamps() {
        assert_eq!(grade(0, 8), 1.0);
        assert_eq!(grade(8, 8), 10.0);
        assert_eq!(grade(4, 8), 5.5);
        assert_eq!(grade(1, 3), 4.0);
        assert_eq!(grade(0, 0), 1.0);
    }

    #[test]
    fn category_percentage_counts_full_scores() {
        let results = results();
        let second = &results.students[1];

        assert_eq!(category_percentage(&results.students[0], &results, RttiCategory::R), 100);
        assert_eq!(category_percentage(second, &results, RttiCategory::R), 0);
        assert_eq!(category_percentage(second, &results, RttiCategory::T1), 0);
    }

    #[test]
    fn rtti_stats_average_over_students() {
        let stats = rtti_stats(&results());
        let reproduction = &stats[0];

        assert_eq!(stats.len(), 4);
        assert_eq!(reproduction.question_count, 2);
        assert_eq!(reproduction.max_possible_score, 4);
        assert_eq!(reproduction.average_score, 2.5);
        assert_eq!(reproduction.average_percentage, 62.5);

        let empty = &stats[1];
        assert_eq!(empty.question_count, 0);
        assert_eq!(empty.average_percentage, 0.0);
    }

    #[test]
    fn class_summary_reports_pass_rate_and_best_result() {
        let summary = class_summary(&results());

        assert_eq!(summary.student_count, 2);
        assert_eq!(summary.max_total_score, 8);
        assert_eq!(summary.average_total_score, 5.5);
        assert_eq!(summary.pass_rate, 50.0);
        assert_eq!(summary.highest_percentage, 100.0);
        assert_eq!(summary.average_grade, 7.2);
    }

    #[test]
    fn question_stats_pick_most_given_answer() {
        let stats = question_stats(&results());

        assert_eq!(stats[0].average_score, 1.5);
        assert_eq!(stats[0].score_percentage, 75);
        assert_eq!(stats[0].correct_percentage, 50);
        assert_eq!(stats[0].most_given_answer.as_deref(), Some("water"));
        assert_eq!(stats[1].most_given_answer.as_deref(), Some("A"));
    }

    #[test]
    fn empty_class_yields_zeroes() {
        let summary = class_summary(&ClassResults::default());
        assert_eq!(summary.student_count, 0);
        assert_eq!(summary.average_grade, 0.0);
        assert_eq!(summary.pass_rate, 0.0);
    }
}
