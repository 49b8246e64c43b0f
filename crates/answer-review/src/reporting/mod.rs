//! Class-level RTTI reporting over graded exam results.

pub mod domain;
mod import;
mod sort;
mod stats;
mod student;

pub use domain::{ClassResults, ExamQuestion, QuestionScore, RttiCategory, StudentResult, UnknownCategory};
pub use import::{ReportImportError, ResultsImporter};
pub use sort::{sort_students, SortDirection, SortKey, SortState, UnknownSortKey};
pub use stats::{
    category_percentage, class_summary, grade, question_stats, rtti_stats, ClassReport,
    ClassSummary, QuestionStat, RttiStat, StudentRow, PASS_GRADE,
};
pub use student::{StudentDetail, StudentNotFound, StudentQuestionRow};
