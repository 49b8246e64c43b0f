use crate::infra::load_catalog;
use answer_review::error::AppError;
use answer_review::reporting::{
    ClassReport, ResultsImporter, RttiCategory, SortDirection, SortKey, SortState,
    StudentDetail,
};
use answer_review::review::{
    AnswerId, AnswerRowView, ReviewError, ReviewSession, ReviewSettings, ReviewView,
    SuggestionState,
};
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;

const DEMO_RESULTS_CSV: &str = include_str!("../fixtures/demo_results.csv");

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    /// Answer catalog JSON (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Leave scored answers out of the grid
    #[arg(long)]
    pub(crate) hide_scored: bool,
    /// Reveal every AI suggestion
    #[arg(long)]
    pub(crate) reveal_all: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PromptArgs {
    /// Answer catalog JSON (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Identifier of the answer to build the prompt for
    #[arg(long)]
    pub(crate) answer: u32,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Results CSV export, one row per student and question
    #[arg(long)]
    pub(crate) results: PathBuf,
    /// Student table column: name, grade, total, r, t1, t2 or i
    #[arg(long, default_value = "grade")]
    pub(crate) sort: SortKey,
    /// Sort the student table ascending instead of descending
    #[arg(long)]
    pub(crate) ascending: bool,
    /// Show the per-question breakdown of one student instead of the class overview
    #[arg(long)]
    pub(crate) student: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Answer catalog JSON (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Skip the class report portion of the demo
    #[arg(long)]
    pub(crate) skip_report: bool,
}

pub(crate) fn run_review_show(args: ShowArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let session = ReviewSession::with_settings(
        catalog,
        ReviewSettings {
            hide_scored: args.hide_scored,
            reveal_all: args.reveal_all,
        },
    );

    render_review(&session.view());
    Ok(())
}

pub(crate) fn run_review_prompt(args: PromptArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let session = ReviewSession::new(catalog);
    let prompt = session.grading_prompt(AnswerId(args.answer))?;

    println!("{}", prompt.prompt);
    println!("\nOpen in chat: {}", prompt.chat_link);
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let results = ResultsImporter::from_path(&args.results)?;
    if let Some(student_id) = args.student.as_deref() {
        let detail = StudentDetail::build(&results, student_id)?;
        println!("{}", render_student(&detail).join("\n"));
        return Ok(());
    }

    let direction = if args.ascending {
        SortDirection::Ascending
    } else {
        SortDirection::Descending
    };

    let report = ClassReport::build(&results, SortState::new(args.sort, direction));
    render_report(&report);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let mut session = ReviewSession::new(catalog);

    println!("Answer review demo");
    render_review(&session.view());

    if let Some(candidate) = first_masked(&session.view()) {
        session.reveal_one(candidate)?;
        match session.adopt_suggestion(candidate) {
            Ok(outcome) => println!(
                "\nRevealed and adopted the AI score for answer {}: {:?}",
                candidate, outcome.change
            ),
            Err(ReviewError::SuggestionUnavailable(id)) => {
                println!("\nAnswer {id} has no suggestion worth adopting")
            }
            Err(err) => return Err(err.into()),
        }
    }

    let groups: Vec<String> = session
        .catalog()
        .groups()
        .iter()
        .map(|group| group.label.clone())
        .collect();
    if let Some(label) = groups.get(1) {
        let outcome = session.apply_group_score(label, 0)?;
        println!(
            "Scored {} answers in '{}' with 0",
            outcome.updated.len(),
            label
        );
    }

    let exits = session.set_hide_scored(true);
    for ticket in exits {
        session.complete_exit(ticket);
    }
    println!("\nRemaining answers with scored answers hidden");
    render_review(&session.view());

    if let Some(row) = session
        .view()
        .groups
        .first()
        .and_then(|group| group.answers.first())
    {
        let prompt = session.grading_prompt(row.id)?;
        println!("\nGrading prompt for answer {}:\n{}", row.id, prompt.prompt);
    }

    if args.skip_report {
        return Ok(());
    }

    println!("\nClass report (bundled demo results)");
    let results = ResultsImporter::from_reader(Cursor::new(DEMO_RESULTS_CSV))?;
    render_report(&ClassReport::build(&results, SortState::default()));
    Ok(())
}

fn first_masked(view: &ReviewView) -> Option<AnswerId> {
    view.groups
        .iter()
        .flat_map(|group| group.answers.iter())
        .find(|row| row.suggestion == SuggestionState::Masked)
        .map(|row| row.id)
}

fn render_review(view: &ReviewView) {
    println!(
        "{}: {}\n{}",
        view.question.title, view.question.text, view.question.instruction
    );
    println!(
        "Progress: {}/{} scored ({:.0}%) | hide scored: {} | reveal all: {}",
        view.progress.scored,
        view.progress.total,
        view.progress.percent,
        view.hide_scored,
        view.reveal_all
    );

    if view.groups.is_empty() {
        println!("  All answers are scored.");
    }

    for group in &view.groups {
        println!("\n{} ({})", group.label, group.answers.len());
        for row in &group.answers {
            println!("  {}", render_row(row));
        }
    }
}

fn render_row(row: &AnswerRowView) -> String {
    let score = row
        .score
        .map(|score| format!("{score}/{}", row.max_score))
        .unwrap_or_else(|| format!("-/{}", row.max_score));
    let suggestion = match row.suggestion {
        SuggestionState::Unavailable => "no AI suggestion".to_string(),
        SuggestionState::Masked => "AI suggestion hidden".to_string(),
        SuggestionState::Revealed {
            score,
            confidence,
            adopted,
        } => {
            let marker = if adopted { " (adopted)" } else { "" };
            format!("AI {score} @ {confidence}%{marker}")
        }
    };
    let frequency = match row.frequency {
        Some(count) if count > 1 => format!(" x{count}"),
        _ => String::new(),
    };
    let fading = if row.fading { " [leaving]" } else { "" };

    format!(
        "#{:<3} [{score}] {}{frequency} | {suggestion}{fading}",
        row.id.0, row.text
    )
}

fn render_report(report: &ClassReport) {
    let summary = &report.summary;
    println!(
        "- {} students | average grade {:.1} | {:.0}% pass",
        summary.student_count, summary.average_grade, summary.pass_rate
    );
    println!(
        "- average score {:.1}/{} ({:.1}%) | best {:.1}%",
        summary.average_total_score,
        summary.max_total_score,
        summary.average_percentage,
        summary.highest_percentage
    );

    println!("RTTI categories:");
    for stat in &report.categories {
        println!(
            "  - {} {}: {} questions | average {:.1}/{} ({:.1}%)",
            stat.category.label(),
            stat.full_name,
            stat.question_count,
            stat.average_score,
            stat.max_possible_score,
            stat.average_percentage
        );
    }

    println!("Questions:");
    for question in &report.questions {
        println!(
            "  - {} [{}] average {:.1}/{} | {}% correct | most given: {}",
            question.title,
            question.category.label(),
            question.average_score,
            question.max_score,
            question.correct_percentage,
            question.most_given_answer.as_deref().unwrap_or("-")
        );
    }

    println!(
        "Students (sorted by {}, {:?}):",
        report.sort.key.label(),
        report.sort.direction
    );
    for student in &report.students {
        let categories: Vec<String> = RttiCategory::ordered()
            .into_iter()
            .map(|category| {
                format!(
                    "{} {}%",
                    category.label(),
                    student.category_percentage(category)
                )
            })
            .collect();
        println!(
            "  - {:<20} {:>4.1} | {}/{} | {}",
            student.name,
            student.grade,
            student.total_score,
            student.max_possible_score,
            categories.join(" ")
        );
    }
}

fn render_student(detail: &StudentDetail) -> Vec<String> {
    let student = &detail.student;
    let mut lines = vec![format!(
        "{} | grade {:.1} | {}/{} ({:.1}%)",
        student.name,
        student.grade,
        student.total_score,
        student.max_possible_score,
        student.percentage
    )];

    for question in &detail.questions {
        let answer = if question.answer.is_empty() {
            "-"
        } else {
            question.answer.as_str()
        };
        let status = if question.correct { "correct" } else { "incorrect" };
        lines.push(format!(
            "  - {} [{}] {}/{} ({}%) | {} | {}",
            question.title,
            question.category.label(),
            question.score,
            question.max_score,
            question.score_percentage,
            answer,
            status
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_review::review::AnswerCatalog;
    use std::sync::Arc;

    #[test]
    fn rows_render_score_and_suggestion() {
        let catalog = Arc::new(AnswerCatalog::sample().expect("sample catalog"));
        let session = ReviewSession::new(catalog);
        let view = session.view();
        let first = &view.groups[0].answers[0];

        let line = render_row(first);
        assert!(line.contains("[2/2]"));
        assert!(line.contains("AI 2 @ 98% (adopted)"));
        assert!(line.contains(" x9"));
    }

    #[test]
    fn first_masked_skips_revealed_rows() {
        let catalog = Arc::new(AnswerCatalog::sample().expect("sample catalog"));
        let session = ReviewSession::new(catalog);

        assert_eq!(first_masked(&session.view()), Some(AnswerId(3)));
    }

    #[test]
    fn student_breakdown_marks_unanswered_questions() {
        let results =
            ResultsImporter::from_reader(Cursor::new(DEMO_RESULTS_CSV)).expect("demo csv");
        let detail = StudentDetail::build(&results, "s03").expect("student exists");

        let lines = render_student(&detail);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Fleur de Boer | grade"));
        assert_eq!(lines[5], "  - Beschermen [I] 0/4 (0%) | - | incorrect");
    }

    #[test]
    fn demo_results_parse() {
        let results =
            ResultsImporter::from_reader(Cursor::new(DEMO_RESULTS_CSV)).expect("demo csv");
        assert_eq!(results.students.len(), 4);
        assert_eq!(results.questions.len(), 5);
    }
}
