use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use super::domain::RttiCategory;
use super::stats::StudentRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Grade,
    TotalScore,
    Category(RttiCategory),
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Grade => "grade",
            Self::TotalScore => "total",
            Self::Category(category) => category.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected name, grade, total, r, t1, t2 or i)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "name" => Ok(Self::Name),
            "grade" => Ok(Self::Grade),
            "total" | "total_score" => Ok(Self::TotalScore),
            other => other
                .parse::<RttiCategory>()
                .map(Self::Category)
                .map_err(|_| UnknownSortKey(value.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Column header state of the student table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Grade,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Same key flips the direction; a new key starts descending.
    pub fn click(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Descending;
        }
    }
}

/// Stable sort: rows with equal keys keep their relative order.
pub fn sort_students(rows: &mut [StudentRow], key: SortKey, direction: SortDirection) {
    rows.sort_by(|a, b| match direction {
        SortDirection::Ascending => compare(a, b, key),
        SortDirection::Descending => compare(b, a, key),
    });
}

fn compare(a: &StudentRow, b: &StudentRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Grade => a.grade.total_cmp(&b.grade),
        SortKey::TotalScore => a.total_score.cmp(&b.total_score),
        SortKey::Category(category) => a
            .category_percentage(category)
            .cmp(&b.category_percentage(category)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn row(name: &str, total_score: u32, grade: f64, insight: u32) -> StudentRow {
        StudentRow {
            id: name.to_lowercase(),
            name: name.to_string(),
            total_score,
            max_possible_score: 20,
            percentage: f64::from(total_score) * 5.0,
            grade,
            passed: grade >= 5.5,
            category_percentages: BTreeMap::from([(RttiCategory::I, insight)]),
        }
    }

    fn names(rows: &[StudentRow]) -> Vec<&str> {
        rows.iter().map(|row| row.name.as_str()).collect()
    }

    fn rows() -> Vec<StudentRow> {
        vec![
            row("daan", 12, 6.4, 50),
            row("Bram", 18, 9.1, 100),
            row("fleur", 6, 3.7, 0),
            row("Anouk", 15, 7.8, 50),
        ]
    }

    #[test]
    fn grade_directions_are_reversals() {
        let mut descending = rows();
        sort_students(&mut descending, SortKey::Grade, SortDirection::Descending);
        let mut ascending = rows();
        sort_students(&mut ascending, SortKey::Grade, SortDirection::Ascending);

        assert_eq!(names(&descending), vec!["Bram", "Anouk", "daan", "fleur"]);
        let mut reversed = names(&ascending);
        reversed.reverse();
        assert_eq!(names(&descending), reversed);
    }

    #[test]
    fn names_sort_case_insensitively() {
        let mut rows = rows();
        sort_students(&mut rows, SortKey::Name, SortDirection::Ascending);
        assert_eq!(names(&rows), vec!["Anouk", "Bram", "daan", "fleur"]);
    }

    #[test]
    fn equal_category_percentages_keep_input_order() {
        let mut rows = rows();
        sort_students(
            &mut rows,
            SortKey::Category(RttiCategory::I),
            SortDirection::Descending,
        );
        assert_eq!(names(&rows), vec!["Bram", "daan", "Anouk", "fleur"]);
    }

    #[test]
    fn clicking_toggles_or_resets_direction() {
        let mut state = SortState::default();
        assert_eq!(state.key, SortKey::Grade);
        assert_eq!(state.direction, SortDirection::Descending);

        state.click(SortKey::Grade);
        assert_eq!(state.direction, SortDirection::Ascending);

        state.click(SortKey::Name);
        assert_eq!(state, SortState::new(SortKey::Name, SortDirection::Descending));
    }

    #[test]
    fn sort_keys_parse_from_cli_names() {
        assert_eq!("total".parse::<SortKey>(), Ok(SortKey::TotalScore));
        assert_eq!("T1".parse::<SortKey>(), Ok(SortKey::Category(RttiCategory::T1)));
        assert_eq!(
            "speed".parse::<SortKey>(),
            Err(UnknownSortKey("speed".to_string()))
        );
    }
}
