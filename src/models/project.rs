use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::{Category, Material, Step};

/// Number of decimal places kept for hour values.
pub const HOURS_SCALE: i64 = 2;

/// A tracked project. `id` is 0 until the row has been stored.
///
/// The sub-collections are only populated when a single project is fetched
/// by id; listings leave them empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub estimated_hours: BigDecimal,
    pub actual_hours: BigDecimal,
    pub difficulty: i32,
    pub notes: Option<String>,
    pub materials: Vec<Material>,
    pub steps: Vec<Step>,
    pub categories: Vec<Category>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        estimated_hours: BigDecimal,
        actual_hours: BigDecimal,
        difficulty: i32,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        }
    }

    /// Compares the five stored columns, ignoring id and sub-collections.
    #[cfg(test)]
    pub fn same_details(&self, other: &Project) -> bool {
        self.name == other.name
            && self.estimated_hours == other.estimated_hours
            && self.actual_hours == other.actual_hours
            && self.difficulty == other.difficulty
            && self.notes == other.notes
    }
}

/// Canonical text form used to persist hour values.
pub fn hours_to_text(hours: &BigDecimal) -> String {
    hours.with_scale(HOURS_SCALE).to_string()
}

fn decode_hours(row: &SqliteRow, column: &str) -> Result<BigDecimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    BigDecimal::from_str(raw.trim())
        .map(|hours| hours.with_scale(HOURS_SCALE))
        .map_err(|err| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(err),
        })
}

impl<'r> FromRow<'r, SqliteRow> for Project {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("project_id")?,
            name: row.try_get("project_name")?,
            estimated_hours: decode_hours(row, "estimated_hours")?,
            actual_hours: decode_hours(row, "actual_hours")?,
            difficulty: row.try_get("difficulty")?,
            notes: row.try_get("notes")?,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        })
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   ID={}", self.id)?;
        writeln!(f, "   name={}", self.name)?;
        writeln!(f, "   estimatedHours={}", self.estimated_hours)?;
        writeln!(f, "   actualHours={}", self.actual_hours)?;
        writeln!(f, "   difficulty={}", self.difficulty)?;
        write!(f, "   notes={}", self.notes.as_deref().unwrap_or(""))?;

        if !self.materials.is_empty() {
            write!(f, "\n   Materials:")?;
            for material in &self.materials {
                write!(f, "\n      ID={}, name={}", material.id, material.name)?;
            }
        }

        if !self.steps.is_empty() {
            write!(f, "\n   Steps:")?;
            for step in &self.steps {
                write!(f, "\n      {}. {}", step.order, step.text)?;
            }
        }

        if !self.categories.is_empty() {
            write!(f, "\n   Categories:")?;
            for category in &self.categories {
                write!(f, "\n      ID={}, name={}", category.id, category.name)?;
            }
        }

        Ok(())
    }
}
