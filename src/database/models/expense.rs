use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::database::tags::Tags;

/// A single tracked expense.
///
/// Missing JSON fields fall back to their zero value, and nullable columns
/// are read back the same way, so a record is always fully populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub note: String,
    pub tags: Tags,
}

impl Expense {
    /// Same record carrying a different id.
    pub fn with_id(self, id: i64) -> Self {
        Self { id, ..self }
    }
}

impl<'r> FromRow<'r, PgRow> for Expense {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
            amount: row.try_get::<Option<f64>, _>("amount")?.unwrap_or_default(),
            note: row.try_get::<Option<String>, _>("note")?.unwrap_or_default(),
            tags: row.try_get::<Option<Tags>, _>("tags")?.unwrap_or_default(),
        })
    }
}
