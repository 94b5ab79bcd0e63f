//! Category models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named category items may be filed under.
///
/// Names are not unique; two categories with the same name are distinct rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
