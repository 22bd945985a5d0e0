//! SQL text composition for the items table.
//!
//! Only fixed fragments and column names are ever formatted into SQL text.
//! Values travel as positional parameters (`$n`) in [`SqlValue`] order.

use catalog_items::{FieldChange, UpdateItemInput};

/// Columns returned by every item query. `price` is read back as text so it
/// never passes through a float.
pub const ITEM_COLUMNS: &str =
    "id, name, description, price::text AS price, stock, created_at, updated_at";

/// Filter shared by list and count so both always agree. `$1` is the escaped
/// ILIKE pattern, or NULL for "no filter".
pub const NAME_FILTER: &str = "($1::text IS NULL OR name ILIKE $1)";

/// A value bound to a positional placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
}

/// An UPDATE statement for the fields present in a partial update.
///
/// The item id is bound after `values`, at placeholder `values.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl UpdateStatement {
    /// Compose the statement, or `None` when the input would write nothing.
    pub fn compose(input: &UpdateItemInput) -> Option<Self> {
        let mut set_parts: Vec<String> = Vec::with_capacity(5);
        let mut values: Vec<SqlValue> = Vec::with_capacity(4);

        let mut push = |template: &str, value: SqlValue, set_parts: &mut Vec<String>| {
            values.push(value);
            set_parts.push(template.replace("{}", &format!("${}", values.len())));
        };

        if let Some(name) = &input.name {
            push("name = {}", SqlValue::Text(name.clone()), &mut set_parts);
        }
        match input.description_change() {
            FieldChange::Untouched => {}
            FieldChange::Set(description) => push(
                "description = {}",
                SqlValue::Text(description.to_string()),
                &mut set_parts,
            ),
            FieldChange::Clear => set_parts.push("description = NULL".to_string()),
        }
        if let Some(price) = &input.price {
            push("price = {}::numeric", SqlValue::Text(price.clone()), &mut set_parts);
        }
        if let Some(stock) = input.stock {
            push("stock = {}", SqlValue::Int(stock), &mut set_parts);
        }

        if set_parts.is_empty() {
            return None;
        }
        set_parts.push("updated_at = now()".to_string());

        let sql = format!(
            "UPDATE items SET {} WHERE id = ${} RETURNING {}",
            set_parts.join(", "),
            values.len() + 1,
            ITEM_COLUMNS
        );

        Some(Self { sql, values })
    }
}

/// ILIKE pattern for a case-insensitive substring match on `query`, with the
/// LIKE metacharacters escaped. `None` for an empty query (no filter).
pub fn name_pattern(query: &str) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}
