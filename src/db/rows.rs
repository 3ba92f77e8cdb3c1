use anyhow::Context;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Bookings,
    Reviews,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Bookings => "bookings",
            Table::Reviews => "reviews",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Bookings => &[
                "full_name",
                "mo_number",
                "location",
                "booked_date",
                "created_at",
                "status",
                "payment_status",
                "admin_notes",
            ],
            Table::Reviews => &["name", "review", "created_at", "rating"],
        }
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }
}

#[derive(Debug, Clone)]
pub struct Row {
    pub id: i64,
    pub table: Table,
    pub cells: Vec<Value>,
}

impl Row {
    pub fn value(&self, column: &str) -> &Value {
        self.table
            .column_index(column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&Value::Null)
    }

    pub fn text(&self, column: &str) -> String {
        match self.value(column) {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

pub fn append_row(conn: &Connection, table: Table, cells: Vec<Value>) -> anyhow::Result<i64> {
    let columns = table.columns();
    anyhow::ensure!(
        cells.len() == columns.len(),
        "{} expects {} cells, got {}",
        table.name(),
        columns.len(),
        cells.len()
    );

    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name(),
        columns.join(", "),
        placeholders.join(", ")
    );

    conn.execute(&sql, params_from_iter(cells.iter()))
        .with_context(|| format!("failed to append row to {}", table.name()))?;
    Ok(conn.last_insert_rowid())
}

pub fn scan_all(conn: &Connection, table: Table) -> anyhow::Result<Vec<Row>> {
    let columns = table.columns();
    let sql = format!(
        "SELECT rowid, {} FROM {} ORDER BY rowid ASC",
        columns.join(", "),
        table.name()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let id: i64 = row.get(0)?;
        let mut cells = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            cells.push(row.get::<_, Value>(i + 1)?);
        }
        Ok(Row { id, table, cells })
    })?;

    let mut out = vec![];
    for row in rows {
        out.push(row.with_context(|| format!("failed to read row from {}", table.name()))?);
    }
    Ok(out)
}

pub fn update_fields<F>(
    conn: &Connection,
    table: Table,
    matches: F,
    updates: &[(&str, Value)],
) -> anyhow::Result<bool>
where
    F: Fn(&Row) -> bool,
{
    for (column, _) in updates {
        anyhow::ensure!(
            table.column_index(column).is_some(),
            "unknown column {column} on {}",
            table.name()
        );
    }

    let target = match scan_all(conn, table)?.into_iter().find(|row| matches(row)) {
        Some(row) => row,
        None => return Ok(false),
    };

    if updates.is_empty() {
        return Ok(true);
    }

    let assignments: Vec<String> = updates
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE rowid = ?{}",
        table.name(),
        assignments.join(", "),
        updates.len() + 1
    );

    let mut values: Vec<Value> = updates.iter().map(|(_, v)| v.clone()).collect();
    values.push(Value::Integer(target.id));

    conn.execute(&sql, params_from_iter(values.iter()))
        .with_context(|| format!("failed to update row in {}", table.name()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn review(name: &str, text: &str) -> Vec<Value> {
        vec![
            Value::Text(name.to_string()),
            Value::Text(text.to_string()),
            Value::Text("2025-06-16T10:00:00+05:30".to_string()),
            Value::Integer(4),
        ]
    }

    #[test]
    fn test_scan_returns_insertion_order() {
        let conn = setup_db();
        append_row(&conn, Table::Reviews, review("A", "first")).unwrap();
        append_row(&conn, Table::Reviews, review("B", "second")).unwrap();
        append_row(&conn, Table::Reviews, review("C", "third")).unwrap();

        let rows = scan_all(&conn, Table::Reviews).unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.text("name")).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(rows[0].text("rating"), "4");
    }

    #[test]
    fn test_append_rejects_wrong_arity() {
        let conn = setup_db();
        let result = append_row(&conn, Table::Reviews, vec![Value::Text("x".into())]);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_first_match_only() {
        let conn = setup_db();
        append_row(&conn, Table::Reviews, review("A", "same")).unwrap();
        append_row(&conn, Table::Reviews, review("B", "same")).unwrap();

        let updated = update_fields(
            &conn,
            Table::Reviews,
            |row| row.text("review") == "same",
            &[("review", Value::Text("changed".into()))],
        )
        .unwrap();
        assert!(updated);

        let rows = scan_all(&conn, Table::Reviews).unwrap();
        assert_eq!(rows[0].text("review"), "changed");
        assert_eq!(rows[1].text("review"), "same");
        assert_eq!(rows[0].text("name"), "A");
    }

    #[test]
    fn test_update_no_match() {
        let conn = setup_db();
        append_row(&conn, Table::Reviews, review("A", "x")).unwrap();
        let updated = update_fields(&conn, Table::Reviews, |_| false, &[]).unwrap();
        assert!(!updated);
    }

    #[test]
    fn test_update_unknown_column() {
        let conn = setup_db();
        append_row(&conn, Table::Reviews, review("A", "x")).unwrap();
        let result = update_fields(
            &conn,
            Table::Reviews,
            |_| true,
            &[("rating; DROP TABLE reviews", Value::Integer(1))],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_untyped_column_keeps_integer() {
        let conn = setup_db();
        let cells = vec![
            Value::Text("Asha".into()),
            Value::Text("9999999999".into()),
            Value::Text("Delhi".into()),
            Value::Integer(1_749_945_600),
            Value::Text(String::new()),
            Value::Text(String::new()),
            Value::Text(String::new()),
            Value::Text(String::new()),
        ];
        append_row(&conn, Table::Bookings, cells).unwrap();
        let rows = scan_all(&conn, Table::Bookings).unwrap();
        assert_eq!(rows[0].value("booked_date"), &Value::Integer(1_749_945_600));
    }
}
