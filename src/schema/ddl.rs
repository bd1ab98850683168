use crate::schema::{ColumnType, TableSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let sql_type = match col.col_type {
            ColumnType::Integer => "INTEGER",
            // Timestamps are RFC 3339 text; lexicographic order matches
            // chronological order for a fixed UTC offset.
            ColumnType::Text | ColumnType::Timestamp => "TEXT",
        };

        // "id" is the integer primary key on every table and gets
        // auto-assigned rowids; everything else is NOT NULL.
        let mut line = if col.name == "id" {
            format!("    id {} PRIMARY KEY AUTOINCREMENT", sql_type)
        } else {
            format!("    {} {} NOT NULL", col.name, sql_type)
        };

        if col.unique {
            line.push_str(" UNIQUE");
        }
        if let Some(expr) = col.default {
            line.push_str(&format!(" DEFAULT {}", expr));
        }
        if let Some(expr) = col.check {
            line.push_str(&format!(" CHECK ({})", expr));
        }

        columns.push(line);
    }

    for fk in schema.foreign_keys {
        columns.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE CASCADE",
            fk.column, fk.references_table, fk.references_column
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements: one per foreign key column plus any
/// explicit index definitions.
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let mut statements: Vec<String> = schema
        .foreign_keys
        .iter()
        .map(|fk| {
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                schema.name, fk.column, schema.name, fk.column
            )
        })
        .collect();

    for index in schema.indexes {
        let joined = index.columns.join("_");
        statements.push(format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
            schema.name,
            joined,
            schema.name,
            index.columns.join(", ")
        ));
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{GRADES, GROUPS, STUDENTS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&STUDENTS);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS students"));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("email TEXT NOT NULL UNIQUE"));
        assert!(sql.contains("FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE"));
    }

    #[test]
    fn grade_table_has_check_and_default() {
        let sql = generate_create_table(&GRADES);
        assert!(sql.contains("value INTEGER NOT NULL CHECK (value >= 0 AND value <= 100)"));
        assert!(sql.contains("created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"));
        assert!(sql.contains("FOREIGN KEY (student_id) REFERENCES students(id) ON DELETE CASCADE"));
        assert!(sql.contains("FOREIGN KEY (subject_id) REFERENCES subjects(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&STUDENTS);
        assert!(indexes.iter().any(|i| i.contains("idx_students_group_id")));
        assert!(indexes.iter().any(|i| i.contains("idx_students_name")));

        // No FK columns and no explicit indexes on groups
        assert!(generate_indexes(&GROUPS).is_empty());
    }
}
