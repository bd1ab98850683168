//! Table definitions for the academic records schema

use super::types::*;

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static GROUPS: TableSchema = TableSchema {
    name: "groups",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text).unique(),
    ],
    foreign_keys: &[],
    indexes: &[],
};

pub static TEACHERS: TableSchema = TableSchema {
    name: "teachers",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("email", ColumnType::Text).unique(),
    ],
    foreign_keys: &[],
    indexes: &[Index::on(&["name"])],
};

// =============================================================================
// Dependent Tables
// =============================================================================

pub static SUBJECTS: TableSchema = TableSchema {
    name: "subjects",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text).unique(),
        Column::required("teacher_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("teacher_id", "teachers")],
    indexes: &[],
};

pub static STUDENTS: TableSchema = TableSchema {
    name: "students",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("email", ColumnType::Text).unique(),
        Column::required("group_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("group_id", "groups")],
    indexes: &[Index::on(&["name"])],
};

pub static GRADES: TableSchema = TableSchema {
    name: "grades",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("student_id", ColumnType::Integer),
        Column::required("subject_id", ColumnType::Integer),
        Column::required("value", ColumnType::Integer).check("value >= 0 AND value <= 100"),
        Column::required("created_at", ColumnType::Timestamp).default("CURRENT_TIMESTAMP"),
    ],
    foreign_keys: &[
        ForeignKey::new("student_id", "students"),
        ForeignKey::new("subject_id", "subjects"),
    ],
    indexes: &[],
};

/// All tables in dependency order (parents before children).
///
/// Seeding inserts in this order; purging deletes in the reverse order.
pub static ALL_TABLES: &[&TableSchema] = &[&GROUPS, &TEACHERS, &SUBJECTS, &STUDENTS, &GRADES];

/// Get names of all tables in dependency order
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tables_are_in_dependency_order() {
        let mut seen: HashSet<&str> = HashSet::new();
        for table in ALL_TABLES {
            for dep in table.dependencies() {
                assert!(
                    seen.contains(dep),
                    "{} depends on {} which is listed later",
                    table.name,
                    dep
                );
            }
            seen.insert(table.name);
        }
    }

    #[test]
    fn grade_value_range_is_checked() {
        let value = GRADES
            .columns
            .iter()
            .find(|c| c.name == "value")
            .expect("grades.value column");
        assert_eq!(value.check, Some("value >= 0 AND value <= 100"));
    }

    #[test]
    fn unique_identifying_fields() {
        assert!(GROUPS.columns.iter().any(|c| c.name == "name" && c.unique));
        assert!(SUBJECTS.columns.iter().any(|c| c.name == "name" && c.unique));
        assert!(TEACHERS.columns.iter().any(|c| c.name == "email" && c.unique));
        assert!(STUDENTS.columns.iter().any(|c| c.name == "email" && c.unique));
    }
}
