//! The ten analytical queries over the records store.
//!
//! Each function is a pure read of the current database state. Name
//! parameters are matched exactly against the entity's identifying field;
//! an unknown name yields an empty result or `None`, never an error.
//!
//! Averages are computed in SQL as `ROUND(AVG(value), 2)`. A `NULL`
//! aggregate (no matching grades) becomes `None`; an average of exactly
//! zero is a present value. Ranked queries break ties on entity id
//! ascending so equal averages come back in a stable order.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::model::{GradeRecord, GroupAverage, StudentAverage, StudentRef, SubjectRef};
use crate::store::Store;

/// Top five students by average grade across all subjects.
///
/// Students without a single grade are excluded (inner join).
pub fn top_students(store: &Store) -> Result<Vec<StudentAverage>> {
    debug!("querying top students by average grade");

    let mut stmt = store.conn.prepare(
        "SELECT s.id, s.name, s.email, ROUND(AVG(g.value), 2) AS avg_grade
         FROM students s
         JOIN grades g ON g.student_id = s.id
         GROUP BY s.id, s.name, s.email
         ORDER BY AVG(g.value) DESC, s.id ASC
         LIMIT 5",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(StudentAverage {
            student_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            avg_grade: row.get(3)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// The student with the highest average grade in one subject.
///
/// `None` when the subject is unknown or has no grades yet.
pub fn best_in_subject(store: &Store, subject_name: &str) -> Result<Option<StudentAverage>> {
    debug!(subject = subject_name, "querying best student in subject");

    let row = store
        .conn
        .query_row(
            "SELECT s.id, s.name, s.email, ROUND(AVG(g.value), 2) AS avg_grade
             FROM students s
             JOIN grades g ON g.student_id = s.id
             JOIN subjects sub ON sub.id = g.subject_id
             WHERE sub.name = ?1
             GROUP BY s.id, s.name, s.email
             ORDER BY AVG(g.value) DESC, s.id ASC
             LIMIT 1",
            params![subject_name],
            |row| {
                Ok(StudentAverage {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    avg_grade: row.get(3)?,
                })
            },
        )
        .optional()?;

    Ok(row)
}

/// Per-group average grade in one subject, best group first.
pub fn group_average_in_subject(store: &Store, subject_name: &str) -> Result<Vec<GroupAverage>> {
    debug!(subject = subject_name, "querying group averages in subject");

    let mut stmt = store.conn.prepare(
        "SELECT gr.id, gr.name, ROUND(AVG(g.value), 2) AS avg_grade
         FROM groups gr
         JOIN students s ON s.group_id = gr.id
         JOIN grades g ON g.student_id = s.id
         JOIN subjects sub ON sub.id = g.subject_id
         WHERE sub.name = ?1
         GROUP BY gr.id, gr.name
         ORDER BY AVG(g.value) DESC, gr.id ASC",
    )?;

    let rows = stmt.query_map(params![subject_name], |row| {
        Ok(GroupAverage {
            group_id: row.get(0)?,
            name: row.get(1)?,
            avg_grade: row.get(2)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Average of every grade in the database; `None` when there are none.
pub fn overall_average(store: &Store) -> Result<Option<f64>> {
    debug!("querying overall average grade");

    let avg = store
        .conn
        .query_row("SELECT ROUND(AVG(value), 2) FROM grades", [], |row| {
            row.get::<_, Option<f64>>(0)
        })?;

    Ok(avg)
}

/// Subjects taught by the named teacher, alphabetical.
pub fn teacher_courses(store: &Store, teacher_name: &str) -> Result<Vec<SubjectRef>> {
    debug!(teacher = teacher_name, "querying teacher's courses");

    let mut stmt = store.conn.prepare(
        "SELECT sub.id, sub.name
         FROM subjects sub
         JOIN teachers t ON sub.teacher_id = t.id
         WHERE t.name = ?1
         ORDER BY sub.name",
    )?;

    let rows = stmt.query_map(params![teacher_name], subject_ref)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Students enrolled in the named group, alphabetical.
pub fn group_students(store: &Store, group_name: &str) -> Result<Vec<StudentRef>> {
    debug!(group = group_name, "querying group roster");

    let mut stmt = store.conn.prepare(
        "SELECT s.id, s.name, s.email
         FROM students s
         JOIN groups gr ON s.group_id = gr.id
         WHERE gr.name = ?1
         ORDER BY s.name",
    )?;

    let rows = stmt.query_map(params![group_name], |row| {
        Ok(StudentRef {
            student_id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Every individual grade for a group in one subject, ordered by student id
/// then grade timestamp. Raw facts, no aggregation.
pub fn group_subject_grades(
    store: &Store,
    group_name: &str,
    subject_name: &str,
) -> Result<Vec<GradeRecord>> {
    debug!(
        group = group_name,
        subject = subject_name,
        "querying raw grades for group and subject"
    );

    let mut stmt = store.conn.prepare(
        "SELECT s.id, s.name, g.value, g.created_at
         FROM students s
         JOIN groups gr ON s.group_id = gr.id
         JOIN grades g ON g.student_id = s.id
         JOIN subjects sub ON sub.id = g.subject_id
         WHERE gr.name = ?1 AND sub.name = ?2
         ORDER BY s.id ASC, g.created_at ASC",
    )?;

    let rows = stmt.query_map(params![group_name, subject_name], |row| {
        Ok(GradeRecord {
            student_id: row.get(0)?,
            student_name: row.get(1)?,
            value: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;

    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Average across all grades in subjects taught by the named teacher.
pub fn teacher_average(store: &Store, teacher_name: &str) -> Result<Option<f64>> {
    debug!(teacher = teacher_name, "querying teacher's grade average");

    let avg = store.conn.query_row(
        "SELECT ROUND(AVG(g.value), 2)
         FROM grades g
         JOIN subjects sub ON sub.id = g.subject_id
         JOIN teachers t ON sub.teacher_id = t.id
         WHERE t.name = ?1",
        params![teacher_name],
        |row| row.get::<_, Option<f64>>(0),
    )?;

    Ok(avg)
}

/// Distinct subjects the named student has at least one grade in,
/// alphabetical.
pub fn student_courses(store: &Store, student_name: &str) -> Result<Vec<SubjectRef>> {
    debug!(student = student_name, "querying student's courses");

    let mut stmt = store.conn.prepare(
        "SELECT sub.id, sub.name
         FROM subjects sub
         JOIN grades g ON g.subject_id = sub.id
         JOIN students s ON g.student_id = s.id
         WHERE s.name = ?1
         GROUP BY sub.id, sub.name
         ORDER BY sub.name",
    )?;

    let rows = stmt.query_map(params![student_name], subject_ref)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Subjects taught by the named teacher in which the named student has at
/// least one grade. Distinct, alphabetical.
pub fn student_teacher_courses(
    store: &Store,
    student_name: &str,
    teacher_name: &str,
) -> Result<Vec<SubjectRef>> {
    debug!(
        student = student_name,
        teacher = teacher_name,
        "querying student's courses from teacher"
    );

    let mut stmt = store.conn.prepare(
        "SELECT sub.id, sub.name
         FROM subjects sub
         JOIN grades g ON g.subject_id = sub.id
         JOIN students s ON g.student_id = s.id
         JOIN teachers t ON sub.teacher_id = t.id
         WHERE s.name = ?1 AND t.name = ?2
         GROUP BY sub.id, sub.name
         ORDER BY sub.name",
    )?;

    let rows = stmt.query_map(params![student_name, teacher_name], subject_ref)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

fn subject_ref(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubjectRef> {
    Ok(SubjectRef {
        subject_id: row.get(0)?,
        name: row.get(1)?,
    })
}
