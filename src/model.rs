//! Data-transfer structs for rows in the records store.
//!
//! Entities mirror the five tables one-to-one; the remaining structs are the
//! shapes the analytical queries return. Relationships are plain foreign-key
//! ids, not object graphs.

use chrono::{DateTime, Utc};

/// A cohort of students sharing group-level reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: i64,
    pub name: String,
}

/// An instructor owning one or more subjects.
#[derive(Debug, Clone, PartialEq)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A course taught by exactly one teacher.
#[derive(Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub teacher_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub group_id: i64,
}

/// A timestamped score linking one student to one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub value: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Query result rows
// =============================================================================

/// A student ranked by average grade.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAverage {
    pub student_id: i64,
    pub name: String,
    pub email: String,
    pub avg_grade: f64,
}

/// A group ranked by average grade within one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAverage {
    pub group_id: i64,
    pub name: String,
    pub avg_grade: f64,
}

/// A subject reference as returned by course listings.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRef {
    pub subject_id: i64,
    pub name: String,
}

/// A student reference as returned by roster listings.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRef {
    pub student_id: i64,
    pub name: String,
    pub email: String,
}

/// One raw grade fact: who received what, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub student_id: i64,
    pub student_name: String,
    pub value: i64,
    pub created_at: DateTime<Utc>,
}
