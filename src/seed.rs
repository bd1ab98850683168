//! Synthetic dataset generation.
//!
//! The seeder purges every table and rebuilds a referentially consistent
//! dataset in dependency order, all inside one transaction: either the whole
//! new dataset lands, or the database is left exactly as it was.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Group, Student, Subject, Teacher};
use crate::store::{self, Store};

/// Fixed pool of academic subject names; subjects are drawn from it without
/// replacement, so a run can never produce duplicate subject names.
pub const SUBJECT_POOL: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Literature",
    "Computer Science",
    "Philosophy",
    "Economics",
];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Andrei", "Anna", "Boris", "Carmen", "Daniel", "Diana", "Elena", "Erik", "Fiona",
    "Gabriel", "Hanna", "Igor", "Ines", "Jakob", "Katya", "Leon", "Marta", "Niko", "Olga",
    "Pavel", "Rosa", "Stefan", "Tamara", "Viktor", "Yana",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Bennett", "Castillo", "Dvorak", "Eriksen", "Fischer", "Garcia", "Haas", "Ivanov",
    "Jensen", "Kovacs", "Lindqvist", "Moreau", "Novak", "Olsen", "Petrov", "Quinn", "Rossi",
    "Schmidt", "Tanaka", "Ustinov", "Vasquez", "Weber", "Zimmermann",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "university.edu"];

/// How many of each entity a seeding run should produce.
///
/// Count ranges are inclusive on both ends; the seeder picks a uniform
/// count within each range. Deserializable so a whole bundle can be loaded
/// from a JSON file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub groups: usize,
    pub teachers: (usize, usize),
    pub subjects: (usize, usize),
    pub students: (usize, usize),
    pub grades_per_student: (usize, usize),
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            groups: 3,
            teachers: (3, 5),
            subjects: (5, 8),
            students: (30, 50),
            grades_per_student: (5, 20),
        }
    }
}

impl SeedConfig {
    /// Reject parameter bundles the pipeline cannot satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.groups == 0 {
            return Err(Error::Configuration(
                "group count must be at least 1".to_string(),
            ));
        }

        // Each step draws references from the previous one, so every count
        // bottoms out at one.
        for (label, (min, max)) in [
            ("teachers", self.teachers),
            ("subjects", self.subjects),
            ("students", self.students),
            ("grades_per_student", self.grades_per_student),
        ] {
            if min > max {
                return Err(Error::Configuration(format!(
                    "{} range has min {} above max {}",
                    label, min, max
                )));
            }
            if min == 0 {
                return Err(Error::Configuration(format!(
                    "{} count must be at least 1",
                    label
                )));
            }
        }

        if self.subjects.1 > SUBJECT_POOL.len() {
            return Err(Error::Configuration(format!(
                "cannot draw up to {} subjects from a pool of {}",
                self.subjects.1,
                SUBJECT_POOL.len()
            )));
        }

        Ok(())
    }
}

/// Outcome summary of a seeding run.
#[derive(Debug, Clone, Copy)]
pub struct SeedReport {
    pub groups: usize,
    pub teachers: usize,
    pub subjects: usize,
    pub students: usize,
    pub grades: usize,
    pub elapsed: Duration,
}

pub struct Seeder {
    config: SeedConfig,
    rng: StdRng,
    used_emails: HashSet<String>,
}

impl Seeder {
    /// Seeder with OS-sourced randomness.
    pub fn new(config: SeedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::from_entropy(),
            used_emails: HashSet::new(),
        })
    }

    /// Seeder with a fixed RNG seed for reproducible datasets.
    pub fn with_seed(config: SeedConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            used_emails: HashSet::new(),
        })
    }

    /// Purge and repopulate the database as a single transaction.
    ///
    /// Entities are generated in dependency order since each step references
    /// ids produced by the previous one. Any failure rolls the whole run
    /// back, leaving the prior contents untouched.
    pub fn run(&mut self, store: &mut Store) -> Result<SeedReport> {
        info!("starting seeding run");
        let start = Instant::now();

        let tx = store.transaction()?;

        store::purge_all(&tx)?;
        let groups = self.generate_groups(&tx)?;
        let teachers = self.generate_teachers(&tx)?;
        let subjects = self.generate_subjects(&tx, &teachers)?;
        let students = self.generate_students(&tx, &groups)?;
        let grades = self.generate_grades(&tx, &students, &subjects)?;

        tx.commit()?;

        let report = SeedReport {
            groups: groups.len(),
            teachers: teachers.len(),
            subjects: subjects.len(),
            students: students.len(),
            grades,
            elapsed: start.elapsed(),
        };

        info!(
            groups = report.groups,
            teachers = report.teachers,
            subjects = report.subjects,
            students = report.students,
            grades = report.grades,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "seeding completed"
        );

        Ok(report)
    }

    fn generate_groups(&mut self, conn: &Connection) -> Result<Vec<Group>> {
        info!(count = self.config.groups, "generating groups");

        let mut groups = Vec::with_capacity(self.config.groups);
        for idx in 1..=self.config.groups {
            let name = format!("Group {}", idx);
            let id = store::insert_group(conn, &name)?;
            groups.push(Group { id, name });
        }

        Ok(groups)
    }

    fn generate_teachers(&mut self, conn: &Connection) -> Result<Vec<Teacher>> {
        let (min, max) = self.config.teachers;
        let count = self.rng.gen_range(min..=max);
        info!(count, "generating teachers");

        let mut teachers = Vec::with_capacity(count);
        for _ in 0..count {
            let name = self.random_name();
            let email = self.unique_email(&name);
            let id = store::insert_teacher(conn, &name, &email)?;
            teachers.push(Teacher { id, name, email });
        }

        Ok(teachers)
    }

    fn generate_subjects(
        &mut self,
        conn: &Connection,
        teachers: &[Teacher],
    ) -> Result<Vec<Subject>> {
        let (min, max) = self.config.subjects;
        let count = self.rng.gen_range(min..=max);
        info!(count, "generating subjects");

        // Sample without replacement from the fixed pool.
        let mut pool: Vec<&str> = SUBJECT_POOL.to_vec();
        pool.shuffle(&mut self.rng);
        pool.truncate(count);

        let mut subjects = Vec::with_capacity(count);
        for name in pool {
            let teacher = &teachers[self.rng.gen_range(0..teachers.len())];
            let id = store::insert_subject(conn, name, teacher.id)?;
            subjects.push(Subject {
                id,
                name: name.to_string(),
                teacher_id: teacher.id,
            });
        }

        Ok(subjects)
    }

    fn generate_students(&mut self, conn: &Connection, groups: &[Group]) -> Result<Vec<Student>> {
        let (min, max) = self.config.students;
        let count = self.rng.gen_range(min..=max);
        info!(count, "generating students");

        let mut students = Vec::with_capacity(count);
        for _ in 0..count {
            let name = self.random_name();
            let email = self.unique_email(&name);
            let group = &groups[self.rng.gen_range(0..groups.len())];
            let id = store::insert_student(conn, &name, &email, group.id)?;
            students.push(Student {
                id,
                name,
                email,
                group_id: group.id,
            });
        }

        Ok(students)
    }

    fn generate_grades(
        &mut self,
        conn: &Connection,
        students: &[Student],
        subjects: &[Subject],
    ) -> Result<usize> {
        info!("generating grades");

        let now = Utc::now();
        let mut total = 0;

        for student in students {
            let (min, max) = self.config.grades_per_student;
            let count = self.rng.gen_range(min..=max);

            for _ in 0..count {
                let value = self.rng.gen_range(1..=100);
                let subject = &subjects[self.rng.gen_range(0..subjects.len())];

                // Uniform within the past 365 days.
                let age = chrono::Duration::seconds(self.rng.gen_range(0..365 * 24 * 60 * 60));
                let created_at = now - age;

                store::insert_grade(conn, student.id, subject.id, value, created_at)?;
                total += 1;
            }
        }

        debug!(total, "grade records created");
        Ok(total)
    }

    fn random_name(&mut self) -> String {
        let first = FIRST_NAMES[self.rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[self.rng.gen_range(0..LAST_NAMES.len())];
        format!("{} {}", first, last)
    }

    /// Produce an email no previous call in this run has produced.
    ///
    /// Collisions regenerate the numeric suffix until an unused address
    /// comes up, so uniqueness holds run-wide, not merely per call.
    fn unique_email(&mut self, name: &str) -> String {
        let base: String = name
            .to_lowercase()
            .replace(' ', ".")
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
            .collect();

        loop {
            let number: u32 = self.rng.gen_range(1..100_000);
            let domain = EMAIL_DOMAINS[self.rng.gen_range(0..EMAIL_DOMAINS.len())];
            let candidate = format!("{}{}@{}", base, number, domain);

            if self.used_emails.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SeedConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = SeedConfig {
            students: (50, 30),
            ..SeedConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn subject_pool_exhaustion_is_rejected() {
        let config = SeedConfig {
            subjects: (5, SUBJECT_POOL.len() + 1),
            ..SeedConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn zero_groups_is_rejected() {
        let config = SeedConfig {
            groups: 0,
            ..SeedConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn zero_minimums_are_rejected_for_every_count() {
        let configs = [
            SeedConfig {
                teachers: (0, 2),
                ..SeedConfig::default()
            },
            SeedConfig {
                subjects: (0, 3),
                ..SeedConfig::default()
            },
            SeedConfig {
                students: (0, 0),
                ..SeedConfig::default()
            },
            SeedConfig {
                grades_per_student: (0, 4),
                ..SeedConfig::default()
            },
        ];

        for config in configs {
            assert!(
                matches!(config.validate(), Err(Error::Configuration(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SeedConfig = serde_json::from_str(r#"{"groups": 7}"#).unwrap();
        assert_eq!(config.groups, 7);
        assert_eq!(config.teachers, (3, 5));
        assert_eq!(config.grades_per_student, (5, 20));
    }

    #[test]
    fn emails_are_unique_across_a_run() {
        let mut seeder = Seeder::with_seed(SeedConfig::default(), 7).unwrap();

        // Far more draws than distinct names, forcing suffix collisions.
        let mut seen = HashSet::new();
        for _ in 0..2_000 {
            let name = seeder.random_name();
            let email = seeder.unique_email(&name);
            assert!(seen.insert(email));
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = Seeder::with_seed(SeedConfig::default(), 42).unwrap();
        let mut b = Seeder::with_seed(SeedConfig::default(), 42).unwrap();
        assert_eq!(a.random_name(), b.random_name());
    }
}
