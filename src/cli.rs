use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version, about = "University academic records: seeding and analytics on SQLite")]
pub struct Cli {
    /// SQLite database path
    #[arg(
        short,
        long,
        global = true,
        env = "GRADEBOOK_DB",
        default_value = "gradebook.db"
    )]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create any missing tables and indexes
    Init,

    /// Purge the database and repopulate it with synthetic records
    Seed {
        /// Number of student groups
        #[arg(long, default_value_t = 3)]
        groups: usize,

        /// Teacher count range, e.g. "3..5" or a single number
        #[arg(long, value_parser = parse_range, default_value = "3..5")]
        teachers: (usize, usize),

        /// Subject count range (drawn from a pool of 10 names)
        #[arg(long, value_parser = parse_range, default_value = "5..8")]
        subjects: (usize, usize),

        /// Student count range
        #[arg(long, value_parser = parse_range, default_value = "30..50")]
        students: (usize, usize),

        /// Grades-per-student range
        #[arg(long, value_parser = parse_range, default_value = "5..20")]
        grades: (usize, usize),

        /// Load the full parameter bundle from a JSON file instead
        /// (overrides the count flags)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Top five students by average grade
    TopStudents,

    /// Best-performing student in one subject
    BestInSubject { subject: String },

    /// Average grade per group in one subject
    GroupAverage { subject: String },

    /// Average of every grade in the database
    OverallAverage,

    /// Subjects taught by a teacher
    TeacherCourses { teacher: String },

    /// Students enrolled in a group
    GroupStudents { group: String },

    /// Every individual grade in a group for one subject
    GroupGrades { group: String, subject: String },

    /// Average grade across all of a teacher's subjects
    TeacherAverage { teacher: String },

    /// Subjects a student has at least one grade in
    StudentCourses { student: String },

    /// Subjects a student takes from one teacher
    StudentTeacherCourses { student: String, teacher: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Parse "MIN..MAX" (inclusive) or a bare "N" as the range (N, N).
fn parse_range(s: &str) -> Result<(usize, usize), String> {
    if let Some((min, max)) = s.split_once("..") {
        let min = min
            .trim()
            .parse()
            .map_err(|_| format!("invalid range minimum: {:?}", min))?;
        let max = max
            .trim()
            .parse()
            .map_err(|_| format!("invalid range maximum: {:?}", max))?;
        Ok((min, max))
    } else {
        let n = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid count: {:?}", s))?;
        Ok((n, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_min_max_range() {
        assert_eq!(parse_range("3..5"), Ok((3, 5)));
        assert_eq!(parse_range(" 10 .. 20 "), Ok((10, 20)));
    }

    #[test]
    fn parses_single_count_as_degenerate_range() {
        assert_eq!(parse_range("4"), Ok((4, 4)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_range("three..five").is_err());
        assert!(parse_range("").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
