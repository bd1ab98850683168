use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use tracing_subscriber::EnvFilter;

use gradebook::{
    cli::{Cli, Commands},
    model::{GradeRecord, GroupAverage, StudentAverage, StudentRef, SubjectRef},
    queries, schema, SeedConfig, Seeder, Store,
};

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse_args();
    let mut store =
        Store::open(&cli.db).with_context(|| format!("failed to open database {:?}", cli.db))?;

    match cli.command {
        Commands::Init => {
            store.init_schema()?;
            println!(
                "Schema ready in {:?} ({})",
                cli.db,
                schema::table_names().join(", ")
            );
        }

        Commands::Seed {
            groups,
            teachers,
            subjects,
            students,
            grades,
            config,
            seed,
        } => {
            store.init_schema()?;

            let config = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read {:?}", path))?;
                    serde_json::from_str(&text)
                        .with_context(|| format!("invalid seed config in {:?}", path))?
                }
                None => SeedConfig {
                    groups,
                    teachers,
                    subjects,
                    students,
                    grades_per_student: grades,
                },
            };

            let mut seeder = match seed {
                Some(seed) => Seeder::with_seed(config, seed)?,
                None => Seeder::new(config)?,
            };

            let report = seeder.run(&mut store)?;
            println!(
                "Seeded {} groups, {} teachers, {} subjects, {} students, {} grades in {:.2}s",
                report.groups,
                report.teachers,
                report.subjects,
                report.students,
                report.grades,
                report.elapsed.as_secs_f64()
            );
        }

        Commands::TopStudents => {
            print_student_averages(&queries::top_students(&store)?);
        }

        Commands::BestInSubject { subject } => match queries::best_in_subject(&store, &subject)? {
            Some(row) => print_student_averages(std::slice::from_ref(&row)),
            None => println!("No results"),
        },

        Commands::GroupAverage { subject } => {
            print_group_averages(&queries::group_average_in_subject(&store, &subject)?);
        }

        Commands::OverallAverage => {
            print_average("Overall average", queries::overall_average(&store)?);
        }

        Commands::TeacherCourses { teacher } => {
            print_subjects(&queries::teacher_courses(&store, &teacher)?);
        }

        Commands::GroupStudents { group } => {
            print_students(&queries::group_students(&store, &group)?);
        }

        Commands::GroupGrades { group, subject } => {
            print_grade_records(&queries::group_subject_grades(&store, &group, &subject)?);
        }

        Commands::TeacherAverage { teacher } => {
            print_average("Teacher average", queries::teacher_average(&store, &teacher)?);
        }

        Commands::StudentCourses { student } => {
            print_subjects(&queries::student_courses(&store, &student)?);
        }

        Commands::StudentTeacherCourses { student, teacher } => {
            print_subjects(&queries::student_teacher_courses(&store, &student, &teacher)?);
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Result rendering
// =============================================================================

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(headers.iter().map(Cell::new));
    table
}

fn print_student_averages(rows: &[StudentAverage]) {
    if rows.is_empty() {
        println!("No results");
        return;
    }

    let mut table = new_table(&["ID", "Student", "Email", "Average"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.student_id),
            Cell::new(&row.name),
            Cell::new(&row.email),
            Cell::new(format!("{:.2}", row.avg_grade)),
        ]);
    }
    println!("{table}");
}

fn print_group_averages(rows: &[GroupAverage]) {
    if rows.is_empty() {
        println!("No results");
        return;
    }

    let mut table = new_table(&["ID", "Group", "Average"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.group_id),
            Cell::new(&row.name),
            Cell::new(format!("{:.2}", row.avg_grade)),
        ]);
    }
    println!("{table}");
}

fn print_subjects(rows: &[SubjectRef]) {
    if rows.is_empty() {
        println!("No results");
        return;
    }

    let mut table = new_table(&["ID", "Subject"]);
    for row in rows {
        table.add_row(vec![Cell::new(row.subject_id), Cell::new(&row.name)]);
    }
    println!("{table}");
}

fn print_students(rows: &[StudentRef]) {
    if rows.is_empty() {
        println!("No results");
        return;
    }

    let mut table = new_table(&["ID", "Student", "Email"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.student_id),
            Cell::new(&row.name),
            Cell::new(&row.email),
        ]);
    }
    println!("{table}");
}

fn print_grade_records(rows: &[GradeRecord]) {
    if rows.is_empty() {
        println!("No results");
        return;
    }

    let mut table = new_table(&["ID", "Student", "Grade", "Recorded"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.student_id),
            Cell::new(&row.student_name),
            Cell::new(row.value),
            Cell::new(row.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    println!("{table}");
}

fn print_average(label: &str, avg: Option<f64>) {
    match avg {
        Some(value) => println!("{}: {:.2}", label, value),
        None => println!("{}: no grades recorded", label),
    }
}
