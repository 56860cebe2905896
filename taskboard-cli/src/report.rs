/// Query demonstration report
///
/// Runs the catalog operations in a fixed order against a seeded database
/// and collects one section per step. Steps that depend on an earlier result
/// (moving the first `new` task, adding a task for the first task-less user,
/// deleting the first incomplete task) record a note instead when that
/// result is empty.
///
/// The report mutates the database. Running it twice gives different output.
///
/// # Example
///
/// ```no_run
/// use taskboard_cli::report::{run_report, ReportOptions};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> taskboard_shared::Result<()> {
/// let report = run_report(&pool, &ReportOptions::default()).await?;
/// std::fs::write("output.txt", report.render())?;
/// # Ok(())
/// # }
/// ```

use crate::table::{optional, Table, TableRow};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use taskboard_shared::models::{
    NewTask, StatusTaskCount, TaskStatus, TaskSummary, TaskWithOwner, TaskWithStatus, User,
    UserTaskCount, UserTaskInProgress,
};
use taskboard_shared::{queries, Result};
use tracing::info;

const TASK_HEADERS: [&str; 4] = ["Task ID", "Title", "Description", "Status"];
const USER_HEADERS: [&str; 3] = ["User ID", "Fullname", "Email"];

/// Inputs for the parameterized steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// User whose tasks are listed first and who gets renamed
    pub user_id: i32,

    pub email_pattern: String,

    pub email_domain: String,

    pub new_fullname: String,

    pub added_task_title: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            user_id: 1,
            email_pattern: "%@example.com%".to_string(),
            email_domain: "@example.com".to_string(),
            new_fullname: "John Doe".to_string(),
            added_task_title: "Another Task".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub notes: Vec<String>,
    pub table: Option<Table>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: Vec::new(),
            table: None,
        }
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    fn render(&self, index: usize) -> String {
        let mut out = format!("{index}. {}\n\n", self.title);
        for note in &self.notes {
            out.push_str(note);
            out.push('\n');
        }
        if let Some(table) = &self.table {
            if !self.notes.is_empty() {
                out.push('\n');
            }
            out.push_str(&table.render());
        }
        out
    }
}

/// A finished report
#[derive(Debug, Clone)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Task board report\nGenerated at {}\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for (i, section) in self.sections.iter().enumerate() {
            out.push('\n');
            out.push_str(&section.render(i + 1));
        }
        out
    }
}

impl TableRow for TaskWithStatus {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            optional(self.description.as_deref()),
            self.status.clone(),
        ]
    }
}

impl TableRow for User {
    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.fullname.clone(), self.email.clone()]
    }
}

impl TableRow for StatusTaskCount {
    fn cells(&self) -> Vec<String> {
        vec![self.status.clone(), self.task_count.to_string()]
    }
}

impl TableRow for TaskWithOwner {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            optional(self.description.as_deref()),
            self.fullname.clone(),
            self.email.clone(),
            self.status.clone(),
        ]
    }
}

impl TableRow for TaskSummary {
    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.user_id.to_string(),
            self.status_id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl TableRow for UserTaskInProgress {
    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.fullname.clone(),
            self.task_id.to_string(),
            self.title.clone(),
            optional(self.description.as_deref()),
            self.status.clone(),
        ]
    }
}

impl TableRow for UserTaskCount {
    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.fullname.clone(),
            self.email.clone(),
            self.task_count.to_string(),
        ]
    }
}

fn task_table(tasks: &[TaskWithStatus]) -> Table {
    Table::from_rows(&TASK_HEADERS, tasks)
}

/// Runs every step in order
///
/// # Errors
///
/// Stops at the first database error. Sections already collected are lost
/// with it; nothing is written partially.
pub async fn run_report(pool: &PgPool, options: &ReportOptions) -> Result<Report> {
    let mut report = Report::new(Utc::now());
    let new = TaskStatus::New.as_str();
    let in_progress = TaskStatus::InProgress.as_str();

    // 1
    let tasks = queries::tasks_for_user(pool, options.user_id).await?;
    report.push(Section::new(format!("Tasks for user {}", options.user_id)).table(task_table(&tasks)));

    // 2
    let new_tasks = queries::tasks_by_status(pool, new).await?;
    report.push(Section::new(format!("Tasks with status '{new}'")).table(task_table(&new_tasks)));

    // 3
    let section = Section::new(format!("Move the first '{new}' task to '{in_progress}'"));
    let section = match new_tasks.first() {
        Some(task) => {
            let updated = queries::update_task_status(pool, task.id, in_progress).await?;
            if updated {
                section.note(format!("Task {} is now '{in_progress}'", task.id))
            } else {
                section.note(format!("Task {} was not updated", task.id))
            }
        }
        None => section.note(format!("No tasks with status '{new}'")),
    };
    report.push(section);

    // 4
    let idle_users = queries::users_without_tasks(pool).await?;
    report.push(Section::new("Users without tasks").table(Table::from_rows(&USER_HEADERS, &idle_users)));

    // 5
    let section = Section::new(format!("Add '{}' for the first user without tasks", options.added_task_title));
    let section = match idle_users.first() {
        Some(user) => {
            let task = NewTask {
                title: options.added_task_title.clone(),
                description: None,
                status: in_progress.to_string(),
                user_id: user.id,
            };
            let note = match queries::add_task(pool, &task).await? {
                Some(id) => format!("Added task {id} for user {}", user.id),
                None => format!("Status '{in_progress}' is missing, nothing added"),
            };
            let tasks = queries::tasks_for_user(pool, user.id).await?;
            section.note(note).table(task_table(&tasks))
        }
        None => section.note("Every user has at least one task"),
    };
    report.push(section);

    // 6
    let incomplete = queries::incomplete_tasks(pool).await?;
    report.push(Section::new("Incomplete tasks").table(task_table(&incomplete)));

    // 7
    let section = Section::new("Delete the first incomplete task");
    let section = match incomplete.first() {
        Some(task) => {
            let owner = queries::user_for_task(pool, task.id).await?;
            let deleted = queries::delete_task(pool, task.id).await?;
            let section = section.note(if deleted {
                format!("Deleted task {}", task.id)
            } else {
                format!("Task {} was already gone", task.id)
            });
            match owner {
                Some(owner) => {
                    let remaining = queries::tasks_for_user(pool, owner.id).await?;
                    section
                        .note(format!("Remaining tasks for {} (user {})", owner.fullname, owner.id))
                        .table(task_table(&remaining))
                }
                None => section,
            }
        }
        None => section.note("No incomplete tasks"),
    };
    report.push(section);

    // 8
    let matching = queries::users_by_email_pattern(pool, &options.email_pattern).await?;
    report.push(
        Section::new(format!("Users with email like '{}'", options.email_pattern))
            .table(Table::from_rows(&USER_HEADERS, &matching)),
    );

    // 9
    let renamed = queries::update_user_fullname(pool, options.user_id, &options.new_fullname).await?;
    let note = if renamed {
        format!("User {} is now '{}'", options.user_id, options.new_fullname)
    } else {
        format!("User {} not found", options.user_id)
    };
    report.push(Section::new(format!("Rename user {}", options.user_id)).note(note));

    // 10
    let counts = queries::task_count_by_status(pool).await?;
    report.push(Section::new("Task count by status").table(Table::from_rows(&["Status", "Task Count"], &counts)));

    // 11
    let domain_tasks = queries::tasks_for_email_domain(pool, &options.email_domain).await?;
    report.push(
        Section::new(format!("Tasks for users with email domain '{}'", options.email_domain)).table(
            Table::from_rows(
                &["Task ID", "Title", "Description", "Fullname", "Email", "Status"],
                &domain_tasks,
            ),
        ),
    );

    // 12
    let bare = queries::tasks_without_description(pool).await?;
    report.push(
        Section::new("Tasks without description")
            .table(Table::from_rows(&["Task ID", "Title", "User ID", "Status ID"], &bare)),
    );

    // 13
    let busy = queries::users_with_in_progress_tasks(pool).await?;
    report.push(
        Section::new(format!("Users with '{in_progress}' tasks")).table(Table::from_rows(
            &["User ID", "Fullname", "Task ID", "Title", "Description", "Status"],
            &busy,
        )),
    );

    // 14
    let totals = queries::users_and_task_count(pool).await?;
    report.push(
        Section::new("Users and their task count")
            .table(Table::from_rows(&["User ID", "Fullname", "Email", "Task Count"], &totals)),
    );

    info!(sections = report.sections.len(), "Report complete");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_default_options() {
        let options = ReportOptions::default();
        assert_eq!(options.user_id, 1);
        assert_eq!(options.email_pattern, "%@example.com%");
        assert_eq!(options.email_domain, "@example.com");
        assert_eq!(options.new_fullname, "John Doe");
    }

    #[test]
    fn test_render_numbers_sections() {
        let mut report = Report::new(fixed_time());
        report.push(Section::new("First").note("just a note"));
        report.push(Section::new("Second").table(Table::new(&["A"])));

        let text = report.render();
        assert!(text.starts_with("Task board report\nGenerated at 2024-03-01 12:30:00 UTC\n"));
        assert!(text.contains("1. First\n\njust a note\n"));
        assert!(text.contains("2. Second\n\nA\n-\n(no rows)\n"));
    }

    #[test]
    fn test_task_row_shows_missing_description() {
        let task = TaskWithStatus {
            id: 3,
            title: "Write report".to_string(),
            description: None,
            status: "new".to_string(),
        };
        assert_eq!(task.cells(), vec!["3", "Write report", "-", "new"]);
    }

    #[test]
    fn test_summary_row_shows_missing_status() {
        let task = TaskSummary {
            id: 4,
            title: "Orphan".to_string(),
            user_id: 2,
            status_id: None,
        };
        assert_eq!(task.cells(), vec!["4", "Orphan", "2", "-"]);
    }
}
