/// Synthetic data seeder
///
/// Generates fake users and tasks and inserts them into an initialized
/// schema. Users are inserted in one transaction, tasks in a second one;
/// a failure rolls back the batch in progress and nothing is retried.
///
/// # Task assignment
///
/// By default the user with the lowest id never receives a seeded task
/// ([`TaskAssignment::ExcludeFirstUser`]), which guarantees the
/// users-without-tasks query has at least one row to show.
/// [`TaskAssignment::AllUsers`] spreads tasks uniformly over everyone.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::seed::{seed_database, SeedConfig};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> taskboard_shared::Result<()> {
/// let report = seed_database(&pool, &SeedConfig::default()).await?;
/// println!("{} users, {} tasks", report.users, report.tasks);
/// # Ok(())
/// # }
/// ```

use crate::error::{Error, Result};
use crate::models::{CreateTask, CreateUser, Status, Task, User};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::{debug, info};

pub const DEFAULT_USERS: usize = 20;
pub const DEFAULT_TASKS: usize = 50;

/// Longest generated description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Attempts at drawing a fresh email before giving up
const MAX_EMAIL_ATTEMPTS: usize = 1000;

/// Which users seeded tasks may be assigned to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAssignment {
    /// Skip the user with the lowest id, leaving them without tasks
    #[default]
    ExcludeFirstUser,

    /// Uniform over every user
    AllUsers,
}

impl TaskAssignment {
    /// Narrows a list of user ids sorted ascending to the assignable ones
    pub fn eligible<'a>(&self, sorted_user_ids: &'a [i32]) -> &'a [i32] {
        match self {
            TaskAssignment::ExcludeFirstUser => {
                &sorted_user_ids[sorted_user_ids.len().min(1)..]
            }
            TaskAssignment::AllUsers => sorted_user_ids,
        }
    }
}

/// Seeder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub users: usize,

    pub tasks: usize,

    pub assignment: TaskAssignment,

    /// Fixed RNG seed for reproducible data; None draws from OS entropy
    pub rng_seed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: DEFAULT_USERS,
            tasks: DEFAULT_TASKS,
            assignment: TaskAssignment::default(),
            rng_seed: None,
        }
    }
}

/// Rows inserted by a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub users: usize,
    pub tasks: usize,
}

/// Fake data source
///
/// Emails are unique across everything this generator has produced.
pub struct Generator<R: Rng> {
    rng: R,
    issued_emails: HashSet<String>,
}

impl Generator<StdRng> {
    /// Generator over `StdRng`, seeded when `seed` is given
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            issued_emails: HashSet::new(),
        }
    }

    /// A user with a fake name and a not-yet-issued email
    ///
    /// # Errors
    ///
    /// Returns `Error::Seed` if no fresh email turns up after many draws.
    pub fn user(&mut self) -> Result<CreateUser> {
        let fullname: String = Name().fake_with_rng(&mut self.rng);

        for _ in 0..MAX_EMAIL_ATTEMPTS {
            let email: String = SafeEmail().fake_with_rng(&mut self.rng);
            if self.issued_emails.insert(email.clone()) {
                return Ok(CreateUser { fullname, email });
            }
        }

        Err(Error::Seed(format!(
            "could not generate a unique email after {MAX_EMAIL_ATTEMPTS} attempts"
        )))
    }

    /// A task with a random status and owner, or None if either list is empty
    pub fn task(&mut self, status_ids: &[i32], user_ids: &[i32]) -> Option<CreateTask> {
        let status_id = *status_ids.choose(&mut self.rng)?;
        let user_id = *user_ids.choose(&mut self.rng)?;

        let title: String = Sentence(6..7).fake_with_rng(&mut self.rng);
        let text: String = Paragraph(1..3).fake_with_rng(&mut self.rng);

        Some(CreateTask {
            title,
            description: Some(truncate_chars(&text, MAX_DESCRIPTION_CHARS)),
            status_id,
            user_id,
        })
    }
}

/// Cuts `text` to at most `max` characters, trimming trailing whitespace
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

/// Inserts `count` fake users in one transaction
pub async fn seed_users<R: Rng>(
    pool: &PgPool,
    generator: &mut Generator<R>,
    count: usize,
) -> Result<Vec<User>> {
    info!(count, "Seeding users");

    let mut tx = pool.begin().await?;
    let mut users = Vec::with_capacity(count);

    for _ in 0..count {
        let data = generator.user()?;
        let user = User::create(&mut *tx, &data).await?;
        debug!(user_id = user.id, "Seeded user");
        users.push(user);
    }

    tx.commit().await?;
    Ok(users)
}

/// Inserts `count` fake tasks in one transaction
///
/// Owners and statuses are drawn from the rows present when the transaction
/// starts.
///
/// # Errors
///
/// Returns `Error::Seed` when there are no statuses or no eligible users and
/// `count` is non-zero.
pub async fn seed_tasks<R: Rng>(
    pool: &PgPool,
    generator: &mut Generator<R>,
    count: usize,
    assignment: TaskAssignment,
) -> Result<Vec<Task>> {
    info!(count, ?assignment, "Seeding tasks");

    let mut tx = pool.begin().await?;

    let user_ids = User::list_ids(&mut *tx).await?;
    let status_ids = Status::list_ids(&mut *tx).await?;

    let eligible = assignment.eligible(&user_ids);
    let mut tasks = Vec::with_capacity(count);

    for _ in 0..count {
        let data = generator.task(&status_ids, eligible).ok_or_else(|| {
            Error::Seed(format!(
                "cannot assign tasks: {} statuses, {} eligible users",
                status_ids.len(),
                eligible.len()
            ))
        })?;
        let task = Task::create(&mut *tx, &data).await?;
        tasks.push(task);
    }

    tx.commit().await?;
    Ok(tasks)
}

/// Seeds users then tasks according to `config`
pub async fn seed_database(pool: &PgPool, config: &SeedConfig) -> Result<SeedReport> {
    let mut generator = Generator::from_seed(config.rng_seed);

    let users = seed_users(pool, &mut generator, config.users).await?;
    let tasks = seed_tasks(pool, &mut generator, config.tasks, config.assignment).await?;

    let report = SeedReport {
        users: users.len(),
        tasks: tasks.len(),
    };
    info!(users = report.users, tasks = report.tasks, "Seeding complete");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_seed_config_defaults() {
        let config = SeedConfig::default();
        assert_eq!(config.users, 20);
        assert_eq!(config.tasks, 50);
        assert_eq!(config.assignment, TaskAssignment::ExcludeFirstUser);
        assert!(config.rng_seed.is_none());
    }

    #[test]
    fn test_exclude_first_user() {
        let ids = [3, 5, 8];
        assert_eq!(TaskAssignment::ExcludeFirstUser.eligible(&ids), &[5, 8]);
        assert_eq!(TaskAssignment::AllUsers.eligible(&ids), &[3, 5, 8]);

        assert!(TaskAssignment::ExcludeFirstUser.eligible(&[1]).is_empty());
        assert!(TaskAssignment::ExcludeFirstUser.eligible(&[]).is_empty());
    }

    #[test]
    fn test_generated_users_are_valid_and_unique() {
        let mut generator = Generator::from_seed(Some(7));
        let mut emails = HashSet::new();

        for _ in 0..200 {
            let user = generator.user().unwrap();
            assert!(user.validate().is_ok(), "invalid user: {user:?}");
            assert!(emails.insert(user.email));
        }
    }

    #[test]
    fn test_generated_tasks_use_given_ids() {
        let mut generator = Generator::from_seed(Some(11));
        let statuses = [1, 2, 3];
        let users = [10, 20];

        for _ in 0..100 {
            let task = generator.task(&statuses, &users).unwrap();
            assert!(statuses.contains(&task.status_id));
            assert!(users.contains(&task.user_id));
            assert!(task.validate().is_ok(), "invalid task: {task:?}");

            let description = task.description.unwrap();
            assert!(description.chars().count() <= MAX_DESCRIPTION_CHARS);
        }
    }

    #[test]
    fn test_task_requires_statuses_and_users() {
        let mut generator = Generator::from_seed(Some(1));
        assert!(generator.task(&[], &[1]).is_none());
        assert!(generator.task(&[1], &[]).is_none());
    }

    #[test]
    fn test_same_seed_same_data() {
        let mut a = Generator::from_seed(Some(42));
        let mut b = Generator::from_seed(Some(42));

        assert_eq!(a.user().unwrap().email, b.user().unwrap().email);
        assert_eq!(
            a.task(&[1, 2, 3], &[1, 2]).unwrap().title,
            b.task(&[1, 2, 3], &[1, 2]).unwrap().title
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 200), "short");
        assert_eq!(truncate_chars("abc def", 4), "abc");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
