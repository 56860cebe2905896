/// Cats CRUD walkthrough
///
/// Creates five cats, reads them back, updates barsik, deletes barsik and
/// then everyone else, listing the collection in between. A failing step is
/// logged with its operation prefix and the walkthrough moves on, so one
/// bad call never hides the rest.

use serde::Serialize;
use std::io::Write;
use taskboard_cats::{Cat, CatResult, CatStore, NewCat};
use tracing::{info, warn};

/// Cat the walkthrough reads, updates and deletes
pub const FEATURED_CAT: &str = "barsik";

pub const FEATURED_NEW_AGE: i32 = 4;

pub const FEATURED_NEW_FEATURE: &str = "loves cardboard boxes";

/// The five cats created at the start
pub fn starter_cats() -> Vec<NewCat> {
    vec![
        NewCat::new("barsik", 3, ["wears slippers", "lets you pet him", "ginger"]),
        NewCat::new("murzik", 2, ["loves sleeping", "plays with a ball", "grey"]),
        NewCat::new("pushok", 1, ["plays with a string", "straight-eared", "black"]),
        NewCat::new("murka", 4, ["loves milk", "plays with yarn", "white"]),
        NewCat::new("bayun", 5, ["loves fish", "hunts mice", "grey"]),
    ]
}

/// Step outcomes, for callers that want more than the printed output
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl DemoSummary {
    fn record<T>(&mut self, operation: &str, result: CatResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                self.failed += 1;
                warn!(error = %e, "{operation} failed");
                None
            }
        }
    }
}

/// Runs the walkthrough, printing each result to `out`
///
/// # Errors
///
/// Only write failures on `out` are returned; store failures are logged and
/// counted in the summary.
pub async fn run_demo<W: Write + Send>(store: &dyn CatStore, out: &mut W) -> std::io::Result<DemoSummary> {
    let mut summary = DemoSummary::default();
    info!(store = store.name(), "Starting cats walkthrough");

    writeln!(out, "== Create ==")?;
    for cat in starter_cats() {
        let name = cat.name.clone();
        if let Some(id) = summary.record("create", store.create(cat).await) {
            writeln!(out, "Created {name} with id {id}")?;
        }
    }

    list_all(store, out, &mut summary).await?;

    writeln!(out, "\n== Read {FEATURED_CAT} ==")?;
    show_cat(store, out, &mut summary).await?;

    writeln!(out, "\n== Update {FEATURED_CAT}'s age to {FEATURED_NEW_AGE} ==")?;
    if let Some(matched) = summary.record("update_age", store.update_age(FEATURED_CAT, FEATURED_NEW_AGE).await) {
        if !matched {
            writeln!(out, "No cat named {FEATURED_CAT}")?;
        }
    }
    show_cat(store, out, &mut summary).await?;

    writeln!(out, "\n== Add feature to {FEATURED_CAT} ==")?;
    if let Some(matched) = summary.record(
        "add_feature",
        store.add_feature(FEATURED_CAT, FEATURED_NEW_FEATURE).await,
    ) {
        if !matched {
            writeln!(out, "No cat named {FEATURED_CAT}")?;
        }
    }
    show_cat(store, out, &mut summary).await?;

    writeln!(out, "\n== Delete {FEATURED_CAT} ==")?;
    if let Some(deleted) = summary.record("delete_by_name", store.delete_by_name(FEATURED_CAT).await) {
        writeln!(out, "Deleted {deleted} cat(s)")?;
    }
    list_all(store, out, &mut summary).await?;

    writeln!(out, "\n== Delete all ==")?;
    if let Some(deleted) = summary.record("delete_all", store.delete_all().await) {
        writeln!(out, "Deleted {deleted} cat(s)")?;
    }
    list_all(store, out, &mut summary).await?;

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Cats walkthrough finished"
    );
    Ok(summary)
}

async fn list_all<W: Write + Send>(
    store: &dyn CatStore,
    out: &mut W,
    summary: &mut DemoSummary,
) -> std::io::Result<()> {
    writeln!(out, "\n== All cats ==")?;
    match summary.record("count", store.count().await) {
        Some(0) => writeln!(out, "No cats found")?,
        Some(n) => writeln!(out, "Found {n} cats")?,
        None => {}
    }

    let Some(cats) = summary.record("find_all", store.find_all().await) else {
        return Ok(());
    };
    for cat in &cats {
        print_cat(out, cat)?;
    }
    Ok(())
}

async fn show_cat<W: Write + Send>(
    store: &dyn CatStore,
    out: &mut W,
    summary: &mut DemoSummary,
) -> std::io::Result<()> {
    match summary.record("find_by_name", store.find_by_name(FEATURED_CAT).await) {
        Some(Some(cat)) => print_cat(out, &cat),
        Some(None) => writeln!(out, "No cat named {FEATURED_CAT}"),
        None => Ok(()),
    }
}

fn print_cat<W: Write>(out: &mut W, cat: &Cat) -> std::io::Result<()> {
    let line = serde_json::to_string(cat).map_err(std::io::Error::other)?;
    writeln!(out, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use taskboard_cats::CatStoreError;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_step_is_a_warning() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut summary = DemoSummary::default();
        let result: CatResult<u64> = Err(CatStoreError::Connection("server down".to_string()));
        assert!(summary.record("count", result).is_none());
        assert_eq!(summary.failed, 1);

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("WARN"));
        assert!(text.contains("count failed"));
        assert!(!text.contains("ERROR"));
    }

    #[test]
    fn test_starter_cats() {
        let cats = starter_cats();
        let names: Vec<&str> = cats.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["barsik", "murzik", "pushok", "murka", "bayun"]);
        assert!(cats.iter().all(|c| c.features.len() == 3));
    }

    #[test]
    fn test_print_cat_is_json() {
        let cat = Cat {
            id: "000000000000000000000001".to_string(),
            name: "barsik".to_string(),
            age: 3,
            features: vec!["ginger".to_string()],
        };
        let mut out = Vec::new();
        print_cat(&mut out, &cat).unwrap();

        let line = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["name"], "barsik");
        assert_eq!(value["features"][0], "ginger");
    }
}
