use keydoc::collection::{CollectionConfig, Document, WritePolicy};
use keydoc::doc;
use keydoc::errors::KeydocResult;
use keydoc::keydoc::Keydoc;
use keydoc::keydoc_builder::KeydocBuilder;
use std::backtrace::Backtrace;
use std::time::{Duration, Instant};
use std::{env, fs, thread};

/// Runs a test with retry logic and error handling.
///
/// `after` runs even when `test` returns an error, so temporary keyspaces
/// are removed either way.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> KeydocResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> KeydocResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> KeydocResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;
    let mut last_backtrace: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => after(ctx).map_err(|e| {
                        (format!("After run failed: {:?}", e), backtrace.to_string())
                    }),
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();
        let failure = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                last_backtrace = Some(bt);
                e
            }
            Err(panic_err) => {
                let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                last_backtrace = Some(Backtrace::capture().to_string());
                format!("Panic: {}", err_msg)
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", failure);
            eprintln!("Retrying in {}ms...\n", 100 * attempt);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(failure);
    }

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {} attempts", MAX_RETRIES);
    eprintln!("Last error: {}", last_error.as_deref().unwrap_or("Unknown"));
    if let Some(bt) = &last_backtrace {
        if !bt.is_empty() && !bt.contains("disabled") {
            eprintln!("\nBacktrace:\n{}", bt);
        }
    }
    eprintln!("=====================================================\n");

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    db: Keydoc,
}

impl TestContext {
    pub fn new(path: String, db: Keydoc) -> Self {
        Self { path, db }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn db(&self) -> Keydoc {
        self.db.clone()
    }
}

pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    let temp_dir = env::temp_dir();
    temp_dir.join(id.to_string()).to_string_lossy().to_string()
}

/// The collections every test database is opened with:
/// `users` keyed by `_id` and `orders` keyed by `orderId` with serialized
/// writes.
pub fn test_collections() -> KeydocBuilder {
    Keydoc::builder()
        .collection("users", CollectionConfig::new("_id"))
        .collection(
            "orders",
            CollectionConfig::new("orderId").write_policy(WritePolicy::Serialized),
        )
}

/// Opens the standard test database over the fjall keyspace at `path`.
pub fn open_fjall_database(path: &str) -> KeydocResult<Keydoc> {
    use keydoc_fjall_adapter::FjallModule;

    let storage_module = FjallModule::with_config()
        .db_path(path)
        .cache_size(1024 * 1024)
        .build();
    test_collections().load_module(storage_module).open_or_create()
}

#[cfg(all(feature = "fjall", not(feature = "memory")))]
pub fn create_test_context() -> KeydocResult<TestContext> {
    let path = random_path();
    match open_fjall_database(&path) {
        Ok(db) => Ok(TestContext::new(path, db)),
        Err(e) => {
            let _ = fs::remove_dir_all(&path);
            Err(e)
        }
    }
}

#[cfg(feature = "memory")]
pub fn create_test_context() -> KeydocResult<TestContext> {
    let db = test_collections().open_or_create()?;
    Ok(TestContext::new(String::new(), db))
}

pub fn cleanup(ctx: TestContext) -> KeydocResult<()> {
    if let Err(e) = ctx.db().close() {
        eprintln!("Warning: Failed to close database: {:?}", e);
    }
    remove_path(ctx.path());
    Ok(())
}

/// Removes a keyspace directory, retrying while file handles are released.
pub fn remove_path(path: &str) {
    if path.is_empty() {
        return;
    }
    let mut delay_ms = 50u64;
    for _ in 0..10 {
        if !std::path::Path::new(path).exists() || fs::remove_dir_all(path).is_ok() {
            return;
        }
        thread::sleep(Duration::from_millis(delay_ms));
        delay_ms = (delay_ms * 2).min(500);
    }
    eprintln!("Warning: Failed to remove {}", path);
}

pub fn create_test_docs() -> Vec<Document> {
    vec![
        doc! {
            _id: "a",
            name: "Ann",
            age: 31,
            tags: ["admin", "ops"],
            address: { city: "Oslo", zip: "0150" }
        },
        doc! {
            _id: "b",
            name: "Bob",
            age: 27,
            tags: ["dev"]
        },
        doc! {
            _id: "c",
            name: "Cid",
            age: 45,
            active: false
        },
    ]
}
