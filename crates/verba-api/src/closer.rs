//! Registry of shutdown callbacks, run with a deadline when the process
//! stops.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;

type CloseFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
type CloseFn = Box<dyn FnOnce() -> CloseFuture + Send>;

#[derive(Default)]
pub struct Closer {
    close_fns: Mutex<Vec<(String, CloseFn)>>,
}

impl Closer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named shutdown callback. Callbacks run in registration
    /// order.
    pub fn add<F, Fut>(&self, name: impl Into<String>, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let mut close_fns = self.close_fns.lock().expect("closer mutex poisoned");
        close_fns.push((name.into(), Box::new(move || Box::pin(f()))));
    }

    /// Run every registered callback under one shared deadline.
    ///
    /// A failing callback does not stop the ones after it; all failures are
    /// collected into a single error. When the deadline lapses the remaining
    /// callbacks are abandoned and named in the returned error.
    pub async fn close(&self, deadline: Duration) -> anyhow::Result<()> {
        let mut queue: VecDeque<(String, CloseFn)> = {
            let mut close_fns = self.close_fns.lock().expect("closer mutex poisoned");
            std::mem::take(&mut *close_fns).into()
        };

        let deadline_at = tokio::time::Instant::now() + deadline;
        let mut failures: Vec<String> = Vec::new();

        while let Some((name, f)) = queue.pop_front() {
            let remaining = deadline_at.saturating_duration_since(tokio::time::Instant::now());
            match tokio::time::timeout(remaining, f()).await {
                Ok(Ok(())) => {
                    tracing::debug!(callback = %name, "closed");
                }
                Ok(Err(err)) => {
                    tracing::error!(callback = %name, "close failed: {err:#}");
                    failures.push(format!("{name}: {err:#}"));
                }
                Err(_) => {
                    let mut unfinished = vec![name];
                    unfinished.extend(queue.into_iter().map(|(n, _)| n));

                    let mut message = format!(
                        "shutdown deadline exceeded, unfinished: {}",
                        unfinished.join(", ")
                    );
                    if !failures.is_empty() {
                        message = format!("{message}; earlier failures:\n{}", failures.join("\n"));
                    }
                    return Err(anyhow!(message));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "shutdown finished with {} error(s):\n{}",
                failures.len(),
                failures.join("\n")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_callbacks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let closer = Closer::new();

        for i in 1..=3 {
            let order = Arc::clone(&order);
            closer.add(format!("callback-{i}"), move || async move {
                order.lock().expect("lock").push(i);
                Ok(())
            });
        }

        closer.close(Duration::from_secs(1)).await.expect("close");
        assert_eq!(*order.lock().expect("lock"), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_closer_closes_clean() {
        let closer = Closer::new();
        closer.close(Duration::from_millis(10)).await.expect("close");
    }

    #[tokio::test]
    async fn test_failures_are_aggregated() {
        let closer = Closer::new();
        let last_ran = Arc::new(AtomicBool::new(false));

        closer.add("first", || async { Err(anyhow!("pool already closed")) });
        closer.add("second", || async { Err(anyhow!("job refused to stop")) });
        let flag = Arc::clone(&last_ran);
        closer.add("third", move || async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let err = closer
            .close(Duration::from_secs(1))
            .await
            .expect_err("close should fail");

        let message = err.to_string();
        assert!(message.contains("2 error(s)"));
        assert!(message.contains("first: pool already closed"));
        assert!(message.contains("second: job refused to stop"));
        assert!(last_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_deadline_names_unfinished_callbacks() {
        let closer = Closer::new();
        let never_ran = Arc::new(AtomicBool::new(false));

        closer.add("quick", || async { Ok(()) });
        closer.add("stuck", || async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        });
        let flag = Arc::clone(&never_ran);
        closer.add("abandoned", move || async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let err = closer
            .close(Duration::from_millis(50))
            .await
            .expect_err("close should time out");

        let message = err.to_string();
        assert!(message.contains("deadline exceeded"));
        assert!(message.contains("stuck"));
        assert!(message.contains("abandoned"));
        assert!(!never_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_callbacks_do_not_run_twice() {
        let closer = Closer::new();
        let runs = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&runs);
        closer.add("once", move || async move {
            *counter.lock().expect("lock") += 1;
            Ok(())
        });

        closer.close(Duration::from_secs(1)).await.expect("close");
        closer.close(Duration::from_secs(1)).await.expect("close");

        assert_eq!(*runs.lock().expect("lock"), 1);
    }
}
