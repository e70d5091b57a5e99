//! Background environment for running [`Task`]s.

use std::{
    error::Error,
    fmt,
    future::{Future, IntoFuture},
};

use derive_more::Display;
use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;
use tracing as log;

#[cfg(doc)]
use crate::Task;

/// Boxed error of a background [`Task`].
type BoxError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s.
///
/// Nothing runs until this [`Background`] is awaited, as all the spawned
/// [`Task`]s live on a single [`task::LocalSet`].
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of tasks.
    set: task::LocalSet,

    /// Names and handles of the spawned tasks.
    handles: Vec<(&'static str, task::JoinHandle<Result<(), BoxError>>)>,
}

impl Background {
    /// Spawns a new named [`Task`] inside the [`Background`] environment.
    pub fn spawn<F, E>(&mut self, name: &'static str, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        log::debug!("spawning background `{name}` task");
        let handle = self
            .set
            .spawn_local(future.map_err(BoxError::from));
        self.handles.push((name, handle));
    }

    /// Returns names of the [`Task`]s spawned in this [`Background`].
    pub fn tasks(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handles.iter().map(|(name, _)| *name)
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;

        let tasks = handles.into_iter().map(|(task, handle)| {
            handle
                .map(move |res| match res {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(source)) => Err(Failure { task, source }),
                    Err(e) => Err(Failure {
                        task,
                        source: BoxError::from(e),
                    }),
                })
                .boxed_local()
        });

        // The `LocalSet` itself drives the spawned tasks, so it's polled
        // along with their handles.
        future::try_join(
            set.map(Ok::<_, Failure>),
            future::try_join_all(tasks),
        )
        .map_ok(drop)
        .boxed_local()
    }
}

/// Failure of a [`Task`] spawned in a [`Background`].
#[derive(Display)]
#[display("background `{task}` task failed: {source}")]
pub struct Failure {
    /// Name of the failed [`Task`].
    task: &'static str,

    /// Error the [`Task`] failed with.
    source: BoxError,
}

impl Failure {
    /// Returns name of the failed [`Task`].
    #[must_use]
    pub fn task(&self) -> &'static str {
        self.task
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("task", &self.task)
            .field("source", &self.source.to_string())
            .finish()
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}

#[cfg(test)]
mod spec {
    use std::{convert::Infallible, io};

    use super::Background;

    #[tokio::test]
    async fn reports_failed_task_name() {
        let mut bg = Background::default();
        bg.spawn("succeeding", async { Ok::<_, Infallible>(()) });
        bg.spawn("failing", async {
            Err(io::Error::other("boom"))
        });
        assert_eq!(bg.tasks().collect::<Vec<_>>(), ["succeeding", "failing"]);

        let err = bg.await.unwrap_err();
        assert_eq!(err.task(), "failing");
        assert_eq!(err.to_string(), "background `failing` task failed: boom");
    }

    #[tokio::test]
    async fn completes_when_all_tasks_succeed() {
        let mut bg = Background::default();
        bg.spawn("first", async { Ok::<_, Infallible>(()) });
        bg.spawn("second", async { Ok::<_, Infallible>(()) });

        bg.await.unwrap();
    }
}
