use std::{
    fmt::{Debug, Display},
    path::PathBuf,
    time::Duration,
};

use dotty_history::Graphviz;
use dotty_keymap::message::KeySequence;
use tokio::{
    sync::mpsc::Sender,
    task::{AbortHandle, JoinSet},
};
use url::Url;

use crate::{
    error::AppError,
    event::{Envelope, Message, MessageSource},
    remote::{Fetched, Remote},
};

use self::poll::Poller;

mod export;
pub mod poll;

#[derive(Clone, Eq, PartialEq)]
pub enum Task {
    ExportSvg(PathBuf, String),
    ListFiles(Url),
    LoadStatus(Url, String),
    PollGraph(Url),
    RenderGraph(Url, Fetched),
    RenderSvg(PathBuf, String),
}

impl Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::ExportSvg(path, _) => write!(f, "ExportSvg({:?}, _)", path),
            Task::ListFiles(url) => write!(f, "ListFiles({})", url),
            Task::LoadStatus(url, fragment) => write!(f, "LoadStatus({}, {:?})", url, fragment),
            Task::PollGraph(url) => write!(f, "PollGraph({})", url),
            Task::RenderGraph(url, fetched) => {
                write!(f, "RenderGraph({}, {} bytes)", url, fetched.body.len())
            }
            Task::RenderSvg(path, _) => write!(f, "RenderSvg({:?}, _)", path),
        }
    }

    fn is_export(&self) -> bool {
        matches!(self, Task::ExportSvg(_, _) | Task::RenderSvg(_, _))
    }
}

impl Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt(f)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt(f)
    }
}

pub struct TaskManager {
    abort_handles: Vec<(Task, AbortHandle)>,
    poller: Poller<Remote>,
    remote: Remote,
    renderer: Graphviz,
    sender: Sender<Envelope>,
    tasks: JoinSet<Result<(), AppError>>,
}

impl TaskManager {
    pub fn new(
        sender: Sender<Envelope>,
        remote: Remote,
        renderer: Graphviz,
        refresh: Duration,
    ) -> Self {
        Self {
            abort_handles: Vec::new(),
            poller: Poller::new(remote.clone(), sender.clone(), refresh),
            remote,
            renderer,
            sender,
            tasks: JoinSet::new(),
        }
    }

    pub async fn finishing(&mut self) -> Result<(), AppError> {
        if let Some(handle) = self.poller.stop() {
            if let Err(error) = handle.await {
                tracing::error!("polling task failed: {:?}", error);
            }
        }

        for (_, abort_handle) in self.abort_handles.drain(..) {
            abort_handle.abort();
        }

        let mut errors = Vec::new();
        while let Some(task) = self.tasks.join_next().await {
            match task {
                Ok(Ok(())) => (),
                Ok(Err(error)) => {
                    tracing::error!("task result returned error: {:?}", error);
                    errors.push(error)
                }
                Err(error) if error.is_cancelled() => (),
                Err(error) => {
                    tracing::error!("task failed: {:?}", error);
                }
            };
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Aggregate(errors))
        }
    }

    pub fn run(&mut self, task: Task) {
        tracing::debug!("running task: {}", task);

        self.collect_finished();

        let abort_handle = match task.clone() {
            Task::ExportSvg(path, markup) => {
                self.abort_where(Task::is_export);

                let sender = self.sender.clone();
                self.tasks.spawn(async move {
                    if let Err(error) = export::write_svg(&path, &markup).await {
                        emit_error(&sender, error).await;
                    }
                    Ok(())
                })
            }
            Task::ListFiles(url) => {
                let remote = self.remote.clone();
                let sender = self.sender.clone();
                self.tasks.spawn(async move {
                    let result = remote.fetch_listing(&url).await;
                    emit(&sender, Message::FilesListed(url, result)).await
                })
            }
            Task::LoadStatus(url, fragment) => {
                self.abort_where(|task| matches!(task, Task::LoadStatus(_, _)));

                let remote = self.remote.clone();
                let sender = self.sender.clone();
                self.tasks.spawn(async move {
                    let result = remote.fetch_status(&url).await;
                    emit(&sender, Message::StatusLoaded(url, fragment, result)).await
                })
            }
            Task::PollGraph(url) => {
                if self.poller.target() == Some(&url) {
                    tracing::debug!("restarting poll of {}", url);
                }

                self.poller.start(url);
                return;
            }
            Task::RenderGraph(url, fetched) => {
                self.abort_where(|task| matches!(task, Task::RenderGraph(_, _)));

                let renderer = self.renderer.clone();
                let sender = self.sender.clone();
                self.tasks.spawn(async move {
                    let result = renderer.render(&fetched.body).await;
                    emit(&sender, Message::GraphRendered(url, fetched, result)).await
                })
            }
            Task::RenderSvg(path, source) => {
                self.abort_where(Task::is_export);

                let renderer = self.renderer.clone();
                let sender = self.sender.clone();
                self.tasks.spawn(async move {
                    if let Err(error) = export::render_svg(&renderer, &source, &path).await {
                        emit_error(&sender, error).await;
                    }
                    Ok(())
                })
            }
        };

        self.abort_handles.push((task, abort_handle));
    }

    fn abort_where(&mut self, predicate: impl Fn(&Task) -> bool) {
        self.abort_handles.retain(|(task, abort_handle)| {
            if predicate(task) {
                abort_handle.abort();
                false
            } else {
                true
            }
        });
    }

    fn collect_finished(&mut self) {
        while let Some(task) = self.tasks.try_join_next() {
            match task {
                Ok(Ok(())) => (),
                Ok(Err(error)) => tracing::error!("task result returned error: {:?}", error),
                Err(error) if error.is_cancelled() => (),
                Err(error) => tracing::error!("task failed: {:?}", error),
            }
        }

        self.abort_handles
            .retain(|(_, abort_handle)| !abort_handle.is_finished());
    }
}

async fn emit(sender: &Sender<Envelope>, message: Message) -> Result<(), AppError> {
    let envelope = Envelope {
        messages: vec![message],
        sequence: KeySequence::None,
        source: MessageSource::Task,
    };

    Ok(sender.send(envelope).await?)
}

async fn emit_error(sender: &Sender<Envelope>, error: AppError) {
    tracing::error!("task failed: {:?}", error);

    let error = format!("Error: {}", error);
    let _ = emit(sender, Message::Error(error)).await;
}
