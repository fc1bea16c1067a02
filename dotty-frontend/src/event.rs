use std::{sync::Arc, time::Duration};

use dotty_history::{Graphviz, RenderError};
use dotty_keymap::{
    conversion,
    message::{KeySequence, KeymapMessage, Mode},
    MessageResolver,
};
use futures::{FutureExt, StreamExt};
use serde_json::Value;
use tokio::{
    select,
    sync::{
        mpsc::{self, Receiver},
        oneshot, Mutex,
    },
};
use url::Url;

use crate::{
    error::AppError,
    remote::{FetchError, Fetched, Remote},
    task::{Task, TaskManager},
};

#[derive(Debug)]
pub struct Envelope {
    pub messages: Vec<Message>,
    pub sequence: KeySequence,
    pub source: MessageSource,
}

#[derive(Debug, Eq, PartialEq)]
pub enum MessageSource {
    Task,
    User,
}

pub enum Message {
    Keymap(KeymapMessage),
    Error(String),
    FilesListed(Url, Result<Vec<Url>, FetchError>),
    GraphFetched(Url, Result<Fetched, FetchError>),
    GraphRendered(Url, Fetched, Result<String, RenderError>),
    Resize(u16, u16),
    StatusLoaded(Url, String, Result<Value, FetchError>),
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Keymap(msg) => write!(f, "Keymap({:?})", msg),
            Message::Error(err) => write!(f, "Error({:?})", err),
            Message::FilesListed(url, result) => match result {
                Ok(files) => write!(f, "FilesListed({}, Ok({} files))", url, files.len()),
                Err(error) => write!(f, "FilesListed({}, Err({}))", url, error),
            },
            Message::GraphFetched(url, result) => match result {
                Ok(fetched) => write!(
                    f,
                    "GraphFetched({}, Ok({}, {} bytes))",
                    url,
                    fetched.status,
                    fetched.body.len()
                ),
                Err(error) => write!(f, "GraphFetched({}, Err({}))", url, error),
            },
            Message::GraphRendered(url, fetched, result) => match result {
                Ok(markup) => write!(
                    f,
                    "GraphRendered({}, {} bytes, Ok({} bytes))",
                    url,
                    fetched.body.len(),
                    markup.len()
                ),
                Err(error) => write!(f, "GraphRendered({}, Err({}))", url, error),
            },
            Message::Resize(x, y) => write!(f, "Resize({}, {})", x, y),
            Message::StatusLoaded(url, fragment, result) => match result {
                Ok(_) => write!(f, "StatusLoaded({}, {:?}, Ok(_))", url, fragment),
                Err(error) => write!(f, "StatusLoaded({}, {:?}, Err({}))", url, fragment, error),
            },
        }
    }
}

pub struct Emitter {
    cancellation: Option<oneshot::Sender<oneshot::Sender<bool>>>,
    tasks: TaskManager,
    pub receiver: Receiver<Envelope>,
    resolver: Arc<Mutex<MessageResolver>>,
}

impl Emitter {
    pub fn start(remote: Remote, renderer: Graphviz, refresh: Duration) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        let resolver = Arc::new(Mutex::new(MessageResolver::default()));
        let tasks = TaskManager::new(sender.clone(), remote, renderer, refresh);

        let (cancellation, cancellation_receiver) = oneshot::channel();
        start_crossterm_listener(cancellation_receiver, resolver.clone(), sender);

        Self {
            cancellation: Some(cancellation),
            tasks,
            receiver,
            resolver,
        }
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        if let Some(cancellation) = self.cancellation.take() {
            let (sender, receiver) = oneshot::channel();
            if cancellation.send(sender).is_ok() {
                if let Err(error) = receiver.await {
                    tracing::error!("crossterm listener did not confirm shutdown: {:?}", error);
                }
            }
        }

        self.tasks.finishing().await
    }

    pub async fn set_current_mode(&mut self, mode: Mode) {
        let mut resolver = self.resolver.lock().await;
        resolver.mode = mode;
    }

    pub fn run(&mut self, task: Task) {
        self.tasks.run(task);
    }
}

fn start_crossterm_listener(
    mut cancellation_receiver: oneshot::Receiver<oneshot::Sender<bool>>,
    resolver_mutex: Arc<Mutex<MessageResolver>>,
    sender: mpsc::Sender<Envelope>,
) {
    tokio::spawn(async move {
        let mut reader = crossterm::event::EventStream::new();

        loop {
            let crossterm_event = reader.next().fuse();

            select! {
                Ok(sender) = &mut cancellation_receiver => {
                    let _ = sender.send(true);
                    break
                }
                Some(Ok(event)) = crossterm_event => {
                    if let Some(envelope) = handle_crossterm_event(&resolver_mutex, event).await {
                        let _ = sender.send(envelope).await;
                    }
                }
            }
        }
    });
}

async fn handle_crossterm_event(
    resolver_mutex: &Arc<Mutex<MessageResolver>>,
    event: crossterm::event::Event,
) -> Option<Envelope> {
    match event {
        crossterm::event::Event::Key(key) => {
            if let Some(key) = conversion::to_key(&key) {
                let mut resolver = resolver_mutex.lock().await;
                let (messages, sequence) = resolver.add_key(key);
                return Some(Envelope {
                    messages: messages.into_iter().map(Message::Keymap).collect(),
                    sequence,
                    source: MessageSource::User,
                });
            }

            None
        }
        crossterm::event::Event::Resize(x, y) => Some(Envelope {
            messages: vec![Message::Resize(x, y)],
            sequence: KeySequence::None,
            source: MessageSource::User,
        }),
        crossterm::event::Event::FocusLost
        | crossterm::event::Event::FocusGained
        | crossterm::event::Event::Paste(_)
        | crossterm::event::Event::Mouse(_) => None,
    }
}
