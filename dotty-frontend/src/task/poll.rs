use std::{future::Future, time::Duration};

use dotty_keymap::message::KeySequence;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    event::{Envelope, Message, MessageSource},
    remote::{FetchError, Fetched, Remote},
};

pub trait GraphSource: Clone + Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Fetched, FetchError>> + Send;
}

impl GraphSource for Remote {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<Fetched, FetchError>> + Send {
        self.fetch_graph(url)
    }
}

/// Fetches one graph file over and over. The next fetch is scheduled
/// `delay` after the previous one finished, so slow servers never see
/// overlapping requests. At most one target is polled at a time.
pub struct Poller<S: GraphSource> {
    active: Option<Polling>,
    delay: Duration,
    sender: Sender<Envelope>,
    source: S,
}

struct Polling {
    handle: JoinHandle<()>,
    target: Url,
    token: CancellationToken,
}

impl<S: GraphSource> Poller<S> {
    pub fn new(source: S, sender: Sender<Envelope>, delay: Duration) -> Self {
        Self {
            active: None,
            delay,
            sender,
            source,
        }
    }

    pub fn target(&self) -> Option<&Url> {
        self.active.as_ref().map(|polling| &polling.target)
    }

    /// Starts polling `target`, cancelling whatever was polled before.
    pub fn start(&mut self, target: Url) {
        self.stop();

        tracing::info!("start polling {} every {:?}", target, self.delay);

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll(
            self.source.clone(),
            target.clone(),
            self.delay,
            self.sender.clone(),
            token.clone(),
        ));

        self.active = Some(Polling {
            handle,
            target,
            token,
        });
    }

    pub fn stop(&mut self) -> Option<JoinHandle<()>> {
        let polling = self.active.take()?;

        tracing::info!("stop polling {}", polling.target);
        polling.token.cancel();

        Some(polling.handle)
    }
}

async fn poll<S: GraphSource>(
    source: S,
    target: Url,
    delay: Duration,
    sender: Sender<Envelope>,
    token: CancellationToken,
) {
    loop {
        let result = tokio::select! {
            _ = token.cancelled() => break,
            result = source.fetch(&target) => result,
        };

        if let Err(error) = &result {
            tracing::warn!("fetching {} failed: {}", target, error);
        }

        let envelope = Envelope {
            messages: vec![Message::GraphFetched(target.clone(), result)],
            sequence: KeySequence::None,
            source: MessageSource::Task,
        };

        if sender.send(envelope).await.is_err() {
            tracing::debug!("receiver closed, stop polling {}", target);
            break;
        }

        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(delay) => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use tokio::{
        sync::mpsc::{self, Receiver},
        time::Instant,
    };

    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    #[derive(Clone, Default)]
    struct CountingSource {
        calls: Arc<AtomicUsize>,
        failing: bool,
    }

    impl GraphSource for CountingSource {
        fn fetch(&self, url: &Url) -> impl Future<Output = Result<Fetched, FetchError>> + Send {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let failing = self.failing;
            let body = format!("digraph {{ n{} }} // {}", call, url);

            async move {
                if failing {
                    Err(FetchError::Status(503))
                } else {
                    Ok(Fetched {
                        body,
                        last_modified: None,
                        status: 200,
                    })
                }
            }
        }
    }

    async fn next(receiver: &mut Receiver<Envelope>) -> (Url, Result<Fetched, FetchError>) {
        let mut envelope = receiver.recv().await.unwrap();
        assert_eq!(MessageSource::Task, envelope.source);

        match envelope.messages.remove(0) {
            Message::GraphFetched(url, result) => (url, result),
            message => panic!("unexpected message: {:?}", message),
        }
    }

    fn url(name: &str) -> Url {
        Url::parse(&format!("http://viz.local/dot/{}", name)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_after_delay() {
        let (sender, mut receiver) = mpsc::channel(8);
        let source = CountingSource::default();
        let mut poller = Poller::new(source.clone(), sender, DELAY);

        let started = Instant::now();
        poller.start(url("prod.dot"));

        let (target, result) = next(&mut receiver).await;
        assert_eq!(url("prod.dot"), target);
        assert!(result.unwrap().body.starts_with("digraph { n0 }"));
        assert!(started.elapsed() < DELAY);

        let (_, result) = next(&mut receiver).await;
        assert!(result.unwrap().body.starts_with("digraph { n1 }"));
        assert!(started.elapsed() >= DELAY);
        assert_eq!(2, source.calls.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_polling_after_failure() {
        let (sender, mut receiver) = mpsc::channel(8);
        let source = CountingSource {
            failing: true,
            ..Default::default()
        };
        let mut poller = Poller::new(source.clone(), sender, DELAY);

        poller.start(url("prod.dot"));

        for _ in 0..3 {
            let (_, result) = next(&mut receiver).await;
            assert!(matches!(result, Err(FetchError::Status(503))));
        }
        assert_eq!(3, source.calls.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_fetches() {
        let (sender, mut receiver) = mpsc::channel(8);
        let source = CountingSource::default();
        let mut poller = Poller::new(source.clone(), sender, DELAY);

        poller.start(url("prod.dot"));
        next(&mut receiver).await;

        let handle = poller.stop().unwrap();
        handle.await.unwrap();
        tokio::time::sleep(DELAY * 5).await;

        assert!(receiver.try_recv().is_err());
        assert_eq!(1, source.calls.load(Ordering::SeqCst));
        assert!(poller.target().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn start_replaces_previous_target() {
        let (sender, mut receiver) = mpsc::channel(8);
        let source = CountingSource::default();
        let mut poller = Poller::new(source, sender, DELAY);

        poller.start(url("prod.dot"));
        next(&mut receiver).await;

        poller.start(url("stage.dot"));
        assert_eq!(Some(&url("stage.dot")), poller.target());

        for _ in 0..3 {
            let (target, _) = next(&mut receiver).await;
            assert_eq!(url("stage.dot"), target);
        }
    }
}
