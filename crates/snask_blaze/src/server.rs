//! Accept loop and connection workers.
//!
//! Each connection carries exactly one request and is closed after the
//! response (`Connection: close`). Accepted streams go to a fixed pool of
//! worker threads over a channel; with `workers = 0` they are handled on the
//! accepting thread.

use crate::config::BlazeConfig;
use crate::error::BlazeError;
use crate::request::read_request;
use crate::response::Response;
use crate::router::Router;
use snask_runtime::Dispatcher;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(50);

struct Shared {
    router: Router,
    dispatcher: Arc<Dispatcher>,
    config: BlazeConfig,
}

pub struct Server {
    listener: TcpListener,
    shared: Arc<Shared>,
}

impl Server {
    pub fn bind(
        config: BlazeConfig,
        router: Router,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, BlazeError> {
        let addr = config.addr();
        let listener = TcpListener::bind(&addr).map_err(|source| BlazeError::Bind {
            addr: addr.clone(),
            source,
        })?;
        tracing::info!(%addr, routes = router.len(), workers = config.workers, "blaze listening");
        Ok(Self {
            listener,
            shared: Arc::new(Shared {
                router,
                dispatcher,
                config,
            }),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, BlazeError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until the process exits.
    pub fn run(self) -> Result<(), BlazeError> {
        self.serve(None)
    }

    /// Serves `n` connections, waits for them to finish, then returns.
    pub fn serve_n(self, n: usize) -> Result<(), BlazeError> {
        self.serve(Some(n))
    }

    fn serve(self, limit: Option<usize>) -> Result<(), BlazeError> {
        if self.shared.config.workers == 0 {
            self.accept_loop(limit, |stream| handle_connection(&self.shared, stream));
            return Ok(());
        }

        let (tx, rx) = mpsc::channel::<TcpStream>();
        let rx = Arc::new(Mutex::new(rx));
        let mut workers = Vec::with_capacity(self.shared.config.workers);
        for i in 0..self.shared.config.workers {
            workers.push(spawn_worker(i, Arc::clone(&rx), Arc::clone(&self.shared))?);
        }
        self.accept_loop(limit, |stream| {
            if tx.send(stream).is_err() {
                tracing::error!("all blaze workers have exited");
            }
        });
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("blaze worker panicked");
            }
        }
        Ok(())
    }

    fn accept_loop<F: FnMut(TcpStream)>(&self, limit: Option<usize>, mut deliver: F) {
        let mut accepted = 0usize;
        while limit.is_none_or(|n| accepted < n) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    accepted += 1;
                    tracing::trace!(%peer, "accepted");
                    deliver(stream);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    thread::sleep(ACCEPT_RETRY_DELAY);
                }
            }
        }
    }
}

fn spawn_worker(
    index: usize,
    rx: Arc<Mutex<Receiver<TcpStream>>>,
    shared: Arc<Shared>,
) -> Result<JoinHandle<()>, BlazeError> {
    let handle = thread::Builder::new()
        .name(format!("blaze-worker-{}", index))
        .spawn(move || {
            loop {
                let next = rx.lock().unwrap_or_else(PoisonError::into_inner).recv();
                match next {
                    Ok(stream) => handle_connection(&shared, stream),
                    Err(_) => break,
                }
            }
        })?;
    Ok(handle)
}

fn handle_connection(shared: &Shared, mut stream: TcpStream) {
    let started = Instant::now();
    let config = &shared.config;
    if let Err(e) = stream
        .set_read_timeout(config.read_timeout)
        .and_then(|_| stream.set_write_timeout(config.write_timeout))
    {
        tracing::warn!(error = %e, "cannot set socket timeouts");
    }

    let response = match read_request(&mut stream, config.max_request_bytes) {
        Ok(req) => {
            let resp = shared.router.respond(&req, &shared.dispatcher);
            tracing::info!(
                method = %req.method,
                path = %req.path,
                status = resp.status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request"
            );
            resp
        }
        Err(e) => match Response::for_error(&e) {
            Some(resp) => {
                tracing::warn!(error = %e, status = resp.status, "rejected request");
                resp
            }
            None => {
                tracing::debug!(error = %e, "connection dropped");
                return;
            }
        },
    };

    if let Err(e) = response.write_to(&mut stream) {
        tracing::warn!(error = %e, "write failed");
        return;
    }
    let _ = stream.shutdown(Shutdown::Write);
}
