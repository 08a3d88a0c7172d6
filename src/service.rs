//! Background compass service
//!
//! Runs a [`CompassSession`] on its own thread and feeds it from a single
//! command channel. Producers on any thread (one per sensor, a UI thread
//! editing the declination) send commands; the worker applies them strictly
//! in arrival order, so the session never sees concurrent updates.

use std::sync::{Arc, RwLock, mpsc};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::error::{CompassError, Result};
use crate::session::{CompassSession, SensorEvent};
use crate::types::{CompassSettings, Heading};

/// Commands that may wait in the queue before senders block
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Commands accepted by the service worker
#[derive(Debug, Clone, PartialEq)]
pub enum CompassCommand {
    /// A gravity or geomagnetic sample
    Sample(SensorEvent),
    /// Replace the declination text used from the next sample on
    SetDeclination(String),
    /// Restart the session: forget both vectors and return to 0°
    Reset,
    /// Stop the worker thread
    Stop,
}

/// Handle to a compass session running on a worker thread
///
/// # Example
/// ```
/// use std::time::Duration;
/// use nalgebra::Vector3;
/// use compass_heading::{CompassService, CompassSettings};
///
/// let (service, headings) = CompassService::spawn(CompassSettings::default());
///
/// service.set_declination("4.5").unwrap();
/// service.send_gravity(Vector3::new(0.0, 0.0, 9.81)).unwrap();
/// service.send_geomagnetic(Vector3::new(0.0, 22.0, -40.0)).unwrap();
///
/// let heading = headings.recv_timeout(Duration::from_secs(1)).unwrap();
/// assert!((heading.degrees() - 0.045).abs() < 1e-3);
///
/// service.stop().unwrap();
/// ```
#[derive(Debug)]
pub struct CompassService {
    command_tx: mpsc::SyncSender<CompassCommand>,
    latest: Arc<RwLock<Option<Heading>>>,
    worker: Option<JoinHandle<()>>,
}

impl CompassService {
    /// Start the worker thread
    ///
    /// Returns the service handle and the channel on which every new heading
    /// is published. Dropping the receiver does not stop the service;
    /// [`latest_heading`](Self::latest_heading) keeps working.
    ///
    /// The command queue holds at most [`COMMAND_QUEUE_CAPACITY`] commands;
    /// once full, senders block until the worker catches up. The heading
    /// channel is unbounded, so a receiver that is kept alive should be
    /// drained.
    pub fn spawn(settings: CompassSettings) -> (Self, mpsc::Receiver<Heading>) {
        let (command_tx, command_rx) = mpsc::sync_channel(COMMAND_QUEUE_CAPACITY);
        let (heading_tx, heading_rx) = mpsc::channel();
        let latest = Arc::new(RwLock::new(None));

        let worker = {
            let latest = Arc::clone(&latest);
            thread::spawn(move || run_worker(settings, command_rx, heading_tx, latest))
        };

        let service = CompassService {
            command_tx,
            latest,
            worker: Some(worker),
        };

        (service, heading_rx)
    }

    /// Queue a gravity sample
    pub fn send_gravity(&self, gravity: Vector3<f32>) -> Result<()> {
        self.send(CompassCommand::Sample(SensorEvent::Gravity(gravity)))
    }

    /// Queue a geomagnetic sample
    pub fn send_geomagnetic(&self, geomagnetic: Vector3<f32>) -> Result<()> {
        self.send(CompassCommand::Sample(SensorEvent::Geomagnetic(geomagnetic)))
    }

    /// Replace the declination text; it is re-parsed on every later sample
    pub fn set_declination(&self, text: impl Into<String>) -> Result<()> {
        self.send(CompassCommand::SetDeclination(text.into()))
    }

    /// Restart the session
    pub fn reset(&self) -> Result<()> {
        self.send(CompassCommand::Reset)
    }

    /// Send a raw command to the worker, blocking while the queue is full
    pub fn send(&self, command: CompassCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| CompassError::ServiceStopped)
    }

    /// Most recently published heading, `None` before the first one or after a reset
    pub fn latest_heading(&self) -> Option<Heading> {
        self.latest.read().ok().and_then(|guard| *guard)
    }

    /// Stop the worker and wait for it to finish
    ///
    /// Commands already queued are processed first.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        // Worker may already be gone if it panicked
        let _ = self.command_tx.send(CompassCommand::Stop);
        worker.join().map_err(|_| CompassError::ServiceStopped)
    }
}

impl Drop for CompassService {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("Compass worker did not shut down cleanly: {}", err);
        }
    }
}

fn run_worker(
    settings: CompassSettings,
    command_rx: mpsc::Receiver<CompassCommand>,
    heading_tx: mpsc::Sender<Heading>,
    latest: Arc<RwLock<Option<Heading>>>,
) {
    let mut session = CompassSession::with_settings(settings);
    let mut declination = String::new();

    info!("Compass worker started");

    while let Ok(command) = command_rx.recv() {
        match command {
            CompassCommand::Sample(event) => match session.update(event, &declination) {
                Ok(Some(heading)) => {
                    if let Ok(mut guard) = latest.write() {
                        *guard = Some(heading);
                    }
                    // Nobody listening is fine; latest_heading still works
                    let _ = heading_tx.send(heading);
                }
                Ok(None) => {}
                Err(err) => debug!("Sample skipped: {}", err),
            },
            CompassCommand::SetDeclination(text) => {
                debug!("Declination text set to {:?}", text);
                declination = text;
            }
            CompassCommand::Reset => {
                session.reset();
                if let Ok(mut guard) = latest.write() {
                    *guard = None;
                }
                debug!("Compass session reset");
            }
            CompassCommand::Stop => break,
        }
    }

    info!("Compass worker stopped");
}
