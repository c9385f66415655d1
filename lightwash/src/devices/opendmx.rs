use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use enttecopendmx::EnttecOpenDMX;
use log::{error, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thread_priority::{set_current_thread_priority, ThreadPriority};
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

use crate::frame_resolver::ResolvedFrameEvent;
use crate::id::DeviceId;
use crate::universe::{DmxFrame, UNIVERSE_CHANNELS};

use super::threaded_device::DmxOutputDevice;

const PORT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Clone, Serialize, Deserialize)]
pub struct OpenDmxSenderConfig {
    name: String,
}

impl OpenDmxSenderConfig {
    pub fn new(name: String) -> Self {
        OpenDmxSenderConfig { name }
    }
}

/// Output onto an Enttec Open DMX (FT232R) widget.
///
/// The FTDI port lives on its own transmit thread with its own pacing:
/// frames handed to `run` overwrite a latest-frame slot, and the port
/// keeps re-rendering the last frame whether or not a new one arrived.
pub struct OpenDmxSender {
    pub id: DeviceId,
    name: String,
    channels: Arc<Mutex<Option<DmxFrame>>>,
    shutdown_trigger: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    frame_buffer: Option<Receiver<ResolvedFrameEvent>>,
}

impl OpenDmxSender {
    pub fn new(id: DeviceId, config: OpenDmxSenderConfig) -> OpenDmxSender {
        let shutdown_trigger = Arc::new(AtomicBool::new(false));
        let channels: Arc<Mutex<Option<DmxFrame>>> = Arc::new(Mutex::new(None));

        let thread_shutdown_trigger = Arc::clone(&shutdown_trigger);
        let thread_channels = Arc::clone(&channels);
        let thread_handle = thread::spawn(move || {
            transmit_loop(thread_shutdown_trigger, thread_channels);
        });

        OpenDmxSender {
            id,
            name: config.name,
            channels,
            shutdown_trigger,
            thread_handle: Some(thread_handle),
            frame_buffer: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl DmxOutputDevice for OpenDmxSender {
    fn run(&mut self) {
        if let Some(buffer) = &mut self.frame_buffer {
            match buffer.try_recv() {
                Err(err) => match err {
                    TryRecvError::Lagged(missed) => warn!(
                        "Open DMX device lagged by {} frames! ({})",
                        missed, self.id
                    ),
                    TryRecvError::Closed => {
                        error!("Frame buffer exists but is closed! ({})", self.id)
                    }
                    TryRecvError::Empty => {}
                },
                Ok(event) => {
                    *self.channels.lock() = Some(event.data);
                }
            }
        }
    }

    fn receive_frames_from(&mut self, buffer: Receiver<ResolvedFrameEvent>) {
        self.frame_buffer.replace(buffer);
    }
}

impl Drop for OpenDmxSender {
    fn drop(&mut self) {
        self.shutdown_trigger.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            handle.join().ok();
        }
    }
}

fn transmit_loop(shutdown_trigger: Arc<AtomicBool>, channels: Arc<Mutex<Option<DmxFrame>>>) {
    set_current_thread_priority(ThreadPriority::Max).ok();

    let mut last_retry = Instant::now();
    let mut port = EnttecOpenDMX::new().and_then(|mut port| {
        port.open()?;
        Ok(port)
    });

    if let Err(ref err) = port {
        warn!("Could not open the Open DMX interface: {:?}", err);
    }

    loop {
        if shutdown_trigger.load(Ordering::Relaxed) {
            break;
        }

        match port {
            Ok(ref mut inner_port) => {
                // Load the latest frame if one arrived
                let mut channels_inner = channels.lock();
                if let Some(ref frame) = *channels_inner {
                    for i in 0..UNIVERSE_CHANNELS {
                        inner_port.set_channel(i + 1, frame[i]);
                    }
                    *channels_inner = None;
                }
                drop(channels_inner);

                // Render the universe
                if let Err(err) = inner_port.render() {
                    warn!("Lost the Open DMX interface: {:?}", err);
                    inner_port.close().ok();
                    port = Err(err);
                }
                thread::sleep(Duration::from_millis(2));
            }
            Err(_) => {
                // Keep sleeps short so a shutdown is not held up by the
                // retry interval.
                while last_retry.elapsed() < PORT_RETRY_INTERVAL {
                    thread::sleep(Duration::from_millis(10));
                    if shutdown_trigger.load(Ordering::Relaxed) {
                        return;
                    }
                }
                last_retry = Instant::now();
                port = EnttecOpenDMX::new().and_then(|mut port| {
                    port.open()?;
                    Ok(port)
                });
            }
        }
    }
}
