use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

use crate::frame_resolver::ResolvedFrameEvent;
use crate::id::DeviceId;
use crate::universe::UNIVERSE_CHANNELS;

use super::threaded_device::DmxOutputDevice;

#[derive(Clone, Serialize, Deserialize)]
pub struct DebugSenderConfig {
    name: String,
    channels: u16,
}

impl DebugSenderConfig {
    pub fn new(name: String, channels: u16) -> Self {
        DebugSenderConfig { name, channels }
    }
}

/// Logs frames instead of sending them; stands in for the hardware when
/// there is no widget on the bench.
pub struct DebugSender {
    pub id: DeviceId,
    name: String,
    channels: usize,
    frame_buffer: Option<Receiver<ResolvedFrameEvent>>,
}

impl DebugSender {
    pub fn new(id: DeviceId, config: DebugSenderConfig) -> DebugSender {
        DebugSender {
            id,
            name: config.name,
            channels: usize::from(config.channels).min(UNIVERSE_CHANNELS),
            frame_buffer: None,
        }
    }
}

impl DmxOutputDevice for DebugSender {
    fn run(&mut self) {
        if let Some(buffer) = &mut self.frame_buffer {
            match buffer.try_recv() {
                Err(err) => match err {
                    TryRecvError::Lagged(missed) => {
                        warn!("Debug device lagged by {} frames! ({})", missed, self.id)
                    }
                    TryRecvError::Closed => {
                        error!("Frame buffer exists but is closed! ({})", self.id)
                    }
                    TryRecvError::Empty => {}
                },
                Ok(event) => {
                    debug!(
                        "{}: frame {} -> {:?}",
                        self.name,
                        event.frame,
                        &event.data[..self.channels]
                    );
                }
            }
        }
    }

    fn receive_frames_from(&mut self, buffer: Receiver<ResolvedFrameEvent>) {
        self.frame_buffer.replace(buffer);
    }
}
