use std::collections::HashMap;

use log::error;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{channel, error::TryRecvError, Receiver, Sender};

use crate::frame_resolver::ResolvedFrameEvent;
use crate::id::DeviceId;
use crate::state::ThreadedObject;

use super::debug::{DebugSender, DebugSenderConfig};
use super::opendmx::{OpenDmxSender, OpenDmxSenderConfig};
use super::threaded_device::{DmxOutputDeviceType, ThreadedDeviceWrapper};

pub struct DeviceManager {
    devices: RwLock<HashMap<DeviceId, ThreadedDeviceWrapper>>,
    frame_buffers: RwLock<HashMap<DeviceId, Sender<ResolvedFrameEvent>>>,
    subscribed_events: SubscribedEvents,
}

#[derive(Clone, Serialize, Deserialize)]
pub enum DeviceConfigType {
    DmxOutput(DmxOutputConfigType),
}

#[derive(Clone, Serialize, Deserialize)]
pub enum DmxOutputConfigType {
    OpenDmx(OpenDmxSenderConfig),
    Debug(DebugSenderConfig),
}

struct SubscribedEvents {
    resolved_frames: Vec<Receiver<ResolvedFrameEvent>>,
}

impl DeviceManager {
    pub fn new() -> DeviceManager {
        DeviceManager {
            devices: RwLock::new(HashMap::new()),
            frame_buffers: RwLock::new(HashMap::new()),
            subscribed_events: SubscribedEvents {
                resolved_frames: vec![],
            },
        }
    }

    pub fn add_dmx_device(&self, id: DeviceId, mut device: DmxOutputDeviceType) {
        use super::threaded_device::DmxOutputDevice;

        let (sender, receiver) = channel(10); // TODO: Get the buffer size from config
        device.receive_frames_from(receiver);

        let threaded_device = ThreadedDeviceWrapper::new(device);
        self.devices.write().insert(id.clone(), threaded_device);
        self.frame_buffers.write().insert(id, sender);
    }

    pub fn add_device_from_config(&self, id: DeviceId, config: DeviceConfigType) {
        match config {
            DeviceConfigType::DmxOutput(output_config) => {
                let device = match output_config {
                    DmxOutputConfigType::OpenDmx(config) => {
                        DmxOutputDeviceType::OpenDmx(OpenDmxSender::new(id.clone(), config))
                    }
                    DmxOutputConfigType::Debug(config) => {
                        DmxOutputDeviceType::Debug(DebugSender::new(id.clone(), config))
                    }
                };
                self.add_dmx_device(id, device);
            }
        }
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().keys().cloned().collect()
    }

    pub fn listen_to_resolved_frames(&mut self, recv: Receiver<ResolvedFrameEvent>) {
        self.subscribed_events.resolved_frames.push(recv);
    }

    pub fn stop_all(&self) {
        for device in self.devices.write().values_mut() {
            device.stop();
        }
    }
}

impl Default for DeviceManager {
    fn default() -> DeviceManager {
        DeviceManager::new()
    }
}

impl ThreadedObject for DeviceManager {
    fn run(&mut self) {
        for event_subscriber in self.subscribed_events.resolved_frames.iter_mut() {
            let event = match event_subscriber.try_recv() {
                Ok(event) => event,
                Err(err) => {
                    match err {
                        TryRecvError::Lagged(frames) => {
                            error!("Device manager lagged behind resolver by {} frames", frames);
                        }
                        TryRecvError::Closed => {
                            panic!("Resolved frame channel closed");
                        }
                        TryRecvError::Empty => {}
                    }
                    continue;
                }
            };

            for sender in self.frame_buffers.read().values() {
                sender.send(event.clone()).ok();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast;

    use super::*;

    #[test]
    fn routes_resolved_frames_to_configured_devices() {
        let (frame_sender, frame_receiver) = broadcast::channel(4);

        let mut manager = DeviceManager::new();
        manager.listen_to_resolved_frames(frame_receiver);
        manager.add_device_from_config(
            DeviceId::new_from("bench".to_string()),
            DeviceConfigType::DmxOutput(DmxOutputConfigType::Debug(DebugSenderConfig::new(
                "bench log".to_string(),
                48,
            ))),
        );

        assert_eq!(
            manager.device_ids(),
            vec![DeviceId::new_from("bench".to_string())]
        );

        frame_sender
            .send(ResolvedFrameEvent {
                frame: 1,
                data: [0; 512],
            })
            .unwrap();
        manager.run();

        manager.stop_all();
    }
}
