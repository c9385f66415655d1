use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, sleep, JoinHandle},
    time::Duration,
};

use enum_dispatch::enum_dispatch;
use tokio::sync::broadcast::Receiver;

use crate::frame_resolver::ResolvedFrameEvent;

use super::{debug::DebugSender, opendmx::OpenDmxSender};

#[enum_dispatch]
pub trait DmxOutputDevice: Send {
    fn run(&mut self);
    fn receive_frames_from(&mut self, buffer: Receiver<ResolvedFrameEvent>);
}

#[enum_dispatch(DmxOutputDevice)]
pub enum DmxOutputDeviceType {
    OpenDmx(OpenDmxSender),
    Debug(DebugSender),
}

pub struct ThreadedDeviceWrapper {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadedDeviceWrapper {
    pub fn new(mut device: DmxOutputDeviceType) -> Self {
        let running: Arc<AtomicBool> = Arc::new(AtomicBool::default());
        running.store(true, Ordering::SeqCst);

        let alive = running.clone();

        let handle = Some(thread::spawn(move || {
            while alive.load(Ordering::SeqCst) {
                device.run();

                sleep(Duration::from_millis(1));
            }
        }));

        ThreadedDeviceWrapper { running, handle }
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.join().expect("Could not join device thread");
        }
    }
}
