use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError};
use log::{error, warn};
use parking_lot::RwLock;
use tokio::sync::broadcast::{self, Receiver as BroadcastReceiver, Sender};

use crate::events::EventEmitter;
use crate::frame::FrameData;
use crate::rig::Rig;
use crate::state::{DeskState, ThreadedObject};
use crate::universe::{DmxFrame, Universe};
use crate::wash::wash;

const FRAME_EVENT_CHANNEL_CAPACITY: usize = 60;

// Keeps a stopped clock from hanging the resolver thread on shutdown.
const TICK_RECV_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
pub struct ResolvedFrameEvent {
    pub frame: u32,
    pub data: DmxFrame,
}

/// Turns the desk state into universe frames, once per clock tick. The
/// wash is only recomputed when the desk changed; the frame itself is
/// re-sent every tick, since DMX refreshes continuously.
pub struct FrameResolver {
    tick_buffer: Receiver<FrameData>,
    desk: Arc<RwLock<DeskState>>,
    rig: Rig,
    universe: Universe,
    resolved_revision: Option<u64>,
    event_emitter: Sender<ResolvedFrameEvent>,
}

impl FrameResolver {
    pub fn new(
        desk: Arc<RwLock<DeskState>>,
        rig: Rig,
        tick_buffer: Receiver<FrameData>,
    ) -> FrameResolver {
        let (tx, _) = broadcast::channel(FRAME_EVENT_CHANNEL_CAPACITY);

        FrameResolver {
            tick_buffer,
            desk,
            rig,
            universe: Universe::new(),
            resolved_revision: None,
            event_emitter: tx,
        }
    }
}

impl ThreadedObject for FrameResolver {
    fn run(&mut self) {
        let tick = match self.tick_buffer.recv_timeout(TICK_RECV_TIMEOUT) {
            Ok(tick) => tick,
            Err(RecvTimeoutError::Timeout) => return,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Frame clock disconnected");
                return;
            }
        };

        let (snapshot, revision) = {
            let desk = self.desk.read();
            (desk.snapshot(), desk.revision())
        };

        if self.resolved_revision != Some(revision) {
            let span = wash(snapshot.left, snapshot.right, self.rig.segment_count());

            if let Err(err) = self.rig.apply_wash(&span, &mut self.universe) {
                error!("Could not apply wash to universe: {:?}", err);
                return;
            }

            self.resolved_revision = Some(revision);
        }

        if self.event_emitter.receiver_count() > 0 {
            self.event_emitter
                .send(ResolvedFrameEvent {
                    frame: tick.frame,
                    data: self.universe.frame(),
                })
                .ok();
        }
    }
}

impl EventEmitter<ResolvedFrameEvent> for FrameResolver {
    fn subscribe(&self) -> BroadcastReceiver<ResolvedFrameEvent> {
        self.event_emitter.subscribe()
    }
}
