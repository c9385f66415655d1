use tokio::sync::broadcast::Receiver;

use crate::state::Slider;

pub trait EventEmitter<T> {
    fn subscribe(&self) -> Receiver<T>;
}

/// Emitted by the desk whenever the operator surface changes.
#[derive(Clone, Debug, PartialEq)]
pub enum DeskEvent {
    SliderChanged(Slider, u8),
    LinkChanged(bool),
    SnapshotApplied,
}
