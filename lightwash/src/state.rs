use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use tokio::sync::broadcast::{self, Receiver, Sender};

use crate::color::Rgb;
use crate::events::{DeskEvent, EventEmitter};

const DESK_EVENT_CHANNEL_CAPACITY: usize = 16;

pub trait ThreadedObject: Sync + Send {
    // Do not loop inside run!
    fn run(&mut self);
}

/// The six operator-facing channel faders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter)]
pub enum Slider {
    LeftRed,
    LeftGreen,
    LeftBlue,
    RightRed,
    RightGreen,
    RightBlue,
}

/// Everything a preset captures: the six slider values and the link flag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeskSnapshot {
    pub left: Rgb,
    pub right: Rgb,
    pub link: bool,
}

/// The operator surface a front end drives. While linked, the right zone
/// mirrors the left zone and writes to right-zone sliders are discarded.
pub struct DeskState {
    left: Rgb,
    right: Rgb,
    link: bool,
    revision: u64,
    event_emitter: Sender<DeskEvent>,
}

impl DeskState {
    pub fn new() -> DeskState {
        let (tx, _) = broadcast::channel(DESK_EVENT_CHANNEL_CAPACITY);

        DeskState {
            left: Rgb::default(),
            right: Rgb::default(),
            link: false,
            revision: 0,
            event_emitter: tx,
        }
    }

    pub fn left(&self) -> Rgb {
        self.left
    }

    pub fn right(&self) -> Rgb {
        self.right
    }

    pub fn link(&self) -> bool {
        self.link
    }

    /// Bumped on every mutation; lets the resolver skip recomputation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_slider(&mut self, slider: Slider, value: u8) {
        match slider {
            Slider::LeftRed => self.left.r = value,
            Slider::LeftGreen => self.left.g = value,
            Slider::LeftBlue => self.left.b = value,
            Slider::RightRed => self.right.r = value,
            Slider::RightGreen => self.right.g = value,
            Slider::RightBlue => self.right.b = value,
        }

        if self.link {
            self.right = self.left;
        }

        self.on_changed(DeskEvent::SliderChanged(slider, value));
    }

    pub fn set_link(&mut self, link: bool) {
        self.link = link;

        if link {
            self.right = self.left;
        }

        self.on_changed(DeskEvent::LinkChanged(link));
    }

    pub fn snapshot(&self) -> DeskSnapshot {
        DeskSnapshot {
            left: self.left,
            right: self.right,
            link: self.link,
        }
    }

    /// Restores a snapshot wholesale (preset recall).
    pub fn apply(&mut self, snapshot: DeskSnapshot) {
        self.left = snapshot.left;
        self.link = snapshot.link;
        self.right = if snapshot.link {
            snapshot.left
        } else {
            snapshot.right
        };

        self.on_changed(DeskEvent::SnapshotApplied);
    }

    fn on_changed(&mut self, event: DeskEvent) {
        self.revision = self.revision.wrapping_add(1);

        if self.event_emitter.receiver_count() > 0 {
            self.event_emitter.send(event).ok();
        }
    }
}

impl Default for DeskState {
    fn default() -> DeskState {
        DeskState::new()
    }
}

impl EventEmitter<DeskEvent> for DeskState {
    fn subscribe(&self) -> Receiver<DeskEvent> {
        self.event_emitter.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn sliders_land_in_their_channels() {
        let mut desk = DeskState::new();

        for (index, slider) in Slider::iter().enumerate() {
            desk.set_slider(slider, index as u8 + 1);
        }

        assert_eq!(desk.left(), Rgb::new(1, 2, 3));
        assert_eq!(desk.right(), Rgb::new(4, 5, 6));
    }

    #[test]
    fn linking_snaps_right_to_left() {
        let mut desk = DeskState::new();
        desk.set_slider(Slider::LeftRed, 200);
        desk.set_slider(Slider::RightBlue, 99);

        desk.set_link(true);

        assert_eq!(desk.right(), desk.left());
    }

    #[test]
    fn linked_desk_mirrors_left_writes() {
        let mut desk = DeskState::new();
        desk.set_link(true);

        desk.set_slider(Slider::LeftGreen, 123);

        assert_eq!(desk.right().g, 123);
    }

    #[test]
    fn linked_desk_discards_right_writes() {
        let mut desk = DeskState::new();
        desk.set_slider(Slider::LeftRed, 50);
        desk.set_link(true);

        desk.set_slider(Slider::RightRed, 210);

        assert_eq!(desk.right(), Rgb::new(50, 0, 0));
    }

    #[test]
    fn every_mutation_bumps_the_revision() {
        let mut desk = DeskState::new();
        let start = desk.revision();

        desk.set_slider(Slider::LeftRed, 1);
        desk.set_link(true);
        desk.apply(desk.snapshot());

        assert_eq!(desk.revision(), start + 3);
    }

    #[test]
    fn snapshots_round_trip() {
        let mut desk = DeskState::new();
        desk.set_slider(Slider::LeftRed, 10);
        desk.set_slider(Slider::RightGreen, 20);
        let snapshot = desk.snapshot();

        let mut other = DeskState::new();
        other.apply(snapshot);

        assert_eq!(other.snapshot(), snapshot);
    }

    #[test]
    fn applying_a_linked_snapshot_mirrors_left() {
        let snapshot = DeskSnapshot {
            left: Rgb::new(1, 2, 3),
            right: Rgb::new(9, 9, 9),
            link: true,
        };

        let mut desk = DeskState::new();
        desk.apply(snapshot);

        assert_eq!(desk.right(), Rgb::new(1, 2, 3));
    }

    #[test]
    fn mutations_are_observable() {
        let mut desk = DeskState::new();
        let mut events = desk.subscribe();

        desk.set_slider(Slider::LeftBlue, 77);
        desk.set_link(true);

        assert_eq!(
            events.try_recv().unwrap(),
            DeskEvent::SliderChanged(Slider::LeftBlue, 77)
        );
        assert_eq!(events.try_recv().unwrap(), DeskEvent::LinkChanged(true));
    }
}
