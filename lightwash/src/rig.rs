use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::universe::{Universe, UniverseErrorSetChannel, UNIVERSE_CHANNELS};

pub const SLOTS_PER_FIXTURE: u16 = 3;

/// Where the segment chain sits in the universe.
#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct RigLayout {
    pub first_address: u16,
    pub fixtures: u16,
}

#[derive(Debug, Error, PartialEq)]
pub enum RigLayoutError {
    #[error("a rig needs at least one fixture")]
    NoFixtures,
    #[error("DMX addresses start at 1")]
    AddressZero,
    #[error("rig spans channels {first}..={last}, past the end of the universe")]
    ExceedsUniverse { first: u16, last: u32 },
}

impl RigLayout {
    pub fn footprint(&self) -> u32 {
        u32::from(self.fixtures) * u32::from(SLOTS_PER_FIXTURE)
    }

    pub fn validate(&self) -> Result<(), RigLayoutError> {
        if self.fixtures == 0 {
            return Err(RigLayoutError::NoFixtures);
        }
        if self.first_address == 0 {
            return Err(RigLayoutError::AddressZero);
        }

        let last = u32::from(self.first_address) + self.footprint() - 1;
        if last > UNIVERSE_CHANNELS as u32 {
            return Err(RigLayoutError::ExceedsUniverse {
                first: self.first_address,
                last,
            });
        }

        Ok(())
    }
}

/// One 3-slot (R, G, B) light segment.
#[derive(Clone)]
pub struct Fixture {
    address: u16,
}

impl Fixture {
    pub fn new(address: u16) -> Fixture {
        Fixture { address }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// Writes the fixture's three slots into the universe.
    pub fn apply(&self, color: Rgb, universe: &mut Universe) -> Result<(), UniverseErrorSetChannel> {
        universe.set_channel(self.address, color.r)?;
        universe.set_channel(self.address + 1, color.g)?;
        universe.set_channel(self.address + 2, color.b)?;

        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub enum RigErrorApplyWash {
    WrongSpanLength { expected: usize, got: usize },
    Channel(UniverseErrorSetChannel),
}

impl From<UniverseErrorSetChannel> for RigErrorApplyWash {
    fn from(err: UniverseErrorSetChannel) -> RigErrorApplyWash {
        RigErrorApplyWash::Channel(err)
    }
}

pub struct Rig {
    fixtures: Vec<Fixture>,
}

impl Rig {
    pub fn new(layout: RigLayout) -> Result<Rig, RigLayoutError> {
        layout.validate()?;

        let fixtures = (0..layout.fixtures)
            .map(|index| Fixture::new(layout.first_address + index * SLOTS_PER_FIXTURE))
            .collect();

        Ok(Rig { fixtures })
    }

    pub fn segment_count(&self) -> usize {
        self.fixtures.len()
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Paints a wash onto the universe. The chain enters from the
    /// stage-right end, so the span is applied tail-first: the lowest
    /// address carries the last color of the span.
    pub fn apply_wash(
        &self,
        span: &[Rgb],
        universe: &mut Universe,
    ) -> Result<(), RigErrorApplyWash> {
        if span.len() != self.fixtures.len() {
            return Err(RigErrorApplyWash::WrongSpanLength {
                expected: self.fixtures.len(),
                got: span.len(),
            });
        }

        for (fixture, color) in self.fixtures.iter().zip(span.iter().rev()) {
            fixture.apply(*color, universe)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wash::wash;

    fn two_bar_chain() -> RigLayout {
        RigLayout {
            first_address: 1,
            fixtures: 16,
        }
    }

    #[test]
    fn generates_contiguous_three_slot_addresses() {
        let rig = Rig::new(two_bar_chain()).unwrap();

        let addresses: Vec<u16> = rig.fixtures().iter().map(|f| f.address()).collect();
        let expected: Vec<u16> = (0..16).map(|i| 1 + i * 3).collect();

        assert_eq!(addresses, expected);
        assert_eq!(*addresses.last().unwrap(), 46);
    }

    #[test]
    fn layout_validation() {
        assert_eq!(
            RigLayout {
                first_address: 1,
                fixtures: 0
            }
            .validate(),
            Err(RigLayoutError::NoFixtures)
        );
        assert_eq!(
            RigLayout {
                first_address: 0,
                fixtures: 1
            }
            .validate(),
            Err(RigLayoutError::AddressZero)
        );
        assert_eq!(
            RigLayout {
                first_address: 511,
                fixtures: 1
            }
            .validate(),
            Err(RigLayoutError::ExceedsUniverse {
                first: 511,
                last: 513
            })
        );
        // A fixture ending exactly on channel 512 is fine.
        assert!(RigLayout {
            first_address: 510,
            fixtures: 1
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn wash_is_applied_tail_first() {
        let rig = Rig::new(two_bar_chain()).unwrap();
        let mut universe = Universe::new();

        let left = Rgb::new(255, 0, 10);
        let right = Rgb::new(0, 255, 90);
        rig.apply_wash(&wash(left, right, rig.segment_count()), &mut universe)
            .unwrap();

        // The lowest address carries the right zone color...
        assert_eq!(universe.channel(1), Some(right.r));
        assert_eq!(universe.channel(2), Some(right.g));
        assert_eq!(universe.channel(3), Some(right.b));

        // ...and the highest address the left zone color.
        assert_eq!(universe.channel(46), Some(left.r));
        assert_eq!(universe.channel(47), Some(left.g));
        assert_eq!(universe.channel(48), Some(left.b));

        // Nothing past the chain footprint is touched.
        assert_eq!(universe.channel(49), Some(0));
    }

    #[test]
    fn rejects_mismatched_span() {
        let rig = Rig::new(two_bar_chain()).unwrap();
        let mut universe = Universe::new();

        let result = rig.apply_wash(&[Rgb::default(); 3], &mut universe);

        assert_eq!(
            result,
            Err(RigErrorApplyWash::WrongSpanLength {
                expected: 16,
                got: 3
            })
        );
    }
}
