use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    pub fn flat_u8(&self) -> Vec<u8> {
        vec![self.r, self.g, self.b]
    }

    /// Builds a color from wider channel values, clamping each into 0..=255.
    pub fn from_channels(r: i64, g: i64, b: i64) -> Rgb {
        Rgb {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }
}

impl From<&[u8]> for Rgb {
    fn from(value: &[u8]) -> Rgb {
        let r = *value.get(0).unwrap_or(&0);
        let g = *value.get(1).unwrap_or(&0);
        let b = *value.get(2).unwrap_or(&0);

        Rgb { r, g, b }
    }
}
