//! Raw color/proximity readings
//!
//! A sample is taken once per tick by the driver layer and handed to the
//! intake as an immutable snapshot.

/// One reading of the color/proximity sensor
///
/// Proximity grows as the object gets closer (2047 is touching). Color
/// channels are raw 20-bit intensities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSensorSample {
    pub proximity: u32,
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub infrared: u32,
}

impl RawSensorSample {
    pub const fn new(proximity: u32, red: u32, green: u32, blue: u32, infrared: u32) -> Self {
        Self {
            proximity,
            red,
            green,
            blue,
            infrared,
        }
    }
}
