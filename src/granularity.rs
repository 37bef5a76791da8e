//! Time granularities for arrival bucketing
//!
//! The set and its order are fixed: second, minute, hour, day. Each
//! granularity scales a second-resolution timestamp by true division, so
//! coarser keys keep their fractional part.

use std::fmt;

/// A time scale used to group raw second timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Second,
    Minute,
    Hour,
    Day,
}

impl Granularity {
    /// All granularities in rendering order (row-major in the 2x2 grid)
    pub const ALL: [Granularity; 4] = [
        Granularity::Second,
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
    ];

    /// Number of seconds in one unit of this granularity
    pub fn divisor(self) -> f64 {
        match self {
            Granularity::Second => 1.0,
            Granularity::Minute => 60.0,
            Granularity::Hour => 3_600.0,
            Granularity::Day => 86_400.0,
        }
    }

    /// Scale a timestamp (seconds) into this granularity's unit
    pub fn scale(self, seconds: u64) -> f64 {
        seconds as f64 / self.divisor()
    }

    /// Display name, capitalized ("Second", "Minute", ...)
    pub fn name(self) -> &'static str {
        match self {
            Granularity::Second => "Second",
            Granularity::Minute => "Minute",
            Granularity::Hour => "Hour",
            Granularity::Day => "Day",
        }
    }

    /// Grid cell (row, column) for this granularity in the 2x2 layout
    pub fn grid_cell(self) -> (u32, u32) {
        match self {
            Granularity::Second => (0, 0),
            Granularity::Minute => (0, 1),
            Granularity::Hour => (1, 0),
            Granularity::Day => (1, 1),
        }
    }

    /// X axis title, e.g. "Time (minute)"
    pub fn axis_label(self) -> String {
        format!("Time ({})", self.name().to_lowercase())
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
