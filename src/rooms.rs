//! Room key convention.
//!
//! Rooms are not an entity: a room is identified by a floor digit followed
//! by a two-digit room suffix ("102" = floor 1, room 02). The building has
//! floors 1-6 with rooms 02-09 on each floor. Anything else is rejected
//! before a query is made.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const FLOOR_MIN: u8 = 1;
pub const FLOOR_MAX: u8 = 6;
pub const ROOM_MIN: u8 = 2;
pub const ROOM_MAX: u8 = 9;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RoomNumberError {
    #[error("room number must be three digits, got '{0}'")]
    Malformed(String),

    #[error("floor {0} is out of range {FLOOR_MIN}-{FLOOR_MAX}")]
    FloorOutOfRange(u8),

    #[error("room {0:02} is out of range {ROOM_MIN:02}-{ROOM_MAX:02}")]
    RoomOutOfRange(u8),
}

/// A validated room key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomNumber {
    floor: u8,
    room: u8,
}

impl RoomNumber {
    pub fn new(floor: u8, room: u8) -> Result<Self, RoomNumberError> {
        if !(FLOOR_MIN..=FLOOR_MAX).contains(&floor) {
            return Err(RoomNumberError::FloorOutOfRange(floor));
        }
        if !(ROOM_MIN..=ROOM_MAX).contains(&room) {
            return Err(RoomNumberError::RoomOutOfRange(room));
        }
        Ok(Self { floor, room })
    }

    pub fn floor(&self) -> u8 {
        self.floor
    }

    pub fn room(&self) -> u8 {
        self.room
    }

    /// Every valid room in floor-then-room order.
    pub fn all() -> impl Iterator<Item = RoomNumber> {
        (FLOOR_MIN..=FLOOR_MAX).flat_map(|floor| {
            (ROOM_MIN..=ROOM_MAX).map(move |room| RoomNumber { floor, room })
        })
    }
}

impl Display for RoomNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:02}", self.floor, self.room)
    }
}

impl FromStr for RoomNumber {
    type Err = RoomNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| RoomNumberError::Malformed(s.to_string()))?;
        if digits.len() != 3 {
            return Err(RoomNumberError::Malformed(s.to_string()));
        }
        RoomNumber::new(digits[0], digits[1] * 10 + digits[2])
    }
}

impl Serialize for RoomNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoomNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
