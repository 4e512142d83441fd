//! Cycle identifiers — unique within one running process.
//!
//! A [`CycleId`] is a fixed-width, 36-character Crockford base32 token made of
//! three concatenated parts:
//!
//! | chars  | bits | content                                              |
//! |--------|------|------------------------------------------------------|
//! | 0..10  | 50   | milliseconds since the Unix epoch, never decreasing  |
//! | 10..23 | 64   | random entropy                                       |
//! | 23..36 | 64   | process-wide sequence number                         |
//!
//! The sequence number alone guarantees uniqueness inside a process, even
//! when the clock stalls or steps backwards. Nothing guarantees uniqueness
//! across processes or restarts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const TIME_LEN: usize = 10;
const ENTROPY_LEN: usize = 13;
const SEQUENCE_LEN: usize = 13;
const ID_LEN: usize = TIME_LEN + ENTROPY_LEN + SEQUENCE_LEN;

/// Process-wide generator backing [`CycleId::generate`].
static PROCESS_IDS: CycleIdGenerator = CycleIdGenerator::new();

/// An opaque, process-unique identifier for one heartbeat cycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CycleId(String);

impl CycleId {
    /// Generate a new id from the process-wide generator.
    pub fn generate() -> Self {
        PROCESS_IDS.next_id()
    }

    fn from_parts(timestamp_ms: u64, entropy: u64, sequence: u64) -> Self {
        let mut buf = String::with_capacity(ID_LEN);
        encode_into(&mut buf, timestamp_ms, TIME_LEN);
        encode_into(&mut buf, entropy, ENTROPY_LEN);
        encode_into(&mut buf, sequence, SEQUENCE_LEN);
        Self(buf)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The millisecond timestamp embedded in this id.
    pub fn timestamp_ms(&self) -> u64 {
        // Validated at construction; the 10-char field cannot exceed u64.
        decode(&self.0[..TIME_LEN]).unwrap_or_default()
    }

    /// The process sequence number embedded in this id.
    pub fn sequence(&self) -> u64 {
        decode(&self.0[TIME_LEN + ENTROPY_LEN..]).unwrap_or_default()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CycleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || s.len() != ID_LEN {
            return Err(Error::InvalidCycleId(format!(
                "expected {ID_LEN} ASCII characters, got {}",
                s.len()
            )));
        }
        let time = &s[..TIME_LEN];
        let entropy = &s[TIME_LEN..TIME_LEN + ENTROPY_LEN];
        let sequence = &s[TIME_LEN + ENTROPY_LEN..];
        for part in [time, entropy, sequence] {
            if decode(part).is_none() {
                return Err(Error::InvalidCycleId(format!("malformed segment '{part}'")));
            }
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for CycleId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CycleId> for String {
    fn from(id: CycleId) -> Self {
        id.0
    }
}

/// Hands out [`CycleId`]s; safe to share between threads.
///
/// Both the clock floor and the sequence counter are atomics, so concurrent
/// callers never observe the same sequence number.
#[derive(Debug)]
pub struct CycleIdGenerator {
    last_ms: AtomicU64,
    counter: AtomicU64,
}

impl CycleIdGenerator {
    pub const fn new() -> Self {
        Self {
            last_ms: AtomicU64::new(0),
            counter: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> CycleId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.next_id_at(now_ms)
    }

    fn next_id_at(&self, now_ms: u64) -> CycleId {
        // A clock that steps backwards keeps reporting the latest value seen.
        let previous = self.last_ms.fetch_max(now_ms, Ordering::AcqRel);
        let timestamp_ms = previous.max(now_ms);
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        CycleId::from_parts(timestamp_ms, rand::random::<u64>(), sequence)
    }
}

impl Default for CycleIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_into(buf: &mut String, mut value: u64, width: usize) {
    let mut chars = vec![b'0'; width];
    for slot in chars.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1f) as usize];
        value >>= 5;
    }
    buf.extend(chars.into_iter().map(char::from));
}

fn decode(segment: &str) -> Option<u64> {
    let mut acc: u128 = 0;
    for b in segment.bytes() {
        let digit = ALPHABET.iter().position(|&a| a == b)?;
        acc = (acc << 5) | digit as u128;
    }
    u64::try_from(acc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn ids_are_fixed_width_crockford() {
        let id = CycleId::generate();
        assert_eq!(id.as_str().len(), ID_LEN);
        assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn parts_roundtrip_through_decoders() {
        let id = CycleId::from_parts(1_700_000_000_123, u64::MAX, 42);
        assert_eq!(id.timestamp_ms(), 1_700_000_000_123);
        assert_eq!(id.sequence(), 42);
    }

    #[test]
    fn sequential_ids_within_one_millisecond_are_distinct() {
        let generator = CycleIdGenerator::new();
        let ids: HashSet<CycleId> = (0..10_000).map(|_| generator.next_id_at(1_000)).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn sequence_strictly_increases() {
        let generator = CycleIdGenerator::new();
        let a = generator.next_id_at(5);
        let b = generator.next_id_at(5);
        assert!(b.sequence() > a.sequence());
    }

    #[test]
    fn clock_going_backwards_is_clamped() {
        let generator = CycleIdGenerator::new();
        let first = generator.next_id_at(2_000);
        let second = generator.next_id_at(1_500);
        assert_eq!(first.timestamp_ms(), 2_000);
        assert_eq!(second.timestamp_ms(), 2_000);
        assert_ne!(first, second);
    }

    #[test]
    fn concurrent_generation_never_collides() {
        let generator = Arc::new(CycleIdGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || {
                    (0..1_000).map(|_| generator.next_id_at(7)).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        let mut sequences = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(sequences.insert(id.sequence()));
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 8_000);
    }

    #[test]
    fn parse_accepts_generated_ids() {
        let id = CycleId::generate();
        let parsed: CycleId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!("short".parse::<CycleId>().is_err());
        // 'U' is not in the Crockford alphabet
        let bad = "U".repeat(ID_LEN);
        assert!(bad.parse::<CycleId>().is_err());
        // top sequence digit overflows 64 bits
        let overflow = format!("{}{}", "0".repeat(TIME_LEN + ENTROPY_LEN), "Z".repeat(SEQUENCE_LEN));
        assert!(overflow.parse::<CycleId>().is_err());
    }

    #[test]
    fn serde_uses_plain_string() {
        let id = CycleId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: CycleId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<CycleId>("\"nope\"").is_err());
    }
}
