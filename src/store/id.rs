//! Identifier formats
//!
//! The store decides what a well-formed id looks like and how new ids are
//! minted. Callers validate raw ids through [`IdFormat::parse`] before they
//! reach a driver.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentId;
use super::errors::{DriverError, DriverResult};

const OBJECT_ID_HEX_LEN: usize = 24;
const OPAQUE_MAX_LEN: usize = 128;

/// Identifier format enforced by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdFormat {
    /// 12-byte ObjectId rendered as 24 lowercase hex digits
    #[default]
    ObjectId,
    /// RFC 4122 UUID
    Uuid,
    /// Any short token without separators or whitespace
    Opaque,
}

impl IdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdFormat::ObjectId => "object_id",
            IdFormat::Uuid => "uuid",
            IdFormat::Opaque => "opaque",
        }
    }

    /// Validate a raw identifier against this format
    pub fn parse(&self, raw: &str) -> DriverResult<DocumentId> {
        match self {
            IdFormat::ObjectId => {
                if raw.len() != OBJECT_ID_HEX_LEN {
                    return Err(DriverError::invalid_id(
                        raw,
                        format!("expected {} hex digits, got {}", OBJECT_ID_HEX_LEN, raw.len()),
                    ));
                }
                if !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(DriverError::invalid_id(raw, "expected hex digits only"));
                }
                Ok(DocumentId::new(raw.to_ascii_lowercase()))
            }
            IdFormat::Uuid => Uuid::parse_str(raw)
                .map(|uuid| DocumentId::new(uuid.to_string()))
                .map_err(|e| DriverError::invalid_id(raw, e.to_string())),
            IdFormat::Opaque => {
                if raw.is_empty() {
                    return Err(DriverError::invalid_id(raw, "id must not be empty"));
                }
                if raw.chars().count() > OPAQUE_MAX_LEN {
                    return Err(DriverError::invalid_id(
                        raw,
                        format!("id longer than {} characters", OPAQUE_MAX_LEN),
                    ));
                }
                if raw.chars().any(|c| c == '/' || c.is_whitespace()) {
                    return Err(DriverError::invalid_id(
                        raw,
                        "id must not contain '/' or whitespace",
                    ));
                }
                Ok(DocumentId::new(raw))
            }
        }
    }

    /// Mint a fresh identifier in this format
    pub fn generate(&self) -> DocumentId {
        match self {
            IdFormat::ObjectId => DocumentId::new(next_object_id()),
            IdFormat::Uuid => DocumentId::new(Uuid::new_v4().to_string()),
            IdFormat::Opaque => DocumentId::new(Uuid::new_v4().simple().to_string()),
        }
    }
}

/// Per-process ObjectId state: 5 random bytes and a random counter seed
struct ObjectIdState {
    process: [u8; 5],
    counter: AtomicU32,
}

fn object_id_state() -> &'static ObjectIdState {
    static STATE: OnceLock<ObjectIdState> = OnceLock::new();
    STATE.get_or_init(|| {
        let mut rng = rand::thread_rng();
        ObjectIdState {
            process: rng.gen(),
            counter: AtomicU32::new(rng.gen_range(0..0x0100_0000)),
        }
    })
}

/// 4-byte big-endian seconds, 5 process bytes, 3-byte big-endian counter
fn next_object_id() -> String {
    let state = object_id_state();
    let seconds = Utc::now().timestamp() as u32;
    let counter = state.counter.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    bytes[4..9].copy_from_slice(&state.process);
    bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

    let mut hex = String::with_capacity(OBJECT_ID_HEX_LEN);
    for byte in bytes {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
