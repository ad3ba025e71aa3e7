//! Sequential display-ID allocation for records
//!
//! Display IDs look like `EN-000123` and are derived from the most recently
//! created record of the same kind. Allocation is read-then-increment with
//! no locking, so two concurrent creations can be handed the same ID; the
//! store does not enforce uniqueness on this column either.

use rand::Rng;
use std::fmt::Display;
use tracing::warn;

/// Prefix of energy record display IDs
pub const ENERGY_PREFIX: &str = "EN";
/// Prefix of waste record display IDs
pub const WASTE_PREFIX: &str = "WS";

const RANDOM_UPPER_BOUND: u64 = 1_000_000;

/// Format a display ID with a zero-padded six digit suffix
pub fn format_display_id(prefix: &str, number: u64) -> String {
    format!("{}-{:06}", prefix, number)
}

/// Compute the ID that follows the newest existing ID
///
/// `ids_newest_first` lists existing display IDs ordered by creation time,
/// newest first. The first one carrying `<prefix>-` decides the result;
/// with none, numbering starts at 1. Returns `None` when that ID's suffix
/// is not a decimal number.
pub fn next_display_id<'a, I>(prefix: &str, ids_newest_first: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let marker = format!("{}-", prefix);

    let latest = ids_newest_first
        .into_iter()
        .find(|id| id.starts_with(&marker));

    let next = match latest {
        None => 1,
        Some(id) => {
            let digits = &id[marker.len()..];
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse::<u64>().ok()?.checked_add(1)?
        }
    };

    Some(format_display_id(prefix, next))
}

/// A uniformly random display ID in `[0, 1_000_000)`, not checked for collisions
pub fn random_display_id<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format_display_id(prefix, rng.gen_range(0..RANDOM_UPPER_BOUND))
}

/// Allocate a display ID from the outcome of a "latest ID" lookup
///
/// A failed lookup, or a latest ID that does not parse, falls back to a
/// random ID.
pub fn allocate_display_id<E: Display>(prefix: &str, latest: Result<Option<String>, E>) -> String {
    match latest {
        Ok(latest) => match next_display_id(prefix, latest.as_deref()) {
            Some(id) => id,
            None => {
                warn!(
                    "Latest {} display ID {:?} is not sequential, using a random ID",
                    prefix, latest
                );
                random_display_id(prefix, &mut rand::thread_rng())
            }
        },
        Err(e) => {
            warn!(
                "Failed to look up latest {} display ID, using a random ID: {}",
                prefix, e
            );
            random_display_id(prefix, &mut rand::thread_rng())
        }
    }
}
