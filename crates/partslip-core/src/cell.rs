//! Compact schedule cell decoding.
//!
//! A cell reads `<slot> <name>` or `<slot> <name> / <assistant>`. Anything
//! else decodes to `None` and is dropped by the extractor. A paired cell
//! with a blank first name (`4 / Bob`) is kept with an empty participant.

use crate::models::AssignmentFragment;

const PAIR_DELIMITER: char = '/';

pub fn decode(cell: &str) -> Option<AssignmentFragment> {
    let cell = cell.trim();
    let digits_end = cell
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(cell.len());
    if digits_end == 0 {
        return None;
    }

    let (digits, rest) = cell.split_at(digits_end);
    // The slot number must be followed by whitespace, not glued to the name
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let slot_number: u32 = digits.parse().ok()?;
    let remainder = rest.trim();
    if remainder.is_empty() {
        return None;
    }

    let (participant, co_participant) = if remainder.contains(PAIR_DELIMITER) {
        let mut names = remainder.split(PAIR_DELIMITER).map(str::trim);
        let participant = names.next().unwrap_or_default();
        let co_participant = names.next().filter(|name| !name.is_empty());
        (participant, co_participant)
    } else {
        (remainder, None)
    };

    if participant.is_empty() && co_participant.is_none() {
        return None;
    }

    Some(AssignmentFragment {
        slot_number,
        participant: participant.to_string(),
        co_participant: co_participant.map(str::to_string),
    })
}
