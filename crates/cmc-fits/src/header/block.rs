//! Header and data block layout.
//!
//! FITS files are sequences of 2880-byte blocks (36 cards). Headers are padded
//! with blank cards, data with zero bytes.

use crate::error::{FitsError, Result};

use super::card::{CARD_LEN, Card, build_card, parse_card};
use super::Header;

/// Block length in bytes.
pub const BLOCK_LEN: usize = 2880;

/// Cards per header block.
pub const CARDS_PER_BLOCK: usize = BLOCK_LEN / CARD_LEN;

/// Round a byte length up to a whole number of blocks.
#[must_use]
pub fn align_to_block(len: usize) -> usize {
    len.div_ceil(BLOCK_LEN) * BLOCK_LEN
}

/// Encode a header followed by `END`, padded with blank cards.
pub fn build_header_block(header: &Header) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(align_to_block((header.len() + 1) * CARD_LEN));
    for card in header.cards() {
        out.extend_from_slice(&build_card(card)?);
    }
    out.extend_from_slice(&build_card(&Card::End)?);
    out.resize(align_to_block(out.len()), b' ');
    Ok(out)
}

/// Parse the header starting at `offset`.
///
/// # Returns
/// The header (without its `END` card) and the offset of the block that
/// follows it.
pub fn parse_header_block(data: &[u8], offset: usize) -> Result<(Header, usize)> {
    let mut header = Header::new();
    let mut pos = offset;
    let mut index = 0usize;

    loop {
        let record = data
            .get(pos..pos + CARD_LEN)
            .ok_or(FitsError::MissingEnd { offset })?;
        match parse_card(record, index)? {
            Card::End => break,
            // Blank padding cards carry nothing.
            Card::Commentary { keyword, text } if keyword.is_empty() && text.is_empty() => {}
            card => header.push(card),
        }
        pos += CARD_LEN;
        index += 1;
    }

    Ok((header, offset + align_to_block(pos + CARD_LEN - offset)))
}
