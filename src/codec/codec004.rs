//! Codec for chunk type 4 = FLI_COLOR256.

use std::io::Write;
use byteorder::LittleEndian as LE;
use byteorder::WriteBytesExt;

use crate::{FlicError,FlicResult};
use crate::pal::{Color,NUM_COLS};
use super::{SIZE_OF_CHUNK,write_chunk};

/// Magic for a FLI_COLOR256 chunk - 256-Level Color.
///
/// The data in this chunk is organized in packets.  The first word
/// following the chunk header is a count of the number of packets in
/// the chunk.
///
/// Each packet consists of a one-byte color index skip count, a
/// one-byte color count and three bytes of color information for each
/// color defined.
///
/// At the start of the chunk, the color index is assumed to be zero.
/// Before processing any colors in a packet, the color index skip
/// count is added to the current color index.  The number of colors
/// defined in the packet is retrieved.  A zero in this byte indicates
/// 256 colors follow.  The three bytes for each color define the red,
/// green, and blue components of the color in that order.  Each
/// component can range from 0 (off) to 255 (full on).
///
/// The encoder always writes a single packet redefining the full
/// color table:
///
/// ```text
///     1                       ; one packet
///     0,0,r,g,b,...           ; skip 0, change 256
/// ```
pub const FLI_COLOR256: u16 = 4;

/// Write a single palette packet.
pub fn write_color_packet<W: Write>(skip: u8, colors: &[Color], w: &mut W)
        -> FlicResult<()> {
    if colors.len() > NUM_COLS {
        return Err(FlicError::InvalidPaletteSize(colors.len()));
    }

    w.write_u8(skip)?;
    w.write_u8((colors.len() % NUM_COLS) as u8)?;
    for c in colors {
        c.write(w)?;
    }

    Ok(())
}

/// Encode a FLI_COLOR256 chunk, including the chunk header.
///
/// The palette is padded with black up to 256 entries, so that the
/// packet always redefines the full color table.
///
/// Returns the number of bytes written.
pub fn encode_fli_color256<W: Write>(colors: &[Color], w: &mut W)
        -> FlicResult<usize> {
    if colors.len() > NUM_COLS {
        return Err(FlicError::InvalidPaletteSize(colors.len()));
    }

    let mut chunk = Vec::new();

    let count = 1;
    let nskip = 0;
    chunk.write_u16::<LE>(count)?;

    let mut full = colors.to_vec();
    full.resize(NUM_COLS, Color::new(0, 0, 0));
    write_color_packet(nskip, &full, &mut chunk)?;

    write_chunk(FLI_COLOR256, &chunk, w)?;
    Ok(SIZE_OF_CHUNK + chunk.len())
}
