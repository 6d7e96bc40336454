//! Codec for chunk type 15 = FLI_BRUN.

use std::cmp::min;
use std::io::Write;
use byteorder::WriteBytesExt;
use log::warn;

use crate::{FlicError,FlicResult};
use super::{Group,GroupByValue,SIZE_OF_CHUNK,write_chunk};

/// Magic for a FLI_BRUN chunk - Byte Run Length Compression.
///
/// This chunk contains the entire image in a compressed format.
/// Usually this chunk is used in the first frame of an animation.
///
/// The data is organized in lines.  Each line contains packets of
/// compressed pixels.  The first line is at the top of the animation,
/// followed by subsequent lines moving downward.  The number of lines
/// in this chunk is given by the height of the animation.
///
/// The first byte of each line is a count of packets in the line.
/// This value is ignored, it is a holdover from the original
/// Animator.  It is possible to generate more than 255 packets on a
/// line.  The width of the animation is now used to drive the
/// decoding of packets on a line; continue reading and processing
/// packets until width pixels have been processed, then proceed to
/// the next line.
///
/// Each packet consist of a type/size byte, followed by one or more
/// pixels.  If the packet type is negative it is a count of pixels to
/// be copied from the packet to the animation image.  If the packet
/// type is positive it contains a single pixel which is to be
/// replicated; the absolute value of the packet type is the number of
/// times the pixel is to be replicated.
pub const FLI_BRUN: u16 = 15;

/// Encode one line of pixels as FLI_BRUN packets.
///
/// Returns the number of packets written.
pub fn encode_rle<W: Write>(buf: &[u8], w: &mut W)
        -> FlicResult<usize> {
    // Dummy initial state.
    let mut state = Group::Same(0, 0);
    let mut count = 0;

    for g in GroupByValue::new(buf) {
        // A lone pixel is never worth a replicate packet.
        let g = match g {
            Group::Same(idx, 1) => Group::Diff(idx, 1),
            g => g,
        };

        if let Some(new_state) = combine_packets(state, g) {
            state = new_state;
        } else {
            count = write_packet(state, count, buf, w)?;
            state = g;
        }
    }

    count = write_packet(state, count, buf, w)?;

    Ok(count)
}

/// Encode a FLI_BRUN chunk, including the chunk header.
///
/// The pixel buffer length must be an exact multiple of the line
/// length.  Lines that compress to more than 255 packets store a
/// packet count of 0; the stored count cannot represent them, and
/// decoders run on the animation width instead.
///
/// Returns the number of bytes written.
pub fn encode_fli_brun<W: Write>(next: &[u8], line_len: usize, w: &mut W)
        -> FlicResult<usize> {
    if line_len == 0 || next.len() % line_len != 0 {
        return Err(FlicError::LineLengthMismatch);
    }

    let mut chunk = Vec::new();

    for (y, line) in next.chunks(line_len).enumerate() {
        let mut packed = Vec::new();
        let count = encode_rle(line, &mut packed)?;

        if count <= u8::MAX as usize {
            chunk.write_u8(count as u8)?;
        } else {
            warn!("line {}: {} packets do not fit in the count byte, storing 0",
                    y, count);
            chunk.write_u8(0)?;
        }

        chunk.extend_from_slice(&packed);
    }

    write_chunk(FLI_BRUN, &chunk, w)?;
    Ok(SIZE_OF_CHUNK + chunk.len())
}

fn combine_packets(s0: Group, s1: Group)
        -> Option<Group> {
    match (s0, s1) {
        // Initialisation only.
        (Group::Same(0, 0), _) => Some(s1),

        // Memcpy: length (1) + data (a)
        // Memcpy: data (b)
        (Group::Diff(idx, a), Group::Diff(_, b)) => Some(Group::Diff(idx, a + b)),

        _ => None,
    }
}

fn write_packet<W: Write>(
        g: Group, count: usize, buf: &[u8], w: &mut W)
        -> FlicResult<usize> {
    let max = i8::MAX as usize;
    let mut count = count;
    match g {
        Group::Same(idx, mut len) => {
            while len > 0 {
                let l = min(len, max);
                w.write_i8(l as i8)?;
                w.write_u8(buf[idx])?;

                len = len - l;
                count = count + 1;
            }
        },
        Group::Diff(mut idx, mut len) => {
            while len > 0 {
                let l = min(len, max);
                w.write_i8(-(l as i8))?;
                w.write_all(&buf[idx..(idx + l)])?;

                idx = idx + l;
                len = len - l;
                count = count + 1;
            }
        },
    }

    Ok(count)
}


#[cfg(test)]
mod tests {
    use crate::FlicError;
    use super::*;

    /// Expand packets back into pixels, one line's worth.
    fn decode_rle(src: &[u8], width: usize) -> Vec<u8> {
        let mut out = Vec::new();
        let mut i = 0;

        while out.len() < width {
            let signed_length = src[i] as i8 as i32;
            i = i + 1;

            if signed_length >= 0 {
                let c = src[i];
                i = i + 1;
                for _ in 0..signed_length {
                    out.push(c);
                }
            } else {
                let n = (-signed_length) as usize;
                out.extend_from_slice(&src[i..(i + n)]);
                i = i + n;
            }
        }

        assert_eq!(i, src.len());
        out
    }

    #[test]
    fn test_encode_rle_empty() {
        let mut enc = Vec::new();
        let count = encode_rle(&[], &mut enc).expect("count");
        assert_eq!(count, 0);
        assert_eq!(enc.len(), 0);
    }

    #[test]
    fn test_encode_rle_single_pixel() {
        let expected = [
            (-1i8) as u8,   // length -1
            0xAB ];

        let mut enc = Vec::new();
        let count = encode_rle(&[0xAB], &mut enc).expect("count");
        assert_eq!(count, 1);
        assert_eq!(&enc[..], &expected[..]);
    }

    #[test]
    fn test_encode_rle_replicate() {
        let src = [0xAB, 0xAB, 0xAB, 0xAB, 0xAB, 0xAB, 0xAB];

        let expected = [
            7,          // length 7
            0xAB ];

        let mut enc = Vec::new();
        let count = encode_rle(&src, &mut enc).expect("count");
        assert_eq!(count, 1);
        assert_eq!(&enc[..], &expected[..]);
    }

    #[test]
    fn test_encode_rle_literal() {
        let src = [0x01, 0x23, 0x45, 0x67, 0x89];

        let expected = [
            (-5i8) as u8,   // length -5
            0x01, 0x23, 0x45, 0x67, 0x89 ];

        let mut enc = Vec::new();
        let count = encode_rle(&src, &mut enc).expect("count");
        assert_eq!(count, 1);
        assert_eq!(&enc[..], &expected[..]);
    }

    #[test]
    fn test_encode_rle_mixed() {
        let src = [
            0xAB, 0xAB, 0xAB,
            0x01, 0x23, 0x45, 0x67, 0x89,
            0xCD, 0xCD ];

        let expected = [
            3,          // length 3
            0xAB,
            (-5i8) as u8,   // length -5
            0x01, 0x23, 0x45, 0x67, 0x89,
            2,          // length 2
            0xCD ];

        let mut enc = Vec::new();
        let count = encode_rle(&src, &mut enc).expect("count");
        assert_eq!(count, 3);
        assert_eq!(&enc[..], &expected[..]);
    }

    /// Runs longer than 127 pixels must close the packet and open a
    /// new one; the count byte is signed.
    #[test]
    fn test_encode_rle_long_replicate() {
        let src = [0x55; 300];

        let expected = [
            127,  0x55, // length 127
            127,  0x55, // length 127
            46,   0x55 ];   // length 46

        let mut enc = Vec::new();
        let count = encode_rle(&src, &mut enc).expect("count");
        assert_eq!(count, 3);
        assert_eq!(&enc[..], &expected[..]);
    }

    #[test]
    fn test_encode_rle_long_literal() {
        let src: Vec<u8> = (0u32..130).map(|n| n as u8).collect();

        let mut enc = Vec::new();
        let count = encode_rle(&src, &mut enc).expect("count");
        assert_eq!(count, 2);

        assert_eq!(enc[0], (-127i8) as u8);
        assert_eq!(&enc[1..128], &src[0..127]);
        assert_eq!(enc[128], (-3i8) as u8);
        assert_eq!(&enc[129..132], &src[127..130]);
        assert_eq!(enc.len(), 132);
    }

    #[test]
    fn test_encode_rle_round_trip() {
        let replicate_heavy: Vec<u8> = [
            &[0x00; 130][..], &[0x01; 4][..], &[0x02; 200][..],
            &[0x03][..], &[0x04; 2][..] ].concat();
        let literal_heavy: Vec<u8> = (0u32..999).map(|n| (n % 251) as u8).collect();

        for src in [&replicate_heavy, &literal_heavy] {
            let mut enc = Vec::new();
            encode_rle(src, &mut enc).expect("count");
            assert_eq!(&decode_rle(&enc, src.len())[..], &src[..]);
        }
    }

    #[test]
    fn test_encode_fli_brun() {
        let src = [
            0, 0,
            0, 0 ];

        let expected = [
            12, 0, 0, 0,    // size 12
            0x0F, 0,        // type 15
            1,          // line 0: count 1
            2,    0,    // length 2
            1,          // line 1: count 1
            2,    0 ];  // length 2

        let mut enc = Vec::new();
        let res = encode_fli_brun(&src, 2, &mut enc);
        assert_eq!(res.expect("size"), expected.len());
        assert_eq!(&enc[..], &expected[..]);
    }

    #[test]
    fn test_encode_fli_brun_bad_line_length() {
        let mut enc = Vec::new();
        match encode_fli_brun(&[1, 2, 3], 2, &mut enc) {
            Err(FlicError::LineLengthMismatch) => (),
            _ => panic!("expected LineLengthMismatch"),
        }
        assert_eq!(enc.len(), 0);

        match encode_fli_brun(&[1, 2, 3], 0, &mut enc) {
            Err(FlicError::LineLengthMismatch) => (),
            _ => panic!("expected LineLengthMismatch"),
        }
    }

    /// A line of 256 two-pixel runs produces 256 packets; the count
    /// byte cannot hold that, and 0 is stored instead.
    #[test]
    fn test_encode_fli_brun_packet_count_overflow() {
        let mut src = Vec::new();
        for n in 0u32..256 {
            let c = if n % 2 == 0 { 0x00 } else { 0xFF };
            src.push(c);
            src.push(c);
        }

        let mut enc = Vec::new();
        let size = encode_fli_brun(&src, src.len(), &mut enc).expect("size");
        assert_eq!(size, SIZE_OF_CHUNK + 1 + 2 * 256);

        assert_eq!(enc[6], 0);          // count stored as 0
        assert_eq!(&enc[7..9], [2, 0x00]);  // packets are still intact
        assert_eq!(&decode_rle(&enc[7..], src.len())[..], &src[..]);
    }
}
