//! FLIC encoding subroutines.

macro_rules! module {
    ($e:ident) => {
        pub use self::$e::*;
        mod $e;
    };
}

use std::io::Write;
use byteorder::LittleEndian as LE;
use byteorder::WriteBytesExt;

use crate::FlicResult;

module!(codec004);
module!(codec015);

/*--------------------------------------------------------------*/

/// Result of a GroupByX operation: a grouping type, start index, and
/// length.
#[derive(Clone,Copy,Debug,Eq,PartialEq)]
enum Group {
    Same(usize, usize),
    Diff(usize, usize),
}

/// An iterator that groups the buffer into packets of the same value.
///
/// This is suitable for compressing memset/memcpy type codecs,
/// e.g. FLI_BRUN.
struct GroupByValue<'a> {
    buf: &'a [u8],
    idx: usize,
}

/*--------------------------------------------------------------*/

/// Size of a chunk header on disk.
///
/// Each data chunk within a frame chunk is formatted as follows:
///
///   Offset | Length | Name | Description
///   ------:| ------:|:----:| ---------------------------------------
///        0 |      4 | size | The size of the chunk, including this header.
///        4 |      2 | type | Data type identifier.
///        6 | size-6 | data | The color or pixel data.
///
/// The type values in the chunk headers indicate what type of
/// graphics data the chunk contains and which compression method was
/// used to encode the data.
pub const SIZE_OF_CHUNK: usize = 6;

/// Write a chunk header followed by the chunk data.
pub fn write_chunk<W: Write>(magic: u16, data: &[u8], w: &mut W)
        -> FlicResult<()> {
    w.write_u32::<LE>((SIZE_OF_CHUNK + data.len()) as u32)?;
    w.write_u16::<LE>(magic)?;
    w.write_all(data)?;
    Ok(())
}

/*--------------------------------------------------------------*/

impl<'a> GroupByValue<'a> {
    /// Create a new GroupByValue iterator.
    fn new(buf: &'a [u8]) -> Self {
        GroupByValue {
            buf: buf,
            idx: 0,
        }
    }
}

impl<'a> Iterator for GroupByValue<'a> {
    type Item = Group;

    /// Advances the iterator and returns the next value.
    fn next(&mut self) -> Option<Group> {
        let len = self.buf.len();
        let start = self.idx;
        let mut i = self.idx;

        if i >= len {
            return None;
        } else {
            let c = self.buf[self.idx];
            while (i < len) && (self.buf[i] == c) {
                i = i + 1;
            }

            let n = i - self.idx;
            self.idx = i;
            return Some(Group::Same(start, n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Group,GroupByValue,write_chunk};

    #[test]
    fn test_group_by_value() {
        let xs = [ 1, 1, 3, 4, 4, 4, 4, 7, 7 ];
        let expected = [
            Group::Same(0, 2), Group::Same(2, 1), Group::Same(3, 4), Group::Same(7, 2) ];

        let gs: Vec<Group>
            = GroupByValue::new(&xs).collect();

        assert_eq!(&gs[..], expected);
    }

    #[test]
    fn test_write_chunk() {
        let expected = [
            9, 0, 0, 0,     // size 9
            0x0F, 0,        // type 15
            1, 2, 3 ];

        let mut enc = Vec::new();
        let res = write_chunk(0x0F, &[1, 2, 3], &mut enc);
        assert!(res.is_ok());
        assert_eq!(&enc[..], &expected[..]);
    }
}
