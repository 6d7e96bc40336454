//! FLIC encoder implementation.

use std::io::Write;
use byteorder::LittleEndian as LE;
use byteorder::WriteBytesExt;
use log::debug;

use crate::codec::*;
use crate::errcode::{FlicError,FlicResult};
use crate::pal::Color;

/// Magic for a FLC file - Animator Pro FLC Files.
///
/// This is the main animation file format created by Animator Pro.
/// The file contains a 128-byte header, followed by one or more frame
/// chunks.
///
/// A frame chunk exists for each frame in the animation.  Each frame
/// chunk contains color palette information and/or pixel data.
///
/// A FLC file begins with a 128-byte header, described below.  All
/// lengths and offsets are in bytes.  All values stored in the header
/// fields are unsigned.
///
///   Offset | Length |   Name   | Description
///   ------:| ------:|:--------:| -----------------------------------
///        0 |      4 |   size   | The size of the entire animation file, including this file header.
///        4 |      2 |   magic  | File format identifier.  Always 0xAF12.
///        6 |      2 |  frames  | Number of frames in the FLIC.
///        8 |      2 |   width  | Screen width in pixels.
///       10 |      2 |   height | Screen height in pixels.
///       12 |      2 |   depth  | Bits per pixel (always 8).
///       14 |      2 |   flags  | Set to zero.
///       16 |      4 |   speed  | Number of milliseconds to delay between each frame during playback.
///       20 |      2 | reserved | Unused word, set to 0.
///       22 |      4 |  created | The MSDOS-formatted date and time of the file's creation.
///       26 |      4 |  creator | The serial number of the program used to create the file.
///       30 |      4 |  updated | The MSDOS-formatted date and time of the file's most recent update.
///       34 |      4 |  updater | Indicates who last updated the file.
///       38 |      2 |  aspectx | The x-axis aspect ratio at which the file was created.
///       40 |      2 |  aspecty | The y-axis aspect ratio at which the file was created.  The x:y aspect ratio is written as 1:1.
///       42 |     86 | reserved | Unused space, set to zeroes.
pub const FLIHR_MAGIC: u16 = 0xAF12;

/// Size of a FLIC file header on disk.
pub const SIZE_OF_FLIC_HEADER: usize = 128;

/// Magic for a FLIC frame - FLIC Frame Chunks.
///
/// Frame chunks contain the pixel and color data for the animation.
/// A frame chunk may contain multiple subordinate chunks, each
/// containing a different type of data for the current frame.  Each
/// frame chunk starts with a 16-byte header that describes the
/// contents of the frame:
///
///   Offset | Length |   Name   | Description
///   ------:| ------:|:--------:| -----------------------------------
///        0 |      4 |   size   | The size of the frame chunk, including this header and all subordinate chunks that follow.
///        4 |      2 |   type   | Frame chunk identifier.  Always 0xF1FA.
///        6 |      2 |  chunks  | Number of subordinate chunks in the frame chunk.
///        8 |      2 |   delay  | Per-frame delay override, in milliseconds.  Zero uses the file speed.
///       10 |      2 | reserved | Unused word, set to 0.
///       12 |      2 |   width  | Frame width override.  Zero uses the file width.
///       14 |      2 |  height  | Frame height override.  Zero uses the file height.
///
/// When the chunks count in the frame header is zero, it indicates
/// that this frame is identical to the previous frame.  This implies
/// that no change is made to the screen or color palette, but the
/// appropriate delay is still inserted during playback.
pub const FCID_FRAME: u16 = 0xF1FA;

/// Size of a FLIC frame header on disk.
pub const SIZE_OF_FLIC_FRAME: usize = 16;

/// FLIC animation encoder.
///
/// Frames are compressed and accumulated in memory.  No bytes are
/// emitted until the final write call, when the total file size and
/// frame count are known.
pub struct FlicFile {
    pal: Vec<Color>,
    next_pal: Option<Vec<Color>>,
    frames: Vec<Vec<u8>>,

    w: u16,
    h: u16,
    speed_msec: u32,
}

/*--------------------------------------------------------------*/

impl FlicFile {
    /// Allocate a new FLIC encoder.
    ///
    /// # Examples
    ///
    /// ```
    /// const SCREEN_W: u16 = 320;
    /// const SCREEN_H: u16 = 200;
    /// const SPEED_MSEC: u32 = 70;
    ///
    /// flicenc::FlicFile::new(SCREEN_W, SCREEN_H, SPEED_MSEC);
    /// ```
    pub fn new(w: u16, h: u16, speed_msec: u32)
            -> Self {
        FlicFile {
            pal: Vec::new(),
            next_pal: None,
            frames: Vec::new(),

            w: w,
            h: h,
            speed_msec: speed_msec,
        }
    }

    /// Get the FLIC width.
    pub fn width(&self) -> u16 {
        self.w
    }

    /// Get the FLIC height.
    pub fn height(&self) -> u16 {
        self.h
    }

    /// Number of milliseconds to delay between each frame during playback.
    pub fn speed_msec(&self) -> u32 {
        self.speed_msec
    }

    /// Get the number of frames supplied so far.
    pub fn frame_count(&self) -> u16 {
        self.frames.len() as u16
    }

    /// Stage a palette.
    ///
    /// No bytes are emitted; the palette takes effect on the next
    /// frame that contains pixel data.  Staging a new palette again
    /// before that frame replaces the previous staging.
    pub fn set_palette(&mut self, colors: &[Color]) {
        self.next_pal = Some(colors.to_vec());
    }

    /// Compress and append the next frame.
    ///
    /// The pixel buffer holds one palette index per pixel, row-major,
    /// and its length must be an exact multiple of the FLIC width.
    /// Pass `None` to repeat the previous frame unchanged.
    ///
    /// The first frame containing pixel data requires a staged
    /// palette; a frame following a new `set_palette` call carries a
    /// palette chunk in addition to its pixel data.
    ///
    /// # Examples
    ///
    /// ```
    /// use flicenc::{Color,FlicFile};
    ///
    /// let mut flic = FlicFile::new(2, 2, 70);
    /// flic.set_palette(&[Color::new(255, 255, 255)]);
    /// flic.add_frame(Some(&[0, 0, 0, 0])).unwrap();
    /// flic.add_frame(None).unwrap();
    /// ```
    pub fn add_frame(&mut self, image: Option<&[u8]>)
            -> FlicResult<()> {
        let mut frame = Vec::new();

        match image {
            None => {
                write_frame_chunk(&[], 0, 0, 0, &mut frame)?;
            },
            Some(image) => {
                let mut subchunks = Vec::new();

                if self.pal.is_empty() || self.next_pal.is_some() {
                    let pal = match self.next_pal.take() {
                        Some(pal) => pal,
                        None => return Err(FlicError::PaletteNotSet),
                    };

                    let mut sub = Vec::new();
                    encode_fli_color256(&pal, &mut sub)?;
                    subchunks.push(sub);
                    self.pal = pal;
                }

                let mut sub = Vec::new();
                encode_fli_brun(image, self.w as usize, &mut sub)?;
                subchunks.push(sub);

                write_frame_chunk(&subchunks, 0, 0, 0, &mut frame)?;
            },
        }

        debug!("frame {}: {} bytes", self.frames.len(), frame.len());
        self.frames.push(frame);
        Ok(())
    }

    /// Write the FLIC file: the 128-byte header, followed by every
    /// accumulated frame chunk in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use flicenc::{Color,FlicFile};
    ///
    /// let mut flic = FlicFile::new(2, 2, 70);
    /// flic.set_palette(&[Color::new(255, 255, 255)]);
    /// flic.add_frame(Some(&[0, 0, 0, 0])).unwrap();
    ///
    /// let mut out = Vec::new();
    /// flic.write(&mut out).unwrap();
    /// ```
    pub fn write<W: Write>(&self, w: &mut W)
            -> FlicResult<()> {
        self.write_flic_header(w)?;
        for frame in &self.frames {
            w.write_all(frame)?;
        }
        Ok(())
    }

    /// Write the FLC header.
    fn write_flic_header<W: Write>(&self, w: &mut W)
            -> FlicResult<()> {
        let size = self.frames.iter()
            .fold(SIZE_OF_FLIC_HEADER, |acc, frame| acc + frame.len());

        let depth = 8;
        let flags = 0;
        let created = 0;
        let creator = 0;
        let updated = 0;
        let updater = 0;
        let aspect_x = 1;
        let aspect_y = 1;

        w.write_u32::<LE>(size as u32)?;
        w.write_u16::<LE>(FLIHR_MAGIC)?;
        w.write_u16::<LE>(self.frame_count())?;
        w.write_u16::<LE>(self.w)?;
        w.write_u16::<LE>(self.h)?;
        w.write_u16::<LE>(depth)?;
        w.write_u16::<LE>(flags)?;
        w.write_u32::<LE>(self.speed_msec)?;
        w.write_all(&[0; 2])?; // reserved
        w.write_u32::<LE>(created)?;
        w.write_u32::<LE>(creator)?;
        w.write_u32::<LE>(updated)?;
        w.write_u32::<LE>(updater)?;
        w.write_u16::<LE>(aspect_x)?;
        w.write_u16::<LE>(aspect_y)?;
        w.write_all(&[0; 86])?; // reserved, incl. frame offsets

        Ok(())
    }
}

/*--------------------------------------------------------------*/

/// Compose a frame chunk from fully-serialized subchunks.
///
/// A frame with no subchunks is valid: it repeats the previous frame
/// unchanged.
///
/// Returns the number of bytes written.
pub fn write_frame_chunk<W: Write>(
        subchunks: &[Vec<u8>], delay: u16, width: u16, height: u16, w: &mut W)
        -> FlicResult<usize> {
    let mut chunk = Vec::new();

    chunk.write_u16::<LE>(subchunks.len() as u16)?;
    chunk.write_u16::<LE>(delay)?;
    chunk.write_u16::<LE>(0)?; // reserved
    chunk.write_u16::<LE>(width)?;
    chunk.write_u16::<LE>(height)?;
    for sub in subchunks {
        chunk.extend_from_slice(sub);
    }

    write_chunk(FCID_FRAME, &chunk, w)?;
    Ok(SIZE_OF_CHUNK + chunk.len())
}
