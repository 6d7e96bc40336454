//! This crate provides routines for encoding
//! Autodesk Animator Pro FLC files.
//!
//! Frames are supplied as indexed pixel buffers together with a
//! 256-color palette; the encoder compresses them with byte run
//! length compression and assembles the chunk stream in memory.

pub use crate::errcode::FlicError;
pub use crate::errcode::FlicResult;
pub use crate::flic::FlicFile;
pub use crate::pal::Color;

pub mod codec;
pub mod errcode;
pub mod flic;
pub mod pal;
