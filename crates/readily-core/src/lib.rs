#![cfg_attr(not(test), no_std)]

//! Text segmentation and RSVP playback engine for the readily reader.

extern crate alloc;

pub mod app;
pub mod content;
pub mod input;
pub mod settings;
