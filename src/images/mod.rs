//! Generated-image persistence: originals plus bounded thumbnails

pub mod store;
