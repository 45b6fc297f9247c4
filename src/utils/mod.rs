// src/utils/mod.rs

pub mod html;
pub mod media;
pub mod pdf;
pub mod sampler;
