//! Task images: OpenAI image generation with a placeholder fallback

mod cache;
mod category;
pub mod client;
mod service;

pub use cache::ImageCache;
pub use category::{Category, fallback_image_url};
pub use client::{ImageClient, OpenAIImageClient};
pub use service::{ImageResult, ImageService};
