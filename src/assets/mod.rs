//! Asset lookup for number images, sounds and the background

pub mod resolver;

pub use resolver::{AssetResolver, BACKGROUND_IMAGE, image_name, sound_name};
