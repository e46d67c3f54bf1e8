//! Render-facing seam
//!
//! The simulation never draws. This module turns a session snapshot into a
//! list of sprites for whatever backend the game runs on, looking textures up
//! through an injected [`SpriteProvider`].

pub mod instance;
pub mod sprites;

pub use instance::SpriteInstance;
pub use sprites::{SpriteDraw, SpriteProvider, sprite_batch};
