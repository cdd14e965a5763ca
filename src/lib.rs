//! Message compose editor with a signature picker.
//!
//! The crate targets `wasm32-unknown-unknown`. The DOM-free pieces (splicing,
//! payload parsing, panel state, geometry) also build natively so they can be
//! tested with plain `cargo test`.

pub mod app;
pub mod config;
pub mod dropdown;
pub mod loader;
pub mod locator;
pub mod overlay;
pub mod signature_editor;
pub mod signatures;
pub mod splice;
pub mod tinymce;

pub use config::{EditorSettings, MessageKind};
pub use signature_editor::SignatureEditor;
pub use signatures::Signature;
pub use splice::SignatureChoice;
