//! View state of the wall: placed tags for the current viewport class, the
//! keyboard cursor and the intro gate. Playback state lives in the controller.

mod model;

pub use model::App;
