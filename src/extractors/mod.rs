#[cfg(feature = "soundcloud")]
pub mod embedded;
#[cfg(feature = "soundcloud")]
pub mod soundcloud;

#[cfg(feature = "soundcloud")]
pub use embedded::{Page, PageWalker, ScriptExtractor, TrackDataParser};
#[cfg(feature = "soundcloud")]
pub use soundcloud::SoundCloud;
