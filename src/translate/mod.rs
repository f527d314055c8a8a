//! Translation stage.

#[cfg(feature = "offline-translation")]
pub mod candle_t5;
pub mod translator;

#[cfg(feature = "offline-translation")]
pub use candle_t5::CandleT5Translator;
pub use translator::{IdentityTranslator, MockTranslator, Translator};
