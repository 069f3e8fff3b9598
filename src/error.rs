//! Error taxonomy for the browser glue and custom word loading.
//!
//! The pure game model never fails; everything here comes from DOM access or
//! host-provided input.

use wasm_bindgen::JsValue;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("document has no body")]
    NoBody,

    /// Canvas element or its 2d context could not be obtained.
    #[error("canvas unavailable: {0}")]
    Canvas(String),

    /// Any other DOM call that threw.
    #[error("js error: {0}")]
    Js(String),

    /// Custom text contained no usable words.
    #[error("custom text contains no words longer than one letter")]
    EmptyWordList,

    /// Tuning overrides could not be parsed.
    #[error("invalid config: {0}")]
    Config(String),
}

impl GameError {
    pub(crate) fn js(err: JsValue) -> Self {
        GameError::Js(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_readable() {
        assert_eq!(GameError::NoWindow.to_string(), "no window");
        assert_eq!(
            GameError::Canvas("2d context".into()).to_string(),
            "canvas unavailable: 2d context"
        );
        assert!(GameError::EmptyWordList.to_string().contains("no words"));
    }
}
