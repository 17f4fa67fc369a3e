use super::{max_length, require, FieldErrors};
use crate::entities::message::MAX_TEXT_LEN;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
}

impl MessageForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        require(&mut errors, "text", &self.text);
        max_length(&mut errors, "text", &self.text, MAX_TEXT_LEN);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text_bounds() {
        let ok = MessageForm { text: "Hello".to_string() };
        assert!(ok.validate().is_ok());

        let blank = MessageForm { text: "   ".to_string() };
        assert_eq!(blank.validate().unwrap_err().get("text").len(), 1);

        let long = MessageForm { text: "x".repeat(MAX_TEXT_LEN + 1) };
        assert!(long.validate().is_err());

        let exact = MessageForm { text: "x".repeat(MAX_TEXT_LEN) };
        assert!(exact.validate().is_ok());
    }
}
