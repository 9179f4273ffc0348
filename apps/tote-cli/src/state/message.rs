//! One-shot, localized failure message shown to the user.

use std::fmt;

use tote_core::{ErrorKind, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserMessage {
    pub kind: ErrorKind,
    pub text: &'static str,
}

impl UserMessage {
    pub fn new(kind: ErrorKind, locale: Locale) -> Self {
        UserMessage {
            kind,
            text: kind.message(locale),
        }
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_follows_locale() {
        let en = UserMessage::new(ErrorKind::Network, Locale::En);
        let es = UserMessage::new(ErrorKind::Network, Locale::Es);

        assert_eq!(en.kind, es.kind);
        assert_ne!(en.text, es.text);
        assert_eq!(en.to_string(), ErrorKind::Network.message(Locale::En));
    }
}
