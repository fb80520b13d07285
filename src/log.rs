use bracket_terminal::prelude::RGB;

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub text: String,
    pub fg: RGB,
    pub count: u32,
}

impl Message {
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Player-facing event log. Repeats of the newest message stack instead of
/// pushing a new line.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn add<S: Into<String>>(&mut self, text: S, fg: (u8, u8, u8)) {
        let text = text.into();
        let fg = RGB::named(fg);
        if let Some(last) = self.messages.last_mut() {
            if last.text == text {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message { text, fg, count: 1 });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Index of the newest message, `0` for an empty log.
    pub fn last_index(&self) -> usize {
        self.messages.len().saturating_sub(1)
    }

    #[cfg(test)]
    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(|message| message.text.as_str())
    }
}
