//! Terminal-independent key events consumed by the session.

/// One key press, already decoded from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Backspace,
    Delete,
    Esc,
    /// Control chord, lowercase letter (`Ctrl(c)` is Ctrl-C).
    Ctrl(char),
}

impl Key {
    /// Bytes forwarded to the runtime's stdin while an evaluation runs.
    pub fn relay_bytes(self) -> Vec<u8> {
        match self {
            Key::Enter => b"\n".to_vec(),
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                ch.encode_utf8(&mut buf).as_bytes().to_vec()
            }
            Key::Tab => b"\t".to_vec(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_payloads() {
        assert_eq!(Key::Enter.relay_bytes(), b"\n");
        assert_eq!(Key::Char('é').relay_bytes(), "é".as_bytes());
        assert!(Key::Up.relay_bytes().is_empty());
        assert!(Key::Ctrl('d').relay_bytes().is_empty());
    }
}
