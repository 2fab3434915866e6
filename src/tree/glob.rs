// Restricted glob used for node labels. `*` matches any run of characters,
// including none; everything else matches itself. Matches are anchored at
// both ends, so `*.txt` matches `note.txt` but not `note.txtx`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    // Literal pieces between wildcards. A pattern without `*` has exactly one
    // piece; `wildcard` is false only for that case.
    pieces: Vec<String>,
    wildcard: bool,
}

impl Pattern {
    pub fn new(pattern: &str) -> Pattern {
        let pieces: Vec<String> = pattern.split('*').map(str::to_string).collect();
        let wildcard = pieces.len() > 1;
        Pattern { pieces, wildcard }
    }

    /// A pattern matching `name` exactly, with `*` taken literally.
    pub fn literal(name: &str) -> Pattern {
        Pattern {
            pieces: vec![name.to_string()],
            wildcard: false,
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        if !self.wildcard {
            return self.pieces[0] == key;
        }

        let first = &self.pieces[0];
        let last = &self.pieces[self.pieces.len() - 1];
        if first.len() + last.len() > key.len() {
            return false;
        }
        if !key.starts_with(first.as_str()) || !key.ends_with(last.as_str()) {
            return false;
        }

        // Middle pieces must appear in order within the window left between
        // the anchored prefix and suffix. Leftmost placement is always safe.
        let mut window = &key[first.len()..key.len() - last.len()];
        for piece in &self.pieces[1..self.pieces.len() - 1] {
            match window.find(piece.as_str()) {
                Some(idx) => window = &window[idx + piece.len()..],
                None => return false,
            }
        }
        true
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Self {
        Pattern::new(pattern)
    }
}
