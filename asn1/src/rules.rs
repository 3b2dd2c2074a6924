/// The encoding discipline applied to a whole value tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rules {
    /// Basic Encoding Rules, streaming flavour.
    ///
    /// Constructed values use the indefinite length form and are closed
    /// with end-of-contents octets. SET keeps insertion order and OCTET
    /// STRING is written as a constructed series of chunks.
    Ber,
    /// Distinguished Encoding Rules.
    ///
    /// Definite lengths only, SET elements sorted by their encoding,
    /// primitive OCTET STRING. The output is byte-for-byte reproducible.
    #[default]
    Der,
}

impl Rules {
    pub fn is_canonical(self) -> bool {
        matches!(self, Rules::Der)
    }

    pub fn is_indefinite(self) -> bool {
        matches!(self, Rules::Ber)
    }
}
