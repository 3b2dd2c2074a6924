//! Encoding of constructed values: SEQUENCE, SET and implicitly tagged
//! containers.
//!
//! The same routines serve the universal containers and implicit tags
//! that splice a container's children under a different tag; only the
//! identifier octets differ.

use ber::{END_OF_CONTENTS, Length, Sink, Tag, length_octets};

use crate::encodable::Encodable;
use crate::error::Error;
use crate::rules::Rules;
use crate::Element;

/// How a container treats the order of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Insertion order, always.
    Sequence,
    /// Sorted by encoding under DER, insertion order under BER.
    Set,
}

impl Container {
    pub fn name(self) -> &'static str {
        match self {
            Container::Sequence => "SEQUENCE",
            Container::Set => "SET",
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            Container::Sequence => Tag::universal(Tag::SEQUENCE).with_constructed(true),
            Container::Set => Tag::universal(Tag::SET).with_constructed(true),
        }
    }
}

/// Bytes of framing around `content` content bytes: identifier and length
/// octets, plus end-of-contents in the indefinite form.
pub fn framing_len(tag: Tag, content: usize, rules: Rules) -> usize {
    match rules {
        Rules::Ber => tag.encoded_len() + 1 + END_OF_CONTENTS.len(),
        Rules::Der => tag.encoded_len() + length_octets(content),
    }
}

fn content_len(elements: &[Element], rules: Rules) -> usize {
    elements.iter().map(|e| e.encoded_len(rules)).sum()
}

pub fn encoded_len(tag: Tag, elements: &[Element], rules: Rules) -> usize {
    let content = content_len(elements, rules);
    framing_len(tag, content, rules) + content
}

pub fn encode(
    tag: Tag,
    container: Container,
    elements: &[Element],
    rules: Rules,
    sink: &mut dyn Sink,
) -> Result<(), Error> {
    sink.write_tag(tag.with_constructed(true));

    if rules.is_indefinite() {
        sink.write_length(Length::Indefinite);
        for element in elements {
            element.encode_to(rules, sink)?;
        }
        sink.write_end_of_contents();
        return Ok(());
    }

    sink.write_length(Length::Definite(content_len(elements, rules)));
    match container {
        Container::Set if rules.is_canonical() => {
            for encoding in canonical_order(elements)? {
                sink.write_bytes(&encoding);
            }
        }
        _ => {
            for element in elements {
                element.encode_to(rules, sink)?;
            }
        }
    }
    Ok(())
}

/// DER encodings of `elements`, sorted ascending as octet strings.
///
/// Shorter encodings sort first when one is a prefix of the other. The sort
/// is stable, so equal encodings keep their relative order.
pub fn canonical_order(elements: &[Element]) -> Result<Vec<Vec<u8>>, Error> {
    let mut encodings = elements
        .iter()
        .map(|e| e.to_vec(Rules::Der))
        .collect::<Result<Vec<_>, _>>()?;
    encodings.sort();
    Ok(encodings)
}
