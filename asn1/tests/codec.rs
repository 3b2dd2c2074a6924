use asn1::{
    BitString, Container, Element, Encodable, Error, Integer, OCTET_STRING_CHUNK_SIZE,
    ObjectIdentifier, OctetString, Rules, TaggedObject,
};
use ber::{IoSink, Length, Tlv};
use kumiki::encoder::Encoder;
use rstest::rstest;

fn boolean() -> Element {
    Element::Boolean(true)
}

fn integer() -> Element {
    Element::Integer(Integer::from(100_i64))
}

fn bit_string() -> Element {
    Element::BitString(BitString::from(vec![0x00; 10]))
}

fn octet_string() -> Element {
    Element::OctetString(OctetString::from(vec![0x00; 10]))
}

fn tree() -> Element {
    let oid: ObjectIdentifier = "1.2.840.113549.1.7.3".parse().unwrap();
    Element::Sequence(vec![
        Element::ObjectIdentifier(oid),
        Element::Tagged(TaggedObject::explicit(
            0,
            Element::Sequence(vec![
                Element::Integer(Integer::from(2_i64)),
                Element::Set(vec![octet_string(), integer(), boolean()]),
                Element::Tagged(TaggedObject::implicit(
                    1,
                    Element::OctetString(OctetString::from(vec![0xab; 3000])),
                )),
                Element::Tagged(TaggedObject::empty(2)),
                Element::UTF8String("kumiki".to_string()),
                Element::Null,
            ]),
        )),
    ])
}

#[rstest(element,
    case(boolean()),
    case(integer()),
    case(Element::Integer(Integer::from(-32768_i64))),
    case(bit_string()),
    case(Element::BitString(BitString::new(3, vec![0xa8]).unwrap())),
    case(octet_string()),
    case(Element::OctetString(OctetString::default())),
    case(Element::Null),
    case(Element::ObjectIdentifier("2.5.4.3".parse().unwrap())),
    case(Element::UTF8String("組木".to_string())),
    case(Element::Sequence(vec![boolean(), integer()])),
    case(Element::Set(vec![boolean(), integer(), bit_string(), octet_string()])),
    case(Element::Tagged(TaggedObject::explicit(3, integer()))),
    case(Element::Tagged(TaggedObject::implicit(4, octet_string()))),
    case(Element::Tagged(TaggedObject::implicit(5, Element::Sequence(vec![boolean(), integer()])))),
    case(Element::Tagged(TaggedObject::empty(6))),
)]
fn der_round_trip(element: Element) {
    let der = element.encode().unwrap();
    assert_eq!(element, Element::parse(&der).unwrap());
}

fn tagged(element: Element) -> TaggedObject {
    match element {
        Element::Tagged(tagged) => tagged,
        other => panic!("expected a tagged value, got {other}"),
    }
}

// Shapes a schema-less decode cannot tell apart; the caller names the
// container the `[n]` content holds.
#[rstest(number, container, inner,
    case(1, Container::Sequence, Element::Sequence(vec![Element::Integer(Integer::from(7_i64))])),
    case(1, Container::Set, Element::Set(vec![boolean(), Element::Null])),
    case(2, Container::Set, Element::Set(vec![integer()])),
    case(3, Container::Set, Element::Set(vec![])),
    case(4, Container::Sequence, Element::Sequence(vec![boolean(), integer(), octet_string()])),
)]
fn der_round_trip_implicit_container(number: u32, container: Container, inner: Element) {
    let element = Element::Tagged(TaggedObject::implicit(number, inner.clone()));
    let der = element.encode().unwrap();
    let decoded = tagged(Element::parse(&der).unwrap());
    assert_eq!(number, decoded.number());
    assert_eq!(inner, decoded.as_implicit(container).unwrap());

    let rebuilt = TaggedObject::implicit(number, decoded.as_implicit(container).unwrap());
    assert_eq!(element, Element::Tagged(rebuilt));
}

#[test]
fn der_round_trip_explicit_single_child() {
    let element = Element::Tagged(TaggedObject::explicit(1, Element::Set(vec![Element::Null])));
    let decoded = tagged(Element::parse(&element.encode().unwrap()).unwrap());
    assert_eq!(element, Element::Tagged(decoded.clone()));
    assert_eq!(&Element::Set(vec![Element::Null]), decoded.as_explicit().unwrap());
}

#[rstest(rules, case(Rules::Der), case(Rules::Ber))]
fn implicit_octet_string_read_back(rules: Rules) {
    for len in [1, OCTET_STRING_CHUNK_SIZE + 1] {
        let octets = OctetString::from(vec![0x5a; len]);
        let element = Element::Tagged(TaggedObject::implicit(0, Element::OctetString(octets.clone())));
        let decoded = tagged(Element::parse(&element.to_vec(rules).unwrap()).unwrap());
        assert_eq!(octets, decoded.as_octet_string().unwrap());
    }
}

#[test]
fn der_round_trip_is_stable() {
    let der = tree().to_vec(Rules::Der).unwrap();
    let decoded = Element::parse(&der).unwrap();
    assert_eq!(der, decoded.to_vec(Rules::Der).unwrap());
}

#[test]
fn ber_set_uses_indefinite_framing() {
    let set = Element::Set(vec![octet_string(), integer(), boolean()]);
    let ber = set.to_vec(Rules::Ber).unwrap();

    let mut expected = vec![0x31, 0x80];
    expected.extend(octet_string().to_vec(Rules::Ber).unwrap());
    expected.extend(integer().to_vec(Rules::Ber).unwrap());
    expected.extend(boolean().to_vec(Rules::Ber).unwrap());
    expected.extend([0x00, 0x00]);
    assert_eq!(expected, ber);

    let tlv = Tlv::parse(&ber).unwrap();
    assert_eq!(Length::Indefinite, tlv.length());
    assert_eq!(set, Element::parse(&ber).unwrap());
}

#[test]
fn der_set_order_ignores_insertion_order() {
    let orders = [
        vec![octet_string(), bit_string(), integer(), boolean()],
        vec![boolean(), integer(), bit_string(), octet_string()],
        vec![integer(), octet_string(), boolean(), bit_string()],
        vec![bit_string(), boolean(), octet_string(), integer()],
    ];

    let encodings: Vec<Vec<u8>> = orders
        .iter()
        .map(|order| Element::Set(order.clone()).to_vec(Rules::Der).unwrap())
        .collect();
    for encoding in &encodings[1..] {
        assert_eq!(&encodings[0], encoding);
    }

    assert_eq!(
        Element::Set(vec![boolean(), integer(), bit_string(), octet_string()]),
        Element::parse(&encodings[0]).unwrap()
    );

    // BER keeps whatever order the caller chose
    for order in orders {
        let set = Element::Set(order);
        assert_eq!(set, Element::parse(&set.to_vec(Rules::Ber).unwrap()).unwrap());
    }
}

#[test]
fn implicit_tag_replaces_sequence_header() {
    let a = boolean();
    let b = integer();
    let mut children = a.to_vec(Rules::Der).unwrap();
    children.extend(b.to_vec(Rules::Der).unwrap());

    let implicit = TaggedObject::implicit(1, Element::Sequence(vec![a.clone(), b.clone()]));
    let mut expected = vec![0xa1, children.len() as u8];
    expected.extend(&children);
    assert_eq!(expected, implicit.to_vec(Rules::Der).unwrap());

    let explicit = TaggedObject::explicit(1, Element::Sequence(vec![a, b]));
    let mut expected = vec![0xa1, children.len() as u8 + 2, 0x30, children.len() as u8];
    expected.extend(&children);
    assert_eq!(expected, explicit.to_vec(Rules::Der).unwrap());
}

#[test]
fn implicit_tag_on_scalar_is_rejected() {
    let tagged = Element::Tagged(TaggedObject::implicit(0, integer()));
    let nested = Element::Sequence(vec![boolean(), tagged]);
    for rules in [Rules::Der, Rules::Ber] {
        assert!(matches!(
            nested.to_vec(rules),
            Err(Error::UnsupportedImplicitTagTarget(_))
        ));
    }
}

#[rstest(input, expected,
    // definite length past the end of the input
    case(vec![0x04, 0x05, 0x01, 0x02], Error::Ber(ber::error::Error::TruncatedInput { needed: 5, remaining: 2 })),
    // child overruns its parent's bound
    case(vec![0x30, 0x03, 0x04, 0x05, 0x00], Error::Ber(ber::error::Error::TruncatedInput { needed: 5, remaining: 1 })),
    // no end-of-contents
    case(vec![0x30, 0x80, 0x05, 0x00], Error::Ber(ber::error::Error::UnterminatedIndefiniteValue)),
    case(vec![0x30, 0x80, 0x05, 0x00, 0x00], Error::Ber(ber::error::Error::UnterminatedIndefiniteValue)),
    // end-of-contents inside a definite bound
    case(vec![0x30, 0x04, 0x00, 0x00, 0x05, 0x00], Error::Ber(ber::error::Error::TrailingGarbage(4))),
    // bytes after the outermost value
    case(vec![0x05, 0x00, 0x05], Error::Ber(ber::error::Error::TrailingGarbage(1))),
    // end-of-contents where a value is expected
    case(vec![0x00, 0x00], Error::Ber(ber::error::Error::MalformedEncoding("end-of-contents tag outside a terminator".to_string()))),
    case(vec![0x30, 0x80, 0x00, 0x01, 0xaa, 0x00, 0x00], Error::Ber(ber::error::Error::MalformedEncoding("end-of-contents tag outside a terminator".to_string()))),
)]
fn structural_errors(input: Vec<u8>, expected: Error) {
    assert_eq!(expected, Element::parse(&input).unwrap_err());
}

#[rstest(rules, case(Rules::Der), case(Rules::Ber))]
fn encoded_len_matches_output(rules: Rules) {
    let element = tree();
    assert_eq!(element.to_vec(rules).unwrap().len(), element.encoded_len(rules));
}

#[test]
fn ber_octet_string_is_chunked() {
    let data: Vec<u8> = (0..2500).map(|i| (i % 251) as u8).collect();
    let element = Element::OctetString(OctetString::from(data.clone()));
    let ber = element.to_vec(Rules::Ber).unwrap();

    let tlv = Tlv::parse(&ber).unwrap();
    assert!(tlv.tag().is_constructed());
    let sizes: Vec<usize> = tlv
        .tlvs()
        .unwrap()
        .iter()
        .map(|chunk| chunk.data().unwrap().len())
        .collect();
    assert_eq!(vec![OCTET_STRING_CHUNK_SIZE, OCTET_STRING_CHUNK_SIZE, 500], sizes);

    assert_eq!(element, Element::parse(&ber).unwrap());
    assert_eq!(data.len() + 4, element.to_vec(Rules::Der).unwrap().len());
}

#[test]
fn ber_and_der_decode_to_the_same_tree() {
    let element = Element::Sequence(vec![
        Element::Set(vec![octet_string(), integer(), boolean()]),
        Element::Tagged(TaggedObject::explicit(0, bit_string())),
        Element::Tagged(TaggedObject::empty(1)),
        Element::OctetString(OctetString::from(vec![0x11; 1500])),
    ]);
    let der = Element::parse(&element.to_vec(Rules::Der).unwrap()).unwrap();
    let ber = Element::parse(&element.to_vec(Rules::Ber).unwrap()).unwrap();
    // only the order inside the SET differs
    assert_eq!(element, ber);
    assert_eq!(
        der.to_vec(Rules::Der).unwrap(),
        ber.to_vec(Rules::Der).unwrap()
    );
}

#[test]
fn stream_to_writer() {
    let element = tree();
    let mut sink = IoSink::new(Vec::new());
    // Ok here only means the value was encodable; I/O errors come from finish()
    element.encode_to(Rules::Ber, &mut sink).unwrap();
    assert_eq!(element.encoded_len(Rules::Ber), sink.written());
    let written = sink.finish().unwrap();
    assert_eq!(element.to_vec(Rules::Ber).unwrap(), written);
}
