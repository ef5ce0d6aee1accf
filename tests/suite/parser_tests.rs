//! Parser tests for einsum subscripts.

use einsum_sumprod::EinsumError;
use einsum_sumprod::error::Segment;
use einsum_sumprod::notation::{AxisLabel, Label, parse_einsum};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn label(c: char) -> Label {
    Label::new(c).unwrap()
}

#[test]
fn test_parse_basic_matmul() {
    let notation = parse_einsum("ij,jk->ik", &[2, 2]).unwrap();
    assert_eq!(notation.num_operands(), 2);
    assert_eq!(notation.ndim_broadcast(), 0);
    assert_eq!(notation.output_string(), "ik");
    assert_eq!(notation.label_counts().count(label('j')), 2);
}

#[test]
fn test_parse_attention() {
    let notation = parse_einsum("bhqd,bhkd->bhqk", &[4, 4]).unwrap();
    assert!(notation.is_binary());
    assert_eq!(notation.summed_labels().as_slice(), &[label('d')]);
}

#[test]
fn test_parse_repeated_label_codes() {
    let notation = parse_einsum("iji->", &[3]).unwrap();
    assert_eq!(notation.operands()[0].codes(), vec![105, 106, -2]);
    assert_eq!(notation.output_rank(), 0);
}

#[test]
fn test_parse_ellipsis_right_aligned() {
    let notation = parse_einsum("a...b,...b", &[4, 2]).unwrap();
    let first = &notation.operands()[0];
    assert_eq!(
        first.as_slice(),
        &[
            AxisLabel::Label(label('a')),
            AxisLabel::Broadcast,
            AxisLabel::Broadcast,
            AxisLabel::Label(label('b')),
        ]
    );
    assert_eq!(notation.operands()[1].broadcast_count(), 1);
    assert_eq!(notation.ndim_broadcast(), 2);
    assert_eq!(notation.output_string(), "__a");
}

#[test]
fn test_parse_empty_ellipsis() {
    let notation = parse_einsum("...ij->ji...", &[2]).unwrap();
    assert_eq!(notation.ndim_broadcast(), 0);
    assert_eq!(notation.output_string(), "ji");
}

#[test]
fn test_parse_spaces_ignored() {
    let notation = parse_einsum(" i j , j k -> i k ", &[2, 2]).unwrap();
    assert_eq!(notation.to_string(), "ij,jk->ik");
}

#[test]
fn test_implicit_output_is_sorted() {
    let notation = parse_einsum("ba", &[2]).unwrap();
    assert!(!notation.has_explicit_output());
    assert_eq!(notation.output_string(), "ab");

    // Upper case sorts before lower case.
    let notation = parse_einsum("aB", &[2]).unwrap();
    assert_eq!(notation.output_string(), "Ba");
}

#[test]
fn test_invalid_character() {
    let err = parse_einsum("i1->i", &[2]).unwrap_err();
    assert_eq!(err, EinsumError::InvalidSubscript { character: '1' });
}

#[test]
fn test_malformed_ellipsis_in_output() {
    let err = parse_einsum("i->..", &[1]).unwrap_err();
    assert_eq!(
        err,
        EinsumError::MalformedEllipsis {
            segment: Segment::Output
        }
    );
}

#[test]
fn test_missing_ellipsis() {
    let err = parse_einsum("ij", &[3]).unwrap_err();
    assert!(matches!(err, EinsumError::MissingEllipsis { .. }));
}

#[test]
fn test_output_label_errors() {
    let err = parse_einsum("ij->ii", &[2]).unwrap_err();
    assert_eq!(err, EinsumError::RepeatedOutputLabel { label: 'i' });

    let err = parse_einsum("ij->k", &[2]).unwrap_err();
    assert_eq!(err, EinsumError::OutputLabelNotInInputs { label: 'k' });
}

#[test]
fn test_arrow_required_after_dash() {
    let err = parse_einsum("ij-ji", &[2]).unwrap_err();
    assert_eq!(err, EinsumError::MissingOutputArrow);
}

#[test]
fn test_operand_capacity() {
    assert_eq!(parse_einsum("", &[]).unwrap_err(), EinsumError::NoOperands);

    let ndims = vec![1; 32];
    let subscripts = vec!["i"; 32].join(",");
    assert!(matches!(
        parse_einsum(&subscripts, &ndims).unwrap_err(),
        EinsumError::TooManyOperands { count: 32, .. }
    ));
}

proptest! {
    #[test]
    fn test_parse_is_deterministic(labels in "[a-e]{1,5}", extra in 0usize..3) {
        let ndim = labels.len() + extra;
        let subscripts = format!("{}...", labels);
        let first = parse_einsum(&subscripts, &[ndim]).unwrap();
        let second = parse_einsum(&subscripts, &[ndim]).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.ndim_broadcast(), extra);
        prop_assert_eq!(first.operands()[0].len(), ndim);
    }
}
