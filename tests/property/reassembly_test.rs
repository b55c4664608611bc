// tests/property/reassembly_test.rs

//! Property-based tests for turning arbitrarily split input into lines

use bytes::BytesMut;
use mpdpipe::connection::Utf8ChunkCodec;
use mpdpipe::core::protocol::LineReassembler;
use proptest::prelude::*;
use tokio_util::codec::Decoder;

const RESPONSE: &str = "file: Björk/Début/01 Human Behaviour.flac\n\
Title: Human Behaviour\n\
Time: 4:12\n\
list_OK\n\
ACK [50@1] {play} song doesn't exist\n\
OK\n";

fn reassemble(chunks: &[&str]) -> (Vec<String>, String) {
    let mut reassembler = LineReassembler::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        lines.extend(reassembler.push(chunk));
    }
    (lines, reassembler.pending().to_string())
}

/// Splits `text` at the given offsets, nudged back onto char boundaries.
fn split_at_offsets<'a>(text: &'a str, offsets: &[usize]) -> Vec<&'a str> {
    let mut cuts: Vec<usize> = offsets
        .iter()
        .map(|&o| {
            let mut o = o % (text.len() + 1);
            while !text.is_char_boundary(o) {
                o -= 1;
            }
            o
        })
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for cut in cuts {
        chunks.push(&text[start..cut]);
        start = cut;
    }
    chunks.push(&text[start..]);
    chunks
}

#[test]
fn test_every_single_split_point_gives_the_same_lines() {
    let (expected, rest) = reassemble(&[RESPONSE]);
    assert_eq!(expected.len(), 6);
    assert!(rest.is_empty());

    for cut in (0..=RESPONSE.len()).filter(|&i| RESPONSE.is_char_boundary(i)) {
        let (lines, rest) = reassemble(&[&RESPONSE[..cut], &RESPONSE[cut..]]);
        assert_eq!(lines, expected, "split at byte {cut}");
        assert!(rest.is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_any_chunking_preserves_lines(
        lines in prop::collection::vec("[^\n]{0,40}", 0..20),
        tail in "[^\n]{0,10}",
        offsets in prop::collection::vec(any::<usize>(), 0..12)
    ) {
        let mut text = String::new();
        for line in &lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str(&tail);

        let (whole, whole_rest) = reassemble(&[&text]);
        let (chunked, chunked_rest) = reassemble(&split_at_offsets(&text, &offsets));

        prop_assert_eq!(&whole, &lines);
        prop_assert_eq!(chunked, whole);
        prop_assert_eq!(&chunked_rest, &tail);
        prop_assert_eq!(whole_rest, tail);
    }

    #[test]
    fn test_codec_never_splits_a_character(
        text in "\\PC{0,200}",
        offsets in prop::collection::vec(any::<usize>(), 0..12)
    ) {
        let bytes = text.as_bytes();
        let mut cuts: Vec<usize> = offsets.iter().map(|o| o % (bytes.len() + 1)).collect();
        cuts.sort_unstable();
        cuts.push(bytes.len());

        let mut codec = Utf8ChunkCodec;
        let mut buf = BytesMut::new();
        let mut decoded = String::new();
        let mut start = 0;
        for cut in cuts {
            buf.extend_from_slice(&bytes[start..cut]);
            start = cut;
            while let Some(chunk) = codec.decode(&mut buf).unwrap() {
                decoded.push_str(&chunk);
            }
        }

        prop_assert!(buf.is_empty());
        prop_assert_eq!(decoded, text);
    }
}
