//! Tests for dictionary assembly
//!
//! These tests verify:
//! - Push/pop move the path stack
//! - Data and key-value chunks land at the right coordinate
//! - Segmented data concatenates in arrival order
//! - Pops on an empty stack warn instead of failing
//! - Delayed chunks pop after they are applied

use bytes::Bytes;
use fmp12::chunk::{decode_chunk, Chunk};
use fmp12::dict::{apply, Assembler, AssemblyWarning, Dictionary, PathStack};

// =============================================================================
// Helper Functions
// =============================================================================

fn chunk(bytes: &[u8]) -> Chunk {
    decode_chunk(&Bytes::copy_from_slice(bytes), false).unwrap()
}

fn delayed_chunk(bytes: &[u8]) -> Chunk {
    decode_chunk(&Bytes::copy_from_slice(bytes), true).unwrap()
}

fn assemble(chunks: &[Chunk]) -> Assembler {
    let mut assembler = Assembler::new();
    for c in chunks {
        assembler.apply(c);
    }
    assembler
}

// =============================================================================
// Path Stack Tests
// =============================================================================

#[test]
fn test_push_then_pop_restores_stack() {
    let mut dict = Dictionary::new();
    let mut path = PathStack::from(vec![3, 16]);
    let before = path.clone();

    apply(&mut dict, &mut path, &chunk(&[0x20, 0x05]));
    assert_eq!(path.as_slice(), &[3, 16, 5]);

    apply(&mut dict, &mut path, &chunk(&[0x40]));
    assert_eq!(path, before);
}

#[test]
fn test_path_stack_depth() {
    let mut path = PathStack::new();
    assert!(path.is_empty());
    assert_eq!(path.depth(), 0);

    path.push(3);
    path.push(16);
    assert_eq!(path.depth(), 2);
    assert_eq!(path.with_key(5), vec![3, 16, 5]);
    assert_eq!(path, PathStack::from(vec![3, 16]));

    assert_eq!(path.pop(), Some(16));
    assert_eq!(path.pop(), Some(3));
    assert_eq!(path.pop(), None);
    assert!(path.is_empty());
}

#[test]
fn test_assembler_path_depth_across_chunks() {
    let assembler = assemble(&[
        chunk(&[0x20, 0x03]),
        chunk(&[0x20, 0x10]),
        chunk(&[0x40]),
        chunk(&[0x20, 0x05]),
    ]);

    assert_eq!(assembler.path().depth(), 2);
    assert_eq!(assembler.path().as_slice(), &[3, 5]);
}

#[test]
fn test_push_widths() {
    let assembler = assemble(&[
        chunk(&[0x20, 0x03]),
        chunk(&[0x28, 0x01, 0x00]),
        chunk(&[0x30, 0x01, 0x00, 0x00]),
        chunk(&[0x38, 0x02, 0x12, 0x34]),
    ]);

    assert_eq!(assembler.path().as_slice(), &[3, 0x100, 0x10000, 0x1234]);
}

#[test]
fn test_pop_on_empty_stack_warns() {
    let mut dict = Dictionary::new();
    let mut path = PathStack::new();

    let warnings = apply(&mut dict, &mut path, &chunk(&[0x40]));

    assert!(path.is_empty());
    assert_eq!(
        warnings,
        vec![AssemblyWarning::PopOnEmptyPath {
            opcode: 0x40,
            delayed: false
        }]
    );
}

#[test]
fn test_assembler_collects_warnings_and_continues() {
    let assembler = assemble(&[
        chunk(&[0x40]),
        chunk(&[0x20, 0x07]),
        chunk(&[0x01, 0x02, 0xAA]),
    ]);

    assert_eq!(assembler.warnings().len(), 1);
    assert_eq!(assembler.chunks_applied(), 3);

    let (dict, warnings) = assembler.finish();
    assert_eq!(warnings.len(), 1);
    assert_eq!(dict.get_value(&[7, 2]).map(|v| v.to_vec()), Some(vec![0xAA]));
}

// =============================================================================
// Value Placement Tests
// =============================================================================

#[test]
fn test_simple_data_sets_current_path() {
    let (dict, _) = assemble(&[chunk(&[0x20, 0x09]), chunk(&[0x08, 0x01, 0x02])]).finish();

    assert_eq!(dict.get_value(&[9]).map(|v| v.to_vec()), Some(vec![1, 2]));
}

#[test]
fn test_key_value_sets_child_of_current_path() {
    let (dict, _) = assemble(&[
        chunk(&[0x20, 0x81]),
        chunk(&[0x06, 0x10, 0x02, 0x11, 0x22]),
    ])
    .finish();

    assert_eq!(
        dict.get_value(&[0x81, 0x10]).map(|v| v.to_vec()),
        Some(vec![0x11, 0x22])
    );
    assert!(dict.get_value(&[0x81]).is_none());
}

#[test]
fn test_long_key_value() {
    let (dict, _) = assemble(&[chunk(&[0x16, 0x00, 0x01, 0x00, 0x01, 0x5A])]).finish();

    assert_eq!(dict.get_value(&[0x100]).map(|v| v.to_vec()), Some(vec![0x5A]));
}

#[test]
fn test_later_write_wins() {
    let (dict, _) = assemble(&[
        chunk(&[0x01, 0x02, 0x01]),
        chunk(&[0x01, 0x02, 0x02]),
    ])
    .finish();

    assert_eq!(dict.get_value(&[2]).map(|v| v.to_vec()), Some(vec![0x02]));
}

#[test]
fn test_segments_concatenate_in_arrival_order() {
    // Indices arrive out of order; arrival order decides
    let (dict, _) = assemble(&[
        chunk(&[0x20, 0x04]),
        chunk(&[0x07, 0x02, 0x00, 0x02, b'a', b'b']),
        chunk(&[0x07, 0x01, 0x00, 0x01, b'c']),
        chunk(&[0x07, 0x03, 0x00, 0x02, b'd', b'e']),
    ])
    .finish();

    assert_eq!(dict.get_value(&[4]).map(|v| v.to_vec()), Some(b"abcde".to_vec()));
}

#[test]
fn test_noop_changes_nothing() {
    let assembler = assemble(&[chunk(&[0x20, 0x01]), chunk(&[0x80])]);

    assert_eq!(assembler.path().as_slice(), &[1]);
    assert!(assembler.warnings().is_empty());
    let (dict, _) = assembler.finish();
    assert!(dict.is_empty());
}

// =============================================================================
// Delayed Pop Tests
// =============================================================================

#[test]
fn test_delayed_chunk_pops_after_apply() {
    // 0xC1 = key-value 0x01 with a delayed pop
    let (dict, warnings) = assemble(&[
        chunk(&[0x20, 0x03]),
        chunk(&[0x20, 0x05]),
        delayed_chunk(&[0xC1, 0x10, 0x7F]),
        chunk(&[0x01, 0x11, 0x33]),
    ])
    .finish();

    assert!(warnings.is_empty());
    assert_eq!(dict.get_value(&[3, 5, 0x10]).map(|v| v.to_vec()), Some(vec![0x7F]));
    assert_eq!(dict.get_value(&[3, 0x11]).map(|v| v.to_vec()), Some(vec![0x33]));
}

#[test]
fn test_delayed_pop_on_empty_stack_warns() {
    let assembler = assemble(&[delayed_chunk(&[0xC1, 0x10, 0x7F])]);

    assert_eq!(
        assembler.warnings(),
        &[AssemblyWarning::PopOnEmptyPath {
            opcode: 0xC1,
            delayed: true
        }]
    );
}

#[test]
fn test_warning_display() {
    let warning = AssemblyWarning::PopOnEmptyPath {
        opcode: 0x40,
        delayed: false,
    };
    assert_eq!(warning.to_string(), "path pop 0x40 on empty path");
}
