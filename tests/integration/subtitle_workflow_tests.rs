/*!
 * Integration tests for subtitle file processing workflow
 */

use anyhow::Result;
use std::fs;
use subresync::subtitle_processor::{Interval, SubtitleDocument};
use crate::common::{self, dialogue_document};

/// Test that we can write, re-read and compare a document
#[test]
fn test_subtitle_workflow_writeThenParse_shouldRoundTrip() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("roundtrip.srt");

    let original = SubtitleDocument::from_entries(vec![
        (Interval::from_millis(0, 1_500), "First line\nsecond line"),
        (Interval::from_millis(2_000, 3_250), "Next"),
        (Interval::from_millis(360_000_000, 360_000_500), "A hundred hours in"),
    ]);
    original.write_file(&path)?;

    let mut reparsed = SubtitleDocument::new();
    assert_eq!(reparsed.parse_file(&path)?, 3);
    assert_eq!(reparsed, original);
    Ok(())
}

/// Test parsing the common sample file
#[test]
fn test_subtitle_workflow_sampleFile_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "sample.srt")?;

    let mut document = SubtitleDocument::new();
    document.parse_file(&path)?;

    assert_eq!(document.len(), 3);
    assert_eq!(document.intervals()[2], Interval::from_millis(10_000, 14_000));
    assert_eq!(document.texts()[1], b"It contains multiple entries.");
    Ok(())
}

/// Test that a bare file is written back with index lines
#[test]
fn test_subtitle_workflow_bareFile_shouldBeWrittenIndexed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        temp_dir.path(),
        "bare.srt",
        "00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n",
    )?;
    let output = temp_dir.path().join("indexed.srt");

    let mut document = SubtitleDocument::new();
    document.parse_file(&input)?;
    document.write_file(&output)?;

    assert_eq!(
        fs::read_to_string(&output)?,
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\n00:00:03,000 --> 00:00:04,000\nWorld\n\n"
    );
    Ok(())
}

/// Test that an empty document is written and read back as empty
#[test]
fn test_subtitle_workflow_emptyDocument_shouldWriteEmptyFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("empty.srt");

    SubtitleDocument::new().write_file(&path)?;
    assert_eq!(fs::read_to_string(&path)?, "");

    let mut document = dialogue_document(0, 1000);
    assert_eq!(document.parse_file(&path)?, 0);
    assert!(document.is_empty());
    Ok(())
}

/// Test that a Latin-1 file is read and written back byte for byte
#[test]
fn test_subtitle_workflow_latin1File_shouldKeepBytes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("latin1.srt");
    let output = temp_dir.path().join("latin1.out.srt");
    let bytes = b"1\n00:00:01,000 --> 00:00:02,000\nCaf\xE9 cr\xE8me\n\n2\n00:00:03,000 --> 00:00:04,000\nGar\xE7on!\n\n";
    fs::write(&input, bytes)?;

    let mut document = SubtitleDocument::new();
    document.parse_file(&input)?;
    assert_eq!(document.texts()[0], b"Caf\xE9 cr\xE8me");

    document.write_file(&output)?;
    assert_eq!(fs::read(&output)?, bytes.to_vec());
    Ok(())
}

/// Test that Latin-1 texts match their counterparts by single-byte edits
#[test]
fn test_subtitle_workflow_latin1Track_shouldResyncAgainstAsciiTrack() -> Result<()> {
    let latin1: [&[u8]; 4] = [
        b"D\xE9j\xE0 vu, encore une fois.",
        b"O\xF9 est la gare?",
        b"Tr\xE8s bien, merci.",
        b"\xC7a va tr\xE8s bien.",
    ];
    let ascii = ["Deja vu, encore une fois.", "Ou est la gare?", "Tres bien, merci.", "Ca va tres bien."];
    let at = |i: usize, step: u32| Interval::from_millis(i as u32 * step, i as u32 * step + 500);

    let ours = SubtitleDocument::from_entries(latin1.iter().enumerate().map(|(i, text)| (at(i, 1000), text.to_vec())));
    let source = SubtitleDocument::from_entries(ascii.iter().enumerate().map(|(i, text)| (at(i, 2000), *text)));

    let matches = ours.resync(&source)?;
    assert_eq!(matches.len(), 4);
    assert!(matches.iter().all(|pair| pair.index == pair.source_index));
    Ok(())
}

/// Test a full resync from files: matches, retiming and output
#[test]
fn test_subtitle_workflow_resyncFiles_shouldAdoptSourceTiming() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let ours_path = temp_dir.path().join("ours.srt");
    let source_path = temp_dir.path().join("source.srt");
    let output_path = temp_dir.path().join("ours.resync.srt");

    dialogue_document(12_000, 2_000).write_file(&ours_path)?;
    dialogue_document(2_000, 2_000).write_file(&source_path)?;

    let mut ours = SubtitleDocument::new();
    ours.parse_file(&ours_path)?;
    let mut source = SubtitleDocument::new();
    source.parse_file(&source_path)?;

    let matches = ours.resync(&source)?;
    ours.apply_retiming(&source, &matches)?;
    ours.write_file(&output_path)?;

    let mut written = SubtitleDocument::new();
    written.parse_file(&output_path)?;
    assert_eq!(written.intervals(), source.intervals());
    assert_eq!(written.texts(), source.texts());
    Ok(())
}
