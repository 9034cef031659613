use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, error, info, warn};

use crate::errors::{FormatError, SubtitleError};
use crate::similarity::SimilarityMatcher;
use crate::timecode::TimeCode;

// @module: Subtitle parsing, writing and resynchronization

// @const: Delimiter between start and end of a time stamp line
pub const TIMESTAMP_DELIMITER: &str = " --> ";

// @const: Minimum similar texts for a resync to be trusted
pub const DEFAULT_MIN_MATCHES: usize = 3;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// @struct: Display window of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interval {
    pub start: TimeCode,
    pub end: TimeCode,
}

impl Interval {
    pub fn new(start: TimeCode, end: TimeCode) -> Self {
        Interval { start, end }
    }

    /// Build from raw milliseconds
    pub fn from_millis(start_ms: u32, end_ms: u32) -> Self {
        Interval::new(TimeCode::from_millis(start_ms), TimeCode::from_millis(end_ms))
    }

    /// Whether the end comes before the start
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.start, TIMESTAMP_DELIMITER, self.end)
    }
}

// @struct: Pairing of one of our entries with a source entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPair {
    /// Index in the document being resynced
    pub index: usize,
    /// Index in the timing source
    pub source_index: usize,
}

/// Matching policy of a resync
#[derive(Debug, Clone, PartialEq)]
pub struct ResyncPolicy {
    pub matcher: SimilarityMatcher,
    /// Fewer matches than this fail the resync
    pub min_matches: usize,
}

impl Default for ResyncPolicy {
    fn default() -> Self {
        Self {
            matcher: SimilarityMatcher::default(),
            min_matches: DEFAULT_MIN_MATCHES,
        }
    }
}

// @enum: Shape of the time stamp blocks, decided once per file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// A numeric index line precedes each time stamp line
    Indexed,
    /// Time stamp lines come first
    Bare,
}

impl Layout {
    // A first line already holding a time stamp means there are no index lines
    fn of_first_line(line: &[u8]) -> Self {
        if find_delimiter(line).is_some() {
            Layout::Bare
        } else {
            Layout::Indexed
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Layout::Indexed => write!(f, "indexed"),
            Layout::Bare => write!(f, "bare"),
        }
    }
}

// Byte offset of the time stamp delimiter in a line
fn find_delimiter(line: &[u8]) -> Option<usize> {
    let delimiter = TIMESTAMP_DELIMITER.as_bytes();
    line.windows(delimiter.len()).position(|window| window == delimiter)
}

// @enum: Line reader states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    SkipToTimeStamp,
    ReadTimeStamp,
    ReadText,
}

/// Line-oriented state machine filling a document's sequences.
///
/// Lines are raw bytes: text lines are stored as found and only time stamp
/// lines are interpreted. Line-level errors are recorded and scanning goes
/// on; only a missing leading digit at the very start stops it.
struct LineParser<'a> {
    state: ParseState,
    layout: Option<Layout>,
    // true until the current entry's first text line is pushed
    first_text: bool,
    intervals: &'a mut Vec<Interval>,
    texts: &'a mut Vec<Vec<u8>>,
    errors: Vec<FormatError>,
}

impl<'a> LineParser<'a> {
    fn new(intervals: &'a mut Vec<Interval>, texts: &'a mut Vec<Vec<u8>>) -> Self {
        LineParser {
            state: ParseState::Start,
            layout: None,
            first_text: true,
            intervals,
            texts,
            errors: Vec::new(),
        }
    }

    // Only empty lines separate blocks, whitespace is text
    fn is_blank(line: &[u8]) -> bool {
        line.is_empty()
    }

    // State following a finished text block or the index line
    fn time_stamp_state(&self) -> ParseState {
        match self.layout {
            Some(Layout::Bare) => ParseState::ReadTimeStamp,
            _ => ParseState::SkipToTimeStamp,
        }
    }

    fn feed(&mut self, line_number: usize, line: &[u8]) -> Result<(), FormatError> {
        match self.state {
            ParseState::Start => {
                if Self::is_blank(line) {
                    return Ok(());
                }
                if !line.first().is_some_and(u8::is_ascii_digit) {
                    return Err(FormatError::MissingLeadingDigit {
                        line: line_number,
                        content: String::from_utf8_lossy(line).into_owned(),
                    });
                }

                let layout = Layout::of_first_line(line);
                debug!("Detected {:?} subtitle layout", layout);
                self.layout = Some(layout);
                self.state = self.time_stamp_state();

                // the detection line belongs to the first entry
                self.feed(line_number, line)
            }
            ParseState::SkipToTimeStamp => {
                if !Self::is_blank(line) {
                    self.state = ParseState::ReadTimeStamp;
                }
                Ok(())
            }
            ParseState::ReadTimeStamp => {
                if Self::is_blank(line) {
                    return Ok(());
                }
                match Self::parse_time_stamp_line(line_number, line) {
                    Ok(interval) => {
                        if interval.is_inverted() {
                            debug!("Line {}: interval ends before it starts: {}", line_number, interval);
                        }
                        self.intervals.push(interval);
                        self.first_text = true;
                        self.state = ParseState::ReadText;
                    }
                    Err(e) => {
                        error!("Error parsing subtitle: {}", e);
                        self.errors.push(e);
                    }
                }
                Ok(())
            }
            ParseState::ReadText => {
                if Self::is_blank(line) {
                    self.state = self.time_stamp_state();
                    return Ok(());
                }
                if self.first_text {
                    self.texts.push(line.to_vec());
                    self.first_text = false;
                } else if let Some(text) = self.texts.last_mut() {
                    text.push(b'\n');
                    text.extend_from_slice(line);
                }
                Ok(())
            }
        }
    }

    fn parse_time_stamp_line(line_number: usize, line: &[u8]) -> Result<Interval, FormatError> {
        let line = String::from_utf8_lossy(line);
        let (start, end) = line.split_once(TIMESTAMP_DELIMITER).ok_or_else(|| FormatError::MissingArrow {
            line: line_number,
            content: line.to_string(),
        })?;

        let start = TimeCode::parse(start).map_err(|source| FormatError::BadTimeCode { line: line_number, source })?;
        let end = TimeCode::parse(end).map_err(|source| FormatError::BadTimeCode { line: line_number, source })?;

        Ok(Interval::new(start, end))
    }
}

/// Ordered subtitle entries kept as two parallel sequences.
///
/// Texts are raw bytes in whatever encoding the file used; they are matched
/// and written back without decoding.
#[derive(Debug, Clone, Default)]
pub struct SubtitleDocument {
    intervals: Vec<Interval>,
    texts: Vec<Vec<u8>>,
    layout: Option<Layout>,
}

impl SubtitleDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from (interval, text) entries
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Interval, S)>,
        S: Into<Vec<u8>>,
    {
        let mut document = Self::new();
        for (interval, text) in entries {
            document.push(interval, text);
        }
        document
    }

    /// Append an entry
    pub fn push(&mut self, interval: Interval, text: impl Into<Vec<u8>>) {
        self.intervals.push(interval);
        self.texts.push(text.into());
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn texts(&self) -> &[Vec<u8>] {
        &self.texts
    }

    /// Layout found by the last parse, `None` for built or empty documents
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    /// Iterate over (interval, text) entries in order
    pub fn entries(&self) -> impl Iterator<Item = (&Interval, &[u8])> {
        self.intervals.iter().zip(self.texts.iter().map(Vec::as_slice))
    }

    /// Parse a subtitle file, replacing the current content.
    ///
    /// Returns the number of entries. On error the document is left in an
    /// unspecified state and must not be used.
    pub fn parse_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read(path).map_err(|source| {
            error!("{} cannot be opened", path.display());
            SubtitleError::FileUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let count = self.parse_bytes(&content)?;
        if count > 0 {
            info!("Parsed {} entries from {}", count, path.display());
        }
        Ok(count)
    }

    /// Parse subtitle text, replacing the current content
    pub fn parse_str(&mut self, content: &str) -> Result<usize, SubtitleError> {
        self.parse_bytes(content.as_bytes())
    }

    /// Parse raw subtitle content, replacing the current content.
    ///
    /// Both layouts are accepted: with a numeric index line before each time
    /// stamp line, or without. The layout is detected from the first
    /// non-empty line. Lines end at `\n`, a trailing `\r` is dropped.
    pub fn parse_bytes(&mut self, content: &[u8]) -> Result<usize, SubtitleError> {
        self.intervals.clear();
        self.texts.clear();
        self.layout = None;

        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        let mut parser = LineParser::new(&mut self.intervals, &mut self.texts);

        for (index, line) in content.split(|&byte| byte == b'\n').enumerate() {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if let Err(e) = parser.feed(index + 1, line) {
                error!("Error parsing subtitle: {}", e);
                return Err(e.into());
            }
        }

        let layout = parser.layout;
        let mut errors = parser.errors.into_iter();

        if self.intervals.len() != self.texts.len() {
            let mismatch = FormatError::CountMismatch {
                intervals: self.intervals.len(),
                texts: self.texts.len(),
            };
            error!("Error parsing subtitle: {}", mismatch);
            return Err(mismatch.into());
        }

        if let Some(first) = errors.next() {
            let remaining = errors.count();
            if remaining > 0 {
                debug!("{} more format errors after the first one", remaining);
            }
            return Err(first.into());
        }

        if self.texts.is_empty() {
            warn!("Subtitle content has no entries");
        }

        self.layout = layout;
        Ok(self.texts.len())
    }

    /// Write the document in the indexed layout
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (index, (interval, text)) in self.entries().enumerate() {
            writeln!(writer, "{}", index + 1)?;
            writeln!(writer, "{}", interval)?;
            writer.write_all(text)?;
            writer.write_all(b"\n\n")?;
        }
        Ok(())
    }

    /// Serialized indexed form of the document
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        // writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        buffer
    }

    /// Write the document as an indexed subtitle file, overwriting `path`
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SubtitleError> {
        let path = path.as_ref();
        if self.is_empty() {
            warn!("Writing an empty subtitle to {}", path.display());
        }

        let unwritable = |source| SubtitleError::FileUnwritable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(unwritable)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer).map_err(unwritable)?;
        writer.flush().map_err(unwritable)?;

        debug!("Wrote {} entries to {}", self.len(), path.display());
        Ok(())
    }

    /// Find which source entries hold the same texts as ours, using the
    /// default policy.
    ///
    /// `source` is only read. The returned pairs are in our entry order.
    pub fn resync(&self, source: &SubtitleDocument) -> Result<Vec<MatchPair>, SubtitleError> {
        self.resync_with(source, &ResyncPolicy::default())
    }

    /// Same as [`resync`](Self::resync) with a custom policy
    pub fn resync_with(&self, source: &SubtitleDocument, policy: &ResyncPolicy) -> Result<Vec<MatchPair>, SubtitleError> {
        let total = self.texts.len();

        let matches: Vec<MatchPair> = self
            .texts
            .iter()
            .enumerate()
            .filter_map(|(index, text)| {
                let expected_percent = index * 100 / total;
                policy
                    .matcher
                    .find_similar(source.texts(), text, expected_percent)
                    .map(|source_index| MatchPair { index, source_index })
            })
            .collect();

        if matches.len() < policy.min_matches {
            error!(
                "Cannot find enough similar texts: {} of {} entries matched",
                matches.len(),
                total
            );
            return Err(SubtitleError::InsufficientMatches {
                found: matches.len(),
                required: policy.min_matches,
            });
        }

        info!("Matched {} of {} entries against the timing source", matches.len(), total);
        Ok(matches)
    }

    /// Rewrite our intervals onto the timeline of `source`.
    ///
    /// Each match anchors the start of our entry to the start of its source
    /// entry. Times between anchors are interpolated linearly and times
    /// outside are extrapolated from the nearest pair. A single anchor shifts
    /// everything by a constant offset. Anchors breaking the order of earlier
    /// ones are dropped. Returns the number of retimed entries.
    pub fn apply_retiming(&mut self, source: &SubtitleDocument, matches: &[MatchPair]) -> Result<usize, SubtitleError> {
        let anchors = self.collect_anchors(source, matches);
        if anchors.is_empty() {
            return Err(SubtitleError::InsufficientMatches {
                found: 0,
                required: 1,
            });
        }
        if anchors.len() < matches.len() {
            warn!(
                "Dropped {} out-of-order matches, retiming with {} anchors",
                matches.len() - anchors.len(),
                anchors.len()
            );
        }

        for interval in self.intervals.iter_mut() {
            interval.start = map_time(&anchors, interval.start);
            interval.end = map_time(&anchors, interval.end);
        }

        info!("Retimed {} entries using {} anchors", self.intervals.len(), anchors.len());
        Ok(self.intervals.len())
    }

    // Anchors strictly increasing on both timelines
    fn collect_anchors(&self, source: &SubtitleDocument, matches: &[MatchPair]) -> Vec<(i64, i64)> {
        let mut anchors: Vec<(i64, i64)> = Vec::with_capacity(matches.len());

        for pair in matches {
            let (Some(ours), Some(theirs)) = (self.intervals.get(pair.index), source.intervals().get(pair.source_index)) else {
                warn!("Ignoring match {:?} outside of the documents", pair);
                continue;
            };
            let anchor = (i64::from(ours.start.as_millis()), i64::from(theirs.start.as_millis()));

            match anchors.last() {
                Some(&(x, y)) if anchor.0 <= x || anchor.1 <= y => {
                    debug!("Skipping out-of-order anchor {:?} after {:?}", anchor, (x, y));
                }
                _ => anchors.push(anchor),
            }
        }

        anchors
    }
}

// Documents are equal when their entries are; the parsed layout is ignored
impl PartialEq for SubtitleDocument {
    fn eq(&self, other: &Self) -> bool {
        self.intervals == other.intervals && self.texts == other.texts
    }
}

impl Eq for SubtitleDocument {}

// Piecewise-linear mapping through sorted anchors
fn map_time(anchors: &[(i64, i64)], time: TimeCode) -> TimeCode {
    let t = i64::from(time.as_millis());

    let mapped = match anchors {
        [] => t,
        [(x, y)] => t + (y - x),
        _ => {
            // segment whose right end is the first anchor past t, clamped to the outer segments
            let upper = anchors.partition_point(|&(x, _)| x <= t).clamp(1, anchors.len() - 1);
            let (x0, y0) = anchors[upper - 1];
            let (x1, y1) = anchors[upper];
            let offset = (t - x0) as f64 * (y1 - y0) as f64 / (x1 - x0) as f64;
            y0 + offset.round() as i64
        }
    };

    TimeCode::from_millis(mapped.clamp(0, i64::from(u32::MAX)) as u32)
}
