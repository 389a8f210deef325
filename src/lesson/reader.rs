//! Pauker .pau.gz reader implementation
//!
//! Lesson layout:
//! ```xml
//! <Lesson LessonFormat="1.7">
//!   <Description>...</Description>
//!   <Batch>
//!     <Card>
//!       <FrontSide LearnedTimestamp="1672531200000"><Text>dog</Text></FrontSide>
//!       <ReverseSide><Text>chien</Text></ReverseSide>
//!     </Card>
//!   </Batch>
//! </Lesson>
//! ```

use std::io::Read;

use flate2::read::MultiGzDecoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::models::{Batch, Lesson, RawCard};
use crate::import::{ImportError, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Inflate a gzip stream fully into memory. Every member is read, and
/// trailing bytes that do not form another member are an error.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < GZIP_MAGIC.len() || bytes[..2] != GZIP_MAGIC {
        return Err(ImportError::Decompression(
            "missing gzip header".to_string(),
        ));
    }

    let mut decoder = MultiGzDecoder::new(bytes);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .map_err(|e| ImportError::Decompression(e.to_string()))?;
    Ok(inflated)
}

/// Decompress, decode and parse a lesson file's raw bytes
pub fn read_lesson(bytes: &[u8]) -> Result<Lesson> {
    let inflated = decompress(bytes)?;
    let content = String::from_utf8(inflated).map_err(|e| {
        ImportError::MalformedDocument(format!("document is not valid UTF-8: {}", e))
    })?;
    parse_lesson(content.trim_start_matches('\u{feff}'))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Front,
    Reverse,
}

/// What an open element means to the lesson tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Batch(usize),
    Card,
    Side(Side),
    /// A side's `Text` element; `false` when the side already had one or
    /// once a child element has opened inside it
    Text(Side, bool),
    Description,
    Other,
}

/// Card under construction. Only the first side/text element of each kind counts.
#[derive(Default)]
struct CardBuilder {
    batch: usize,
    card: RawCard,
    front_seen: bool,
    reverse_seen: bool,
    front_text_seen: bool,
    reverse_text_seen: bool,
}

struct LessonParser {
    lesson: Lesson,
    stack: Vec<Frame>,
    card: Option<CardBuilder>,
    seen_root: bool,
}

impl LessonParser {
    fn new() -> Self {
        Self {
            lesson: Lesson::default(),
            stack: Vec::new(),
            card: None,
            seen_root: false,
        }
    }

    fn open(&mut self, e: &BytesStart) -> Result<()> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(ImportError::MalformedDocument(
                    "more than one root element".to_string(),
                ));
            }
            self.seen_root = true;
        }

        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
        let parent = self.stack.last().copied();
        // Only text before the first child counts
        if let Some(Frame::Text(_, active)) = self.stack.last_mut() {
            *active = false;
        }

        let frame = match (name.as_str(), parent) {
            // Batches are collected at any depth, like `.//Batch`
            ("Batch", _) => {
                self.lesson.batches.push(Batch::default());
                Frame::Batch(self.lesson.batches.len() - 1)
            }
            ("Card", Some(Frame::Batch(batch))) => {
                self.card = Some(CardBuilder {
                    batch,
                    ..Default::default()
                });
                Frame::Card
            }
            ("FrontSide", Some(Frame::Card)) => self.open_side(e, Side::Front)?,
            ("ReverseSide", Some(Frame::Card)) => self.open_side(e, Side::Reverse)?,
            ("Text", Some(Frame::Side(side))) => {
                let builder = self.card.as_mut().ok_or_else(card_state_error)?;
                let seen = match side {
                    Side::Front => &mut builder.front_text_seen,
                    Side::Reverse => &mut builder.reverse_text_seen,
                };
                let active = !*seen;
                *seen = true;
                Frame::Text(side, active)
            }
            ("Description", _) if self.stack.len() == 1 && self.lesson.description.is_none() => {
                self.lesson.description = Some(String::new());
                Frame::Description
            }
            _ => Frame::Other,
        };

        self.stack.push(frame);
        Ok(())
    }

    fn open_side(&mut self, e: &BytesStart, side: Side) -> Result<Frame> {
        let builder = self.card.as_mut().ok_or_else(card_state_error)?;
        let seen = match side {
            Side::Front => &mut builder.front_seen,
            Side::Reverse => &mut builder.reverse_seen,
        };
        if *seen {
            return Ok(Frame::Other);
        }
        *seen = true;

        if side == Side::Front {
            let attr = e
                .try_get_attribute("LearnedTimestamp")
                .map_err(|e| ImportError::MalformedDocument(format!("bad attribute: {}", e)))?;
            if let Some(attr) = attr {
                let value = attr
                    .unescape_value()
                    .map_err(|e| ImportError::MalformedDocument(format!("bad attribute: {}", e)))?;
                builder.card.learned_timestamp = Some(value.to_string());
            }
        }

        Ok(Frame::Side(side))
    }

    fn close(&mut self) -> Result<()> {
        let frame = self.stack.pop().ok_or_else(|| {
            ImportError::MalformedDocument("closing tag without matching opening tag".to_string())
        })?;

        if frame == Frame::Card {
            let builder = self.card.take().ok_or_else(card_state_error)?;
            self.lesson.batches[builder.batch].cards.push(builder.card);
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.stack.last().copied() {
            None => {
                if !text.trim().is_empty() {
                    return Err(ImportError::MalformedDocument(
                        "text outside the root element".to_string(),
                    ));
                }
            }
            Some(Frame::Text(side, true)) => {
                let builder = self.card.as_mut().ok_or_else(card_state_error)?;
                match side {
                    Side::Front => builder.card.front_text.push_str(text),
                    Side::Reverse => builder.card.back_text.push_str(text),
                }
            }
            Some(Frame::Description) => {
                if let Some(description) = self.lesson.description.as_mut() {
                    description.push_str(text);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Lesson> {
        if !self.stack.is_empty() {
            return Err(ImportError::MalformedDocument(format!(
                "unexpected end of document with {} unclosed element(s)",
                self.stack.len()
            )));
        }
        if !self.seen_root {
            return Err(ImportError::MalformedDocument(
                "document has no root element".to_string(),
            ));
        }
        if self.lesson.batches.is_empty() {
            return Err(ImportError::MalformedDocument(
                "document has no Batch elements".to_string(),
            ));
        }
        Ok(self.lesson)
    }
}

fn card_state_error() -> ImportError {
    ImportError::MalformedDocument("card element outside of a card".to_string())
}

/// Parse lesson XML into batches of raw cards
pub fn parse_lesson(content: &str) -> Result<Lesson> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut parser = LessonParser::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => parser.open(e)?,
            Ok(Event::Empty(ref e)) => {
                parser.open(e)?;
                parser.close()?;
            }
            Ok(Event::End(_)) => parser.close()?,
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| {
                    ImportError::MalformedDocument(format!(
                        "XML parse error at position {}: {}",
                        reader.buffer_position(),
                        err
                    ))
                })?;
                parser.text(&text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).to_string();
                parser.text(&text)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ImportError::MalformedDocument(format!(
                    "XML parse error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    let lesson = parser.finish()?;
    log::debug!(
        "Parsed lesson with {} batches and {} cards",
        lesson.batches.len(),
        lesson.card_count()
    );
    Ok(lesson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(content: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    const LESSON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Lesson LessonFormat="1.7">
  <Description>German - Polish</Description>
  <Batch>
    <Card>
      <FrontSide><Text>cat</Text></FrontSide>
      <ReverseSide><Text>chat</Text></ReverseSide>
    </Card>
  </Batch>
  <Batch/>
  <Batch>
    <Card>
      <FrontSide LearnedTimestamp="2023-01-01T00:00:00" Orientation="LTR"><Text>dog</Text></FrontSide>
      <ReverseSide><Text>chien</Text></ReverseSide>
    </Card>
    <Card>
      <FrontSide><Text/></FrontSide>
      <ReverseSide/>
    </Card>
  </Batch>
</Lesson>"#;

    #[test]
    fn test_parse_lesson_structure() {
        let lesson = parse_lesson(LESSON).unwrap();

        assert_eq!(lesson.description.as_deref(), Some("German - Polish"));
        assert_eq!(lesson.batches.len(), 3);
        assert_eq!(lesson.batches[0].cards, vec![RawCard::new("cat", "chat")]);
        assert!(lesson.batches[1].cards.is_empty());
        assert_eq!(
            lesson.batches[2].cards[0],
            RawCard::new("dog", "chien").with_timestamp("2023-01-01T00:00:00")
        );
        assert_eq!(lesson.batches[2].cards[1], RawCard::new("", ""));
        assert_eq!(lesson.card_count(), 3);
    }

    #[test]
    fn test_text_is_preserved_verbatim() {
        let xml = r#"<Lesson><Batch><Card>
            <FrontSide><Text>  Guten Tag &amp; gute Nacht
zweite Zeile</Text></FrontSide>
            <ReverseSide><Text><![CDATA[<dzień> dobry]]></Text></ReverseSide>
        </Card></Batch></Lesson>"#;
        let lesson = parse_lesson(xml).unwrap();
        let card = &lesson.batches[0].cards[0];

        assert_eq!(card.front_text, "  Guten Tag & gute Nacht\nzweite Zeile");
        assert_eq!(card.back_text, "<dzień> dobry");
        assert_eq!(card.learned_timestamp, None);
    }

    #[test]
    fn test_first_text_element_wins() {
        let xml = r#"<Lesson><Batch><Card>
            <FrontSide><Text>one</Text><Text>two</Text></FrontSide>
        </Card></Batch></Lesson>"#;
        let lesson = parse_lesson(xml).unwrap();
        assert_eq!(lesson.batches[0].cards[0].front_text, "one");
        assert_eq!(lesson.batches[0].cards[0].back_text, "");
    }

    #[test]
    fn test_text_stops_at_first_child() {
        let xml = r#"<Lesson><Batch><Card>
            <FrontSide><Text>a<b>x</b>c</Text></FrontSide>
            <ReverseSide><Text><i>only child</i></Text></ReverseSide>
        </Card></Batch></Lesson>"#;
        let lesson = parse_lesson(xml).unwrap();
        assert_eq!(lesson.batches[0].cards[0], RawCard::new("a", ""));
    }

    #[test]
    fn test_nested_batch_keeps_card_ownership() {
        let xml = r#"<Lesson><Group>
            <Batch>
              <Card><FrontSide><Text>a</Text></FrontSide></Card>
            </Batch>
            <Batch>
              <Card><FrontSide><Text>b</Text></FrontSide></Card>
            </Batch>
        </Group></Lesson>"#;
        let lesson = parse_lesson(xml).unwrap();
        assert_eq!(lesson.batches.len(), 2);
        assert_eq!(lesson.batches[1].cards[0].front_text, "b");
    }

    #[test]
    fn test_cards_outside_batches_are_ignored() {
        let xml = r#"<Lesson><Card><FrontSide><Text>stray</Text></FrontSide></Card><Batch/></Lesson>"#;
        let lesson = parse_lesson(xml).unwrap();
        assert_eq!(lesson.card_count(), 0);
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            "this is not xml at all",
            "",
            "<Lesson><Batch></Lesson>",
            "<Lesson><Batch>",
            "<Lesson></Lesson><Lesson></Lesson>",
            "<Lesson><Description>no batches</Description></Lesson>",
        ];
        for case in cases {
            let err = parse_lesson(case).unwrap_err();
            assert!(
                matches!(err, ImportError::MalformedDocument(_)),
                "expected MalformedDocument for {:?}, got {:?}",
                case,
                err
            );
        }
    }

    #[test]
    fn test_decompress_rejects_plain_bytes() {
        let err = decompress(LESSON.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::Decompression(_)));

        let err = decompress(&[]).unwrap_err();
        assert!(matches!(err, ImportError::Decompression(_)));
    }

    #[test]
    fn test_decompress_rejects_truncated_stream() {
        let compressed = gzip(LESSON);
        let err = decompress(&compressed[..compressed.len() / 2]).unwrap_err();
        assert!(matches!(err, ImportError::Decompression(_)));
    }

    #[test]
    fn test_decompress_reads_every_member() {
        let (head, tail) = LESSON.split_at(LESSON.len() / 2);
        let mut compressed = gzip(head);
        compressed.extend(gzip(tail));

        assert_eq!(decompress(&compressed).unwrap(), LESSON.as_bytes());
        assert_eq!(read_lesson(&compressed).unwrap().batches.len(), 3);
    }

    #[test]
    fn test_decompress_rejects_trailing_garbage() {
        let mut compressed = gzip(LESSON);
        compressed.extend_from_slice(b"GARBAGE NOT GZIP");

        let err = decompress(&compressed).unwrap_err();
        assert!(matches!(err, ImportError::Decompression(_)));
    }

    #[test]
    fn test_read_lesson_from_gzip() {
        let lesson = read_lesson(&gzip(LESSON)).unwrap();
        assert_eq!(lesson.batches.len(), 3);
    }

    #[test]
    fn test_read_lesson_gzip_of_non_xml() {
        let err = read_lesson(&gzip("plain text payload")).unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument(_)));

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xff, 0xfe, 0x00, 0x3c]).unwrap();
        let err = read_lesson(&encoder.finish().unwrap()).unwrap_err();
        assert!(matches!(err, ImportError::MalformedDocument(_)));
    }
}
