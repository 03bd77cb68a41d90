//! Media stream probing: the `[STREAM]` block scanner and queries over its result

pub mod summary;

const BLOCK_START: &str = "[STREAM]";
const BLOCK_END: &str = "[/STREAM]";

/// `key=value` fields of one stream block, in report order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamBlock {
    fields: Vec<(String, String)>,
}

impl StreamBlock {
    /// Build a block from key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut block = Self::default();
        for (key, value) in pairs {
            block.insert(key, value);
        }
        block
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a field; a repeated key keeps its first position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `codec_type` field: `video`, `audio`, `subtitle`, `data`...
    pub fn codec_type(&self) -> Option<&str> {
        self.get("codec_type")
    }

    pub fn is_video(&self) -> bool {
        self.codec_type() == Some("video")
    }

    pub fn is_audio(&self) -> bool {
        self.codec_type() == Some("audio")
    }

    fn number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn width(&self) -> Option<u32> {
        self.number("width")
    }

    pub fn height(&self) -> Option<u32> {
        self.number("height")
    }

    /// Stream duration in seconds; `N/A` reads as absent
    pub fn duration(&self) -> Option<f64> {
        self.number::<f64>("duration").filter(|d| d.is_finite())
    }

    /// Raw `bit_rate` field
    pub fn bit_rate(&self) -> Option<f64> {
        self.number::<f64>("bit_rate").filter(|b| b.is_finite())
    }
}

/// Scan probe output into stream blocks.
///
/// A block opens at `[STREAM]` and closes at `[/STREAM]`; inside, each line is split at its
/// first `=`. Lines outside blocks are ignored. A block left open at the end is kept.
pub fn parse_stream_blocks(text: &str) -> Vec<StreamBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<StreamBlock> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        match line.trim() {
            BLOCK_START => {
                if let Some(open) = current.replace(StreamBlock::default()) {
                    blocks.push(open);
                }
            }
            BLOCK_END => {
                if let Some(done) = current.take() {
                    blocks.push(done);
                }
            }
            _ => {
                if let Some(block) = current.as_mut() {
                    if let Some((key, value)) = line.split_once('=') {
                        block.insert(key.trim(), value);
                    }
                }
            }
        }
    }

    if let Some(open) = current {
        blocks.push(open);
    }
    blocks
}

/// First width/height pair reported by any stream
pub fn first_dimensions(blocks: &[StreamBlock]) -> Option<(u32, u32)> {
    blocks
        .iter()
        .find_map(|b| Some((b.width()?, b.height()?)))
}

/// Longest stream duration, used as the media duration
pub fn max_duration(blocks: &[StreamBlock]) -> Option<f64> {
    blocks
        .iter()
        .filter_map(StreamBlock::duration)
        .fold(None, |max: Option<f64>, d| Some(max.map_or(d, |m| m.max(d))))
}
