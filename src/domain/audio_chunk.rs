use bytes::Bytes;

/// One uploaded segment of streamed audio, independently transcribed.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub data: Bytes,
    pub format: ChunkFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkFormat {
    Webm,
    Mp4,
    Unknown,
}

impl ChunkFormat {
    /// Best-effort sniffing from the declared content-type. This is not
    /// content validation; the decoder probes the actual bytes later.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_lowercase();
        if mime.contains("webm") {
            Self::Webm
        } else if mime.contains("mp4") || mime.contains("mpeg") {
            Self::Mp4
        } else {
            Self::Unknown
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Webm => ".webm",
            Self::Mp4 => ".mp4",
            Self::Unknown => ".bin",
        }
    }
}

impl AudioChunk {
    pub fn new(data: Bytes, format: ChunkFormat) -> Self {
        Self { data, format }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
