use bytes::Bytes;

use chairside::domain::{AudioChunk, ChunkFormat};

#[test]
fn given_webm_mime_when_sniffing_then_webm_suffix() {
    let format = ChunkFormat::from_mime("audio/webm;codecs=opus");
    assert_eq!(format, ChunkFormat::Webm);
    assert_eq!(format.suffix(), ".webm");
}

#[test]
fn given_mp4_mime_when_sniffing_then_mp4_suffix() {
    assert_eq!(ChunkFormat::from_mime("audio/mp4"), ChunkFormat::Mp4);
    assert_eq!(ChunkFormat::from_mime("video/mp4"), ChunkFormat::Mp4);
}

#[test]
fn given_mpeg_mime_when_sniffing_then_mp4_suffix() {
    let format = ChunkFormat::from_mime("audio/mpeg");
    assert_eq!(format, ChunkFormat::Mp4);
    assert_eq!(format.suffix(), ".mp4");
}

#[test]
fn given_uppercase_mime_when_sniffing_then_match_is_case_insensitive() {
    assert_eq!(ChunkFormat::from_mime("Audio/WebM"), ChunkFormat::Webm);
}

#[test]
fn given_unknown_mime_when_sniffing_then_generic_binary_suffix() {
    let format = ChunkFormat::from_mime("application/octet-stream");
    assert_eq!(format, ChunkFormat::Unknown);
    assert_eq!(format.suffix(), ".bin");
}

#[test]
fn given_empty_mime_when_sniffing_then_generic_binary_suffix() {
    assert_eq!(ChunkFormat::from_mime(""), ChunkFormat::Unknown);
}

#[test]
fn given_chunk_when_measuring_then_length_matches_payload() {
    let chunk = AudioChunk::new(Bytes::from(vec![0u8; 1234]), ChunkFormat::Webm);
    assert_eq!(chunk.len(), 1234);
    assert!(!chunk.is_empty());
}
