//! Minimal WAV (RIFF) framing for mono 16-bit PCM.

const HEADER_LEN: usize = 44;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Whether `bytes` already carry a RIFF/WAVE header.
pub fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

/// Wrap raw little-endian 16-bit mono samples in a WAV header.
///
/// A trailing odd byte cannot form a sample and is dropped.
pub fn frame_pcm16(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let data = &pcm[..pcm.len() - pcm.len() % 2];
    let data_len = data.len() as u32;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut out = Vec::with_capacity(HEADER_LEN + data.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// Return WAV bytes, framing raw PCM if no header is present.
pub fn ensure_wav(bytes: Vec<u8>, sample_rate: u32) -> Vec<u8> {
    if is_wav(&bytes) {
        bytes
    } else {
        frame_pcm16(&bytes, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    #[test]
    fn test_frame_header_fields() {
        let pcm = vec![0u8; 100];
        let wav = frame_pcm16(&pcm, 22_050);

        assert_eq!(wav.len(), 144);
        assert!(is_wav(&wav));
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 4), 136);
        assert_eq!(u32_at(&wav, 24), 22_050);
        assert_eq!(u32_at(&wav, 28), 44_100);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 100);
    }

    #[test]
    fn test_odd_trailing_byte_dropped() {
        let wav = frame_pcm16(&[1, 2, 3], 16_000);
        assert_eq!(u32_at(&wav, 40), 2);
        assert_eq!(&wav[44..], &[1, 2]);
    }

    #[test]
    fn test_existing_wav_passes_through() {
        let original = frame_pcm16(&[9, 9, 9, 9], 8_000);
        let again = ensure_wav(original.clone(), 22_050);
        assert_eq!(again, original);
    }

    #[test]
    fn test_raw_pcm_gets_framed() {
        let wav = ensure_wav(vec![0, 1, 0, 1], 22_050);
        assert!(is_wav(&wav));
        assert_eq!(wav.len(), 48);
    }

    #[test]
    fn test_short_input_is_not_wav() {
        assert!(!is_wav(b"RIFF"));
        assert!(!is_wav(b""));
    }
}
