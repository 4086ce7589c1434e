//! Track decoding with Symphonia.
//!
//! Decoded tracks feed the reference
//! [`TrackAnalyser`](super::source::TrackAnalyser). WAV, MP3, FLAC and AAC
//! are enabled.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("decode error: {0}")]
    Decode(#[from] SymphoniaError),

    #[error("no decodable audio track")]
    NoAudioTrack,

    #[error("track has no sample rate")]
    UnknownSampleRate,

    #[error("FFT size {0} is not a power of two >= 32")]
    InvalidFftSize(usize),
}

/// A fully decoded track.
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples in `-1.0..=1.0`.
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl AudioData {
    /// Samples per channel.
    pub fn num_frames(&self) -> usize {
        self.samples.len().checked_div(self.channels).unwrap_or(0)
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / self.sample_rate as f64
    }

    /// Downmix to one channel by averaging each frame.
    pub fn to_mono(&self) -> Vec<f32> {
        match self.channels {
            0 => Vec::new(),
            1 => self.samples.clone(),
            n => {
                let scale = 1.0 / n as f32;
                self.samples
                    .chunks_exact(n)
                    .map(|frame| frame.iter().sum::<f32>() * scale)
                    .collect()
            }
        }
    }
}

/// Packet-by-packet reader over the first audio track of a file.
struct TrackReader {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
    buffer: Option<SampleBuffer<f32>>,
}

impl TrackReader {
    fn open(path: &Path) -> Result<Self, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let stream = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }
        let probed = symphonia::default::get_probe().format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(AudioError::NoAudioTrack)?;
        let params = &track.codec_params;
        let sample_rate = params.sample_rate.ok_or(AudioError::UnknownSampleRate)?;
        let channels = params.channels.map_or(2, |c| c.count());
        let decoder = symphonia::default::get_codecs().make(params, &DecoderOptions::default())?;

        Ok(Self {
            track_id: track.id,
            format,
            decoder,
            sample_rate,
            channels,
            buffer: None,
        })
    }

    /// Append the next decoded packet to `out`; `false` at end of stream.
    fn read_into(&mut self, out: &mut Vec<f32>) -> Result<bool, AudioError> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Ok(false)
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    log::warn!("skipping corrupt packet: {msg}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let needed = decoded.capacity() as u64;
            if self
                .buffer
                .as_ref()
                .map_or(true, |buf| (buf.capacity() as u64) < needed)
            {
                self.buffer = Some(SampleBuffer::new(needed, *decoded.spec()));
            }
            if let Some(buffer) = &mut self.buffer {
                buffer.copy_interleaved_ref(decoded);
                out.extend_from_slice(buffer.samples());
            }
            return Ok(true);
        }
    }
}

/// Decode a whole file to interleaved `f32` samples.
///
/// ```no_run
/// use spectra_canvas::audio::load_audio;
/// use std::path::Path;
///
/// let audio = load_audio(Path::new("song.mp3")).unwrap();
/// println!("{:.2}s at {}Hz", audio.duration(), audio.sample_rate);
/// ```
pub fn load_audio(path: &Path) -> Result<AudioData, AudioError> {
    let mut reader = TrackReader::open(path)?;
    let mut samples = Vec::new();
    while reader.read_into(&mut samples)? {}

    log::debug!(
        "decoded {}: {} Hz, {} ch, {} samples",
        path.display(),
        reader.sample_rate,
        reader.channels,
        samples.len()
    );
    Ok(AudioData {
        samples,
        sample_rate: reader.sample_rate,
        channels: reader.channels,
    })
}
