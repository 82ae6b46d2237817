//! End-to-end framing scenarios: synthesis chunks in, transport frames out

use anyhow::Result;
use telephony_framer::{
    audio::{BufferState, ResampleQuality},
    AudioChunk, Frame, FrameAssembler, OutputFormat, PipelineConfig, StreamingRingBuffer,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sine(freq: f32, rate: u32, len: usize, offset: usize) -> Vec<f32> {
    (offset..offset + len)
        .map(|i| (i as f32 / rate as f32 * freq * std::f32::consts::TAU).sin() * 0.6)
        .collect()
}

/// One second at 24 kHz split into five 200 ms chunks
fn one_second_chunks() -> Vec<AudioChunk> {
    (0..5)
        .map(|i| AudioChunk::new(sine(440.0, 24000, 4800, i * 4800), 24000))
        .collect()
}

#[test]
fn test_one_second_pcm16_yields_fifty_frames() -> Result<()> {
    init_tracing();
    let config = PipelineConfig::default();
    let mut assembler = FrameAssembler::new(&config)?;

    let frames: Vec<Frame> = assembler
        .generate_frames(one_second_chunks(), OutputFormat::Pcm16)
        .collect::<Result<_, _>>()?;

    assert_eq!(frames.len(), 50);
    assert!(frames.iter().all(|f| f.len() == 320));
    assert!(frames.iter().all(|f| !f.is_padded()));
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.sequence(), i as u64);
    }
    Ok(())
}

#[test]
fn test_one_second_alaw_with_linear_fallback() -> Result<()> {
    init_tracing();
    let config = PipelineConfig::default()
        .with_output_format(OutputFormat::Alaw)
        .with_resample_quality(ResampleQuality::Linear);
    let mut assembler = FrameAssembler::new(&config)?;

    let frames: Vec<Frame> = assembler
        .frames(one_second_chunks())
        .collect::<Result<_, _>>()?;

    assert_eq!(frames.len(), 50);
    assert!(frames.iter().all(|f| f.len() == assembler.frame_bytes()));
    assert!(frames.iter().all(|f| f.format() == OutputFormat::Alaw));
    Ok(())
}

#[test]
fn test_uneven_chunks_padded_tail() -> Result<()> {
    init_tracing();
    let config = PipelineConfig::default().with_resample_quality(ResampleQuality::Linear);
    let mut assembler = FrameAssembler::new(&config)?;

    // 1234 + 777 + 3 samples at 24 kHz -> 411 + 259 + 1 = 671 at 8 kHz
    let chunks = vec![
        AudioChunk::new(sine(300.0, 24000, 1234, 0), 24000),
        AudioChunk::new(sine(300.0, 24000, 777, 1234), 24000),
        AudioChunk::new(sine(300.0, 24000, 3, 2011), 24000),
    ];
    let frames: Vec<Frame> = assembler
        .generate_frames(chunks, OutputFormat::Pcm16)
        .collect::<Result<_, _>>()?;

    assert_eq!(frames.len(), 5);
    let last = frames.last().unwrap();
    assert_eq!(last.padding(), 5 * 160 - 671);
    assert!(last.as_bytes()[(160 - last.padding()) * 2..].iter().all(|&b| b == 0));
    assert_eq!(assembler.buffered_samples(), 0);
    Ok(())
}

#[test]
fn test_transport_loop_through_ring_buffer() -> Result<()> {
    init_tracing();
    let config = PipelineConfig::default()
        .with_output_format(OutputFormat::Float32)
        .with_resample_quality(ResampleQuality::Linear);
    let mut assembler = FrameAssembler::new(&config)?;
    let mut jitter = StreamingRingBuffer::with_duration_ms(config.ring_buffer_ms, config.target_sample_rate)?;

    let frame_samples = assembler.frame_samples();
    let mut sent = Vec::new();
    let mut received = Vec::new();

    // Producer pushes bursts, consumer polls one frame per tick
    for chunk in one_second_chunks() {
        for frame in assembler.push_chunk(chunk, config.output_format)? {
            let samples = frame.decode()?;
            assert_eq!(jitter.write(&samples), samples.len());
            sent.extend(samples);
        }
        for _ in 0..12 {
            if let Some(samples) = jitter.read(frame_samples) {
                received.extend(samples);
            }
        }
    }
    if let Some(frame) = assembler.flush(config.output_format) {
        jitter.write(&frame.decode()?);
    }
    while let Some(samples) = jitter.read(frame_samples) {
        received.extend(samples);
    }

    assert_eq!(jitter.state(), BufferState::Empty);
    assert_eq!(received, sent);
    assert_eq!(received.len(), 8000);
    Ok(())
}

#[test]
fn test_ring_buffer_drops_when_reader_stalls() -> Result<()> {
    let mut jitter = StreamingRingBuffer::new(480, 8000)?;

    let mut written = 0;
    for _ in 0..5 {
        written += jitter.write(&[0.25; 160]);
        assert!(jitter.available_samples() <= jitter.capacity());
    }

    assert_eq!(written, 480);
    assert_eq!(jitter.state(), BufferState::Full);
    assert_eq!(jitter.stats().samples_dropped, 320);
    assert!((jitter.available_ms() - 60.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_call_restart_resets_state() -> Result<()> {
    let config = PipelineConfig::default().with_resample_quality(ResampleQuality::Linear);
    let mut assembler = FrameAssembler::new(&config)?;
    let mut jitter = StreamingRingBuffer::new(1600, 8000)?;

    let frames = assembler.push_chunk(AudioChunk::new(vec![0.3; 1000], 24000), OutputFormat::Pcm16)?;
    assert_eq!(frames.len(), 2);
    jitter.write(&[0.3; 333]);

    // Call dropped
    assembler.reset();
    jitter.clear();

    assert_eq!(assembler.buffered_samples(), 0);
    assert!(jitter.is_empty());
    assert!(assembler.flush(OutputFormat::Pcm16).is_none());
    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let path = std::env::temp_dir().join(format!("telephony-framer-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "source_sample_rate = 16000\nframe_duration_ms = 30\noutput_format = \"alaw\"\n",
    )?;

    let config = PipelineConfig::from_file(&path);
    std::fs::remove_file(&path)?;
    let config = config?;

    assert_eq!(config.frame_samples(), 240);
    assert_eq!(config.frame_bytes(), 240);

    let mut assembler = FrameAssembler::new(&config)?;
    let frames = assembler.push_chunk(AudioChunk::new(vec![0.0; 960], 16000), config.output_format)?;
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.as_bytes().iter().all(|&b| b == 0xD5)));
    Ok(())
}
