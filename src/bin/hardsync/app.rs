//! Instrument - audio stream setup and the audio-thread render loop

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, PushError, RingBuffer};

use hardsync::{
    synth::pool::VoiceSnapshot, ScheduledMessage, SyncSynth, SynthParams, MAX_BLOCK_SIZE,
    POOL_SIZE,
};

use super::ui::{
    state::{MeterFrame, UiState},
    UiApp, VIS_BUFFER_SIZE,
};

/// Capacity in blocks for the audio→UI sample ring
const AUDIO_RING_BLOCKS: usize = 16;
/// Capacity of the UI→audio message ring
const MESSAGE_RING: usize = 256;
const METER_RING: usize = 32;

/// Main application: owns the controls until the stream starts.
pub struct Instrument {
    params: SynthParams,
    gate_ms: u64,
}

impl Instrument {
    pub fn new(params: SynthParams, gate_ms: u64) -> Self {
        Self { params, gate_ms }
    }

    /// Open the default output device, start rendering, and hand the terminal
    /// to the UI until the user quits.
    pub fn run(self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        tracing::info!(sample_rate, channels, "opened output device");

        // --- Cross-thread rings ---
        let (msg_tx, msg_rx) = RingBuffer::<ScheduledMessage>::new(MESSAGE_RING);
        let (audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
        let (meter_tx, meter_rx) = RingBuffer::<MeterFrame>::new(METER_RING);

        let synth = SyncSynth::with_params(sample_rate, self.params, msg_rx);
        let mut callback = AudioCallback::new(synth, channels, audio_tx, meter_tx);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| callback.fill(data),
                |err| tracing::error!(%err, "output stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let state = UiState::new(self.params, sample_rate, self.gate_ms);
        let mut ui = UiApp::new(msg_tx, audio_rx, meter_rx, state);
        ui.run(terminal)?;

        // Dropping the stream stops the callback before the rings go away
        drop(stream);
        tracing::info!("stream closed");
        Ok(())
    }
}

/// Everything the audio thread owns. Buffers are sized up front so `fill`
/// never allocates.
struct AudioCallback {
    synth: SyncSynth<Consumer<ScheduledMessage>>,
    channels: usize,
    render_buf: Vec<f32>,
    snapshots: Vec<VoiceSnapshot>,
    audio_tx: rtrb::Producer<f32>,
    meter_tx: rtrb::Producer<MeterFrame>,
}

impl AudioCallback {
    fn new(
        synth: SyncSynth<Consumer<ScheduledMessage>>,
        channels: usize,
        audio_tx: rtrb::Producer<f32>,
        meter_tx: rtrb::Producer<MeterFrame>,
    ) -> Self {
        Self {
            synth,
            channels,
            render_buf: vec![0.0; MAX_BLOCK_SIZE],
            snapshots: Vec::with_capacity(POOL_SIZE),
            audio_tx,
            meter_tx,
        }
    }

    fn fill(&mut self, data: &mut [f32]) {
        let total_frames = data.len() / self.channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let block = &mut self.render_buf[..frames_to_render];
            self.synth.render_block(block);

            // Duplicate mono to all channels and write to device
            let out_off = frames_written * self.channels;
            for (i, &s) in block.iter().enumerate() {
                let frame = out_off + i * self.channels;
                data[frame..frame + self.channels].fill(s);
            }

            // Push mono block to UI ring, non-blocking (drop on overflow)
            for &s in block.iter() {
                if let Err(PushError::Full(_)) = self.audio_tx.push(s) {
                    break;
                }
            }

            frames_written += frames_to_render;
        }

        self.snapshots.clear();
        self.synth.collect_voice_snapshots(&mut self.snapshots);
        let _ = self
            .meter_tx
            .push(MeterFrame::from_snapshots(&self.snapshots, self.synth.frame()));
    }
}
